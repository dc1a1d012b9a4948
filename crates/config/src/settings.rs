//! Configuration settings structures

use crate::{configurable_value::ConfigurableValue, ConfigurableValueError};
use kite_types::{is_valid_evm_address, is_zero_address, SecretString};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Main application settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Settings {
	pub server: ServerSettings,
	pub lifi: LifiSettings,
	pub routing: RoutingSettings,
	#[serde(default)]
	pub vaults: Vec<VaultConfig>,
	#[serde(default)]
	pub kite_safe: Vec<KiteSafeConfig>,
	pub ens: EnsSettings,
	/// JSON-RPC endpoint per chain id (keys are decimal chain ids)
	#[serde(default)]
	pub rpc: HashMap<String, String>,
	pub balances: BalanceSettings,
	pub history: HistorySettings,
	pub logging: LoggingSettings,
}

/// Server configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerSettings {
	pub host: String,
	pub port: u16,
}

/// Routing vendor (LI.FI) configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LifiSettings {
	pub endpoint: String,
	/// Optional API key sent as `x-lifi-api-key`
	///
	/// Example configurations:
	/// - Environment variable: `{"type": "env", "value": "LIFI_API_KEY"}`
	/// - Plain value: `{"type": "plain", "value": "your-key-here"}`
	#[serde(default)]
	pub api_key: Option<ConfigurableValue>,
	pub integrator: String,
	/// Slippage applied when a request does not carry its own, as a fraction
	pub default_slippage: f64,
	/// Interval between `/status` polls for cross-chain steps
	pub status_poll_interval_ms: u64,
	/// Request timeout for HTTP clients
	pub request_timeout_ms: u64,
}

/// Route fetching behaviour
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RoutingSettings {
	pub debounce_ms: u64,
	/// Vendor ordering hint (`CHEAPEST`, `FASTEST`, ...)
	pub order: String,
	/// Default destination chain when a profile has no preference
	pub default_chain_id: u64,
}

/// A vault known to accept composer deposits
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct VaultConfig {
	pub chain_id: u64,
	pub address: String,
	pub name: String,
	#[serde(default)]
	pub asset_symbol: Option<String>,
}

/// Deployed KiteSafe deposit wrapper
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct KiteSafeConfig {
	pub chain_id: u64,
	pub address: String,
}

/// ENS lookups run against mainnet
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EnsSettings {
	pub rpc_url: ConfigurableValue,
}

/// Token balance provider (Alchemy)
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BalanceSettings {
	pub api_key: ConfigurableValue,
	/// Alchemy network slug per chain id (keys are decimal chain ids)
	pub networks: HashMap<String, String>,
}

/// History persistence; in-memory when no path is set
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct HistorySettings {
	#[serde(default)]
	pub path: Option<String>,
}

/// Logging configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LoggingSettings {
	pub level: String,
	pub format: LogFormat,
	pub structured: bool,
}

/// Log format options
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
	Json,
	Pretty,
	Compact,
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigValidationError {
	#[error("routing.debounce_ms must be positive")]
	ZeroDebounce,
	#[error("Invalid vault address for chain {chain_id}: {address}")]
	InvalidVaultAddress { chain_id: u64, address: String },
	#[error("Invalid KiteSafe address for chain {chain_id}: {address}")]
	InvalidKiteSafeAddress { chain_id: u64, address: String },
	#[error("lifi.default_slippage must be within (0, 1), got {0}")]
	InvalidSlippage(f64),
	#[error("Invalid chain id key in {section}: {key}")]
	InvalidChainKey { section: String, key: String },
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			server: ServerSettings {
				host: "0.0.0.0".to_string(),
				port: 3000,
			},
			lifi: LifiSettings {
				endpoint: "https://li.quest/v1".to_string(),
				api_key: None,
				integrator: "kite".to_string(),
				default_slippage: 0.005,
				status_poll_interval_ms: 5000,
				request_timeout_ms: 30_000,
			},
			routing: RoutingSettings {
				debounce_ms: 500,
				order: "CHEAPEST".to_string(),
				default_chain_id: 8453,
			},
			vaults: Vec::new(),
			kite_safe: Vec::new(),
			ens: EnsSettings {
				rpc_url: ConfigurableValue::from_plain("https://eth.llamarpc.com"),
			},
			rpc: HashMap::new(),
			balances: BalanceSettings {
				api_key: ConfigurableValue::from_env("ALCHEMY_API_KEY"),
				networks: default_alchemy_networks(),
			},
			history: HistorySettings::default(),
			logging: LoggingSettings {
				level: "info".to_string(),
				format: LogFormat::Pretty,
				structured: false,
			},
		}
	}
}

fn default_alchemy_networks() -> HashMap<String, String> {
	[
		(1u64, "eth-mainnet"),
		(10, "opt-mainnet"),
		(137, "polygon-mainnet"),
		(8453, "base-mainnet"),
		(42161, "arb-mainnet"),
	]
	.into_iter()
	.map(|(id, slug)| (id.to_string(), slug.to_string()))
	.collect()
}

impl Settings {
	/// Get server bind address
	pub fn bind_address(&self) -> String {
		format!("{}:{}", self.server.host, self.server.port)
	}

	/// Check ranges and addresses that serde cannot express
	pub fn validate(&self) -> Result<(), ConfigValidationError> {
		if self.routing.debounce_ms == 0 {
			return Err(ConfigValidationError::ZeroDebounce);
		}
		let slippage = self.lifi.default_slippage;
		if !(slippage > 0.0 && slippage < 1.0) {
			return Err(ConfigValidationError::InvalidSlippage(slippage));
		}
		for vault in &self.vaults {
			if !is_valid_evm_address(&vault.address) || is_zero_address(&vault.address) {
				return Err(ConfigValidationError::InvalidVaultAddress {
					chain_id: vault.chain_id,
					address: vault.address.clone(),
				});
			}
		}
		for safe in &self.kite_safe {
			if !is_valid_evm_address(&safe.address) || is_zero_address(&safe.address) {
				return Err(ConfigValidationError::InvalidKiteSafeAddress {
					chain_id: safe.chain_id,
					address: safe.address.clone(),
				});
			}
		}
		parse_chain_keys("rpc", &self.rpc)?;
		parse_chain_keys("balances.networks", &self.balances.networks)?;
		Ok(())
	}

	/// RPC endpoints keyed by chain id
	pub fn rpc_urls(&self) -> Result<HashMap<u64, String>, ConfigValidationError> {
		parse_chain_keys("rpc", &self.rpc)
	}

	/// Alchemy network slugs keyed by chain id
	pub fn balance_networks(&self) -> Result<HashMap<u64, String>, ConfigValidationError> {
		parse_chain_keys("balances.networks", &self.balances.networks)
	}

	pub fn kite_safe_for(&self, chain_id: u64) -> Option<&str> {
		self.kite_safe
			.iter()
			.find(|s| s.chain_id == chain_id)
			.map(|s| s.address.as_str())
	}

	/// LI.FI API key, if configured
	pub fn get_lifi_api_key(&self) -> Result<Option<SecretString>, ConfigurableValueError> {
		self.lifi
			.api_key
			.as_ref()
			.map(|value| value.resolve_for_secret())
			.transpose()
	}

	/// Balance provider key; an empty value counts as not configured
	pub fn get_balance_api_key(&self) -> Option<SecretString> {
		self.balances
			.api_key
			.resolve_for_secret()
			.ok()
			.filter(|key| !key.is_empty())
	}

	pub fn get_ens_rpc_url(&self) -> Result<String, ConfigurableValueError> {
		self.ens.rpc_url.resolve()
	}
}

fn parse_chain_keys(
	section: &str,
	map: &HashMap<String, String>,
) -> Result<HashMap<u64, String>, ConfigValidationError> {
	map.iter()
		.map(|(key, value)| {
			key.trim()
				.parse::<u64>()
				.map(|id| (id, value.clone()))
				.map_err(|_| ConfigValidationError::InvalidChainKey {
					section: section.to_string(),
					key: key.clone(),
				})
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_settings_are_valid() {
		let settings = Settings::default();
		assert!(settings.validate().is_ok());
		assert_eq!(settings.bind_address(), "0.0.0.0:3000");
		assert_eq!(settings.balance_networks().unwrap()[&8453], "base-mainnet");
	}

	#[test]
	fn test_zero_debounce_rejected() {
		let mut settings = Settings::default();
		settings.routing.debounce_ms = 0;
		assert_eq!(settings.validate(), Err(ConfigValidationError::ZeroDebounce));
	}

	#[test]
	fn test_invalid_vault_rejected() {
		let mut settings = Settings::default();
		settings.vaults.push(VaultConfig {
			chain_id: 10,
			address: "0x1234".to_string(),
			name: "broken".to_string(),
			asset_symbol: None,
		});
		assert!(matches!(
			settings.validate(),
			Err(ConfigValidationError::InvalidVaultAddress { chain_id: 10, .. })
		));
	}

	#[test]
	fn test_invalid_chain_key_rejected() {
		let mut settings = Settings::default();
		settings
			.rpc
			.insert("base".to_string(), "https://base.example".to_string());
		assert!(matches!(
			settings.validate(),
			Err(ConfigValidationError::InvalidChainKey { .. })
		));
	}

	#[test]
	fn test_kite_safe_lookup() {
		let mut settings = Settings::default();
		settings.kite_safe.push(KiteSafeConfig {
			chain_id: 8453,
			address: "0x1111111111111111111111111111111111111111".to_string(),
		});
		assert!(settings.kite_safe_for(8453).is_some());
		assert!(settings.kite_safe_for(1).is_none());
	}

	#[test]
	fn test_empty_balance_key_is_not_configured() {
		let mut settings = Settings::default();
		settings.balances.api_key = ConfigurableValue::from_plain("  ");
		assert!(settings.get_balance_api_key().is_none());
		settings.balances.api_key = ConfigurableValue::from_plain("alchemy-key");
		assert!(settings.get_balance_api_key().is_some());
	}
}
