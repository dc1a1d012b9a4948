//! Alchemy token balance provider

use alloy_primitives::U256;
use async_trait::async_trait;
use kite_types::{
	AdapterError, AdapterResult, BalanceProvider, RawTokenBalance, SecretString, TokenAmount,
	TokenMetadata,
};
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

use crate::client_cache::ClientCache;
use crate::rpc::JsonRpcClient;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenBalancesResult {
	#[serde(default)]
	token_balances: Vec<AlchemyTokenBalance>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AlchemyTokenBalance {
	contract_address: String,
	#[serde(default)]
	token_balance: Option<String>,
	#[serde(default)]
	error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AlchemyTokenMetadata {
	#[serde(default)]
	name: Option<String>,
	#[serde(default)]
	symbol: Option<String>,
	#[serde(default)]
	decimals: Option<u8>,
	#[serde(default)]
	logo: Option<String>,
}

impl From<AlchemyTokenMetadata> for TokenMetadata {
	fn from(raw: AlchemyTokenMetadata) -> Self {
		let fallback = TokenMetadata::unknown();
		Self {
			symbol: raw.symbol.filter(|s| !s.is_empty()).unwrap_or(fallback.symbol),
			name: raw.name.filter(|s| !s.is_empty()).unwrap_or(fallback.name),
			decimals: raw.decimals.unwrap_or(fallback.decimals),
			logo: raw.logo.filter(|s| !s.is_empty()),
		}
	}
}

/// Balances via `alchemy_getTokenBalances` and `alchemy_getTokenMetadata`
pub struct AlchemyBalanceProvider {
	api_key: SecretString,
	/// Alchemy network slug per chain id (`base-mainnet`, ...)
	networks: HashMap<u64, String>,
	cache: ClientCache,
}

impl fmt::Debug for AlchemyBalanceProvider {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AlchemyBalanceProvider")
			.field("networks", &self.networks)
			.finish_non_exhaustive()
	}
}

impl AlchemyBalanceProvider {
	pub fn new(api_key: SecretString, networks: HashMap<u64, String>, cache: ClientCache) -> Self {
		Self {
			api_key,
			networks,
			cache,
		}
	}

	fn rpc(&self, chain_id: u64) -> AdapterResult<JsonRpcClient> {
		let network = self
			.networks
			.get(&chain_id)
			.ok_or(AdapterError::ChainNotSupported { chain_id })?;
		JsonRpcClient::new(
			format!(
				"https://{}.g.alchemy.com/v2/{}",
				network,
				self.api_key.expose_secret()
			),
			&self.cache,
		)
	}
}

/// Alchemy reports balances as 0x-prefixed hex; convert to decimal
fn hex_balance_to_decimal(raw: &str) -> Option<TokenAmount> {
	let digits = raw.trim().trim_start_matches("0x");
	if digits.is_empty() {
		return Some(TokenAmount::from("0"));
	}
	U256::from_str_radix(digits, 16)
		.ok()
		.map(|v| TokenAmount::new(v.to_string()))
}

#[async_trait]
impl BalanceProvider for AlchemyBalanceProvider {
	fn supports_chain(&self, chain_id: u64) -> bool {
		self.networks.contains_key(&chain_id)
	}

	/// Non-zero ERC-20 balances; entries Alchemy flags as errored are skipped
	async fn token_balances(&self, address: &str, chain_id: u64) -> AdapterResult<Vec<RawTokenBalance>> {
		let rpc = self.rpc(chain_id)?;
		let result: TokenBalancesResult = rpc
			.request("alchemy_getTokenBalances", json!([address, "erc20"]))
			.await?;

		let balances: Vec<RawTokenBalance> = result
			.token_balances
			.into_iter()
			.filter(|b| b.error.is_none())
			.filter_map(|b| {
				let balance = hex_balance_to_decimal(b.token_balance.as_deref()?)?;
				(!balance.is_zero()).then(|| RawTokenBalance {
					contract_address: b.contract_address,
					balance,
				})
			})
			.collect();

		debug!(
			"Alchemy reported {} non-zero balances on chain {}",
			balances.len(),
			chain_id
		);
		Ok(balances)
	}

	async fn token_metadata(&self, chain_id: u64, token: &str) -> AdapterResult<TokenMetadata> {
		let rpc = self.rpc(chain_id)?;
		let raw: AlchemyTokenMetadata = rpc
			.request("alchemy_getTokenMetadata", json!([token]))
			.await?;
		Ok(raw.into())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_hex_balance_conversion() {
		assert_eq!(hex_balance_to_decimal("0x0f4240").unwrap().as_str(), "1000000");
		assert!(hex_balance_to_decimal("0x0000").unwrap().is_zero());
		assert!(hex_balance_to_decimal("0x").unwrap().is_zero());
		assert!(hex_balance_to_decimal("0xzz").is_none());
	}

	#[test]
	fn test_metadata_placeholders() {
		let raw = AlchemyTokenMetadata {
			name: None,
			symbol: Some(String::new()),
			decimals: None,
			logo: Some(String::new()),
		};
		let metadata = TokenMetadata::from(raw);
		assert_eq!(metadata.symbol, "UNKNOWN");
		assert_eq!(metadata.decimals, 18);
		assert!(metadata.logo.is_none());
	}

	#[test]
	fn test_supported_chains() {
		let networks = HashMap::from([(8453u64, "base-mainnet".to_string())]);
		let provider =
			AlchemyBalanceProvider::new(SecretString::from("key"), networks, ClientCache::new());
		assert!(provider.supports_chain(8453));
		assert!(!provider.supports_chain(56));
		assert!(matches!(
			provider.rpc(56),
			Err(AdapterError::ChainNotSupported { chain_id: 56 })
		));
	}

	#[test]
	fn test_debug_hides_key() {
		let provider = AlchemyBalanceProvider::new(
			SecretString::from("very-secret"),
			HashMap::new(),
			ClientCache::new(),
		);
		assert!(!format!("{:?}", provider).contains("very-secret"));
	}
}
