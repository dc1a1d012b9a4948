//! Vault-deposit decision
//!
//! Decides, from the recipient's ENS profile alone, whether deposits should go
//! through the composer (vault deposit) or as a plain transfer. No on-chain
//! verification happens here.

use kite_types::{addresses_equal, is_zero_address, EnsProfile};
use serde::Serialize;

/// A vault statically known to accept composer deposits
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KnownVault {
	pub chain_id: u64,
	pub address: String,
	pub name: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub asset_symbol: Option<String>,
}

/// Known vaults per chain
#[derive(Debug, Clone, Default)]
pub struct VaultRegistry {
	vaults: Vec<KnownVault>,
}

impl VaultRegistry {
	pub fn new(vaults: Vec<KnownVault>) -> Self {
		Self { vaults }
	}

	pub fn find(&self, chain_id: u64, address: &str) -> Option<&KnownVault> {
		self.vaults
			.iter()
			.find(|v| v.chain_id == chain_id && addresses_equal(&v.address, address))
	}

	/// Case-insensitive match against the vaults known for `chain_id`
	pub fn is_known(&self, chain_id: u64, address: &str) -> bool {
		self.find(chain_id, address).is_some()
	}

	pub fn for_chain(&self, chain_id: u64) -> impl Iterator<Item = &KnownVault> {
		self.vaults.iter().filter(move |v| v.chain_id == chain_id)
	}

	pub fn len(&self) -> usize {
		self.vaults.len()
	}

	pub fn is_empty(&self) -> bool {
		self.vaults.is_empty()
	}
}

/// True iff the profile's deposit target is set, non-zero, and a known vault on `chain_id`
pub fn should_use_vault_composer(
	profile: &EnsProfile,
	chain_id: u64,
	registry: &VaultRegistry,
) -> bool {
	match profile.deposit_target.as_deref() {
		Some(target) if !target.trim().is_empty() && !is_zero_address(target) => {
			registry.is_known(chain_id, target.trim())
		},
		_ => false,
	}
}

/// The profile's preferred chain, or `default_chain` when it has none
pub fn resolve_destination_chain(profile: &EnsProfile, default_chain: u64) -> u64 {
	profile.preferred_chain.unwrap_or(default_chain)
}

/// Informational banner describing where a deposit will land
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DepositBanner {
	/// Funds will be deposited into a known vault
	#[serde(rename_all = "camelCase")]
	VaultDeposit { vault_name: String, vault_address: String },
	/// A deposit target is set but not recognized; funds go to the recipient's wallet
	#[serde(rename_all = "camelCase")]
	UnknownVault { deposit_target: String },
	/// Plain transfer to the recipient
	DirectTransfer,
}

impl DepositBanner {
	pub fn message(&self) -> String {
		match self {
			DepositBanner::VaultDeposit { vault_name, .. } => {
				format!("Funds will be deposited into {}", vault_name)
			},
			DepositBanner::UnknownVault { .. } => {
				"The recipient's deposit target is not a supported vault; funds will be sent to their wallet"
					.to_string()
			},
			DepositBanner::DirectTransfer => "Funds will be sent to the recipient's wallet".to_string(),
		}
	}
}

pub fn deposit_banner(profile: &EnsProfile, chain_id: u64, registry: &VaultRegistry) -> DepositBanner {
	if should_use_vault_composer(profile, chain_id, registry) {
		if let Some(vault) = profile
			.deposit_target
			.as_deref()
			.and_then(|t| registry.find(chain_id, t.trim()))
		{
			return DepositBanner::VaultDeposit {
				vault_name: vault.name.clone(),
				vault_address: vault.address.clone(),
			};
		}
	}

	match profile.deposit_target.as_deref() {
		Some(target) if !target.trim().is_empty() && !is_zero_address(target) => {
			DepositBanner::UnknownVault {
				deposit_target: target.trim().to_string(),
			}
		},
		_ => DepositBanner::DirectTransfer,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const VAULT: &str = "0x7BfA7C4f149E7415b73bdeDfe609237e29CBF34A";

	fn registry() -> VaultRegistry {
		VaultRegistry::new(vec![KnownVault {
			chain_id: 8453,
			address: VAULT.to_string(),
			name: "USDC Vault".to_string(),
			asset_symbol: Some("USDC".to_string()),
		}])
	}

	fn profile(target: Option<&str>) -> EnsProfile {
		let mut profile = EnsProfile::new("alice.eth", "0x1111111111111111111111111111111111111111");
		profile.deposit_target = target.map(str::to_string);
		profile
	}

	#[test]
	fn test_known_vault_uses_composer_case_insensitively() {
		let registry = registry();
		assert!(should_use_vault_composer(&profile(Some(VAULT)), 8453, &registry));
		assert!(should_use_vault_composer(
			&profile(Some(&VAULT.to_lowercase())),
			8453,
			&registry
		));
	}

	#[test]
	fn test_mismatches_fall_back_to_plain_transfer() {
		let registry = registry();
		// wrong chain
		assert!(!should_use_vault_composer(&profile(Some(VAULT)), 1, &registry));
		// unknown vault
		assert!(!should_use_vault_composer(
			&profile(Some("0x2222222222222222222222222222222222222222")),
			8453,
			&registry
		));
		// zero address and unset
		assert!(!should_use_vault_composer(
			&profile(Some("0x0000000000000000000000000000000000000000")),
			8453,
			&registry
		));
		assert!(!should_use_vault_composer(&profile(None), 8453, &registry));
		assert!(!should_use_vault_composer(&profile(Some("")), 8453, &registry));
	}

	#[test]
	fn test_destination_chain_resolution() {
		let mut p = profile(None);
		assert_eq!(resolve_destination_chain(&p, 8453), 8453);
		p.preferred_chain = Some(42161);
		assert_eq!(resolve_destination_chain(&p, 8453), 42161);
	}

	#[test]
	fn test_banners() {
		let registry = registry();
		assert_eq!(
			deposit_banner(&profile(Some(VAULT)), 8453, &registry),
			DepositBanner::VaultDeposit {
				vault_name: "USDC Vault".to_string(),
				vault_address: VAULT.to_string(),
			}
		);
		assert!(matches!(
			deposit_banner(&profile(Some(VAULT)), 1, &registry),
			DepositBanner::UnknownVault { .. }
		));
		assert_eq!(
			deposit_banner(&profile(None), 8453, &registry),
			DepositBanner::DirectTransfer
		);
	}
}
