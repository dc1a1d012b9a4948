//! ENS recipient profiles: reading and writing the Kite text records

use std::sync::Arc;

use futures::future::try_join_all;
use kite_adapters::encode_set_text;
use kite_types::format::is_valid_ens_name;
use kite_types::{
	chain_id_from_name, is_valid_evm_address, EnsProfile, EnsResolver, ProfileError, ProfileUpdate,
	TransactionRequest, KITE_TEXT_KEYS, TEXT_DEPOSIT_TARGET, TEXT_PREFERRED_CHAIN, TEXT_PREFERRED_TOKEN,
};
use tracing::{debug, warn};

/// ENS lives on Ethereum mainnet
pub const ENS_CHAIN_ID: u64 = 1;

#[derive(Debug, Clone)]
pub struct ProfileService {
	resolver: Arc<dyn EnsResolver>,
}

impl ProfileService {
	pub fn new(resolver: Arc<dyn EnsResolver>) -> Self {
		Self { resolver }
	}

	/// Resolve `name` and read its Kite text records
	///
	/// Unparseable chain records are ignored rather than failing the lookup.
	pub async fn load(&self, name: &str) -> Result<EnsProfile, ProfileError> {
		let name = name.trim().to_lowercase();
		if !is_valid_ens_name(&name) {
			return Err(ProfileError::InvalidName { name });
		}

		let address = self
			.resolver
			.resolve_address(&name)
			.await?
			.ok_or_else(|| ProfileError::NotFound { name: name.clone() })?;

		let records =
			try_join_all(KITE_TEXT_KEYS.iter().map(|key| self.resolver.text(&name, key))).await?;
		let [chain, token, target]: [Option<String>; 3] = records
			.try_into()
			.unwrap_or_else(|_| [None, None, None]);

		let mut profile = EnsProfile::new(name.clone(), address);
		profile.preferred_chain = chain.as_deref().and_then(|value| {
			let parsed = chain_id_from_name(value);
			if parsed.is_none() {
				warn!("Ignoring unrecognized {} record on {}: {}", TEXT_PREFERRED_CHAIN, name, value);
			}
			parsed
		});
		profile.preferred_token = non_empty(token);
		profile.deposit_target = non_empty(target);

		debug!(
			"Loaded ENS profile {} (chain: {:?}, deposit target: {})",
			name,
			profile.preferred_chain,
			profile.deposit_target.is_some()
		);
		Ok(profile)
	}

	/// `setText` transactions writing `update` to `name`'s records on `resolver`
	///
	/// Fields left as `None` produce no transaction.
	pub fn update_calls(
		&self,
		name: &str,
		resolver: &str,
		update: &ProfileUpdate,
	) -> Result<Vec<TransactionRequest>, ProfileError> {
		let name = name.trim().to_lowercase();
		if !is_valid_ens_name(&name) {
			return Err(ProfileError::InvalidName { name });
		}
		if !is_valid_evm_address(resolver) {
			return Err(ProfileError::InvalidRecord {
				key: "resolver".to_string(),
				value: resolver.to_string(),
			});
		}

		let mut records = Vec::new();
		if let Some(chain_id) = update.preferred_chain {
			records.push((TEXT_PREFERRED_CHAIN, chain_id.to_string()));
		}
		if let Some(token) = &update.preferred_token {
			records.push((TEXT_PREFERRED_TOKEN, token.trim().to_string()));
		}
		if let Some(target) = &update.deposit_target {
			let target = target.trim();
			if !target.is_empty() && !is_valid_evm_address(target) {
				return Err(ProfileError::InvalidRecord {
					key: TEXT_DEPOSIT_TARGET.to_string(),
					value: target.to_string(),
				});
			}
			records.push((TEXT_DEPOSIT_TARGET, target.to_string()));
		}

		Ok(records
			.into_iter()
			.map(|(key, value)| TransactionRequest {
				chain_id: ENS_CHAIN_ID,
				to: resolver.to_string(),
				from: None,
				data: format!("0x{}", hex::encode(encode_set_text(&name, key, &value))),
				value: None,
				gas_limit: None,
				gas_price: None,
			})
			.collect())
	}
}

fn non_empty(value: Option<String>) -> Option<String> {
	value
		.map(|v| v.trim().to_string())
		.filter(|v| !v.is_empty())
}
