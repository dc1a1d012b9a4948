//! ENS recipient profile and the Kite text records that describe it

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::adapters::AdapterError;

/// Text record holding the recipient's preferred destination chain (id or name)
pub const TEXT_PREFERRED_CHAIN: &str = "kite.preferred_chain";
/// Text record holding the recipient's preferred token (symbol or address)
pub const TEXT_PREFERRED_TOKEN: &str = "kite.preferred_token";
/// Text record holding the vault the recipient wants deposits routed into
pub const TEXT_DEPOSIT_TARGET: &str = "kite.deposit_target";

/// All Kite text record keys, in the order they are read
pub const KITE_TEXT_KEYS: [&str; 3] = [
	TEXT_PREFERRED_CHAIN,
	TEXT_PREFERRED_TOKEN,
	TEXT_DEPOSIT_TARGET,
];

/// Recipient profile read from ENS; consumed, never mutated, by the deposit flow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnsProfile {
	pub name: String,
	pub address: String,
	pub preferred_chain: Option<u64>,
	pub preferred_token: Option<String>,
	pub deposit_target: Option<String>,
}

impl EnsProfile {
	pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			address: address.into(),
			preferred_chain: None,
			preferred_token: None,
			deposit_target: None,
		}
	}

	pub fn has_kite_records(&self) -> bool {
		self.preferred_chain.is_some()
			|| self.preferred_token.is_some()
			|| self.deposit_target.is_some()
	}
}

/// Values to write into the Kite text records; `None` leaves a record untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
	pub preferred_chain: Option<u64>,
	pub preferred_token: Option<String>,
	pub deposit_target: Option<String>,
}

#[derive(Error, Debug)]
pub enum ProfileError {
	#[error("Invalid ENS name: {name}")]
	InvalidName { name: String },

	#[error("ENS name {name} does not resolve to an address")]
	NotFound { name: String },

	#[error("Invalid value for {key}: {value}")]
	InvalidRecord { key: String, value: String },

	#[error("ENS lookup failed: {0}")]
	Resolver(#[from] AdapterError),
}
