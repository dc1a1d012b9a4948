//! Token and address models

use serde::{Deserialize, Serialize};

/// The zero address, also used by the routing vendor for native gas tokens
pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// `0x` followed by exactly 40 hex digits
pub fn is_valid_evm_address(address: &str) -> bool {
	match address.strip_prefix("0x").or_else(|| address.strip_prefix("0X")) {
		Some(hex_part) => hex_part.len() == 40 && hex_part.chars().all(|c| c.is_ascii_hexdigit()),
		None => false,
	}
}

/// Case-insensitive address comparison (checksummed vs lower-case)
pub fn addresses_equal(a: &str, b: &str) -> bool {
	a.eq_ignore_ascii_case(b)
}

/// True for the all-zero address in any casing
pub fn is_zero_address(address: &str) -> bool {
	addresses_equal(address, ZERO_ADDRESS)
}

/// Reference to a token on a specific chain, as selected in the deposit form
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRef {
	pub chain_id: u64,
	pub address: String,
}

impl TokenRef {
	pub fn new(chain_id: u64, address: impl Into<String>) -> Self {
		Self {
			chain_id,
			address: address.into(),
		}
	}

	/// Lower-cased address, used for request keys and comparisons
	pub fn normalized_address(&self) -> String {
		self.address.to_lowercase()
	}

	pub fn is_native(&self) -> bool {
		is_zero_address(&self.address)
	}
}

/// Token metadata as reported by the routing vendor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
	pub address: String,
	pub chain_id: u64,
	pub symbol: String,
	pub decimals: u8,
	#[serde(default)]
	pub name: String,
	#[serde(default, rename = "priceUSD", skip_serializing_if = "Option::is_none")]
	pub price_usd: Option<String>,
	#[serde(default, rename = "logoURI", skip_serializing_if = "Option::is_none")]
	pub logo_uri: Option<String>,
}

impl Token {
	pub fn new(
		address: impl Into<String>,
		chain_id: u64,
		symbol: impl Into<String>,
		decimals: u8,
	) -> Self {
		let symbol = symbol.into();
		Self {
			address: address.into(),
			chain_id,
			name: symbol.clone(),
			symbol,
			decimals,
			price_usd: None,
			logo_uri: None,
		}
	}

	pub fn token_ref(&self) -> TokenRef {
		TokenRef::new(self.chain_id, self.address.clone())
	}
}
