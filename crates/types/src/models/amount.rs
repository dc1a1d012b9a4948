//! Token amount in smallest units, kept as a decimal string to preserve precision

/// Smallest-unit token amount (wei, 6-decimal USDC units, ...)
///
/// Amounts coming from the UI, the vendor and the balance provider are all
/// decimal strings that may exceed `u128`, so the raw string is kept and only
/// parsed on demand.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct TokenAmount(String);

impl TokenAmount {
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Try to parse as u128 (covers every realistic ERC-20 amount)
	pub fn as_u128(&self) -> Result<u128, std::num::ParseIntError> {
		self.0.parse()
	}

	/// True for "0", "000", ... but false for the empty string
	pub fn is_zero(&self) -> bool {
		!self.0.is_empty() && self.0.chars().all(|c| c == '0')
	}

	/// Non-empty and digits only
	pub fn is_valid(&self) -> bool {
		!self.0.is_empty() && self.0.chars().all(|c| c.is_ascii_digit())
	}

	pub fn validate(&self) -> Result<(), String> {
		if self.0.is_empty() {
			return Err("amount cannot be empty".to_string());
		}

		if !self.0.chars().all(|c| c.is_ascii_digit()) {
			return Err("amount must contain only digits".to_string());
		}

		Ok(())
	}

	/// Canonical form with leading zeros stripped ("000120" -> "120", "000" -> "0")
	pub fn normalized(&self) -> String {
		let trimmed = self.0.trim_start_matches('0');
		if trimmed.is_empty() {
			"0".to_string()
		} else {
			trimmed.to_string()
		}
	}
}

impl std::fmt::Display for TokenAmount {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl From<String> for TokenAmount {
	fn from(value: String) -> Self {
		Self(value)
	}
}

impl From<&str> for TokenAmount {
	fn from(value: &str) -> Self {
		Self(value.to_string())
	}
}

impl From<u128> for TokenAmount {
	fn from(value: u128) -> Self {
		Self(value.to_string())
	}
}

impl From<u64> for TokenAmount {
	fn from(value: u64) -> Self {
		Self(value.to_string())
	}
}

// Serialized as a plain string. Deserialization is lenient so that invalid
// user input reaches `RouteRequest::validate` and gets a typed error there.
impl serde::Serialize for TokenAmount {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		serializer.serialize_str(&self.0)
	}
}

impl<'de> serde::Deserialize<'de> for TokenAmount {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		#[derive(serde::Deserialize)]
		#[serde(untagged)]
		enum Raw {
			Text(String),
			Number(u64),
		}

		Ok(match Raw::deserialize(deserializer)? {
			Raw::Text(s) => Self(s),
			Raw::Number(n) => Self(n.to_string()),
		})
	}
}
