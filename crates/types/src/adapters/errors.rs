//! Error types for vendor adapter operations

use thiserror::Error;

/// Errors raised by vendor adapters (routing API, JSON-RPC, balance provider)
#[derive(Error, Debug)]
pub enum AdapterError {
	#[error("HTTP request failed: {0}")]
	HttpError(#[from] reqwest::Error),

	#[error("HTTP {status_code}: {reason}")]
	HttpStatusError { status_code: u16, reason: String },

	#[error("Invalid response format: {reason}")]
	InvalidResponse { reason: String },

	#[error("Vendor returned error: {code} - {message}")]
	VendorError { code: String, message: String },

	#[error("RPC error {code}: {message}")]
	RpcError { code: i64, message: String },

	#[error("Configuration error: {reason}")]
	ConfigError { reason: String },

	#[error("Chain not supported: {chain_id}")]
	ChainNotSupported { chain_id: u64 },

	#[error("Not found: {what}")]
	NotFound { what: String },

	#[error("Serialization error: {0}")]
	Serialization(#[from] serde_json::Error),

	#[error("ABI error: {0}")]
	Abi(String),
}

impl AdapterError {
	/// Extract HTTP status code from the error if available
	pub fn status_code(&self) -> Option<u16> {
		match self {
			AdapterError::HttpStatusError { status_code, .. } => Some(*status_code),
			AdapterError::HttpError(e) => e.status().map(|status| status.as_u16()),
			_ => None,
		}
	}

	/// Build an error from a non-success status and the vendor's response body
	///
	/// The routing vendor answers failures with `{"message": "...", "code": ...}`;
	/// when that shape is present the vendor message is surfaced verbatim.
	pub fn from_http_failure(status_code: u16, body: &str) -> Self {
		#[derive(serde::Deserialize)]
		struct VendorBody {
			message: Option<String>,
			code: Option<serde_json::Value>,
		}

		if let Ok(VendorBody {
			message: Some(message),
			code,
		}) = serde_json::from_str::<VendorBody>(body)
		{
			return Self::VendorError {
				code: code
					.map(|c| c.to_string().trim_matches('"').to_string())
					.unwrap_or_else(|| status_code.to_string()),
				message,
			};
		}

		let reason = match status_code {
			400 => "Bad Request".to_string(),
			401 => "Unauthorized".to_string(),
			403 => "Forbidden".to_string(),
			404 => "Not Found".to_string(),
			429 => "Too Many Requests".to_string(),
			500 => "Internal Server Error".to_string(),
			502 => "Bad Gateway".to_string(),
			503 => "Service Unavailable".to_string(),
			_ => format!("HTTP Error {}", status_code),
		};

		Self::HttpStatusError {
			status_code,
			reason,
		}
	}

	pub fn invalid_response(reason: impl Into<String>) -> Self {
		Self::InvalidResponse {
			reason: reason.into(),
		}
	}
}
