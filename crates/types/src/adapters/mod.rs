//! Vendor adapter contracts: errors, shared models and collaborator traits

use std::collections::HashMap;

pub mod errors;
pub mod models;
pub mod traits;

pub use errors::AdapterError;
pub use models::{
	ComposerQuoteRequest, ContractCall, RawTokenBalance, StepUpdate, TokenMetadata,
	TransactionRequest, VendorStepStatus,
};
pub use traits::{
	BalanceProvider, EnsResolver, ExecutionHooks, RouteExecutor, RoutingClient, VaultProbe,
	WalletClient,
};

pub type AdapterResult<T> = Result<T, AdapterError>;

/// Minimal runtime configuration an HTTP-backed adapter needs
#[derive(Debug, Clone, PartialEq)]
pub struct VendorRuntimeConfig {
	/// Identifier used in logs and client cache keys
	pub vendor_id: String,

	/// Base URL of the vendor API
	pub endpoint: String,

	/// Extra headers (API keys, integrator ids)
	pub headers: Option<HashMap<String, String>>,
}

impl VendorRuntimeConfig {
	pub fn new(vendor_id: impl Into<String>, endpoint: impl Into<String>) -> Self {
		Self {
			vendor_id: vendor_id.into(),
			endpoint: endpoint.into(),
			headers: None,
		}
	}

	pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers
			.get_or_insert_with(HashMap::new)
			.insert(key.into(), value.into());
		self
	}

	/// Join a path onto the endpoint without doubling slashes
	pub fn url(&self, path: &str) -> String {
		format!(
			"{}/{}",
			self.endpoint.trim_end_matches('/'),
			path.trim_start_matches('/')
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_runtime_config_url_join() {
		let config = VendorRuntimeConfig::new("lifi", "https://li.quest/v1/");
		assert_eq!(
			config.url("/advanced/routes"),
			"https://li.quest/v1/advanced/routes"
		);
	}

	#[test]
	fn test_runtime_config_headers() {
		let config = VendorRuntimeConfig::new("lifi", "https://li.quest/v1")
			.with_header("x-lifi-api-key", "k")
			.with_header("x-lifi-integrator", "kite");
		assert_eq!(config.headers.unwrap().len(), 2);
	}
}
