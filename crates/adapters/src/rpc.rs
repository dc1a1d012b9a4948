//! Minimal Ethereum JSON-RPC client (`eth_call` and friends) over reqwest

use alloy_primitives::{Address, Bytes};
use kite_types::{AdapterError, AdapterResult, VendorRuntimeConfig};
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

use crate::client_cache::{ClientCache, ClientConfig};

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
	jsonrpc: &'static str,
	id: u64,
	method: &'a str,
	params: Value,
}

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
	result: Option<T>,
	error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
	code: i64,
	message: String,
}

/// JSON-RPC endpoint for a single chain
///
/// Endpoint URLs often embed an API key, so they are never logged.
#[derive(Clone)]
pub struct JsonRpcClient {
	url: String,
	client: Arc<Client>,
	next_id: Arc<AtomicU64>,
}

impl JsonRpcClient {
	pub fn new(url: impl Into<String>, cache: &ClientCache) -> AdapterResult<Self> {
		// One pooled client serves every RPC endpoint
		let client = cache.get_client(&ClientConfig::from(&VendorRuntimeConfig::new(
			"json-rpc", "json-rpc",
		)))?;
		Ok(Self {
			url: url.into(),
			client,
			next_id: Arc::new(AtomicU64::new(1)),
		})
	}

	/// Issue a JSON-RPC call and decode its `result`
	pub async fn request<T: DeserializeOwned>(&self, method: &str, params: Value) -> AdapterResult<T> {
		let body = RpcRequest {
			jsonrpc: "2.0",
			id: self.next_id.fetch_add(1, Ordering::Relaxed),
			method,
			params,
		};

		let response = self
			.client
			.post(&self.url)
			.json(&body)
			.send()
			.await
			.map_err(AdapterError::HttpError)?;

		let status = response.status();
		if !status.is_success() {
			let text = response.text().await.unwrap_or_default();
			return Err(AdapterError::from_http_failure(status.as_u16(), &text));
		}

		let parsed: RpcResponse<T> = response.json().await.map_err(|e| {
			AdapterError::invalid_response(format!("Malformed {} response: {}", method, e))
		})?;

		if let Some(error) = parsed.error {
			return Err(AdapterError::RpcError {
				code: error.code,
				message: error.message,
			});
		}
		parsed
			.result
			.ok_or_else(|| AdapterError::invalid_response(format!("{} returned no result", method)))
	}

	/// `eth_call` against the latest block
	pub async fn eth_call(&self, to: Address, data: Bytes) -> AdapterResult<Bytes> {
		debug!("eth_call {} ({} bytes)", to, data.len());
		self.request(
			"eth_call",
			json!([{ "to": to.to_string(), "data": format!("0x{}", hex::encode(&data)) }, "latest"]),
		)
		.await
	}
}

/// JSON-RPC clients per chain id
#[derive(Clone, Default)]
pub struct RpcProviders {
	clients: HashMap<u64, JsonRpcClient>,
}

impl RpcProviders {
	pub fn new(urls: &HashMap<u64, String>, cache: &ClientCache) -> AdapterResult<Self> {
		let clients = urls
			.iter()
			.map(|(chain_id, url)| Ok((*chain_id, JsonRpcClient::new(url.clone(), cache)?)))
			.collect::<AdapterResult<HashMap<_, _>>>()?;
		Ok(Self { clients })
	}

	pub fn get(&self, chain_id: u64) -> AdapterResult<&JsonRpcClient> {
		self.clients
			.get(&chain_id)
			.ok_or(AdapterError::ChainNotSupported { chain_id })
	}

	pub fn supports(&self, chain_id: u64) -> bool {
		self.clients.contains_key(&chain_id)
	}
}

impl fmt::Debug for JsonRpcClient {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("JsonRpcClient").finish_non_exhaustive()
	}
}

impl fmt::Debug for RpcProviders {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut chains: Vec<_> = self.clients.keys().collect();
		chains.sort();
		f.debug_struct("RpcProviders").field("chains", &chains).finish()
	}
}

/// Parse a 0x-prefixed address, mapping failures to an adapter error
pub fn parse_address(value: &str) -> AdapterResult<Address> {
	value
		.trim()
		.parse::<Address>()
		.map_err(|e| AdapterError::Abi(format!("invalid address '{}': {}", value, e)))
}
