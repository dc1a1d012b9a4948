//! HTTP client cache for connection reuse
//!
//! Provides per-vendor client instances with connection pooling and keep-alive.
//! The cache is an explicit value handed to each adapter at construction; there
//! is no process-wide instance.

use dashmap::DashMap;
use kite_types::{AdapterError, AdapterResult, SecretString, VendorRuntimeConfig};
use reqwest::{Client, ClientBuilder};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Configuration for creating HTTP clients
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientConfig {
	pub base_url: String,
	/// Vendor identifier for cache differentiation
	pub vendor_id: String,
	pub max_idle_per_host: usize,
	pub keep_alive_timeout_ms: u64,
	/// Whole-request timeout; 0 disables it
	pub request_timeout_ms: u64,
	pub headers: Vec<(String, String)>,
}

impl From<&VendorRuntimeConfig> for ClientConfig {
	fn from(vendor_config: &VendorRuntimeConfig) -> Self {
		let mut headers = vec![
			("User-Agent".to_string(), "Kite-Router/1.0".to_string()),
			("Content-Type".to_string(), "application/json".to_string()),
			("Accept".to_string(), "application/json".to_string()),
		];

		if let Some(vendor_headers) = &vendor_config.headers {
			let mut extra: Vec<_> = vendor_headers
				.iter()
				.map(|(k, v)| (k.clone(), v.clone()))
				.collect();
			// HashMap order is random; keep cache keys stable
			extra.sort();
			headers.extend(extra);
		}

		Self {
			base_url: vendor_config.endpoint.clone(),
			vendor_id: vendor_config.vendor_id.clone(),
			max_idle_per_host: 10,
			keep_alive_timeout_ms: 90_000,
			request_timeout_ms: 30_000,
			headers,
		}
	}
}

impl ClientConfig {
	pub fn with_request_timeout_ms(mut self, timeout_ms: u64) -> Self {
		self.request_timeout_ms = timeout_ms;
		self
	}
}

/// Authentication applied on top of a vendor's base headers
#[derive(Debug, Clone)]
pub enum AuthConfig {
	None,
	/// API key sent in a vendor-specific header
	ApiKey { header: String, key: SecretString },
}

impl AuthConfig {
	pub fn api_key(header: &str, key: SecretString) -> Self {
		Self::ApiKey {
			header: header.to_string(),
			key,
		}
	}
}

#[derive(Debug, Clone)]
struct CachedClient {
	client: Arc<Client>,
	created_at: Instant,
}

impl CachedClient {
	fn new(client: Client) -> Self {
		Self {
			client: Arc::new(client),
			created_at: Instant::now(),
		}
	}

	fn is_expired(&self, ttl: Duration) -> bool {
		self.created_at.elapsed() > ttl
	}
}

/// Thread-safe cache of HTTP clients keyed by their configuration, with TTL
#[derive(Clone, Debug)]
pub struct ClientCache {
	clients: Arc<DashMap<ClientConfig, CachedClient>>,
	ttl: Duration,
}

impl ClientCache {
	/// New cache with a 30-minute TTL
	pub fn new() -> Self {
		Self::with_ttl(Duration::from_secs(30 * 60))
	}

	pub fn with_ttl(ttl: Duration) -> Self {
		Self {
			clients: Arc::new(DashMap::new()),
			ttl,
		}
	}

	/// Get or create a client for the given configuration
	///
	/// An expired entry is rebuilt in place. The shard lock is held while the
	/// client is built, so concurrent callers end up sharing one client.
	pub fn get_client(&self, config: &ClientConfig) -> AdapterResult<Arc<Client>> {
		use dashmap::mapref::entry::Entry;

		match self.clients.entry(config.clone()) {
			Entry::Occupied(mut entry) => {
				let age = entry.get().created_at.elapsed();
				if !entry.get().is_expired(self.ttl) {
					debug!("Reusing {} client (age: {:?})", config.vendor_id, age);
					return Ok(entry.get().client.clone());
				}
				warn!("Rebuilding {} client for {} after {:?}", config.vendor_id, config.base_url, age);
				let fresh = CachedClient::new(build_client(config)?);
				let client = fresh.client.clone();
				entry.insert(fresh);
				Ok(client)
			},
			Entry::Vacant(entry) => {
				debug!("Creating {} client for {}", config.vendor_id, config.base_url);
				let fresh = CachedClient::new(build_client(config)?);
				Ok(entry.insert(fresh).client.clone())
			},
		}
	}

	/// Get or create a client with authentication headers applied
	pub fn get_client_with_auth(
		&self,
		vendor_config: &VendorRuntimeConfig,
		auth_config: &AuthConfig,
		request_timeout_ms: u64,
	) -> AdapterResult<Arc<Client>> {
		let mut config =
			ClientConfig::from(vendor_config).with_request_timeout_ms(request_timeout_ms);

		if let AuthConfig::ApiKey { header, key } = auth_config {
			config
				.headers
				.push((header.clone(), key.expose_secret().to_string()));
		}

		self.get_client(&config)
	}

	/// Drop expired clients and return how many went
	pub fn cleanup_expired(&self) -> usize {
		let before = self.clients.len();
		self.clients.retain(|_, cached| !cached.is_expired(self.ttl));
		let removed = before.saturating_sub(self.clients.len());
		if removed > 0 {
			debug!("Evicted {} idle HTTP clients", removed);
		}
		removed
	}

	pub fn len(&self) -> usize {
		self.clients.len()
	}

	pub fn is_empty(&self) -> bool {
		self.clients.is_empty()
	}

	pub fn ttl(&self) -> Duration {
		self.ttl
	}
}

impl Default for ClientCache {
	fn default() -> Self {
		Self::new()
	}
}

/// Build a client with pooling, keep-alive and default headers
pub(crate) fn build_client(config: &ClientConfig) -> AdapterResult<Client> {
	let mut builder = ClientBuilder::new()
		.pool_max_idle_per_host(config.max_idle_per_host)
		.pool_idle_timeout(Duration::from_millis(config.keep_alive_timeout_ms))
		.tcp_keepalive(Duration::from_secs(60));

	if config.request_timeout_ms > 0 {
		builder = builder.timeout(Duration::from_millis(config.request_timeout_ms));
	}

	let mut header_map = reqwest::header::HeaderMap::new();
	for (key, value) in &config.headers {
		match (
			reqwest::header::HeaderName::from_bytes(key.as_bytes()),
			reqwest::header::HeaderValue::from_str(value),
		) {
			(Ok(name), Ok(value)) => {
				header_map.insert(name, value);
			},
			_ => warn!("Skipping invalid header '{}' for {}", key, config.vendor_id),
		}
	}

	builder
		.default_headers(header_map)
		.build()
		.map_err(AdapterError::HttpError)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn config(base_url: &str) -> ClientConfig {
		ClientConfig::from(&VendorRuntimeConfig::new("test-vendor", base_url))
	}

	#[test]
	fn test_client_config_from_runtime_config() {
		let runtime = VendorRuntimeConfig::new("lifi", "https://li.quest/v1")
			.with_header("x-lifi-integrator", "kite");
		let client_config = ClientConfig::from(&runtime);

		assert_eq!(client_config.base_url, "https://li.quest/v1");
		assert_eq!(client_config.max_idle_per_host, 10);
		assert!(client_config
			.headers
			.contains(&("x-lifi-integrator".to_string(), "kite".to_string())));
	}

	#[tokio::test]
	async fn test_client_cache_reuse() {
		let cache = ClientCache::new();
		let config = config("https://reuse.example");

		let client1 = cache.get_client(&config).unwrap();
		let client2 = cache.get_client(&config).unwrap();
		assert!(Arc::ptr_eq(&client1, &client2));
		assert_eq!(cache.len(), 1);
	}

	#[tokio::test]
	async fn test_client_cache_ttl_expiration() {
		let cache = ClientCache::with_ttl(Duration::from_millis(50));
		let config = config("https://ttl.example");

		let client1 = cache.get_client(&config).unwrap();
		tokio::time::sleep(Duration::from_millis(100)).await;
		let client2 = cache.get_client(&config).unwrap();

		assert!(!Arc::ptr_eq(&client1, &client2));
	}

	#[tokio::test]
	async fn test_api_key_gets_its_own_client() {
		let cache = ClientCache::new();
		let runtime = VendorRuntimeConfig::new("lifi", "https://li.quest/v1");

		let anonymous = cache
			.get_client_with_auth(&runtime, &AuthConfig::None, 30_000)
			.unwrap();
		let keyed = AuthConfig::api_key("x-lifi-api-key", SecretString::from("key-1"));
		let with_key = cache.get_client_with_auth(&runtime, &keyed, 30_000).unwrap();
		let with_key_again = cache.get_client_with_auth(&runtime, &keyed, 30_000).unwrap();

		assert!(!Arc::ptr_eq(&anonymous, &with_key));
		assert!(Arc::ptr_eq(&with_key, &with_key_again));
	}

	#[tokio::test]
	async fn test_cleanup_expired() {
		let cache = ClientCache::with_ttl(Duration::from_millis(10));
		cache.get_client(&config("https://a.example")).unwrap();
		cache.get_client(&config("https://b.example")).unwrap();
		tokio::time::sleep(Duration::from_millis(30)).await;

		assert_eq!(cache.cleanup_expired(), 2);
		assert!(cache.is_empty());
	}
}
