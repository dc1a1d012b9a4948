//! LI.FI adapter implementation
//!
//! Quotes routes through the LI.FI REST API and drives their execution. This
//! adapter uses the client cache for connection pooling and keep-alive.

pub mod executor;
pub mod models;

pub use executor::LifiExecutor;

use async_trait::async_trait;
use kite_types::{
	AdapterError, AdapterResult, ComposerQuoteRequest, Route, RoutingClient, SecretString,
	Token, ValidatedRouteRequest, VendorRuntimeConfig,
};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::client_cache::{build_client, AuthConfig, ClientCache, ClientConfig};
use models::{LifiRouteOptions, LifiRoutesRequest, LifiRoutesResponse, LifiStep};

/// Header carrying the LI.FI API key
pub const API_KEY_HEADER: &str = "x-lifi-api-key";

/// Explicit LI.FI client configuration, built once at startup
#[derive(Debug, Clone)]
pub struct LifiConfig {
	pub endpoint: String,
	pub api_key: Option<SecretString>,
	pub integrator: String,
	/// Vendor ordering preference (`CHEAPEST`, `FASTEST`)
	pub order: String,
	pub default_slippage: f64,
	pub request_timeout_ms: u64,
	pub status_poll_interval_ms: u64,
}

impl Default for LifiConfig {
	fn default() -> Self {
		Self {
			endpoint: "https://li.quest/v1".to_string(),
			api_key: None,
			integrator: "kite".to_string(),
			order: "CHEAPEST".to_string(),
			default_slippage: 0.005,
			request_timeout_ms: 30_000,
			status_poll_interval_ms: 5_000,
		}
	}
}

impl LifiConfig {
	fn runtime(&self) -> VendorRuntimeConfig {
		VendorRuntimeConfig::new("lifi", self.endpoint.clone())
			.with_header("x-lifi-integrator", self.integrator.clone())
	}

	fn auth(&self) -> AuthConfig {
		match &self.api_key {
			Some(key) if !key.is_empty() => AuthConfig::api_key(API_KEY_HEADER, key.clone()),
			_ => AuthConfig::None,
		}
	}
}

#[derive(Debug)]
enum ClientStrategy {
	/// Shared client cache for connection reuse
	Cached(ClientCache),
	/// Fresh client per request
	OnDemand,
}

/// LI.FI routing client
#[derive(Debug)]
pub struct LifiAdapter {
	config: LifiConfig,
	client_strategy: ClientStrategy,
}

impl LifiAdapter {
	pub fn new(config: LifiConfig, cache: ClientCache) -> Self {
		Self {
			config,
			client_strategy: ClientStrategy::Cached(cache),
		}
	}

	pub fn without_cache(config: LifiConfig) -> Self {
		Self {
			config,
			client_strategy: ClientStrategy::OnDemand,
		}
	}

	pub fn config(&self) -> &LifiConfig {
		&self.config
	}

	fn get_client(&self) -> AdapterResult<Arc<Client>> {
		let runtime = self.config.runtime();
		let auth = self.config.auth();
		match &self.client_strategy {
			ClientStrategy::Cached(cache) => {
				cache.get_client_with_auth(&runtime, &auth, self.config.request_timeout_ms)
			},
			ClientStrategy::OnDemand => {
				let mut client_config = ClientConfig::from(&runtime)
					.with_request_timeout_ms(self.config.request_timeout_ms);
				if let AuthConfig::ApiKey { header, key } = auth {
					client_config
						.headers
						.push((header, key.expose_secret().to_string()));
				}
				build_client(&client_config).map(Arc::new)
			},
		}
	}

	fn url(&self, path: &str) -> String {
		self.config.runtime().url(path)
	}

	fn slippage(&self, request: &ValidatedRouteRequest) -> f64 {
		request.slippage.unwrap_or(self.config.default_slippage)
	}

	/// Send a request and decode a JSON body, mapping vendor failures
	async fn send_json<T: DeserializeOwned>(&self, what: &str, builder: RequestBuilder) -> AdapterResult<T> {
		let response = builder.send().await.map_err(AdapterError::HttpError)?;

		let status = response.status();
		if !status.is_success() {
			let body = response.text().await.unwrap_or_default();
			debug!("LI.FI {} failed with {}: {}", what, status, body);
			return Err(AdapterError::from_http_failure(status.as_u16(), &body));
		}

		response.json::<T>().await.map_err(|e| {
			AdapterError::invalid_response(format!("Failed to parse LI.FI {} response: {}", what, e))
		})
	}

	pub(crate) async fn post<T: DeserializeOwned>(&self, what: &str, path: &str, body: &Value) -> AdapterResult<T> {
		let client = self.get_client()?;
		self.send_json(what, client.post(self.url(path)).json(body)).await
	}

	pub(crate) async fn get<T: DeserializeOwned>(
		&self,
		what: &str,
		path: &str,
		query: &[(&str, String)],
	) -> AdapterResult<T> {
		let client = self.get_client()?;
		self.send_json(what, client.get(self.url(path)).query(query)).await
	}

	/// Decode a single step answer into a one-step route
	fn step_to_route(raw: Value) -> AdapterResult<Route> {
		let step = LifiStep::from_value(&raw)?;
		Ok(step.into_route(raw))
	}
}

#[async_trait]
impl RoutingClient for LifiAdapter {
	async fn get_routes(&self, request: &ValidatedRouteRequest) -> AdapterResult<Vec<Route>> {
		let body = LifiRoutesRequest {
			from_chain_id: request.from_token.chain_id,
			from_amount: request.from_amount.to_string(),
			from_token_address: request.from_token.address.clone(),
			from_address: request.from_address.clone(),
			to_chain_id: request.to_token.chain_id,
			to_token_address: request.to_token.address.clone(),
			to_address: request.to_address.clone(),
			options: LifiRouteOptions {
				slippage: self.slippage(request),
				order: self.config.order.clone(),
				integrator: self.config.integrator.clone(),
			},
		};

		debug!(
			"Requesting LI.FI routes {}:{} -> {}:{} for {}",
			body.from_chain_id,
			body.from_token_address,
			body.to_chain_id,
			body.to_token_address,
			body.from_amount
		);

		let response: LifiRoutesResponse = self
			.post("routes", "/advanced/routes", &serde_json::to_value(&body)?)
			.await?;

		let total = response.routes.len();
		let routes: Vec<Route> = response
			.routes
			.into_iter()
			.filter_map(|route| match route.into_route() {
				Ok(route) => Some(route),
				Err(e) => {
					warn!("Skipping unusable LI.FI route: {}", e);
					None
				},
			})
			.collect();

		debug!("LI.FI returned {} routes ({} usable)", total, routes.len());
		Ok(routes)
	}

	async fn get_composer_quote(&self, quote: &ComposerQuoteRequest) -> AdapterResult<Route> {
		let request = &quote.request;
		let slippage = self.slippage(request);

		let raw: Value = match &quote.contract_call {
			None => {
				debug!(
					"Requesting LI.FI composer quote into vault {} on chain {}",
					quote.vault, request.to_token.chain_id
				);
				self.get(
					"quote",
					"/quote",
					&[
						("fromChain", request.from_token.chain_id.to_string()),
						("toChain", request.to_token.chain_id.to_string()),
						("fromToken", request.from_token.address.clone()),
						("toToken", quote.vault.clone()),
						("fromAmount", request.from_amount.to_string()),
						("fromAddress", request.from_address.clone()),
						("toAddress", request.to_address.clone()),
						("slippage", slippage.to_string()),
						("order", self.config.order.clone()),
						("integrator", self.config.integrator.clone()),
					],
				)
				.await?
			},
			Some(call) => {
				debug!(
					"Requesting LI.FI contract-call quote via {} into vault {}",
					call.to_contract_address, quote.vault
				);
				let body = json!({
					"fromChain": request.from_token.chain_id,
					"fromToken": request.from_token.address,
					"fromAddress": request.from_address,
					"fromAmount": request.from_amount.to_string(),
					"toChain": request.to_token.chain_id,
					"toToken": request.to_token.address,
					"toFallbackAddress": request.to_address,
					"contractCalls": [call],
					"slippage": slippage,
					"integrator": self.config.integrator,
				});
				self.post("contract-call quote", "/quote/contractCalls", &body)
					.await?
			},
		};

		Self::step_to_route(raw)
	}

	async fn get_token(&self, chain_id: u64, token: &str) -> AdapterResult<Token> {
		self.get(
			"token",
			"/token",
			&[("chain", chain_id.to_string()), ("token", token.to_string())],
		)
		.await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::time::Duration;

	#[test]
	fn test_lifi_adapter_construction_patterns() {
		let adapter = LifiAdapter::new(LifiConfig::default(), ClientCache::new());
		assert!(matches!(adapter.client_strategy, ClientStrategy::Cached(_)));

		let custom = ClientCache::with_ttl(Duration::from_secs(60));
		let adapter = LifiAdapter::new(LifiConfig::default(), custom);
		assert!(adapter.get_client().is_ok());

		let on_demand = LifiAdapter::without_cache(LifiConfig::default());
		assert!(matches!(on_demand.client_strategy, ClientStrategy::OnDemand));
		assert!(on_demand.get_client().is_ok());
	}

	#[test]
	fn test_api_key_only_sent_when_configured() {
		let mut config = LifiConfig::default();
		assert!(matches!(config.auth(), AuthConfig::None));

		config.api_key = Some(SecretString::from(""));
		assert!(matches!(config.auth(), AuthConfig::None));

		config.api_key = Some(SecretString::from("lifi-key"));
		assert!(matches!(config.auth(), AuthConfig::ApiKey { .. }));
	}

	#[test]
	fn test_urls() {
		let adapter = LifiAdapter::without_cache(LifiConfig {
			endpoint: "https://li.quest/v1/".to_string(),
			..LifiConfig::default()
		});
		assert_eq!(adapter.url("/quote/contractCalls"), "https://li.quest/v1/quote/contractCalls");
	}

	#[test]
	fn test_request_slippage_overrides_default() {
		use kite_types::{RouteRequest, TokenRef};

		let adapter = LifiAdapter::without_cache(LifiConfig::default());
		let mut request = RouteRequest {
			from_token: Some(TokenRef::new(1, "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48")),
			to_token: Some(TokenRef::new(8453, "0x833589fcd6edb6e08f4c7c32d4f71b54bda02913")),
			from_amount: "1000000".into(),
			from_address: Some("0x1111111111111111111111111111111111111111".to_string()),
			to_address: Some("0x2222222222222222222222222222222222222222".to_string()),
			..Default::default()
		};
		let validated = request.validate().unwrap();
		assert_eq!(adapter.slippage(&validated), 0.005);

		request.slippage = Some(0.01);
		assert_eq!(adapter.slippage(&request.validate().unwrap()), 0.01);
	}
}
