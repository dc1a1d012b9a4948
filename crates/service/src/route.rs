//! Route acquisition: composer branch, fallback and ranking

use std::collections::HashMap;
use std::sync::Arc;

use kite_types::{
	sort_routes_by_best, AdapterError, ComposerQuoteRequest, Route, RouteAcquisition, RouteError,
	RouteRequest, RouteResult, RouteSource, RoutingClient, TokenAmount, ValidatedRouteRequest,
};
use tracing::{debug, info, warn};

use crate::calldata::build_contract_call;
use crate::vault::VaultRegistry;

/// Acquires ranked routes from the routing vendor
#[derive(Debug, Clone)]
pub struct RouteService {
	client: Arc<dyn RoutingClient>,
	vaults: VaultRegistry,
	kite_safes: HashMap<u64, String>,
}

impl RouteService {
	pub fn new(
		client: Arc<dyn RoutingClient>,
		vaults: VaultRegistry,
		kite_safes: HashMap<u64, String>,
	) -> Self {
		Self {
			client,
			vaults,
			kite_safes,
		}
	}

	pub fn vaults(&self) -> &VaultRegistry {
		&self.vaults
	}

	/// Validate `request` and acquire routes for it
	///
	/// Invalid requests are rejected before the vendor is contacted.
	pub async fn acquire(&self, request: &RouteRequest) -> RouteResult<RouteAcquisition> {
		let validated = request.validate()?;
		self.acquire_validated(&validated).await
	}

	pub async fn acquire_validated(
		&self,
		request: &ValidatedRouteRequest,
	) -> RouteResult<RouteAcquisition> {
		let to_chain = request.to_token.chain_id;

		let (routes, source) = match request.vault_address.as_deref() {
			Some(vault) if self.vaults.is_known(to_chain, vault) => {
				match self.composer_route(request, vault).await {
					Ok(route) => (vec![route], RouteSource::Composer),
					Err(e) => {
						warn!(
							"Composer quote for vault {} on chain {} failed, falling back to plain transfer routes: {}",
							vault, to_chain, e
						);
						(
							self.client.get_routes(request).await?,
							RouteSource::FallbackAfterComposerFailure,
						)
					},
				}
			},
			Some(vault) => {
				debug!(
					"Vault {} is not known on chain {}, requesting plain transfer routes",
					vault, to_chain
				);
				(self.client.get_routes(request).await?, RouteSource::Direct)
			},
			None => (self.client.get_routes(request).await?, RouteSource::Direct),
		};

		let routes: Vec<Route> = routes.into_iter().filter(Route::is_executable).collect();
		if routes.is_empty() {
			return Err(RouteError::NoRoutes);
		}

		info!(
			"Acquired {} route(s) from chain {} to chain {} ({:?})",
			routes.len(),
			request.from_token.chain_id,
			to_chain,
			source
		);

		Ok(RouteAcquisition {
			routes: sort_routes_by_best(routes),
			source,
		})
	}

	async fn composer_route(
		&self,
		request: &ValidatedRouteRequest,
		vault: &str,
	) -> kite_types::AdapterResult<Route> {
		let to_chain = request.to_token.chain_id;
		let contract_call = match self.kite_safes.get(&to_chain) {
			Some(kite_safe) => {
				let deposit_amount = self.guaranteed_arrival(request).await?;
				Some(build_contract_call(request, vault, kite_safe, &deposit_amount)?)
			},
			None => None,
		};

		debug!(
			"Requesting composer quote for vault {} on chain {} (kite safe: {})",
			vault,
			to_chain,
			contract_call.is_some()
		);

		self.client
			.get_composer_quote(&ComposerQuoteRequest {
				request: request.clone(),
				vault: vault.to_string(),
				contract_call,
			})
			.await
	}

	/// Minimum amount of the destination token the best plain route delivers
	///
	/// KiteSafe deposits exactly this much, so the payload never asks for
	/// more than the bridge guarantees.
	async fn guaranteed_arrival(
		&self,
		request: &ValidatedRouteRequest,
	) -> kite_types::AdapterResult<TokenAmount> {
		let routes: Vec<Route> = self
			.client
			.get_routes(request)
			.await?
			.into_iter()
			.filter(Route::is_executable)
			.collect();
		let best = sort_routes_by_best(routes)
			.into_iter()
			.next()
			.ok_or_else(|| AdapterError::NotFound {
				what: format!(
					"route to {} on chain {}",
					request.to_token.address, request.to_token.chain_id
				),
			})?;

		debug!(
			"Best plain route {} guarantees {} of {} on arrival",
			best.id, best.to_amount_min, best.to_token.symbol
		);
		Ok(best.to_amount_min)
	}
}
