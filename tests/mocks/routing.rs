//! Mock routing vendor and execution primitive

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use kite_router::async_trait::async_trait;
use kite_router::types::{
	AdapterResult, ComposerQuoteRequest, ExecutionHooks, StepUpdate, Token, TokenAmount,
	ValidatedRouteRequest, VendorStepStatus,
};
use kite_router::{
	AdapterError, ExecutionError, Route, RouteExecutor, RoutingClient, WalletClient,
};
use tokio::sync::Semaphore;

use super::fixtures::{bridge_route, tx_hash, vault_route};

/// Routing client with call tracking and an optional gate
///
/// Without fixed routes, `get_routes` answers with one route whose id is the
/// requested amount, so tests can tell which request was served. With a gate,
/// every vendor call waits for a permit before answering.
#[derive(Debug, Default)]
pub struct MockRoutingClient {
	routes: Mutex<Option<Vec<Route>>>,
	pub route_calls: AtomicUsize,
	pub composer_calls: AtomicUsize,
	pub fail_routes: AtomicBool,
	pub fail_composer: AtomicBool,
	pub requests: Mutex<Vec<ValidatedRouteRequest>>,
	pub composer_requests: Mutex<Vec<ComposerQuoteRequest>>,
	gate: Option<Arc<Semaphore>>,
}

impl MockRoutingClient {
	pub fn new() -> Self {
		Self::default()
	}

	/// Client whose calls block until [`MockRoutingClient::release`] grants a permit
	pub fn gated() -> Self {
		Self {
			gate: Some(Arc::new(Semaphore::new(0))),
			..Self::default()
		}
	}

	pub fn with_routes(routes: Vec<Route>) -> Self {
		let client = Self::default();
		*client.routes.lock().unwrap() = Some(routes);
		client
	}

	pub fn release(&self, calls: usize) {
		if let Some(gate) = &self.gate {
			gate.add_permits(calls);
		}
	}

	pub fn route_calls(&self) -> usize {
		self.route_calls.load(Ordering::SeqCst)
	}

	pub fn composer_calls(&self) -> usize {
		self.composer_calls.load(Ordering::SeqCst)
	}

	async fn pass_gate(&self) {
		if let Some(gate) = &self.gate {
			gate.acquire().await.expect("gate closed").forget();
		}
	}
}

#[async_trait]
impl RoutingClient for MockRoutingClient {
	async fn get_routes(&self, request: &ValidatedRouteRequest) -> AdapterResult<Vec<Route>> {
		self.route_calls.fetch_add(1, Ordering::SeqCst);
		self.requests.lock().unwrap().push(request.clone());
		self.pass_gate().await;

		if self.fail_routes.load(Ordering::SeqCst) {
			return Err(AdapterError::from_http_failure(503, ""));
		}
		let fixed = self.routes.lock().unwrap().clone();
		Ok(fixed.unwrap_or_else(|| vec![bridge_route(request.from_amount.as_str(), 0.5)]))
	}

	async fn get_composer_quote(&self, request: &ComposerQuoteRequest) -> AdapterResult<Route> {
		self.composer_calls.fetch_add(1, Ordering::SeqCst);
		self.composer_requests.lock().unwrap().push(request.clone());
		self.pass_gate().await;

		if self.fail_composer.load(Ordering::SeqCst) {
			return Err(AdapterError::VendorError {
				code: "1002".to_string(),
				message: "No available quotes for the requested transfer".to_string(),
			});
		}
		Ok(vault_route("composer"))
	}

	async fn get_token(&self, chain_id: u64, token: &str) -> AdapterResult<Token> {
		Ok(Token::new(token, chain_id, "USDC", 6))
	}
}

/// What the mock executor does for one step
#[derive(Debug, Clone, Default)]
pub struct ScriptedStep {
	/// Chain the wallet must be on before the step runs
	pub chain_id: Option<u64>,
	/// (old, new) guaranteed output reported mid-step
	pub rate_change: Option<(String, String)>,
	/// Receiving-chain hash reported on completion
	pub receiving_hash: Option<String>,
	pub fail: Option<String>,
}

/// Execution primitive following a fixed script
#[derive(Debug, Default)]
pub struct MockExecutor {
	script: Vec<ScriptedStep>,
	hold: Option<Arc<Semaphore>>,
	pub runs: AtomicUsize,
}

impl MockExecutor {
	pub fn new(script: Vec<ScriptedStep>) -> Self {
		Self {
			script,
			..Self::default()
		}
	}

	/// Executor that blocks before its first step until [`MockExecutor::release`]
	pub fn held(script: Vec<ScriptedStep>) -> Self {
		Self {
			script,
			hold: Some(Arc::new(Semaphore::new(0))),
			..Self::default()
		}
	}

	pub fn release(&self) {
		if let Some(hold) = &self.hold {
			hold.add_permits(1);
		}
	}
}

#[async_trait]
impl RouteExecutor for MockExecutor {
	async fn execute_route(
		&self,
		route: &Route,
		wallet: &dyn WalletClient,
		hooks: &dyn ExecutionHooks,
	) -> Result<(), ExecutionError> {
		self.runs.fetch_add(1, Ordering::SeqCst);
		if let Some(hold) = &self.hold {
			hold.acquire().await.expect("hold closed").forget();
		}

		for (index, step) in route.steps.iter().enumerate() {
			let script = self.script.get(index).cloned().unwrap_or_default();

			if let Some(chain_id) = script.chain_id {
				if wallet.chain_id().await? != chain_id {
					hooks.switch_chain(chain_id).await?;
				}
			}

			hooks.update_route(StepUpdate::new(index, VendorStepStatus::Pending));

			if let Some((old, new)) = &script.rate_change {
				if !hooks
					.accept_exchange_rate_update(index, &TokenAmount::from(old.as_str()), &TokenAmount::from(new.as_str()))
					.await
				{
					return Err(ExecutionError::RateRejected);
				}
			}

			hooks.update_route(
				StepUpdate::new(index, VendorStepStatus::ActionRequired)
					.with_message(format!("Confirm {} in your wallet", step.tool_name)),
			);

			if let Some(reason) = &script.fail {
				hooks.update_route(StepUpdate::new(index, VendorStepStatus::Failed));
				return Err(ExecutionError::StepFailed {
					step_index: index,
					reason: reason.clone(),
				});
			}

			hooks.update_route(
				StepUpdate::new(index, VendorStepStatus::Done)
					.with_tx_hash(tx_hash(index as u64 + 1))
					.with_receiving_tx_hash(script.receiving_hash.clone()),
			);
		}
		Ok(())
	}
}
