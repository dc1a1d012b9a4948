//! Route models: the vendor plan normalized into a display/execution model

pub mod errors;
pub mod request;

pub use errors::{RequestValidationError, RequestValidationResult, RouteError, RouteResult};
pub use request::{RouteRequest, RouteRequestKey, ValidatedRouteRequest};

use serde::{Deserialize, Serialize};

use crate::models::{Token, TokenAmount};

/// Logical role of a route step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepKind {
	Swap,
	Bridge,
	ContractCall,
}

impl StepKind {
	/// Classify a vendor step from its type tag and the types of its included steps
	///
	/// Composite steps are classified by the most significant thing they do:
	/// a contract call (vault deposit) beats a bridge, which beats a swap.
	pub fn from_vendor(step_type: &str, included_types: &[&str]) -> Self {
		let classify = |t: &str| match t {
			"cross" => Some(StepKind::Bridge),
			"swap" => Some(StepKind::Swap),
			"protocol" | "custom" | "contractCall" => Some(StepKind::ContractCall),
			_ => None,
		};

		if let Some(kind) = classify(step_type) {
			return kind;
		}

		let kinds: Vec<StepKind> = included_types.iter().filter_map(|t| classify(t)).collect();
		if kinds.contains(&StepKind::ContractCall) {
			StepKind::ContractCall
		} else if kinds.contains(&StepKind::Bridge) {
			StepKind::Bridge
		} else {
			StepKind::Swap
		}
	}

	pub fn label(&self) -> &'static str {
		match self {
			StepKind::Swap => "Swap",
			StepKind::Bridge => "Bridge",
			StepKind::ContractCall => "Deposit",
		}
	}
}

/// A single step of a route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteStep {
	pub id: String,
	pub kind: StepKind,
	pub tool: String,
	pub tool_name: String,
	pub from_chain_id: u64,
	pub to_chain_id: u64,
	pub from_token: Token,
	pub to_token: Token,
	pub from_amount: TokenAmount,
	pub to_amount: TokenAmount,
	pub to_amount_min: TokenAmount,
	/// Estimated duration in seconds
	pub execution_duration: f64,
	pub gas_cost_usd: f64,
	/// Opaque vendor payload, handed back to the vendor at execution time
	#[serde(default)]
	pub vendor: serde_json::Value,
}

impl RouteStep {
	pub fn is_cross_chain(&self) -> bool {
		self.from_chain_id != self.to_chain_id
	}
}

/// A vendor-computed plan converting one token into another
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
	pub id: String,
	pub from_chain_id: u64,
	pub to_chain_id: u64,
	pub from_token: Token,
	pub to_token: Token,
	pub from_amount: TokenAmount,
	pub to_amount: TokenAmount,
	pub to_amount_min: TokenAmount,
	#[serde(rename = "fromAmountUSD", default)]
	pub from_amount_usd: Option<String>,
	#[serde(rename = "toAmountUSD", default)]
	pub to_amount_usd: Option<String>,
	#[serde(rename = "gasCostUSD")]
	pub gas_cost_usd: f64,
	pub steps: Vec<RouteStep>,
	#[serde(default)]
	pub tags: Vec<String>,
}

impl Route {
	/// A route without steps can be neither displayed nor executed
	pub fn is_executable(&self) -> bool {
		!self.steps.is_empty()
	}

	/// Total estimated duration in seconds
	pub fn execution_duration(&self) -> f64 {
		self.steps.iter().map(|s| s.execution_duration).sum()
	}

	/// Cost score, lower is better: gas cost in USD plus seconds / 100
	///
	/// Unusable vendor figures (NaN, infinite) score as infinitely expensive.
	pub fn score(&self) -> f64 {
		let score = self.gas_cost_usd + self.execution_duration() / 100.0;
		if score.is_finite() {
			score
		} else {
			f64::INFINITY
		}
	}

	pub fn ends_with_contract_call(&self) -> bool {
		self.steps
			.last()
			.map(|s| s.kind == StepKind::ContractCall)
			.unwrap_or(false)
	}
}

/// Stable sort by ascending [`Route::score`]; ties keep vendor order
pub fn sort_routes_by_best(mut routes: Vec<Route>) -> Vec<Route> {
	routes.sort_by(|a, b| a.score().total_cmp(&b.score()));
	routes
}

/// Which vendor call produced the routes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RouteSource {
	/// General multi-route request
	Direct,
	/// Single composer quote targeting a known vault
	Composer,
	/// Composer quote failed; routes are plain transfers and no vault deposit will happen
	FallbackAfterComposerFailure,
}

/// Result of a route acquisition
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteAcquisition {
	pub routes: Vec<Route>,
	pub source: RouteSource,
}

impl RouteAcquisition {
	pub fn best(&self) -> Option<&Route> {
		self.routes.first()
	}

	/// The user asked for a vault deposit but the routes will not perform one
	pub fn vault_deposit_dropped(&self) -> bool {
		self.source == RouteSource::FallbackAfterComposerFailure
	}
}
