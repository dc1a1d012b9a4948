//! LI.FI API wire models and their conversion into route models

use kite_types::{
	AdapterError, AdapterResult, Route, RouteStep, StepKind, Token, TokenAmount,
	TransactionRequest,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `POST /advanced/routes` request body
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LifiRoutesRequest {
	pub from_chain_id: u64,
	pub from_amount: String,
	pub from_token_address: String,
	pub from_address: String,
	pub to_chain_id: u64,
	pub to_token_address: String,
	pub to_address: String,
	pub options: LifiRouteOptions,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LifiRouteOptions {
	pub slippage: f64,
	pub order: String,
	pub integrator: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LifiRoutesResponse {
	#[serde(default)]
	pub routes: Vec<LifiRoute>,
}

/// Route as returned by `/advanced/routes`; steps stay raw so they can be
/// handed back to the vendor at execution time
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifiRoute {
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
	#[serde(rename = "gasCostUSD", default)]
	pub gas_cost_usd: Option<String>,
	#[serde(default)]
	pub steps: Vec<Value>,
	#[serde(default)]
	pub tags: Vec<String>,
}

/// A vendor step (also the shape of `/quote` and `/quote/contractCalls` answers)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifiStep {
	pub id: String,
	#[serde(rename = "type")]
	pub step_type: String,
	pub tool: String,
	#[serde(default)]
	pub tool_details: Option<LifiToolDetails>,
	pub action: LifiAction,
	pub estimate: LifiEstimate,
	#[serde(default)]
	pub included_steps: Vec<LifiIncludedStep>,
	#[serde(default)]
	pub transaction_request: Option<LifiTransactionRequest>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LifiToolDetails {
	pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifiIncludedStep {
	#[serde(rename = "type")]
	pub step_type: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifiAction {
	pub from_chain_id: u64,
	pub to_chain_id: u64,
	pub from_token: Token,
	pub to_token: Token,
	pub from_amount: TokenAmount,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifiEstimate {
	pub to_amount: TokenAmount,
	pub to_amount_min: TokenAmount,
	#[serde(default)]
	pub approval_address: Option<String>,
	#[serde(default)]
	pub execution_duration: f64,
	#[serde(default)]
	pub gas_costs: Vec<LifiGasCost>,
	#[serde(rename = "fromAmountUSD", default)]
	pub from_amount_usd: Option<String>,
	#[serde(rename = "toAmountUSD", default)]
	pub to_amount_usd: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifiGasCost {
	#[serde(rename = "amountUSD", default)]
	pub amount_usd: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifiTransactionRequest {
	pub to: String,
	#[serde(default)]
	pub from: Option<String>,
	#[serde(default)]
	pub data: String,
	#[serde(default)]
	pub value: Option<String>,
	#[serde(default)]
	pub gas_limit: Option<String>,
	#[serde(default)]
	pub gas_price: Option<String>,
	#[serde(default)]
	pub chain_id: Option<u64>,
}

impl LifiTransactionRequest {
	pub fn into_transaction(self, fallback_chain_id: u64) -> TransactionRequest {
		TransactionRequest {
			chain_id: self.chain_id.unwrap_or(fallback_chain_id),
			to: self.to,
			from: self.from,
			data: self.data,
			value: self.value,
			gas_limit: self.gas_limit,
			gas_price: self.gas_price,
		}
	}
}

/// `GET /status` answer
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifiStatusResponse {
	pub status: LifiTransferStatus,
	#[serde(default)]
	pub substatus: Option<String>,
	#[serde(default)]
	pub substatus_message: Option<String>,
	#[serde(default)]
	pub receiving: Option<LifiTransferLeg>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifiTransferStatus {
	NotFound,
	Invalid,
	Pending,
	Done,
	Failed,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifiTransferLeg {
	#[serde(default)]
	pub tx_hash: Option<String>,
}

/// Sum of gas costs in USD; unparsable entries count as zero
fn gas_cost_usd(costs: &[LifiGasCost]) -> f64 {
	costs
		.iter()
		.filter_map(|c| c.amount_usd.as_deref())
		.filter_map(|v| v.parse::<f64>().ok())
		.sum()
}

impl LifiStep {
	pub fn from_value(raw: &Value) -> AdapterResult<Self> {
		serde_json::from_value(raw.clone())
			.map_err(|e| AdapterError::invalid_response(format!("Malformed LI.FI step: {}", e)))
	}

	pub fn kind(&self) -> StepKind {
		let included: Vec<&str> = self
			.included_steps
			.iter()
			.map(|s| s.step_type.as_str())
			.collect();
		StepKind::from_vendor(&self.step_type, &included)
	}

	pub fn to_route_step(&self, raw: Value) -> RouteStep {
		RouteStep {
			id: self.id.clone(),
			kind: self.kind(),
			tool: self.tool.clone(),
			tool_name: self
				.tool_details
				.as_ref()
				.map(|d| d.name.clone())
				.unwrap_or_else(|| self.tool.clone()),
			from_chain_id: self.action.from_chain_id,
			to_chain_id: self.action.to_chain_id,
			from_token: self.action.from_token.clone(),
			to_token: self.action.to_token.clone(),
			from_amount: self.action.from_amount.clone(),
			to_amount: self.estimate.to_amount.clone(),
			to_amount_min: self.estimate.to_amount_min.clone(),
			execution_duration: self.estimate.execution_duration,
			gas_cost_usd: gas_cost_usd(&self.estimate.gas_costs),
			vendor: raw,
		}
	}

	/// A single-step quote presented as a one-step route
	pub fn into_route(self, raw: Value) -> Route {
		let step = self.to_route_step(raw);
		Route {
			id: self.id.clone(),
			from_chain_id: step.from_chain_id,
			to_chain_id: step.to_chain_id,
			from_token: step.from_token.clone(),
			to_token: step.to_token.clone(),
			from_amount: step.from_amount.clone(),
			to_amount: step.to_amount.clone(),
			to_amount_min: step.to_amount_min.clone(),
			from_amount_usd: self.estimate.from_amount_usd.clone(),
			to_amount_usd: self.estimate.to_amount_usd.clone(),
			gas_cost_usd: step.gas_cost_usd,
			steps: vec![step],
			tags: Vec::new(),
		}
	}
}

impl LifiRoute {
	pub fn into_route(self) -> AdapterResult<Route> {
		let steps = self
			.steps
			.into_iter()
			.map(|raw| LifiStep::from_value(&raw).map(|step| step.to_route_step(raw)))
			.collect::<AdapterResult<Vec<_>>>()?;

		if steps.is_empty() {
			return Err(AdapterError::invalid_response(format!(
				"LI.FI route {} has no steps",
				self.id
			)));
		}

		let gas_cost_usd = self
			.gas_cost_usd
			.as_deref()
			.and_then(|v| v.parse::<f64>().ok())
			.unwrap_or_else(|| steps.iter().map(|s| s.gas_cost_usd).sum());

		Ok(Route {
			id: self.id,
			from_chain_id: self.from_chain_id,
			to_chain_id: self.to_chain_id,
			from_token: self.from_token,
			to_token: self.to_token,
			from_amount: self.from_amount,
			to_amount: self.to_amount,
			to_amount_min: self.to_amount_min,
			from_amount_usd: self.from_amount_usd,
			to_amount_usd: self.to_amount_usd,
			gas_cost_usd,
			steps,
			tags: self.tags,
		})
	}
}
