//! Shared test data

#![allow(dead_code)]

use kite_router::types::{RouteStep, StepKind, Token};
use kite_router::{Route, RouteRequest, TokenRef};

pub const USER: &str = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045";
pub const RECIPIENT: &str = "0x1111111111111111111111111111111111111111";
pub const USDC_ARB: &str = "0xaf88d065e77c8cC2239327C5EDb3A432268e5831";
pub const USDC_BASE: &str = "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913";
pub const VAULT: &str = "0x7BfA7C4f149E7415b73bdeDfe609237e29CBF34A";
pub const KITE_SAFE: &str = "0x3333333333333333333333333333333333333333";

pub fn usdc(chain_id: u64) -> Token {
	let address = if chain_id == 8453 { USDC_BASE } else { USDC_ARB };
	Token::new(address, chain_id, "USDC", 6)
}

pub fn step(id: &str, kind: StepKind, from_chain: u64, to_chain: u64) -> RouteStep {
	RouteStep {
		id: id.to_string(),
		kind,
		tool: "tool".to_string(),
		tool_name: "Tool".to_string(),
		from_chain_id: from_chain,
		to_chain_id: to_chain,
		from_token: usdc(from_chain),
		to_token: usdc(to_chain),
		from_amount: "1000000".into(),
		to_amount: "990000".into(),
		to_amount_min: "985000".into(),
		execution_duration: 60.0,
		gas_cost_usd: 0.1,
		vendor: serde_json::Value::Null,
	}
}

/// Arbitrum -> Base route with the given steps
pub fn route_with_steps(id: &str, gas_cost_usd: f64, steps: Vec<RouteStep>) -> Route {
	Route {
		id: id.to_string(),
		from_chain_id: 42161,
		to_chain_id: 8453,
		from_token: usdc(42161),
		to_token: usdc(8453),
		from_amount: "1000000".into(),
		to_amount: "990000".into(),
		to_amount_min: "985000".into(),
		from_amount_usd: Some("1.00".to_string()),
		to_amount_usd: Some("0.99".to_string()),
		gas_cost_usd,
		steps,
		tags: vec![],
	}
}

/// Single bridge step route
pub fn bridge_route(id: &str, gas_cost_usd: f64) -> Route {
	route_with_steps(
		id,
		gas_cost_usd,
		vec![step(&format!("{}-bridge", id), StepKind::Bridge, 42161, 8453)],
	)
}

/// Swap, bridge and vault deposit
pub fn vault_route(id: &str) -> Route {
	route_with_steps(
		id,
		0.4,
		vec![
			step("swap", StepKind::Swap, 42161, 42161),
			step("bridge", StepKind::Bridge, 42161, 8453),
			step("deposit", StepKind::ContractCall, 8453, 8453),
		],
	)
}

pub fn route_request(amount: &str) -> RouteRequest {
	RouteRequest {
		from_token: Some(TokenRef::new(42161, USDC_ARB)),
		to_token: Some(TokenRef::new(8453, USDC_BASE)),
		from_amount: amount.into(),
		from_address: Some(USER.to_string()),
		to_address: Some(RECIPIENT.to_string()),
		vault_address: None,
		slippage: None,
	}
}

pub fn tx_hash(n: u64) -> String {
	format!("0x{:064x}", n)
}
