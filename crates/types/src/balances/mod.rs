//! Token balance request/response models for the balance endpoint

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::adapters::AdapterError;
use crate::models::TokenAmount;

/// Body of `POST /api/tokens/balances`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceRequest {
	pub address: Option<String>,
	pub chain_id: Option<u64>,
}

/// A token held by an address, with display metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenBalance {
	pub address: String,
	pub symbol: String,
	pub name: String,
	pub decimals: u8,
	pub balance: TokenAmount,
	pub formatted_balance: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub logo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceResponse {
	pub tokens: Vec<TokenBalance>,
}

#[derive(Error, Debug)]
pub enum BalanceError {
	#[error("Missing required field: {field}")]
	MissingField { field: String },

	#[error("Invalid address: {address}")]
	InvalidAddress { address: String },

	#[error("Unsupported chain: {chain_id}")]
	UnsupportedChain { chain_id: u64 },

	#[error("Balance provider is not configured")]
	NotConfigured,

	#[error("Balance provider error: {0}")]
	Provider(#[from] AdapterError),
}
