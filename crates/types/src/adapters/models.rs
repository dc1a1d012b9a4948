//! Request/response models shared by the vendor traits

use serde::{Deserialize, Serialize};

use crate::models::TokenAmount;
use crate::routes::ValidatedRouteRequest;

/// An EVM transaction to be signed and sent by the wallet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
	pub chain_id: u64,
	pub to: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub from: Option<String>,
	/// 0x-prefixed calldata
	#[serde(default)]
	pub data: String,
	/// 0x-prefixed hex or decimal wei value
	#[serde(default)]
	pub value: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub gas_limit: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub gas_price: Option<String>,
}

/// Contract call carried as the payload of a contract-calls composer quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractCall {
	pub from_amount: TokenAmount,
	pub from_token_address: String,
	pub to_contract_address: String,
	/// 0x-prefixed ABI-encoded calldata
	pub to_contract_call_data: String,
	pub to_contract_gas_limit: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub to_approval_address: Option<String>,
}

/// Quote request whose destination is a vault deposit rather than a plain transfer
#[derive(Debug, Clone, PartialEq)]
pub struct ComposerQuoteRequest {
	pub request: ValidatedRouteRequest,
	/// Vault the deposit targets; doubles as the destination "token"
	pub vault: String,
	/// Explicit deposit payload (KiteSafe); `None` lets the vendor compose the vault deposit itself
	pub contract_call: Option<ContractCall>,
}

/// Vendor-reported status of a single step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VendorStepStatus {
	Pending,
	ActionRequired,
	Done,
	Failed,
}

/// Payload of the generic update hook
#[derive(Debug, Clone, PartialEq)]
pub struct StepUpdate {
	pub step_index: usize,
	pub status: VendorStepStatus,
	pub tx_hash: Option<String>,
	/// Destination-chain transaction reported once a cross-chain step settles
	pub receiving_tx_hash: Option<String>,
	pub message: Option<String>,
}

impl StepUpdate {
	pub fn new(step_index: usize, status: VendorStepStatus) -> Self {
		Self {
			step_index,
			status,
			tx_hash: None,
			receiving_tx_hash: None,
			message: None,
		}
	}

	pub fn with_tx_hash(mut self, tx_hash: impl Into<String>) -> Self {
		self.tx_hash = Some(tx_hash.into());
		self
	}

	pub fn with_receiving_tx_hash(mut self, tx_hash: Option<String>) -> Self {
		self.receiving_tx_hash = tx_hash;
		self
	}

	pub fn with_message(mut self, message: impl Into<String>) -> Self {
		self.message = Some(message.into());
		self
	}
}

/// Non-zero ERC-20 balance as reported by the balance provider
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTokenBalance {
	pub contract_address: String,
	/// Decimal smallest-unit balance
	pub balance: TokenAmount,
}

/// ERC-20 metadata as reported by the balance provider
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TokenMetadata {
	pub symbol: String,
	pub name: String,
	pub decimals: u8,
	pub logo: Option<String>,
}

impl TokenMetadata {
	/// Placeholder used when metadata lookup fails
	pub fn unknown() -> Self {
		Self {
			symbol: "UNKNOWN".to_string(),
			name: "Unknown Token".to_string(),
			decimals: 18,
			logo: None,
		}
	}
}
