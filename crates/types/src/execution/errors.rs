//! Error types for route execution

use thiserror::Error;

use crate::adapters::AdapterError;

/// Failures reported by the connected wallet
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WalletError {
	#[error("User rejected the request: {reason}")]
	Rejected { reason: String },

	#[error("Failed to switch to chain {chain_id}: {reason}")]
	ChainSwitch { chain_id: u64, reason: String },

	#[error("Transaction {tx_hash} reverted")]
	Reverted { tx_hash: String },

	#[error("Wallet transport error: {0}")]
	Transport(String),
}

/// Execution failures; surfaced verbatim to the user
#[derive(Error, Debug)]
pub enum ExecutionError {
	#[error("An execution is already in progress")]
	AlreadyExecuting,

	#[error("Route has no steps and cannot be executed")]
	NotExecutable,

	#[error("Chain switch to {chain_id} failed: {reason}")]
	ChainSwitchFailed { chain_id: u64, reason: String },

	#[error("Exchange rate update was rejected")]
	RateRejected,

	#[error("Wallet error: {0}")]
	Wallet(#[from] WalletError),

	#[error("Route provider error: {0}")]
	Vendor(#[from] AdapterError),

	#[error("Step {step_index} failed: {reason}")]
	StepFailed { step_index: usize, reason: String },
}
