//! Route execution: progress model, events, errors and the user prompt seam

pub mod errors;
pub mod progress;

pub use errors::{ExecutionError, WalletError};
pub use progress::{
	ExecutionEvent, ExecutionPhase, ExecutionProgress, HashRole, StepProgress, StepStatus,
	TransactionHashes,
};

use async_trait::async_trait;

use crate::models::{Token, TokenAmount};

/// A mid-execution change of the quoted output amount
#[derive(Debug, Clone, PartialEq)]
pub struct RateChange {
	pub step_index: usize,
	pub token: Token,
	pub old_to_amount: TokenAmount,
	pub new_to_amount: TokenAmount,
}

/// User-facing confirmation surface used while executing
#[async_trait]
pub trait UserPrompt: Send + Sync {
	/// Present the delta and block until the user accepts (`true`) or rejects
	async fn confirm_rate_change(&self, change: &RateChange) -> bool;
}
