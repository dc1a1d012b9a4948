//! Transaction history entries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::execution::TransactionHashes;
use crate::models::TokenAmount;
use crate::routes::Route;

/// Key under which the history list is persisted
pub const HISTORY_STORAGE_KEY: &str = "kite_transaction_history";
/// Maximum number of entries kept
pub const MAX_HISTORY_ENTRIES: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryStatus {
	Pending,
	Completed,
	Failed,
}

/// One deposit as shown in the history list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
	pub id: String,
	pub timestamp: DateTime<Utc>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub ens_name: Option<String>,
	pub recipient: String,
	pub from_chain_id: u64,
	pub to_chain_id: u64,
	pub from_token_symbol: String,
	pub to_token_symbol: String,
	pub from_amount: TokenAmount,
	pub to_amount: TokenAmount,
	pub status: HistoryStatus,
	#[serde(default)]
	pub hashes: TransactionHashes,
	#[serde(default)]
	pub used_vault: bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}

impl HistoryEntry {
	/// New pending entry for a route about to be executed
	pub fn pending(route: &Route, recipient: &str, ens_name: Option<String>) -> Self {
		Self {
			id: Uuid::new_v4().to_string(),
			timestamp: Utc::now(),
			ens_name,
			recipient: recipient.to_string(),
			from_chain_id: route.from_chain_id,
			to_chain_id: route.to_chain_id,
			from_token_symbol: route.from_token.symbol.clone(),
			to_token_symbol: route.to_token.symbol.clone(),
			from_amount: route.from_amount.clone(),
			to_amount: route.to_amount.clone(),
			status: HistoryStatus::Pending,
			hashes: TransactionHashes::default(),
			used_vault: route.ends_with_contract_call(),
			error: None,
		}
	}
}
