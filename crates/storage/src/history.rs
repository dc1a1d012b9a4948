//! Capped, newest-first transaction history on top of a [`KeyValueStore`]

use crate::traits::{KeyValueStore, StorageError, StorageResult};
use kite_types::{
	ExecutionError, HistoryEntry, HistoryStatus, TransactionHashes, HISTORY_STORAGE_KEY,
	MAX_HISTORY_ENTRIES,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Transaction history persisted as one JSON array under a single key
///
/// Read-modify-write cycles are serialized so concurrent updates from the
/// same process never drop entries.
#[derive(Clone)]
pub struct TransactionHistory {
	store: Arc<dyn KeyValueStore>,
	capacity: usize,
	write_lock: Arc<Mutex<()>>,
}

impl TransactionHistory {
	pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
		Self::with_capacity(store, MAX_HISTORY_ENTRIES)
	}

	pub fn with_capacity(store: Arc<dyn KeyValueStore>, capacity: usize) -> Self {
		Self {
			store,
			capacity: capacity.max(1),
			write_lock: Arc::new(Mutex::new(())),
		}
	}

	/// All entries, newest first. Unreadable stored data reads as empty.
	pub async fn entries(&self) -> StorageResult<Vec<HistoryEntry>> {
		let Some(raw) = self.store.get(HISTORY_STORAGE_KEY).await? else {
			return Ok(Vec::new());
		};
		match serde_json::from_str(&raw) {
			Ok(entries) => Ok(entries),
			Err(e) => {
				warn!("Ignoring unreadable transaction history: {}", e);
				Ok(Vec::new())
			},
		}
	}

	pub async fn get(&self, id: &str) -> StorageResult<Option<HistoryEntry>> {
		Ok(self.entries().await?.into_iter().find(|e| e.id == id))
	}

	/// Prepend an entry, dropping the oldest beyond capacity
	pub async fn add(&self, entry: HistoryEntry) -> StorageResult<()> {
		let _guard = self.write_lock.lock().await;
		let mut entries = self.entries().await?;
		entries.retain(|e| e.id != entry.id);
		entries.insert(0, entry);
		entries.truncate(self.capacity);
		self.save(&entries).await
	}

	/// Apply `update` to the entry with `id`; returns false when it is gone
	pub async fn update<F>(&self, id: &str, update: F) -> StorageResult<bool>
	where
		F: FnOnce(&mut HistoryEntry) + Send,
	{
		let _guard = self.write_lock.lock().await;
		let mut entries = self.entries().await?;
		let Some(entry) = entries.iter_mut().find(|e| e.id == id) else {
			debug!("History entry {} no longer present", id);
			return Ok(false);
		};
		update(entry);
		self.save(&entries).await?;
		Ok(true)
	}

	pub async fn mark_completed(&self, id: &str, hashes: TransactionHashes) -> StorageResult<bool> {
		self.update(id, move |entry| {
			entry.status = HistoryStatus::Completed;
			entry.hashes = hashes;
			entry.error = None;
		})
		.await
	}

	pub async fn mark_failed(
		&self,
		id: &str,
		hashes: TransactionHashes,
		error: &ExecutionError,
	) -> StorageResult<bool> {
		let message = error.to_string();
		self.update(id, move |entry| {
			entry.status = HistoryStatus::Failed;
			entry.hashes = hashes;
			entry.error = Some(message);
		})
		.await
	}

	pub async fn clear(&self) -> StorageResult<()> {
		let _guard = self.write_lock.lock().await;
		self.store.remove(HISTORY_STORAGE_KEY).await.map(|_| ())
	}

	async fn save(&self, entries: &[HistoryEntry]) -> StorageResult<()> {
		let json = serde_json::to_string(entries).map_err(|e| StorageError::Serialization {
			message: e.to_string(),
		})?;
		self.store.set(HISTORY_STORAGE_KEY, json).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::MemoryStore;
	use chrono::Utc;
	use kite_types::TokenAmount;

	fn entry(id: &str) -> HistoryEntry {
		HistoryEntry {
			id: id.to_string(),
			timestamp: Utc::now(),
			ens_name: Some("alice.eth".to_string()),
			recipient: "0x1111111111111111111111111111111111111111".to_string(),
			from_chain_id: 1,
			to_chain_id: 8453,
			from_token_symbol: "USDC".to_string(),
			to_token_symbol: "USDC".to_string(),
			from_amount: TokenAmount::from("1000000"),
			to_amount: TokenAmount::from("990000"),
			status: HistoryStatus::Pending,
			hashes: TransactionHashes::default(),
			used_vault: false,
			error: None,
		}
	}

	fn history() -> TransactionHistory {
		TransactionHistory::new(Arc::new(MemoryStore::new()))
	}

	#[tokio::test]
	async fn test_newest_first() {
		let history = history();
		history.add(entry("a")).await.unwrap();
		history.add(entry("b")).await.unwrap();

		let ids: Vec<String> = history.entries().await.unwrap().into_iter().map(|e| e.id).collect();
		assert_eq!(ids, vec!["b", "a"]);
	}

	#[tokio::test]
	async fn test_capped_at_fifty() {
		let history = history();
		for i in 0..(MAX_HISTORY_ENTRIES + 5) {
			history.add(entry(&format!("tx-{}", i))).await.unwrap();
		}

		let entries = history.entries().await.unwrap();
		assert_eq!(entries.len(), MAX_HISTORY_ENTRIES);
		assert_eq!(entries[0].id, format!("tx-{}", MAX_HISTORY_ENTRIES + 4));
		assert!(entries.iter().all(|e| e.id != "tx-0"));
	}

	#[tokio::test]
	async fn test_status_updates() {
		let history = history();
		history.add(entry("a")).await.unwrap();

		let mut hashes = TransactionHashes::default();
		hashes.bridge = Some("0xbridge".to_string());
		assert!(history.mark_completed("a", hashes).await.unwrap());

		let stored = history.get("a").await.unwrap().unwrap();
		assert_eq!(stored.status, HistoryStatus::Completed);
		assert_eq!(stored.hashes.bridge.as_deref(), Some("0xbridge"));

		let failed = history
			.mark_failed("missing", TransactionHashes::default(), &ExecutionError::RateRejected)
			.await
			.unwrap();
		assert!(!failed);
	}

	#[tokio::test]
	async fn test_corrupt_history_reads_empty() {
		let store = Arc::new(MemoryStore::new());
		store
			.set(HISTORY_STORAGE_KEY, "not json".to_string())
			.await
			.unwrap();
		let history = TransactionHistory::new(store);
		assert!(history.entries().await.unwrap().is_empty());

		history.add(entry("a")).await.unwrap();
		assert_eq!(history.entries().await.unwrap().len(), 1);
	}
}
