//! In-memory key-value storage using DashMap

use crate::traits::{KeyValueStore, StorageResult};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::debug;

/// Process-local store; contents are lost on restart
#[derive(Clone, Default)]
pub struct MemoryStore {
	entries: Arc<DashMap<String, String>>,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

#[async_trait]
impl KeyValueStore for MemoryStore {
	async fn get(&self, key: &str) -> StorageResult<Option<String>> {
		Ok(self.entries.get(key).map(|v| v.clone()))
	}

	async fn set(&self, key: &str, value: String) -> StorageResult<()> {
		debug!("Storing {} bytes under '{}'", value.len(), key);
		self.entries.insert(key.to_string(), value);
		Ok(())
	}

	async fn remove(&self, key: &str) -> StorageResult<bool> {
		Ok(self.entries.remove(key).is_some())
	}

	async fn clear(&self) -> StorageResult<()> {
		self.entries.clear();
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn test_set_get_remove() {
		let store = MemoryStore::new();
		assert_eq!(store.get("missing").await.unwrap(), None);

		store.set("k", "v".to_string()).await.unwrap();
		assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));

		assert!(store.remove("k").await.unwrap());
		assert!(!store.remove("k").await.unwrap());
		assert!(store.is_empty());
	}

	#[tokio::test]
	async fn test_clones_share_entries() {
		let store = MemoryStore::new();
		let clone = store.clone();
		store.set("a", "1".to_string()).await.unwrap();
		assert_eq!(clone.get("a").await.unwrap().as_deref(), Some("1"));

		clone.clear().await.unwrap();
		assert_eq!(store.len(), 0);
	}
}
