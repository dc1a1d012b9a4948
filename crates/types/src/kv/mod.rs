//! Injectable key-value persistence

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
	#[error("Serialization error: {message}")]
	Serialization { message: String },
	#[error("I/O error: {message}")]
	Io { message: String },
	#[error("Storage operation failed: {message}")]
	Operation { message: String },
}

pub type StorageResult<T> = Result<T, StorageError>;

/// String-keyed, string-valued store (browser local storage, a file, memory)
#[async_trait]
pub trait KeyValueStore: Send + Sync {
	async fn get(&self, key: &str) -> StorageResult<Option<String>>;

	async fn set(&self, key: &str, value: String) -> StorageResult<()>;

	/// Remove one key; returns whether it existed
	async fn remove(&self, key: &str) -> StorageResult<bool>;

	async fn clear(&self) -> StorageResult<()>;
}
