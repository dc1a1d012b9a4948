//! Kite Storage
//!
//! Key-value persistence backends and the capped transaction history built on
//! top of them.

pub mod file_store;
pub mod history;
pub mod memory_store;
pub mod traits;

pub use file_store::JsonFileStore;
pub use history::TransactionHistory;
pub use memory_store::MemoryStore;
pub use traits::{KeyValueStore, StorageError, StorageResult};
