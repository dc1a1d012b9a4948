//! Storage traits for pluggable storage implementations

// Re-export the storage trait from the types crate
pub use kite_types::kv::{KeyValueStore, StorageError, StorageResult};
