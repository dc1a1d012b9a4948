//! Key-value store persisted as a single JSON object on disk

use crate::traits::{KeyValueStore, StorageError, StorageResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

/// File-backed store, the server-side stand-in for browser local storage
///
/// The whole map is rewritten on every mutation. Writes go to a sibling
/// temporary file first and are renamed into place.
pub struct JsonFileStore {
	path: PathBuf,
	cache: Mutex<Option<HashMap<String, String>>>,
}

impl JsonFileStore {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self {
			path: path.into(),
			cache: Mutex::new(None),
		}
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	async fn load(&self) -> StorageResult<HashMap<String, String>> {
		match tokio::fs::read_to_string(&self.path).await {
			Ok(contents) if contents.trim().is_empty() => Ok(HashMap::new()),
			Ok(contents) => serde_json::from_str(&contents).map_err(|e| StorageError::Serialization {
				message: format!("{}: {}", self.path.display(), e),
			}),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
				debug!("No store file at {}, starting empty", self.path.display());
				Ok(HashMap::new())
			},
			Err(e) => Err(io_error(&self.path, e)),
		}
	}

	async fn persist(&self, entries: &HashMap<String, String>) -> StorageResult<()> {
		let json = serde_json::to_string_pretty(entries).map_err(|e| StorageError::Serialization {
			message: e.to_string(),
		})?;

		if let Some(parent) = self.path.parent() {
			if !parent.as_os_str().is_empty() {
				tokio::fs::create_dir_all(parent)
					.await
					.map_err(|e| io_error(parent, e))?;
			}
		}

		let tmp = self.path.with_extension("tmp");
		tokio::fs::write(&tmp, json)
			.await
			.map_err(|e| io_error(&tmp, e))?;
		tokio::fs::rename(&tmp, &self.path)
			.await
			.map_err(|e| io_error(&self.path, e))
	}

	/// Lock the cache, loading the file on first use
	async fn loaded(&self) -> StorageResult<MutexGuard<'_, Option<HashMap<String, String>>>> {
		let mut guard = self.cache.lock().await;
		if guard.is_none() {
			let loaded = match self.load().await {
				Ok(map) => map,
				Err(StorageError::Serialization { message }) => {
					warn!("Discarding unreadable store file: {}", message);
					HashMap::new()
				},
				Err(e) => return Err(e),
			};
			*guard = Some(loaded);
		}
		Ok(guard)
	}

	/// Apply `f` to a copy of the map; the copy replaces the cache only once it is on disk
	async fn mutate<T>(
		&self,
		f: impl FnOnce(&mut HashMap<String, String>) -> (T, bool),
	) -> StorageResult<T> {
		let mut guard = self.loaded().await?;
		let mut next = guard.clone().unwrap_or_default();
		let (result, changed) = f(&mut next);
		if changed {
			self.persist(&next).await?;
			*guard = Some(next);
		}
		Ok(result)
	}
}

fn io_error(path: &Path, e: std::io::Error) -> StorageError {
	StorageError::Io {
		message: format!("{}: {}", path.display(), e),
	}
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
	async fn get(&self, key: &str) -> StorageResult<Option<String>> {
		let guard = self.loaded().await?;
		Ok(guard.as_ref().and_then(|entries| entries.get(key).cloned()))
	}

	async fn set(&self, key: &str, value: String) -> StorageResult<()> {
		self.mutate(|entries| {
			entries.insert(key.to_string(), value);
			((), true)
		})
		.await
	}

	async fn remove(&self, key: &str) -> StorageResult<bool> {
		self.mutate(|entries| {
			let existed = entries.remove(key).is_some();
			(existed, existed)
		})
		.await
	}

	async fn clear(&self) -> StorageResult<()> {
		self.mutate(|entries| {
			entries.clear();
			((), true)
		})
		.await
	}
}
