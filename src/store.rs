//! Persistence of committed exclusion lists

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::StoreError;
use crate::path::RemotePath;

/// Where committed exclusion lists live, keyed by sync root
#[async_trait]
pub trait ExclusionStore: Send + Sync {
	/// Load the list for `root`; a root never saved has an empty list
	async fn load(&self, root: &str) -> Result<Vec<RemotePath>, StoreError>;

	/// Replace the list for `root`
	async fn save(&self, root: &str, exclusions: &[RemotePath]) -> Result<(), StoreError>;

	/// Forget the list for `root`
	async fn clear(&self, root: &str) -> Result<(), StoreError>;
}

/// One stored exclusion list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredExclusions {
	pub exclusions: Vec<RemotePath>,

	/// Seconds since the epoch of the last save
	pub updated: u64,
}

/// On-disk document: all roots of one profile
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExclusionDocument {
	pub roots: BTreeMap<String, StoredExclusions>,
}

/// JSON file store, one file per profile
pub struct FileExclusionStore {
	state_dir: PathBuf,
	profile: String,
}

impl FileExclusionStore {
	pub fn new(state_dir: PathBuf, profile: &str) -> Self {
		FileExclusionStore { state_dir, profile: profile.to_string() }
	}

	/// Path of this profile's store file
	pub fn store_path(&self) -> PathBuf {
		self.state_dir.join(format!("{}.exclusions.json", self.profile))
	}

	async fn read_document(&self) -> Result<ExclusionDocument, StoreError> {
		let path = self.store_path();
		if !path.exists() {
			return Ok(ExclusionDocument::default());
		}

		let contents = tokio::fs::read_to_string(&path)
			.await
			.map_err(|e| StoreError::LoadFailed { source: e })?;

		serde_json::from_str(&contents).map_err(|e| StoreError::Corrupted {
			message: format!("Failed to parse {}: {}", path.display(), e),
		})
	}

	async fn write_document(&self, doc: &ExclusionDocument) -> Result<(), StoreError> {
		let path = self.store_path();

		let dir = path.parent().unwrap_or(Path::new("."));
		if !dir.exists() {
			tokio::fs::create_dir_all(dir).await.map_err(|e| StoreError::SaveFailed { source: e })?;
		}

		let json = serde_json::to_string_pretty(doc)
			.map_err(|e| StoreError::Corrupted { message: e.to_string() })?;

		tokio::fs::write(&path, json).await.map_err(|e| StoreError::SaveFailed { source: e })
	}
}

#[async_trait]
impl ExclusionStore for FileExclusionStore {
	async fn load(&self, root: &str) -> Result<Vec<RemotePath>, StoreError> {
		let doc = self.read_document().await?;
		Ok(doc.roots.get(root).map(|s| s.exclusions.clone()).unwrap_or_default())
	}

	async fn save(&self, root: &str, exclusions: &[RemotePath]) -> Result<(), StoreError> {
		let mut doc = self.read_document().await?;
		let updated = SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0);
		doc.roots
			.insert(root.to_string(), StoredExclusions { exclusions: exclusions.to_vec(), updated });
		debug!("Saving {} exclusions for '{}' to {}", exclusions.len(), root, self.store_path().display());
		self.write_document(&doc).await
	}

	async fn clear(&self, root: &str) -> Result<(), StoreError> {
		let mut doc = self.read_document().await?;
		if doc.roots.remove(root).is_some() {
			self.write_document(&doc).await?;
		}
		Ok(())
	}
}

/// Volatile store, for tests and dry runs
#[derive(Default)]
pub struct MemoryExclusionStore {
	roots: Mutex<BTreeMap<String, Vec<RemotePath>>>,
}

impl MemoryExclusionStore {
	pub fn new() -> Self {
		Self::default()
	}
}

#[async_trait]
impl ExclusionStore for MemoryExclusionStore {
	async fn load(&self, root: &str) -> Result<Vec<RemotePath>, StoreError> {
		Ok(self.roots.lock().await.get(root).cloned().unwrap_or_default())
	}

	async fn save(&self, root: &str, exclusions: &[RemotePath]) -> Result<(), StoreError> {
		self.roots.lock().await.insert(root.to_string(), exclusions.to_vec());
		Ok(())
	}

	async fn clear(&self, root: &str) -> Result<(), StoreError> {
		self.roots.lock().await.remove(root);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use tempfile::TempDir;

	#[tokio::test]
	async fn test_store_path() {
		let store = FileExclusionStore::new(PathBuf::from("/tmp"), "myprofile");
		assert!(store.store_path().to_string_lossy().ends_with("myprofile.exclusions.json"));
	}

	#[tokio::test]
	async fn test_save_and_load() {
		let temp_dir = TempDir::new().unwrap();
		let store = FileExclusionStore::new(temp_dir.path().join("state"), "default");

		assert!(store.load("Photos").await.unwrap().is_empty());

		let list = vec![RemotePath::new("Photos/raw"), RemotePath::new("Photos/tmp")];
		store.save("Photos", &list).await.unwrap();
		store.save("Music", &[RemotePath::new("Music/old")]).await.unwrap();

		assert_eq!(store.load("Photos").await.unwrap(), list);
		assert_eq!(store.load("Music").await.unwrap().len(), 1);

		store.clear("Photos").await.unwrap();
		assert!(store.load("Photos").await.unwrap().is_empty());
		assert_eq!(store.load("Music").await.unwrap().len(), 1);
	}

	#[tokio::test]
	async fn test_corrupted_store() {
		let temp_dir = TempDir::new().unwrap();
		let store = FileExclusionStore::new(temp_dir.path().to_path_buf(), "bad");
		std::fs::write(store.store_path(), "{ not json").unwrap();

		let err = store.load("x").await.unwrap_err();
		assert!(matches!(err, StoreError::Corrupted { .. }));
	}

	#[tokio::test]
	async fn test_memory_store() {
		let store = MemoryExclusionStore::new();
		store.save("r", &[RemotePath::new("a")]).await.unwrap();
		assert_eq!(store.load("r").await.unwrap(), vec![RemotePath::new("a")]);
		store.clear("r").await.unwrap();
		assert!(store.load("r").await.unwrap().is_empty());
	}
}

// vim: ts=4
