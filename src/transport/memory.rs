//! In-memory listing transport

use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::{ListingResult, ListingTransport};
use crate::error::ListingError;
use crate::path::RemotePath;

/// A fixed directory hierarchy held in memory
///
/// Useful for tests and for replaying a captured remote layout. Paths can be
/// marked as failing to exercise error handling.
#[derive(Default)]
pub struct MemoryTransport {
	dirs: BTreeMap<RemotePath, Vec<String>>,
	failing: Mutex<HashSet<RemotePath>>,
	requests: AtomicUsize,
}

impl MemoryTransport {
	/// Build a hierarchy below `root` from a list of directory paths
	///
	/// Missing intermediate directories are created.
	pub fn from_dirs(root: &RemotePath, dirs: &[&str]) -> Self {
		let mut transport = MemoryTransport::default();
		transport.dirs.insert(root.clone(), Vec::new());
		for dir in dirs {
			let path = RemotePath::new(dir);
			for ancestor in path.ancestors().into_iter().chain(std::iter::once(path.clone())) {
				if !root.contains(&ancestor) || ancestor == *root {
					continue;
				}
				transport.add_dir(&ancestor);
			}
		}
		transport
	}

	fn add_dir(&mut self, path: &RemotePath) {
		if self.dirs.contains_key(path) {
			return;
		}
		self.dirs.insert(path.clone(), Vec::new());
		if let Some(parent) = path.parent() {
			self.dirs.entry(parent).or_default().push(path.as_str().to_string());
		}
	}

	/// Add a plain file entry to a directory listing
	pub fn add_file(&mut self, dir: &RemotePath, name: &str) {
		let entry = format!("{}{}", dir, name);
		self.dirs.entry(dir.clone()).or_default().push(entry);
	}

	/// Make every listing of `path` fail until [`MemoryTransport::recover`]
	pub fn fail(&self, path: &RemotePath) {
		if let Ok(mut failing) = self.failing.lock() {
			failing.insert(path.clone());
		}
	}

	pub fn recover(&self, path: &RemotePath) {
		if let Ok(mut failing) = self.failing.lock() {
			failing.remove(path);
		}
	}

	/// Number of listing requests served so far, failed ones included
	pub fn request_count(&self) -> usize {
		self.requests.load(Ordering::SeqCst)
	}
}

#[async_trait]
impl ListingTransport for MemoryTransport {
	async fn request_listing(&self, path: &RemotePath) -> ListingResult {
		self.requests.fetch_add(1, Ordering::SeqCst);

		let failing = self.failing.lock().map(|f| f.contains(path)).unwrap_or(false);
		if failing {
			return Err(ListingError::Transport {
				path: path.clone(),
				message: "simulated failure".to_string(),
			});
		}

		self.dirs.get(path).cloned().ok_or_else(|| ListingError::NotFound { path: path.clone() })
	}
}


// vim: ts=4
