//! Local directory listing transport
//!
//! Serves a directory on the local filesystem as if it were the remote side.
//! The remote path `a/b/` maps to `<base>/a/b`.

use async_trait::async_trait;
use std::io;
use std::path::PathBuf;
use tracing::debug;

use super::{ListingResult, ListingTransport};
use crate::error::ListingError;
use crate::path::RemotePath;

pub struct LocalTransport {
	base: PathBuf,
}

impl LocalTransport {
	pub fn new(base: impl Into<PathBuf>) -> Self {
		LocalTransport { base: base.into() }
	}

	fn local_path(&self, path: &RemotePath) -> PathBuf {
		let mut local = self.base.clone();
		for segment in path.segments() {
			local.push(segment);
		}
		local
	}
}

#[async_trait]
impl ListingTransport for LocalTransport {
	async fn request_listing(&self, path: &RemotePath) -> ListingResult {
		let dir = self.local_path(path);
		debug!("Listing local directory {}", dir.display());

		let map_err = |e: io::Error| {
			if e.kind() == io::ErrorKind::NotFound {
				ListingError::NotFound { path: path.clone() }
			} else {
				ListingError::Io { path: path.clone(), source: e }
			}
		};

		let mut read_dir = tokio::fs::read_dir(&dir).await.map_err(map_err)?;
		let mut entries = Vec::new();
		while let Some(entry) = read_dir.next_entry().await.map_err(map_err)? {
			let name = entry.file_name().to_string_lossy().into_owned();
			let file_type = entry.file_type().await.map_err(map_err)?;
			if file_type.is_dir() {
				entries.push(format!("{}{}/", path, name));
			} else {
				entries.push(format!("{}{}", path, name));
			}
		}
		entries.sort();
		Ok(entries)
	}
}


// vim: ts=4
