//! Directory listing transports
//!
//! The selection engine only ever asks one question of the remote side: what
//! directories live directly under a path. Implementations answer with
//! absolute entries in directory form (trailing `/`); plain files may be
//! included and are ignored by the tree.

use async_trait::async_trait;

use crate::error::ListingError;
use crate::path::RemotePath;

mod local;
mod memory;

pub use local::LocalTransport;
pub use memory::MemoryTransport;

/// Result type for listing operations
pub type ListingResult = Result<Vec<String>, ListingError>;

/// Source of directory listings
#[async_trait]
pub trait ListingTransport: Send + Sync {
	/// List the immediate children of `path`
	///
	/// An empty directory is `Ok(vec![])`, not an error.
	async fn request_listing(&self, path: &RemotePath) -> ListingResult;
}

// vim: ts=4
