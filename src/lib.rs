//! # selsync - Selective Sync Folder Picker
//!
//! selsync lets a user browse a remote folder hierarchy, mark subtrees as
//! excluded from synchronization and produce the minimal exclusion list the
//! sync engine consumes.
//!
//! The tree is fetched lazily: only directories the user expands are listed.
//! Every directory carries a tri-state flag (included, excluded, partially
//! included) that stays consistent with its children after each toggle.
//! Regions that were never listed keep the exclusions they had before.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use selsync::{LocalTransport, RemotePath, SelectionSession, UserState};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let transport = Arc::new(LocalTransport::new("/srv/share"));
//!     let mut session = SelectionSession::builder(transport)
//!         .prior_exclusions(vec![RemotePath::new("Photos/raw")])
//!         .build();
//!
//!     if let Some(id) = session.reveal(&RemotePath::new("Videos")).await? {
//!         session.toggle(id, UserState::Exclude)?;
//!     }
//!     println!("{:?}", session.commit());
//!     Ok(())
//! }
//! ```

pub mod callbacks;
pub mod config;
pub mod error;
pub mod logging;
pub mod path;
pub mod selection;
pub mod session;
pub mod store;
pub mod transport;

// Re-export commonly used types
pub use callbacks::{EventBridge, NoCallbacks, SelectionCallbacks, SelectionEvent};
pub use config::Config;
pub use error::{ConfigError, ListingError, SelectError, StoreError};
pub use path::RemotePath;
pub use selection::{InsertReport, Node, NodeId, SelectionTree, TriState, UserState};
pub use session::{ResponseOutcome, SelectionSession, SessionBuilder};
pub use store::{ExclusionStore, FileExclusionStore, MemoryExclusionStore};
pub use transport::{ListingTransport, LocalTransport, MemoryTransport};

// vim: ts=4
