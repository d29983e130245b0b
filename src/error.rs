//! Error types for selsync operations

use std::io;
use thiserror::Error;

use crate::path::RemotePath;
use crate::selection::NodeId;

/// Main error type for selection operations
#[derive(Debug, Error)]
pub enum SelectError {
	/// A node id that does not belong to the current tree
	#[error("Unknown node id {0}")]
	UnknownNode(NodeId),

	/// A listing arrived for a path that has no node
	#[error("No node for path '{0}'")]
	UnknownPath(RemotePath),

	/// The root listing has not arrived yet
	#[error("Tree has no root yet")]
	NoRoot,

	/// Listing error (nested)
	#[error("Listing error: {0}")]
	Listing(#[from] ListingError),

	/// Store error (nested)
	#[error("Store error: {0}")]
	Store(#[from] StoreError),

	/// Config error (nested)
	#[error("Config error: {0}")]
	Config(#[from] ConfigError),
}

/// Directory listing transport errors
#[derive(Debug, Error)]
pub enum ListingError {
	/// The requested directory does not exist on the remote side
	#[error("Directory not found: {path}")]
	NotFound { path: RemotePath },

	/// The request did not complete in time
	#[error("Listing of '{path}' timed out after {secs}s")]
	Timeout { path: RemotePath, secs: u64 },

	/// I/O failure while listing
	#[error("I/O error listing '{path}': {source}")]
	Io { path: RemotePath, source: io::Error },

	/// Any other transport failure
	#[error("Transport failed for '{path}': {message}")]
	Transport { path: RemotePath, message: String },
}

impl ListingError {
	/// Path the failed request was for
	pub fn path(&self) -> &RemotePath {
		match self {
			ListingError::NotFound { path }
			| ListingError::Timeout { path, .. }
			| ListingError::Io { path, .. }
			| ListingError::Transport { path, .. } => path,
		}
	}
}

/// Exclusion persistence errors
#[derive(Debug, Error)]
pub enum StoreError {
	/// Failed to read the store
	#[error("Failed to load exclusions: {source}")]
	LoadFailed { source: io::Error },

	/// Failed to write the store
	#[error("Failed to save exclusions: {source}")]
	SaveFailed { source: io::Error },

	/// Store file could not be parsed
	#[error("Exclusion store corrupted: {message}")]
	Corrupted { message: String },
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Failed to read the config file
	#[error("Cannot read config file {path}: {source}")]
	Read { path: String, source: io::Error },

	/// Config file has invalid syntax
	#[error("Cannot parse config file {path}: {message}")]
	Parse { path: String, message: String },

	/// A value is out of range
	#[error("Invalid configuration: {message}")]
	Invalid { message: String },
}


// vim: ts=4
