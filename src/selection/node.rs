//! Tree nodes and the tri-state flag

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::path::RemotePath;

/// Stable index of a node inside its tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub(crate) usize);

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.0)
	}
}

/// Sync inclusion state of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TriState {
	Included,
	Excluded,
	PartiallyIncluded,
}

impl TriState {
	/// Checkbox-style marker used in text renderings
	pub fn marker(self) -> &'static str {
		match self {
			TriState::Included => "[x]",
			TriState::Excluded => "[ ]",
			TriState::PartiallyIncluded => "[~]",
		}
	}
}

impl fmt::Display for TriState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			TriState::Included => write!(f, "included"),
			TriState::Excluded => write!(f, "excluded"),
			TriState::PartiallyIncluded => write!(f, "partially included"),
		}
	}
}

/// States a user may set directly
///
/// `PartiallyIncluded` is only ever derived, so it has no counterpart here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserState {
	Include,
	Exclude,
}

impl From<UserState> for TriState {
	fn from(s: UserState) -> Self {
		match s {
			UserState::Include => TriState::Included,
			UserState::Exclude => TriState::Excluded,
		}
	}
}

/// One directory in the remote hierarchy
#[derive(Debug, Clone)]
pub struct Node {
	pub(crate) name: String,
	pub(crate) path: RemotePath,
	pub(crate) state: TriState,
	pub(crate) children_fetched: bool,
	pub(crate) parent: Option<NodeId>,
	pub(crate) children: Vec<NodeId>,
}

impl Node {
	pub(crate) fn new(
		name: String,
		path: RemotePath,
		state: TriState,
		parent: Option<NodeId>,
	) -> Self {
		Node { name, path, state, children_fetched: false, parent, children: Vec::new() }
	}

	/// Display label (path segment, or the session label for the root)
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Full remote path this node denotes
	pub fn path(&self) -> &RemotePath {
		&self.path
	}

	pub fn state(&self) -> TriState {
		self.state
	}

	/// True once a listing for this node has been inserted
	pub fn children_fetched(&self) -> bool {
		self.children_fetched
	}

	pub fn parent(&self) -> Option<NodeId> {
		self.parent
	}

	/// Child ids in first-insertion order
	pub fn children(&self) -> &[NodeId] {
		&self.children
	}

	pub fn is_leaf(&self) -> bool {
		self.children.is_empty()
	}
}


// vim: ts=4
