//! Lazily populated directory tree
//!
//! Nodes live in an arena and are addressed by [`NodeId`]. Parents own their
//! children through id lists; the parent link is a plain index used only when
//! folding state upward. Nodes are never removed: a refresh builds a new tree.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

use super::node::{Node, NodeId, TriState};
use crate::callbacks::{NoCallbacks, SelectionCallbacks};
use crate::error::SelectError;
use crate::path::{decompose_entry, ListingEntry, RemotePath};

/// Outcome of merging one listing into the tree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InsertReport {
	/// Nodes created by this listing (including intermediate ones)
	pub inserted: usize,
	/// Entries that matched a node already present
	pub reused: usize,
	/// File entries, which never become nodes
	pub skipped_files: usize,
	/// Entries not below the listed directory, or with `.`/`..` segments
	pub rejected: usize,
}

/// In-memory selection tree for one editing session
pub struct SelectionTree {
	pub(crate) nodes: Vec<Node>,
	index: HashMap<RemotePath, NodeId>,
	root_path: RemotePath,
	root_label: String,
	prior: Vec<RemotePath>,
	pub(crate) callbacks: Arc<dyn SelectionCallbacks>,
}

impl SelectionTree {
	/// Create an empty tree; the root appears with the first listing
	pub fn new(root_path: RemotePath, root_label: impl Into<String>, prior: Vec<RemotePath>) -> Self {
		SelectionTree {
			nodes: Vec::new(),
			index: HashMap::new(),
			root_path,
			root_label: root_label.into(),
			prior,
			callbacks: Arc::new(NoCallbacks),
		}
	}

	pub fn with_callbacks(mut self, callbacks: Arc<dyn SelectionCallbacks>) -> Self {
		self.callbacks = callbacks;
		self
	}

	pub fn root(&self) -> Option<NodeId> {
		if self.nodes.is_empty() {
			None
		} else {
			Some(NodeId(0))
		}
	}

	pub fn root_path(&self) -> &RemotePath {
		&self.root_path
	}

	pub fn root_label(&self) -> &str {
		&self.root_label
	}

	/// The exclusion list in effect when the session opened
	pub fn prior_exclusions(&self) -> &[RemotePath] {
		&self.prior
	}

	pub fn node(&self, id: NodeId) -> Option<&Node> {
		self.nodes.get(id.0)
	}

	pub(crate) fn get(&self, id: NodeId) -> Result<&Node, SelectError> {
		self.nodes.get(id.0).ok_or(SelectError::UnknownNode(id))
	}

	/// Child ids of `id` in listing order; empty for an unknown id
	pub fn children(&self, id: NodeId) -> &[NodeId] {
		self.nodes.get(id.0).map(|n| n.children()).unwrap_or(&[])
	}

	pub fn parent(&self, id: NodeId) -> Option<NodeId> {
		self.nodes.get(id.0).and_then(|n| n.parent())
	}

	/// Look a node up by its full path
	pub fn find(&self, path: &RemotePath) -> Option<NodeId> {
		self.index.get(path).copied()
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// All nodes in pre-order with their depth (root is depth 0)
	pub fn walk(&self) -> Vec<(usize, NodeId)> {
		let mut out = Vec::with_capacity(self.nodes.len());
		let mut stack: Vec<(usize, NodeId)> = self.root().map(|r| (0, r)).into_iter().collect();
		while let Some((depth, id)) = stack.pop() {
			out.push((depth, id));
			for child in self.nodes[id.0].children.iter().rev() {
				stack.push((depth + 1, *child));
			}
		}
		out
	}

	/// Create the root node if the tree is still empty
	pub fn ensure_root(&mut self) -> NodeId {
		if let Some(root) = self.root() {
			return root;
		}
		let state = self.seed_initial_state(TriState::PartiallyIncluded, &self.root_path);
		let node = Node::new(self.root_label.clone(), self.root_path.clone(), state, None);
		self.nodes.push(node);
		self.index.insert(self.root_path.clone(), NodeId(0));
		debug!("Created root '{}' at '{}' as {}", self.root_label, self.root_path, state);
		self.callbacks.on_node_inserted(NodeId(0), &self.root_path, state);
		NodeId(0)
	}

	/// Merge a directory listing below `parent_path`
	///
	/// Entries are absolute remote paths. Repeated or overlapping entries reuse
	/// existing nodes, so applying the same listing twice changes nothing. The
	/// parent is marked as fetched even when the listing is empty.
	pub fn insert_listing<S: AsRef<str>>(
		&mut self,
		parent_path: &RemotePath,
		entries: &[S],
	) -> Result<InsertReport, SelectError> {
		let parent = if self.root().is_none() && *parent_path == self.root_path {
			self.ensure_root()
		} else {
			self.find(parent_path).ok_or_else(|| SelectError::UnknownPath(parent_path.clone()))?
		};

		let mut report = InsertReport::default();
		for entry in entries {
			let entry = entry.as_ref();
			match decompose_entry(parent_path, entry) {
				None => {
					warn!("Discarding listing entry '{}' not below '{}'", entry, parent_path);
					report.rejected += 1;
				}
				Some(ListingEntry::SelfEntry) => {}
				Some(ListingEntry::File(name)) => {
					debug!("Skipping file entry '{}'", name);
					report.skipped_files += 1;
				}
				Some(ListingEntry::Directory(segments)) => {
					let mut cur = parent;
					let mut created = false;
					for segment in segments {
						cur = match self.child_named(cur, segment) {
							Some(existing) => existing,
							None => {
								created = true;
								report.inserted += 1;
								self.create_child(cur, segment)
							}
						};
					}
					if !created {
						report.reused += 1;
					}
				}
			}
		}

		self.nodes[parent.0].children_fetched = true;
		self.callbacks.on_children_fetched(parent, parent_path, report.inserted);
		debug!(
			"Listing for '{}': {} inserted, {} reused, {} files, {} rejected",
			parent_path, report.inserted, report.reused, report.skipped_files, report.rejected
		);
		Ok(report)
	}

	fn child_named(&self, parent: NodeId, name: &str) -> Option<NodeId> {
		let path = self.nodes[parent.0].path.join(name);
		self.index.get(&path).copied()
	}

	fn create_child(&mut self, parent: NodeId, name: &str) -> NodeId {
		let id = NodeId(self.nodes.len());
		let parent_node = &self.nodes[parent.0];
		let path = parent_node.path.join(name);
		let state = self.seed_initial_state(parent_node.state, &path);

		self.nodes.push(Node::new(name.to_string(), path.clone(), state, Some(parent)));
		self.nodes[parent.0].children.push(id);
		self.index.insert(path.clone(), id);
		self.callbacks.on_node_inserted(id, &path, state);
		id
	}

	/// Initial state of a freshly created node
	///
	/// A decided parent passes its state down. Under a partial parent the prior
	/// exclusions decide: an entry covering the node excludes it, an entry below
	/// it makes it partial. This path never folds state upward.
	pub(crate) fn seed_initial_state(&self, parent_state: TriState, path: &RemotePath) -> TriState {
		match parent_state {
			TriState::Included => TriState::Included,
			TriState::Excluded => TriState::Excluded,
			TriState::PartiallyIncluded => {
				if self.prior.iter().any(|e| e.contains(path)) {
					TriState::Excluded
				} else if self.prior.iter().any(|e| path.is_ancestor_of(e)) {
					TriState::PartiallyIncluded
				} else {
					TriState::Included
				}
			}
		}
	}

	/// Set a node's state, notifying listeners if it changed
	pub(crate) fn set_state(&mut self, id: NodeId, state: TriState) -> bool {
		let node = &mut self.nodes[id.0];
		if node.state == state {
			return false;
		}
		node.state = state;
		self.callbacks.on_state_changed(id, &node.path, state);
		true
	}
}


// vim: ts=4
