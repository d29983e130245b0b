//! Exclusion list derivation

use super::node::{NodeId, TriState};
use super::tree::SelectionTree;
use crate::error::SelectError;
use crate::path::RemotePath;

impl SelectionTree {
	/// Compute the exclusion list for the whole tree
	///
	/// An excluded node stands for its entire subtree. Regions that were never
	/// listed fall back to the prior exclusions below them. Without a root (the
	/// first listing never arrived) the prior list carries over unchanged.
	pub fn derive_exclusions(&self) -> Vec<RemotePath> {
		match self.root() {
			Some(root) => {
				let mut out = Vec::new();
				self.collect(root, &mut out);
				out
			}
			None => {
				let root_path = self.root_path().clone();
				minimal(self.prior_exclusions().iter().filter(|e| root_path.contains(e)).cloned())
			}
		}
	}

	/// Compute the exclusion entries contributed by one subtree
	pub fn derive_exclusions_from(&self, id: NodeId) -> Result<Vec<RemotePath>, SelectError> {
		self.get(id)?;
		let mut out = Vec::new();
		self.collect(id, &mut out);
		Ok(out)
	}

	fn collect(&self, id: NodeId, out: &mut Vec<RemotePath>) {
		let node = &self.nodes[id.0];
		match node.state {
			TriState::Included => {}
			TriState::Excluded => out.push(node.path.clone()),
			TriState::PartiallyIncluded => {
				if node.children.is_empty() {
					out.extend(self.prior_below(&node.path, &[]));
					return;
				}
				for child in &node.children {
					self.collect(*child, out);
				}
				if !node.children_fetched {
					// Known children came from deeper entries of an ancestor's
					// listing; the rest of this directory is still unexplored.
					let known: Vec<&RemotePath> =
						node.children.iter().map(|c| &self.nodes[c.0].path).collect();
					out.extend(self.prior_below(&node.path, &known));
				}
			}
		}
	}

	/// Prior entries under `path` that no known subtree accounts for
	fn prior_below(&self, path: &RemotePath, known: &[&RemotePath]) -> Vec<RemotePath> {
		minimal(
			self.prior_exclusions()
				.iter()
				.filter(|e| path.contains(e))
				.filter(|e| !known.iter().any(|k| k.contains(e)))
				.cloned(),
		)
	}
}

/// Drop duplicates and entries nested below another entry, keeping order
pub(crate) fn minimal(entries: impl Iterator<Item = RemotePath>) -> Vec<RemotePath> {
	let all: Vec<RemotePath> = entries.collect();
	let mut out: Vec<RemotePath> = Vec::with_capacity(all.len());
	for entry in &all {
		if out.contains(entry) || all.iter().any(|other| other.is_ancestor_of(entry)) {
			continue;
		}
		out.push(entry.clone());
	}
	out
}


// vim: ts=4
