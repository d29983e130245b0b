//! User-driven state changes
//!
//! A toggle overwrites the whole subtree below the node, then folds the change
//! into the ancestors one level at a time. Ascent stops at the first ancestor
//! whose state comes out unchanged, since everything above it was already
//! consistent before the toggle.

use tracing::debug;

use super::node::{NodeId, TriState, UserState};
use super::tree::SelectionTree;
use crate::error::SelectError;

impl SelectionTree {
	/// Apply a user toggle to `id`
	///
	/// Returns the number of nodes whose state changed.
	pub fn toggle(&mut self, id: NodeId, state: UserState) -> Result<usize, SelectError> {
		self.get(id)?;
		let target = TriState::from(state);

		let mut changed = 0;
		let mut stack = vec![id];
		while let Some(cur) = stack.pop() {
			if self.set_state(cur, target) {
				changed += 1;
			}
			stack.extend_from_slice(&self.nodes[cur.0].children);
		}
		changed += self.fold_upward(id);

		debug!("Toggled '{}' to {} ({} nodes changed)", self.nodes[id.0].path, target, changed);
		Ok(changed)
	}

	fn fold_upward(&mut self, from: NodeId) -> usize {
		let mut changed = 0;
		let mut child = from;

		while let Some(parent) = self.nodes[child.0].parent {
			let child_state = self.nodes[child.0].state;
			let parent_state = self.nodes[parent.0].state;

			let next = match child_state {
				TriState::Included | TriState::Excluded => {
					if self.is_uniform(parent, child_state) {
						child_state
					} else if parent_state != TriState::PartiallyIncluded && parent_state != child_state {
						TriState::PartiallyIncluded
					} else {
						parent_state
					}
				}
				TriState::PartiallyIncluded => TriState::PartiallyIncluded,
			};

			if next == parent_state {
				break;
			}
			self.set_state(parent, next);
			changed += 1;
			child = parent;
		}
		changed
	}

	/// True if every known child of `id` is in `state`
	fn is_uniform(&self, id: NodeId, state: TriState) -> bool {
		self.nodes[id.0].children.iter().all(|c| self.nodes[c.0].state == state)
	}
}


// vim: ts=4
