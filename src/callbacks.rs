//! Callback traits for tree change notifications
//!
//! The selection engine never reaches into a UI. Anything that renders the
//! tree subscribes here and reacts to the changes it is told about.

use tokio::sync::broadcast;

use crate::error::ListingError;
use crate::path::RemotePath;
use crate::selection::{NodeId, TriState};

// Type aliases to reduce complexity
type InsertedFn = dyn Fn(NodeId, &RemotePath, TriState) + Send + Sync;
type StateChangedFn = dyn Fn(NodeId, &RemotePath, TriState) + Send + Sync;
type FetchedFn = dyn Fn(NodeId, &RemotePath, usize) + Send + Sync;
type ListingFailedFn = dyn Fn(&ListingError) + Send + Sync;

/// Combined callback handler for all tree events
pub trait SelectionCallbacks: Send + Sync {
	/// Called when a node is created by a listing
	fn on_node_inserted(&self, _id: NodeId, _path: &RemotePath, _state: TriState) {}

	/// Called whenever an existing node's state changes
	fn on_state_changed(&self, _id: NodeId, _path: &RemotePath, _state: TriState) {}

	/// Called when a listing has been merged under a node
	///
	/// `inserted` counts newly created nodes, so it is zero for a repeated listing.
	fn on_children_fetched(&self, _id: NodeId, _path: &RemotePath, _inserted: usize) {}

	/// Called when a listing request failed
	fn on_listing_failed(&self, _error: &ListingError) {}
}

/// Default callback implementation that does nothing
pub struct NoCallbacks;

impl SelectionCallbacks for NoCallbacks {}

/// Builder for callbacks using function closures
#[derive(Default)]
pub struct CallbackBuilder {
	inserted: Option<Box<InsertedFn>>,
	state_changed: Option<Box<StateChangedFn>>,
	fetched: Option<Box<FetchedFn>>,
	listing_failed: Option<Box<ListingFailedFn>>,
}

impl CallbackBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn on_node_inserted<F>(mut self, f: F) -> Self
	where
		F: Fn(NodeId, &RemotePath, TriState) + Send + Sync + 'static,
	{
		self.inserted = Some(Box::new(f));
		self
	}

	pub fn on_state_changed<F>(mut self, f: F) -> Self
	where
		F: Fn(NodeId, &RemotePath, TriState) + Send + Sync + 'static,
	{
		self.state_changed = Some(Box::new(f));
		self
	}

	pub fn on_children_fetched<F>(mut self, f: F) -> Self
	where
		F: Fn(NodeId, &RemotePath, usize) + Send + Sync + 'static,
	{
		self.fetched = Some(Box::new(f));
		self
	}

	pub fn on_listing_failed<F>(mut self, f: F) -> Self
	where
		F: Fn(&ListingError) + Send + Sync + 'static,
	{
		self.listing_failed = Some(Box::new(f));
		self
	}

	pub fn build(self) -> ClosureCallbacks {
		ClosureCallbacks { inner: self }
	}
}

/// Callbacks assembled by [`CallbackBuilder`]
pub struct ClosureCallbacks {
	inner: CallbackBuilder,
}

impl SelectionCallbacks for ClosureCallbacks {
	fn on_node_inserted(&self, id: NodeId, path: &RemotePath, state: TriState) {
		if let Some(f) = &self.inner.inserted {
			f(id, path, state);
		}
	}

	fn on_state_changed(&self, id: NodeId, path: &RemotePath, state: TriState) {
		if let Some(f) = &self.inner.state_changed {
			f(id, path, state);
		}
	}

	fn on_children_fetched(&self, id: NodeId, path: &RemotePath, inserted: usize) {
		if let Some(f) = &self.inner.fetched {
			f(id, path, inserted);
		}
	}

	fn on_listing_failed(&self, error: &ListingError) {
		if let Some(f) = &self.inner.listing_failed {
			f(error);
		}
	}
}

/// Tree events as plain data, for listeners on another task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionEvent {
	NodeInserted { id: NodeId, path: RemotePath, state: TriState },
	StateChanged { id: NodeId, path: RemotePath, state: TriState },
	ChildrenFetched { id: NodeId, path: RemotePath, inserted: usize },
	ListingFailed { path: RemotePath, error: String },
}

/// Forwards tree events to a broadcast channel
pub struct EventBridge {
	event_tx: broadcast::Sender<SelectionEvent>,
}

impl EventBridge {
	pub fn new(event_tx: broadcast::Sender<SelectionEvent>) -> Self {
		EventBridge { event_tx }
	}

	/// Create a bridge together with its first receiver
	pub fn channel(capacity: usize) -> (Self, broadcast::Receiver<SelectionEvent>) {
		let (tx, rx) = broadcast::channel(capacity);
		(EventBridge::new(tx), rx)
	}

	fn send_event(&self, event: SelectionEvent) {
		// No receivers is fine
		let _ = self.event_tx.send(event);
	}
}

impl SelectionCallbacks for EventBridge {
	fn on_node_inserted(&self, id: NodeId, path: &RemotePath, state: TriState) {
		self.send_event(SelectionEvent::NodeInserted { id, path: path.clone(), state });
	}

	fn on_state_changed(&self, id: NodeId, path: &RemotePath, state: TriState) {
		self.send_event(SelectionEvent::StateChanged { id, path: path.clone(), state });
	}

	fn on_children_fetched(&self, id: NodeId, path: &RemotePath, inserted: usize) {
		self.send_event(SelectionEvent::ChildrenFetched { id, path: path.clone(), inserted });
	}

	fn on_listing_failed(&self, error: &ListingError) {
		self.send_event(SelectionEvent::ListingFailed {
			path: error.path().clone(),
			error: error.to_string(),
		});
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::{Arc, Mutex};

	#[test]
	fn test_closure_callbacks_forward() {
		let seen = Arc::new(Mutex::new(Vec::new()));
		let sink = seen.clone();
		let cb = CallbackBuilder::new()
			.on_state_changed(move |_, path, state| {
				sink.lock().unwrap().push((path.to_string(), state));
			})
			.build();

		cb.on_state_changed(NodeId(3), &RemotePath::new("a"), TriState::Excluded);
		cb.on_node_inserted(NodeId(4), &RemotePath::new("b"), TriState::Included);

		assert_eq!(*seen.lock().unwrap(), vec![("a/".to_string(), TriState::Excluded)]);
	}

	#[test]
	fn test_bridge_sends_events() {
		let (bridge, mut rx) = EventBridge::channel(8);
		bridge.on_state_changed(NodeId(1), &RemotePath::new("x"), TriState::Included);

		let event = rx.try_recv().unwrap();
		assert_eq!(
			event,
			SelectionEvent::StateChanged {
				id: NodeId(1),
				path: RemotePath::new("x"),
				state: TriState::Included
			}
		);
	}

	#[test]
	fn test_bridge_without_receivers() {
		let (tx, rx) = broadcast::channel(4);
		drop(rx);
		let bridge = EventBridge::new(tx);
		bridge.on_children_fetched(NodeId(0), &RemotePath::root(), 2);
	}
}

// vim: ts=4
