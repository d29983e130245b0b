//! Selection editing session
//!
//! A session owns one [`SelectionTree`] and drives it from two kinds of
//! events: listing responses and user commands. Listing requests run as
//! detached tasks and report back over a channel; the session applies the
//! responses one at a time on its owner's task, so the tree is never touched
//! concurrently and needs no locking.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::callbacks::{NoCallbacks, SelectionCallbacks};
use crate::error::{ListingError, SelectError};
use crate::path::RemotePath;
use crate::selection::{InsertReport, NodeId, SelectionTree, UserState};
use crate::store::ExclusionStore;
use crate::transport::{ListingResult, ListingTransport};

/// A finished listing request, as delivered to the session
#[derive(Debug)]
struct ListingResponse {
	path: RemotePath,
	result: ListingResult,
}

/// What applying one listing response did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseOutcome {
	/// Entries merged under `path`
	Inserted { path: RemotePath, report: InsertReport },
	/// The request failed; `path` stays unfetched until expanded again
	Failed { path: RemotePath },
}

/// Builder for [`SelectionSession`]
pub struct SessionBuilder<T: ListingTransport + ?Sized + 'static> {
	transport: Arc<T>,
	root_path: RemotePath,
	root_label: Option<String>,
	prior: Vec<RemotePath>,
	timeout: Duration,
	callbacks: Arc<dyn SelectionCallbacks>,
}

impl<T: ListingTransport + ?Sized + 'static> SessionBuilder<T> {
	pub fn new(transport: Arc<T>) -> Self {
		SessionBuilder {
			transport,
			root_path: RemotePath::root(),
			root_label: None,
			prior: Vec::new(),
			timeout: Duration::from_secs(30),
			callbacks: Arc::new(NoCallbacks),
		}
	}

	/// Remote folder to browse; the label defaults to its last segment
	pub fn root(mut self, path: RemotePath) -> Self {
		self.root_path = path;
		self
	}

	pub fn label(mut self, label: impl Into<String>) -> Self {
		self.root_label = Some(label.into());
		self
	}

	/// Exclusion list in effect before this session
	pub fn prior_exclusions(mut self, prior: Vec<RemotePath>) -> Self {
		self.prior = prior;
		self
	}

	pub fn timeout(mut self, timeout: Duration) -> Self {
		self.timeout = timeout;
		self
	}

	pub fn callbacks(mut self, callbacks: Arc<dyn SelectionCallbacks>) -> Self {
		self.callbacks = callbacks;
		self
	}

	pub fn build(self) -> SelectionSession<T> {
		let label = self
			.root_label
			.unwrap_or_else(|| self.root_path.name().unwrap_or("/").to_string());
		let (tx, rx) = mpsc::unbounded_channel();
		let tree = SelectionTree::new(self.root_path, label, self.prior)
			.with_callbacks(self.callbacks.clone());

		SelectionSession {
			id: Uuid::new_v4(),
			transport: self.transport,
			tree,
			timeout: self.timeout,
			callbacks: self.callbacks,
			in_flight: 0,
			tx,
			rx,
		}
	}
}

/// One open selection dialog, from first listing to commit or cancel
pub struct SelectionSession<T: ListingTransport + ?Sized + 'static> {
	id: Uuid,
	transport: Arc<T>,
	tree: SelectionTree,
	timeout: Duration,
	callbacks: Arc<dyn SelectionCallbacks>,
	in_flight: usize,
	tx: mpsc::UnboundedSender<ListingResponse>,
	rx: mpsc::UnboundedReceiver<ListingResponse>,
}

impl<T: ListingTransport + ?Sized + 'static> SelectionSession<T> {
	pub fn builder(transport: Arc<T>) -> SessionBuilder<T> {
		SessionBuilder::new(transport)
	}

	pub fn id(&self) -> Uuid {
		self.id
	}

	pub fn tree(&self) -> &SelectionTree {
		&self.tree
	}

	/// Listing requests issued but not yet applied
	pub fn pending(&self) -> usize {
		self.in_flight
	}

	/// Request the root listing
	pub fn start(&mut self) {
		info!(session = %self.id, "Opening selection for '{}'", self.tree.root_path());
		let root = self.tree.root_path().clone();
		self.request(root);
	}

	/// Request the listing of a node's directory
	///
	/// Every call issues a request, even for an already fetched node; a
	/// repeated listing merges without changes.
	pub fn expand(&mut self, id: NodeId) -> Result<(), SelectError> {
		let path = self.tree.node(id).ok_or(SelectError::UnknownNode(id))?.path().clone();
		self.request(path);
		Ok(())
	}

	fn request(&mut self, path: RemotePath) {
		debug!(session = %self.id, "Requesting listing of '{}'", path);
		let transport = self.transport.clone();
		let tx = self.tx.clone();
		let timeout = self.timeout;

		self.in_flight += 1;
		tokio::spawn(async move {
			let result = match tokio::time::timeout(timeout, transport.request_listing(&path)).await {
				Ok(result) => result,
				Err(_) => Err(ListingError::Timeout { path: path.clone(), secs: timeout.as_secs() }),
			};
			// The receiver is gone after a refresh or once the session ends
			let _ = tx.send(ListingResponse { path, result });
		});
	}

	/// Wait for the next listing response and apply it
	///
	/// Returns `None` when nothing is in flight.
	pub async fn next_response(&mut self) -> Option<ResponseOutcome> {
		if self.in_flight == 0 {
			return None;
		}
		let response = self.rx.recv().await?;
		self.in_flight -= 1;
		Some(self.apply(response))
	}

	/// Apply responses until no request is in flight
	pub async fn settle(&mut self) -> Vec<ResponseOutcome> {
		let mut outcomes = Vec::new();
		while let Some(outcome) = self.next_response().await {
			outcomes.push(outcome);
		}
		outcomes
	}

	fn apply(&mut self, response: ListingResponse) -> ResponseOutcome {
		let ListingResponse { path, result } = response;
		match result {
			Ok(entries) => match self.tree.insert_listing(&path, &entries) {
				Ok(report) => ResponseOutcome::Inserted { path, report },
				Err(e) => {
					warn!(session = %self.id, "Dropping listing for '{}': {}", path, e);
					ResponseOutcome::Failed { path }
				}
			},
			Err(e) => {
				warn!(session = %self.id, "Listing failed: {}", e);
				self.callbacks.on_listing_failed(&e);
				ResponseOutcome::Failed { path }
			}
		}
	}

	/// Apply a user toggle
	pub fn toggle(&mut self, id: NodeId, state: UserState) -> Result<usize, SelectError> {
		self.tree.toggle(id, state)
	}

	/// Expand every unfetched ancestor of `path`, then look it up
	///
	/// Returns `None` if the path does not exist remotely or a listing on the
	/// way failed.
	pub async fn reveal(&mut self, path: &RemotePath) -> Result<Option<NodeId>, SelectError> {
		if self.tree.root().is_none() {
			if self.in_flight == 0 {
				self.start();
			}
			self.settle().await;
		}

		let root_path = self.tree.root_path().clone();
		let dirs = path.ancestors().into_iter().filter(|a| root_path.contains(a));
		for dir in dirs {
			let id = match self.tree.find(&dir) {
				Some(id) => id,
				None => return Ok(None),
			};
			if !self.tree.get(id)?.children_fetched() {
				self.expand(id)?;
				self.settle().await;
			}
		}
		Ok(self.tree.find(path))
	}

	/// Expand every node down to `depth` levels below the root
	pub async fn expand_to_depth(&mut self, depth: usize) -> Result<(), SelectError> {
		if self.tree.root().is_none() && self.in_flight == 0 {
			self.start();
		}
		self.settle().await;

		for level in 1..depth {
			let frontier: Vec<NodeId> = self
				.tree
				.walk()
				.into_iter()
				.filter(|(d, id)| *d == level && !self.tree.get(*id).map(|n| n.children_fetched()).unwrap_or(true))
				.map(|(_, id)| id)
				.collect();
			if frontier.is_empty() {
				break;
			}
			for id in frontier {
				self.expand(id)?;
			}
			self.settle().await;
		}
		Ok(())
	}

	/// Discard the tree and start over from a fresh root listing
	///
	/// Responses to requests issued before the refresh are dropped.
	pub fn refresh(&mut self) {
		info!(session = %self.id, "Refreshing selection tree");
		let (tx, rx) = mpsc::unbounded_channel();
		self.tx = tx;
		self.rx = rx;
		self.in_flight = 0;

		let tree = SelectionTree::new(
			self.tree.root_path().clone(),
			self.tree.root_label().to_string(),
			self.tree.prior_exclusions().to_vec(),
		);
		self.tree = tree.with_callbacks(self.callbacks.clone());
		self.start();
	}

	/// Finish the session and return the new exclusion list
	pub fn commit(self) -> Vec<RemotePath> {
		let exclusions = self.tree.derive_exclusions();
		info!(session = %self.id, "Committed {} exclusions", exclusions.len());
		exclusions
	}

	/// Commit and persist the result under `key`
	pub async fn commit_to<S>(self, store: &S, key: &str) -> Result<Vec<RemotePath>, SelectError>
	where
		S: ExclusionStore + ?Sized,
	{
		let exclusions = self.commit();
		store.save(key, &exclusions).await?;
		Ok(exclusions)
	}

	/// Drop all pending state without persisting anything
	pub fn cancel(self) {
		info!(session = %self.id, "Selection cancelled");
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::selection::TriState;
	use crate::transport::MemoryTransport;

	fn session(dirs: &[&str], prior: &[&str]) -> SelectionSession<MemoryTransport> {
		let transport = Arc::new(MemoryTransport::from_dirs(&RemotePath::root(), dirs));
		SelectionSession::builder(transport)
			.label("Account")
			.prior_exclusions(prior.iter().map(|p| RemotePath::new(p)).collect())
			.build()
	}

	#[tokio::test]
	async fn test_start_builds_root() {
		let mut s = session(&["a", "b"], &[]);
		s.start();
		assert_eq!(s.pending(), 1);
		let outcomes = s.settle().await;
		assert_eq!(outcomes.len(), 1);
		assert_eq!(s.pending(), 0);

		let root = s.tree().root().unwrap();
		assert_eq!(s.tree().node(root).unwrap().name(), "Account");
		assert_eq!(s.tree().len(), 3);
	}

	#[tokio::test]
	async fn test_next_response_without_requests() {
		let mut s = session(&["a"], &[]);
		assert!(s.next_response().await.is_none());
	}

	#[tokio::test]
	async fn test_reveal_expands_ancestors() {
		let mut s = session(&["a/b/c", "x"], &[]);
		let id = s.reveal(&RemotePath::new("a/b/c")).await.unwrap();
		assert!(id.is_some());

		let a = s.tree().find(&RemotePath::new("a")).unwrap();
		assert!(s.tree().node(a).unwrap().children_fetched());
		assert!(s.reveal(&RemotePath::new("a/zz")).await.unwrap().is_none());
	}

	#[tokio::test]
	async fn test_toggle_and_commit() {
		let mut s = session(&["a", "b"], &[]);
		let b = s.reveal(&RemotePath::new("b")).await.unwrap().unwrap();
		s.toggle(b, UserState::Exclude).unwrap();
		let root = s.tree().root().unwrap();
		assert_eq!(s.tree().node(root).unwrap().state(), TriState::PartiallyIncluded);
		assert_eq!(s.commit(), vec![RemotePath::new("b")]);
	}
}

// vim: ts=4
