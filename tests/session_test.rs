//! Session behaviour: listing failures, duplicate and stale responses,
//! timeouts, notifications and persistence.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

use selsync::callbacks::EventBridge;
use selsync::transport::ListingResult;
use selsync::{
	ExclusionStore, FileExclusionStore, ListingTransport, MemoryExclusionStore, MemoryTransport,
	RemotePath, ResponseOutcome, SelectionEvent, SelectionSession, TriState, UserState,
};

fn memory(dirs: &[&str]) -> Arc<MemoryTransport> {
	Arc::new(MemoryTransport::from_dirs(&RemotePath::root(), dirs))
}

/// Transport that never answers within the test's patience
struct SlowTransport;

#[async_trait]
impl ListingTransport for SlowTransport {
	async fn request_listing(&self, path: &RemotePath) -> ListingResult {
		tokio::time::sleep(Duration::from_secs(10)).await;
		Ok(vec![format!("{}late/", path)])
	}
}

#[tokio::test]
async fn test_failed_listing_can_be_retried() {
	let transport = memory(&["a/1", "a/2"]);
	let mut session = SelectionSession::builder(transport.clone()).build();
	session.start();
	session.settle().await;

	let a = session.tree().find(&RemotePath::new("a")).unwrap();
	transport.fail(&RemotePath::new("a"));
	session.expand(a).unwrap();
	let outcomes = session.settle().await;
	assert_eq!(outcomes, vec![ResponseOutcome::Failed { path: RemotePath::new("a") }]);
	assert!(!session.tree().node(a).unwrap().children_fetched());

	transport.recover(&RemotePath::new("a"));
	session.expand(a).unwrap();
	session.settle().await;
	assert!(session.tree().node(a).unwrap().children_fetched());
	assert_eq!(session.tree().node(a).unwrap().children().len(), 2);
	assert_eq!(transport.request_count(), 3);
}

#[tokio::test]
async fn test_failed_root_listing_keeps_prior() {
	let transport = memory(&["a"]);
	transport.fail(&RemotePath::root());
	let mut session = SelectionSession::builder(transport)
		.prior_exclusions(vec![RemotePath::new("a/x"), RemotePath::new("b")])
		.build();
	session.start();
	session.settle().await;

	assert!(session.tree().root().is_none());
	assert_eq!(session.commit(), vec![RemotePath::new("a/x"), RemotePath::new("b")]);
}

#[tokio::test]
async fn test_duplicate_responses_merge() {
	let mut session = SelectionSession::builder(memory(&["a/1", "a/2", "b"])).build();
	session.start();
	session.settle().await;

	let a = session.tree().find(&RemotePath::new("a")).unwrap();
	session.expand(a).unwrap();
	session.expand(a).unwrap();
	assert_eq!(session.pending(), 2);

	let outcomes = session.settle().await;
	let inserted: Vec<usize> = outcomes
		.iter()
		.map(|o| match o {
			ResponseOutcome::Inserted { report, .. } => report.inserted,
			ResponseOutcome::Failed { .. } => panic!("unexpected failure"),
		})
		.collect();
	assert_eq!(inserted, vec![2, 0]);
	assert_eq!(session.tree().len(), 5);
}

#[tokio::test]
async fn test_refresh_discards_tree() {
	let mut session = SelectionSession::builder(memory(&["a", "b"])).build();
	session.start();
	session.settle().await;

	let b = session.tree().find(&RemotePath::new("b")).unwrap();
	session.toggle(b, UserState::Exclude).unwrap();
	session.refresh();
	assert_eq!(session.pending(), 1);
	session.settle().await;

	let b = session.tree().find(&RemotePath::new("b")).unwrap();
	assert_eq!(session.tree().node(b).unwrap().state(), TriState::Included);
	assert!(session.commit().is_empty());
}

#[tokio::test]
async fn test_refresh_drops_stale_responses() {
	let mut session = SelectionSession::builder(memory(&["a"])).build();
	session.start();
	session.refresh();
	let outcomes = session.settle().await;
	assert_eq!(outcomes.len(), 1);
	assert_eq!(session.tree().len(), 2);
}

#[tokio::test]
async fn test_listing_timeout() {
	let mut session = SelectionSession::builder(Arc::new(SlowTransport))
		.timeout(Duration::from_millis(50))
		.build();
	session.start();
	let outcome = session.next_response().await;
	assert_eq!(outcome, Some(ResponseOutcome::Failed { path: RemotePath::root() }));
	assert!(session.tree().root().is_none());
}

#[tokio::test]
async fn test_events_reach_bridge() {
	let (bridge, mut rx) = EventBridge::channel(64);
	let mut session = SelectionSession::builder(memory(&["a", "b"]))
		.callbacks(Arc::new(bridge))
		.build();
	session.start();
	session.settle().await;

	let a = session.tree().find(&RemotePath::new("a")).unwrap();
	session.toggle(a, UserState::Exclude).unwrap();

	let mut events = Vec::new();
	while let Ok(event) = rx.try_recv() {
		events.push(event);
	}

	let inserted = events.iter().filter(|e| matches!(e, SelectionEvent::NodeInserted { .. })).count();
	assert_eq!(inserted, 3);
	assert!(events.contains(&SelectionEvent::ChildrenFetched {
		id: session.tree().root().unwrap(),
		path: RemotePath::root(),
		inserted: 2
	}));
	assert!(events.contains(&SelectionEvent::StateChanged {
		id: a,
		path: RemotePath::new("a"),
		state: TriState::Excluded
	}));
	assert!(events.contains(&SelectionEvent::StateChanged {
		id: session.tree().root().unwrap(),
		path: RemotePath::root(),
		state: TriState::PartiallyIncluded
	}));
}

#[tokio::test]
async fn test_listing_failure_event() {
	let transport = memory(&["a"]);
	transport.fail(&RemotePath::root());
	let (bridge, mut rx) = EventBridge::channel(8);
	let mut session = SelectionSession::builder(transport).callbacks(Arc::new(bridge)).build();
	session.start();
	session.settle().await;

	match rx.try_recv() {
		Ok(SelectionEvent::ListingFailed { path, .. }) => assert_eq!(path, RemotePath::root()),
		other => panic!("expected ListingFailed, got {:?}", other),
	}
}

#[tokio::test]
async fn test_commit_to_file_store() {
	let temp_dir = TempDir::new().unwrap();
	let store = FileExclusionStore::new(temp_dir.path().to_path_buf(), "default");
	store.save("share", &[RemotePath::new("old")]).await.unwrap();

	let prior = store.load("share").await.unwrap();
	let mut session = SelectionSession::builder(memory(&["old", "new/deep", "new/keep"]))
		.prior_exclusions(prior)
		.build();
	let deep = session.reveal(&RemotePath::new("new/deep")).await.unwrap().unwrap();
	session.toggle(deep, UserState::Exclude).unwrap();

	let committed = session.commit_to(&store, "share").await.unwrap();
	assert_eq!(committed, vec![RemotePath::new("old"), RemotePath::new("new/deep")]);
	assert_eq!(store.load("share").await.unwrap(), committed);
}

#[tokio::test]
async fn test_cancel_persists_nothing() {
	let store = MemoryExclusionStore::new();
	let mut session = SelectionSession::builder(memory(&["a"])).build();
	let a = session.reveal(&RemotePath::new("a")).await.unwrap().unwrap();
	session.toggle(a, UserState::Exclude).unwrap();
	session.cancel();

	assert!(store.load("r").await.unwrap().is_empty());
}

// vim: ts=4
