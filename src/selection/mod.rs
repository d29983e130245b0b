//! Tri-state selection engine
//!
//! - `tree`: lazily populated node arena and listing insertion
//! - `toggle`: user toggles with downward and upward propagation
//! - `derive`: exclusion list derivation with fallback for unexplored regions

mod derive;
mod node;
mod toggle;
mod tree;

pub use node::{Node, NodeId, TriState, UserState};
pub use tree::{InsertReport, SelectionTree};

// vim: ts=4
