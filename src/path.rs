//! Remote directory paths
//!
//! Every path handled by the selection engine is kept in "directory form":
//! `/`-separated segments, each followed by a single `/`. The empty path is
//! the account root. With the trailing separator in place a plain string
//! prefix test is segment-aware (`docs/` is not a prefix of `docs2/`).

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A normalized remote directory path
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RemotePath(String);

impl RemotePath {
	/// Normalize a raw path into directory form
	///
	/// Repeated separators collapse and a trailing `/` is appended. A leading
	/// `/` is preserved so absolute server paths keep their shape.
	pub fn new(raw: &str) -> Self {
		let mut out = String::with_capacity(raw.len() + 1);
		if raw.starts_with('/') {
			out.push('/');
		}
		for segment in raw.split('/').filter(|s| !s.is_empty()) {
			out.push_str(segment);
			out.push('/');
		}
		RemotePath(out)
	}

	/// The account root (empty path)
	pub fn root() -> Self {
		RemotePath(String::new())
	}

	/// Append one segment
	pub fn join(&self, segment: &str) -> Self {
		let segment = segment.trim_matches('/');
		if segment.is_empty() {
			return self.clone();
		}
		RemotePath(format!("{}{}/", self.0, segment))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	pub fn is_root(&self) -> bool {
		self.0.is_empty() || self.0 == "/"
	}

	/// True if `other` lies strictly below this path
	pub fn is_ancestor_of(&self, other: &RemotePath) -> bool {
		other.0.len() > self.0.len() && other.0.starts_with(&self.0)
	}

	/// True if `other` is this path or lies below it
	pub fn contains(&self, other: &RemotePath) -> bool {
		other.0.starts_with(&self.0)
	}

	/// Path segments, outermost first
	pub fn segments(&self) -> impl Iterator<Item = &str> {
		self.0.split('/').filter(|s| !s.is_empty())
	}

	/// Last segment, or `None` for the root
	pub fn name(&self) -> Option<&str> {
		self.segments().last()
	}

	/// The path one level up, or `None` for the root
	pub fn parent(&self) -> Option<RemotePath> {
		if self.is_root() {
			return None;
		}
		let trimmed = &self.0[..self.0.len() - 1];
		match trimmed.rfind('/') {
			Some(idx) => Some(RemotePath(trimmed[..=idx].to_string())),
			None => Some(RemotePath::root()),
		}
	}

	/// Every ancestor from the outermost down to the direct parent
	pub fn ancestors(&self) -> Vec<RemotePath> {
		let mut out = Vec::new();
		let mut cur = self.parent();
		while let Some(p) = cur {
			cur = p.parent();
			out.push(p);
		}
		out.reverse();
		out
	}
}

/// One entry of a directory listing, decomposed relative to the listed parent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingEntry<'a> {
	/// The listed directory itself
	SelfEntry,
	/// A directory below the parent, as segments relative to it
	Directory(Vec<&'a str>),
	/// A plain file (no trailing separator)
	File(&'a str),
}

/// Split a raw listing entry into segments below `parent`
///
/// Returns `None` when the entry does not start with the parent path or
/// contains `.` or `..` segments.
pub fn decompose_entry<'a>(parent: &RemotePath, entry: &'a str) -> Option<ListingEntry<'a>> {
	let rest = strip_parent(parent, entry)?;
	let is_dir = entry.ends_with('/');
	let segments: Vec<&str> = rest.split('/').filter(|s| !s.is_empty()).collect();
	if segments.iter().any(|s| *s == "." || *s == "..") {
		return None;
	}

	if segments.is_empty() {
		return Some(ListingEntry::SelfEntry);
	}
	if !is_dir {
		return Some(ListingEntry::File(rest));
	}
	Some(ListingEntry::Directory(segments))
}

fn strip_parent<'a>(parent: &RemotePath, entry: &'a str) -> Option<&'a str> {
	let p = parent.as_str();
	if let Some(rest) = entry.strip_prefix(p) {
		return Some(rest);
	}
	// The listed directory is allowed to come back without its trailing slash
	let bare = p.strip_suffix('/')?;
	if entry == bare {
		return Some("");
	}
	None
}

impl fmt::Display for RemotePath {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl From<&str> for RemotePath {
	fn from(s: &str) -> Self {
		RemotePath::new(s)
	}
}

impl From<String> for RemotePath {
	fn from(s: String) -> Self {
		RemotePath::new(&s)
	}
}

impl Serialize for RemotePath {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(&self.0)
	}
}

impl<'de> Deserialize<'de> for RemotePath {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let raw = String::deserialize(deserializer)?;
		Ok(RemotePath::new(&raw))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_normalization() {
		assert_eq!(RemotePath::new("a/b").as_str(), "a/b/");
		assert_eq!(RemotePath::new("a//b/").as_str(), "a/b/");
		assert_eq!(RemotePath::new("/remote/dav/").as_str(), "/remote/dav/");
		assert_eq!(RemotePath::new("").as_str(), "");
		assert!(RemotePath::new("").is_root());
	}

	#[test]
	fn test_prefix_is_segment_aware() {
		let docs = RemotePath::new("docs");
		assert!(docs.is_ancestor_of(&RemotePath::new("docs/2024")));
		assert!(!docs.is_ancestor_of(&RemotePath::new("docs2/x")));
		assert!(!docs.is_ancestor_of(&docs));
		assert!(docs.contains(&docs));
		assert!(RemotePath::root().is_ancestor_of(&docs));
	}

	#[test]
	fn test_parent_and_ancestors() {
		let p = RemotePath::new("a/b/c");
		assert_eq!(p.parent(), Some(RemotePath::new("a/b")));
		assert_eq!(p.name(), Some("c"));
		assert_eq!(
			p.ancestors(),
			vec![RemotePath::root(), RemotePath::new("a"), RemotePath::new("a/b")]
		);
		assert_eq!(RemotePath::root().parent(), None);
	}

	#[test]
	fn test_decompose_entry() {
		let parent = RemotePath::new("Photos");
		assert_eq!(
			decompose_entry(&parent, "Photos/2024/summer/"),
			Some(ListingEntry::Directory(vec!["2024", "summer"]))
		);
		assert_eq!(decompose_entry(&parent, "Photos/"), Some(ListingEntry::SelfEntry));
		assert_eq!(decompose_entry(&parent, "Photos"), Some(ListingEntry::SelfEntry));
		assert_eq!(decompose_entry(&parent, "Photos/cat.jpg"), Some(ListingEntry::File("cat.jpg")));
		assert_eq!(decompose_entry(&parent, "Music/x/"), None);
		assert_eq!(decompose_entry(&parent, "PhotosOld/x/"), None);
		assert_eq!(decompose_entry(&parent, "Photos/../x/"), None);
		assert_eq!(decompose_entry(&parent, "Photos/a/./b/"), None);
		assert_eq!(decompose_entry(&parent, "Photos/../secret.txt"), None);
	}

	#[test]
	fn test_serde_normalizes() {
		let p: RemotePath = serde_json::from_str("\"a/b\"").unwrap();
		assert_eq!(p.as_str(), "a/b/");
		assert_eq!(serde_json::to_string(&p).unwrap(), "\"a/b/\"");
	}
}

// vim: ts=4
