//! Content source abstraction for nsite.
//!
//! This crate provides a [`ContentSource`] trait for the CMS side of a site
//! build: refreshing the content tree, walking it, and answering sub-page
//! queries by route. The collection logic in `nsite-collections` is written
//! against this trait only, which enables:
//!
//! - **Unit testing** without a CMS or the filesystem
//! - **Backend flexibility** (local snapshot, live CMS client)
//! - **Clean separation** between collection building and content fetching
//!
//! # Architecture
//!
//! The crate provides:
//! - [`ContentSource`] trait with `pull()`, `export()`, `walk()`, and
//!   `filter_sub_pages()` methods
//! - [`SnapshotSource`] reading a cached `tree.json` from a local directory
//! - [`MockSource`] for testing (behind `mock` feature flag)
//!
//! # Example
//!
//! ```ignore
//! use nsite_source::{ContentSource, SnapshotSource};
//!
//! let source = SnapshotSource::new("lc".into());
//! source.pull()?;
//! source.walk(&mut |node| println!("{} -> {}", node.path, node.slug));
//! ```

#[cfg(any(test, feature = "mock"))]
mod mock;
mod node;
mod snapshot;
mod source;
mod tree;

#[cfg(any(test, feature = "mock"))]
pub use mock::MockSource;
pub use node::{ContentNode, SnapshotNode};
pub use snapshot::{SNAPSHOT_FILENAME, SnapshotSource};
pub use source::{ContentSource, ExportOptions, SourceError, SourceErrorKind};
