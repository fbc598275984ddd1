//! Mock content source for testing.
//!
//! Provides [`MockSource`] for unit testing without a CMS or filesystem access.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use crate::node::ContentNode;
use crate::source::{ContentSource, ExportOptions, SourceError, SourceErrorKind};
use crate::tree::ContentTree;

/// Mock content source for testing.
///
/// Stores the tree in memory. Use the builder methods to configure the mock
/// with test data.
///
/// # Example
///
/// ```ignore
/// use nsite_source::{ContentNode, ContentSource, MockSource};
///
/// let source = MockSource::new()
///     .with_page(ContentNode::new("p", "portfolio", "/portfolio"))
///     .with_child("/portfolio", ContentNode::new("a", "a", "/portfolio/a"));
///
/// assert_eq!(source.filter_sub_pages("/portfolio").len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MockSource {
    tree: RwLock<ContentTree>,
    pull_error: RwLock<Option<String>>,
    pulls: AtomicUsize,
    sub_page_queries: AtomicUsize,
    exports: RwLock<Vec<ExportOptions>>,
}

impl MockSource {
    /// Create a new empty mock source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a root-level page.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_page(self, node: ContentNode) -> Self {
        self.tree.write().unwrap().insert(node, None);
        self
    }

    /// Add a page under the page at `parent_path`.
    ///
    /// # Panics
    ///
    /// Panics if no page exists at `parent_path` or the internal lock is poisoned.
    #[must_use]
    pub fn with_child(self, parent_path: &str, node: ContentNode) -> Self {
        {
            let mut tree = self.tree.write().unwrap();
            let parent = tree
                .index_of(parent_path)
                .unwrap_or_else(|| panic!("no parent page at {parent_path}"));
            tree.insert(node, Some(parent));
        }
        self
    }

    /// Make every subsequent `pull()` fail with an `Unavailable` error.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_failing_pull(self, message: impl Into<String>) -> Self {
        *self.pull_error.write().unwrap() = Some(message.into());
        self
    }

    /// Number of `pull()` calls so far.
    pub fn pull_count(&self) -> usize {
        self.pulls.load(Ordering::SeqCst)
    }

    /// Number of `filter_sub_pages()` calls so far.
    pub fn sub_page_query_count(&self) -> usize {
        self.sub_page_queries.load(Ordering::SeqCst)
    }

    /// Export requests received so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn exports(&self) -> Vec<ExportOptions> {
        self.exports.read().unwrap().clone()
    }
}

impl ContentSource for MockSource {
    fn pull(&self) -> Result<(), SourceError> {
        self.pulls.fetch_add(1, Ordering::SeqCst);
        match self.pull_error.read().unwrap().as_ref() {
            Some(message) => Err(SourceError::new(SourceErrorKind::Unavailable)
                .with_backend("Mock")
                .with_source(message.clone())),
            None => Ok(()),
        }
    }

    fn export(&self, options: &ExportOptions) -> Result<(), SourceError> {
        self.exports.write().unwrap().push(options.clone());
        Ok(())
    }

    fn walk(&self, visitor: &mut dyn FnMut(&Arc<ContentNode>)) {
        let nodes = self.tree.read().unwrap().preorder();
        for node in &nodes {
            visitor(node);
        }
    }

    fn filter_sub_pages(&self, path: &str) -> Vec<Arc<ContentNode>> {
        self.sub_page_queries.fetch_add(1, Ordering::SeqCst);
        self.tree.read().unwrap().children_of(path)
    }
}
