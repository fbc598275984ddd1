//! Content source trait and error types.
//!
//! Provides the core [`ContentSource`] trait for refreshing and querying the
//! content tree, along with [`SourceError`] for unified error handling across
//! backends.
//!
//! # Route Convention
//!
//! All path parameters are **routes** as assigned by the CMS:
//! - `"/"` - root page
//! - `"/posts"` - top-level page
//! - `"/posts/hello-world"` - nested page

use std::path::PathBuf;
use std::sync::Arc;

use crate::node::ContentNode;

/// Options for [`ContentSource::export`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportOptions {
    /// Destination file for the debug artifact.
    pub path: PathBuf,
    /// Pretty-print the JSON output.
    pub pretty: bool,
}

/// Semantic error categories.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[non_exhaustive]
pub enum SourceErrorKind {
    /// Resource does not exist.
    NotFound,
    /// Data exists but could not be decoded (e.g., a node id that is not a string).
    InvalidData,
    /// Backend is temporarily unavailable.
    Unavailable,
    /// Other/unknown error category.
    Other,
}

/// Source error with semantic kind and backend-specific source.
#[derive(Debug)]
pub struct SourceError {
    kind: SourceErrorKind,
    path: Option<PathBuf>,
    backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl SourceError {
    /// Create a new source error.
    #[must_use]
    pub fn new(kind: SourceErrorKind) -> Self {
        Self {
            kind,
            path: None,
            backend: None,
            source: None,
        }
    }

    /// Attach path context.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Attach backend identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Semantic error category.
    #[must_use]
    pub fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    /// Path context, if any.
    #[must_use]
    pub fn path(&self) -> Option<&std::path::Path> {
        self.path.as_deref()
    }

    /// Backend identifier, if any.
    #[must_use]
    pub fn backend(&self) -> Option<&'static str> {
        self.backend
    }

    /// Downcast the source error to a concrete type.
    #[must_use]
    pub fn downcast_source<E: std::error::Error + 'static>(&self) -> Option<&E> {
        self.source.as_ref()?.downcast_ref()
    }

    /// Create a source error from an I/O error.
    #[must_use]
    pub fn io(err: std::io::Error, path: Option<PathBuf>) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => SourceErrorKind::NotFound,
            std::io::ErrorKind::InvalidData => SourceErrorKind::InvalidData,
            std::io::ErrorKind::TimedOut
            | std::io::ErrorKind::ConnectionRefused
            | std::io::ErrorKind::ConnectionReset => SourceErrorKind::Unavailable,
            _ => SourceErrorKind::Other,
        };
        let mut error = Self::new(kind).with_source(err);
        if let Some(p) = path {
            error = error.with_path(p);
        }
        error
    }
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: "[Backend] Kind: message (path: /foo/bar)"
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind_str = match self.kind {
            SourceErrorKind::NotFound => "Not found",
            SourceErrorKind::InvalidData => "Invalid data",
            SourceErrorKind::Unavailable => "Unavailable",
            SourceErrorKind::Other => "Error",
        };

        write!(f, "{kind_str}")?;

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }

        Ok(())
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Content source abstraction for tree refresh and traversal.
///
/// Provides a unified interface to the CMS regardless of backend.
/// Implementations own the node objects and hand out shared references;
/// they handle their own caching and locking.
pub trait ContentSource: Send + Sync {
    /// Fetch or refresh the content tree.
    ///
    /// On failure the source keeps whatever tree it held before, so callers
    /// may continue with a stale tree.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the tree could not be refreshed.
    fn pull(&self) -> Result<(), SourceError>;

    /// Serialize the current tree to a debug artifact.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the artifact could not be written.
    fn export(&self, options: &ExportOptions) -> Result<(), SourceError>;

    /// Invoke `visitor` once per node of the current tree.
    fn walk(&self, visitor: &mut dyn FnMut(&Arc<ContentNode>));

    /// Sub-pages of the node at `path`, in source order.
    ///
    /// Returns an empty list if the route is unknown or has no sub-pages.
    fn filter_sub_pages(&self, path: &str) -> Vec<Arc<ContentNode>>;
}
