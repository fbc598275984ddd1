//! Snapshot-backed content source.
//!
//! [`SnapshotSource`] serves a content tree from the CMS client's local cache
//! directory. The tree lives in a single JSON file:
//!
//! ```text
//! {cache_dir}/
//! +-- tree.json        # array of root nodes, each with nested `children`
//! ```
//!
//! A pull re-reads the file. If the file is missing or malformed, the pull
//! fails and the previously loaded tree stays in place, so a build can go on
//! with stale content.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::node::{ContentNode, SnapshotNode};
use crate::source::{ContentSource, ExportOptions, SourceError, SourceErrorKind};
use crate::tree::ContentTree;

/// Name of the snapshot file within the cache directory.
pub const SNAPSHOT_FILENAME: &str = "tree.json";

const BACKEND: &str = "Snapshot";

/// Content source reading a cached tree from disk.
#[derive(Debug)]
pub struct SnapshotSource {
    cache_dir: PathBuf,
    tree: RwLock<ContentTree>,
}

impl SnapshotSource {
    /// Create a source over `cache_dir`. The tree is empty until the first pull.
    #[must_use]
    pub fn new(cache_dir: PathBuf) -> Self {
        Self {
            cache_dir,
            tree: RwLock::new(ContentTree::new()),
        }
    }

    /// Path of the snapshot file.
    #[must_use]
    pub fn snapshot_path(&self) -> PathBuf {
        self.cache_dir.join(SNAPSHOT_FILENAME)
    }

    /// Read and decode the snapshot file.
    fn load(path: &Path) -> Result<ContentTree, SourceError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SourceError::io(e, Some(path.to_path_buf())).with_backend(BACKEND))?;
        let roots: Vec<SnapshotNode> = serde_json::from_str(&content).map_err(|e| {
            SourceError::new(SourceErrorKind::InvalidData)
                .with_path(path)
                .with_backend(BACKEND)
                .with_source(e)
        })?;
        Ok(ContentTree::from_snapshot(roots))
    }
}

impl ContentSource for SnapshotSource {
    fn pull(&self) -> Result<(), SourceError> {
        let path = self.snapshot_path();
        let tree = Self::load(&path)?;
        tracing::info!(path = %path.display(), pages = tree.len(), "Loaded content snapshot");
        *self.tree.write().unwrap() = tree;
        Ok(())
    }

    fn export(&self, options: &ExportOptions) -> Result<(), SourceError> {
        let snapshot = self.tree.read().unwrap().to_snapshot();
        let json = if options.pretty {
            serde_json::to_string_pretty(&snapshot)
        } else {
            serde_json::to_string(&snapshot)
        }
        .map_err(|e| {
            SourceError::new(SourceErrorKind::Other)
                .with_backend(BACKEND)
                .with_source(e)
        })?;

        if let Some(parent) = options.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .map_err(|e| SourceError::io(e, Some(parent.to_path_buf())).with_backend(BACKEND))?;
        }
        std::fs::write(&options.path, json)
            .map_err(|e| SourceError::io(e, Some(options.path.clone())).with_backend(BACKEND))?;

        tracing::debug!(path = %options.path.display(), "Exported content tree");
        Ok(())
    }

    fn walk(&self, visitor: &mut dyn FnMut(&Arc<ContentNode>)) {
        // Collect first so the visitor may query the source without holding the lock.
        let nodes = self.tree.read().unwrap().preorder();
        for node in &nodes {
            visitor(node);
        }
    }

    fn filter_sub_pages(&self, path: &str) -> Vec<Arc<ContentNode>> {
        self.tree.read().unwrap().children_of(path)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;

    use super::*;

    static_assertions::assert_impl_all!(SnapshotSource: Send, Sync);

    const TREE_JSON: &str = r#"[
        {
            "id": "r1",
            "slug": "about",
            "path": "/about",
            "otherProps": { "Layout": { "rich_text": [{ "text": { "content": "Home" } }] } },
            "children": [
                {
                    "id": "p1",
                    "slug": "posts",
                    "path": "/posts",
                    "children": [
                        { "id": "h1", "slug": "hello", "path": "/posts/hello" }
                    ]
                }
            ]
        }
    ]"#;

    fn write_snapshot(dir: &Path, content: &str) {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join(SNAPSHOT_FILENAME), content).unwrap();
    }

    fn walked_paths(source: &SnapshotSource) -> Vec<String> {
        let mut paths = Vec::new();
        source.walk(&mut |node| paths.push(node.path.clone()));
        paths
    }

    #[test]
    fn test_empty_before_pull() {
        let temp_dir = tempfile::tempdir().unwrap();
        let source = SnapshotSource::new(temp_dir.path().to_path_buf());

        assert!(walked_paths(&source).is_empty());
    }

    #[test]
    fn test_pull_loads_tree() {
        let temp_dir = tempfile::tempdir().unwrap();
        write_snapshot(temp_dir.path(), TREE_JSON);
        let source = SnapshotSource::new(temp_dir.path().to_path_buf());

        source.pull().unwrap();

        assert_eq!(walked_paths(&source), vec!["/about", "/posts", "/posts/hello"]);
        let posts = source.filter_sub_pages("/posts");
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].slug, "hello");
    }

    #[test]
    fn test_pull_missing_file_is_not_found() {
        let temp_dir = tempfile::tempdir().unwrap();
        let source = SnapshotSource::new(temp_dir.path().join("lc"));

        let err = source.pull().unwrap_err();

        assert_eq!(err.kind(), SourceErrorKind::NotFound);
        assert_eq!(err.backend(), Some("Snapshot"));
        assert_eq!(err.path(), Some(source.snapshot_path().as_path()));
    }

    #[test]
    fn test_pull_non_string_id_is_invalid_data() {
        let temp_dir = tempfile::tempdir().unwrap();
        write_snapshot(
            temp_dir.path(),
            r#"[{ "id": 7, "slug": "bad", "path": "/bad" }]"#,
        );
        let source = SnapshotSource::new(temp_dir.path().to_path_buf());

        let err = source.pull().unwrap_err();

        assert_eq!(err.kind(), SourceErrorKind::InvalidData);
        assert!(err.downcast_source::<serde_json::Error>().is_some());
    }

    #[test]
    fn test_failed_pull_keeps_previous_tree() {
        let temp_dir = tempfile::tempdir().unwrap();
        write_snapshot(temp_dir.path(), TREE_JSON);
        let source = SnapshotSource::new(temp_dir.path().to_path_buf());
        source.pull().unwrap();

        fs::write(source.snapshot_path(), "{ not json").unwrap();
        assert!(source.pull().is_err());

        assert_eq!(walked_paths(&source), vec!["/about", "/posts", "/posts/hello"]);
    }

    #[test]
    fn test_walk_visitor_can_query_source() {
        let temp_dir = tempfile::tempdir().unwrap();
        write_snapshot(temp_dir.path(), TREE_JSON);
        let source = SnapshotSource::new(temp_dir.path().to_path_buf());
        source.pull().unwrap();

        let mut with_children = Vec::new();
        source.walk(&mut |node| {
            if !source.filter_sub_pages(&node.path).is_empty() {
                with_children.push(node.slug.clone());
            }
        });

        assert_eq!(with_children, vec!["about", "posts"]);
    }

    #[test]
    fn test_export_pretty_creates_parent_dirs() {
        let temp_dir = tempfile::tempdir().unwrap();
        write_snapshot(temp_dir.path(), TREE_JSON);
        let source = SnapshotSource::new(temp_dir.path().to_path_buf());
        source.pull().unwrap();

        let out = temp_dir.path().join("debug").join("debug.json");
        source
            .export(&ExportOptions {
                path: out.clone(),
                pretty: true,
            })
            .unwrap();

        let written = fs::read_to_string(&out).unwrap();
        assert!(written.contains('\n'));
        let roots: Vec<SnapshotNode> = serde_json::from_str(&written).unwrap();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].children[0].node.slug, "posts");
    }

    #[test]
    fn test_export_compact() {
        let temp_dir = tempfile::tempdir().unwrap();
        write_snapshot(temp_dir.path(), TREE_JSON);
        let source = SnapshotSource::new(temp_dir.path().to_path_buf());
        source.pull().unwrap();

        let out = temp_dir.path().join("compact.json");
        source
            .export(&ExportOptions {
                path: out.clone(),
                pretty: false,
            })
            .unwrap();

        assert!(!fs::read_to_string(&out).unwrap().contains('\n'));
    }
}
