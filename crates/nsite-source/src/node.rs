//! Content node types.
//!
//! A [`ContentNode`] is one page record as delivered by the CMS. The field
//! names on the wire follow the CMS export format (`otherProps`), so snapshots
//! written by the CMS client deserialize without a mapping layer.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One page/record from the content source.
///
/// Nodes are owned by the source and handed out as `Arc<ContentNode>`.
/// Consumers never mutate them; derived data lives in wrapper types.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContentNode {
    /// Stable identifier assigned by the CMS.
    pub id: String,
    /// URL path segment (e.g., "full-stack-dev").
    pub slug: String,
    /// Full route (e.g., "/portfolio/full-stack-dev", "/" for root).
    pub path: String,
    /// Open-ended page properties from the CMS database row.
    #[serde(default, rename = "otherProps", skip_serializing_if = "Map::is_empty")]
    pub other_props: Map<String, Value>,
}

impl ContentNode {
    /// Create a node without properties.
    #[must_use]
    pub fn new(id: impl Into<String>, slug: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            slug: slug.into(),
            path: path.into(),
            other_props: Map::new(),
        }
    }

    /// Attach a property to the node.
    #[must_use]
    pub fn with_prop(mut self, name: impl Into<String>, value: Value) -> Self {
        self.other_props.insert(name.into(), value);
        self
    }
}

/// Nested node representation used by snapshot files and exports.
///
/// ```json
/// [
///   { "id": "a1", "slug": "about", "path": "/about", "children": [] }
/// ]
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SnapshotNode {
    /// The page record.
    #[serde(flatten)]
    pub node: ContentNode,
    /// Direct sub-pages in CMS order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SnapshotNode>,
}

impl SnapshotNode {
    /// Create a leaf snapshot node.
    #[must_use]
    pub fn leaf(node: ContentNode) -> Self {
        Self {
            node,
            children: Vec::new(),
        }
    }
}
