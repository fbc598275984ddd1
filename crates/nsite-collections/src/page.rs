//! Annotated page view.

use std::sync::Arc;

use nsite_source::ContentNode;
use serde::Serialize;

use crate::hash::hash6;
use crate::layout::LayoutOptions;

/// A content node paired with the fields derived during a generation pass.
///
/// The node itself is shared with the source and never modified. Serializes
/// as the node's own fields plus `collectionName` and `Layout`, which is the
/// shape templates consume.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Page {
    /// The source node.
    #[serde(flatten)]
    pub node: Arc<ContentNode>,
    /// Name of this page's sub-page collection (`"{slug}-{hash6(id)}"`).
    #[serde(rename = "collectionName")]
    pub collection_name: String,
    /// Template path (e.g., `"layouts/base.njk"`).
    #[serde(rename = "Layout")]
    pub layout: String,
}

impl Page {
    /// Derive the page fields for `node`.
    #[must_use]
    pub fn annotate(node: Arc<ContentNode>, layouts: &LayoutOptions) -> Self {
        let collection_name = collection_name(&node);
        let layout = layouts.resolve(&node.other_props);
        Self {
            node,
            collection_name,
            layout,
        }
    }

    /// CMS id of the underlying node.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.node.id
    }

}

/// Collection name for a node: `"{slug}-{hash6(id)}"`.
#[must_use]
pub fn collection_name(node: &ContentNode) -> String {
    format!("{}-{}", node.slug, hash6(&node.id))
}
