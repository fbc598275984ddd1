//! Tree partitioning into page collections.
//!
//! A single walk over the content tree annotates every node with its
//! collection name and layout and sorts it into:
//!
//! - `combined`: every visited page, once
//! - `nav`: pages that have at least one sub-page
//! - one sub-page collection per `nav` page, registered under the page's
//!   collection name and evaluated lazily

use std::collections::HashSet;
use std::sync::Arc;

use nsite_source::{ContentNode, ContentSource};

use crate::layout::LayoutOptions;
use crate::page::Page;
use crate::registry::CollectionRegistry;

/// Result of partitioning one content tree.
#[derive(Clone, Debug, Default)]
pub struct Partition {
    /// Every visited page in visit order.
    pub combined: Vec<Page>,
    /// Pages with sub-pages, in visit order.
    pub nav: Vec<Page>,
    /// Names of the sub-page collections registered during the walk.
    pub sub_collections: Vec<String>,
}

/// Walks a content source and fills a [`CollectionRegistry`].
pub struct Partitioner {
    layouts: Arc<LayoutOptions>,
}

impl Partitioner {
    /// Create a partitioner assigning layouts with `layouts`.
    #[must_use]
    pub fn new(layouts: Arc<LayoutOptions>) -> Self {
        Self { layouts }
    }

    /// Visit every node of `source` once and partition it.
    ///
    /// Sub-page collections are registered into `registry` as they are
    /// discovered. A node handed to the visitor more than once is partitioned
    /// only the first time; distinct nodes sharing an id are all kept.
    pub fn partition(
        &self,
        source: &Arc<dyn ContentSource>,
        registry: &mut CollectionRegistry,
    ) -> Partition {
        let mut partition = Partition::default();
        let mut seen: HashSet<*const ContentNode> = HashSet::new();

        source.walk(&mut |node| {
            if !seen.insert(Arc::as_ptr(node)) {
                tracing::warn!(id = %node.id, path = %node.path, "Node visited twice, skipping");
                return;
            }

            let page = Page::annotate(Arc::clone(node), &self.layouts);

            if !source.filter_sub_pages(&node.path).is_empty() {
                registry.register(
                    page.collection_name.clone(),
                    sub_page_producer(
                        Arc::clone(source),
                        node.path.clone(),
                        Arc::clone(&self.layouts),
                    ),
                );
                partition.sub_collections.push(page.collection_name.clone());
                partition.nav.push(page.clone());
            }

            partition.combined.push(page);
        });

        partition
    }
}

/// Producer returning the annotated sub-pages of `path` at evaluation time.
///
/// Captures its own copy of the route, never the node it was created for.
pub fn sub_page_producer(
    source: Arc<dyn ContentSource>,
    path: String,
    layouts: Arc<LayoutOptions>,
) -> impl Fn() -> Vec<Page> + Send + Sync + 'static {
    move || {
        source
            .filter_sub_pages(&path)
            .into_iter()
            .map(|node| Page::annotate(node, &layouts))
            .collect()
    }
}
