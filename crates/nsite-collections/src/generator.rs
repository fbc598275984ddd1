//! One generation pass: pull, export, partition, register.

use std::collections::BTreeMap;
use std::sync::Arc;

use nsite_source::{ContentSource, ExportOptions};

use crate::layout::LayoutOptions;
use crate::page::Page;
use crate::partition::{Partitioner, sub_page_producer};
use crate::registry::CollectionRegistry;

/// Name of the collection holding every visited page.
pub const COMBINED_COLLECTION: &str = "combined";

/// Name of the collection holding pages with sub-pages.
pub const NAV_COLLECTION: &str = "nav";

/// Generator settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Layout assignment.
    pub layouts: LayoutOptions,
    /// Debug export written after a successful pull, if set.
    pub export: Option<ExportOptions>,
    /// Fixed collections: name to route whose sub-pages it lists.
    pub fixed: BTreeMap<String, String>,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        let fixed = [("portfolio", "/portfolio"), ("posts", "/posts")]
            .into_iter()
            .map(|(name, route)| (name.to_owned(), route.to_owned()))
            .collect();
        Self {
            layouts: LayoutOptions::default(),
            export: None,
            fixed,
        }
    }
}

/// Summary of a generation pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GenerationReport {
    /// Number of pages visited.
    pub pages: usize,
    /// Number of pages with sub-pages.
    pub nav_pages: usize,
    /// Names of the sub-page collections registered during the walk.
    pub sub_collections: Vec<String>,
    /// Pull error message, if the pull failed and the cached tree was used.
    pub pull_error: Option<String>,
}

/// Runs generation passes against a content source.
pub struct Generator {
    source: Arc<dyn ContentSource>,
    layouts: Arc<LayoutOptions>,
    export: Option<ExportOptions>,
    fixed: BTreeMap<String, String>,
}

impl Generator {
    /// Create a generator over `source`.
    #[must_use]
    pub fn new(source: Arc<dyn ContentSource>, options: GeneratorOptions) -> Self {
        Self {
            source,
            layouts: Arc::new(options.layouts),
            export: options.export,
            fixed: options.fixed,
        }
    }

    /// Run one pass and register every collection into `registry`.
    ///
    /// A failed pull does not abort the pass: the error is logged and the
    /// source's current tree is partitioned as-is.
    pub fn run(&self, registry: &mut CollectionRegistry) -> GenerationReport {
        let pull_error = match self.source.pull() {
            Ok(()) => {
                self.export();
                None
            }
            Err(e) => {
                tracing::error!(error = %e, "Content pull failed, using cached tree");
                Some(e.to_string())
            }
        };

        let partition =
            Partitioner::new(Arc::clone(&self.layouts)).partition(&self.source, registry);

        let report = GenerationReport {
            pages: partition.combined.len(),
            nav_pages: partition.nav.len(),
            sub_collections: partition.sub_collections,
            pull_error,
        };

        register_snapshot(registry, COMBINED_COLLECTION, partition.combined);
        register_snapshot(registry, NAV_COLLECTION, partition.nav);

        for (name, route) in &self.fixed {
            registry.register(
                name.clone(),
                sub_page_producer(
                    Arc::clone(&self.source),
                    route.clone(),
                    Arc::clone(&self.layouts),
                ),
            );
        }

        tracing::info!(
            pages = report.pages,
            nav = report.nav_pages,
            collections = registry.len(),
            "Generation pass complete"
        );

        report
    }

    fn export(&self) {
        let Some(options) = &self.export else {
            return;
        };
        if let Err(e) = self.source.export(options) {
            tracing::warn!(error = %e, path = %options.path.display(), "Content export failed");
        }
    }
}

fn register_snapshot(registry: &mut CollectionRegistry, name: &str, pages: Vec<Page>) {
    let pages = Arc::new(pages);
    registry.register(name, move || pages.as_ref().clone());
}
