//! Page collections for CMS-backed static sites.
//!
//! Turns a [`ContentSource`](nsite_source::ContentSource) tree into named,
//! lazily-evaluated collections for a template renderer:
//!
//! - every page is annotated with a collection name (`"{slug}-{hash6(id)}"`)
//!   and a layout template path
//! - [`Partitioner`] walks the tree once and registers one collection per
//!   page that has sub-pages
//! - [`Generator`] runs a full pass (pull, export, partition) and adds the
//!   `combined`, `nav`, and fixed route collections
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use nsite_collections::{CollectionRegistry, Generator, GeneratorOptions};
//! use nsite_source::{ContentNode, ContentSource, MockSource};
//!
//! let source: Arc<dyn ContentSource> = Arc::new(
//!     MockSource::new()
//!         .with_page(ContentNode::new("pf", "portfolio", "/portfolio"))
//!         .with_child("/portfolio", ContentNode::new("a", "alpha", "/portfolio/alpha")),
//! );
//!
//! let mut registry = CollectionRegistry::new();
//! let report = Generator::new(source, GeneratorOptions::default()).run(&mut registry);
//!
//! assert_eq!(report.pages, 2);
//! assert_eq!(registry.evaluate("portfolio").unwrap().len(), 1);
//! ```

mod generator;
mod hash;
mod layout;
mod page;
mod partition;
mod registry;

pub use generator::{
    COMBINED_COLLECTION, GenerationReport, Generator, GeneratorOptions, NAV_COLLECTION,
};
pub use hash::{HASH6_LEN, hash6};
pub use layout::{LayoutMode, LayoutOptions, layout_token, normalize_layout_name};
pub use page::{Page, collection_name};
pub use partition::{Partition, Partitioner, sub_page_producer};
pub use registry::{CollectionRegistry, Producer};
