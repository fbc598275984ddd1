//! Registry of named, lazily-evaluated collections.
//!
//! Collections are registered as zero-argument producers. Nothing is computed
//! at registration time; the downstream consumer evaluates each collection
//! when it needs it, once per generation pass.

use std::collections::BTreeMap;

use crate::page::Page;

/// Boxed collection producer.
pub type Producer<T> = Box<dyn Fn() -> Vec<T> + Send + Sync>;

/// Registry mapping collection names to producers.
///
/// Passed explicitly to whatever populates it; there is no process-wide table.
pub struct CollectionRegistry<T = Page> {
    producers: BTreeMap<String, Producer<T>>,
}

impl<T> Default for CollectionRegistry<T> {
    fn default() -> Self {
        Self {
            producers: BTreeMap::new(),
        }
    }
}

impl<T> std::fmt::Debug for CollectionRegistry<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionRegistry")
            .field("names", &self.producers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<T> CollectionRegistry<T> {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `producer` under `name`.
    ///
    /// A later registration under the same name replaces the earlier one.
    pub fn register<F>(&mut self, name: impl Into<String>, producer: F)
    where
        F: Fn() -> Vec<T> + Send + Sync + 'static,
    {
        let name = name.into();
        tracing::debug!(collection = %name, "Registering collection");
        if self.producers.insert(name.clone(), Box::new(producer)).is_some() {
            tracing::warn!(
                collection = %name,
                "Collection registered twice, keeping the later producer"
            );
        }
    }

    /// Whether a collection named `name` exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.producers.contains_key(name)
    }

    /// Number of registered collections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.producers.len()
    }

    /// Whether no collections are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.producers.is_empty()
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.producers.keys().map(String::as_str)
    }

    /// Run the producer for `name`.
    ///
    /// Returns `None` if no such collection is registered.
    #[must_use]
    pub fn evaluate(&self, name: &str) -> Option<Vec<T>> {
        self.producers.get(name).map(|produce| produce())
    }

    /// Run every producer once.
    #[must_use]
    pub fn evaluate_all(&self) -> BTreeMap<String, Vec<T>> {
        self.producers
            .iter()
            .map(|(name, produce)| (name.clone(), produce()))
            .collect()
    }
}
