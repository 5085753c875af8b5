use std::rc::Rc;
use tracing::debug;

use super::schema_registry::SchemaRegistry;
use crate::source::MetadataSource;

/// Owner of the shared default [`SchemaRegistry`].
///
/// Callers pass the slot down a call tree instead of reaching for a global,
/// so repeated lookups share one cache.
pub struct RegistrySlot {
    source: Rc<dyn MetadataSource>,
    registry: Option<SchemaRegistry>,
}

impl RegistrySlot {
    pub fn new(source: Rc<dyn MetadataSource>) -> Self {
        Self {
            source,
            registry: None,
        }
    }

    /// Default registry, created on first use.
    ///
    /// When both `catalog` and `dataset` are given and differ from the
    /// current registry's, the registry is replaced by an empty one.
    pub fn get(&mut self, catalog: Option<&str>, dataset: Option<&str>) -> &mut SchemaRegistry {
        let replace = match (&self.registry, catalog, dataset) {
            (None, _, _) => true,
            (Some(current), Some(catalog), Some(dataset)) => {
                current.catalog() != Some(catalog) || current.dataset() != Some(dataset)
            }
            _ => false,
        };

        if replace {
            debug!(?catalog, ?dataset, "Creating default schema registry");
            self.registry = Some(SchemaRegistry::with_defaults(
                Rc::clone(&self.source),
                catalog.map(str::to_string),
                dataset.map(str::to_string),
            ));
        }
        self.registry
            .as_mut()
            .expect("registry is initialized whenever the slot was empty")
    }

    /// Drop the default registry; the next `get` starts empty
    pub fn reset(&mut self) {
        self.registry = None;
    }

    pub fn is_initialized(&self) -> bool {
        self.registry.is_some()
    }
}
