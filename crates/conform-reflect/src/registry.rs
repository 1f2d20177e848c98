//! Type Registry
//!
//! Name → descriptor table that symbolic names are resolved against.
//! Registration can happen at any time; proxies never cache what they
//! resolve, so later registrations (or removals) are observed on the next
//! query.

use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::descriptor::TypeDescriptor;

static GLOBAL: Lazy<Arc<TypeRegistry>> = Lazy::new(|| Arc::new(TypeRegistry::new()));

/// Registry of type descriptors, keyed by fully-qualified name
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: RwLock<FxHashMap<String, Arc<TypeDescriptor>>>,
}

impl TypeRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry
    pub fn global() -> Arc<TypeRegistry> {
        Arc::clone(&GLOBAL)
    }

    /// Register a type, returning the descriptor it replaced
    pub fn register(&self, descriptor: TypeDescriptor) -> Option<Arc<TypeDescriptor>> {
        let name = descriptor.name().to_string();
        self.types.write().insert(name, Arc::new(descriptor))
    }

    /// Remove a type
    pub fn unregister(&self, name: &str) -> Option<Arc<TypeDescriptor>> {
        self.types.write().remove(name)
    }

    /// Get a type by exact name
    pub fn get(&self, name: &str) -> Option<Arc<TypeDescriptor>> {
        self.types.read().get(name).cloned()
    }

    /// Check if a type is registered
    pub fn contains(&self, name: &str) -> bool {
        self.types.read().contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.types.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.types.read().len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.types.read().is_empty()
    }
}
