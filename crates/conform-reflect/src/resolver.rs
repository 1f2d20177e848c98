//! Type Resolver
//!
//! Turns a symbolic name into a live descriptor. This is the single place
//! where "no such type" is normalized to `None`; everything downstream
//! guards on that one outcome.

use std::sync::Arc;

use rustc_hash::FxHashSet;
use tracing::{debug, trace};

use crate::config::ProxyConfig;
use crate::descriptor::TypeDescriptor;
use crate::error::ReflectError;
use crate::registry::TypeRegistry;

/// Resolves symbolic type names against a registry
#[derive(Debug, Clone)]
pub struct TypeResolver {
    registry: Arc<TypeRegistry>,
    config: Arc<ProxyConfig>,
}

impl Default for TypeResolver {
    fn default() -> Self {
        Self::new(TypeRegistry::global())
    }
}

impl TypeResolver {
    /// Resolver over `registry` with the default config
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self::with_config(registry, ProxyConfig::default())
    }

    /// Resolver over `registry` with an explicit config
    pub fn with_config(registry: Arc<TypeRegistry>, config: ProxyConfig) -> Self {
        Self {
            registry,
            config: Arc::new(config),
        }
    }

    /// Backing registry
    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    /// Active config
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    /// Resolve `name`, or `None` if it names no registered type
    pub fn resolve(&self, name: &str) -> Option<Arc<TypeDescriptor>> {
        self.try_resolve(name)
            .map_err(|e| debug!("{}", e))
            .ok()
    }

    pub(crate) fn try_resolve(&self, name: &str) -> Result<Arc<TypeDescriptor>, ReflectError> {
        if !is_well_formed(name) {
            return Err(ReflectError::TargetUnresolved(name.to_string()));
        }
        let qualified = self.config.qualify(name);
        self.registry
            .get(&qualified)
            .ok_or(ReflectError::TargetUnresolved(qualified))
    }

    /// The supertypes of `descriptor`, nearest first.
    ///
    /// Superclasses come first (parent, grandparent, ...), followed by every
    /// interface reachable from the type or any of its superclasses. The
    /// type itself is not included. Names that no longer resolve are
    /// skipped, and cycles are cut.
    pub fn ancestors(&self, descriptor: &TypeDescriptor) -> Vec<Arc<TypeDescriptor>> {
        let mut seen = FxHashSet::default();
        seen.insert(descriptor.name().to_string());

        let mut classes = Vec::new();
        let mut current = descriptor.parent().map(str::to_string);
        while let Some(name) = current {
            if !seen.insert(name.clone()) {
                trace!("cycle in superclass chain at {}", name);
                break;
            }
            match self.registry.get(&name) {
                Some(parent) => {
                    current = parent.parent().map(str::to_string);
                    classes.push(parent);
                }
                None => {
                    debug!("superclass {} of {} is not registered", name, descriptor.name());
                    break;
                }
            }
        }

        let mut pending: Vec<String> = descriptor.interfaces().to_vec();
        for class in &classes {
            pending.extend(class.interfaces().iter().cloned());
        }
        let mut interfaces = Vec::new();
        let mut next = 0;
        while next < pending.len() {
            let name = pending[next].clone();
            next += 1;
            if !seen.insert(name.clone()) {
                continue;
            }
            if let Some(iface) = self.registry.get(&name) {
                pending.extend(iface.interfaces().iter().cloned());
                interfaces.push(iface);
            }
        }

        classes.extend(interfaces);
        classes
    }

    /// Whether a value of type `sub` can be used where `sup` is expected.
    ///
    /// Reflexive; follows superclasses and interfaces transitively.
    pub fn is_assignable(&self, sub: &TypeDescriptor, sup: &TypeDescriptor) -> bool {
        sub.name() == sup.name()
            || self
                .ancestors(sub)
                .iter()
                .any(|ancestor| ancestor.name() == sup.name())
    }
}

/// Dotted identifier: non-empty segments of word characters and `$`
fn is_well_formed(name: &str) -> bool {
    !name.is_empty()
        && name.split('.').all(|segment| {
            !segment.is_empty()
                && segment
                    .chars()
                    .all(|c| c.is_alphanumeric() || c == '_' || c == '$')
        })
}
