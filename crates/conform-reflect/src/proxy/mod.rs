//! Structural / Behavioral Proxy
//!
//! A [`Proxy`] is bound to a symbolic type name and, optionally, one live
//! instance of that type. It answers two kinds of questions:
//!
//! - **Shape queries** (`has_method`, `is_property_private`, ...) look at
//!   the *type* only and work whether or not an instance is bound.
//! - **Behavioral calls** (`invoke`, `property_value`, identity forwarding)
//!   run against the bound instance and yield nothing when there is none.
//!
//! Every query re-resolves the type name. Nothing raises: an unresolved
//! type, a missing member, a wrong shape and a member that failed while
//! running all collapse to `false` / `None`, and callers cannot tell them
//! apart. The reason is logged at `debug` level. Identity forwarding is the
//! exception for missing members: equality, hash and string form fall back
//! to the instance's identity.
//!
//! ```rust,ignore
//! let example = Proxy::new("com.redi.j2.Example", &[Value::from(1)]);
//! assert!(example.is_property_private("bar"));
//! assert!(example.has_method("setBar", &[TypeRef::Int]));
//! assert_eq!(example.invoke::<i32>("foo", &[TypeRef::Int], &[Value::from(1)]), Some(2));
//! ```

mod generics;
mod invoke;
mod shape;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use tracing::debug;

use crate::descriptor::TypeDescriptor;
use crate::error::{ReflectError, Result};
use crate::resolver::TypeResolver;
use crate::types::TypeRef;
use crate::value::{FromValue, Object, Value};

/// Reflective proxy over a late-bound type
#[derive(Debug)]
pub struct Proxy {
    type_name: String,
    resolver: TypeResolver,
    target: Option<Object>,
}

impl Proxy {
    /// Instantiate `type_name` from the global registry with `args`.
    ///
    /// Never fails: if the type is missing or no constructor accepts the
    /// arguments, the proxy simply has no bound instance.
    pub fn new(type_name: impl Into<String>, args: &[Value]) -> Self {
        Self::with_resolver(TypeResolver::default(), type_name, args)
    }

    /// Instantiate `type_name` through `resolver` with `args`
    pub fn with_resolver(
        resolver: TypeResolver,
        type_name: impl Into<String>,
        args: &[Value],
    ) -> Self {
        let type_name = type_name.into();
        let target = absorb(invoke::instantiate(&resolver, &type_name, args));
        Self {
            type_name,
            resolver,
            target,
        }
    }

    /// Wrap an existing instance (or none) from the global registry
    pub fn wrap(type_name: impl Into<String>, target: Option<Object>) -> Self {
        Self::wrap_with(TypeResolver::default(), type_name, target)
    }

    /// Wrap an existing instance (or none) using `resolver`
    pub fn wrap_with(
        resolver: TypeResolver,
        type_name: impl Into<String>,
        target: Option<Object>,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            resolver,
            target,
        }
    }

    /// Symbolic name this proxy was bound to
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Resolver used for every query
    pub fn resolver(&self) -> &TypeResolver {
        &self.resolver
    }

    /// Bound instance, if any
    pub fn target(&self) -> Option<&Object> {
        self.target.as_ref()
    }

    /// Whether an instance is bound
    pub fn has_target(&self) -> bool {
        self.target.is_some()
    }

    /// Release the bound instance
    pub fn into_target(self) -> Option<Object> {
        self.target
    }

    /// Freshly resolved descriptor of the target type
    pub fn target_type(&self) -> Option<Arc<TypeDescriptor>> {
        self.resolver.resolve(&self.type_name)
    }

    fn try_target_type(&self) -> Result<Arc<TypeDescriptor>> {
        self.resolver.try_resolve(&self.type_name)
    }

    fn try_target(&self) -> Result<&Object> {
        self.target
            .as_ref()
            .ok_or_else(|| ReflectError::NoInstance(self.type_name.clone()))
    }

    // ===== Identity forwarding =====
    //
    // Every instance answers these. When its type (and every supertype)
    // lacks the member, identity semantics apply instead.

    /// Forward `equals(Object)` to the bound instance.
    ///
    /// The other proxy's instance (possibly none) is passed as the argument.
    /// Without a public `equals`, two proxies are equal when they hold the
    /// same instance. `false` if this proxy has no instance or the call fails.
    pub fn reflective_eq(&self, other: &Proxy) -> bool {
        let Some(target) = self.target.as_ref() else {
            return false;
        };
        let argument = Value::from(other.target.clone());
        match self.call_public("equals", &[TypeRef::Object], &[argument]) {
            Err(ReflectError::MemberNotFound { .. }) => {
                other.target.as_ref().is_some_and(|o| target.ptr_eq(o))
            }
            outcome => absorb(outcome)
                .and_then(|v| bool::from_value(&v))
                .unwrap_or(false),
        }
    }

    /// Forward `hashCode()` to the bound instance.
    ///
    /// Falls back to the identity hash; `0` without an instance or when the
    /// call fails.
    pub fn hash_code(&self) -> i32 {
        let Some(target) = self.target.as_ref() else {
            return 0;
        };
        match self.call_public("hashCode", &[], &[]) {
            Err(ReflectError::MemberNotFound { .. }) => target.identity_hash(),
            outcome => absorb(outcome)
                .and_then(|v| i32::from_value(&v))
                .unwrap_or(0),
        }
    }

    /// Forward `toString()` through the regular invocation path.
    ///
    /// Falls back to `type@hash` (hash in hex); `None` without an instance
    /// or when the call fails.
    pub fn describe(&self) -> Option<String> {
        let target = self.target.as_ref()?;
        match self.try_invoke("toString", &[], &[]) {
            Err(ReflectError::MemberNotFound { .. }) => Some(format!(
                "{}@{:x}",
                target.type_name(),
                self.hash_code() as u32
            )),
            outcome => absorb(outcome).and_then(|v| String::from_value(&v)),
        }
    }
}

impl PartialEq for Proxy {
    fn eq(&self, other: &Self) -> bool {
        self.reflective_eq(other)
    }
}

impl Hash for Proxy {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_i32(self.hash_code());
    }
}

impl fmt::Display for Proxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.describe() {
            Some(text) => f.write_str(&text),
            None => f.write_str("null"),
        }
    }
}

/// Collapse an internal outcome to the public soft-fail form
fn absorb<T>(outcome: Result<T>) -> Option<T> {
    match outcome {
        Ok(value) => Some(value),
        Err(e) => {
            debug!("{}", e);
            None
        }
    }
}
