//! Dynamic instantiation and invocation
//!
//! Behavioral calls find their member through the configured list of
//! [`LookupStrategy`]s, first match wins. Whatever is found is called
//! once: a member that fails while running is *not* retried through the
//! next strategy.

use std::sync::Arc;

use tracing::{debug, trace};

use super::{absorb, Proxy};
use crate::config::LookupStrategy;
use crate::descriptor::{Access, MethodInfo, TypeDescriptor};
use crate::error::{signature, ReflectError, Result};
use crate::resolver::TypeResolver;
use crate::types::TypeRef;
use crate::value::{FromValue, Object, Value};

/// A located method plus the mode it must be called in
struct MethodHandle {
    owner: Arc<TypeDescriptor>,
    index: usize,
    access: Access,
}

impl MethodHandle {
    fn locate(
        owner: &Arc<TypeDescriptor>,
        access: Access,
        accept: impl Fn(&MethodInfo) -> bool,
    ) -> Option<Self> {
        let index = owner.methods().iter().position(accept)?;
        Some(Self {
            owner: Arc::clone(owner),
            index,
            access,
        })
    }

    fn method(&self) -> &MethodInfo {
        &self.owner.methods()[self.index]
    }

    fn invoke(&self, target: &Object, args: &[Value]) -> Result<Value> {
        let method = self.method();
        trace!(
            "invoking {}.{} ({:?})",
            self.owner.name(),
            signature(&method.name, &method.param_types()),
            self.access
        );
        method
            .invoke(target, args, self.access)
            .map_err(|source| ReflectError::InvocationFailure {
                member: format!(
                    "{}.{}",
                    self.owner.name(),
                    signature(&method.name, &method.param_types())
                ),
                source,
            })
    }
}

fn is_callable_public(method: &MethodInfo, name: &str, params: &[TypeRef]) -> bool {
    method.matches(name, params) && method.modifiers.is_public && method.body.is_some()
}

impl LookupStrategy {
    fn find(
        self,
        resolver: &TypeResolver,
        runtime: &Arc<TypeDescriptor>,
        name: &str,
        params: &[TypeRef],
    ) -> Option<MethodHandle> {
        match self {
            LookupStrategy::Declared => {
                MethodHandle::locate(runtime, Access::ForceAccessible, |m| m.matches(name, params))
            }
            LookupStrategy::InheritedPublic => resolver
                .ancestors(runtime)
                .iter()
                .find_map(|ancestor| {
                    MethodHandle::locate(ancestor, Access::PublicOnly, |m| {
                        is_callable_public(m, name, params)
                    })
                }),
        }
    }
}

/// Create an instance of `type_name` from the first public constructor,
/// in declaration order, whose arity matches and whose body succeeds.
pub(super) fn instantiate(
    resolver: &TypeResolver,
    type_name: &str,
    args: &[Value],
) -> Result<Object> {
    let ty = resolver.try_resolve(type_name)?;
    if ty.is_abstract() {
        debug!("{} is abstract and cannot be instantiated", ty.name());
    } else {
        for (position, ctor) in ty
            .public_constructors()
            .enumerate()
            .filter(|(_, c)| c.arity() == args.len())
        {
            match ctor.construct(args) {
                Ok(state) => return Ok(Object::new(Arc::clone(&ty), state)),
                Err(e) => debug!(
                    "constructor #{} of {} rejected arguments: {}",
                    position,
                    ty.name(),
                    e
                ),
            }
        }
    }
    Err(ReflectError::ConstructionFailure {
        type_name: ty.name().to_string(),
        arity: args.len(),
    })
}

impl Proxy {
    /// Call `name(params)` on the bound instance.
    ///
    /// `None` when there is no instance, no lookup strategy finds the
    /// member, the member fails while running, or its result is not a `T`.
    pub fn invoke<T: FromValue>(
        &self,
        name: &str,
        params: &[TypeRef],
        args: &[Value],
    ) -> Option<T> {
        let value = absorb(self.try_invoke(name, params, args))?;
        let converted = T::from_value(&value);
        if converted.is_none() {
            debug!(
                "{} returned {}, expected {}",
                signature(name, params),
                value.kind_name(),
                T::EXPECTED
            );
        }
        converted
    }

    pub(super) fn try_invoke(
        &self,
        name: &str,
        params: &[TypeRef],
        args: &[Value],
    ) -> Result<Value> {
        let target = self.try_target()?;
        let runtime = target.class();
        let handle = self
            .resolver
            .config()
            .lookup
            .iter()
            .find_map(|strategy| strategy.find(&self.resolver, runtime, name, params))
            .ok_or_else(|| ReflectError::MemberNotFound {
                type_name: runtime.name().to_string(),
                member: format!("callable {}", signature(name, params)),
            })?;
        handle.invoke(target, args)
    }

    /// Call a public member found on the instance's runtime type or any of
    /// its supertypes, nearest first.
    pub(super) fn call_public(
        &self,
        name: &str,
        params: &[TypeRef],
        args: &[Value],
    ) -> Result<Value> {
        let target = self.try_target()?;
        let runtime = target.class();
        let handle = MethodHandle::locate(runtime, Access::PublicOnly, |m| {
            is_callable_public(m, name, params)
        })
        .or_else(|| LookupStrategy::InheritedPublic.find(&self.resolver, runtime, name, params))
            .ok_or_else(|| ReflectError::MemberNotFound {
                type_name: runtime.name().to_string(),
                member: format!("public {}", signature(name, params)),
            })?;
        handle.invoke(target, args)
    }

    /// Read field `name` of the bound instance, ignoring its visibility.
    ///
    /// The field must be declared on the target type; it is read through the
    /// instance's runtime type.
    pub fn property_value<T: FromValue>(&self, name: &str) -> Option<T> {
        if !self.has_target() || !self.has_property(name) {
            return None;
        }
        let value = absorb(self.try_property_value(name))?;
        T::from_value(&value)
    }

    fn try_property_value(&self, name: &str) -> Result<Value> {
        let target = self.try_target()?;
        let runtime = target.class();
        let field = super::shape::find_field(runtime, name)?;
        let reader = field.reader.ok_or_else(|| ReflectError::MemberNotFound {
            type_name: runtime.name().to_string(),
            member: format!("reader for field {}", name),
        })?;
        reader(target).map_err(|source| ReflectError::InvocationFailure {
            member: format!("{}.{}", runtime.name(), name),
            source,
        })
    }
}
