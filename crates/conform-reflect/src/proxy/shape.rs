//! Shape queries
//!
//! Existence, modifier and type checks against the members *declared* on
//! the target type itself. Supertypes are deliberately not searched: a
//! member inherited from elsewhere does not count as defined here.

use tracing::debug;

use super::{absorb, Proxy};
use crate::descriptor::{ConstructorInfo, FieldInfo, MethodInfo, TypeDescriptor};
use crate::error::{signature, ReflectError, Result};
use crate::types::{GenericType, TypeRef};

pub(super) fn find_field<'a>(ty: &'a TypeDescriptor, name: &str) -> Result<&'a FieldInfo> {
    ty.declared_field(name)
        .ok_or_else(|| ReflectError::MemberNotFound {
            type_name: ty.name().to_string(),
            member: format!("field {}", name),
        })
}

pub(super) fn find_method<'a>(
    ty: &'a TypeDescriptor,
    name: &str,
    params: &[TypeRef],
) -> Result<&'a MethodInfo> {
    ty.declared_method(name, params)
        .ok_or_else(|| ReflectError::MemberNotFound {
            type_name: ty.name().to_string(),
            member: format!("method {}", signature(name, params)),
        })
}

pub(super) fn find_constructor<'a>(
    ty: &'a TypeDescriptor,
    params: &[TypeRef],
) -> Result<&'a ConstructorInfo> {
    ty.declared_constructor(params)
        .ok_or_else(|| ReflectError::MemberNotFound {
            type_name: ty.name().to_string(),
            member: format!("constructor {}", signature("", params)),
        })
}

impl Proxy {
    /// Run `query` against the freshly resolved target type
    pub(super) fn query<R>(&self, query: impl FnOnce(&TypeDescriptor) -> Result<R>) -> Option<R> {
        absorb(self.try_target_type().and_then(|ty| query(&ty)))
    }

    fn check(&self, query: impl FnOnce(&TypeDescriptor) -> Result<bool>) -> bool {
        self.query(query).unwrap_or(false)
    }

    // ===== Type =====

    /// Whether the type name currently resolves
    pub fn exists_type(&self) -> bool {
        self.check(|_| Ok(true))
    }

    /// Whether the target type is abstract
    pub fn is_abstract(&self) -> bool {
        self.check(|ty| Ok(ty.is_abstract()))
    }

    /// Whether the target type is an interface
    pub fn is_interface(&self) -> bool {
        self.check(|ty| Ok(ty.is_interface()))
    }

    /// Whether the target type implements the interface `name`.
    ///
    /// `name` must itself resolve.
    pub fn implements_interface(&self, name: &str) -> bool {
        self.is_assignable_to(name)
    }

    /// Whether the target type is `name` or extends it, directly or not.
    ///
    /// `name` must itself resolve.
    pub fn extends_type(&self, name: &str) -> bool {
        self.is_assignable_to(name)
    }

    fn is_assignable_to(&self, name: &str) -> bool {
        self.check(|ty| {
            let other = self.resolver.try_resolve(name)?;
            let assignable = self.resolver.is_assignable(ty, &other);
            if !assignable {
                debug!("{} is not assignable to {}", ty.name(), other.name());
            }
            Ok(assignable)
        })
    }

    // ===== Fields =====

    /// Whether the target type declares a field `name`
    pub fn has_property(&self, name: &str) -> bool {
        self.check(|ty| find_field(ty, name).map(|_| true))
    }

    /// Declared type of field `name`
    pub fn property_type(&self, name: &str) -> Option<GenericType> {
        self.query(|ty| Ok(find_field(ty, name)?.field_type.clone()))
    }

    /// Whether field `name` is declared private
    pub fn is_property_private(&self, name: &str) -> bool {
        self.check(|ty| Ok(find_field(ty, name)?.modifiers.is_private))
    }

    // ===== Methods =====

    /// Whether the target type declares `name` with exactly these parameter types
    pub fn has_method(&self, name: &str, params: &[TypeRef]) -> bool {
        self.check(|ty| find_method(ty, name, params).map(|_| true))
    }

    /// Declared return type of `name(params)`
    pub fn method_return_type(&self, name: &str, params: &[TypeRef]) -> Option<GenericType> {
        self.query(|ty| Ok(find_method(ty, name, params)?.return_type.clone()))
    }

    /// Whether `name(params)` is declared public
    pub fn is_method_public(&self, name: &str, params: &[TypeRef]) -> bool {
        self.check(|ty| Ok(find_method(ty, name, params)?.modifiers.is_public))
    }

    /// Whether `name(params)` is declared protected
    pub fn is_method_protected(&self, name: &str, params: &[TypeRef]) -> bool {
        self.check(|ty| Ok(find_method(ty, name, params)?.modifiers.is_protected))
    }

    /// Whether `name(params)` is declared abstract
    pub fn is_method_abstract(&self, name: &str, params: &[TypeRef]) -> bool {
        self.check(|ty| Ok(find_method(ty, name, params)?.modifiers.is_abstract))
    }

    /// Whether `name(params)` is declared static
    pub fn is_method_static(&self, name: &str, params: &[TypeRef]) -> bool {
        self.check(|ty| Ok(find_method(ty, name, params)?.modifiers.is_static))
    }

    // ===== Constructors =====

    /// Whether the target type declares a constructor with exactly these parameter types
    pub fn has_constructor(&self, params: &[TypeRef]) -> bool {
        self.check(|ty| find_constructor(ty, params).map(|_| true))
    }

    /// Whether the constructor with these parameter types is public
    pub fn is_constructor_public(&self, params: &[TypeRef]) -> bool {
        self.check(|ty| Ok(find_constructor(ty, params)?.modifiers.is_public))
    }
}
