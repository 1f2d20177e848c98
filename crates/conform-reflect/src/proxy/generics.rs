//! Generic-argument checks
//!
//! Only the first type argument of a parameterized declaration is ever
//! compared.

use tracing::warn;

use super::shape::{find_field, find_method};
use super::Proxy;
use crate::error::{signature, ReflectError, Result};
use crate::types::{GenericType, TypeRef};

fn expect_declared(
    member: &str,
    declared: &GenericType,
    raw: &TypeRef,
    argument: Option<&TypeRef>,
) -> Result<bool> {
    let mismatch = |expected: String| ReflectError::SignatureMismatch {
        member: member.to_string(),
        expected,
        found: declared.to_string(),
    };

    if &declared.raw != raw {
        return Err(mismatch(raw.to_string()));
    }
    let Some(argument) = argument else {
        return Ok(true);
    };
    if !declared.is_parameterized() {
        return Err(mismatch(format!("{}<{}>", raw, argument)));
    }
    if declared.first_argument() != Some(argument) {
        return Err(mismatch(format!("{}<{}, ..>", raw, argument)));
    }
    Ok(true)
}

impl Proxy {
    /// Whether field `name` is declared as `ty`, and, if `argument` is
    /// given, parameterized with `argument` as its first type argument.
    pub fn is_property_of_type(
        &self,
        name: &str,
        ty: &TypeRef,
        argument: Option<&TypeRef>,
    ) -> bool {
        self.query(|target| {
            let field = find_field(target, name)?;
            expect_declared(&field.name, &field.field_type, ty, argument)
        })
        .unwrap_or(false)
    }

    /// Whether `name(params)` returns `return_type`, and, if `argument` is
    /// given, a parameterized type whose first argument is `argument`.
    pub fn is_method_return_type(
        &self,
        return_type: &TypeRef,
        argument: Option<&TypeRef>,
        name: &str,
        params: &[TypeRef],
    ) -> bool {
        self.query(|target| {
            let method = find_method(target, name, params)?;
            expect_declared(&signature(name, params), &method.return_type, return_type, argument)
        })
        .unwrap_or(false)
    }

    /// Check the first type argument of each parameter of `name(params)`.
    ///
    /// `arguments` is aligned with `params`; a `None` entry skips that
    /// position. A length mismatch is a caller mistake: it is reported
    /// with a warning and answers `false`.
    pub fn is_method_parameter_from_generic_type(
        &self,
        name: &str,
        params: &[TypeRef],
        arguments: &[Option<TypeRef>],
    ) -> bool {
        if params.len() != arguments.len() {
            warn!(
                "wrong input for is_method_parameter_from_generic_type: \
                 {} parameter types but {} expected arguments",
                params.len(),
                arguments.len()
            );
            return false;
        }
        self.query(|target| {
            let method = find_method(target, name, params)?;
            let member = signature(name, params);
            for (param, argument) in method.parameters.iter().zip(arguments) {
                let Some(argument) = argument else {
                    continue;
                };
                expect_declared(
                    &format!("{} parameter {}", member, param.index),
                    &param.declared,
                    &param.declared.raw,
                    Some(argument),
                )?;
            }
            Ok(true)
        })
        .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::descriptor::{FieldInfo, MethodInfo, TypeBuilder};
    use crate::registry::TypeRegistry;
    use crate::resolver::TypeResolver;
    use crate::types::Modifiers;

    fn list_of(item: TypeRef) -> GenericType {
        GenericType::parameterized(TypeRef::class("java.util.List"), vec![item])
    }

    fn map_of(key: TypeRef, value: TypeRef) -> GenericType {
        GenericType::parameterized(TypeRef::class("java.util.Map"), vec![key, value])
    }

    fn inventory() -> Proxy {
        let registry = Arc::new(TypeRegistry::new());
        registry.register(
            TypeBuilder::class("shop.Inventory")
                .field(FieldInfo::new("items", list_of(item()), Modifiers::PRIVATE))
                .field(FieldInfo::new("raw", list(), Modifiers::PRIVATE))
                .field(FieldInfo::new(
                    "stock",
                    map_of(TypeRef::String, TypeRef::Int),
                    Modifiers::PRIVATE,
                ))
                .method(
                    MethodInfo::new("getItems")
                        .returns(list_of(TypeRef::class("shop.Item"))),
                )
                .method(MethodInfo::new("size").returns(TypeRef::Int))
                .method(
                    MethodInfo::new("addAll")
                        .param(list_of(TypeRef::class("shop.Item")))
                        .param(TypeRef::Int),
                )
                .method(MethodInfo::new("replace").param(TypeRef::class("java.util.List")))
                .build(),
        );
        Proxy::wrap_with(TypeResolver::new(registry), "shop.Inventory", None)
    }

    fn item() -> TypeRef {
        TypeRef::class("shop.Item")
    }

    fn list() -> TypeRef {
        TypeRef::class("java.util.List")
    }

    #[test]
    fn test_property_of_type() {
        let inv = inventory();
        assert!(inv.is_property_of_type("items", &list(), None));
        assert!(inv.is_property_of_type("items", &list(), Some(&item())));
        assert!(!inv.is_property_of_type("items", &list(), Some(&TypeRef::String)));
        assert!(!inv.is_property_of_type("items", &TypeRef::class("java.util.Set"), None));
        assert!(!inv.is_property_of_type("missing", &list(), None));
    }

    #[test]
    fn test_raw_declaration_fails_argument_check() {
        let inv = inventory();
        assert!(inv.is_property_of_type("raw", &list(), None));
        assert!(!inv.is_property_of_type("raw", &list(), Some(&item())));
    }

    #[test]
    fn test_only_first_argument_is_inspected() {
        let inv = inventory();
        let map = TypeRef::class("java.util.Map");
        assert!(inv.is_property_of_type("stock", &map, Some(&TypeRef::String)));
        assert!(!inv.is_property_of_type("stock", &map, Some(&TypeRef::Int)));
    }

    #[test]
    fn test_method_return_type() {
        let inv = inventory();
        assert!(inv.is_method_return_type(&list(), Some(&item()), "getItems", &[]));
        assert!(inv.is_method_return_type(&list(), None, "getItems", &[]));
        assert!(!inv.is_method_return_type(&list(), Some(&TypeRef::String), "getItems", &[]));
        assert!(inv.is_method_return_type(&TypeRef::Int, None, "size", &[]));
        assert!(!inv.is_method_return_type(&TypeRef::Int, Some(&item()), "size", &[]));
        assert!(!inv.is_method_return_type(&TypeRef::Long, None, "size", &[]));
        assert!(inv.is_method_return_type(&TypeRef::Void, None, "replace", &[list()]));
        assert!(!inv.is_method_return_type(&TypeRef::Void, None, "replace", &[]));
    }

    #[test]
    fn test_method_parameter_generic_types() {
        let inv = inventory();
        let params = [list(), TypeRef::Int];
        assert!(inv.is_method_parameter_from_generic_type(
            "addAll",
            &params,
            &[Some(item()), None]
        ));
        assert!(inv.is_method_parameter_from_generic_type("addAll", &params, &[None, None]));
        assert!(!inv.is_method_parameter_from_generic_type(
            "addAll",
            &params,
            &[Some(TypeRef::String), None]
        ));
        // int is never parameterized
        assert!(!inv.is_method_parameter_from_generic_type(
            "addAll",
            &params,
            &[Some(item()), Some(TypeRef::Int)]
        ));
        // declared raw
        assert!(!inv.is_method_parameter_from_generic_type("replace", &[list()], &[Some(item())]));
    }

    #[test]
    fn test_method_parameter_length_mismatch() {
        let inv = inventory();
        assert!(!inv.is_method_parameter_from_generic_type(
            "addAll",
            &[list(), TypeRef::Int],
            &[Some(item())]
        ));
        assert!(!inv.is_method_parameter_from_generic_type("addAll", &[list()], &[Some(item())]));
    }

    #[test]
    fn test_unresolved_type() {
        let ghost = Proxy::wrap("shop.DoesNotExist", None);
        assert!(!ghost.is_property_of_type("items", &list(), None));
        assert!(!ghost.is_method_return_type(&TypeRef::Int, None, "size", &[]));
        assert!(!ghost.is_method_parameter_from_generic_type("replace", &[list()], &[None]));
    }
}
