//! Type and member descriptors
//!
//! A [`TypeDescriptor`] is the reflective view of one registered type: its
//! kind, modifiers, supertypes and the members it declares, each in
//! declaration order. Members carry plain function pointers as their
//! runtime implementation, so descriptors are `Send + Sync` and can live
//! in a shared registry.
//!
//! Lookups on a descriptor only ever see *declared* members. Walking
//! supertypes is the resolver's job.

use std::any::Any;
use std::fmt;

use crate::error::InvokeError;
use crate::types::{GenericType, Modifiers, TypeKind, TypeRef};
use crate::value::{Object, Value};

/// Reads a field's current value from an instance
pub type FieldReader = fn(&Object) -> Result<Value, InvokeError>;

/// Runs a method against an instance
pub type MethodBody = fn(&Object, &[Value]) -> Result<Value, InvokeError>;

/// Produces the state of a new instance
pub type ConstructorBody = fn(&[Value]) -> Result<Box<dyn Any>, InvokeError>;

/// How accessibility is enforced when a member is called
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Call regardless of declared visibility
    ForceAccessible,
    /// Refuse anything that is not public
    PublicOnly,
}

/// A declared field
#[derive(Clone)]
pub struct FieldInfo {
    /// Field name
    pub name: String,
    /// Declared type
    pub field_type: GenericType,
    /// Modifier flags
    pub modifiers: Modifiers,
    /// Runtime accessor, if the field can be read reflectively
    pub reader: Option<FieldReader>,
}

impl FieldInfo {
    /// Create a field without a runtime accessor
    pub fn new(
        name: impl Into<String>,
        field_type: impl Into<GenericType>,
        modifiers: Modifiers,
    ) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
            modifiers,
            reader: None,
        }
    }

    /// Attach the runtime accessor
    pub fn with_reader(mut self, reader: FieldReader) -> Self {
        self.reader = Some(reader);
        self
    }
}

impl fmt::Debug for FieldInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldInfo")
            .field("name", &self.name)
            .field("field_type", &self.field_type)
            .field("modifiers", &self.modifiers)
            .field("readable", &self.reader.is_some())
            .finish()
    }
}

/// A declared parameter of a method or constructor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterInfo {
    /// Position in the parameter list
    pub index: usize,
    /// Declared type
    pub declared: GenericType,
}

fn push_param(params: &mut Vec<ParameterInfo>, declared: GenericType) {
    let index = params.len();
    params.push(ParameterInfo { index, declared });
}

/// Reject arguments that do not fit the declared parameters
fn check_arguments(params: &[ParameterInfo], args: &[Value]) -> Result<(), InvokeError> {
    if params.len() != args.len() {
        return Err(InvokeError::ArgumentCount {
            expected: params.len(),
            got: args.len(),
        });
    }
    for (param, value) in params.iter().zip(args) {
        if !value.conforms_to(&param.declared.raw) {
            return Err(InvokeError::ArgumentMismatch {
                index: param.index,
                expected: param.declared.raw.to_string(),
                got: value.kind_name().to_string(),
            });
        }
    }
    Ok(())
}

fn raw_params_equal(params: &[ParameterInfo], expected: &[TypeRef]) -> bool {
    params.len() == expected.len()
        && params
            .iter()
            .zip(expected)
            .all(|(param, ty)| &param.declared.raw == ty)
}

/// A declared method
#[derive(Clone)]
pub struct MethodInfo {
    /// Method name
    pub name: String,
    /// Parameters in order
    pub parameters: Vec<ParameterInfo>,
    /// Declared return type
    pub return_type: GenericType,
    /// Modifier flags
    pub modifiers: Modifiers,
    /// Implementation; `None` for abstract methods
    pub body: Option<MethodBody>,
}

impl MethodInfo {
    /// A public method returning `void` with no parameters
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            return_type: GenericType::plain(TypeRef::Void),
            modifiers: Modifiers::PUBLIC,
            body: None,
        }
    }

    /// Set the return type
    pub fn returns(mut self, return_type: impl Into<GenericType>) -> Self {
        self.return_type = return_type.into();
        self
    }

    /// Append a parameter
    pub fn param(mut self, declared: impl Into<GenericType>) -> Self {
        push_param(&mut self.parameters, declared.into());
        self
    }

    /// Replace the modifier flags
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Attach the implementation
    pub fn body(mut self, body: MethodBody) -> Self {
        self.body = Some(body);
        self
    }

    /// Raw parameter types in order
    pub fn param_types(&self) -> Vec<TypeRef> {
        self.parameters.iter().map(|p| p.declared.raw.clone()).collect()
    }

    /// Exact name and raw parameter-type match
    pub fn matches(&self, name: &str, params: &[TypeRef]) -> bool {
        self.name == name && raw_params_equal(&self.parameters, params)
    }

    /// Run the body against `target` after checking `args` against the
    /// declared parameters
    pub fn invoke(
        &self,
        target: &Object,
        args: &[Value],
        access: Access,
    ) -> Result<Value, InvokeError> {
        if access == Access::PublicOnly && !self.modifiers.is_public {
            return Err(InvokeError::Inaccessible(self.name.clone()));
        }
        let body = self
            .body
            .ok_or_else(|| InvokeError::Abstract(self.name.clone()))?;
        check_arguments(&self.parameters, args)?;
        body(target, args)
    }
}

impl fmt::Debug for MethodInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodInfo")
            .field("name", &self.name)
            .field("parameters", &self.parameters)
            .field("return_type", &self.return_type)
            .field("modifiers", &self.modifiers)
            .field("has_body", &self.body.is_some())
            .finish()
    }
}

/// A declared constructor
#[derive(Clone)]
pub struct ConstructorInfo {
    /// Parameters in order
    pub parameters: Vec<ParameterInfo>,
    /// Modifier flags
    pub modifiers: Modifiers,
    /// Implementation
    pub body: ConstructorBody,
}

impl ConstructorInfo {
    /// A public constructor with no parameters
    pub fn new(body: ConstructorBody) -> Self {
        Self {
            parameters: Vec::new(),
            modifiers: Modifiers::PUBLIC,
            body,
        }
    }

    /// Append a parameter
    pub fn param(mut self, declared: impl Into<GenericType>) -> Self {
        push_param(&mut self.parameters, declared.into());
        self
    }

    /// Replace the modifier flags
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Number of parameters
    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    /// Exact raw parameter-type match
    pub fn matches(&self, params: &[TypeRef]) -> bool {
        raw_params_equal(&self.parameters, params)
    }

    /// Check `args` against the declared parameters, then run the body
    pub fn construct(&self, args: &[Value]) -> Result<Box<dyn Any>, InvokeError> {
        check_arguments(&self.parameters, args)?;
        (self.body)(args)
    }
}

impl fmt::Debug for ConstructorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorInfo")
            .field("parameters", &self.parameters)
            .field("modifiers", &self.modifiers)
            .finish_non_exhaustive()
    }
}

/// Reflective view of a registered type
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    name: String,
    kind: TypeKind,
    modifiers: Modifiers,
    parent: Option<String>,
    interfaces: Vec<String>,
    fields: Vec<FieldInfo>,
    methods: Vec<MethodInfo>,
    constructors: Vec<ConstructorInfo>,
}

impl TypeDescriptor {
    /// Fully-qualified name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Class or interface
    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    /// Type-level modifiers
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Whether the type is abstract (interfaces always are)
    pub fn is_abstract(&self) -> bool {
        self.modifiers.is_abstract || self.kind == TypeKind::Interface
    }

    /// Whether the type is an interface
    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    /// Direct superclass name
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// Directly implemented (or, for interfaces, extended) interface names
    pub fn interfaces(&self) -> &[String] {
        &self.interfaces
    }

    /// Declared fields in declaration order
    pub fn fields(&self) -> &[FieldInfo] {
        &self.fields
    }

    /// Declared methods in declaration order
    pub fn methods(&self) -> &[MethodInfo] {
        &self.methods
    }

    /// Declared constructors in declaration order
    pub fn constructors(&self) -> &[ConstructorInfo] {
        &self.constructors
    }

    /// Declared field by exact name
    pub fn declared_field(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Declared method by exact name and parameter types
    pub fn declared_method(&self, name: &str, params: &[TypeRef]) -> Option<&MethodInfo> {
        self.methods.iter().find(|m| m.matches(name, params))
    }

    /// Declared constructor by exact parameter types
    pub fn declared_constructor(&self, params: &[TypeRef]) -> Option<&ConstructorInfo> {
        self.constructors.iter().find(|c| c.matches(params))
    }

    /// Public constructors, in declaration order
    pub fn public_constructors(&self) -> impl Iterator<Item = &ConstructorInfo> {
        self.constructors.iter().filter(|c| c.modifiers.is_public)
    }
}

/// Fluent construction of a [`TypeDescriptor`]
#[derive(Debug, Clone)]
pub struct TypeBuilder {
    descriptor: TypeDescriptor,
}

impl TypeBuilder {
    fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            descriptor: TypeDescriptor {
                name: name.into(),
                kind,
                modifiers: Modifiers::PUBLIC,
                parent: None,
                interfaces: Vec::new(),
                fields: Vec::new(),
                methods: Vec::new(),
                constructors: Vec::new(),
            },
        }
    }

    /// Start a public class
    pub fn class(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Class)
    }

    /// Start a public interface
    pub fn interface(name: impl Into<String>) -> Self {
        let mut builder = Self::new(name, TypeKind::Interface);
        builder.descriptor.modifiers.is_abstract = true;
        builder
    }

    /// Mark the type abstract
    pub fn abstract_type(mut self) -> Self {
        self.descriptor.modifiers.is_abstract = true;
        self
    }

    /// Replace the type-level modifiers
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.descriptor.modifiers = modifiers;
        self
    }

    /// Set the superclass
    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        self.descriptor.parent = Some(parent.into());
        self
    }

    /// Add an implemented interface
    pub fn implements(mut self, interface: impl Into<String>) -> Self {
        self.descriptor.interfaces.push(interface.into());
        self
    }

    /// Declare a field
    pub fn field(mut self, field: FieldInfo) -> Self {
        self.descriptor.fields.push(field);
        self
    }

    /// Declare a method
    pub fn method(mut self, method: MethodInfo) -> Self {
        self.descriptor.methods.push(method);
        self
    }

    /// Declare a constructor
    pub fn constructor(mut self, constructor: ConstructorInfo) -> Self {
        self.descriptor.constructors.push(constructor);
        self
    }

    /// Finish the descriptor
    pub fn build(self) -> TypeDescriptor {
        self.descriptor
    }
}
