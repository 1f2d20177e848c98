//! Conform Reflect
//!
//! Structural verification of late-bound types. A [`Proxy`] is bound to a
//! type by *name* and answers whether that type has the expected shape
//! (fields, methods, constructors, their types, modifiers and generic
//! arguments), and exercises its behavior through reflective calls.
//!
//! - **Registry / Resolver**: [`TypeRegistry`] holds [`TypeDescriptor`]s;
//!   [`TypeResolver`] turns symbolic names into descriptors, or `None`
//! - **Proxy**: shape queries, instantiation by constructor arity,
//!   invocation with declared → inherited-public fallback, identity
//!   forwarding
//!
//! A missing type or member is an ordinary answer here, not an error: every
//! proxy operation returns `false` / `None` instead of failing.
//!
//! # Example
//!
//! ```rust,ignore
//! use conform_reflect::*;
//!
//! struct Example { bar: i32 }
//!
//! fn new_example(args: &[Value]) -> Result<Box<dyn std::any::Any>, InvokeError> {
//!     Ok(Box::new(Example { bar: arg(args, 0)? }))
//! }
//!
//! fn foo(obj: &Object, args: &[Value]) -> Result<Value, InvokeError> {
//!     Ok(Value::from(obj.state::<Example>()?.bar + arg::<i32>(args, 0)?))
//! }
//!
//! TypeRegistry::global().register(
//!     TypeBuilder::class("com.redi.j2.Example")
//!         .field(FieldInfo::new("bar", TypeRef::Int, Modifiers::PRIVATE))
//!         .constructor(ConstructorInfo::new(new_example).param(TypeRef::Int))
//!         .method(MethodInfo::new("foo").param(TypeRef::Int).returns(TypeRef::Int).body(foo))
//!         .build(),
//! );
//!
//! let example = Proxy::new("com.redi.j2.Example", &[Value::from(1)]);
//! assert!(example.is_property_private("bar"));
//! assert_eq!(example.invoke::<i32>("foo", &[TypeRef::Int], &[Value::from(1)]), Some(2));
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![allow(clippy::should_implement_trait)]

pub mod config;
pub mod descriptor;
pub mod error;
pub mod proxy;
pub mod registry;
pub mod resolver;
pub mod types;
pub mod value;

pub use config::{LookupStrategy, ProxyConfig};
pub use descriptor::{
    Access, ConstructorBody, ConstructorInfo, FieldInfo, FieldReader, MethodBody, MethodInfo,
    ParameterInfo, TypeBuilder, TypeDescriptor,
};
pub use error::{ConfigError, InvokeError, ReflectError, Result};
pub use proxy::Proxy;
pub use registry::TypeRegistry;
pub use resolver::TypeResolver;
pub use types::{GenericType, Modifiers, TypeKind, TypeRef};
pub use value::{arg, FromValue, Object, Value};
