//! Shared fixtures: the `Example` exercise type and its proxy wrapper.

#![allow(dead_code)]

use std::any::Any;
use std::ops::Deref;
use std::sync::Arc;

use conform_reflect::{
    arg, ConstructorInfo, FieldInfo, InvokeError, MethodInfo, Modifiers, Object, Proxy,
    TypeBuilder, TypeDescriptor, TypeRef, TypeRegistry, TypeResolver, Value,
};

pub const EXAMPLE: &str = "com.redi.j2.Example";

/// What a student would have written
pub struct Example {
    bar: i32,
}

fn new_example(args: &[Value]) -> Result<Box<dyn Any>, InvokeError> {
    Ok(Box::new(Example { bar: arg(args, 0)? }))
}

fn read_bar(obj: &Object) -> Result<Value, InvokeError> {
    Ok(Value::from(obj.state::<Example>()?.bar))
}

fn get_bar(obj: &Object, _args: &[Value]) -> Result<Value, InvokeError> {
    read_bar(obj)
}

fn set_bar(obj: &Object, args: &[Value]) -> Result<Value, InvokeError> {
    obj.state_mut::<Example>()?.bar = arg(args, 0)?;
    Ok(Value::Void)
}

fn foo(obj: &Object, args: &[Value]) -> Result<Value, InvokeError> {
    let n: i32 = arg(args, 0)?;
    Ok(Value::from(obj.state::<Example>()?.bar + n))
}

fn equals(obj: &Object, args: &[Value]) -> Result<Value, InvokeError> {
    let Some(other) = arg::<Option<Object>>(args, 0)? else {
        return Ok(Value::from(false));
    };
    if other.type_name() != obj.type_name() {
        return Ok(Value::from(false));
    }
    let same = obj.state::<Example>()?.bar == other.state::<Example>()?.bar;
    Ok(Value::from(same))
}

fn hash_code(obj: &Object, _args: &[Value]) -> Result<Value, InvokeError> {
    Ok(Value::from(31 + obj.state::<Example>()?.bar))
}

fn to_string(obj: &Object, _args: &[Value]) -> Result<Value, InvokeError> {
    Ok(Value::from(format!("Example(bar={})", obj.state::<Example>()?.bar)))
}

pub fn example_type() -> TypeDescriptor {
    TypeBuilder::class(EXAMPLE)
        .field(FieldInfo::new("bar", TypeRef::Int, Modifiers::PRIVATE).with_reader(read_bar))
        .constructor(ConstructorInfo::new(new_example).param(TypeRef::Int))
        .method(MethodInfo::new("getBar").returns(TypeRef::Int).body(get_bar))
        .method(MethodInfo::new("setBar").param(TypeRef::Int).body(set_bar))
        .method(
            MethodInfo::new("foo")
                .param(TypeRef::Int)
                .returns(TypeRef::Int)
                .body(foo),
        )
        .method(
            MethodInfo::new("equals")
                .param(TypeRef::Object)
                .returns(TypeRef::Boolean)
                .body(equals),
        )
        .method(MethodInfo::new("hashCode").returns(TypeRef::Int).body(hash_code))
        .method(MethodInfo::new("toString").returns(TypeRef::String).body(to_string))
        .build()
}

/// A resolver over a private registry holding `Example`
pub fn resolver() -> TypeResolver {
    let registry = Arc::new(TypeRegistry::new());
    registry.register(example_type());
    TypeResolver::new(registry)
}

/// A resolver over a private, empty registry
pub fn empty_resolver() -> TypeResolver {
    TypeResolver::new(Arc::new(TypeRegistry::new()))
}

/// Per-exercise proxy: fixes the target name and forwards a few calls
pub struct ExampleProxy(Proxy);

impl ExampleProxy {
    pub fn new(resolver: TypeResolver, bar: i32) -> Self {
        Self(Proxy::with_resolver(resolver, EXAMPLE, &[Value::from(bar)]))
    }

    pub fn wrap(resolver: TypeResolver, target: Option<Object>) -> Self {
        Self(Proxy::wrap_with(resolver, EXAMPLE, target))
    }

    pub fn foo(&self, number: i32) -> Option<i32> {
        if !self.has_target() {
            return None;
        }
        self.invoke("foo", &[TypeRef::Int], &[Value::from(number)])
    }

    pub fn get_bar(&self) -> Option<i32> {
        if !self.has_target() {
            return None;
        }
        self.invoke("getBar", &[], &[])
    }

    pub fn set_bar(&self, bar: i32) {
        if !self.has_target() {
            return;
        }
        let _: Option<()> = self.invoke("setBar", &[TypeRef::Int], &[Value::from(bar)]);
    }
}

impl Deref for ExampleProxy {
    type Target = Proxy;

    fn deref(&self) -> &Proxy {
        &self.0
    }
}

pub fn create_example(resolver: TypeResolver) -> ExampleProxy {
    ExampleProxy::new(resolver, 0)
}

/// Route `tracing` output through the test harness (RUST_LOG to enable)
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
