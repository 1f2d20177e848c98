//! Dynamic values and live instances
//!
//! [`Value`] carries arguments into and results out of reflective calls.
//! [`Object`] is a live instance: its runtime type plus type-erased state
//! that member bodies borrow back as their concrete Rust type.

use std::any::Any;
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;
use std::sync::Arc;

use rustc_hash::FxHasher;

use crate::descriptor::TypeDescriptor;
use crate::error::InvokeError;
use crate::types::TypeRef;

/// A live instance of a registered type
#[derive(Clone)]
pub struct Object {
    class: Arc<TypeDescriptor>,
    state: Rc<RefCell<Box<dyn Any>>>,
}

impl Object {
    /// Wrap `state` as an instance of `class`
    pub fn new(class: Arc<TypeDescriptor>, state: Box<dyn Any>) -> Self {
        Self {
            class,
            state: Rc::new(RefCell::new(state)),
        }
    }

    /// Runtime type of this instance
    pub fn class(&self) -> &Arc<TypeDescriptor> {
        &self.class
    }

    /// Name of the runtime type
    pub fn type_name(&self) -> &str {
        self.class.name()
    }

    /// Borrow the state as `T`
    pub fn state<T: Any>(&self) -> Result<Ref<'_, T>, InvokeError> {
        let cell = self
            .state
            .try_borrow()
            .map_err(|_| InvokeError::StateBorrowed {
                type_name: self.type_name().to_string(),
            })?;
        Ref::filter_map(cell, |boxed| boxed.downcast_ref::<T>()).map_err(|_| {
            InvokeError::StateMismatch {
                type_name: self.type_name().to_string(),
            }
        })
    }

    /// Mutably borrow the state as `T`
    pub fn state_mut<T: Any>(&self) -> Result<RefMut<'_, T>, InvokeError> {
        let cell = self
            .state
            .try_borrow_mut()
            .map_err(|_| InvokeError::StateBorrowed {
                type_name: self.type_name().to_string(),
            })?;
        RefMut::filter_map(cell, |boxed| boxed.downcast_mut::<T>()).map_err(|_| {
            InvokeError::StateMismatch {
                type_name: self.type_name().to_string(),
            }
        })
    }

    /// Identity comparison
    pub fn ptr_eq(&self, other: &Object) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }

    /// Hash of the instance's identity, stable for its lifetime
    pub fn identity_hash(&self) -> i32 {
        let mut hasher = FxHasher::default();
        Rc::as_ptr(&self.state).hash(&mut hasher);
        hasher.finish() as i32
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("type", &self.type_name())
            .finish_non_exhaustive()
    }
}

/// Dynamically typed argument or result
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Absent reference
    #[default]
    Null,
    /// Result of a method returning nothing
    Void,
    /// Boolean
    Bool(bool),
    /// 32-bit integer
    Int(i32),
    /// 64-bit integer
    Long(i64),
    /// 64-bit float
    Double(f64),
    /// Character
    Char(char),
    /// String
    Str(String),
    /// Reference to a live instance
    Object(Object),
}

impl Value {
    /// Name of the value's kind, for diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Void => "void",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "int",
            Value::Long(_) => "long",
            Value::Double(_) => "double",
            Value::Char(_) => "char",
            Value::Str(_) => "String",
            Value::Object(_) => "Object",
        }
    }

    /// Whether this value can be passed where `ty` is declared.
    ///
    /// Primitives widen (`char` → `int` → `long` → `double`); `null` and
    /// object references pass for any reference type, and every non-void
    /// value passes for `Object`.
    pub fn conforms_to(&self, ty: &TypeRef) -> bool {
        match (ty, self) {
            (TypeRef::Void, _) | (_, Value::Void) => false,
            (TypeRef::Object, _) => true,
            (TypeRef::Boolean, Value::Bool(_)) => true,
            (TypeRef::Char, Value::Char(_)) => true,
            (TypeRef::Int, Value::Int(_) | Value::Char(_)) => true,
            (TypeRef::Long, Value::Int(_) | Value::Long(_) | Value::Char(_)) => true,
            (
                TypeRef::Double,
                Value::Int(_) | Value::Long(_) | Value::Double(_) | Value::Char(_),
            ) => true,
            (TypeRef::String, Value::Str(_) | Value::Null) => true,
            (TypeRef::Class(_), Value::Object(_) | Value::Null) => true,
            _ => false,
        }
    }

    /// Whether this is `Null`
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The instance, if this is an object reference
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Long(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Double(f)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::Char(c)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Object> for Value {
    fn from(obj: Object) -> Self {
        Value::Object(obj)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Void
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

/// Typed extraction from a [`Value`].
///
/// Integer and floating targets accept widening from narrower values.
pub trait FromValue: Sized {
    /// Type name reported when extraction fails
    const EXPECTED: &'static str;

    /// Extract, or `None` when the value has another kind
    fn from_value(value: &Value) -> Option<Self>;
}

impl FromValue for Value {
    const EXPECTED: &'static str = "any";

    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

impl FromValue for bool {
    const EXPECTED: &'static str = "boolean";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl FromValue for i32 {
    const EXPECTED: &'static str = "int";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl FromValue for i64 {
    const EXPECTED: &'static str = "long";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(i) => Some(i64::from(*i)),
            Value::Long(i) => Some(*i),
            _ => None,
        }
    }
}

impl FromValue for f64 {
    const EXPECTED: &'static str = "double";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(i) => Some(f64::from(*i)),
            Value::Long(i) => Some(*i as f64),
            Value::Double(f) => Some(*f),
            _ => None,
        }
    }
}

impl FromValue for char {
    const EXPECTED: &'static str = "char";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Char(c) => Some(*c),
            _ => None,
        }
    }
}

impl FromValue for String {
    const EXPECTED: &'static str = "String";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Str(s) => Some(s.clone()),
            _ => None,
        }
    }
}

impl FromValue for Object {
    const EXPECTED: &'static str = "Object";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_object().cloned()
    }
}

impl FromValue for () {
    const EXPECTED: &'static str = "void";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Void | Value::Null => Some(()),
            _ => None,
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    const EXPECTED: &'static str = T::EXPECTED;

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(None),
            other => T::from_value(other).map(Some),
        }
    }
}

/// Read argument `index` as `T` inside a member body
pub fn arg<T: FromValue>(args: &[Value], index: usize) -> Result<T, InvokeError> {
    let value = args.get(index).ok_or(InvokeError::MissingArgument(index))?;
    T::from_value(value).ok_or_else(|| InvokeError::ArgumentMismatch {
        index,
        expected: T::EXPECTED.to_string(),
        got: value.kind_name().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::TypeBuilder;

    struct Counter {
        count: i32,
    }

    fn counter_object() -> Object {
        let class = Arc::new(TypeBuilder::class("test.Counter").build());
        Object::new(class, Box::new(Counter { count: 3 }))
    }

    #[test]
    fn test_arg_extraction() {
        let args = vec![Value::from(7), Value::from("seven"), Value::Null];
        assert_eq!(arg::<i32>(&args, 0), Ok(7));
        assert_eq!(arg::<i64>(&args, 0), Ok(7));
        assert_eq!(arg::<String>(&args, 1), Ok("seven".to_string()));
        assert_eq!(arg::<Option<String>>(&args, 2), Ok(None));
        assert_eq!(arg::<i32>(&args, 3), Err(InvokeError::MissingArgument(3)));
        assert_eq!(
            arg::<bool>(&args, 0),
            Err(InvokeError::ArgumentMismatch {
                index: 0,
                expected: "boolean".to_string(),
                got: "int".to_string(),
            })
        );
    }

    #[test]
    fn test_value_conversions() {
        assert_eq!(Value::from(Some(2)), Value::Int(2));
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Value::from(()), Value::Void);
        assert_eq!(<()>::from_value(&Value::Void), Some(()));
        assert_eq!(i32::from_value(&Value::Long(1)), None);
        assert_eq!(f64::from_value(&Value::Int(2)), Some(2.0));
    }

    #[test]
    fn test_object_state_access() {
        let obj = counter_object();
        assert_eq!(obj.type_name(), "test.Counter");
        assert_eq!(obj.state::<Counter>().unwrap().count, 3);

        obj.state_mut::<Counter>().unwrap().count += 1;
        assert_eq!(obj.state::<Counter>().unwrap().count, 4);

        assert!(matches!(
            obj.state::<String>(),
            Err(InvokeError::StateMismatch { .. })
        ));
    }

    #[test]
    fn test_conflicting_borrow_is_an_error() {
        let obj = counter_object();
        let _guard = obj.state_mut::<Counter>().unwrap();
        assert!(matches!(
            obj.state::<Counter>(),
            Err(InvokeError::StateBorrowed { .. })
        ));
    }

    #[test]
    fn test_conformance_to_declared_types() {
        assert!(Value::from(1).conforms_to(&TypeRef::Int));
        assert!(Value::from(1).conforms_to(&TypeRef::Long));
        assert!(Value::from(1).conforms_to(&TypeRef::Double));
        assert!(Value::from('a').conforms_to(&TypeRef::Int));
        assert!(!Value::from(1i64).conforms_to(&TypeRef::Int));
        assert!(!Value::from(1.5).conforms_to(&TypeRef::Long));
        assert!(!Value::from("1").conforms_to(&TypeRef::Int));
        assert!(!Value::Null.conforms_to(&TypeRef::Int));

        assert!(Value::from("s").conforms_to(&TypeRef::String));
        assert!(Value::Null.conforms_to(&TypeRef::String));
        assert!(Value::Null.conforms_to(&TypeRef::class("shop.Item")));
        assert!(Value::from(counter_object()).conforms_to(&TypeRef::class("shop.Item")));
        assert!(!Value::from("s").conforms_to(&TypeRef::class("shop.Item")));

        assert!(Value::from(7).conforms_to(&TypeRef::Object));
        assert!(!Value::Void.conforms_to(&TypeRef::Object));
        assert!(!Value::from(true).conforms_to(&TypeRef::Void));
    }

    #[test]
    fn test_identity_hash() {
        let a = counter_object();
        assert_eq!(a.identity_hash(), a.clone().identity_hash());
    }

    #[test]
    fn test_object_identity() {
        let a = counter_object();
        let b = a.clone();
        let c = counter_object();
        assert!(a.ptr_eq(&b));
        assert_eq!(Value::from(a.clone()), Value::from(b));
        assert_ne!(Value::from(a), Value::from(c));
    }
}
