//! Signature-level type model
//!
//! Types as they appear in member signatures: the raw (erased) type that
//! exact-signature lookups compare against, and the declared generic form
//! whose first type argument can be inspected.

use std::fmt;

/// A raw type as used in field types, return types and parameter lists.
///
/// Equality is exact: `Int` never matches `Long`, and `Class("List")` never
/// matches `Class("ArrayList")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// No value (method return only)
    Void,
    /// Boolean primitive
    Boolean,
    /// 32-bit integer primitive
    Int,
    /// 64-bit integer primitive
    Long,
    /// 64-bit floating point primitive
    Double,
    /// Character primitive
    Char,
    /// Built-in string type
    String,
    /// The top object type every reference converts to
    Object,
    /// A named reference type (class or interface)
    Class(String),
}

impl TypeRef {
    /// Create a named reference type
    pub fn class(name: impl Into<String>) -> Self {
        TypeRef::Class(name.into())
    }

    /// Whether this is a primitive (non-reference) type
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            TypeRef::Boolean | TypeRef::Int | TypeRef::Long | TypeRef::Double | TypeRef::Char
        )
    }

    /// Human-readable name, as it would be written in a signature
    pub fn name(&self) -> &str {
        match self {
            TypeRef::Void => "void",
            TypeRef::Boolean => "boolean",
            TypeRef::Int => "int",
            TypeRef::Long => "long",
            TypeRef::Double => "double",
            TypeRef::Char => "char",
            TypeRef::String => "String",
            TypeRef::Object => "Object",
            TypeRef::Class(name) => name,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A declared type: raw type plus its actual type arguments.
///
/// An empty argument list means the declaration is not parameterized.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GenericType {
    /// Erased type
    pub raw: TypeRef,
    /// Actual type arguments in declaration order
    pub arguments: Vec<TypeRef>,
}

impl GenericType {
    /// A non-parameterized declaration
    pub fn plain(raw: TypeRef) -> Self {
        Self {
            raw,
            arguments: Vec::new(),
        }
    }

    /// A parameterized declaration, e.g. `List<String>`
    pub fn parameterized(raw: TypeRef, arguments: Vec<TypeRef>) -> Self {
        Self { raw, arguments }
    }

    /// Whether the declaration carries type arguments
    pub fn is_parameterized(&self) -> bool {
        !self.arguments.is_empty()
    }

    /// The first type argument, the only one ever inspected
    pub fn first_argument(&self) -> Option<&TypeRef> {
        self.arguments.first()
    }

    /// Check the raw type and, when `argument` is given, the first type argument.
    pub fn matches(&self, raw: &TypeRef, argument: Option<&TypeRef>) -> bool {
        if &self.raw != raw {
            return false;
        }
        match argument {
            None => true,
            Some(expected) => self.first_argument() == Some(expected),
        }
    }
}

impl From<TypeRef> for GenericType {
    fn from(raw: TypeRef) -> Self {
        GenericType::plain(raw)
    }
}

impl fmt::Display for GenericType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)?;
        if self.is_parameterized() {
            let args: Vec<&str> = self.arguments.iter().map(TypeRef::name).collect();
            write!(f, "<{}>", args.join(", "))?;
        }
        Ok(())
    }
}

/// Kind of a registered type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeKind {
    /// Concrete or abstract class
    #[default]
    Class,
    /// Interface (never instantiable)
    Interface,
}

/// Modifier flags for types and their members
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Public visibility
    pub is_public: bool,
    /// Private visibility
    pub is_private: bool,
    /// Protected visibility
    pub is_protected: bool,
    /// Static member
    pub is_static: bool,
    /// Final (non-reassignable field / non-overridable method)
    pub is_final: bool,
    /// Abstract type or member
    pub is_abstract: bool,
}

impl Modifiers {
    /// Public, nothing else
    pub const PUBLIC: Self = Self {
        is_public: true,
        is_private: false,
        is_protected: false,
        is_static: false,
        is_final: false,
        is_abstract: false,
    };

    /// Private, nothing else
    pub const PRIVATE: Self = Self {
        is_public: false,
        is_private: true,
        is_protected: false,
        is_static: false,
        is_final: false,
        is_abstract: false,
    };

    /// Protected, nothing else
    pub const PROTECTED: Self = Self {
        is_public: false,
        is_private: false,
        is_protected: true,
        is_static: false,
        is_final: false,
        is_abstract: false,
    };

    /// Package-private (no visibility flag set)
    pub const PACKAGE: Self = Self {
        is_public: false,
        is_private: false,
        is_protected: false,
        is_static: false,
        is_final: false,
        is_abstract: false,
    };

    /// Add the static flag
    pub const fn with_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Add the final flag
    pub const fn with_final(mut self) -> Self {
        self.is_final = true;
        self
    }

    /// Add the abstract flag
    pub const fn with_abstract(mut self) -> Self {
        self.is_abstract = true;
        self
    }
}
