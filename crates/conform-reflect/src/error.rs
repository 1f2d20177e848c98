//! Error types
//!
//! None of these ever escape a [`Proxy`](crate::Proxy) query: they exist so
//! the internals can use `?` and log a precise reason before the outcome is
//! collapsed to `false` / `None`.

use std::path::PathBuf;

use crate::types::TypeRef;

/// Result type used inside the crate
pub type Result<T, E = ReflectError> = std::result::Result<T, E>;

/// Failures raised by member bodies and value conversion.
///
/// These are what a constructor, method or field reader returns when it
/// "throws".
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvokeError {
    /// Argument has the wrong dynamic type
    #[error("argument {index}: expected {expected}, got {got}")]
    ArgumentMismatch {
        /// Argument position
        index: usize,
        /// Expected type name
        expected: String,
        /// Actual value kind
        got: String,
    },

    /// Argument count differs from the declared parameter count
    #[error("expected {expected} argument(s), got {got}")]
    ArgumentCount {
        /// Declared parameter count
        expected: usize,
        /// Supplied argument count
        got: usize,
    },

    /// Fewer arguments than the body reads
    #[error("missing argument {0}")]
    MissingArgument(usize),

    /// Instance state is not of the concrete type the body expects
    #[error("instance of {type_name} does not hold the expected state")]
    StateMismatch {
        /// Runtime type of the instance
        type_name: String,
    },

    /// Instance state is already mutably borrowed
    #[error("instance of {type_name} is already borrowed")]
    StateBorrowed {
        /// Runtime type of the instance
        type_name: String,
    },

    /// Member is not visible to a public-only call
    #[error("{0} is not accessible")]
    Inaccessible(String),

    /// Member has no body
    #[error("{0} is abstract")]
    Abstract(String),

    /// Domain failure raised by the callee
    #[error("{0}")]
    Raised(String),
}

impl InvokeError {
    /// Shorthand for a callee-side domain failure
    pub fn raised(message: impl Into<String>) -> Self {
        InvokeError::Raised(message.into())
    }
}

/// Reasons a reflective query or call produced no result.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReflectError {
    /// Symbolic name does not resolve to a registered type
    #[error("type '{0}' could not be resolved")]
    TargetUnresolved(String),

    /// No member with the requested name and exact signature
    #[error("{type_name} declares no {member}")]
    MemberNotFound {
        /// Type that was searched
        type_name: String,
        /// Rendered member signature
        member: String,
    },

    /// Declared type exists but has the wrong shape
    #[error("{member}: expected {expected}, found {found}")]
    SignatureMismatch {
        /// Rendered member signature
        member: String,
        /// What the caller asked for
        expected: String,
        /// What is declared
        found: String,
    },

    /// The member was found but raised while running
    #[error("invocation of {member} failed: {source}")]
    InvocationFailure {
        /// Rendered member signature
        member: String,
        /// What the body raised
        #[source]
        source: InvokeError,
    },

    /// No public constructor of matching arity succeeded
    #[error("no constructor of {type_name} accepted {arity} argument(s)")]
    ConstructionFailure {
        /// Type being instantiated
        type_name: String,
        /// Number of arguments supplied
        arity: usize,
    },

    /// Behavioral call on a proxy without a bound instance
    #[error("proxy for '{0}' has no bound instance")]
    NoInstance(String),
}

/// Failures loading a [`ProxyConfig`](crate::ProxyConfig)
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the config file
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// File that could not be read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Failed to render TOML
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Parsed but semantically invalid
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Render `name(T1, T2)` for log messages
pub(crate) fn signature(name: &str, params: &[TypeRef]) -> String {
    let params: Vec<&str> = params.iter().map(TypeRef::name).collect();
    format!("{}({})", name, params.join(", "))
}
