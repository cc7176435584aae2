use thiserror::Error;

use crate::Thrown;

pub type Result<T, E = ReflectError> = std::result::Result<T, E>;

/// Failures reported by reflective queries and instantiation.
///
/// Lookups never retry or recover; a failed lookup is reported to the caller as-is.
#[derive(Debug, Error)]
pub enum ReflectError {
    /// A required argument was absent.
    #[error("required argument `{0}` is absent")]
    NullArgument(&'static str),

    #[error("class not found: {0}")]
    ClassNotFound(String),

    #[error("no such field: {class}.{name}")]
    NoSuchField { class: String, name: String },

    #[error("no such method: {class}.{signature}")]
    NoSuchMethod { class: String, signature: String },

    #[error("no such constructor: {class}.<init>{signature}")]
    NoSuchConstructor { class: String, signature: String },

    /// The target is not concretely constructible, or its constructor body faulted.
    #[error("cannot instantiate {class}{}", fmt_cause(.cause))]
    Instantiation {
        class: String,
        #[source]
        cause: Option<Thrown>,
    },

    #[error("{caller} cannot access a member of {member} with modifiers \"{modifiers}\"")]
    IllegalAccess {
        member: String,
        modifiers: String,
        caller: String,
    },

    /// An unchecked fault raised by a constructor body, passed through unwrapped.
    #[error(transparent)]
    Fault(Thrown),

    #[error("array type with {dimensions} dimensions exceeds the limit of {limit}")]
    TooManyDimensions { dimensions: usize, limit: u8 },

    #[error("class `{class}` has a malformed stub: {source}")]
    InvalidStub {
        class: String,
        #[source]
        source: nova_classfile::Error,
    },

    /// A superclass or superinterface that is the wrong kind of type.
    #[error("incompatible class change: {0}")]
    IncompatibleClassChange(String),

    #[error("class circularity detected at {0}")]
    ClassCircularity(String),
}

impl ReflectError {
    /// True for every "no member or class matches" failure.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ReflectError::ClassNotFound(_)
                | ReflectError::NoSuchField { .. }
                | ReflectError::NoSuchMethod { .. }
                | ReflectError::NoSuchConstructor { .. }
        )
    }
}

fn fmt_cause(cause: &Option<Thrown>) -> String {
    match cause {
        Some(cause) => format!(": {cause}"),
        None => String::new(),
    }
}
