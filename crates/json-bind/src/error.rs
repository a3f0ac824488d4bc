//! Error taxonomy of the binding runtime: document-shape problems,
//! instantiation failures, and the umbrella error of the mapper facade.

use thiserror::Error;

use json_bind_creators::{DefinitionError, DynError};

use crate::path::PropPath;

/// A document failed to bind against a resolved creator. Every variant
/// carries the full path of the offending property.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BindError {
    #[error("unknown property `{name}` for `{type_name}` at {path}")]
    UnknownProperty {
        type_name: String,
        name: String,
        path: PropPath,
    },

    #[error("missing property `{name}` (parameter {index}) for `{type_name}` at {path}")]
    MissingProperty {
        type_name: String,
        name: String,
        index: usize,
        path: PropPath,
    },

    /// Explicit null for a creator property under strict null
    /// handling.
    #[error("null value for creator property `{name}` of `{type_name}` at {path}")]
    NullProperty {
        type_name: String,
        name: String,
        path: PropPath,
    },

    /// Null (explicit or absent) flowing into a primitive parameter
    /// under strict primitive handling.
    #[error("null value for primitive property `{name}` of `{type_name}` at {path}")]
    NullPrimitive {
        type_name: String,
        name: String,
        path: PropPath,
    },

    #[error("expected {expected} for `{type_name}` at {path}, got {got}")]
    KindMismatch {
        type_name: String,
        expected: String,
        got: &'static str,
        path: PropPath,
    },

    /// The input shape matches none of the type's creators.
    #[error("`{type_name}` cannot be created from {shape} input at {path}")]
    NoMatchingCreator {
        type_name: String,
        shape: &'static str,
        path: PropPath,
    },

    /// A parameter references a type that was never registered.
    #[error("`{type_name}` references unregistered type `{target}` at {path}")]
    UnknownRef {
        type_name: String,
        target: String,
        path: PropPath,
    },

    #[error("no injectable value configured for id `{id}` needed by `{type_name}` at {path}")]
    MissingInjectable {
        type_name: String,
        id: String,
        path: PropPath,
    },
}

impl BindError {
    pub fn path(&self) -> &PropPath {
        match self {
            BindError::UnknownProperty { path, .. }
            | BindError::MissingProperty { path, .. }
            | BindError::NullProperty { path, .. }
            | BindError::NullPrimitive { path, .. }
            | BindError::KindMismatch { path, .. }
            | BindError::NoMatchingCreator { path, .. }
            | BindError::UnknownRef { path, .. }
            | BindError::MissingInjectable { path, .. } => path,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            BindError::UnknownProperty { .. } => "UNKNOWN_PROPERTY",
            BindError::MissingProperty { .. } => "MISSING_PROPERTY",
            BindError::NullProperty { .. } => "NULL_PROPERTY",
            BindError::NullPrimitive { .. } => "NULL_PRIMITIVE",
            BindError::KindMismatch { .. } => "KIND_MISMATCH",
            BindError::NoMatchingCreator { .. } => "NO_MATCHING_CREATOR",
            BindError::UnknownRef { .. } => "UNKNOWN_REF",
            BindError::MissingInjectable { .. } => "MISSING_INJECTABLE",
        }
    }
}

/// A creator was invoked, or was about to be, and could not produce a
/// value.
#[derive(Debug, Error)]
pub enum CreateError {
    /// The creator body raised; the cause is preserved.
    #[error("creator {signature} of `{type_name}` failed at {path}: {source}")]
    CreatorFailure {
        type_name: String,
        signature: String,
        path: PropPath,
        #[source]
        source: DynError,
    },

    #[error("cannot instantiate abstract type `{type_name}` at {path}")]
    AbstractType { type_name: String, path: PropPath },

    /// The type needs an instance of its enclosing type to exist
    /// first.
    #[error("cannot instantiate `{type_name}` without its enclosing `{outer}` at {path}")]
    EnclosedType {
        type_name: String,
        outer: String,
        path: PropPath,
    },

    /// The built value is not of the requested Rust type.
    #[error("`{type_name}` is not registered as the requested type")]
    TypeMismatch { type_name: String },
}

impl CreateError {
    pub fn code(&self) -> &'static str {
        match self {
            CreateError::CreatorFailure { .. } => "CREATOR_FAILURE",
            CreateError::AbstractType { .. } => "ABSTRACT_TYPE",
            CreateError::EnclosedType { .. } => "ENCLOSED_TYPE",
            CreateError::TypeMismatch { .. } => "TYPE_MISMATCH",
        }
    }
}

/// Umbrella error of the mapper facade.
#[derive(Debug, Error)]
pub enum MapError {
    #[error(transparent)]
    Definition(#[from] DefinitionError),

    #[error(transparent)]
    Bind(#[from] BindError),

    #[error(transparent)]
    Create(#[from] CreateError),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("type `{0}` is not registered")]
    UnknownType(String),

    #[error("type `{0}` is already registered")]
    DuplicateType(String),
}
