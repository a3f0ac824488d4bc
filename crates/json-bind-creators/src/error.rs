//! Definition-phase errors raised while resolving a type's creators.

use thiserror::Error;

/// A structural problem in a type's creator declarations. Raised
/// eagerly, before any document is bound.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DefinitionError {
    /// Two explicitly marked creators landed in the same mode.
    #[error("conflicting {mode} creators for `{type_name}`: {first} vs {second}")]
    ConflictingCreators {
        type_name: String,
        mode: &'static str,
        first: String,
        second: String,
    },

    /// More than one array-delegating creator is active.
    #[error("conflicting array-delegating creators for `{type_name}`: {first} vs {second}")]
    ConflictingArrayDelegates {
        type_name: String,
        first: String,
        second: String,
    },

    /// Implicit candidates tied after every precedence rule.
    #[error("ambiguous creators for `{type_name}`: {}", .candidates.join(", "))]
    AmbiguousCreators {
        type_name: String,
        candidates: Vec<String>,
    },

    /// A properties-mode parameter has no explicit or implicit name.
    #[error("parameter {index} of `{type_name}` creator {signature} has no resolvable name")]
    UnnamedParameter {
        type_name: String,
        signature: String,
        index: usize,
    },

    /// The detector policy demands an explicit mode for this creator.
    #[error("creator {signature} of `{type_name}` requires an explicit mode")]
    ModeRequired {
        type_name: String,
        signature: String,
    },

    /// A parameter declares both a property name and an inject id.
    #[error(
        "parameter {index} of `{type_name}` creator {signature} declares both a property name and an inject id"
    )]
    ConflictingParamSources {
        type_name: String,
        signature: String,
        index: usize,
    },

    /// A delegating creator must have exactly one non-injected
    /// parameter.
    #[error("delegating creator {signature} of `{type_name}` must take exactly one delegated parameter")]
    DelegateArity {
        type_name: String,
        signature: String,
    },

    /// Two parameters of one creator resolved to the same property
    /// name.
    #[error("duplicate creator property `{name}` on `{type_name}` creator {signature}")]
    DuplicateCreatorProperty {
        type_name: String,
        signature: String,
        name: String,
    },

    /// Nothing eligible was found for the type.
    #[error("no eligible creator for `{type_name}`")]
    NoCreator { type_name: String },
}

impl DefinitionError {
    /// Short machine-readable code, stable across message wording.
    pub fn code(&self) -> &'static str {
        match self {
            DefinitionError::ConflictingCreators { .. } => "CONFLICTING_CREATORS",
            DefinitionError::ConflictingArrayDelegates { .. } => "CONFLICTING_ARRAY_DELEGATES",
            DefinitionError::AmbiguousCreators { .. } => "AMBIGUOUS_CREATORS",
            DefinitionError::UnnamedParameter { .. } => "UNNAMED_PARAMETER",
            DefinitionError::ModeRequired { .. } => "MODE_REQUIRED",
            DefinitionError::ConflictingParamSources { .. } => "CONFLICTING_PARAM_SOURCES",
            DefinitionError::DelegateArity { .. } => "DELEGATE_ARITY",
            DefinitionError::DuplicateCreatorProperty { .. } => "DUPLICATE_CREATOR_PROPERTY",
            DefinitionError::NoCreator { .. } => "NO_CREATOR",
        }
    }
}
