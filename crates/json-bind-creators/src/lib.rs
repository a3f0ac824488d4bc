//! Creator resolution for json-bind.
//!
//! Given a [`TypeDef`] describing a type's constructors and factories,
//! [`resolve`] decides which of them are active, in which mode
//! (properties-based, delegating, array-delegating or default), and
//! how each parameter binds. The outcome is an immutable
//! [`ResolvedCreator`] the `json-bind` runtime instantiates from.

pub mod args;
pub mod candidate;
pub mod classify;
pub mod collect;
pub mod conflict;
pub mod error;
pub mod naming;
pub mod resolved;

pub use args::{ArgError, ArgValue, Args, BoxAny, CreatorFn, CreatorResult, DynError};
pub use candidate::{
    CandidateBuilder, CandidateKind, CreatorCandidate, DeclaredMode, Param, ParamKind, TypeDef,
    TypeShape, Visibility,
};
pub use classify::{DetectorPolicy, ResolveOptions, ResolvedMode};
pub use collect::collect;
pub use conflict::{CandidateSummary, CreatorSelector};
pub use error::DefinitionError;
pub use naming::{ImplicitNames, NameSource, NameTransform, ResolvedName};
pub use resolved::{
    resolve, BindingSource, CreatorProperty, DefaultCreator, DelegatingCreator, ParamBinding,
    PropertiesCreator, ResolvedCreator,
};
