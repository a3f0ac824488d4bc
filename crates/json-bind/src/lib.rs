//! Creator-based JSON binding.
//!
//! A [`Mapper`] holds registered type definitions and builds values
//! from JSON documents through their resolved creators: an object
//! binds property-by-property into a constructor or factory, a scalar
//! or array flows whole into a delegating creator, and nested types
//! are built recursively with full property paths on every error.
//!
//! Creator resolution itself lives in the `json-bind-creators` crate;
//! this crate adds the runtime: configuration, the concurrent type
//! registry with its compute-once resolution cache, value buffering,
//! binding, and instantiation.

pub mod bind;
pub mod buffer;
pub mod config;
pub mod error;
pub mod instantiate;
pub mod mapper;
pub mod path;
pub mod registry;

pub use bind::bind_object;
pub use buffer::{SlotSet, ValueBuffer};
pub use config::MapperConfig;
pub use error::{BindError, CreateError, MapError};
pub use instantiate::build_value;
pub use mapper::Mapper;
pub use path::{PathStep, PropPath};
pub use registry::TypeRegistry;
