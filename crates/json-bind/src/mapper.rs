//! The binding facade: a registry plus a configuration, with typed and
//! untyped entry points.

use std::any::TypeId;
use std::sync::Arc;

use serde_json::Value;

use json_bind_creators::{BoxAny, CreatorProperty, ResolvedCreator, TypeDef};

use crate::config::MapperConfig;
use crate::error::{CreateError, MapError};
use crate::instantiate::build_value;
use crate::path::PropPath;
use crate::registry::TypeRegistry;

/// Binds JSON documents to registered types.
///
/// A `Mapper` owns a [`TypeRegistry`] and a [`MapperConfig`]. It is
/// cheap to share behind an `Arc` and safe to use from many threads;
/// all entry points take `&self`.
///
/// ```
/// use json_bind::Mapper;
/// use json_bind_creators::{CreatorCandidate, Param, TypeDef};
/// use serde_json::json;
///
/// #[derive(Debug, PartialEq)]
/// struct Point { x: i64, y: i64 }
///
/// let mapper = Mapper::new();
/// mapper
///     .register(TypeDef::of::<Point>("Point").creator(
///         CreatorCandidate::constructor()
///             .param(Param::i64_().named("x"))
///             .param(Param::i64_().named("y"))
///             .builds(|a| Ok(Some(Point { x: a.i64_(0)?, y: a.i64_(1)? }))),
///     ))
///     .unwrap();
///
/// let point: Option<Point> = mapper.from_value("Point", &json!({"x": 1, "y": 2})).unwrap();
/// assert_eq!(point, Some(Point { x: 1, y: 2 }));
/// ```
#[derive(Debug, Default)]
pub struct Mapper {
    registry: TypeRegistry,
    config: MapperConfig,
}

impl Mapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: MapperConfig) -> Self {
        Mapper {
            registry: TypeRegistry::new(),
            config,
        }
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    /// Registers a type definition. Resolution runs eagerly, so any
    /// definition error surfaces here and the definition is not
    /// retained.
    pub fn register(&self, def: TypeDef) -> Result<(), MapError> {
        self.registry.register(def, &self.config.resolve_options())
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.registry.contains(type_name)
    }

    pub fn type_names(&self) -> Vec<String> {
        self.registry.type_names()
    }

    /// The resolved creators for a registered type. Repeated calls
    /// return the same cached `Arc`.
    pub fn resolved(&self, type_name: &str) -> Result<Arc<ResolvedCreator>, MapError> {
        self.registry
            .resolved(type_name, &self.config.resolve_options())
    }

    /// The creator-backed properties of a type, for layers that merge
    /// creator parameters with other property sources.
    pub fn creator_properties(&self, type_name: &str) -> Result<Vec<CreatorProperty>, MapError> {
        Ok(self.resolved(type_name)?.creator_properties.clone())
    }

    /// Builds an untyped value. `Ok(None)` means the input (or the
    /// creator body) produced a valid null.
    pub fn build(&self, type_name: &str, value: &Value) -> Result<Option<BoxAny>, MapError> {
        build_value(
            &self.registry,
            &self.config,
            type_name,
            value,
            &PropPath::root(),
        )
    }

    /// Builds a typed value. The registered `TypeId` is checked before
    /// any creator runs.
    pub fn from_value<T: 'static>(
        &self,
        type_name: &str,
        value: &Value,
    ) -> Result<Option<T>, MapError> {
        let resolved = self.resolved(type_name)?;
        if resolved.type_id != Some(TypeId::of::<T>()) {
            return Err(CreateError::TypeMismatch {
                type_name: type_name.to_string(),
            }
            .into());
        }
        match self.build(type_name, value)? {
            None => Ok(None),
            Some(boxed) => match boxed.downcast::<T>() {
                Ok(built) => Ok(Some(*built)),
                Err(_) => Err(CreateError::TypeMismatch {
                    type_name: type_name.to_string(),
                }
                .into()),
            },
        }
    }

    /// Parses JSON text and builds a typed value from it.
    pub fn from_json<T: 'static>(&self, type_name: &str, text: &str) -> Result<Option<T>, MapError> {
        let value: Value = serde_json::from_str(text)?;
        self.from_value(type_name, &value)
    }
}
