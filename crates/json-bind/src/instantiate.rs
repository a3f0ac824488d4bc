//! Instantiation: dispatching an input value to a resolved creator,
//! finalizing arguments, and running the creator body.

use serde_json::Value;

use json_bind_creators::{
    ArgValue, Args, BindingSource, BoxAny, CreatorFn, DelegatingCreator, ParamBinding, ParamKind,
    PropertiesCreator, ResolvedCreator, TypeShape,
};

use crate::bind::{bind_object, json_kind};
use crate::buffer::ValueBuffer;
use crate::config::MapperConfig;
use crate::error::{BindError, CreateError, MapError};
use crate::path::PropPath;
use crate::registry::TypeRegistry;

/// Builds a value of the named registered type from `value`.
///
/// Dispatch follows the input shape: objects prefer the
/// properties-based creator, then a delegating creator that accepts
/// objects, then the default creator; arrays prefer the
/// array-delegating slot; scalars go to the delegating slot. A null
/// input is a valid `None` result, never an error, and so is a creator
/// body returning `Ok(None)`.
pub fn build_value(
    registry: &TypeRegistry,
    config: &MapperConfig,
    type_name: &str,
    value: &Value,
    path: &PropPath,
) -> Result<Option<BoxAny>, MapError> {
    if value.is_null() {
        return Ok(None);
    }
    let resolved = registry.resolved(type_name, &config.resolve_options())?;
    tracing::trace!(type_name, shape = json_kind(value), path = %path, "building value");

    if !resolved.instantiable() {
        return Err(CreateError::AbstractType {
            type_name: type_name.to_string(),
            path: path.clone(),
        }
        .into());
    }
    if let Some(outer) = &resolved.enclosing_type {
        return Err(CreateError::EnclosedType {
            type_name: type_name.to_string(),
            outer: outer.clone(),
            path: path.clone(),
        }
        .into());
    }

    match value {
        Value::Object(object) => {
            if let Some(creator) = &resolved.properties_based {
                // enum creators skip unknown siblings even under the
                // strict unknown-property policy
                let strict = config.fail_on_unknown && resolved.shape != TypeShape::Enum;
                let buffer = bind_object(type_name, creator, object, strict, path)?;
                let args = finalize_properties(registry, config, &resolved, creator, buffer, path)?;
                return invoke(&creator.call, &creator.signature, type_name, path, args);
            }
            if let Some(creator) = delegating_for(&resolved, value) {
                let args = finalize_delegating(registry, config, &resolved, creator, value, path)?;
                return invoke(&creator.call, &creator.signature, type_name, path, args);
            }
            if let Some(creator) = &resolved.default_creator {
                if config.fail_on_unknown {
                    if let Some(key) = object.keys().next() {
                        return Err(BindError::UnknownProperty {
                            type_name: type_name.to_string(),
                            name: key.clone(),
                            path: path.key(key),
                        }
                        .into());
                    }
                }
                return invoke(&creator.call, &creator.signature, type_name, path, Args::new(vec![]));
            }
            Err(no_match(type_name, value, path))
        }
        Value::Array(_) => {
            if let Some(creator) = &resolved.array_delegating {
                let args = finalize_delegating(registry, config, &resolved, creator, value, path)?;
                return invoke(&creator.call, &creator.signature, type_name, path, args);
            }
            if let Some(creator) = delegating_for(&resolved, value) {
                let args = finalize_delegating(registry, config, &resolved, creator, value, path)?;
                return invoke(&creator.call, &creator.signature, type_name, path, args);
            }
            Err(no_match(type_name, value, path))
        }
        _ => {
            if let Some(creator) = delegating_for(&resolved, value) {
                let args = finalize_delegating(registry, config, &resolved, creator, value, path)?;
                return invoke(&creator.call, &creator.signature, type_name, path, args);
            }
            Err(no_match(type_name, value, path))
        }
    }
}

fn no_match(type_name: &str, value: &Value, path: &PropPath) -> MapError {
    BindError::NoMatchingCreator {
        type_name: type_name.to_string(),
        shape: json_kind(value),
        path: path.clone(),
    }
    .into()
}

/// The scalar delegating slot, when its parameter kind accepts the
/// value.
fn delegating_for<'a>(resolved: &'a ResolvedCreator, value: &Value) -> Option<&'a DelegatingCreator> {
    resolved
        .delegating
        .as_ref()
        .filter(|creator| creator.kind.accepts(value))
}

fn inject_slot(
    config: &MapperConfig,
    type_name: &str,
    id: &str,
    path: &PropPath,
) -> Result<ArgValue, BindError> {
    match config.injectables.get(id) {
        Some(v) if v.is_null() => Ok(ArgValue::Null),
        Some(v) => Ok(ArgValue::Json(v.clone())),
        None => Err(BindError::MissingInjectable {
            type_name: type_name.to_string(),
            id: id.to_string(),
            path: path.clone(),
        }),
    }
}

/// Produces the slot for a property binding whose document value is
/// present and non-null. `Ref` parameters recurse into a nested build.
fn present_slot(
    registry: &TypeRegistry,
    config: &MapperConfig,
    type_name: &str,
    binding: &ParamBinding,
    value: Value,
    at: &PropPath,
) -> Result<ArgValue, MapError> {
    match &binding.kind {
        ParamKind::Ref(target) => {
            let built = build_value(registry, config, target, &value, at).map_err(|e| {
                rewrap_unknown(e, type_name, target, at)
            })?;
            Ok(ArgValue::Built(built))
        }
        _ => Ok(ArgValue::Json(value)),
    }
}

/// An unknown type surfacing from a nested build means the reference
/// itself is broken; report it against the referring type.
fn rewrap_unknown(e: MapError, referrer: &str, target: &str, at: &PropPath) -> MapError {
    match e {
        MapError::UnknownType(_) => BindError::UnknownRef {
            type_name: referrer.to_string(),
            target: target.to_string(),
            path: at.clone(),
        }
        .into(),
        other => other,
    }
}

/// Null handling for one property slot, shared by explicit nulls and
/// absent-with-no-default parameters.
fn null_slot(
    config: &MapperConfig,
    type_name: &str,
    binding: &ParamBinding,
    name: &str,
    explicit: bool,
    at: &PropPath,
) -> Result<ArgValue, BindError> {
    if explicit && config.fail_on_null_creator_properties {
        return Err(BindError::NullProperty {
            type_name: type_name.to_string(),
            name: name.to_string(),
            path: at.clone(),
        });
    }
    if binding.kind.is_primitive() {
        if config.fail_on_null_primitives {
            return Err(BindError::NullPrimitive {
                type_name: type_name.to_string(),
                name: name.to_string(),
                path: at.clone(),
            });
        }
        return Ok(ArgValue::Json(binding.kind.zero()));
    }
    Ok(ArgValue::Null)
}

/// Finalizes a properties-based invocation: injected values first,
/// then required and missing checks, then declared defaults, then the
/// kind's zero value or null.
fn finalize_properties(
    registry: &TypeRegistry,
    config: &MapperConfig,
    resolved: &ResolvedCreator,
    creator: &PropertiesCreator,
    mut buffer: ValueBuffer,
    path: &PropPath,
) -> Result<Args, MapError> {
    let type_name = &resolved.type_name;
    let mut slots = Vec::with_capacity(creator.bindings.len());
    for binding in &creator.bindings {
        let slot = match &binding.source {
            BindingSource::Injected { id } => inject_slot(config, type_name, id, path)?,
            BindingSource::Delegate => ArgValue::Null,
            BindingSource::Property { name, .. } => {
                let at = path.key(name);
                if buffer.is_set(binding.index) {
                    match buffer.take(binding.index) {
                        Some(ArgValue::Json(Value::Null)) | None => {
                            null_slot(config, type_name, binding, name, true, &at)?
                        }
                        Some(ArgValue::Json(value)) => {
                            present_slot(registry, config, type_name, binding, value, &at)?
                        }
                        Some(other) => other,
                    }
                } else if binding.required || config.fail_on_missing {
                    return Err(BindError::MissingProperty {
                        type_name: type_name.clone(),
                        name: name.clone(),
                        index: binding.index,
                        path: at,
                    }
                    .into());
                } else if let Some(default) = &binding.default {
                    if default.is_null() {
                        null_slot(config, type_name, binding, name, false, &at)?
                    } else {
                        present_slot(registry, config, type_name, binding, default.clone(), &at)?
                    }
                } else {
                    null_slot(config, type_name, binding, name, false, &at)?
                }
            }
        };
        slots.push(slot);
    }
    Ok(Args::new(slots))
}

/// Finalizes a delegating invocation: the delegate parameter receives
/// the whole value, the rest are injected.
fn finalize_delegating(
    registry: &TypeRegistry,
    config: &MapperConfig,
    resolved: &ResolvedCreator,
    creator: &DelegatingCreator,
    value: &Value,
    path: &PropPath,
) -> Result<Args, MapError> {
    let type_name = &resolved.type_name;
    let mut slots = Vec::with_capacity(creator.bindings.len());
    for binding in &creator.bindings {
        let slot = match &binding.source {
            BindingSource::Injected { id } => inject_slot(config, type_name, id, path)?,
            BindingSource::Delegate => {
                present_slot(registry, config, type_name, binding, value.clone(), path)?
            }
            BindingSource::Property { .. } => ArgValue::Null,
        };
        slots.push(slot);
    }
    Ok(Args::new(slots))
}

/// Runs the creator body and wraps any failure with its location.
/// `Ok(None)` from the body is a valid null result.
fn invoke(
    call: &CreatorFn,
    signature: &str,
    type_name: &str,
    path: &PropPath,
    mut args: Args,
) -> Result<Option<BoxAny>, MapError> {
    call(&mut args).map_err(|source| {
        CreateError::CreatorFailure {
            type_name: type_name.to_string(),
            signature: signature.to_string(),
            path: path.clone(),
            source,
        }
        .into()
    })
}
