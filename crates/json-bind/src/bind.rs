//! Object binding: one pass over the incoming object, in document
//! order, landing values in the creator's buffer.

use serde_json::{Map, Value};

use json_bind_creators::{ArgValue, PropertiesCreator};

use crate::buffer::ValueBuffer;
use crate::error::BindError;
use crate::path::PropPath;

/// Shape name of a JSON value for diagnostics.
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Scans `object` against a properties-based creator.
///
/// Properties land positionally in a [`ValueBuffer`] as encountered;
/// a property seen twice keeps the later value. Explicit nulls are
/// stored and count as present. When `fail_on_unknown` is off the
/// unrecognized properties are skipped; enum types always skip them.
/// Non-null values are shape-checked against the parameter kind;
/// nested `Ref` values are validated later by the nested build.
pub fn bind_object(
    type_name: &str,
    creator: &PropertiesCreator,
    object: &Map<String, Value>,
    fail_on_unknown: bool,
    path: &PropPath,
) -> Result<ValueBuffer, BindError> {
    let mut buffer = ValueBuffer::new(creator.bindings.len());
    for (key, value) in object {
        let Some(&index) = creator.by_name.get(key) else {
            if fail_on_unknown {
                return Err(BindError::UnknownProperty {
                    type_name: type_name.to_string(),
                    name: key.clone(),
                    path: path.key(key),
                });
            }
            tracing::trace!(type_name, property = %key, "ignoring unknown property");
            continue;
        };
        let binding = &creator.bindings[index];
        if !value.is_null() && !binding.kind.accepts(value) {
            return Err(BindError::KindMismatch {
                type_name: type_name.to_string(),
                expected: binding.kind.to_string(),
                got: json_kind(value),
                path: path.key(key),
            });
        }
        buffer.put(index, ArgValue::Json(value.clone()));
    }
    Ok(buffer)
}
