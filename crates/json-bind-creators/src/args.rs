//! Invocation contract between the binder and creator bodies.

use serde_json::Value;
use std::any::Any;
use std::sync::Arc;
use thiserror::Error;

/// Boxed value produced by a creator body.
pub type BoxAny = Box<dyn Any + Send>;

/// Error type creator bodies are allowed to raise.
pub type DynError = Box<dyn std::error::Error + Send + Sync>;

/// Outcome of a creator invocation. `Ok(None)` is a valid null result,
/// not a failure.
pub type CreatorResult = Result<Option<BoxAny>, DynError>;

/// Creator body: receives finalized arguments, builds the value.
pub type CreatorFn = Arc<dyn Fn(&mut Args) -> CreatorResult + Send + Sync>;

/// Argument access failure inside a creator body.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ArgError {
    #[error("argument {0} out of range")]
    OutOfRange(usize),
    #[error("argument {0} is null")]
    Null(usize),
    #[error("argument {index} is not {expected}")]
    Kind { index: usize, expected: &'static str },
    #[error("argument {0} already taken")]
    Taken(usize),
}

/// One finalized argument slot.
pub enum ArgValue {
    /// Explicit or policy-produced null.
    Null,
    /// Plain JSON value, kind-checked against the parameter.
    Json(Value),
    /// Value built by a nested creator; `None` when that creator
    /// returned a null result.
    Built(Option<BoxAny>),
    /// A `Built` slot that was already consumed.
    Taken,
}

impl std::fmt::Debug for ArgValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArgValue::Null => write!(f, "Null"),
            ArgValue::Json(v) => f.debug_tuple("Json").field(v).finish(),
            ArgValue::Built(Some(_)) => write!(f, "Built(Some(..))"),
            ArgValue::Built(None) => write!(f, "Built(None)"),
            ArgValue::Taken => write!(f, "Taken"),
        }
    }
}

/// Positional arguments handed to a creator body.
///
/// Getters follow the slot layout of the owning candidate: index `i`
/// corresponds to declared parameter `i`. Nested values are moved out
/// with [`Args::take_built`]; plain JSON is borrowed.
#[derive(Debug)]
pub struct Args {
    values: Vec<ArgValue>,
}

impl Args {
    pub fn new(values: Vec<ArgValue>) -> Self {
        Args { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn slot(&self, index: usize) -> Result<&ArgValue, ArgError> {
        self.values.get(index).ok_or(ArgError::OutOfRange(index))
    }

    /// True when the slot holds a null (explicit or policy-produced).
    /// Out-of-range indexes read as non-null.
    pub fn is_null(&self, index: usize) -> bool {
        matches!(
            self.values.get(index),
            Some(ArgValue::Null) | Some(ArgValue::Built(None)) | Some(ArgValue::Json(Value::Null))
        )
    }

    pub fn bool_(&self, index: usize) -> Result<bool, ArgError> {
        match self.slot(index)? {
            ArgValue::Json(Value::Bool(b)) => Ok(*b),
            ArgValue::Null => Err(ArgError::Null(index)),
            _ => Err(ArgError::Kind { index, expected: "a bool" }),
        }
    }

    pub fn i64_(&self, index: usize) -> Result<i64, ArgError> {
        match self.slot(index)? {
            ArgValue::Json(Value::Number(n)) => n
                .as_i64()
                .ok_or(ArgError::Kind { index, expected: "an integer" }),
            ArgValue::Null => Err(ArgError::Null(index)),
            _ => Err(ArgError::Kind { index, expected: "an integer" }),
        }
    }

    pub fn f64_(&self, index: usize) -> Result<f64, ArgError> {
        match self.slot(index)? {
            ArgValue::Json(Value::Number(n)) => n
                .as_f64()
                .ok_or(ArgError::Kind { index, expected: "a number" }),
            ArgValue::Null => Err(ArgError::Null(index)),
            _ => Err(ArgError::Kind { index, expected: "a number" }),
        }
    }

    pub fn str_(&self, index: usize) -> Result<&str, ArgError> {
        match self.slot(index)? {
            ArgValue::Json(Value::String(s)) => Ok(s),
            ArgValue::Null => Err(ArgError::Null(index)),
            _ => Err(ArgError::Kind { index, expected: "a string" }),
        }
    }

    /// Like [`Args::str_`] but maps a null slot to `None`.
    pub fn str_opt(&self, index: usize) -> Result<Option<&str>, ArgError> {
        match self.slot(index)? {
            ArgValue::Json(Value::String(s)) => Ok(Some(s)),
            ArgValue::Json(Value::Null) | ArgValue::Null | ArgValue::Built(None) => Ok(None),
            _ => Err(ArgError::Kind { index, expected: "a string" }),
        }
    }

    pub fn array(&self, index: usize) -> Result<&[Value], ArgError> {
        match self.slot(index)? {
            ArgValue::Json(Value::Array(items)) => Ok(items),
            ArgValue::Null => Err(ArgError::Null(index)),
            _ => Err(ArgError::Kind { index, expected: "an array" }),
        }
    }

    /// Raw JSON access; a null slot reads as `Value::Null`.
    pub fn json(&self, index: usize) -> Result<&Value, ArgError> {
        static NULL: Value = Value::Null;
        match self.slot(index)? {
            ArgValue::Json(v) => Ok(v),
            ArgValue::Null | ArgValue::Built(None) => Ok(&NULL),
            _ => Err(ArgError::Kind { index, expected: "a JSON value" }),
        }
    }

    /// Moves a nested-creator result out of the slot. `Ok(None)` when
    /// the nested creator produced a null result.
    pub fn take_built<T: Any>(&mut self, index: usize) -> Result<Option<T>, ArgError> {
        let slot = self
            .values
            .get_mut(index)
            .ok_or(ArgError::OutOfRange(index))?;
        match std::mem::replace(slot, ArgValue::Taken) {
            ArgValue::Built(Some(boxed)) => match boxed.downcast::<T>() {
                Ok(v) => Ok(Some(*v)),
                Err(boxed) => {
                    *slot = ArgValue::Built(Some(boxed));
                    Err(ArgError::Kind { index, expected: "a value of the requested type" })
                }
            },
            ArgValue::Built(None) | ArgValue::Null => Ok(None),
            ArgValue::Taken => Err(ArgError::Taken(index)),
            json @ ArgValue::Json(_) => {
                *slot = json;
                Err(ArgError::Kind { index, expected: "a constructed value" })
            }
        }
    }
}
