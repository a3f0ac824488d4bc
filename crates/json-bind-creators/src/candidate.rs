//! Descriptor model: registered types, their creator candidates and
//! declared parameters.

use serde_json::Value;
use std::any::TypeId;

use crate::args::{Args, BoxAny, CreatorFn, DynError};

/// How a candidate is invoked on the target type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateKind {
    Constructor,
    Factory,
}

impl CandidateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CandidateKind::Constructor => "constructor",
            CandidateKind::Factory => "factory",
        }
    }
}

/// Declared visibility of a candidate, ordered from least to most
/// visible. Auto-detection compares against a configured floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Visibility {
    Private,
    Crate,
    Public,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Private => "private",
            Visibility::Crate => "crate",
            Visibility::Public => "public",
        }
    }
}

/// Creator marking declared on a candidate.
///
/// `None` means unmarked: the candidate is only considered by
/// auto-detection. `Auto` marks a creator without fixing its mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeclaredMode {
    #[default]
    None,
    Auto,
    Delegating,
    Properties,
    Disabled,
}

impl DeclaredMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclaredMode::None => "none",
            DeclaredMode::Auto => "auto",
            DeclaredMode::Delegating => "delegating",
            DeclaredMode::Properties => "properties",
            DeclaredMode::Disabled => "disabled",
        }
    }
}

/// Declared value kind of a creator parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamKind {
    Bool,
    I64,
    F64,
    Str,
    Array,
    /// Any JSON value, passed through untyped.
    Json,
    /// Value of another registered type, built recursively.
    Ref(String),
}

impl ParamKind {
    /// Primitive kinds acquire a zero default instead of null when a
    /// value is missing under lenient settings.
    pub fn is_primitive(&self) -> bool {
        matches!(self, ParamKind::Bool | ParamKind::I64 | ParamKind::F64)
    }

    /// Kind-specific zero value used for absent primitives.
    pub fn zero(&self) -> Value {
        match self {
            ParamKind::Bool => Value::Bool(false),
            ParamKind::I64 => Value::from(0i64),
            ParamKind::F64 => Value::from(0.0f64),
            _ => Value::Null,
        }
    }

    /// Shallow shape check for a non-null JSON value.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            ParamKind::Bool => value.is_boolean(),
            // numbers only representable as u64 are a mismatch
            ParamKind::I64 => value.is_i64(),
            ParamKind::F64 => value.is_number(),
            ParamKind::Str => value.is_string(),
            ParamKind::Array => value.is_array(),
            ParamKind::Json => true,
            // checked by the nested build
            ParamKind::Ref(_) => true,
        }
    }
}

impl std::fmt::Display for ParamKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamKind::Bool => write!(f, "bool"),
            ParamKind::I64 => write!(f, "i64"),
            ParamKind::F64 => write!(f, "f64"),
            ParamKind::Str => write!(f, "str"),
            ParamKind::Array => write!(f, "array"),
            ParamKind::Json => write!(f, "json"),
            ParamKind::Ref(name) => write!(f, "ref({})", name),
        }
    }
}

/// One declared creator parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub kind: ParamKind,
    /// Property name declared directly on the parameter.
    pub explicit: Option<String>,
    /// Name recorded from the declaration site (field or argument
    /// identifier), subject to the configured name transform.
    pub implicit: Option<String>,
    /// Injection id; the value comes from mapper configuration, never
    /// from the document.
    pub inject: Option<String>,
    pub required: bool,
    pub default: Option<Value>,
}

#[allow(non_snake_case)]
impl Param {
    pub fn new(kind: ParamKind) -> Self {
        Param {
            kind,
            explicit: None,
            implicit: None,
            inject: None,
            required: false,
            default: None,
        }
    }

    // ------------------------------------------------------------------
    // Shorthand constructors

    pub fn bool_() -> Self {
        Param::new(ParamKind::Bool)
    }

    pub fn i64_() -> Self {
        Param::new(ParamKind::I64)
    }

    pub fn f64_() -> Self {
        Param::new(ParamKind::F64)
    }

    pub fn str_() -> Self {
        Param::new(ParamKind::Str)
    }

    pub fn array() -> Self {
        Param::new(ParamKind::Array)
    }

    pub fn json() -> Self {
        Param::new(ParamKind::Json)
    }

    pub fn Ref(name: impl Into<String>) -> Self {
        Param::new(ParamKind::Ref(name.into()))
    }

    // ------------------------------------------------------------------
    // Declaration setters

    /// Explicit property name, bound verbatim.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.explicit = Some(name.into());
        self
    }

    /// Implicit name as recorded at the declaration site.
    pub fn implicit(mut self, name: impl Into<String>) -> Self {
        self.implicit = Some(name.into());
        self
    }

    pub fn inject(mut self, id: impl Into<String>) -> Self {
        self.inject = Some(id.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    /// Display name for diagnostics.
    pub fn label(&self) -> &str {
        self.explicit
            .as_deref()
            .or(self.implicit.as_deref())
            .unwrap_or("_")
    }
}

/// A constructor or factory declared on a registered type, together
/// with the closure that runs it.
#[derive(Clone)]
pub struct CreatorCandidate {
    pub kind: CandidateKind,
    /// Factory method name; `None` for constructors.
    pub factory_name: Option<String>,
    pub mode: DeclaredMode,
    pub visibility: Visibility,
    pub params: Vec<Param>,
    pub call: CreatorFn,
}

impl std::fmt::Debug for CreatorCandidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreatorCandidate")
            .field("kind", &self.kind)
            .field("factory_name", &self.factory_name)
            .field("mode", &self.mode)
            .field("visibility", &self.visibility)
            .field("params", &self.params)
            .finish()
    }
}

impl CreatorCandidate {
    pub fn constructor() -> CandidateBuilder {
        CandidateBuilder {
            kind: CandidateKind::Constructor,
            factory_name: None,
            mode: DeclaredMode::None,
            visibility: Visibility::Public,
            params: vec![],
        }
    }

    pub fn factory(name: impl Into<String>) -> CandidateBuilder {
        CandidateBuilder {
            kind: CandidateKind::Factory,
            factory_name: Some(name.into()),
            mode: DeclaredMode::None,
            visibility: Visibility::Public,
            params: vec![],
        }
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Parameters bound from the document (everything not injected).
    pub fn json_arity(&self) -> usize {
        self.params.iter().filter(|p| p.inject.is_none()).count()
    }

    /// Index of the single non-injected parameter, when there is
    /// exactly one.
    pub fn sole_json_param(&self) -> Option<usize> {
        let mut found = None;
        for (i, p) in self.params.iter().enumerate() {
            if p.inject.is_none() {
                if found.is_some() {
                    return None;
                }
                found = Some(i);
            }
        }
        found
    }

    /// Human-readable signature used in diagnostics, e.g.
    /// `new(x: i64, y: i64)` or `of(name: str)`.
    pub fn signature(&self) -> String {
        let head = match (&self.kind, self.factory_name.as_deref()) {
            (CandidateKind::Constructor, _) => "new",
            (CandidateKind::Factory, Some(name)) => name,
            (CandidateKind::Factory, None) => "factory",
        };
        let params: Vec<String> = self
            .params
            .iter()
            .map(|p| format!("{}: {}", p.label(), p.kind))
            .collect();
        format!("{}({})", head, params.join(", "))
    }
}

/// Builder for [`CreatorCandidate`]; the `builds*` terminal attaches
/// the body and produces the candidate.
#[derive(Debug, Clone)]
pub struct CandidateBuilder {
    kind: CandidateKind,
    factory_name: Option<String>,
    mode: DeclaredMode,
    visibility: Visibility,
    params: Vec<Param>,
}

impl CandidateBuilder {
    pub fn mode(mut self, mode: DeclaredMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    pub fn params(mut self, params: Vec<Param>) -> Self {
        self.params.extend(params);
        self
    }

    /// Attaches a typed body. The closure's `Ok(None)` is a valid null
    /// result.
    pub fn builds<T, F>(self, f: F) -> CreatorCandidate
    where
        T: Send + 'static,
        F: Fn(&mut Args) -> Result<Option<T>, DynError> + Send + Sync + 'static,
    {
        self.builds_raw(move |args| Ok(f(args)?.map(|v| Box::new(v) as BoxAny)))
    }

    /// Attaches an untyped body.
    pub fn builds_raw<F>(self, f: F) -> CreatorCandidate
    where
        F: Fn(&mut Args) -> Result<Option<BoxAny>, DynError> + Send + Sync + 'static,
    {
        CreatorCandidate {
            kind: self.kind,
            factory_name: self.factory_name,
            mode: self.mode,
            visibility: self.visibility,
            params: self.params,
            call: std::sync::Arc::new(f),
        }
    }
}

/// Shape of a registered type; drives auto-detection carve-outs and
/// instantiability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeShape {
    Concrete,
    /// Resolvable for property collection, never instantiable.
    Abstract,
    Enum,
}

impl TypeShape {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeShape::Concrete => "concrete",
            TypeShape::Abstract => "abstract",
            TypeShape::Enum => "enum",
        }
    }
}

/// A registered type: name, shape, markers and its creator candidates.
#[derive(Clone)]
pub struct TypeDef {
    pub name: String,
    pub shape: TypeShape,
    /// Rust type produced by this def's creators; absent for abstract
    /// types.
    pub type_id: Option<TypeId>,
    /// The type serializes through a single value accessor; implicit
    /// single-argument candidates flip to delegating.
    pub has_value_accessor: bool,
    /// Set when the type cannot be built without an instance of the
    /// named enclosing type.
    pub enclosing_type: Option<String>,
    pub candidates: Vec<CreatorCandidate>,
}

impl std::fmt::Debug for TypeDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeDef")
            .field("name", &self.name)
            .field("shape", &self.shape)
            .field("has_value_accessor", &self.has_value_accessor)
            .field("enclosing_type", &self.enclosing_type)
            .field("candidates", &self.candidates)
            .finish()
    }
}

impl TypeDef {
    pub fn of<T: 'static>(name: impl Into<String>) -> Self {
        TypeDef {
            name: name.into(),
            shape: TypeShape::Concrete,
            type_id: Some(TypeId::of::<T>()),
            has_value_accessor: false,
            enclosing_type: None,
            candidates: vec![],
        }
    }

    pub fn enum_of<T: 'static>(name: impl Into<String>) -> Self {
        TypeDef {
            shape: TypeShape::Enum,
            ..TypeDef::of::<T>(name)
        }
    }

    pub fn abstract_type(name: impl Into<String>) -> Self {
        TypeDef {
            name: name.into(),
            shape: TypeShape::Abstract,
            type_id: None,
            has_value_accessor: false,
            enclosing_type: None,
            candidates: vec![],
        }
    }

    pub fn with_value_accessor(mut self) -> Self {
        self.has_value_accessor = true;
        self
    }

    pub fn enclosed_in(mut self, outer: impl Into<String>) -> Self {
        self.enclosing_type = Some(outer.into());
        self
    }

    pub fn creator(mut self, candidate: CreatorCandidate) -> Self {
        self.candidates.push(candidate);
        self
    }
}
