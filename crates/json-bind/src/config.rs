//! Mapper configuration: detection policy, naming, strictness flags
//! and injectable values.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use json_bind_creators::{
    CreatorSelector, DetectorPolicy, ImplicitNames, NameTransform, ResolveOptions, Visibility,
};

/// Configuration shared by every type registered on a mapper.
///
/// Resolution-side knobs (policy, naming, selection) are projected
/// into [`ResolveOptions`]; the strictness flags and injectables drive
/// binding and instantiation.
#[derive(Clone)]
pub struct MapperConfig {
    pub policy: DetectorPolicy,
    pub require_annotation: bool,
    pub min_visibility: Visibility,
    pub transform: NameTransform,
    pub implicit_names: Option<Arc<dyn ImplicitNames>>,
    pub selector: Option<Arc<dyn CreatorSelector>>,
    /// Reject object properties no creator parameter binds.
    pub fail_on_unknown: bool,
    /// Treat every absent creator property as an error, not only the
    /// required ones.
    pub fail_on_missing: bool,
    /// Reject explicit nulls for creator properties.
    pub fail_on_null_creator_properties: bool,
    /// Reject nulls flowing into primitive parameters instead of
    /// substituting the kind's zero.
    pub fail_on_null_primitives: bool,
    /// Values for injected parameters, by inject id.
    pub injectables: HashMap<String, Value>,
}

impl Default for MapperConfig {
    fn default() -> Self {
        MapperConfig {
            policy: DetectorPolicy::default(),
            require_annotation: false,
            min_visibility: Visibility::Public,
            transform: NameTransform::Identity,
            implicit_names: None,
            selector: None,
            fail_on_unknown: true,
            fail_on_missing: false,
            fail_on_null_creator_properties: false,
            fail_on_null_primitives: false,
            injectables: HashMap::new(),
        }
    }
}

impl std::fmt::Debug for MapperConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapperConfig")
            .field("policy", &self.policy)
            .field("require_annotation", &self.require_annotation)
            .field("min_visibility", &self.min_visibility)
            .field("transform", &self.transform)
            .field("fail_on_unknown", &self.fail_on_unknown)
            .field("fail_on_missing", &self.fail_on_missing)
            .field(
                "fail_on_null_creator_properties",
                &self.fail_on_null_creator_properties,
            )
            .field("fail_on_null_primitives", &self.fail_on_null_primitives)
            .field("injectables", &self.injectables.len())
            .finish()
    }
}

impl MapperConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(mut self, policy: DetectorPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_require_annotation(mut self, on: bool) -> Self {
        self.require_annotation = on;
        self
    }

    pub fn with_min_visibility(mut self, floor: Visibility) -> Self {
        self.min_visibility = floor;
        self
    }

    pub fn with_transform(mut self, transform: NameTransform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_implicit_names(mut self, provider: Arc<dyn ImplicitNames>) -> Self {
        self.implicit_names = Some(provider);
        self
    }

    pub fn with_selector(mut self, selector: Arc<dyn CreatorSelector>) -> Self {
        self.selector = Some(selector);
        self
    }

    pub fn with_fail_on_unknown(mut self, on: bool) -> Self {
        self.fail_on_unknown = on;
        self
    }

    pub fn with_fail_on_missing(mut self, on: bool) -> Self {
        self.fail_on_missing = on;
        self
    }

    pub fn with_fail_on_null_creator_properties(mut self, on: bool) -> Self {
        self.fail_on_null_creator_properties = on;
        self
    }

    pub fn with_fail_on_null_primitives(mut self, on: bool) -> Self {
        self.fail_on_null_primitives = on;
        self
    }

    pub fn with_injectable(mut self, id: impl Into<String>, value: Value) -> Self {
        self.injectables.insert(id.into(), value);
        self
    }

    /// Resolution-side view of this configuration.
    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            policy: self.policy,
            require_annotation: self.require_annotation,
            min_visibility: self.min_visibility,
            transform: self.transform,
            implicit_names: self.implicit_names.clone(),
            selector: self.selector.clone(),
        }
    }
}
