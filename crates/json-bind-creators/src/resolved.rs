//! The resolution pipeline and its product: an immutable
//! [`ResolvedCreator`] describing how to build one type.

use serde_json::Value;
use std::any::TypeId;
use std::collections::HashMap;

use crate::args::CreatorFn;
use crate::candidate::{CandidateKind, ParamKind, TypeDef, TypeShape};
use crate::classify::{classify, Classified, ResolveOptions, ResolvedMode};
use crate::collect::{collect, Collected};
use crate::conflict::{resolve_bucket, summaries};
use crate::error::DefinitionError;
use crate::naming::NameSource;

/// Where one creator parameter's value comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingSource {
    /// Bound from a JSON property of the incoming object.
    Property { name: String, source: NameSource },
    /// Supplied by mapper configuration under the given id.
    Injected { id: String },
    /// Receives the whole incoming value.
    Delegate,
}

/// One parameter of a resolved creator with its single binding source.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamBinding {
    pub index: usize,
    pub kind: ParamKind,
    pub source: BindingSource,
    pub required: bool,
    pub default: Option<Value>,
}

impl ParamBinding {
    pub fn property_name(&self) -> Option<&str> {
        match &self.source {
            BindingSource::Property { name, .. } => Some(name),
            _ => None,
        }
    }
}

/// Active properties-based creator: named slots filled from object
/// properties.
#[derive(Clone)]
pub struct PropertiesCreator {
    pub call: CreatorFn,
    pub signature: String,
    pub bindings: Vec<ParamBinding>,
    /// Property name to parameter index.
    pub by_name: HashMap<String, usize>,
}

impl std::fmt::Debug for PropertiesCreator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertiesCreator")
            .field("signature", &self.signature)
            .field("bindings", &self.bindings)
            .finish()
    }
}

/// Active delegating creator: one parameter receives the whole value,
/// any others are injected.
#[derive(Clone)]
pub struct DelegatingCreator {
    pub call: CreatorFn,
    pub signature: String,
    /// Index of the delegated parameter.
    pub delegate_index: usize,
    /// Declared kind of the delegated parameter.
    pub kind: ParamKind,
    pub bindings: Vec<ParamBinding>,
}

impl std::fmt::Debug for DelegatingCreator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DelegatingCreator")
            .field("signature", &self.signature)
            .field("delegate_index", &self.delegate_index)
            .field("kind", &self.kind)
            .finish()
    }
}

/// Active no-argument creator.
#[derive(Clone)]
pub struct DefaultCreator {
    pub call: CreatorFn,
    pub signature: String,
}

impl std::fmt::Debug for DefaultCreator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultCreator")
            .field("signature", &self.signature)
            .finish()
    }
}

/// A property contributed by the active properties-based creator,
/// exposed for introspection even on types that cannot be
/// instantiated.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatorProperty {
    pub name: String,
    /// Parameter index on the creator.
    pub index: usize,
    pub kind: ParamKind,
    pub required: bool,
}

/// Immutable outcome of creator resolution for one type.
#[derive(Clone)]
pub struct ResolvedCreator {
    pub type_name: String,
    pub shape: TypeShape,
    pub type_id: Option<TypeId>,
    pub enclosing_type: Option<String>,
    pub properties_based: Option<PropertiesCreator>,
    pub delegating: Option<DelegatingCreator>,
    pub array_delegating: Option<DelegatingCreator>,
    pub default_creator: Option<DefaultCreator>,
    /// Properties of the active properties-based creator, in parameter
    /// order.
    pub creator_properties: Vec<CreatorProperty>,
}

impl std::fmt::Debug for ResolvedCreator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedCreator")
            .field("type_name", &self.type_name)
            .field("shape", &self.shape)
            .field("properties_based", &self.properties_based)
            .field("delegating", &self.delegating)
            .field("array_delegating", &self.array_delegating)
            .field("default_creator", &self.default_creator)
            .finish()
    }
}

impl ResolvedCreator {
    pub fn creator_property(&self, name: &str) -> Option<&CreatorProperty> {
        self.creator_properties.iter().find(|p| p.name == name)
    }

    /// Abstract types resolve for introspection but are never
    /// instantiable.
    pub fn instantiable(&self) -> bool {
        self.shape != TypeShape::Abstract
    }
}

fn build_properties(
    def: &TypeDef,
    winner: &Classified<'_>,
) -> Result<PropertiesCreator, DefinitionError> {
    let candidate = winner.candidate;
    let signature = candidate.signature();
    let mut bindings = Vec::with_capacity(candidate.params.len());
    let mut by_name = HashMap::new();
    for (index, param) in candidate.params.iter().enumerate() {
        let source = if let Some(id) = &param.inject {
            BindingSource::Injected { id: id.clone() }
        } else {
            match &winner.names[index] {
                Some(resolved) => {
                    if by_name.insert(resolved.name.clone(), index).is_some() {
                        return Err(DefinitionError::DuplicateCreatorProperty {
                            type_name: def.name.clone(),
                            signature,
                            name: resolved.name.clone(),
                        });
                    }
                    BindingSource::Property {
                        name: resolved.name.clone(),
                        source: resolved.source,
                    }
                }
                None => {
                    return Err(DefinitionError::UnnamedParameter {
                        type_name: def.name.clone(),
                        signature,
                        index,
                    })
                }
            }
        };
        bindings.push(ParamBinding {
            index,
            kind: param.kind.clone(),
            source,
            required: param.required,
            default: param.default.clone(),
        });
    }
    Ok(PropertiesCreator {
        call: candidate.call.clone(),
        signature,
        bindings,
        by_name,
    })
}

fn build_delegating(winner: &Classified<'_>) -> DelegatingCreator {
    let candidate = winner.candidate;
    // classification guarantees exactly one non-injected parameter
    let delegate_index = candidate.sole_json_param().unwrap_or(0);
    let bindings = candidate
        .params
        .iter()
        .enumerate()
        .map(|(index, param)| ParamBinding {
            index,
            kind: param.kind.clone(),
            source: match &param.inject {
                Some(id) => BindingSource::Injected { id: id.clone() },
                None => BindingSource::Delegate,
            },
            required: param.required,
            default: param.default.clone(),
        })
        .collect();
    DelegatingCreator {
        call: candidate.call.clone(),
        signature: candidate.signature(),
        delegate_index,
        kind: candidate.params[delegate_index].kind.clone(),
        bindings,
    }
}

fn build_default(winner: &Collected<'_>) -> DefaultCreator {
    DefaultCreator {
        call: winner.candidate.call.clone(),
        signature: winner.candidate.signature(),
    }
}

/// Picks the active no-argument candidate: explicit beats implicit,
/// constructors beat factories, then visibility, then declaration
/// order. Two explicit defaults conflict.
fn pick_default<'a>(
    type_name: &str,
    defaults: &[Collected<'a>],
) -> Result<Option<Collected<'a>>, DefinitionError> {
    let mut explicit = defaults
        .iter()
        .filter(|d| d.candidate.mode != crate::candidate::DeclaredMode::None);
    if let Some(first) = explicit.next() {
        if let Some(second) = explicit.next() {
            return Err(DefinitionError::ConflictingCreators {
                type_name: type_name.to_string(),
                mode: "default",
                first: first.candidate.signature(),
                second: second.candidate.signature(),
            });
        }
        return Ok(Some(*first));
    }
    let best = defaults.iter().copied().max_by_key(|d| {
        (
            d.candidate.kind == CandidateKind::Constructor,
            d.candidate.visibility,
            std::cmp::Reverse(d.index),
        )
    });
    Ok(best)
}

/// Resolves a type's creators under the given options.
///
/// The pipeline runs collection, classification and conflict
/// resolution, applies the configured selection hook, then freezes the
/// winning candidates into a [`ResolvedCreator`]. Every definition
/// error a document could ever trip over surfaces here.
pub fn resolve(def: &TypeDef, opts: &ResolveOptions) -> Result<ResolvedCreator, DefinitionError> {
    let collected = collect(def, opts);
    let classification = classify(def, &collected, opts)?;

    let mut properties = resolve_bucket(
        &def.name,
        ResolvedMode::Properties,
        &classification.properties,
    )?;
    let mut delegating = resolve_bucket(
        &def.name,
        ResolvedMode::Delegating,
        &classification.delegating,
    )?;
    let mut array_delegating = resolve_bucket(
        &def.name,
        ResolvedMode::ArrayDelegating,
        &classification.array_delegating,
    )?;
    let mut default = pick_default(&def.name, &classification.defaults)?;

    if let Some(selector) = &opts.selector {
        let all = summaries(&classification);
        if let Some(forced) = selector.select(&def.name, &all) {
            if let Some(c) = classification.properties.iter().find(|c| c.index == forced) {
                properties = Some(c.clone());
            } else if let Some(c) = classification.delegating.iter().find(|c| c.index == forced) {
                delegating = Some(c.clone());
            } else if let Some(c) = classification
                .array_delegating
                .iter()
                .find(|c| c.index == forced)
            {
                array_delegating = Some(c.clone());
            } else if let Some(d) = classification.defaults.iter().find(|d| d.index == forced) {
                // preferring the default creator also suppresses the
                // properties slot it would otherwise lose to
                default = Some(*d);
                properties = None;
            } else {
                tracing::debug!(
                    type_name = %def.name,
                    forced,
                    "selector chose an index with no classified candidate; ignoring"
                );
            }
        }
    }

    let properties_based = properties
        .as_ref()
        .map(|c| build_properties(def, c))
        .transpose()?;
    let delegating = delegating.as_ref().map(build_delegating);
    let array_delegating = array_delegating.as_ref().map(build_delegating);
    let default_creator = default.as_ref().map(build_default);

    if properties_based.is_none()
        && delegating.is_none()
        && array_delegating.is_none()
        && default_creator.is_none()
    {
        return Err(DefinitionError::NoCreator {
            type_name: def.name.clone(),
        });
    }

    let creator_properties = properties_based
        .as_ref()
        .map(|p| {
            p.bindings
                .iter()
                .filter_map(|b| {
                    b.property_name().map(|name| CreatorProperty {
                        name: name.to_string(),
                        index: b.index,
                        kind: b.kind.clone(),
                        required: b.required,
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    tracing::debug!(
        type_name = %def.name,
        properties = properties_based.as_ref().map(|p| p.signature.as_str()),
        delegating = delegating.as_ref().map(|d| d.signature.as_str()),
        array_delegating = array_delegating.as_ref().map(|d| d.signature.as_str()),
        default = default_creator.as_ref().map(|d| d.signature.as_str()),
        "resolved creators"
    );

    Ok(ResolvedCreator {
        type_name: def.name.clone(),
        shape: def.shape,
        type_id: def.type_id,
        enclosing_type: def.enclosing_type.clone(),
        properties_based,
        delegating,
        array_delegating,
        default_creator,
        creator_properties,
    })
}
