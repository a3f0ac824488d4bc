//! Creator mode classification: properties-based vs delegating, per
//! candidate, under the active detector policy.

use std::sync::Arc;

use crate::candidate::{CreatorCandidate, DeclaredMode, ParamKind, TypeDef, Visibility};
use crate::collect::Collected;
use crate::conflict::CreatorSelector;
use crate::error::DefinitionError;
use crate::naming::{resolve_param_name, ImplicitNames, NameSource, NameTransform, ResolvedName};

/// Policy for single-argument candidates whose mode is not declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetectorPolicy {
    /// Legacy heuristics: delegating unless the parameter carries a
    /// resolvable name and the candidate is explicitly marked.
    #[default]
    Heuristic,
    /// Route unmarked single-argument candidates to properties mode.
    UseProperties,
    /// Route unmarked single-argument candidates to delegating mode.
    UseDelegating,
    /// Single-argument candidates must declare their mode; marked ones
    /// without a mode fail, unmarked ones are not auto-detected.
    ExplicitOnly,
}

impl DetectorPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectorPolicy::Heuristic => "heuristic",
            DetectorPolicy::UseProperties => "use-properties",
            DetectorPolicy::UseDelegating => "use-delegating",
            DetectorPolicy::ExplicitOnly => "explicit-only",
        }
    }
}

/// Knobs consulted while resolving a type's creators.
#[derive(Clone)]
pub struct ResolveOptions {
    pub policy: DetectorPolicy,
    /// Only explicitly marked candidates participate.
    pub require_annotation: bool,
    /// Visibility floor for auto-detected candidates.
    pub min_visibility: Visibility,
    /// Applied to implicit names at resolution time.
    pub transform: NameTransform,
    pub implicit_names: Option<Arc<dyn ImplicitNames>>,
    pub selector: Option<Arc<dyn CreatorSelector>>,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        ResolveOptions {
            policy: DetectorPolicy::default(),
            require_annotation: false,
            min_visibility: Visibility::Public,
            transform: NameTransform::Identity,
            implicit_names: None,
            selector: None,
        }
    }
}

impl std::fmt::Debug for ResolveOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolveOptions")
            .field("policy", &self.policy)
            .field("require_annotation", &self.require_annotation)
            .field("min_visibility", &self.min_visibility)
            .field("transform", &self.transform)
            .field("has_implicit_names", &self.implicit_names.is_some())
            .field("has_selector", &self.selector.is_some())
            .finish()
    }
}

/// Mode a candidate ended up in after classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedMode {
    Properties,
    Delegating,
    ArrayDelegating,
}

impl ResolvedMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolvedMode::Properties => "properties",
            ResolvedMode::Delegating => "delegating",
            ResolvedMode::ArrayDelegating => "array-delegating",
        }
    }
}

/// A candidate with its classified mode and resolved parameter names.
#[derive(Debug, Clone)]
pub struct Classified<'a> {
    pub index: usize,
    pub candidate: &'a CreatorCandidate,
    pub mode: ResolvedMode,
    /// The candidate carries a creator marking (any declared mode).
    pub explicit: bool,
    /// Per-parameter resolved names; `None` for injected parameters
    /// and for parameters that resolved nothing.
    pub names: Vec<Option<ResolvedName>>,
}

impl Classified<'_> {
    /// Every non-injected parameter has a resolved name.
    pub fn all_named(&self) -> bool {
        self.candidate
            .params
            .iter()
            .zip(&self.names)
            .all(|(p, n)| p.inject.is_some() || n.is_some())
    }
}

/// Per-type classification outcome: mode buckets plus no-argument
/// candidates.
#[derive(Debug, Default)]
pub struct Classification<'a> {
    pub properties: Vec<Classified<'a>>,
    pub delegating: Vec<Classified<'a>>,
    pub array_delegating: Vec<Classified<'a>>,
    pub defaults: Vec<Collected<'a>>,
}

fn param_names<'a>(
    def: &TypeDef,
    candidate: &'a CreatorCandidate,
    opts: &ResolveOptions,
) -> Vec<Option<ResolvedName>> {
    let provider = opts.implicit_names.as_deref();
    (0..candidate.params.len())
        .map(|i| {
            if candidate.params[i].inject.is_some() {
                None
            } else {
                resolve_param_name(&def.name, candidate, i, opts.transform, provider)
            }
        })
        .collect()
}

/// Classifies collected candidates into mode buckets.
///
/// Mode errors (a marked creator the policy cannot place, a delegating
/// creator with the wrong shape, a parameter declaring two sources)
/// surface here; same-mode conflicts are the concern of
/// [`crate::conflict`].
pub fn classify<'a>(
    def: &'a TypeDef,
    collected: &[Collected<'a>],
    opts: &ResolveOptions,
) -> Result<Classification<'a>, DefinitionError> {
    let mut out = Classification::default();
    for &entry in collected {
        let candidate = entry.candidate;
        for (i, p) in candidate.params.iter().enumerate() {
            if p.explicit.is_some() && p.inject.is_some() {
                return Err(DefinitionError::ConflictingParamSources {
                    type_name: def.name.clone(),
                    signature: candidate.signature(),
                    index: i,
                });
            }
        }

        if candidate.arity() == 0 {
            if candidate.mode == DeclaredMode::Delegating {
                return Err(DefinitionError::DelegateArity {
                    type_name: def.name.clone(),
                    signature: candidate.signature(),
                });
            }
            out.defaults.push(entry);
            continue;
        }

        let explicit = candidate.mode != DeclaredMode::None;
        let names = param_names(def, candidate, opts);
        let mode = match candidate.json_arity() {
            0 => {
                // all parameters injected: nothing delegates, the
                // document contributes no properties
                match candidate.mode {
                    DeclaredMode::Delegating => {
                        return Err(DefinitionError::DelegateArity {
                            type_name: def.name.clone(),
                            signature: candidate.signature(),
                        })
                    }
                    _ => Some(ResolvedMode::Properties),
                }
            }
            1 => classify_single(def, candidate, &names, opts)?,
            _ => classify_multi(def, candidate, &names, opts)?,
        };
        let Some(mut mode) = mode else { continue };

        if mode == ResolvedMode::Delegating {
            let delegate = candidate
                .sole_json_param()
                .map(|i| &candidate.params[i].kind);
            if delegate == Some(&ParamKind::Array) {
                mode = ResolvedMode::ArrayDelegating;
            }
        }
        tracing::trace!(
            type_name = %def.name,
            signature = %candidate.signature(),
            mode = mode.as_str(),
            explicit,
            "classified creator candidate"
        );
        let classified = Classified { index: entry.index, candidate, mode, explicit, names };
        match mode {
            ResolvedMode::Properties => out.properties.push(classified),
            ResolvedMode::Delegating => out.delegating.push(classified),
            ResolvedMode::ArrayDelegating => out.array_delegating.push(classified),
        }
    }
    Ok(out)
}

/// Single non-injected parameter: the policy decides.
fn classify_single(
    def: &TypeDef,
    candidate: &CreatorCandidate,
    names: &[Option<ResolvedName>],
    opts: &ResolveOptions,
) -> Result<Option<ResolvedMode>, DefinitionError> {
    let sole = candidate
        .sole_json_param()
        .and_then(|i| names[i].as_ref());
    let named = sole.is_some();
    let name_is_explicit = sole.is_some_and(|n| n.source == NameSource::Explicit);

    let mode = match (candidate.mode, opts.policy) {
        (DeclaredMode::Properties, _) => ResolvedMode::Properties,
        (DeclaredMode::Delegating, _) => ResolvedMode::Delegating,
        (DeclaredMode::Auto, DetectorPolicy::ExplicitOnly) => {
            return Err(DefinitionError::ModeRequired {
                type_name: def.name.clone(),
                signature: candidate.signature(),
            })
        }
        (DeclaredMode::Auto, DetectorPolicy::UseProperties) => ResolvedMode::Properties,
        (DeclaredMode::Auto, DetectorPolicy::UseDelegating) => ResolvedMode::Delegating,
        (DeclaredMode::Auto, DetectorPolicy::Heuristic) => {
            if named {
                ResolvedMode::Properties
            } else {
                ResolvedMode::Delegating
            }
        }
        (DeclaredMode::None, DetectorPolicy::ExplicitOnly) => return Ok(None),
        (DeclaredMode::None, DetectorPolicy::UseProperties) => ResolvedMode::Properties,
        (DeclaredMode::None, DetectorPolicy::UseDelegating) => ResolvedMode::Delegating,
        (DeclaredMode::None, DetectorPolicy::Heuristic) => ResolvedMode::Delegating,
        (DeclaredMode::Disabled, _) => return Ok(None),
    };

    // value-accessor types round-trip through a single value; a
    // policy-derived properties classification with an implicit name
    // flips back to delegating
    if mode == ResolvedMode::Properties
        && def.has_value_accessor
        && candidate.mode != DeclaredMode::Properties
        && !name_is_explicit
    {
        return Ok(Some(ResolvedMode::Delegating));
    }
    Ok(Some(mode))
}

/// Two or more non-injected parameters: properties when marked or when
/// every parameter resolves a name.
fn classify_multi(
    def: &TypeDef,
    candidate: &CreatorCandidate,
    names: &[Option<ResolvedName>],
    opts: &ResolveOptions,
) -> Result<Option<ResolvedMode>, DefinitionError> {
    match candidate.mode {
        DeclaredMode::Delegating => Err(DefinitionError::DelegateArity {
            type_name: def.name.clone(),
            signature: candidate.signature(),
        }),
        DeclaredMode::Properties | DeclaredMode::Auto => Ok(Some(ResolvedMode::Properties)),
        DeclaredMode::None => {
            if opts.policy == DetectorPolicy::ExplicitOnly {
                return Ok(None);
            }
            let all_named = candidate
                .params
                .iter()
                .zip(names)
                .all(|(p, n)| p.inject.is_some() || n.is_some());
            if all_named {
                Ok(Some(ResolvedMode::Properties))
            } else {
                Ok(None)
            }
        }
        DeclaredMode::Disabled => Ok(None),
    }
}
