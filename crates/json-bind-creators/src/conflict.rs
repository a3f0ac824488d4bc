//! Same-mode conflict resolution and the candidate selection hook.

use std::cmp::Ordering;

use crate::candidate::{CandidateKind, DeclaredMode, Visibility};
use crate::classify::{Classification, Classified, ResolvedMode};
use crate::error::DefinitionError;

/// Read-only summary of one classified candidate, handed to
/// [`CreatorSelector`] implementations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateSummary {
    /// Declaration index on the type.
    pub index: usize,
    pub signature: String,
    pub kind: CandidateKind,
    /// `None` for no-argument candidates.
    pub mode: Option<ResolvedMode>,
    pub explicit: bool,
    pub all_named: bool,
    pub visibility: Visibility,
    pub arity: usize,
}

/// Per-type override of standard creator precedence. Returning the
/// declaration index of a summarized candidate forces it; `None` keeps
/// the standard rules. Definition conflicts are detected either way.
pub trait CreatorSelector: Send + Sync {
    fn select(&self, type_name: &str, candidates: &[CandidateSummary]) -> Option<usize>;
}

/// Summaries of everything that survived classification, in
/// declaration order.
pub fn summaries(classification: &Classification<'_>) -> Vec<CandidateSummary> {
    let mut out: Vec<CandidateSummary> = Vec::new();
    for bucket in [
        &classification.properties,
        &classification.delegating,
        &classification.array_delegating,
    ] {
        for c in bucket.iter() {
            out.push(CandidateSummary {
                index: c.index,
                signature: c.candidate.signature(),
                kind: c.candidate.kind,
                mode: Some(c.mode),
                explicit: c.explicit,
                all_named: c.all_named(),
                visibility: c.candidate.visibility,
                arity: c.candidate.arity(),
            });
        }
    }
    for d in &classification.defaults {
        out.push(CandidateSummary {
            index: d.index,
            signature: d.candidate.signature(),
            kind: d.candidate.kind,
            mode: None,
            explicit: d.candidate.mode != DeclaredMode::None,
            all_named: true,
            visibility: d.candidate.visibility,
            arity: 0,
        });
    }
    out.sort_by_key(|s| s.index);
    out
}

/// Precedence among implicit same-mode candidates: fully named, then
/// most visible, then highest arity.
fn rank(a: &Classified<'_>, b: &Classified<'_>) -> Ordering {
    (a.all_named(), a.candidate.visibility, a.candidate.arity()).cmp(&(
        b.all_named(),
        b.candidate.visibility,
        b.candidate.arity(),
    ))
}

fn conflict_error(
    type_name: &str,
    mode: ResolvedMode,
    first: &Classified<'_>,
    second: &Classified<'_>,
) -> DefinitionError {
    match mode {
        ResolvedMode::ArrayDelegating => DefinitionError::ConflictingArrayDelegates {
            type_name: type_name.to_string(),
            first: first.candidate.signature(),
            second: second.candidate.signature(),
        },
        _ => DefinitionError::ConflictingCreators {
            type_name: type_name.to_string(),
            mode: mode.as_str(),
            first: first.candidate.signature(),
            second: second.candidate.signature(),
        },
    }
}

/// Picks the active candidate of one mode bucket.
///
/// Two explicit candidates conflict outright. One explicit candidate
/// silences any implicit ones. Implicit candidates go through the
/// precedence chain; full ties are ambiguous. The array-delegating
/// bucket skips the chain entirely: two active array delegates always
/// conflict.
pub(crate) fn resolve_bucket<'a>(
    type_name: &str,
    mode: ResolvedMode,
    bucket: &[Classified<'a>],
) -> Result<Option<Classified<'a>>, DefinitionError> {
    let mut explicit = bucket.iter().filter(|c| c.explicit);
    if let Some(first) = explicit.next() {
        if let Some(second) = explicit.next() {
            return Err(conflict_error(type_name, mode, first, second));
        }
        return Ok(Some(first.clone()));
    }

    if mode == ResolvedMode::ArrayDelegating && bucket.len() > 1 {
        return Err(conflict_error(type_name, mode, &bucket[0], &bucket[1]));
    }

    let mut best: Vec<&Classified<'a>> = Vec::new();
    for c in bucket {
        match best.first() {
            None => best.push(c),
            Some(leader) => match rank(c, leader) {
                Ordering::Greater => {
                    best.clear();
                    best.push(c);
                }
                Ordering::Equal => best.push(c),
                Ordering::Less => {}
            },
        }
    }
    match best.as_slice() {
        [] => Ok(None),
        [winner] => Ok(Some((*winner).clone())),
        ties => Err(DefinitionError::AmbiguousCreators {
            type_name: type_name.to_string(),
            candidates: ties.iter().map(|c| c.candidate.signature()).collect(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::{CreatorCandidate, Param, TypeDef};
    use crate::classify::{classify, ResolveOptions};
    use crate::collect::collect;

    struct T;

    fn buckets<'a>(def: &'a TypeDef, opts: &ResolveOptions) -> Classification<'a> {
        let collected = collect(def, opts);
        classify(def, &collected, opts).unwrap()
    }

    fn props_ctor(mode: DeclaredMode, vis: Visibility, names: &[&str]) -> CreatorCandidate {
        let mut b = CreatorCandidate::constructor().mode(mode).visibility(vis);
        for n in names {
            b = b.param(Param::i64_().implicit(*n));
        }
        b.builds(|_| Ok(Some(T)))
    }

    // -- Explicit precedence --

    #[test]
    fn explicit_beats_implicit() {
        let def = TypeDef::of::<T>("T")
            .creator(props_ctor(DeclaredMode::None, Visibility::Public, &["a", "b", "c"]))
            .creator(props_ctor(DeclaredMode::Properties, Visibility::Private, &["a"]));
        let c = buckets(&def, &ResolveOptions::default());
        let winner = resolve_bucket("T", ResolvedMode::Properties, &c.properties)
            .unwrap()
            .unwrap();
        assert_eq!(winner.index, 1);
    }

    #[test]
    fn two_explicit_same_mode_conflict() {
        let def = TypeDef::of::<T>("T")
            .creator(props_ctor(DeclaredMode::Properties, Visibility::Public, &["a"]))
            .creator(props_ctor(DeclaredMode::Properties, Visibility::Public, &["b"]));
        let c = buckets(&def, &ResolveOptions::default());
        let e = resolve_bucket("T", ResolvedMode::Properties, &c.properties).unwrap_err();
        assert_eq!(e.code(), "CONFLICTING_CREATORS");
        assert!(e.to_string().contains("a: i64"));
        assert!(e.to_string().contains("b: i64"));
    }

    // -- Implicit precedence chain --

    #[test]
    fn more_visible_implicit_wins() {
        let opts = ResolveOptions {
            min_visibility: Visibility::Private,
            ..ResolveOptions::default()
        };
        let def = TypeDef::of::<T>("T")
            .creator(props_ctor(DeclaredMode::None, Visibility::Private, &["a", "b"]))
            .creator(props_ctor(DeclaredMode::None, Visibility::Public, &["a", "b"]));
        let c = buckets(&def, &opts);
        let winner = resolve_bucket("T", ResolvedMode::Properties, &c.properties)
            .unwrap()
            .unwrap();
        assert_eq!(winner.index, 1);
    }

    #[test]
    fn higher_arity_wins_at_equal_visibility() {
        let def = TypeDef::of::<T>("T")
            .creator(props_ctor(DeclaredMode::None, Visibility::Public, &["a"]))
            .creator(props_ctor(DeclaredMode::None, Visibility::Public, &["a", "b"]));
        let c = buckets(&def, &ResolveOptions::default());
        let winner = resolve_bucket("T", ResolvedMode::Properties, &c.properties)
            .unwrap()
            .unwrap();
        assert_eq!(winner.index, 1);
    }

    #[test]
    fn full_tie_is_ambiguous() {
        let def = TypeDef::of::<T>("T")
            .creator(props_ctor(DeclaredMode::None, Visibility::Public, &["a", "b"]))
            .creator(props_ctor(DeclaredMode::None, Visibility::Public, &["c", "d"]));
        let c = buckets(&def, &ResolveOptions::default());
        let e = resolve_bucket("T", ResolvedMode::Properties, &c.properties).unwrap_err();
        assert_eq!(e.code(), "AMBIGUOUS_CREATORS");
        assert!(e.to_string().contains("a: i64"));
        assert!(e.to_string().contains("c: i64"));
    }

    #[test]
    fn empty_bucket_resolves_to_none() {
        assert!(resolve_bucket("T", ResolvedMode::Delegating, &[])
            .unwrap()
            .is_none());
    }

    // -- Array delegates --

    #[test]
    fn second_implicit_array_delegate_conflicts() {
        let opts = ResolveOptions {
            min_visibility: Visibility::Private,
            ..ResolveOptions::default()
        };
        let def = TypeDef::of::<T>("T")
            .creator(
                CreatorCandidate::constructor()
                    .param(Param::array())
                    .builds(|_| Ok(Some(T))),
            )
            .creator(
                CreatorCandidate::constructor()
                    .visibility(Visibility::Private)
                    .param(Param::array())
                    .builds(|_| Ok(Some(T))),
            );
        let c = buckets(&def, &opts);
        let e = resolve_bucket("T", ResolvedMode::ArrayDelegating, &c.array_delegating)
            .unwrap_err();
        assert_eq!(e.code(), "CONFLICTING_ARRAY_DELEGATES");
    }

    #[test]
    fn explicit_array_delegate_silences_implicit_one() {
        let def = TypeDef::of::<T>("T")
            .creator(
                CreatorCandidate::constructor()
                    .param(Param::array())
                    .builds(|_| Ok(Some(T))),
            )
            .creator(
                CreatorCandidate::factory("from_items")
                    .mode(DeclaredMode::Delegating)
                    .param(Param::array())
                    .builds(|_| Ok(Some(T))),
            );
        let c = buckets(&def, &ResolveOptions::default());
        let winner = resolve_bucket("T", ResolvedMode::ArrayDelegating, &c.array_delegating)
            .unwrap()
            .unwrap();
        assert_eq!(winner.index, 1);
    }

    // -- Summaries --

    #[test]
    fn summaries_cover_all_buckets_in_declaration_order() {
        let def = TypeDef::of::<T>("T")
            .creator(CreatorCandidate::constructor().builds(|_| Ok(Some(T))))
            .creator(props_ctor(DeclaredMode::None, Visibility::Public, &["a", "b"]))
            .creator(
                CreatorCandidate::factory("parse")
                    .mode(DeclaredMode::Delegating)
                    .param(Param::str_())
                    .builds(|_| Ok(Some(T))),
            );
        let c = buckets(&def, &ResolveOptions::default());
        let s = summaries(&c);
        assert_eq!(s.len(), 3);
        assert_eq!(s[0].mode, None);
        assert_eq!(s[1].mode, Some(ResolvedMode::Properties));
        assert_eq!(s[2].mode, Some(ResolvedMode::Delegating));
        assert_eq!(s[2].signature, "parse(_: str)");
    }
}
