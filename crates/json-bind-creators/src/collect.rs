//! Candidate collection: which declared constructors and factories are
//! even considered for a type.

use crate::candidate::{CandidateKind, CreatorCandidate, DeclaredMode, TypeDef, TypeShape};
use crate::classify::ResolveOptions;

/// A candidate that survived collection, tagged with its declaration
/// index.
#[derive(Debug, Clone, Copy)]
pub struct Collected<'a> {
    pub index: usize,
    pub candidate: &'a CreatorCandidate,
}

/// Enum factories named like conversion entry points are picked up
/// without a creator marking.
fn is_enum_conversion_factory(candidate: &CreatorCandidate) -> bool {
    matches!(candidate.factory_name.as_deref(), Some("of") | Some("from"))
}

/// Collects the candidates eligible for classification.
///
/// Disabled candidates never participate. Marked candidates (any
/// declared mode) always do, regardless of visibility. Unmarked
/// candidates are auto-detected only when annotation is not required
/// and they clear the visibility floor; unmarked factories are never
/// auto-detected except the enum `of`/`from` carve-out.
pub fn collect<'a>(def: &'a TypeDef, opts: &ResolveOptions) -> Vec<Collected<'a>> {
    let mut out = Vec::new();
    for (index, candidate) in def.candidates.iter().enumerate() {
        let eligible = match candidate.mode {
            DeclaredMode::Disabled => false,
            DeclaredMode::Auto | DeclaredMode::Delegating | DeclaredMode::Properties => true,
            DeclaredMode::None => {
                !opts.require_annotation
                    && candidate.visibility >= opts.min_visibility
                    && match candidate.kind {
                        CandidateKind::Constructor => true,
                        CandidateKind::Factory => {
                            def.shape == TypeShape::Enum && is_enum_conversion_factory(candidate)
                        }
                    }
            }
        };
        if eligible {
            out.push(Collected { index, candidate });
        }
    }
    out
}
