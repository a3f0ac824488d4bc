use json_bind_creators::{
    resolve, CandidateSummary, CreatorCandidate, CreatorSelector, DeclaredMode, DetectorPolicy,
    NameTransform, Param, ResolveOptions, TypeDef, Visibility,
};
use std::sync::Arc;

struct Subject;

fn ctor(names: &[&str]) -> CreatorCandidate {
    let mut b = CreatorCandidate::constructor();
    for n in names {
        b = b.param(Param::i64_().implicit(*n));
    }
    b.builds(|_| Ok(Some(Subject)))
}

fn policy(policy: DetectorPolicy) -> ResolveOptions {
    ResolveOptions {
        policy,
        ..ResolveOptions::default()
    }
}

#[test]
fn single_string_ctor_policy_matrix() {
    let def = || {
        TypeDef::of::<Subject>("Name").creator(
            CreatorCandidate::constructor()
                .param(Param::str_().implicit("value"))
                .builds(|_| Ok(Some(Subject))),
        )
    };

    let r1 = resolve(&def(), &policy(DetectorPolicy::Heuristic)).unwrap();
    assert!(r1.delegating.is_some());
    assert!(r1.properties_based.is_none());

    let r2 = resolve(&def(), &policy(DetectorPolicy::UseProperties)).unwrap();
    assert!(r2.properties_based.is_some());
    assert!(r2.delegating.is_none());
    assert_eq!(r2.creator_properties[0].name, "value");

    let r3 = resolve(&def(), &policy(DetectorPolicy::UseDelegating)).unwrap();
    assert!(r3.delegating.is_some());

    let e = resolve(&def(), &policy(DetectorPolicy::ExplicitOnly)).unwrap_err();
    assert_eq!(e.code(), "NO_CREATOR");
}

#[test]
fn explicit_conflict_matrix() {
    // same-mode explicit pairs fail; mixed modes coexist
    let props = |name: &str| {
        CreatorCandidate::factory(name)
            .mode(DeclaredMode::Properties)
            .param(Param::i64_().named("v"))
            .builds(|_| Ok(Some(Subject)))
    };
    let deleg = |name: &str| {
        CreatorCandidate::factory(name)
            .mode(DeclaredMode::Delegating)
            .param(Param::str_())
            .builds(|_| Ok(Some(Subject)))
    };

    let bad = TypeDef::of::<Subject>("T").creator(props("a")).creator(props("b"));
    let e = resolve(&bad, &ResolveOptions::default()).unwrap_err();
    assert_eq!(e.code(), "CONFLICTING_CREATORS");
    assert!(e.to_string().contains("a(v: i64)"));
    assert!(e.to_string().contains("b(v: i64)"));

    let ok = TypeDef::of::<Subject>("T").creator(props("a")).creator(deleg("b"));
    let r = resolve(&ok, &ResolveOptions::default()).unwrap();
    assert!(r.properties_based.is_some());
    assert!(r.delegating.is_some());
}

#[test]
fn disabled_candidates_drop_out_matrix() {
    let def = TypeDef::of::<Subject>("T")
        .creator(
            CreatorCandidate::constructor()
                .mode(DeclaredMode::Disabled)
                .param(Param::i64_().named("v"))
                .builds(|_| Ok(Some(Subject))),
        )
        .creator(ctor(&["a", "b"]));
    let r = resolve(&def, &ResolveOptions::default()).unwrap();
    let p = r.properties_based.unwrap();
    assert_eq!(p.signature, "new(a: i64, b: i64)");
}

#[test]
fn implicit_precedence_matrix() {
    // arity breaks the visibility tie; a full tie is ambiguous
    let def = TypeDef::of::<Subject>("T")
        .creator(ctor(&["a"]))
        .creator(ctor(&["a", "b"]))
        .creator(ctor(&["a", "b", "c"]));
    let r = resolve(&def, &ResolveOptions::default()).unwrap();
    assert_eq!(r.properties_based.unwrap().bindings.len(), 3);

    let tied = TypeDef::of::<Subject>("T")
        .creator(ctor(&["a", "b"]))
        .creator(ctor(&["c", "d"]));
    let e = resolve(&tied, &ResolveOptions::default()).unwrap_err();
    assert_eq!(e.code(), "AMBIGUOUS_CREATORS");
}

#[test]
fn enum_conversion_factories_matrix() {
    let of_factory = || {
        CreatorCandidate::factory("of")
            .param(Param::str_())
            .builds(|_| Ok(Some(Subject)))
    };

    // auto-detected on enums, delegating by default
    let e = TypeDef::enum_of::<Subject>("Color").creator(of_factory());
    let r = resolve(&e, &ResolveOptions::default()).unwrap();
    assert!(r.delegating.is_some());

    // ignored on concrete types
    let c = TypeDef::of::<Subject>("NotEnum").creator(of_factory());
    let err = resolve(&c, &ResolveOptions::default()).unwrap_err();
    assert_eq!(err.code(), "NO_CREATOR");
}

#[test]
fn name_transform_matrix() {
    let def = TypeDef::of::<Subject>("Person").creator(
        CreatorCandidate::constructor()
            .param(Param::str_().implicit("firstName"))
            .param(Param::str_().named("LAST"))
            .builds(|_| Ok(Some(Subject))),
    );
    let opts = ResolveOptions {
        transform: NameTransform::SnakeCase,
        ..ResolveOptions::default()
    };
    let r = resolve(&def, &opts).unwrap();
    let names: Vec<_> = r.creator_properties.iter().map(|p| p.name.as_str()).collect();
    // implicit names transform, explicit names bind verbatim
    assert_eq!(names, vec!["first_name", "LAST"]);
}

#[test]
fn visibility_floor_matrix() {
    let hidden = TypeDef::of::<Subject>("T").creator(
        CreatorCandidate::constructor()
            .visibility(Visibility::Crate)
            .param(Param::i64_().implicit("a"))
            .param(Param::i64_().implicit("b"))
            .builds(|_| Ok(Some(Subject))),
    );
    assert_eq!(
        resolve(&hidden, &ResolveOptions::default()).unwrap_err().code(),
        "NO_CREATOR"
    );

    let lenient = ResolveOptions {
        min_visibility: Visibility::Private,
        ..ResolveOptions::default()
    };
    assert!(resolve(&hidden, &lenient).is_ok());
}

struct PreferArity(usize);

impl CreatorSelector for PreferArity {
    fn select(&self, _type_name: &str, candidates: &[CandidateSummary]) -> Option<usize> {
        candidates.iter().find(|c| c.arity == self.0).map(|c| c.index)
    }
}

#[test]
fn selector_hook_matrix() {
    let def = || {
        TypeDef::of::<Subject>("T")
            .creator(ctor(&["a", "b"]))
            .creator(ctor(&["a", "b", "c"]))
    };

    // standard precedence prefers the higher arity
    let r = resolve(&def(), &ResolveOptions::default()).unwrap();
    assert_eq!(r.properties_based.unwrap().bindings.len(), 3);

    // the hook forces the two-argument candidate
    let opts = ResolveOptions {
        selector: Some(Arc::new(PreferArity(2))),
        ..ResolveOptions::default()
    };
    let r = resolve(&def(), &opts).unwrap();
    assert_eq!(r.properties_based.unwrap().bindings.len(), 2);

    // the hook can also promote a no-argument creator over the chain
    let with_default = def().creator(CreatorCandidate::constructor().builds(|_| Ok(Some(Subject))));
    let opts = ResolveOptions {
        selector: Some(Arc::new(PreferArity(0))),
        ..ResolveOptions::default()
    };
    let r = resolve(&with_default, &opts).unwrap();
    assert!(r.properties_based.is_none());
    assert!(r.default_creator.is_some());
}

#[test]
fn mixed_slots_resolve_together_matrix() {
    let def = TypeDef::of::<Subject>("T")
        .creator(CreatorCandidate::constructor().builds(|_| Ok(Some(Subject))))
        .creator(ctor(&["a", "b"]))
        .creator(
            CreatorCandidate::factory("parse")
                .mode(DeclaredMode::Delegating)
                .param(Param::str_())
                .builds(|_| Ok(Some(Subject))),
        )
        .creator(
            CreatorCandidate::factory("from_items")
                .mode(DeclaredMode::Delegating)
                .param(Param::array())
                .builds(|_| Ok(Some(Subject))),
        );
    let r = resolve(&def, &ResolveOptions::default()).unwrap();
    assert!(r.default_creator.is_some());
    assert!(r.properties_based.is_some());
    assert!(r.delegating.is_some());
    assert!(r.array_delegating.is_some());
    assert_eq!(r.delegating.unwrap().signature, "parse(_: str)");
    assert_eq!(r.array_delegating.unwrap().signature, "from_items(_: array)");
}
