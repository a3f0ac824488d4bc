use std::sync::Arc;

use json_bind::Mapper;
use json_bind_creators::{CreatorCandidate, DeclaredMode, Param, TypeDef};
use serde_json::json;

#[derive(Debug, PartialEq)]
struct Point {
    x: i64,
    y: i64,
}

fn point_mapper() -> Arc<Mapper> {
    let mapper = Mapper::new();
    mapper
        .register(
            TypeDef::of::<Point>("Point").creator(
                CreatorCandidate::constructor()
                    .param(Param::i64_().named("x"))
                    .param(Param::i64_().named("y"))
                    .builds(|a| {
                        Ok(Some(Point {
                            x: a.i64_(0)?,
                            y: a.i64_(1)?,
                        }))
                    }),
            ),
        )
        .unwrap();
    Arc::new(mapper)
}

#[test]
fn concurrent_first_use_observes_one_resolved_creator() {
    let mapper = point_mapper();
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let mapper = mapper.clone();
            std::thread::spawn(move || mapper.resolved("Point").unwrap())
        })
        .collect();
    let resolved: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for r in &resolved[1..] {
        assert!(Arc::ptr_eq(&resolved[0], r));
    }
    assert!(Arc::ptr_eq(&resolved[0], &mapper.resolved("Point").unwrap()));
}

#[test]
fn concurrent_builds_share_the_mapper() {
    let mapper = point_mapper();
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let mapper = mapper.clone();
            std::thread::spawn(move || {
                let n = i as i64;
                let built: Option<Point> = mapper
                    .from_value("Point", &json!({"x": n, "y": n + 1}))
                    .unwrap();
                assert_eq!(built, Some(Point { x: n, y: n + 1 }));
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
}

#[test]
fn registration_from_one_thread_is_visible_to_others() {
    let mapper = point_mapper();
    let writer = {
        let mapper = mapper.clone();
        std::thread::spawn(move || {
            mapper
                .register(
                    TypeDef::of::<i64>("Count").creator(
                        CreatorCandidate::constructor()
                            .mode(DeclaredMode::Auto)
                            .param(Param::i64_().named("n"))
                            .builds(|a| Ok(Some(a.i64_(0)?))),
                    ),
                )
                .unwrap();
        })
    };
    writer.join().unwrap();
    let count: Option<i64> = mapper.from_value("Count", &json!({"n": 41})).unwrap();
    assert_eq!(count, Some(41));
}
