use json_bind::{Mapper, MapperConfig};
use json_bind_creators::{CreatorCandidate, Param, TypeDef};
use proptest::prelude::*;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;
use serde_json::{json, Map, Value};

#[derive(Debug, PartialEq)]
struct Sample {
    a: i64,
    b: i64,
    c: String,
    d: bool,
    e: f64,
    f: Option<String>,
}

fn sample_def() -> TypeDef {
    TypeDef::of::<Sample>("Sample").creator(
        CreatorCandidate::constructor()
            .param(Param::i64_().named("a"))
            .param(Param::i64_().named("b"))
            .param(Param::str_().named("c"))
            .param(Param::bool_().named("d"))
            .param(Param::f64_().named("e"))
            .param(Param::str_().named("f"))
            .builds(|a| {
                Ok(Some(Sample {
                    a: a.i64_(0)?,
                    b: a.i64_(1)?,
                    c: a.str_(2)?.to_string(),
                    d: a.bool_(3)?,
                    e: a.f64_(4)?,
                    f: a.str_opt(5)?.map(str::to_string),
                }))
            }),
    )
}

fn object_in_order(entries: &[(&str, Value)]) -> Value {
    let mut map = Map::new();
    for (key, value) in entries {
        map.insert((*key).to_string(), value.clone());
    }
    Value::Object(map)
}

#[test]
fn shuffled_property_order_never_changes_the_result() {
    let mapper = Mapper::new();
    mapper.register(sample_def()).unwrap();

    let mut entries = vec![
        ("a", json!(1)),
        ("b", json!(-2)),
        ("c", json!("three")),
        ("d", json!(true)),
        ("e", json!(2.5)),
        ("f", json!("six")),
    ];
    let expected: Option<Sample> = mapper
        .from_value("Sample", &object_in_order(&entries))
        .unwrap();

    let mut rng = rand::rngs::StdRng::seed_from_u64(0x5eed);
    for _ in 0..24 {
        entries.shuffle(&mut rng);
        let shuffled: Option<Sample> = mapper
            .from_value("Sample", &object_in_order(&entries))
            .unwrap();
        assert_eq!(shuffled, expected);
    }
}

#[test]
fn duplicate_properties_keep_the_last_value() {
    let mapper = Mapper::with_config(MapperConfig::default().with_fail_on_unknown(false));
    mapper.register(sample_def()).unwrap();
    let sample: Option<Sample> = mapper
        .from_json("Sample", r#"{"a": 1, "b": 1, "c": "x", "b": 7}"#)
        .unwrap();
    assert_eq!(sample.unwrap().b, 7);
}

// -- Serialize-then-deserialize --

#[derive(Debug, PartialEq, Serialize)]
struct Rect {
    // serialized field order is the reverse of the creator's
    // parameter order
    h: i64,
    w: i64,
}

#[test]
fn rearranged_fields_round_trip() {
    let mapper = Mapper::new();
    mapper
        .register(
            TypeDef::of::<Rect>("Rect").creator(
                CreatorCandidate::constructor()
                    .param(Param::i64_().named("w"))
                    .param(Param::i64_().named("h"))
                    .builds(|a| {
                        Ok(Some(Rect {
                            h: a.i64_(1)?,
                            w: a.i64_(0)?,
                        }))
                    }),
            ),
        )
        .unwrap();
    let rect = Rect { h: 9, w: 16 };
    let serialized = serde_json::to_value(&rect).unwrap();
    let back: Option<Rect> = mapper.from_value("Rect", &serialized).unwrap();
    assert_eq!(back, Some(rect));
}

#[derive(Debug, PartialEq, Serialize)]
struct Labeled {
    x: i64,
    y: i64,
    label: String,
}

#[test]
fn creator_parameters_may_be_a_subset_of_serialized_fields() {
    #[derive(Debug, PartialEq)]
    struct XY {
        x: i64,
        y: i64,
    }
    let mapper = Mapper::with_config(MapperConfig::default().with_fail_on_unknown(false));
    mapper
        .register(
            TypeDef::of::<XY>("XY").creator(
                CreatorCandidate::constructor()
                    .param(Param::i64_().named("x"))
                    .param(Param::i64_().named("y"))
                    .builds(|a| {
                        Ok(Some(XY {
                            x: a.i64_(0)?,
                            y: a.i64_(1)?,
                        }))
                    }),
            ),
        )
        .unwrap();
    let labeled = Labeled {
        x: 4,
        y: 5,
        label: "corner".to_string(),
    };
    let serialized = serde_json::to_value(&labeled).unwrap();
    let xy: Option<XY> = mapper.from_value("XY", &serialized).unwrap();
    assert_eq!(xy, Some(XY { x: 4, y: 5 }));
}

// -- Property-based order invariance --

#[derive(Debug, PartialEq)]
struct Point3 {
    x: i64,
    y: i64,
    z: i64,
}

fn point3_mapper() -> Mapper {
    let mapper = Mapper::new();
    mapper
        .register(
            TypeDef::of::<Point3>("Point3").creator(
                CreatorCandidate::constructor()
                    .param(Param::i64_().named("x"))
                    .param(Param::i64_().named("y"))
                    .param(Param::i64_().named("z"))
                    .builds(|a| {
                        Ok(Some(Point3 {
                            x: a.i64_(0)?,
                            y: a.i64_(1)?,
                            z: a.i64_(2)?,
                        }))
                    }),
            ),
        )
        .unwrap();
    mapper
}

fn shuffled_point3() -> impl Strategy<Value = ((i64, i64, i64), Vec<(String, i64)>)> {
    (any::<i64>(), any::<i64>(), any::<i64>()).prop_flat_map(|(x, y, z)| {
        let entries = vec![
            ("x".to_string(), x),
            ("y".to_string(), y),
            ("z".to_string(), z),
        ];
        (Just((x, y, z)), Just(entries).prop_shuffle())
    })
}

proptest! {
    #[test]
    fn any_key_order_builds_the_same_point(((x, y, z), entries) in shuffled_point3()) {
        let mapper = point3_mapper();
        let mut map = Map::new();
        for (key, value) in entries {
            map.insert(key, json!(value));
        }
        let built: Option<Point3> = mapper.from_value("Point3", &Value::Object(map)).unwrap();
        prop_assert_eq!(built, Some(Point3 { x, y, z }));
    }
}
