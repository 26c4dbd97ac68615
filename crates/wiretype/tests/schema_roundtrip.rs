// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//
// Randomized schema text round-trips and lazy rehydration of generated
// schemas.

#![allow(clippy::missing_panics_doc)]

use wiretype::codec;
use wiretype::schema::{Field, Schema, SchemaHolder};

const ITERATIONS: usize = 200;

fn random_name(rng: &mut fastrand::Rng, prefix: &str) -> String {
    format!("{}{}", prefix, rng.u32(..10_000))
}

fn random_schema(rng: &mut fastrand::Rng, depth: u32) -> Schema {
    let leaf = depth == 0;
    match rng.u8(..if leaf { 8 } else { 13 }) {
        0 => Schema::Null,
        1 => Schema::Boolean,
        2 => Schema::Int,
        3 => Schema::Long,
        4 => Schema::Float,
        5 => Schema::Double,
        6 => Schema::Bytes,
        7 => Schema::String,
        8 => Schema::array(random_schema(rng, depth - 1)),
        9 => Schema::map(random_schema(rng, depth - 1)),
        10 => {
            let count = rng.usize(..5);
            let fields = (0..count)
                .map(|i| {
                    let field = Field::new(format!("f{i}"), random_schema(rng, depth - 1));
                    if rng.bool() {
                        field.with_doc(random_name(rng, "doc "))
                    } else {
                        field
                    }
                })
                .collect();
            Schema::record(random_name(rng, "Rec"), fields)
        }
        11 => {
            let count = rng.usize(1..5);
            Schema::Enum {
                name: random_name(rng, "Enum"),
                symbols: (0..count).map(|i| format!("S{i}")).collect(),
            }
        }
        _ => {
            let inner = random_schema(rng, depth - 1);
            if matches!(inner, Schema::Union { .. } | Schema::Null) {
                Schema::nullable(Schema::Long)
            } else {
                Schema::nullable(inner)
            }
        }
    }
}

#[test]
fn test_random_schemas_roundtrip_through_text() {
    let mut rng = fastrand::Rng::with_seed(0x5eed);
    for _ in 0..ITERATIONS {
        let schema = random_schema(&mut rng, 4);
        assert!(schema.validate().is_ok(), "generated invalid schema {schema}");

        let text = schema.to_text();
        let parsed = Schema::parse(&text).expect("parse");
        assert_eq!(parsed, schema);
        assert_eq!(parsed.to_text(), text);
    }
}

#[test]
fn test_random_schemas_rehydrate_after_transfer() {
    let mut rng = fastrand::Rng::with_seed(42);
    for _ in 0..ITERATIONS {
        let schema = random_schema(&mut rng, 3);
        let holder = SchemaHolder::new(schema.clone());

        let json = serde_json::to_string(&holder).expect("serialize");
        let received: SchemaHolder = serde_json::from_str(&json).expect("deserialize");
        assert!(!received.is_materialized());
        assert_eq!(received.get().expect("schema").as_ref(), &schema);
        assert!(received.is_materialized());
    }
}

#[test]
fn test_default_values_encode_under_random_schemas() {
    let mut rng = fastrand::Rng::with_seed(7);
    for _ in 0..ITERATIONS {
        let schema = random_schema(&mut rng, 3);
        let datum = schema.default_datum();
        assert!(schema.accepts(&datum));

        let bytes = codec::encode(&datum, &schema).expect("encode");
        let decoded = codec::decode(&bytes, &schema).expect("decode");
        assert_eq!(decoded, datum);
    }
}
