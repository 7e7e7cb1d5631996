//! End-to-end coercion against interfaces loaded from JSON.
//!
//! Test coverage areas:
//! - Nested tuples, arrays and byte slots through the Argument Builder
//! - Error kinds and locations for malformed argument documents
//! - Configuration-dependent behavior (overflow policy, numeric strings)
//! - Concurrent builds against one catalog

use std::sync::Arc;
use std::thread;

use abi_coerce::{
    AbiValue, ArgumentBuilder, CoerceErrorKind, CoercionConfig, OverflowPolicy, PathSegment,
};
use abi_schema::SchemaCatalog;
use serde_json::json;

const EXCHANGE_ABI: &str = r#"[
  {
    "type": "function",
    "name": "fillOrders",
    "stateMutability": "nonpayable",
    "inputs": [
      {
        "name": "orders",
        "type": "tuple[]",
        "components": [
          { "name": "maker", "type": "address" },
          { "name": "amount", "type": "uint256" },
          { "name": "salt", "type": "bytes32" },
          {
            "name": "legs",
            "type": "tuple[2]",
            "components": [
              { "name": "asset", "type": "address" },
              { "name": "weight", "type": "int16" }
            ]
          }
        ]
      },
      { "name": "memo", "type": "string" }
    ]
  },
  {
    "type": "function",
    "name": "setTag",
    "inputs": [{ "name": "tag", "type": "bytes4" }]
  },
  {
    "type": "function",
    "name": "setLimit",
    "inputs": [{ "name": "limit", "type": "uint64" }]
  }
]"#;

const MAKER: &str = "0x00000000000000000000000000000000000000aa";
const ASSET: &str = "0x00000000000000000000000000000000000000bb";

fn catalog() -> SchemaCatalog {
    SchemaCatalog::from_json(EXCHANGE_ABI).expect("fixture interface parses")
}

fn order(amount: serde_json::Value) -> serde_json::Value {
    json!({
        "maker": MAKER,
        "amount": amount,
        "salt": "0x01",
        "legs": [
            { "asset": ASSET, "weight": -5 },
            [ASSET, 7]
        ]
    })
}

fn addr(last: u8) -> AbiValue {
    let mut bytes = [0u8; 20];
    bytes[19] = last;
    AbiValue::Address(bytes)
}

// =============================================================================
// Successful Builds
// =============================================================================

mod success_tests {
    use super::*;

    #[test]
    fn test_nested_orders() {
        let args = json!([[order(json!(10))], "first fill"]).to_string();
        let values = ArgumentBuilder::default()
            .build(&catalog(), "fillOrders", &args)
            .unwrap();

        let mut salt = vec![0u8; 32];
        salt[0] = 1;
        let expected = vec![
            AbiValue::Sequence(vec![AbiValue::Tuple(vec![
                addr(0xaa),
                AbiValue::uint(256, 10),
                AbiValue::FixedBytes(salt),
                AbiValue::Array(vec![
                    AbiValue::Tuple(vec![addr(0xbb), AbiValue::int(16, -5)]),
                    AbiValue::Tuple(vec![addr(0xbb), AbiValue::int(16, 7)]),
                ]),
            ])]),
            AbiValue::String("first fill".to_string()),
        ];
        assert_eq!(values, expected);
    }

    #[test]
    fn test_uint256_literal_above_u128() {
        // 2^200
        let big: serde_json::Value =
            serde_json::from_str("1606938044258990275541962092341162602522202993782792835301376")
                .unwrap();
        let args = json!([[order(big)], "big"]).to_string();
        let values = ArgumentBuilder::default()
            .build(&catalog(), "fillOrders", &args)
            .unwrap();
        let record = &values[0].items().unwrap()[0];
        match &record.items().unwrap()[1] {
            AbiValue::Uint { bits: 256, word } => {
                assert_eq!(word.bit_len(), 201);
                assert_eq!(word.0[6], 0x01);
            }
            other => panic!("unexpected amount {:?}", other),
        }
    }

    #[test]
    fn test_bytes4_precedence() {
        let builder = ArgumentBuilder::default();
        let cases = [
            (r#"["0xdeadbeef"]"#, vec![0xde, 0xad, 0xbe, 0xef]),
            (r#"["deadbeef"]"#, vec![0xde, 0xad, 0xbe, 0xef]),
            (r#"["zz"]"#, vec![b'z', b'z', 0, 0]),
            (r#"["0x01"]"#, vec![0x01, 0, 0, 0]),
        ];
        for (args, expected) in cases {
            let values = builder.build(&catalog(), "setTag", args).unwrap();
            assert_eq!(values, vec![AbiValue::FixedBytes(expected)], "args {}", args);
        }
    }
}

// =============================================================================
// Failures
// =============================================================================

mod failure_tests {
    use super::*;

    #[test]
    fn test_missing_field_deep_in_sequence() {
        let mut bad = order(json!(1));
        bad["legs"][0].as_object_mut().unwrap().remove("weight");
        let args = json!([[order(json!(1)), bad], "memo"]).to_string();

        let err = ArgumentBuilder::default()
            .build(&catalog(), "fillOrders", &args)
            .unwrap_err();

        assert_eq!(err.code(), "MISSING_TUPLE_FIELD");
        assert_eq!(
            err.path,
            vec![
                PathSegment::Index(1),
                PathSegment::Field("legs".to_string()),
                PathSegment::Index(0),
            ]
        );
        assert_eq!(err.path_string(), "[1].legs[0]");
        let msg = err.to_string();
        assert!(msg.starts_with("argument 0 ('orders') at [1].legs[0]"), "{}", msg);
        assert!(msg.contains("'weight'"), "{}", msg);
    }

    #[test]
    fn test_each_removed_field_is_named() {
        for field in ["maker", "amount", "salt", "legs"] {
            let mut bad = order(json!(1));
            bad.as_object_mut().unwrap().remove(field);
            let args = json!([[bad], ""]).to_string();
            let err = ArgumentBuilder::default()
                .build(&catalog(), "fillOrders", &args)
                .unwrap_err();
            match err.kind {
                CoerceErrorKind::MissingTupleField { field: missing, .. } => {
                    assert_eq!(missing, field)
                }
                other => panic!("removing {} gave {:?}", field, other),
            }
        }
    }

    #[test]
    fn test_fixed_array_too_long() {
        let mut bad = order(json!(1));
        bad["legs"]
            .as_array_mut()
            .unwrap()
            .push(json!([ASSET, 1]));
        let args = json!([[bad], ""]).to_string();
        let err = ArgumentBuilder::default()
            .build(&catalog(), "fillOrders", &args)
            .unwrap_err();
        assert_eq!(
            err.kind,
            CoerceErrorKind::ElementIndexOutOfRange { index: 2, len: 2 }
        );
        assert_eq!(err.path_string(), "[0].legs");
    }

    #[test]
    fn test_oversized_tag() {
        let err = ArgumentBuilder::default()
            .build(&catalog(), "setTag", r#"["0x0102030405"]"#)
            .unwrap_err();
        assert_eq!(err.code(), "SOURCE_TOO_LARGE");
        assert!(!err.kind.is_internal());
    }

    #[test]
    fn test_error_is_std_error() {
        let err = ArgumentBuilder::default()
            .build(&catalog(), "nope", "[]")
            .unwrap_err();
        let boxed: Box<dyn std::error::Error> = Box::new(err);
        assert!(boxed.to_string().contains("METHOD_NOT_FOUND"));
    }
}

// =============================================================================
// Configuration
// =============================================================================

mod config_tests {
    use super::*;

    #[test]
    fn test_truncate_policy() {
        let builder = ArgumentBuilder::new(
            CoercionConfig::default().with_overflow(OverflowPolicy::Truncate),
        );
        let values = builder
            .build(&catalog(), "setTag", r#"["0x0102030405"]"#)
            .unwrap();
        assert_eq!(values, vec![AbiValue::FixedBytes(vec![1, 2, 3, 4])]);
    }

    #[test]
    fn test_numeric_strings() {
        let strict = ArgumentBuilder::default();
        assert!(strict.build(&catalog(), "setLimit", r#"["42"]"#).is_err());

        let lenient = ArgumentBuilder::new(CoercionConfig::default().with_numeric_strings(true));
        assert_eq!(
            lenient.build(&catalog(), "setLimit", r#"["42"]"#).unwrap(),
            vec![AbiValue::uint(64, 42)]
        );
        assert_eq!(
            lenient.build(&catalog(), "setLimit", r#"["0x2a"]"#).unwrap(),
            vec![AbiValue::uint(64, 42)]
        );
    }
}

// =============================================================================
// Concurrency
// =============================================================================

mod concurrency_tests {
    use super::*;

    #[test]
    fn test_parallel_builds_share_catalog() {
        let catalog = Arc::new(catalog());
        let handles: Vec<_> = (0..8u64)
            .map(|i| {
                let catalog = Arc::clone(&catalog);
                thread::spawn(move || {
                    let args = format!("[{}]", i);
                    ArgumentBuilder::default().build(catalog.as_ref(), "setLimit", &args)
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            let values = handle.join().unwrap().unwrap();
            assert_eq!(values, vec![AbiValue::uint(64, i as u128)]);
        }
    }

    #[test]
    fn test_build_many_independent_results() {
        let docs: Vec<String> = (0..32).map(|i| format!("[{}]", i)).collect();
        let results = ArgumentBuilder::default().build_many(&catalog(), "setLimit", &docs);
        for (i, result) in results.into_iter().enumerate() {
            assert_eq!(result.unwrap(), vec![AbiValue::uint(64, i as u128)]);
        }
    }
}
