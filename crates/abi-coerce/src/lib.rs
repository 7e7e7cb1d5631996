//! Schema-directed coercion of untyped JSON into typed ABI values.
//!
//! The pipeline is `ArgumentBuilder -> ValueCoercer -> (Byte Normalizer,
//! integer decoding)`. Every step is driven by the parameter's
//! [`abi_schema::TypeNode`]; the JSON only supplies values.
//!
//! ```
//! use abi_coerce::{AbiValue, ArgumentBuilder};
//! use abi_schema::{CatalogSnapshot, FunctionSignature, Param, TypeNode};
//!
//! let catalog = CatalogSnapshot::new(vec![FunctionSignature::new(
//!     "setFlags",
//!     vec![Param::new("flags", TypeNode::FixedBytes(4))],
//! )]);
//! let values = ArgumentBuilder::default()
//!     .build(&catalog, "setFlags", r#"["0x01"]"#)
//!     .unwrap();
//! assert_eq!(values, vec![AbiValue::FixedBytes(vec![1, 0, 0, 0])]);
//! ```

pub mod builder;
pub mod bytes;
pub mod coercer;
pub mod config;
pub mod error;
pub mod numeric;
pub mod value;

pub use builder::ArgumentBuilder;
pub use bytes::{decode_text, fit, normalize_bytes, ByteSlot};
pub use coercer::{RecordSlots, ValueCoercer};
pub use config::{CoercionConfig, OverflowPolicy, ENV_NUMERIC_STRINGS, ENV_OVERFLOW};
pub use error::{
    describe_json, CoerceError, CoerceErrorKind, CoerceResult, JsonShape, ParameterRef,
    PathSegment,
};
pub use numeric::decode_integer;
pub use value::{AbiValue, Word};
