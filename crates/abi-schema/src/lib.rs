//! Interface schema model for JSON argument coercion.
//!
//! This crate holds the static side of the pipeline:
//! - [`types`]: the parameter type tree ([`TypeNode`]) and [`FunctionSignature`]
//! - [`parse`]: type strings (`uint256`, `tuple[2][]`, ...) into type trees
//! - [`abi_json`]: interface documents into signatures
//! - [`catalog`]: name resolution with atomically replaced snapshots

pub mod abi_json;
pub mod catalog;
pub mod parse;
pub mod types;

pub use abi_json::{parse_interface, AbiEntry, AbiParam};
pub use catalog::{CatalogSnapshot, SchemaCatalog, SignatureSource};
pub use parse::parse_type;
pub use types::{FunctionSignature, Param, PrimitiveKind, StateMutability, TupleField, TypeNode};
