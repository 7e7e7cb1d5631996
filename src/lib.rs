//! ABI Calldata
//!
//! Builds contract call arguments from JSON:
//!
//! - **Schema**: interface documents into typed signatures ([`abi_schema`])
//! - **Coercion**: JSON argument arrays into typed values ([`abi_coerce`])
//! - **Encoding**: typed values into call data ([`encoder`])
//!
//! See [`Contract`] for the one-stop facade and [`ContractRegistry`] for
//! addressing several contracts by name.

pub mod contract;
pub mod encoder;
pub mod registry;

pub use abi_coerce;
pub use abi_schema;

pub use contract::Contract;
pub use encoder::{AbiEncoder, ArgumentEncoder};
pub use registry::ContractRegistry;
