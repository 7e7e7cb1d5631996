#![allow(unused_imports)]
//! Shared test utilities for integration tests.
//!
//! # Modules
//!
//! - `fixtures`: Sample interfaces and contracts
//! - `assertions`: Assertion helpers with readable failure output

pub mod assertions;
pub mod fixtures;

pub use fixtures::{address, contract, contract_with, MARKET_ABI, MARKET_ADDRESS};

pub use assertions::{assert_bytes_eq, assert_code, assert_error_contains, assert_ok};
