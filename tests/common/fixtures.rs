//! Sample interfaces and contracts for tests.

use abi_calldata::abi_coerce::CoercionConfig;
use abi_calldata::Contract;

/// Address the sample contract is created with.
pub const MARKET_ADDRESS: &str = "0x5fbdb2315678afecb367f032d93f642f64180aa3";

/// A small market interface covering static, dynamic and nested parameters.
///
/// `quote` is overloaded, so the second declaration resolves as `quote0`.
pub const MARKET_ABI: &str = r#"{
  "contractName": "Market",
  "abi": [
    {
      "type": "function",
      "name": "baz",
      "stateMutability": "pure",
      "inputs": [
        { "name": "x", "type": "uint32" },
        { "name": "y", "type": "bool" }
      ]
    },
    {
      "type": "function",
      "name": "sam",
      "inputs": [
        { "name": "name", "type": "bytes" },
        { "name": "flag", "type": "bool" },
        { "name": "ids", "type": "uint256[]" }
      ]
    },
    {
      "type": "function",
      "name": "f",
      "inputs": [
        { "name": "a", "type": "uint256" },
        { "name": "b", "type": "uint32[]" },
        { "name": "c", "type": "bytes10" },
        { "name": "d", "type": "bytes" }
      ]
    },
    {
      "type": "function",
      "name": "placeOrder",
      "stateMutability": "payable",
      "inputs": [
        {
          "name": "order",
          "type": "tuple",
          "components": [
            { "name": "trader", "type": "address" },
            { "name": "price", "type": "uint128" },
            { "name": "side", "type": "int8" },
            { "name": "note", "type": "string" }
          ]
        },
        { "name": "deadline", "type": "uint64" }
      ]
    },
    {
      "type": "function",
      "name": "quote",
      "stateMutability": "view",
      "inputs": [{ "name": "pair", "type": "bytes32" }]
    },
    {
      "type": "function",
      "name": "quote",
      "stateMutability": "view",
      "inputs": [
        { "name": "pair", "type": "bytes32" },
        { "name": "depth", "type": "uint8" }
      ]
    },
    {
      "type": "event",
      "name": "Filled",
      "inputs": [{ "name": "id", "type": "uint256", "indexed": true }]
    }
  ]
}"#;

/// Create the sample contract with strict coercion settings.
///
/// # Panics
///
/// Panics if the sample interface fails to load.
pub fn contract() -> Contract {
    contract_with(CoercionConfig::default())
}

#[allow(dead_code)]
pub fn contract_with(config: CoercionConfig) -> Contract {
    Contract::with_config(MARKET_ADDRESS, MARKET_ABI, config).expect("sample interface should load")
}

/// A 20-byte address whose last byte is `last`, as JSON-ready hex.
#[allow(dead_code)]
pub fn address(last: u8) -> String {
    format!("0x{:0>40}", format!("{:02x}", last))
}
