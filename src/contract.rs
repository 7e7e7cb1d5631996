//! Contract facade: one deployed address plus its interface.

use abi_coerce::{AbiValue, ArgumentBuilder, CoerceResult, CoercionConfig, ValueCoercer};
use abi_schema::{FunctionSignature, SchemaCatalog, SignatureSource, TypeNode};
use anyhow::{anyhow, Context, Result};
use parking_lot::RwLock;
use serde_json::Value as JsonValue;
use tracing::info;

use crate::encoder::{AbiEncoder, ArgumentEncoder};

/// A contract address and the interface used to build calls against it.
///
/// The address and the interface can both be replaced while other threads
/// are building arguments; each call works against the interface snapshot
/// that was current when it started.
#[derive(Debug)]
pub struct Contract {
    address: RwLock<[u8; 20]>,
    catalog: SchemaCatalog,
    builder: ArgumentBuilder,
    encoder: AbiEncoder,
}

impl Contract {
    /// Create a contract from a `0x`-prefixed address and an interface document.
    /// Coercion settings come from the environment.
    pub fn new(address_hex: &str, interface_json: &str) -> Result<Self> {
        Self::with_config(address_hex, interface_json, CoercionConfig::from_env())
    }

    pub fn with_config(
        address_hex: &str,
        interface_json: &str,
        config: CoercionConfig,
    ) -> Result<Self> {
        let address = parse_address(address_hex)?;
        let catalog = SchemaCatalog::from_json(interface_json)
            .context("Failed to load contract interface")?;
        info!(
            address = address_hex,
            functions = catalog.len(),
            "contract interface loaded"
        );
        Ok(Self {
            address: RwLock::new(address),
            catalog,
            builder: ArgumentBuilder::new(config),
            encoder: AbiEncoder::new(),
        })
    }

    /// `0x`-prefixed lowercase hex.
    pub fn address(&self) -> String {
        format!("0x{}", hex::encode(*self.address.read()))
    }

    pub fn set_address(&self, address_hex: &str) -> Result<()> {
        let address = parse_address(address_hex)?;
        *self.address.write() = address;
        Ok(())
    }

    /// Replace the interface. On error the previous interface stays in force.
    pub fn update_interface(&self, interface_json: &str) -> Result<()> {
        self.catalog
            .update_from_json(interface_json)
            .context("Failed to update contract interface")?;
        info!(functions = self.catalog.len(), "contract interface updated");
        Ok(())
    }

    pub fn catalog(&self) -> &SchemaCatalog {
        &self.catalog
    }

    /// Coercion settings in force for this contract.
    pub fn config(&self) -> &CoercionConfig {
        self.builder.coercer().config()
    }

    pub fn function_names(&self) -> Vec<String> {
        self.catalog.function_names()
    }

    pub fn describe(&self, name: &str) -> Option<Vec<String>> {
        self.catalog.describe(name)
    }

    pub fn build_arguments(&self, name: &str, args_json: &str) -> CoerceResult<Vec<AbiValue>> {
        self.builder.build(self.catalog.snapshot().as_ref(), name, args_json)
    }

    /// Coerce and pack the arguments of `name`, without the selector.
    pub fn encode_arguments(&self, name: &str, args_json: &str) -> Result<Vec<u8>> {
        self.encode_with(name, args_json, |sig, values| self.encoder.encode(sig, values))
    }

    /// [`Contract::encode_arguments`] as `0x`-prefixed lowercase hex.
    pub fn encode_arguments_hex(&self, name: &str, args_json: &str) -> Result<String> {
        let bytes = self.encode_arguments(name, args_json)?;
        Ok(format!("0x{}", hex::encode(bytes)))
    }

    /// Full call data for `name`: selector followed by the packed arguments.
    pub fn encode_call(&self, name: &str, args_json: &str) -> Result<Vec<u8>> {
        self.encode_with(name, args_json, |sig, values| {
            self.encoder.encode_call(sig, values)
        })
    }

    /// [`Contract::encode_call`] as `0x`-prefixed lowercase hex.
    pub fn encode_call_hex(&self, name: &str, args_json: &str) -> Result<String> {
        let bytes = self.encode_call(name, args_json)?;
        Ok(format!("0x{}", hex::encode(bytes)))
    }

    // Build and encode against the same snapshot.
    fn encode_with<F>(&self, name: &str, args_json: &str, encode: F) -> Result<Vec<u8>>
    where
        F: FnOnce(&FunctionSignature, &[AbiValue]) -> Result<Vec<u8>>,
    {
        let snapshot = self.catalog.snapshot();
        let values = self.builder.build(snapshot.as_ref(), name, args_json)?;
        let signature = snapshot
            .lookup(name)
            .ok_or_else(|| anyhow!("method '{}' not found in schema", name))?;
        encode(&*signature, values.as_slice())
    }
}

fn parse_address(address_hex: &str) -> Result<[u8; 20]> {
    let json = JsonValue::String(address_hex.to_string());
    match ValueCoercer::default().coerce(&json, &TypeNode::address())? {
        AbiValue::Address(address) => Ok(address),
        other => Err(anyhow!("expected address, decoded {}", other.kind_name())),
    }
}
