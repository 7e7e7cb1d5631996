//! Named registry of contracts.
//!
//! Callers register each contract under a short name ("router", "vault") and
//! then build call data by name. Registration replaces any contract already
//! held under that name; contracts handed out earlier stay usable.

use abi_coerce::CoercionConfig;
use anyhow::{anyhow, Result};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use crate::contract::Contract;

#[derive(Debug, Default)]
pub struct ContractRegistry {
    by_name: RwLock<HashMap<String, Arc<Contract>>>,
    config: CoercionConfig,
}

impl ContractRegistry {
    /// An empty registry whose contracts coerce with `config`.
    pub fn new(config: CoercionConfig) -> Self {
        Self {
            by_name: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// An empty registry configured from the environment.
    pub fn from_env() -> Self {
        Self::new(CoercionConfig::from_env())
    }

    /// Load `interface_json` for the contract at `address_hex` and register it
    /// as `name`. Interfaces without functions are rejected.
    pub fn register(
        &self,
        name: &str,
        address_hex: &str,
        interface_json: &str,
    ) -> Result<Arc<Contract>> {
        let contract = Arc::new(Contract::with_config(address_hex, interface_json, self.config)?);
        let replaced = self
            .by_name
            .write()
            .insert(name.to_string(), Arc::clone(&contract))
            .is_some();
        info!(
            contract = name,
            address = %contract.address(),
            functions = contract.function_names().len(),
            replaced,
            "contract registered"
        );
        Ok(contract)
    }

    pub fn remove(&self, name: &str) -> Option<Arc<Contract>> {
        self.by_name.write().remove(name)
    }

    pub fn get(&self, name: &str) -> Result<Arc<Contract>> {
        self.by_name
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| anyhow!("contract '{}' not registered", name))
    }

    /// Contract currently deployed at `address_hex` (case-insensitive).
    pub fn find_by_address(&self, address_hex: &str) -> Option<Arc<Contract>> {
        let wanted = address_hex.to_lowercase();
        self.by_name
            .read()
            .values()
            .find(|c| c.address() == wanted)
            .cloned()
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.by_name.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.by_name.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.read().is_empty()
    }

    /// Parameter lines of `function` on `contract`.
    pub fn describe(&self, contract: &str, function: &str) -> Result<Vec<String>> {
        self.get(contract)?
            .describe(function)
            .ok_or_else(|| anyhow!("method '{}' not found on contract '{}'", function, contract))
    }

    /// Call data (selector + arguments) for `function` on `contract`, as hex.
    pub fn encode_call_hex(&self, contract: &str, function: &str, args_json: &str) -> Result<String> {
        self.get(contract)?.encode_call_hex(function, args_json)
    }

    /// Packed arguments only, as hex.
    pub fn encode_arguments_hex(
        &self,
        contract: &str,
        function: &str,
        args_json: &str,
    ) -> Result<String> {
        self.get(contract)?.encode_arguments_hex(function, args_json)
    }
}
