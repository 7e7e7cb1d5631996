//! Interface document loading.
//!
//! Accepts the JSON interface description either as a bare array of entries
//! or wrapped in a compiler artifact object under an `"abi"` key, and turns
//! every `function` entry into a [`FunctionSignature`].

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::collections::HashSet;

use crate::parse::parse_type;
use crate::types::{FunctionSignature, Param, StateMutability, TupleField};

/// One parameter as written in the interface document.
#[derive(Debug, Clone, Deserialize)]
pub struct AbiParam {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub type_str: String,
    #[serde(default)]
    pub components: Option<Vec<AbiParam>>,
}

/// One entry of the interface document.
#[derive(Debug, Clone, Deserialize)]
pub struct AbiEntry {
    #[serde(rename = "type", default = "default_entry_type")]
    pub entry_type: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<AbiParam>,
    #[serde(rename = "stateMutability", default)]
    pub state_mutability: Option<String>,
    #[serde(default)]
    pub payable: Option<bool>,
    #[serde(default)]
    pub constant: Option<bool>,
}

// Entries without a "type" are functions.
fn default_entry_type() -> String {
    "function".to_string()
}

impl AbiParam {
    /// Resolve this parameter's type string (and components) into a tuple field.
    pub fn to_field(&self) -> Result<TupleField> {
        let components = match &self.components {
            Some(components) => Some(
                components
                    .iter()
                    .map(AbiParam::to_field)
                    .collect::<Result<Vec<_>>>()
                    .with_context(|| format!("in components of '{}'", self.name))?,
            ),
            None => None,
        };
        let node = parse_type(&self.type_str, components)
            .with_context(|| format!("parameter '{}'", self.name))?;
        Ok(TupleField::new(self.name.clone(), node))
    }
}

impl AbiEntry {
    fn state_mutability(&self) -> StateMutability {
        if let Some(s) = self.state_mutability.as_deref() {
            if let Some(m) = StateMutability::parse(s) {
                return m;
            }
        }
        if self.payable == Some(true) {
            StateMutability::Payable
        } else if self.constant == Some(true) {
            StateMutability::View
        } else {
            StateMutability::NonPayable
        }
    }
}

/// Extract the entry array from either accepted document form.
pub fn extract_entries(raw: &str) -> Result<Vec<AbiEntry>> {
    let doc: JsonValue = match serde_json::from_str::<serde_json::Map<String, JsonValue>>(raw) {
        Ok(map) => match map.get("abi") {
            Some(abi) => abi.clone(),
            None => JsonValue::Object(map),
        },
        Err(map_err) => match serde_json::from_str::<Vec<JsonValue>>(raw) {
            Ok(entries) => JsonValue::Array(entries),
            Err(array_err) => {
                return Err(anyhow!(
                    "interface is neither an object (mapErr {}) nor an array (arrayErr {})",
                    map_err,
                    array_err
                ));
            }
        },
    };

    serde_json::from_value(doc).context("Failed to parse interface entries")
}

/// Parse an interface document into function signatures, in declaration order.
///
/// Overloaded names are disambiguated: the first declaration keeps its name,
/// later ones get the first free `name0`, `name1`, ... suffix.
pub fn parse_interface(raw: &str) -> Result<Vec<FunctionSignature>> {
    let entries = extract_entries(raw)?;
    let mut taken: HashSet<String> = HashSet::new();
    let mut signatures = Vec::new();

    for entry in entries.iter().filter(|e| e.entry_type == "function") {
        let inputs = entry
            .inputs
            .iter()
            .map(|p| p.to_field().map(|f| Param::new(f.name, f.node)))
            .collect::<Result<Vec<_>>>()
            .with_context(|| format!("Failed to parse inputs of function '{}'", entry.name))?;

        let name = overloaded_name(&entry.name, &taken);
        taken.insert(name.clone());

        signatures.push(FunctionSignature {
            name,
            raw_name: entry.name.clone(),
            inputs,
            state_mutability: entry.state_mutability(),
        });
    }
    Ok(signatures)
}

fn overloaded_name(raw_name: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(raw_name) {
        return raw_name.to_string();
    }
    (0usize..)
        .map(|idx| format!("{}{}", raw_name, idx))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| raw_name.to_string())
}
