//! Schema catalog: resolves function names to signatures.
//!
//! The catalog publishes immutable [`CatalogSnapshot`]s. A reader clones the
//! current `Arc` (the lock is held only for that clone) and resolves against
//! it for as long as it likes; updates build a fresh snapshot and swap it in,
//! so readers never observe a half-updated interface.

use anyhow::{anyhow, Context, Result};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use crate::abi_json::parse_interface;
use crate::types::FunctionSignature;

/// Anything that can resolve a function name to its signature.
pub trait SignatureSource {
    fn lookup(&self, name: &str) -> Option<Arc<FunctionSignature>>;
}

/// Immutable name -> signature map.
#[derive(Debug, Default, Clone)]
pub struct CatalogSnapshot {
    functions: BTreeMap<String, Arc<FunctionSignature>>,
}

impl CatalogSnapshot {
    /// Index signatures by [`FunctionSignature::name`].
    ///
    /// Names are the catalog key: when two signatures share a name the later
    /// one replaces the earlier. [`parse_interface`] never yields duplicates;
    /// hand-built lists should give overloads distinct names.
    pub fn new(signatures: impl IntoIterator<Item = FunctionSignature>) -> Self {
        let functions = signatures
            .into_iter()
            .map(|sig| (sig.name.clone(), Arc::new(sig)))
            .collect();
        Self { functions }
    }

    /// Function names in sorted order.
    pub fn function_names(&self) -> Vec<String> {
        self.functions.keys().cloned().collect()
    }

    pub fn payable_function_names(&self) -> Vec<String> {
        self.functions
            .values()
            .filter(|sig| sig.is_payable())
            .map(|sig| sig.name.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl SignatureSource for CatalogSnapshot {
    fn lookup(&self, name: &str) -> Option<Arc<FunctionSignature>> {
        self.functions.get(name).cloned()
    }
}

/// Catalog of one interface, updatable by atomic snapshot replacement.
#[derive(Debug, Default)]
pub struct SchemaCatalog {
    current: RwLock<Arc<CatalogSnapshot>>,
}

impl SchemaCatalog {
    pub fn new(snapshot: CatalogSnapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(snapshot)),
        }
    }

    /// Build a catalog from an interface document (bare array or `{"abi": [...]}`).
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(Self::new(load_snapshot(raw)?))
    }

    /// Read an interface document from disk.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read interface file {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("Failed to load {}", path.display()))
    }

    /// The snapshot in force right now.
    pub fn snapshot(&self) -> Arc<CatalogSnapshot> {
        self.current.read().clone()
    }

    /// Swap in a new snapshot; readers holding the old one keep using it.
    pub fn replace(&self, snapshot: CatalogSnapshot) {
        debug!(functions = snapshot.len(), "replacing catalog snapshot");
        *self.current.write() = Arc::new(snapshot);
    }

    /// Parse a new interface document and swap it in. On error the current
    /// snapshot stays in force.
    pub fn update_from_json(&self, raw: &str) -> Result<()> {
        let snapshot = load_snapshot(raw)?;
        self.replace(snapshot);
        Ok(())
    }

    pub fn function_names(&self) -> Vec<String> {
        self.snapshot().function_names()
    }

    pub fn payable_function_names(&self) -> Vec<String> {
        self.snapshot().payable_function_names()
    }

    /// One line per input: `index: name  type`.
    pub fn describe(&self, name: &str) -> Option<Vec<String>> {
        let sig = self.lookup(name)?;
        Some(
            sig.inputs
                .iter()
                .enumerate()
                .map(|(i, p)| format!("{}: {}  {}", i, p.name, p.node.type_name()))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }
}

impl SignatureSource for SchemaCatalog {
    fn lookup(&self, name: &str) -> Option<Arc<FunctionSignature>> {
        self.current.read().lookup(name)
    }
}

fn load_snapshot(raw: &str) -> Result<CatalogSnapshot> {
    let signatures = parse_interface(raw)?;
    if signatures.is_empty() {
        return Err(anyhow!("no available functions found in interface"));
    }
    Ok(CatalogSnapshot::new(signatures))
}
