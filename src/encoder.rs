//! Encoder Boundary: typed argument lists into call data.
//!
//! [`AbiEncoder`] performs the standard head/tail packing of an argument
//! list. Every value occupies whole 32-byte words:
//!
//! - static values (integers, `bool`, `address`, `bytesN`, `function`, and
//!   fixed arrays / tuples of static values) are written inline in the head
//! - dynamic values (`bytes`, `string`, sequences, and anything containing
//!   them) leave an offset in the head and put their data in the tail
//!
//! [`ArgumentEncoder::encode`] yields the packed arguments alone;
//! [`ArgumentEncoder::encode_call`] prefixes them with the 4-byte selector.

use abi_coerce::AbiValue;
use abi_schema::{FunctionSignature, PrimitiveKind, TypeNode};
use anyhow::{anyhow, bail, Result};

const WORD: usize = 32;

/// Turns a coerced argument list into bytes.
pub trait ArgumentEncoder {
    fn encode(&self, signature: &FunctionSignature, values: &[AbiValue]) -> Result<Vec<u8>>;

    /// Selector followed by the packed arguments.
    fn encode_call(&self, signature: &FunctionSignature, values: &[AbiValue]) -> Result<Vec<u8>> {
        let mut out = signature.selector().to_vec();
        out.extend(self.encode(signature, values)?);
        Ok(out)
    }
}

/// Standard head/tail argument packing.
#[derive(Debug, Clone, Copy, Default)]
pub struct AbiEncoder;

impl AbiEncoder {
    pub fn new() -> Self {
        Self
    }

    fn encode_sequence(&self, nodes: &[&TypeNode], values: &[AbiValue]) -> Result<Vec<u8>> {
        if nodes.len() != values.len() {
            bail!("expected {} values, got {}", nodes.len(), values.len());
        }

        let head_len: usize = nodes
            .iter()
            .map(|node| {
                if node.is_dynamic() {
                    WORD
                } else {
                    static_size(node)
                }
            })
            .sum();

        let mut head = Vec::with_capacity(head_len);
        let mut tail = Vec::new();
        for (node, value) in nodes.iter().zip(values) {
            let encoded = self.encode_value(node, value)?;
            if node.is_dynamic() {
                head.extend_from_slice(&usize_word(head_len + tail.len()));
                tail.extend_from_slice(&encoded);
            } else {
                head.extend_from_slice(&encoded);
            }
        }
        head.extend_from_slice(&tail);
        Ok(head)
    }

    fn encode_value(&self, node: &TypeNode, value: &AbiValue) -> Result<Vec<u8>> {
        if !value.conforms_to(node) {
            bail!("value {} does not conform to {}", value.kind_name(), node.type_name());
        }

        match (node, value) {
            (TypeNode::Primitive(_), AbiValue::Uint { word, .. })
            | (TypeNode::Primitive(_), AbiValue::Int { word, .. }) => Ok(word.as_bytes().to_vec()),
            (TypeNode::Primitive(PrimitiveKind::Bool), AbiValue::Bool(b)) => {
                Ok(usize_word(*b as usize).to_vec())
            }
            (TypeNode::Primitive(PrimitiveKind::Address), AbiValue::Address(addr)) => {
                let mut out = vec![0u8; WORD];
                out[WORD - addr.len()..].copy_from_slice(addr);
                Ok(out)
            }
            (TypeNode::Primitive(PrimitiveKind::String), AbiValue::String(s)) => {
                Ok(length_prefixed(s.as_bytes()))
            }
            (TypeNode::FixedBytes(_), AbiValue::FixedBytes(bytes)) => Ok(right_padded(bytes)),
            (TypeNode::Function, AbiValue::Function(bytes)) => Ok(right_padded(bytes)),
            (TypeNode::DynamicBytes, AbiValue::Bytes(bytes)) => Ok(length_prefixed(bytes)),
            (TypeNode::FixedArray { elem, len }, AbiValue::Array(items)) => {
                let nodes = vec![elem.as_ref(); *len];
                self.encode_sequence(&nodes, items)
            }
            (TypeNode::Sequence(elem), AbiValue::Sequence(items)) => {
                let nodes = vec![elem.as_ref(); items.len()];
                let mut out = usize_word(items.len()).to_vec();
                out.extend(self.encode_sequence(&nodes, items)?);
                Ok(out)
            }
            (TypeNode::Tuple(fields), AbiValue::Tuple(items)) => {
                let nodes: Vec<&TypeNode> = fields.iter().map(|f| &f.node).collect();
                self.encode_sequence(&nodes, items)
            }
            (node, value) => Err(anyhow!(
                "no encoding for {} as {}",
                value.kind_name(),
                node.type_name()
            )),
        }
    }
}

impl ArgumentEncoder for AbiEncoder {
    fn encode(&self, signature: &FunctionSignature, values: &[AbiValue]) -> Result<Vec<u8>> {
        let nodes: Vec<&TypeNode> = signature.nodes().collect();
        self.encode_sequence(&nodes, values)
            .map_err(|e| anyhow!("Failed to encode arguments of {}: {}", signature.canonical(), e))
    }
}

/// Head size of a static node in bytes.
fn static_size(node: &TypeNode) -> usize {
    match node {
        TypeNode::FixedArray { elem, len } => static_size(elem) * len,
        TypeNode::Tuple(fields) => fields.iter().map(|f| static_size(&f.node)).sum(),
        _ => WORD,
    }
}

fn usize_word(n: usize) -> [u8; WORD] {
    let mut out = [0u8; WORD];
    out[WORD - 8..].copy_from_slice(&(n as u64).to_be_bytes());
    out
}

fn right_padded(bytes: &[u8]) -> Vec<u8> {
    let padded_len = bytes.len().div_ceil(WORD) * WORD;
    let mut out = bytes.to_vec();
    out.resize(padded_len, 0);
    out
}

fn length_prefixed(bytes: &[u8]) -> Vec<u8> {
    let mut out = usize_word(bytes.len()).to_vec();
    out.extend(right_padded(bytes));
    out
}
