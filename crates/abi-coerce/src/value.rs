//! Typed values produced by coercion.
//!
//! An [`AbiValue`] mirrors the [`TypeNode`] it was accepted against. Integers
//! are stored as 32-byte big-endian words (two's complement for signed
//! kinds) together with their declared width.

use abi_schema::{PrimitiveKind, TypeNode};
use std::fmt;

// =============================================================================
// Word
// =============================================================================

/// A 256-bit big-endian machine word.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Word(pub [u8; 32]);

impl Word {
    pub const ZERO: Word = Word([0u8; 32]);

    pub fn from_u128(v: u128) -> Self {
        let mut out = [0u8; 32];
        out[16..].copy_from_slice(&v.to_be_bytes());
        Word(out)
    }

    pub fn from_i128(v: i128) -> Self {
        let fill = if v < 0 { 0xff } else { 0x00 };
        let mut out = [fill; 32];
        out[16..].copy_from_slice(&v.to_be_bytes());
        Word(out)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Number of significant bits when read as unsigned.
    pub fn bit_len(&self) -> usize {
        match self.0.iter().position(|b| *b != 0) {
            Some(idx) => (32 - idx) * 8 - self.0[idx].leading_zeros() as usize,
            None => 0,
        }
    }

    /// Two's complement negation.
    pub fn negate(&self) -> Word {
        let mut out = [0u8; 32];
        let mut carry = 1u16;
        for i in (0..32).rev() {
            let v = (!self.0[i]) as u16 + carry;
            out[i] = v as u8;
            carry = v >> 8;
        }
        Word(out)
    }
}

impl fmt::Debug for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Word(0x{})", hex::encode(self.0))
    }
}

// =============================================================================
// AbiValue
// =============================================================================

/// A fully typed value, ready for the encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbiValue {
    Uint { bits: u16, word: Word },
    Int { bits: u16, word: Word },
    Bool(bool),
    Address([u8; 20]),
    String(String),
    /// Exactly the slot's size.
    FixedBytes(Vec<u8>),
    Bytes(Vec<u8>),
    Function([u8; 24]),
    /// Fixed-length array.
    Array(Vec<AbiValue>),
    Sequence(Vec<AbiValue>),
    /// Positional record in the tuple's field order.
    Tuple(Vec<AbiValue>),
}

impl AbiValue {
    pub fn uint(bits: u16, v: u128) -> Self {
        AbiValue::Uint {
            bits,
            word: Word::from_u128(v),
        }
    }

    pub fn int(bits: u16, v: i128) -> Self {
        AbiValue::Int {
            bits,
            word: Word::from_i128(v),
        }
    }

    /// Short description used in diagnostics.
    pub fn kind_name(&self) -> String {
        match self {
            AbiValue::Uint { bits, .. } => format!("uint{}", bits),
            AbiValue::Int { bits, .. } => format!("int{}", bits),
            AbiValue::Bool(_) => "bool".to_string(),
            AbiValue::Address(_) => "address".to_string(),
            AbiValue::String(_) => "string".to_string(),
            AbiValue::FixedBytes(b) => format!("bytes{}", b.len()),
            AbiValue::Bytes(_) => "bytes".to_string(),
            AbiValue::Function(_) => "function".to_string(),
            AbiValue::Array(items) => format!("array[{}]", items.len()),
            AbiValue::Sequence(items) => format!("sequence[{}]", items.len()),
            AbiValue::Tuple(items) => format!("tuple of {}", items.len()),
        }
    }

    /// Shallow check that this value can occupy a slot of type `node`.
    ///
    /// Children are not revisited; they were checked when they were placed.
    pub fn conforms_to(&self, node: &TypeNode) -> bool {
        match (self, node) {
            (AbiValue::Uint { bits, .. }, TypeNode::Primitive(PrimitiveKind::Uint(n))) => bits == n,
            (AbiValue::Int { bits, .. }, TypeNode::Primitive(PrimitiveKind::Int(n))) => bits == n,
            (AbiValue::Bool(_), TypeNode::Primitive(PrimitiveKind::Bool)) => true,
            (AbiValue::Address(_), TypeNode::Primitive(PrimitiveKind::Address)) => true,
            (AbiValue::String(_), TypeNode::Primitive(PrimitiveKind::String)) => true,
            (AbiValue::FixedBytes(b), TypeNode::FixedBytes(size)) => b.len() == *size,
            (AbiValue::Bytes(_), TypeNode::DynamicBytes) => true,
            (AbiValue::Function(_), TypeNode::Function) => true,
            (AbiValue::Array(items), TypeNode::FixedArray { len, .. }) => items.len() == *len,
            (AbiValue::Sequence(_), TypeNode::Sequence(_)) => true,
            (AbiValue::Tuple(items), TypeNode::Tuple(fields)) => items.len() == fields.len(),
            _ => false,
        }
    }

    /// Raw bytes of byte-like values.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            AbiValue::FixedBytes(b) | AbiValue::Bytes(b) => Some(b.as_slice()),
            AbiValue::Function(b) => Some(&b[..]),
            AbiValue::Address(b) => Some(&b[..]),
            _ => None,
        }
    }

    /// Children of composite values.
    pub fn items(&self) -> Option<&[AbiValue]> {
        match self {
            AbiValue::Array(items) | AbiValue::Sequence(items) | AbiValue::Tuple(items) => {
                Some(items.as_slice())
            }
            _ => None,
        }
    }
}
