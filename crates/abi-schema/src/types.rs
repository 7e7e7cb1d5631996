//! Schema model for interface parameter type trees.
//!
//! A [`TypeNode`] is one position in a parameter's type tree. Composite nodes
//! (`FixedArray`, `Sequence`, `Tuple`) own their children, so every tree is
//! finite and fully determined by the interface it was parsed from.

use sha3::{Digest, Keccak256};
use std::fmt;

// =============================================================================
// Type Nodes
// =============================================================================

/// Scalar leaf kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    /// Unsigned integer of the given bit width (8..=256, multiple of 8).
    Uint(u16),
    /// Signed two's complement integer of the given bit width.
    Int(u16),
    Bool,
    /// 20-byte account address.
    Address,
    /// UTF-8 string.
    String,
}

impl PrimitiveKind {
    /// Canonical type string (e.g. "uint256", "address").
    pub fn type_name(&self) -> String {
        match self {
            PrimitiveKind::Uint(bits) => format!("uint{}", bits),
            PrimitiveKind::Int(bits) => format!("int{}", bits),
            PrimitiveKind::Bool => "bool".to_string(),
            PrimitiveKind::Address => "address".to_string(),
            PrimitiveKind::String => "string".to_string(),
        }
    }
}

/// One named field of a tuple. Field order is authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TupleField {
    pub name: String,
    pub node: TypeNode,
}

impl TupleField {
    pub fn new(name: impl Into<String>, node: TypeNode) -> Self {
        Self {
            name: name.into(),
            node,
        }
    }
}

/// A node in a parameter type tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeNode {
    Primitive(PrimitiveKind),
    /// Exactly `size` bytes (1..=32).
    FixedBytes(usize),
    /// Byte sequence of unbounded length.
    DynamicBytes,
    /// Exactly `len` elements of `elem`.
    FixedArray { elem: Box<TypeNode>, len: usize },
    /// Variable-length list of `elem`.
    Sequence(Box<TypeNode>),
    /// Record with ordered, named fields.
    Tuple(Vec<TupleField>),
    /// External function reference (20-byte address followed by a 4-byte selector).
    Function,
}

impl TypeNode {
    pub fn uint(bits: u16) -> Self {
        TypeNode::Primitive(PrimitiveKind::Uint(bits))
    }

    pub fn int(bits: u16) -> Self {
        TypeNode::Primitive(PrimitiveKind::Int(bits))
    }

    pub fn bool() -> Self {
        TypeNode::Primitive(PrimitiveKind::Bool)
    }

    pub fn address() -> Self {
        TypeNode::Primitive(PrimitiveKind::Address)
    }

    pub fn string() -> Self {
        TypeNode::Primitive(PrimitiveKind::String)
    }

    pub fn fixed_array(elem: TypeNode, len: usize) -> Self {
        TypeNode::FixedArray {
            elem: Box::new(elem),
            len,
        }
    }

    pub fn sequence(elem: TypeNode) -> Self {
        TypeNode::Sequence(Box::new(elem))
    }

    /// Render the canonical type string used in function signatures.
    ///
    /// Tuples render as their parenthesized component list, so
    /// `Sequence(Tuple[address, uint256])` becomes `(address,uint256)[]`.
    pub fn type_name(&self) -> String {
        match self {
            TypeNode::Primitive(kind) => kind.type_name(),
            TypeNode::FixedBytes(size) => format!("bytes{}", size),
            TypeNode::DynamicBytes => "bytes".to_string(),
            TypeNode::FixedArray { elem, len } => format!("{}[{}]", elem.type_name(), len),
            TypeNode::Sequence(elem) => format!("{}[]", elem.type_name()),
            TypeNode::Tuple(fields) => {
                let inner = fields
                    .iter()
                    .map(|f| f.node.type_name())
                    .collect::<Vec<_>>()
                    .join(",");
                format!("({})", inner)
            }
            TypeNode::Function => "function".to_string(),
        }
    }

    /// Whether the encoded form of this node has a variable length.
    pub fn is_dynamic(&self) -> bool {
        match self {
            TypeNode::Primitive(PrimitiveKind::String) => true,
            TypeNode::Primitive(_) => false,
            TypeNode::FixedBytes(_) | TypeNode::Function => false,
            TypeNode::DynamicBytes | TypeNode::Sequence(_) => true,
            TypeNode::FixedArray { elem, .. } => elem.is_dynamic(),
            TypeNode::Tuple(fields) => fields.iter().any(|f| f.node.is_dynamic()),
        }
    }
}

impl fmt::Display for TypeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

// =============================================================================
// Function Signatures
// =============================================================================

/// A named function parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub node: TypeNode,
}

impl Param {
    pub fn new(name: impl Into<String>, node: TypeNode) -> Self {
        Self {
            name: name.into(),
            node,
        }
    }
}

/// State mutability declared by the interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StateMutability {
    Pure,
    View,
    #[default]
    NonPayable,
    Payable,
}

impl StateMutability {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pure" => Some(StateMutability::Pure),
            "view" => Some(StateMutability::View),
            "nonpayable" => Some(StateMutability::NonPayable),
            "payable" => Some(StateMutability::Payable),
            _ => None,
        }
    }
}

/// A function name plus its ordered parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSignature {
    /// Name the catalog resolves (may carry an overload suffix).
    pub name: String,
    /// Name as declared in the interface.
    pub raw_name: String,
    pub inputs: Vec<Param>,
    pub state_mutability: StateMutability,
}

impl FunctionSignature {
    pub fn new(name: impl Into<String>, inputs: Vec<Param>) -> Self {
        let name = name.into();
        Self {
            raw_name: name.clone(),
            name,
            inputs,
            state_mutability: StateMutability::default(),
        }
    }

    pub fn with_state_mutability(mut self, state_mutability: StateMutability) -> Self {
        self.state_mutability = state_mutability;
        self
    }

    /// `raw_name(type,type,...)`, the form hashed into a selector.
    pub fn canonical(&self) -> String {
        let types = self
            .inputs
            .iter()
            .map(|p| p.node.type_name())
            .collect::<Vec<_>>()
            .join(",");
        format!("{}({})", self.raw_name, types)
    }

    /// First four bytes of the Keccak-256 hash of [`canonical`](Self::canonical).
    pub fn selector(&self) -> [u8; 4] {
        let hash = Keccak256::digest(self.canonical().as_bytes());
        let mut out = [0u8; 4];
        out.copy_from_slice(&hash[..4]);
        out
    }

    pub fn is_payable(&self) -> bool {
        self.state_mutability == StateMutability::Payable
    }

    /// Parameter nodes in declared order.
    pub fn nodes(&self) -> impl Iterator<Item = &TypeNode> {
        self.inputs.iter().map(|p| &p.node)
    }
}
