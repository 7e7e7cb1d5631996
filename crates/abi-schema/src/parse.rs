//! Type string parsing.
//!
//! Turns interface type strings such as `uint256`, `bytes4[]` or `tuple[2]`
//! into [`TypeNode`] trees. Array suffixes apply innermost-first, so
//! `uint8[2][]` is a sequence of two-element arrays.

use anyhow::{anyhow, bail, Result};

use crate::types::{PrimitiveKind, TupleField, TypeNode};

/// Parse a type string into a [`TypeNode`].
///
/// `components` carries the already-parsed fields for `tuple` base types and
/// is ignored for every other base type.
///
/// # Examples
///
/// ```
/// use abi_schema::parse_type;
/// use abi_schema::TypeNode;
///
/// let node = parse_type("uint8[2][]", None).unwrap();
/// assert_eq!(node, TypeNode::sequence(TypeNode::fixed_array(TypeNode::uint(8), 2)));
/// ```
pub fn parse_type(type_str: &str, components: Option<Vec<TupleField>>) -> Result<TypeNode> {
    let type_str = type_str.trim();
    let (base, suffixes) = match type_str.find('[') {
        Some(idx) => (&type_str[..idx], &type_str[idx..]),
        None => (type_str, ""),
    };

    let mut node = parse_base(base, components)
        .map_err(|e| anyhow!("Invalid type '{}': {}", type_str, e))?;

    for dim in parse_array_suffixes(suffixes)
        .map_err(|e| anyhow!("Invalid type '{}': {}", type_str, e))?
    {
        node = match dim {
            Some(len) => TypeNode::fixed_array(node, len),
            None => TypeNode::sequence(node),
        };
    }
    Ok(node)
}

/// Parse the part of a type string before any array suffix.
fn parse_base(base: &str, components: Option<Vec<TupleField>>) -> Result<TypeNode> {
    match base {
        "bool" => return Ok(TypeNode::bool()),
        "address" => return Ok(TypeNode::address()),
        "string" => return Ok(TypeNode::string()),
        "bytes" => return Ok(TypeNode::DynamicBytes),
        "function" => return Ok(TypeNode::Function),
        "uint" => return Ok(TypeNode::uint(256)),
        "int" => return Ok(TypeNode::int(256)),
        "tuple" => {
            let fields = components.ok_or_else(|| anyhow!("tuple without components"))?;
            return Ok(TypeNode::Tuple(fields));
        }
        "" => bail!("empty type"),
        _ => {}
    }

    if let Some(bits) = base.strip_prefix("uint") {
        return Ok(TypeNode::Primitive(PrimitiveKind::Uint(parse_bit_width(bits)?)));
    }
    if let Some(bits) = base.strip_prefix("int") {
        return Ok(TypeNode::Primitive(PrimitiveKind::Int(parse_bit_width(bits)?)));
    }
    if let Some(size) = base.strip_prefix("bytes") {
        let size: usize = size
            .parse()
            .map_err(|_| anyhow!("unknown base type '{}'", base))?;
        if !(1..=32).contains(&size) {
            bail!("bytes size {} outside 1..=32", size);
        }
        return Ok(TypeNode::FixedBytes(size));
    }

    Err(anyhow!("unknown base type '{}'", base))
}

fn parse_bit_width(bits: &str) -> Result<u16> {
    let width: u16 = bits
        .parse()
        .map_err(|_| anyhow!("invalid integer width '{}'", bits))?;
    if width == 0 || width > 256 || width % 8 != 0 {
        bail!("integer width {} is not a multiple of 8 in 8..=256", width);
    }
    Ok(width)
}

/// Parse `[2][]...` into dimensions, `None` marking a dynamic dimension.
fn parse_array_suffixes(mut suffixes: &str) -> Result<Vec<Option<usize>>> {
    let mut dims = Vec::new();
    while !suffixes.is_empty() {
        let rest = suffixes
            .strip_prefix('[')
            .ok_or_else(|| anyhow!("unexpected '{}' after array suffix", suffixes))?;
        let close = rest
            .find(']')
            .ok_or_else(|| anyhow!("unbalanced '[' in array suffix"))?;
        let inner = &rest[..close];
        if inner.is_empty() {
            dims.push(None);
        } else {
            let len: usize = inner
                .parse()
                .map_err(|_| anyhow!("invalid array length '{}'", inner))?;
            dims.push(Some(len));
        }
        suffixes = &rest[close + 1..];
    }
    Ok(dims)
}
