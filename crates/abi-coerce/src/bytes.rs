//! Byte Normalizer.
//!
//! Converts a JSON scalar into a byte buffer and fits it into a fixed-size or
//! variable-size slot. String inputs are tried in order, first success wins:
//!
//! 1. `0x`-prefixed hex
//! 2. bare hex (even length, hex alphabet)
//! 3. the string's raw UTF-8 bytes
//!
//! Non-string inputs fall back to the native byte-array shape: a JSON array
//! of integers in `0..=255`.

use serde_json::Value as JsonValue;
use tracing::debug;

use crate::config::OverflowPolicy;
use crate::error::CoerceErrorKind;
use crate::value::AbiValue;

/// Target slot for byte data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteSlot {
    Fixed(usize),
    Dynamic,
}

impl ByteSlot {
    pub fn type_name(&self) -> String {
        match self {
            ByteSlot::Fixed(size) => format!("bytes{}", size),
            ByteSlot::Dynamic => "bytes".to_string(),
        }
    }
}

/// Decode a string into bytes using the textual precedence above.
/// Never fails: raw bytes are always available as the last resort.
pub fn decode_text(s: &str) -> Vec<u8> {
    if let Some(stripped) = s.strip_prefix("0x") {
        match hex::decode(stripped) {
            Ok(bytes) => return bytes,
            Err(e) => debug!(input = s, error = %e, "prefixed hex decode failed, trying bare hex"),
        }
    }
    match hex::decode(s) {
        Ok(bytes) => bytes,
        Err(_) => {
            debug!(input = s, "not hex, using raw text bytes");
            s.as_bytes().to_vec()
        }
    }
}

/// Normalize `json` into a value for `slot`.
pub fn normalize_bytes(
    json: &JsonValue,
    slot: ByteSlot,
    overflow: OverflowPolicy,
) -> Result<AbiValue, CoerceErrorKind> {
    let buffer = match json {
        JsonValue::String(s) => decode_text(s),
        other => {
            debug!(slot = %slot.type_name(), "byte input is not a string, decoding structurally");
            decode_byte_array(other, &slot.type_name())?
        }
    };
    fit(buffer, slot, overflow)
}

/// Place a decoded buffer into its slot.
///
/// Fixed slots are zero-filled on the right. Longer buffers are rejected or
/// truncated per `overflow`. Dynamic slots take the buffer as-is.
pub fn fit(
    buffer: Vec<u8>,
    slot: ByteSlot,
    overflow: OverflowPolicy,
) -> Result<AbiValue, CoerceErrorKind> {
    match slot {
        ByteSlot::Dynamic => Ok(AbiValue::Bytes(buffer)),
        ByteSlot::Fixed(size) => {
            if buffer.len() > size && overflow == OverflowPolicy::Reject {
                return Err(CoerceErrorKind::SourceTooLarge {
                    type_name: slot.type_name(),
                    capacity: size,
                    actual: buffer.len(),
                });
            }
            let mut out = vec![0u8; size];
            let n = buffer.len().min(size);
            out[..n].copy_from_slice(&buffer[..n]);
            Ok(AbiValue::FixedBytes(out))
        }
    }
}

/// Decode the native byte-array shape: an array of integers 0..=255.
/// Failures name `type_name`.
pub(crate) fn decode_byte_array(
    json: &JsonValue,
    type_name: &str,
) -> Result<Vec<u8>, CoerceErrorKind> {
    let items = json.as_array().ok_or_else(|| {
        CoerceErrorKind::decode(
            type_name,
            format!(
                "expected hex string, text or byte array, found {}",
                crate::error::describe_json(json)
            ),
        )
    })?;

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            item.as_u64()
                .filter(|b| *b <= u8::MAX as u64)
                .map(|b| b as u8)
                .ok_or_else(|| {
                    CoerceErrorKind::decode(
                        type_name,
                        format!("element {} is not a byte: {}", i, item),
                    )
                })
        })
        .collect()
}
