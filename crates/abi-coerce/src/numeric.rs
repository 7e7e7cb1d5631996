//! Integer decoding for `uintN` / `intN` parameters.
//!
//! JSON integer literals are read digit-for-digit (serde_json keeps the
//! literal with `arbitrary_precision`), so values above 2^64 are exact.
//! Numeric strings are accepted only when the caller opts in.

use serde_json::Value as JsonValue;

use crate::value::Word;

/// Decode `json` into a word for an integer of `bits` width.
///
/// Returns a human-readable reason on failure; the caller wraps it into a
/// `GenericDecodeFailure` naming the declared type.
pub fn decode_integer(
    json: &JsonValue,
    signed: bool,
    bits: u16,
    numeric_strings: bool,
) -> Result<Word, String> {
    let literal = match json {
        JsonValue::Number(n) => n.to_string(),
        JsonValue::String(s) if numeric_strings => s.trim().to_string(),
        JsonValue::String(s) => {
            return Err(format!("expected number, found string \"{}\"", s));
        }
        JsonValue::Null => return Err("expected number, found null".to_string()),
        JsonValue::Bool(_) => return Err("expected number, found boolean".to_string()),
        JsonValue::Array(_) => return Err("expected number, found array".to_string()),
        JsonValue::Object(_) => return Err("expected number, found object".to_string()),
    };

    let (negative, body) = match literal.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, literal.as_str()),
    };

    let magnitude = match body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
        Some(hex_digits) => parse_hex_magnitude(hex_digits)?,
        None => parse_decimal_magnitude(body)?,
    };

    let width = bits as usize;
    let mag_bits = magnitude.bit_len();

    if magnitude == Word::ZERO {
        return Ok(Word::ZERO);
    }

    if !signed {
        if negative {
            return Err(format!("negative value {} for unsigned type", literal));
        }
        if mag_bits > width {
            return Err(format!("value {} overflows {} bits", literal, width));
        }
        return Ok(magnitude);
    }

    if negative {
        // -2^(bits-1) is the one magnitude that needs all `bits` bits.
        let is_min = mag_bits == width && count_ones(&magnitude) == 1;
        if mag_bits >= width && !is_min {
            return Err(format!("value {} underflows int{}", literal, width));
        }
        Ok(magnitude.negate())
    } else {
        if mag_bits >= width {
            return Err(format!("value {} overflows int{}", literal, width));
        }
        Ok(magnitude)
    }
}

fn count_ones(word: &Word) -> u32 {
    word.0.iter().map(|b| b.count_ones()).sum()
}

/// Parse a decimal digit string into a big-endian 256-bit magnitude.
fn parse_decimal_magnitude(s: &str) -> Result<Word, String> {
    if s.is_empty() {
        return Err("empty number".to_string());
    }
    let mut result = [0u8; 32];
    for ch in s.chars() {
        if !ch.is_ascii_digit() {
            return Err(format!("'{}' is not an integer literal", s));
        }
        let digit = ch as u8 - b'0';
        // result = result * 10 + digit
        let mut carry: u16 = digit as u16;
        for byte in result.iter_mut().rev() {
            let val = (*byte as u16) * 10 + carry;
            *byte = val as u8;
            carry = val >> 8;
        }
        if carry != 0 {
            return Err(format!("'{}' exceeds 256 bits", s));
        }
    }
    Ok(Word(result))
}

/// Parse hex digits (no prefix) into a big-endian 256-bit magnitude.
fn parse_hex_magnitude(s: &str) -> Result<Word, String> {
    let trimmed = s.trim_start_matches('0');
    if s.is_empty() {
        return Err("empty hex number".to_string());
    }
    if trimmed.len() > 64 {
        return Err(format!("0x{} exceeds 256 bits", s));
    }
    let padded = format!("{:0>64}", trimmed);
    let bytes = hex::decode(&padded).map_err(|e| format!("invalid hex number 0x{}: {}", s, e))?;
    let mut out = [0u8; 32];
    out.copy_from_slice(&bytes);
    Ok(Word(out))
}
