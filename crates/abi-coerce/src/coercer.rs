//! Value Coercer: the recursive engine.
//!
//! [`ValueCoercer::coerce`] dispatches on the schema node alone and never
//! infers structure from the JSON:
//!
//! | Node | Strategy |
//! |------|----------|
//! | `Primitive` | direct decode into the scalar kind |
//! | `FixedBytes` / `DynamicBytes` | Byte Normalizer |
//! | `FixedArray` / `Sequence` | element-wise recursion over a JSON array |
//! | `Tuple` | keyed (JSON object), else positional (JSON array) |
//! | `Function` | structural fallback into the 24-byte native shape |
//!
//! Errors return immediately; nothing is defaulted or partially filled.

use abi_schema::{PrimitiveKind, TupleField, TypeNode};
use serde_json::{Map, Value as JsonValue};
use tracing::{debug, trace};

use crate::bytes::{decode_byte_array, fit, normalize_bytes, ByteSlot};
use crate::config::{CoercionConfig, OverflowPolicy};
use crate::error::{describe_json, CoerceError, CoerceErrorKind, CoerceResult};
use crate::numeric::decode_integer;
use crate::value::AbiValue;

/// Width of an external function reference (address + selector).
const FUNCTION_REF_LEN: usize = 24;

// =============================================================================
// Record Slots
// =============================================================================

/// A tuple under construction, one slot per declared field.
///
/// Every decoded child passes through [`RecordSlots::assign`], which is where
/// index, occupancy and assignability are checked.
#[derive(Debug)]
pub struct RecordSlots<'a> {
    fields: &'a [TupleField],
    slots: Vec<Option<AbiValue>>,
}

impl<'a> RecordSlots<'a> {
    pub fn new(fields: &'a [TupleField]) -> Self {
        Self::with_slot_count(fields, fields.len())
    }

    /// A record with an explicit number of physical slots, which may differ
    /// from the number of declared fields.
    pub fn with_slot_count(fields: &'a [TupleField], slot_count: usize) -> Self {
        Self {
            fields,
            slots: vec![None; slot_count],
        }
    }

    /// Place `value` into slot `index`.
    pub fn assign(&mut self, index: usize, value: AbiValue) -> Result<(), CoerceErrorKind> {
        let field = match self.fields.get(index) {
            Some(field) if index < self.slots.len() => field,
            field => {
                return Err(CoerceErrorKind::TupleFieldIndexOutOfRange {
                    index,
                    field: field.map(|f| f.name.clone()).unwrap_or_default(),
                    slots: self.slots.len().min(self.fields.len()),
                });
            }
        };

        if self.slots[index].is_some() {
            return Err(CoerceErrorKind::SlotNotSettable { index });
        }

        if !value.conforms_to(&field.node) {
            return Err(CoerceErrorKind::ValueNotAssignable {
                index,
                expected: field.node.type_name(),
                found: value.kind_name(),
            });
        }

        self.slots[index] = Some(value);
        Ok(())
    }

    /// Close the record. Every slot must have been filled.
    pub fn finish(self) -> Result<AbiValue, CoerceErrorKind> {
        let values = self
            .slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| slot.ok_or(CoerceErrorKind::SlotNotSettable { index }))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(AbiValue::Tuple(values))
    }
}

// =============================================================================
// Value Coercer
// =============================================================================

/// Converts JSON values into [`AbiValue`]s that conform to a [`TypeNode`].
///
/// Holds only configuration; the schema is borrowed read-only per call, so one
/// coercer can serve any number of threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueCoercer {
    config: CoercionConfig,
}

impl ValueCoercer {
    pub fn new(config: CoercionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CoercionConfig {
        &self.config
    }

    /// Coerce `json` against `node`.
    pub fn coerce(&self, json: &JsonValue, node: &TypeNode) -> CoerceResult<AbiValue> {
        trace!(node = %node, shape = %describe_json(json), "coerce");
        match node {
            TypeNode::Primitive(kind) => self.coerce_primitive(json, *kind).map_err(Into::into),
            TypeNode::FixedBytes(size) => {
                normalize_bytes(json, ByteSlot::Fixed(*size), self.config.overflow)
                    .map_err(Into::into)
            }
            TypeNode::DynamicBytes => {
                normalize_bytes(json, ByteSlot::Dynamic, self.config.overflow).map_err(Into::into)
            }
            TypeNode::FixedArray { elem, len } => self.coerce_list(json, node, elem, Some(*len)),
            TypeNode::Sequence(elem) => self.coerce_list(json, node, elem, None),
            TypeNode::Tuple(fields) => self.coerce_tuple(json, node, fields),
            TypeNode::Function => self.coerce_fallback(json, node).map_err(Into::into),
        }
    }

    fn coerce_primitive(
        &self,
        json: &JsonValue,
        kind: PrimitiveKind,
    ) -> Result<AbiValue, CoerceErrorKind> {
        let fail = |reason: String| CoerceErrorKind::decode(kind.type_name(), reason);
        match kind {
            PrimitiveKind::Uint(bits) => {
                let word = decode_integer(json, false, bits, self.config.numeric_strings)
                    .map_err(fail)?;
                Ok(AbiValue::Uint { bits, word })
            }
            PrimitiveKind::Int(bits) => {
                let word = decode_integer(json, true, bits, self.config.numeric_strings)
                    .map_err(fail)?;
                Ok(AbiValue::Int { bits, word })
            }
            PrimitiveKind::Bool => json
                .as_bool()
                .map(AbiValue::Bool)
                .ok_or_else(|| fail(format!("expected boolean, found {}", describe_json(json)))),
            PrimitiveKind::String => json
                .as_str()
                .map(|s| AbiValue::String(s.to_string()))
                .ok_or_else(|| fail(format!("expected string, found {}", describe_json(json)))),
            PrimitiveKind::Address => {
                let s = json
                    .as_str()
                    .ok_or_else(|| fail(format!("expected hex string, found {}", describe_json(json))))?;
                parse_address(s).map(AbiValue::Address).map_err(fail)
            }
        }
    }

    fn coerce_list(
        &self,
        json: &JsonValue,
        node: &TypeNode,
        elem: &TypeNode,
        fixed_len: Option<usize>,
    ) -> CoerceResult<AbiValue> {
        let items = json
            .as_array()
            .ok_or_else(|| CoerceErrorKind::shape(format!("array for {}", node.type_name()), json))?;

        let take = match fixed_len {
            Some(len) if items.len() < len => {
                return Err(CoerceErrorKind::shape(
                    format!("array of {} elements for {}", len, node.type_name()),
                    json,
                )
                .into());
            }
            Some(len) if items.len() > len => match self.config.overflow {
                OverflowPolicy::Reject => {
                    return Err(CoerceErrorKind::ElementIndexOutOfRange { index: len, len }.into());
                }
                OverflowPolicy::Truncate => {
                    debug!(declared = len, supplied = items.len(), "dropping excess array elements");
                    len
                }
            },
            _ => items.len(),
        };

        let mut values = Vec::with_capacity(take);
        for (i, item) in items.iter().take(take).enumerate() {
            let value = self.coerce(item, elem).map_err(|e| e.at_index(i))?;
            if !value.conforms_to(elem) {
                return Err(CoerceErrorKind::ValueNotAssignable {
                    index: i,
                    expected: elem.type_name(),
                    found: value.kind_name(),
                }
                .into());
            }
            values.push(value);
        }

        Ok(match fixed_len {
            Some(_) => AbiValue::Array(values),
            None => AbiValue::Sequence(values),
        })
    }

    fn coerce_tuple(
        &self,
        json: &JsonValue,
        node: &TypeNode,
        fields: &[TupleField],
    ) -> CoerceResult<AbiValue> {
        match json {
            JsonValue::Object(map) => self.coerce_tuple_keyed(map, fields),
            JsonValue::Array(items) => {
                debug!(tuple = %node, "binding tuple positionally");
                self.coerce_tuple_positional(json, items, node, fields)
            }
            other => Err(CoerceErrorKind::shape(
                format!("object or array for tuple {}", node.type_name()),
                other,
            )
            .into()),
        }
    }

    /// Keyed path: every declared field name must be present.
    fn coerce_tuple_keyed(
        &self,
        map: &Map<String, JsonValue>,
        fields: &[TupleField],
    ) -> CoerceResult<AbiValue> {
        let mut record = RecordSlots::new(fields);
        for (i, field) in fields.iter().enumerate() {
            let raw = map.get(&field.name).ok_or_else(|| CoerceErrorKind::MissingTupleField {
                index: i,
                field: field.name.clone(),
                available: map.keys().cloned().collect(),
            })?;
            let value = self
                .coerce(raw, &field.node)
                .map_err(|e| at_field(e, i, &field.name))?;
            record.assign(i, value)?;
        }
        Ok(record.finish()?)
    }

    /// Positional path: array element `i` binds to field `i`. Field names are
    /// not consulted, so the caller's array order must match declaration order.
    fn coerce_tuple_positional(
        &self,
        json: &JsonValue,
        items: &[JsonValue],
        node: &TypeNode,
        fields: &[TupleField],
    ) -> CoerceResult<AbiValue> {
        if items.len() < fields.len() {
            return Err(CoerceErrorKind::shape(
                format!(
                    "array of at least {} elements for tuple {}",
                    fields.len(),
                    node.type_name()
                ),
                json,
            )
            .into());
        }

        let mut record = RecordSlots::new(fields);
        for (i, (field, raw)) in fields.iter().zip(items).enumerate() {
            let value = self
                .coerce(raw, &field.node)
                .map_err(|e| at_field(e, i, &field.name))?;
            record.assign(i, value)?;
        }
        Ok(record.finish()?)
    }

    /// Structural decode for nodes without a dedicated strategy.
    fn coerce_fallback(&self, json: &JsonValue, node: &TypeNode) -> Result<AbiValue, CoerceErrorKind> {
        let type_name = node.type_name();
        let buffer = decode_byte_array(json, &type_name)?;
        let fitted = fit(buffer, ByteSlot::Fixed(FUNCTION_REF_LEN), self.config.overflow)
            .map_err(|_| {
                CoerceErrorKind::decode(
                    type_name.clone(),
                    format!("more than {} bytes", FUNCTION_REF_LEN),
                )
            })?;
        let mut out = [0u8; FUNCTION_REF_LEN];
        if let Some(bytes) = fitted.as_bytes() {
            out.copy_from_slice(bytes);
        }
        Ok(AbiValue::Function(out))
    }
}

/// Name a child segment by field name, or by index for unnamed components.
fn at_field(err: CoerceError, index: usize, name: &str) -> CoerceError {
    if name.is_empty() {
        err.at_index(index)
    } else {
        err.at_field(name)
    }
}

/// `0x` followed by exactly 40 hex digits.
fn parse_address(s: &str) -> Result<[u8; 20], String> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .ok_or_else(|| format!("address '{}' lacks 0x prefix", s))?;
    if digits.len() != 40 {
        return Err(format!(
            "address '{}' has {} hex digits, expected 40",
            s,
            digits.len()
        ));
    }
    let bytes = hex::decode(digits).map_err(|e| format!("invalid address '{}': {}", s, e))?;
    let mut out = [0u8; 20];
    out.copy_from_slice(&bytes);
    Ok(out)
}
