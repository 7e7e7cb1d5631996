//! Coercion error taxonomy.
//!
//! A [`CoerceError`] carries the taxonomy kind, the path from the parameter
//! root to the node that failed, and the parameter it happened in. Kinds are
//! raised deep in the recursion; path segments are prepended as the error
//! unwinds, and the Argument Builder attaches the parameter last.

use serde_json::Value as JsonValue;
use std::fmt;

/// Shape of a JSON value, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonShape {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl JsonShape {
    pub fn of(value: &JsonValue) -> Self {
        match value {
            JsonValue::Null => JsonShape::Null,
            JsonValue::Bool(_) => JsonShape::Bool,
            JsonValue::Number(_) => JsonShape::Number,
            JsonValue::String(_) => JsonShape::String,
            JsonValue::Array(_) => JsonShape::Array,
            JsonValue::Object(_) => JsonShape::Object,
        }
    }
}

impl fmt::Display for JsonShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JsonShape::Null => "null",
            JsonShape::Bool => "boolean",
            JsonShape::Number => "number",
            JsonShape::String => "string",
            JsonShape::Array => "array",
            JsonShape::Object => "object",
        };
        f.write_str(s)
    }
}

/// Describe a JSON value for a shape mismatch (`array of 2 elements`, `string`).
pub fn describe_json(value: &JsonValue) -> String {
    match value {
        JsonValue::Array(items) if items.len() == 1 => "array of 1 element".to_string(),
        JsonValue::Array(items) => format!("array of {} elements", items.len()),
        other => JsonShape::of(other).to_string(),
    }
}

/// Taxonomy of coercion failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoerceErrorKind {
    /// Function name absent from the schema catalog.
    MethodNotFound { method: String },

    /// The argument document is not valid JSON.
    MalformedArguments { reason: String },

    /// Fewer arguments than declared parameters.
    MissingArgument { supplied: usize },

    /// More arguments than declared parameters.
    ArgumentCountMismatch { expected: usize, supplied: usize },

    /// A declared tuple field name is absent from a keyed JSON object.
    MissingTupleField {
        index: usize,
        field: String,
        /// Keys the object did carry
        available: Vec<String>,
    },

    /// A field index past the last slot of the record.
    TupleFieldIndexOutOfRange {
        index: usize,
        field: String,
        slots: usize,
    },

    /// An element index past the declared length of a fixed array.
    ElementIndexOutOfRange { index: usize, len: usize },

    /// The JSON value's shape does not match what the node requires.
    ShapeMismatch { expected: String, found: String },

    /// Decoded bytes exceed a fixed-size slot.
    SourceTooLarge {
        type_name: String,
        capacity: usize,
        actual: usize,
    },

    /// A decoded child value cannot be placed into its slot.
    ValueNotAssignable {
        index: usize,
        expected: String,
        found: String,
    },

    /// The slot cannot receive a value (already filled, or left empty at the end).
    SlotNotSettable { index: usize },

    /// Structural decoding of a leaf failed.
    GenericDecodeFailure { type_name: String, reason: String },
}

impl CoerceErrorKind {
    /// Stable identifier of the kind.
    pub fn code(&self) -> &'static str {
        match self {
            CoerceErrorKind::MethodNotFound { .. } => "METHOD_NOT_FOUND",
            CoerceErrorKind::MalformedArguments { .. } => "MALFORMED_ARGUMENTS",
            CoerceErrorKind::MissingArgument { .. } => "MISSING_ARGUMENT",
            CoerceErrorKind::ArgumentCountMismatch { .. } => "ARGUMENT_COUNT_MISMATCH",
            CoerceErrorKind::MissingTupleField { .. } => "MISSING_TUPLE_FIELD",
            CoerceErrorKind::TupleFieldIndexOutOfRange { .. } => "TUPLE_FIELD_INDEX_OUT_OF_RANGE",
            CoerceErrorKind::ElementIndexOutOfRange { .. } => "ELEMENT_INDEX_OUT_OF_RANGE",
            CoerceErrorKind::ShapeMismatch { .. } => "SHAPE_MISMATCH",
            CoerceErrorKind::SourceTooLarge { .. } => "SOURCE_TOO_LARGE",
            CoerceErrorKind::ValueNotAssignable { .. } => "VALUE_NOT_ASSIGNABLE",
            CoerceErrorKind::SlotNotSettable { .. } => "SLOT_NOT_SETTABLE",
            CoerceErrorKind::GenericDecodeFailure { .. } => "GENERIC_DECODE_FAILURE",
        }
    }

    /// True for invariant violations between the schema and the value model.
    /// These signal a bug, not bad input, and must not be retried.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            CoerceErrorKind::SlotNotSettable { .. }
                | CoerceErrorKind::TupleFieldIndexOutOfRange { .. }
        )
    }

    pub(crate) fn shape(expected: impl Into<String>, found: &JsonValue) -> Self {
        CoerceErrorKind::ShapeMismatch {
            expected: expected.into(),
            found: describe_json(found),
        }
    }

    pub(crate) fn decode(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        CoerceErrorKind::GenericDecodeFailure {
            type_name: type_name.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for CoerceErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.code())?;
        match self {
            CoerceErrorKind::MethodNotFound { method } => {
                write!(f, "method '{}' not found in schema", method)
            }
            CoerceErrorKind::MalformedArguments { reason } => {
                write!(f, "argument document is not valid JSON: {}", reason)
            }
            CoerceErrorKind::MissingArgument { supplied } => {
                write!(f, "no argument supplied (only {} given)", supplied)
            }
            CoerceErrorKind::ArgumentCountMismatch { expected, supplied } => write!(
                f,
                "expected {} arguments, got {}",
                expected, supplied
            ),
            CoerceErrorKind::MissingTupleField {
                index,
                field,
                available,
            } => {
                write!(f, "missing struct field '{}' (index {})", field, index)?;
                if !available.is_empty() {
                    write!(f, "; object has [{}]", available.join(", "))?;
                }
                Ok(())
            }
            CoerceErrorKind::TupleFieldIndexOutOfRange {
                index,
                field,
                slots,
            } => write!(
                f,
                "struct field '{}' index {} out of range for {} slots",
                field, index, slots
            ),
            CoerceErrorKind::ElementIndexOutOfRange { index, len } => write!(
                f,
                "element index {} out of range for fixed array of length {}",
                index, len
            ),
            CoerceErrorKind::ShapeMismatch { expected, found } => {
                write!(f, "expected {}, found {}", expected, found)
            }
            CoerceErrorKind::SourceTooLarge {
                type_name,
                capacity,
                actual,
            } => write!(
                f,
                "{} bytes do not fit {} (capacity {})",
                actual, type_name, capacity
            ),
            CoerceErrorKind::ValueNotAssignable {
                index,
                expected,
                found,
            } => write!(
                f,
                "cannot assign {} to slot {} of type {}",
                found, index, expected
            ),
            CoerceErrorKind::SlotNotSettable { index } => {
                write!(f, "slot {} cannot be set", index)
            }
            CoerceErrorKind::GenericDecodeFailure { type_name, reason } => {
                write!(f, "cannot decode {}: {}", type_name, reason)
            }
        }
    }
}

/// One step on the path from a parameter root to a nested node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Field(String),
    Index(usize),
}

/// The parameter a failure happened in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterRef {
    pub index: usize,
    pub name: String,
}

/// A coercion failure with its location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoerceError {
    pub kind: CoerceErrorKind,
    /// Outermost segment first.
    pub path: Vec<PathSegment>,
    pub parameter: Option<ParameterRef>,
}

impl CoerceError {
    pub fn new(kind: CoerceErrorKind) -> Self {
        Self {
            kind,
            path: Vec::new(),
            parameter: None,
        }
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Prepend a field segment.
    pub fn at_field(mut self, name: impl Into<String>) -> Self {
        self.path.insert(0, PathSegment::Field(name.into()));
        self
    }

    /// Prepend an index segment.
    pub fn at_index(mut self, index: usize) -> Self {
        self.path.insert(0, PathSegment::Index(index));
        self
    }

    pub fn in_parameter(mut self, index: usize, name: impl Into<String>) -> Self {
        self.parameter = Some(ParameterRef {
            index,
            name: name.into(),
        });
        self
    }

    /// Render the path as `legs[0].amount`.
    pub fn path_string(&self) -> String {
        let mut out = String::new();
        for segment in &self.path {
            match segment {
                PathSegment::Field(name) => {
                    if !out.is_empty() {
                        out.push('.');
                    }
                    out.push_str(name);
                }
                PathSegment::Index(i) => out.push_str(&format!("[{}]", i)),
            }
        }
        out
    }
}

impl From<CoerceErrorKind> for CoerceError {
    fn from(kind: CoerceErrorKind) -> Self {
        CoerceError::new(kind)
    }
}

impl fmt::Display for CoerceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(param) = &self.parameter {
            if param.name.is_empty() {
                write!(f, "argument {}", param.index)?;
            } else {
                write!(f, "argument {} ('{}')", param.index, param.name)?;
            }
            if !self.path.is_empty() {
                write!(f, " at {}", self.path_string())?;
            }
            write!(f, ": ")?;
        } else if !self.path.is_empty() {
            write!(f, "at {}: ", self.path_string())?;
        }
        write!(f, "{}", self.kind)
    }
}

impl std::error::Error for CoerceError {}

pub type CoerceResult<T> = std::result::Result<T, CoerceError>;
