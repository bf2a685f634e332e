//! Tagged payload values

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ValueKind;

/// A single payload value, tagged with its wire encoding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Byte(u8),
    Int32(i32),
    Float32(f32),
    Float64(f64),
}

impl Value {
    /// Encoding this value is currently tagged with.
    pub const fn kind(&self) -> ValueKind {
        match self {
            Value::Byte(_) => ValueKind::Byte,
            Value::Int32(_) => ValueKind::Int32,
            Value::Float32(_) => ValueKind::Float32,
            Value::Float64(_) => ValueKind::Float64,
        }
    }

    /// Widen to `f64` for threshold comparisons.
    pub fn as_f64(&self) -> f64 {
        match *self {
            Value::Byte(v) => f64::from(v),
            Value::Int32(v) => f64::from(v),
            Value::Float32(v) => f64::from(v),
            Value::Float64(v) => v,
        }
    }

    /// Build a value of the given kind from a raw number.
    ///
    /// Integer kinds use Rust's saturating float-to-int cast, so NaN becomes 0.
    pub fn from_f64(kind: ValueKind, raw: f64) -> Self {
        match kind {
            ValueKind::Byte => Value::Byte(raw as u8),
            ValueKind::Int32 => Value::Int32(raw as i32),
            ValueKind::Float32 => Value::Float32(raw as f32),
            ValueKind::Float64 => Value::Float64(raw),
        }
    }

    /// Convert to the given kind. A value already of that kind is returned untouched.
    pub fn coerce(self, kind: ValueKind) -> Self {
        if self.kind() == kind { self } else { Value::from_f64(kind, self.as_f64()) }
    }

    /// Append the big-endian encoding of this value.
    pub fn write_be(&self, out: &mut Vec<u8>) {
        match *self {
            Value::Byte(v) => out.push(v),
            Value::Int32(v) => out.extend_from_slice(&v.to_be_bytes()),
            Value::Float32(v) => out.extend_from_slice(&v.to_be_bytes()),
            Value::Float64(v) => out.extend_from_slice(&v.to_be_bytes()),
        }
    }

    /// Read a big-endian value of the given kind from the front of `bytes`.
    ///
    /// Returns `None` when fewer than `kind.size()` bytes are available.
    pub fn read_be(kind: ValueKind, bytes: &[u8]) -> Option<Self> {
        let value = match kind {
            ValueKind::Byte => Value::Byte(*bytes.first()?),
            ValueKind::Int32 => Value::Int32(i32::from_be_bytes(bytes.get(..4)?.try_into().ok()?)),
            ValueKind::Float32 => {
                Value::Float32(f32::from_be_bytes(bytes.get(..4)?.try_into().ok()?))
            }
            ValueKind::Float64 => {
                Value::Float64(f64::from_be_bytes(bytes.get(..8)?.try_into().ok()?))
            }
        };
        Some(value)
    }
}

/// Diagnostic rendering: integers verbatim, floats with one decimal place.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Byte(v) => write!(f, "{v}"),
            Value::Int32(v) => write!(f, "{v}"),
            Value::Float32(v) => write!(f, "{v:.1}"),
            Value::Float64(v) => write!(f, "{v:.1}"),
        }
    }
}
