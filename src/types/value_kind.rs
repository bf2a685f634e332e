//! Wire value kinds

use serde::{Deserialize, Serialize};

/// Numeric encodings a payload value can take on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// Single unsigned byte (coded enumerations such as body codes)
    Byte,
    /// Big-endian signed 32-bit integer
    Int32,
    /// Big-endian IEEE 754 single precision
    Float32,
    /// Big-endian IEEE 754 double precision
    Float64,
}

impl ValueKind {
    /// Encoding used by every payload that does not override it.
    pub const DEFAULT: ValueKind = ValueKind::Float64;

    /// Width of the smallest encoding, used to bound the decoder's read loop.
    pub const MIN_SIZE: usize = 1;

    /// Returns the size in bytes of this encoding.
    pub const fn size(&self) -> usize {
        match self {
            ValueKind::Byte => 1,
            ValueKind::Int32 | ValueKind::Float32 => 4,
            ValueKind::Float64 => 8,
        }
    }
}
