//! Diagnostic packet decoder
//!
//! The decoder mirrors the encoder's layout decisions so packets can be inspected and
//! round-tripped in tests. It is deliberately lenient: an unknown header still consumes
//! the default 8-byte value width, which keeps the cursor moving but misaligns any
//! entries that follow a narrower unknown field.

use std::borrow::Cow;
use std::fmt;

use tracing::trace;

use super::{CHECKSUM_LEN, Field, MIN_PACKET_LEN, PACKET_HEADER_LEN, checksum};
use crate::types::{HEADER_LEN, PayloadType, Value, ValueKind, body_name};
use crate::{Result, TelemetryError};

/// One entry read back from a packet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecodedEntry {
    /// Raw header bytes as found on the wire
    pub header: [u8; HEADER_LEN],
    /// Resolved payload type, `None` for an unrecognized header
    pub payload: Option<PayloadType>,
    pub value: Value,
}

impl DecodedEntry {
    /// Header rendered as text, with non-ASCII bytes replaced.
    pub fn header_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.header)
    }

    /// The entry as a field, if its header was recognized.
    pub fn field(&self) -> Option<Field> {
        self.payload.map(|payload| Field { payload, value: self.value })
    }
}

/// A packet parsed for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedPacket {
    pub id: u32,
    /// Entry count declared by the sender
    pub count: u32,
    pub entries: Vec<DecodedEntry>,
    /// Checksum self-check fold over the whole buffer; zero for an intact packet
    pub residue: u64,
}

impl DecodedPacket {
    /// Whether the checksum self-check passed.
    pub fn is_intact(&self) -> bool {
        self.residue == 0
    }

    /// Report a failed self-check as an error.
    pub fn verify(&self) -> Result<()> {
        if self.is_intact() {
            Ok(())
        } else {
            Err(TelemetryError::ChecksumMismatch { residue: self.residue })
        }
    }

    /// Recognized entries as fields, in packet order.
    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.entries.iter().filter_map(DecodedEntry::field)
    }
}

impl fmt::Display for DecodedPacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.id.to_be_bytes();
        writeln!(f, "ID: {a:02X}-{b:02X}-{c:02X}-{d:02X}")?;
        writeln!(f, "Payload amount: {}", self.count)?;

        for entry in &self.entries {
            write!(f, "{}: {}", entry.header_str(), entry.value)?;
            if let (Some(PayloadType::SphereOfInfluence), Value::Byte(code)) =
                (entry.payload, entry.value)
            {
                if let Some(name) = body_name(code) {
                    write!(f, " ({name})")?;
                }
            }
            writeln!(f)?;
        }

        if !self.is_intact() {
            writeln!(f, "Checksum residue: {:#018x}", self.residue)?;
        }
        Ok(())
    }
}

/// Decode a packet.
///
/// Entries are read while the declared count has not been reached and enough bytes
/// remain for a minimal entry ahead of the checksum trailer. Buffers shorter than an
/// empty packet are rejected; everything else decodes best-effort.
pub fn decode(bytes: &[u8]) -> Result<DecodedPacket> {
    if bytes.len() < MIN_PACKET_LEN {
        return Err(TelemetryError::TruncatedPacket { len: bytes.len() });
    }

    let id = read_u32_be(bytes, 0);
    let count = read_u32_be(bytes, 4);
    let min_remaining = HEADER_LEN + ValueKind::MIN_SIZE + CHECKSUM_LEN;

    let mut entries = Vec::new();
    let mut cursor = PACKET_HEADER_LEN;

    while (entries.len() as u64) < u64::from(count) && bytes.len() - cursor >= min_remaining {
        let mut header = [0u8; HEADER_LEN];
        header.copy_from_slice(&bytes[cursor..cursor + HEADER_LEN]);
        cursor += HEADER_LEN;

        let payload = PayloadType::from_header(&header);
        let kind = payload.map_or(ValueKind::DEFAULT, PayloadType::kind);

        let Some(value) = Value::read_be(kind, &bytes[cursor..]) else {
            trace!("Entry {} runs past end of buffer", String::from_utf8_lossy(&header));
            break;
        };
        cursor += kind.size();

        if payload.is_none() {
            trace!("Unknown header {:?} at offset {}", header, cursor - kind.size() - HEADER_LEN);
        }

        entries.push(DecodedEntry { header, payload, value });
    }

    Ok(DecodedPacket { id, count, entries, residue: checksum(bytes) })
}

fn read_u32_be(data: &[u8], offset: usize) -> u32 {
    u32::from_be_bytes([data[offset], data[offset + 1], data[offset + 2], data[offset + 3]])
}
