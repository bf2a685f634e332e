//! Packet encoder

use tracing::trace;

use super::{CHECKSUM_LEN, PACKET_HEADER_LEN, WORD_LEN, checksum};
use crate::types::{PayloadType, Value};

/// One payload entry: a type and the value to send for it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Field {
    pub payload: PayloadType,
    pub value: Value,
}

impl Field {
    /// Create a field, converting the value to the payload's wire encoding.
    pub fn new(payload: PayloadType, value: Value) -> Self {
        Self { payload, value: value.coerce(payload.kind()) }
    }
}

/// Zero bytes needed after `body_len` bytes to reach the next 8-byte boundary.
pub const fn padding_for(body_len: usize) -> usize {
    (WORD_LEN - body_len % WORD_LEN) % WORD_LEN
}

/// Total encoded length for a packet carrying the given payload types.
pub fn packet_len(payloads: impl IntoIterator<Item = PayloadType>) -> usize {
    let body_len =
        PACKET_HEADER_LEN + payloads.into_iter().map(PayloadType::entry_size).sum::<usize>();
    body_len + padding_for(body_len) + CHECKSUM_LEN
}

/// Encode a packet.
///
/// Entries are written in the order given. The id is written verbatim; advancing it is
/// the caller's job. An empty field list yields a 16-byte packet.
pub fn encode(id: u32, fields: &[Field]) -> Vec<u8> {
    let total_len = packet_len(fields.iter().map(|field| field.payload));
    let count = u32::try_from(fields.len()).unwrap_or(u32::MAX);

    let mut packet = Vec::with_capacity(total_len);
    packet.extend_from_slice(&id.to_be_bytes());
    packet.extend_from_slice(&count.to_be_bytes());

    for field in fields {
        let value = field.value.coerce(field.payload.kind());
        trace!("Entry {}: {}", field.payload, value);
        packet.extend_from_slice(&field.payload.header());
        value.write_be(&mut packet);
    }

    // Padding and the checksum trailer start out zeroed.
    packet.resize(total_len, 0);

    let sum = checksum(&packet);
    packet[total_len - CHECKSUM_LEN..].copy_from_slice(&sum.to_be_bytes());

    debug_assert_eq!(packet.len() % WORD_LEN, 0);
    packet
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padding_reaches_word_boundary() {
        assert_eq!(padding_for(8), 0);
        assert_eq!(padding_for(9), 7);
        assert_eq!(padding_for(15), 1);
        assert_eq!(padding_for(26), 6);
    }

    #[test]
    fn packet_len_accounts_for_headers_padding_and_trailer() {
        assert_eq!(packet_len(std::iter::empty()), 16);
        // 8 + 11 = 19, padded to 24
        assert_eq!(packet_len([PayloadType::Altitude]), 32);
        // 8 + 4 = 12, padded to 16
        assert_eq!(packet_len([PayloadType::SphereOfInfluence]), 24);
        // 8 + 11 + 7 + 7 = 33, padded to 40
        assert_eq!(
            packet_len([PayloadType::Altitude, PayloadType::Stage, PayloadType::Latitude]),
            48
        );
    }

    #[test]
    fn field_new_coerces_to_payload_kind() {
        let stage = Field::new(PayloadType::Stage, Value::Float64(3.0));
        assert_eq!(stage.value, Value::Int32(3));

        let latitude = Field::new(PayloadType::Latitude, Value::Float64(-0.25));
        assert_eq!(latitude.value, Value::Float32(-0.25));
    }

    #[test]
    fn mismatched_value_is_coerced_on_the_wire() {
        let field = Field { payload: PayloadType::SphereOfInfluence, value: Value::Float64(131.0) };
        let packet = encode(0, &[field]);
        assert_eq!(packet.len(), 24);
        assert_eq!(&packet[8..12], b"SOI\x83");
    }
}
