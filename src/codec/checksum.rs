//! XOR-fold checksum over 8-byte words

use super::{PACKET_HEADER_LEN, WORD_LEN};
use crate::{Result, TelemetryError};

/// XOR of every complete 8-byte word after the id/count word.
///
/// While building a packet the trailer is still zero, so the result is the value to
/// embed. Once embedded, the same fold over the finished packet yields zero.
/// A trailing partial word is ignored.
pub fn checksum(packet: &[u8]) -> u64 {
    let words = packet.get(PACKET_HEADER_LEN..).unwrap_or_default();
    words.chunks_exact(WORD_LEN).fold(0, |acc, word| {
        let mut bytes = [0u8; WORD_LEN];
        bytes.copy_from_slice(word);
        acc ^ u64::from_be_bytes(bytes)
    })
}

/// Whether the checksum self-check folds to zero.
pub fn is_intact(packet: &[u8]) -> bool {
    checksum(packet) == 0
}

/// Run the self-check, reporting the non-zero residue on failure.
pub fn verify(packet: &[u8]) -> Result<()> {
    match checksum(packet) {
        0 => Ok(()),
        residue => Err(TelemetryError::ChecksumMismatch { residue }),
    }
}
