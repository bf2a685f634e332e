//! Binary packet codec.
//!
//! ## Packet Layout
//!
//! All multi-byte integers and floats are big-endian.
//!
//! | Offset | Field       | Width    | Notes                                     |
//! |--------|-------------|----------|-------------------------------------------|
//! | 0      | Packet id   | 4        | u32, advanced by the driver, wraps        |
//! | 4      | Entry count | 4        | u32                                       |
//! | 8..    | Entries     | variable | 3-byte ASCII header + value               |
//! | ...    | Padding     | 0-7      | zero bytes up to an 8-byte boundary       |
//! | last 8 | Checksum    | 8        | u64 XOR-fold of the words from offset 8   |
//!
//! Every packet length is a multiple of 8, and XOR-folding the 8-byte words from
//! offset 8 to the end of a finished packet yields zero.
//!
//! ## Usage Example
//!
//! ```rust
//! use flightlink::codec::{Field, checksum, decode, encode};
//! use flightlink::types::{PayloadType, Value};
//!
//! let fields = [
//!     Field::new(PayloadType::Altitude, Value::Float64(1000.0)),
//!     Field::new(PayloadType::Stage, Value::Int32(2)),
//! ];
//! let packet = encode(7, &fields);
//! assert_eq!(packet.len() % 8, 0);
//! assert_eq!(checksum(&packet), 0);
//!
//! let decoded = decode(&packet).unwrap();
//! assert_eq!(decoded.fields().collect::<Vec<_>>(), fields);
//! ```

mod checksum;
mod decoder;
mod encoder;

pub use checksum::{checksum, is_intact, verify};
pub use decoder::{DecodedEntry, DecodedPacket, decode};
pub use encoder::{Field, encode, packet_len, padding_for};

/// Checksum and alignment word size.
pub const WORD_LEN: usize = 8;

/// Packet id plus entry count.
pub const PACKET_HEADER_LEN: usize = 8;

/// Checksum trailer size.
pub const CHECKSUM_LEN: usize = 8;

/// Length of a packet with no entries.
pub const MIN_PACKET_LEN: usize = PACKET_HEADER_LEN + CHECKSUM_LEN;
