//! Payload type registry
//!
//! Every telemetry field that can appear in a packet is described by one row of a
//! static catalog: its 3-byte ASCII header, its wire encoding and the comparison rule
//! used to decide whether a new value is worth sending.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ValueKind;
use Comparison::{Exact, Never, Threshold};
use ThresholdClass::{Altitude, Degrees, Speed, Time};

/// Length of every payload header on the wire.
pub const HEADER_LEN: usize = 3;

/// Magnitude bucket governing change suppression for continuous fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdClass {
    /// Altitudes and radii (metres)
    Altitude,
    /// Speeds and accelerations
    Speed,
    /// Game-time durations (seconds)
    Time,
    /// Angular coordinates (degrees)
    Degrees,
}

/// How a field's current value is compared with the last value sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    /// Resend on any difference (stage index, body code)
    Exact,
    /// Resend once the absolute difference reaches the class threshold
    Threshold(ThresholdClass),
    /// No comparison is implemented: the field is always considered unchanged
    Never,
}

/// Telemetry fields, in wire order.
///
/// The discriminant is the field's stable index, used for ordering entries within a
/// packet and for indexing per-field tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadType {
    Altitude = 0,
    /// Distance to target. No value source exists yet, so it is never sent.
    TargetDistance = 1,
    SurfaceSpeed = 2,
    TargetSpeed = 3,
    OrbitalSpeed = 4,
    Apoapsis = 5,
    ApoapsisRadius = 6,
    Periapsis = 7,
    PeriapsisRadius = 8,
    TimeToApoapsis = 9,
    TimeToPeriapsis = 10,
    /// Current stage index
    Stage = 11,
    /// Body code of the current sphere of influence
    SphereOfInfluence = 12,
    Latitude = 13,
    Longitude = 14,
    OrbitalPeriod = 15,
    GForce = 16,
    /// Altitude above terrain, clamped to sea-level altitude
    TerrainAltitude = 17,
}

struct PayloadDescriptor {
    payload: PayloadType,
    header: [u8; HEADER_LEN],
    comparison: Comparison,
}

const fn row(payload: PayloadType, header: &[u8; 3], comparison: Comparison) -> PayloadDescriptor {
    PayloadDescriptor { payload, header: *header, comparison }
}

// Indexed by discriminant.
static CATALOG: [PayloadDescriptor; PayloadType::COUNT] = [
    row(PayloadType::Altitude, b"ALT", Threshold(Altitude)),
    row(PayloadType::TargetDistance, b"TDS", Never),
    row(PayloadType::SurfaceSpeed, b"SSP", Threshold(Speed)),
    row(PayloadType::TargetSpeed, b"TSP", Threshold(Speed)),
    row(PayloadType::OrbitalSpeed, b"OSP", Threshold(Speed)),
    row(PayloadType::Apoapsis, b"APA", Threshold(Altitude)),
    row(PayloadType::ApoapsisRadius, b"APR", Threshold(Altitude)),
    row(PayloadType::Periapsis, b"PEA", Threshold(Altitude)),
    row(PayloadType::PeriapsisRadius, b"PER", Threshold(Altitude)),
    row(PayloadType::TimeToApoapsis, b"TTA", Threshold(Time)),
    row(PayloadType::TimeToPeriapsis, b"TTP", Threshold(Time)),
    row(PayloadType::Stage, b"STG", Exact),
    row(PayloadType::SphereOfInfluence, b"SOI", Exact),
    row(PayloadType::Latitude, b"LAT", Threshold(Degrees)),
    row(PayloadType::Longitude, b"LON", Threshold(Degrees)),
    row(PayloadType::OrbitalPeriod, b"OPE", Threshold(Time)),
    row(PayloadType::GForce, b"GFO", Threshold(Speed)),
    row(PayloadType::TerrainAltitude, b"AGL", Threshold(Altitude)),
];

impl PayloadType {
    /// Number of payload types in the catalog.
    pub const COUNT: usize = 18;

    /// All payload types in index order.
    pub const ALL: [PayloadType; PayloadType::COUNT] = [
        PayloadType::Altitude,
        PayloadType::TargetDistance,
        PayloadType::SurfaceSpeed,
        PayloadType::TargetSpeed,
        PayloadType::OrbitalSpeed,
        PayloadType::Apoapsis,
        PayloadType::ApoapsisRadius,
        PayloadType::Periapsis,
        PayloadType::PeriapsisRadius,
        PayloadType::TimeToApoapsis,
        PayloadType::TimeToPeriapsis,
        PayloadType::Stage,
        PayloadType::SphereOfInfluence,
        PayloadType::Latitude,
        PayloadType::Longitude,
        PayloadType::OrbitalPeriod,
        PayloadType::GForce,
        PayloadType::TerrainAltitude,
    ];

    /// Stable index of this payload type.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Payload type with the given index, if any.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Wire encoding. Float64 unless overridden.
    pub const fn kind(self) -> ValueKind {
        match self {
            PayloadType::Stage => ValueKind::Int32,
            PayloadType::SphereOfInfluence => ValueKind::Byte,
            PayloadType::Latitude | PayloadType::Longitude => ValueKind::Float32,
            _ => ValueKind::DEFAULT,
        }
    }

    /// Width of the encoded value in bytes (header excluded).
    pub const fn size(self) -> usize {
        self.kind().size()
    }

    /// Width of a complete entry: header plus value.
    pub const fn entry_size(self) -> usize {
        HEADER_LEN + self.size()
    }

    /// 3-byte ASCII wire header.
    pub fn header(self) -> [u8; HEADER_LEN] {
        CATALOG[self.index()].header
    }

    /// Header as a string slice.
    pub fn header_str(self) -> &'static str {
        // Catalog headers are ASCII literals.
        std::str::from_utf8(&CATALOG[self.index()].header).unwrap_or("???")
    }

    /// Comparison rule applied by the change detector.
    pub fn comparison(self) -> Comparison {
        CATALOG[self.index()].comparison
    }

    /// Resolve a wire header. Unknown headers yield `None`.
    pub fn from_header(header: &[u8]) -> Option<Self> {
        CATALOG.iter().find(|row| row.header.as_slice() == header).map(|row| row.payload)
    }
}

impl fmt::Display for PayloadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header_str())
    }
}
