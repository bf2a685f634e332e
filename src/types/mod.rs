//! Core types for the telemetry wire format.
//!
//! This module holds the static description of what can travel in a packet:
//! - [`PayloadType`] is the closed catalog of telemetry fields, each with a fixed
//!   3-byte ASCII header, a wire encoding and a change-comparison rule
//! - [`ValueKind`] names the four encodings (byte, int32, float32, float64)
//! - [`Value`] is a value tagged with its encoding
//! - [`FieldSet`] selects which payload types are transmitted
//! - [`body_code`] maps celestial body names to 1-byte codes
//!
//! ## Usage Example
//!
//! ```rust
//! use flightlink::types::{PayloadType, ValueKind};
//!
//! assert_eq!(PayloadType::Altitude.header(), *b"ALT");
//! assert_eq!(PayloadType::Stage.kind(), ValueKind::Int32);
//! assert_eq!(PayloadType::from_header(b"SOI"), Some(PayloadType::SphereOfInfluence));
//! assert_eq!(PayloadType::from_header(b"XYZ"), None);
//! ```

mod body_code;
mod field_set;
mod payload_type;
mod value;
mod value_kind;

// Re-export all public types
pub use body_code::{UNKNOWN_BODY, body_code, body_name};
pub use field_set::FieldSet;
pub use payload_type::{Comparison, HEADER_LEN, PayloadType, ThresholdClass};
pub use value::Value;
pub use value_kind::ValueKind;

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;
    use std::collections::HashSet;

    fn arb_payload_type() -> impl Strategy<Value = PayloadType> {
        prop::sample::select(PayloadType::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn prop_header_lookup_recovers_type(payload in arb_payload_type()) {
            prop_assert_eq!(PayloadType::from_header(&payload.header()), Some(payload));
        }

        #[test]
        fn prop_unlisted_headers_are_unknown(header in prop::array::uniform3(any::<u8>())) {
            let listed = PayloadType::ALL.iter().any(|payload| payload.header() == header);
            prop_assert_eq!(PayloadType::from_header(&header).is_some(), listed);
        }

        #[test]
        fn prop_unknown_body_names_map_to_zero(name in "[a-z]{1,12}") {
            let code = body_code(&name);
            if code == UNKNOWN_BODY {
                prop_assert!(body_name(code).is_none());
            } else {
                prop_assert_eq!(body_name(code), Some(name.as_str()));
            }
        }

        #[test]
        fn prop_value_encoding_width_matches_kind(raw in any::<f64>(), payload in arb_payload_type()) {
            let value = Value::from_f64(payload.kind(), raw);
            let mut out = Vec::new();
            value.write_be(&mut out);
            prop_assert_eq!(out.len(), payload.size());
        }

        #[test]
        fn prop_field_set_iterates_in_index_order(
            picks in prop::collection::vec(arb_payload_type(), 0..30)
        ) {
            let set: FieldSet = picks.iter().copied().collect();
            let listed: Vec<_> = set.iter().collect();

            let mut expected: Vec<_> = picks.clone();
            expected.sort();
            expected.dedup();

            prop_assert_eq!(set.len(), expected.len());
            prop_assert_eq!(listed, expected);
        }
    }

    #[test]
    fn headers_are_unique_three_byte_ascii() {
        let mut seen = HashSet::new();
        for payload in PayloadType::ALL {
            let header = payload.header();
            assert!(header.iter().all(u8::is_ascii_uppercase), "{header:?}");
            assert!(seen.insert(header), "duplicate header for {payload:?}");
        }
        assert_eq!(seen.len(), PayloadType::COUNT);
    }

    #[test]
    fn index_matches_position_in_all() {
        for (position, payload) in PayloadType::ALL.iter().enumerate() {
            assert_eq!(payload.index(), position);
            assert_eq!(PayloadType::from_index(position), Some(*payload));
        }
        assert_eq!(PayloadType::from_index(PayloadType::COUNT), None);
    }

    #[test]
    fn widths_default_to_float64_with_overrides() {
        for payload in PayloadType::ALL {
            let expected = match payload {
                PayloadType::Stage => 4,
                PayloadType::SphereOfInfluence => 1,
                PayloadType::Latitude | PayloadType::Longitude => 4,
                _ => 8,
            };
            assert_eq!(payload.size(), expected, "{payload:?}");
        }
        assert_eq!(PayloadType::Latitude.kind(), ValueKind::Float32);
        assert_eq!(PayloadType::Stage.kind(), ValueKind::Int32);
    }

    #[test]
    fn catalog_headers_match_wire_table() {
        let expected = [
            (PayloadType::Altitude, "ALT"),
            (PayloadType::TargetDistance, "TDS"),
            (PayloadType::SurfaceSpeed, "SSP"),
            (PayloadType::TargetSpeed, "TSP"),
            (PayloadType::OrbitalSpeed, "OSP"),
            (PayloadType::Apoapsis, "APA"),
            (PayloadType::ApoapsisRadius, "APR"),
            (PayloadType::Periapsis, "PEA"),
            (PayloadType::PeriapsisRadius, "PER"),
            (PayloadType::TimeToApoapsis, "TTA"),
            (PayloadType::TimeToPeriapsis, "TTP"),
            (PayloadType::Stage, "STG"),
            (PayloadType::SphereOfInfluence, "SOI"),
            (PayloadType::Latitude, "LAT"),
            (PayloadType::Longitude, "LON"),
            (PayloadType::OrbitalPeriod, "OPE"),
            (PayloadType::GForce, "GFO"),
            (PayloadType::TerrainAltitude, "AGL"),
        ];
        for (payload, header) in expected {
            assert_eq!(payload.header_str(), header);
            assert_eq!(payload.to_string(), header);
        }
    }

    #[test]
    fn comparison_classes() {
        use ThresholdClass::*;

        assert_eq!(PayloadType::Stage.comparison(), Comparison::Exact);
        assert_eq!(PayloadType::SphereOfInfluence.comparison(), Comparison::Exact);
        assert_eq!(PayloadType::TargetDistance.comparison(), Comparison::Never);
        assert_eq!(PayloadType::TerrainAltitude.comparison(), Comparison::Threshold(Altitude));
        assert_eq!(PayloadType::GForce.comparison(), Comparison::Threshold(Speed));
        assert_eq!(PayloadType::OrbitalPeriod.comparison(), Comparison::Threshold(Time));
        assert_eq!(PayloadType::Longitude.comparison(), Comparison::Threshold(Degrees));
    }

    #[test]
    fn body_codes_follow_family_numbering() {
        assert_eq!(body_code("Sun"), 100);
        assert_eq!(body_code("Kerbin"), 130);
        assert_eq!(body_code("Mun"), 131);
        assert_eq!(body_code("MINMUS"), 132);
        assert_eq!(body_code("Pol"), 165);
        assert_eq!(body_code("Eeloo"), 170);
        assert_eq!(body_code("Earth"), UNKNOWN_BODY);
        assert_eq!(body_code(""), UNKNOWN_BODY);
        assert_eq!(body_name(141), Some("ike"));
    }

    #[test]
    fn value_display_uses_one_decimal_for_floats() {
        assert_eq!(Value::Float64(1000.04).to_string(), "1000.0");
        assert_eq!(Value::Float32(-12.26).to_string(), "-12.3");
        assert_eq!(Value::Int32(-3).to_string(), "-3");
        assert_eq!(Value::Byte(131).to_string(), "131");
    }

    #[test]
    fn coerce_converts_between_kinds() {
        assert_eq!(Value::Float64(2.9).coerce(ValueKind::Int32), Value::Int32(2));
        assert_eq!(Value::Float64(300.0).coerce(ValueKind::Byte), Value::Byte(255));
        assert_eq!(Value::Int32(7).coerce(ValueKind::Int32), Value::Int32(7));
        assert_eq!(Value::Float64(0.5).coerce(ValueKind::Float32), Value::Float32(0.5));
    }

    #[test]
    fn read_be_rejects_short_input() {
        assert_eq!(Value::read_be(ValueKind::Float64, &[0; 7]), None);
        assert_eq!(Value::read_be(ValueKind::Byte, &[]), None);
        assert_eq!(Value::read_be(ValueKind::Int32, &[0, 0, 0, 2, 9]), Some(Value::Int32(2)));
    }
}
