//! Telemetry sources
//!
//! A [`TelemetrySource`] answers "what is the current value of this field?" for the
//! simulation being streamed. The codec only ever sees tagged [`Value`]s produced by
//! [`sample`], which converts each raw reading into its payload's wire encoding.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::types::{PayloadType, Value, body_code};

/// Raw reading returned by a source.
#[derive(Debug, Clone, PartialEq)]
pub enum Reading {
    Number(f64),
    /// Celestial body name, converted to a body code
    Name(String),
}

impl From<f64> for Reading {
    fn from(value: f64) -> Self {
        Reading::Number(value)
    }
}

impl From<i32> for Reading {
    fn from(value: i32) -> Self {
        Reading::Number(f64::from(value))
    }
}

impl From<&str> for Reading {
    fn from(name: &str) -> Self {
        Reading::Name(name.to_string())
    }
}

impl From<String> for Reading {
    fn from(name: String) -> Self {
        Reading::Name(name)
    }
}

/// Capability providing current field values.
pub trait TelemetrySource {
    /// Current reading for a payload type, or `None` if the source cannot provide it.
    fn reading(&self, payload: PayloadType) -> Option<Reading>;
}

impl<T: TelemetrySource + ?Sized> TelemetrySource for &T {
    fn reading(&self, payload: PayloadType) -> Option<Reading> {
        (**self).reading(payload)
    }
}

impl<T: TelemetrySource + ?Sized> TelemetrySource for Box<T> {
    fn reading(&self, payload: PayloadType) -> Option<Reading> {
        (**self).reading(payload)
    }
}

/// Reads the latest snapshot published on a watch channel.
impl<T: TelemetrySource> TelemetrySource for watch::Receiver<T> {
    fn reading(&self, payload: PayloadType) -> Option<Reading> {
        self.borrow().reading(payload)
    }
}

/// Fetch a field from a source as a value of the payload's wire encoding.
pub fn sample<S: TelemetrySource + ?Sized>(source: &S, payload: PayloadType) -> Option<Value> {
    let value = match source.reading(payload)? {
        Reading::Number(raw) => Value::from_f64(payload.kind(), raw),
        Reading::Name(name) => Value::Byte(body_code(&name)).coerce(payload.kind()),
    };
    debug_assert_eq!(value.kind(), payload.kind());
    Some(value)
}

/// Altitude above the terrain, never reported higher than altitude above sea level.
///
/// Terrain below sea level would otherwise put the vessel higher above the ground than
/// above the sea.
pub fn terrain_relative_altitude(altitude: f64, terrain_altitude: f64) -> f64 {
    let above_ground = altitude - terrain_altitude;
    if above_ground > altitude { altitude } else { above_ground }
}

/// Full vessel state captured at one instant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VesselSnapshot {
    /// Altitude above sea level (m)
    pub altitude: f64,
    /// Terrain height below the vessel (m)
    pub terrain_altitude: f64,
    pub surface_speed: f64,
    /// Speed relative to the target, if one is set
    pub target_speed: Option<f64>,
    pub orbital_speed: f64,
    pub apoapsis: f64,
    pub apoapsis_radius: f64,
    pub periapsis: f64,
    pub periapsis_radius: f64,
    pub time_to_apoapsis: f64,
    pub time_to_periapsis: f64,
    pub stage: i32,
    /// Name of the body whose sphere of influence the vessel is in
    pub reference_body: String,
    pub latitude: f64,
    pub longitude: f64,
    pub orbital_period: f64,
    pub g_force: f64,
}

impl TelemetrySource for VesselSnapshot {
    fn reading(&self, payload: PayloadType) -> Option<Reading> {
        let reading: Reading = match payload {
            PayloadType::Altitude => self.altitude.into(),
            // TODO: needs the target vessel's position, which snapshots do not carry yet
            PayloadType::TargetDistance => return None,
            PayloadType::SurfaceSpeed => self.surface_speed.into(),
            PayloadType::TargetSpeed => self.target_speed?.into(),
            PayloadType::OrbitalSpeed => self.orbital_speed.into(),
            PayloadType::Apoapsis => self.apoapsis.into(),
            PayloadType::ApoapsisRadius => self.apoapsis_radius.into(),
            PayloadType::Periapsis => self.periapsis.into(),
            PayloadType::PeriapsisRadius => self.periapsis_radius.into(),
            PayloadType::TimeToApoapsis => self.time_to_apoapsis.into(),
            PayloadType::TimeToPeriapsis => self.time_to_periapsis.into(),
            PayloadType::Stage => self.stage.into(),
            PayloadType::SphereOfInfluence => self.reference_body.as_str().into(),
            PayloadType::Latitude => self.latitude.into(),
            PayloadType::Longitude => self.longitude.into(),
            PayloadType::OrbitalPeriod => self.orbital_period.into(),
            PayloadType::GForce => self.g_force.into(),
            PayloadType::TerrainAltitude => {
                terrain_relative_altitude(self.altitude, self.terrain_altitude).into()
            }
        };
        Some(reading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kerbin_snapshot() -> VesselSnapshot {
        VesselSnapshot {
            altitude: 75_000.0,
            terrain_altitude: 1_200.0,
            stage: 2,
            reference_body: "Kerbin".to_string(),
            latitude: -0.097,
            longitude: 285.4,
            ..VesselSnapshot::default()
        }
    }

    #[test]
    fn terrain_relative_altitude_is_clamped_below_sea_level() {
        assert_eq!(terrain_relative_altitude(1000.0, 200.0), 800.0);
        assert_eq!(terrain_relative_altitude(1000.0, -150.0), 1000.0);
        assert_eq!(terrain_relative_altitude(1000.0, 0.0), 1000.0);
    }

    #[test]
    fn sample_converts_to_payload_encoding() {
        let snapshot = kerbin_snapshot();

        assert_eq!(sample(&snapshot, PayloadType::Altitude), Some(Value::Float64(75_000.0)));
        assert_eq!(sample(&snapshot, PayloadType::Stage), Some(Value::Int32(2)));
        assert_eq!(sample(&snapshot, PayloadType::SphereOfInfluence), Some(Value::Byte(130)));
        assert_eq!(sample(&snapshot, PayloadType::Latitude), Some(Value::Float32(-0.097)));
        assert_eq!(
            sample(&snapshot, PayloadType::TerrainAltitude),
            Some(Value::Float64(73_800.0))
        );
    }

    #[test]
    fn unavailable_fields_sample_to_none() {
        let snapshot = kerbin_snapshot();
        assert_eq!(sample(&snapshot, PayloadType::TargetDistance), None);
        assert_eq!(sample(&snapshot, PayloadType::TargetSpeed), None);

        let targeted = VesselSnapshot { target_speed: Some(4.5), ..snapshot };
        assert_eq!(sample(&targeted, PayloadType::TargetSpeed), Some(Value::Float64(4.5)));
    }

    #[test]
    fn unknown_body_samples_to_zero() {
        let snapshot = VesselSnapshot { reference_body: "Earth".into(), ..kerbin_snapshot() };
        assert_eq!(sample(&snapshot, PayloadType::SphereOfInfluence), Some(Value::Byte(0)));
    }

    #[test]
    fn watch_receiver_reads_latest_snapshot() {
        let (tx, rx) = watch::channel(kerbin_snapshot());
        assert_eq!(sample(&rx, PayloadType::Stage), Some(Value::Int32(2)));

        tx.send_modify(|snapshot| snapshot.stage = 1);
        assert_eq!(sample(&rx, PayloadType::Stage), Some(Value::Int32(1)));
    }

    #[test]
    fn snapshots_load_from_yaml() {
        let yaml = "altitude: 1500.5\nstage: 3\nreference_body: Mun\n";
        let snapshot: VesselSnapshot = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(snapshot.altitude, 1500.5);
        assert_eq!(sample(&snapshot, PayloadType::SphereOfInfluence), Some(Value::Byte(131)));
    }
}
