//! Change detection ("dirty tracking") for payload fields
//!
//! The detector remembers the last value actually sent for every payload type and
//! decides, per cycle, which enabled fields moved far enough to be worth resending.
//! Suppressed fields keep their old baseline, so a slow drift is measured from the last
//! transmitted value rather than from the previous sample.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::codec::Field;
use crate::source::{TelemetrySource, sample};
use crate::types::{Comparison, FieldSet, PayloadType, ThresholdClass, Value};
use crate::{Result, TelemetryError};

/// Minimum change per threshold class before a continuous field is resent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub altitude: f64,
    pub speed: f64,
    pub time: f64,
    pub degrees: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self { altitude: 0.5, speed: 0.1, time: 1.0, degrees: 0.1 }
    }
}

impl Thresholds {
    /// Threshold for the given class.
    pub fn for_class(&self, class: ThresholdClass) -> f64 {
        match class {
            ThresholdClass::Altitude => self.altitude,
            ThresholdClass::Speed => self.speed,
            ThresholdClass::Time => self.time,
            ThresholdClass::Degrees => self.degrees,
        }
    }

    /// Thresholds must be finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        let named = [
            ("altitude", self.altitude),
            ("speed", self.speed),
            ("time", self.time),
            ("degrees", self.degrees),
        ];
        for (name, threshold) in named {
            if !threshold.is_finite() || threshold < 0.0 {
                return Err(TelemetryError::config_invalid(format!(
                    "{} threshold must be finite and non-negative, got {}",
                    name, threshold
                )));
            }
        }
        Ok(())
    }
}

/// Last-sent cache plus the per-class suppression policy.
#[derive(Debug, Clone)]
pub struct ChangeDetector {
    thresholds: Thresholds,
    last_sent: [Value; PayloadType::COUNT],
}

impl Default for ChangeDetector {
    fn default() -> Self {
        Self::new(Thresholds::default())
    }
}

impl ChangeDetector {
    /// Create a detector with every slot at its "never sent" sentinel.
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds, last_sent: PayloadType::ALL.map(Self::sentinel) }
    }

    /// Initial cache value for a payload type.
    ///
    /// Numeric fields start at -1, angles outside the valid range and the body code at
    /// the unknown-body code, so an unknown body is not sent until it changes.
    pub fn sentinel(payload: PayloadType) -> Value {
        match payload {
            PayloadType::Stage => Value::Int32(-1),
            PayloadType::SphereOfInfluence => Value::Byte(0),
            PayloadType::Latitude | PayloadType::Longitude => Value::Float32(-361.0),
            _ => Value::Float64(-1.0),
        }
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Value most recently committed for a payload type.
    pub fn last_sent(&self, payload: PayloadType) -> Value {
        self.last_sent[payload.index()]
    }

    /// Whether `current` differs enough from the last-sent value to be transmitted.
    pub fn should_send(&self, payload: PayloadType, current: Value) -> bool {
        let current = current.coerce(payload.kind());
        let last = self.last_sent(payload);

        match payload.comparison() {
            Comparison::Exact => current != last,
            Comparison::Threshold(class) => {
                (current.as_f64() - last.as_f64()).abs() >= self.thresholds.for_class(class)
            }
            Comparison::Never => false,
        }
    }

    /// Record the value that was sent for a payload type.
    pub fn commit(&mut self, payload: PayloadType, sent: Value) {
        self.last_sent[payload.index()] = sent.coerce(payload.kind());
    }

    /// Record every field included in an emitted packet.
    pub fn commit_all(&mut self, fields: &[Field]) {
        for field in fields {
            self.commit(field.payload, field.value);
        }
    }

    /// Sample every enabled field and keep those that changed, in index order.
    ///
    /// Fields the source cannot currently provide are treated as unchanged.
    pub fn changed_fields<S>(&self, enabled: &FieldSet, source: &S) -> Vec<Field>
    where
        S: TelemetrySource + ?Sized,
    {
        enabled
            .iter()
            .filter_map(|payload| {
                let Some(current) = sample(source, payload) else {
                    trace!("{} unavailable from source", payload);
                    return None;
                };
                self.should_send(payload, current).then(|| Field::new(payload, current))
            })
            .collect()
    }
}
