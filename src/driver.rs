//! Driver runs telemetry cycles: select, encode, commit, emit

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{Level, debug, trace, warn};

use crate::Result;
use crate::change_detector::ChangeDetector;
use crate::codec::{DecodedPacket, Field, checksum, decode, encode};
use crate::config::TelemetryConfig;
use crate::sink::ByteSink;
use crate::source::TelemetrySource;
use crate::types::FieldSet;

/// Mutable state carried between cycles.
///
/// Owned by exactly one driver; the cache and the id counter always move together.
#[derive(Debug, Clone, Default)]
pub struct DriverState {
    pub detector: ChangeDetector,
    /// Id given to the next emitted packet
    pub next_id: u32,
}

/// Rate limiter deciding whether a cycle is due.
#[derive(Debug, Clone)]
pub struct UpdateGate {
    interval: Duration,
    last_fired: Option<Instant>,
}

impl UpdateGate {
    pub fn new(interval: Duration) -> Self {
        Self { interval, last_fired: None }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns true and restarts the interval if more than `interval` has passed since
    /// the gate last fired. The first call always fires.
    pub fn ready(&mut self, now: Instant) -> bool {
        let due = match self.last_fired {
            None => true,
            Some(last) => now.saturating_duration_since(last) > self.interval,
        };
        if due {
            self.last_fired = Some(now);
        }
        due
    }
}

/// A packet emitted by a cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedPacket {
    pub id: u32,
    /// Fields included, in wire order
    pub fields: Vec<Field>,
    pub bytes: Arc<[u8]>,
}

impl EncodedPacket {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Parse the packet back for inspection.
    pub fn decode(&self) -> Result<DecodedPacket> {
        decode(&self.bytes)
    }
}

/// Telemetry driver owning the enabled-field selection, the gate and the cycle state.
#[derive(Debug, Clone)]
pub struct TelemetryDriver {
    enabled: FieldSet,
    gate: UpdateGate,
    state: DriverState,
}

impl TelemetryDriver {
    pub fn new(config: &TelemetryConfig) -> Self {
        Self {
            enabled: config.enabled,
            gate: UpdateGate::new(config.update_interval()),
            state: DriverState {
                detector: ChangeDetector::new(config.thresholds),
                next_id: 0,
            },
        }
    }

    /// Replace the enabled-field selection, keeping the cache and counter.
    pub fn with_fields(mut self, enabled: FieldSet) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn enabled(&self) -> &FieldSet {
        &self.enabled
    }

    pub fn interval(&self) -> Duration {
        self.gate.interval()
    }

    pub fn state(&self) -> &DriverState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut DriverState {
        &mut self.state
    }

    /// Run one cycle against a source.
    ///
    /// Returns `None` without touching the state when no enabled field changed. Otherwise
    /// the packet is encoded, its fields are committed to the cache and the id advances.
    pub fn cycle<S>(&mut self, source: &S) -> Option<EncodedPacket>
    where
        S: TelemetrySource + ?Sized,
    {
        let fields = self.state.detector.changed_fields(&self.enabled, source);
        if fields.is_empty() {
            trace!("No changed fields, skipping packet {}", self.state.next_id);
            return None;
        }

        let id = self.state.next_id;
        let bytes: Arc<[u8]> = encode(id, &fields).into();
        self.state.detector.commit_all(&fields);
        self.state.next_id = id.wrapping_add(1);

        debug!(
            "Packet {}: {} fields, {} bytes, checksum residue {:#x}",
            id,
            fields.len(),
            bytes.len(),
            checksum(&bytes)
        );
        if tracing::enabled!(Level::DEBUG) {
            match decode(&bytes) {
                Ok(decoded) => debug!("\n{}", decoded),
                Err(e) => warn!("Emitted packet {} does not decode: {}", id, e),
            }
        }

        Some(EncodedPacket { id, fields, bytes })
    }

    /// Run one cycle and hand the packet to the sink.
    ///
    /// The cache and counter are updated before the write, so a failed write loses the
    /// packet; the fields are sent again once they move past their thresholds.
    pub fn tick<S, K>(&mut self, source: &S, sink: &mut K) -> Result<Option<EncodedPacket>>
    where
        S: TelemetrySource + ?Sized,
        K: ByteSink + ?Sized,
    {
        let Some(packet) = self.cycle(source) else {
            return Ok(None);
        };
        sink.write(&packet.bytes)?;
        Ok(Some(packet))
    }

    /// Run a cycle only if the update interval has elapsed.
    pub fn poll<S, K>(
        &mut self,
        now: Instant,
        source: &S,
        sink: &mut K,
    ) -> Result<Option<EncodedPacket>>
    where
        S: TelemetrySource + ?Sized,
        K: ByteSink + ?Sized,
    {
        if !self.gate.ready(now) {
            return Ok(None);
        }
        self.tick(source, sink)
    }
}
