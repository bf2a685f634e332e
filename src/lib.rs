//! Telemetry link from a spaceflight simulation to an external flight computer.
//!
//! FlightLink samples vessel state, decides which fields changed enough to be worth
//! sending, and frames them into compact checksummed packets for a byte-oriented link
//! such as a serial port.
//!
//! # Features
//!
//! - **Change detection**: per-field thresholds keep the link quiet while nothing moves
//! - **Compact framing**: typed big-endian values, 8-byte alignment, XOR-fold checksum
//! - **Diagnostics**: a lenient decoder renders packets for inspection
//! - **Async transmit loop**: a tokio task drives cycles at the configured interval
//!
//! # Quick Start
//!
//! ```rust
//! use flightlink::{MemorySink, TelemetryConfig, TelemetryDriver, VesselSnapshot};
//!
//! let mut driver = TelemetryDriver::new(&TelemetryConfig::default());
//! let mut sink = MemorySink::new();
//! let snapshot = VesselSnapshot { altitude: 1000.0, stage: 2, ..Default::default() };
//!
//! let packet = driver.tick(&snapshot, &mut sink).unwrap().unwrap();
//! assert_eq!(packet.id, 0);
//! assert_eq!(sink.len(), 1);
//!
//! // Nothing moved, nothing sent
//! assert!(driver.tick(&snapshot, &mut sink).unwrap().is_none());
//! ```
//!
//! ## Example (async transmitter)
//!
//! ```rust,no_run
//! use flightlink::{FlightLink, TelemetryConfig, VesselSnapshot, WriterSink};
//! use futures::StreamExt;
//! use tokio::sync::watch;
//!
//! #[tokio::main]
//! async fn main() -> flightlink::Result<()> {
//!     let config = TelemetryConfig::from_path("flightlink.yaml")?;
//!     let (_snapshots, source) = watch::channel(VesselSnapshot::default());
//!     let port = std::fs::OpenOptions::new().write(true).open(&config.port_name)?;
//!
//!     let link = FlightLink::spawn(&config, source, WriterSink::new(port))?;
//!     let mut packets = std::pin::pin!(link.packets());
//!     while let Some(packet) = packets.next().await {
//!         println!("sent packet {} ({} bytes)", packet.id, packet.len());
//!     }
//!     Ok(())
//! }
//! ```

mod error;
#[cfg_attr(any(test, feature = "benchmark"), path = "test_utils.rs")]
#[cfg(any(test, feature = "benchmark"))]
pub mod test_utils;
pub mod types;

// Packet pipeline
pub mod change_detector;
pub mod codec;
pub mod config;
pub mod driver;
pub mod transmitter;

// Collaborator capabilities
pub mod sink;
pub mod source;

// Core exports
pub use error::*;
pub use types::*;

pub use change_detector::{ChangeDetector, Thresholds};
pub use codec::{DecodedPacket, Field, checksum, decode, encode};
pub use config::TelemetryConfig;
pub use driver::{DriverState, EncodedPacket, TelemetryDriver, UpdateGate};
pub use sink::{ByteSink, MemorySink, WriterSink};
pub use source::{Reading, TelemetrySource, VesselSnapshot, sample};
pub use transmitter::{StopReason, TransmitStats, Transmitter, TransmitterChannels};

/// Unified entry point for starting a telemetry link.
pub struct FlightLink;

impl FlightLink {
    /// Start transmitting on the current tokio runtime.
    ///
    /// Validates `config`, builds a driver from it and hands the driver, the source and
    /// the sink to a [`Transmitter`] task. Cancel through the returned channels to stop.
    ///
    /// # Example
    ///
    /// ```rust
    /// use flightlink::{FlightLink, MemorySink, TelemetryConfig, VesselSnapshot};
    ///
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() {
    /// let sink = MemorySink::new();
    /// let snapshot = VesselSnapshot { altitude: 80.0, ..Default::default() };
    /// let config = TelemetryConfig::default();
    /// let link = FlightLink::spawn(&config, snapshot, sink.clone()).unwrap();
    ///
    /// let stats = link.shutdown().await.unwrap();
    /// assert!(stats.packets <= 1);
    /// # }
    /// ```
    pub fn spawn<S, K>(
        config: &TelemetryConfig,
        source: S,
        sink: K,
    ) -> Result<TransmitterChannels>
    where
        S: TelemetrySource + Send + 'static,
        K: ByteSink + Send + 'static,
    {
        config.validate()?;
        Transmitter::spawn(TelemetryDriver::new(config), source, sink)
    }
}
