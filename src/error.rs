//! Error types for telemetry encoding and transmission.
//!
//! The codec itself has no fatal conditions: encoding always succeeds, and the decoder
//! degrades to best-effort parsing. Errors come from the edges of the system.
//!
//! ## Error Categories
//!
//! - **Transport Errors**: the byte sink refused or failed a write
//! - **Packet Errors**: a buffer too short to be a packet, or a failed checksum self-check
//! - **Configuration Errors**: invalid thresholds, intervals or serial settings
//! - **Parse / File Errors**: configuration documents that cannot be read or parsed
//!
//! ## Recovery and Retry
//!
//! ```rust
//! use flightlink::TelemetryError;
//!
//! let error = TelemetryError::transport_failed("serial port disconnected");
//! if error.is_retryable() {
//!     for suggestion in error.recovery_suggestions() {
//!         println!("  - {}", suggestion);
//!     }
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for telemetry operations.
pub type Result<T, E = TelemetryError> = std::result::Result<T, E>;

/// Main error type for telemetry operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TelemetryError {
    #[error("Transport write failed: {reason}")]
    Transport {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Packet of {len} bytes is shorter than the 16-byte minimum")]
    TruncatedPacket { len: usize },

    #[error("Checksum self-check failed: residue {residue:#018x}")]
    ChecksumMismatch { residue: u64 },

    #[error("Invalid configuration: {reason}")]
    Config { reason: String },

    #[error("Parse error in {context}: {details}")]
    Parse { context: String, details: String },

    #[error("Configuration file error: {path}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TelemetryError {
    /// Returns whether this error is potentially recoverable through retry.
    ///
    /// Only transport failures qualify: the next cycle builds a fresh packet.
    pub fn is_retryable(&self) -> bool {
        match self {
            TelemetryError::Transport { .. } => true,
            TelemetryError::TruncatedPacket { .. } => false,
            TelemetryError::ChecksumMismatch { .. } => false,
            TelemetryError::Config { .. } => false,
            TelemetryError::Parse { .. } => false,
            TelemetryError::File { .. } => false,
        }
    }

    /// Returns suggested recovery actions for this error.
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            TelemetryError::Transport { .. } => vec![
                "Check the serial device is connected",
                "Verify the configured port name and baud rate",
                "Wait for the next cycle to send a fresh packet",
            ],
            TelemetryError::TruncatedPacket { .. } => vec![
                "Pass a complete packet buffer to the decoder",
                "Check the receiver frames packets on 8-byte boundaries",
            ],
            TelemetryError::ChecksumMismatch { .. } => vec![
                "Discard the corrupted packet",
                "Check line noise and baud rate agreement on the link",
            ],
            TelemetryError::Config { .. } => vec![
                "Use finite, non-negative thresholds",
                "Use a non-zero update interval and baud rate",
            ],
            TelemetryError::Parse { .. } => vec![
                "Check the YAML syntax of the configuration",
                "Use snake_case payload names in the enabled list",
            ],
            TelemetryError::File { .. } => vec![
                "Check the file exists and is readable",
                "Check file permissions",
            ],
        }
    }

    /// Helper constructor for transport errors.
    pub fn transport_failed(reason: impl Into<String>) -> Self {
        TelemetryError::Transport { reason: reason.into(), source: None }
    }

    /// Helper constructor for transport errors with source.
    pub fn transport_failed_with_source(
        reason: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        TelemetryError::Transport { reason: reason.into(), source: Some(source) }
    }

    /// Helper constructor for configuration errors.
    pub fn config_invalid(reason: impl Into<String>) -> Self {
        TelemetryError::Config { reason: reason.into() }
    }

    /// Helper constructor for file errors with path context.
    pub fn file_error(path: PathBuf, source: std::io::Error) -> Self {
        TelemetryError::File { path, source }
    }
}

impl From<std::io::Error> for TelemetryError {
    fn from(err: std::io::Error) -> Self {
        TelemetryError::File { path: PathBuf::from("<unknown>"), source: err }
    }
}
