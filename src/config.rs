//! Telemetry configuration
//!
//! Every key is optional; a missing key takes its default. The serial settings are carried
//! for whichever transport opens the port and are only validated here.
//!
//! ```rust
//! use flightlink::TelemetryConfig;
//! use flightlink::types::PayloadType;
//!
//! let config = TelemetryConfig::from_yaml_str(
//!     "enabled: [altitude, stage]\nupdate_interval_ms: 250\n",
//! )
//! .unwrap();
//! assert!(config.enabled.is_enabled(PayloadType::Stage));
//! assert_eq!(config.port_name, "COM4");
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::change_detector::Thresholds;
use crate::types::{FieldSet, PayloadType};
use crate::{Result, TelemetryError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Payload types considered for transmission
    pub enabled: FieldSet,
    pub thresholds: Thresholds,
    /// Minimum time between cycles
    pub update_interval_ms: u64,
    pub port_name: String,
    pub baud_rate: u32,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        let enabled = [
            PayloadType::Altitude,
            PayloadType::SurfaceSpeed,
            PayloadType::OrbitalSpeed,
            PayloadType::Apoapsis,
            PayloadType::Periapsis,
            PayloadType::Stage,
            PayloadType::SphereOfInfluence,
            PayloadType::Latitude,
            PayloadType::Longitude,
            PayloadType::OrbitalPeriod,
            PayloadType::GForce,
        ]
        .into_iter()
        .collect();

        Self {
            enabled,
            thresholds: Thresholds::default(),
            update_interval_ms: 100,
            port_name: "COM4".to_string(),
            baud_rate: 115_200,
        }
    }
}

impl TelemetryConfig {
    pub fn update_interval(&self) -> Duration {
        Duration::from_millis(self.update_interval_ms)
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml).map_err(|e| TelemetryError::Parse {
            context: "configuration".to_string(),
            details: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| TelemetryError::file_error(path.to_path_buf(), e))?;
        debug!("Loaded configuration from {} ({} bytes)", path.display(), yaml.len());
        Self::from_yaml_str(&yaml)
    }

    pub fn validate(&self) -> Result<()> {
        self.thresholds.validate()?;
        if self.update_interval_ms == 0 {
            return Err(TelemetryError::config_invalid("update interval must be non-zero"));
        }
        if self.baud_rate == 0 {
            return Err(TelemetryError::config_invalid("baud rate must be non-zero"));
        }
        Ok(())
    }
}
