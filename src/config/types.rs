//! Configuration types for the site payroll engine.
//!
//! This module contains the strongly-typed configuration structure that is
//! deserialized from the YAML engine configuration file.

use std::time::Duration;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Default geofence radius in meters.
pub const DEFAULT_GEOFENCE_RADIUS_M: f64 = 500.0;

/// Default time to wait for a position fix, in milliseconds.
pub const DEFAULT_LOCATION_TIMEOUT_MS: u64 = 10_000;

/// Default site id for transactions not charged to a site.
pub const DEFAULT_OVERHEAD_SITE_ID: &str = "general";

/// Tunable engine parameters.
///
/// Every field has a default, so an empty file is a valid configuration.
///
/// # Example
///
/// ```
/// use site_payroll_engine::config::EngineConfig;
/// use rust_decimal::Decimal;
///
/// let config = EngineConfig::default();
/// assert_eq!(config.geofence_radius_m, 500.0);
/// assert_eq!(config.reference_shift_hours, Decimal::new(9, 0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum admitted distance from the site centre at punch-in, in meters.
    ///
    /// Deployments have used both 500 and 1000; 500 is the default.
    pub geofence_radius_m: f64,
    /// How long punch-in waits for a position fix, in milliseconds.
    pub location_timeout_ms: u64,
    /// Hours of work one daily rate pays for.
    pub reference_shift_hours: Decimal,
    /// Site id recorded on transactions charged to general overhead.
    pub overhead_site_id: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            geofence_radius_m: DEFAULT_GEOFENCE_RADIUS_M,
            location_timeout_ms: DEFAULT_LOCATION_TIMEOUT_MS,
            reference_shift_hours: crate::calculation::default_reference_shift_hours(),
            overhead_site_id: DEFAULT_OVERHEAD_SITE_ID.to_string(),
        }
    }
}

impl EngineConfig {
    /// Returns the position acquisition timeout.
    pub fn location_timeout(&self) -> Duration {
        Duration::from_millis(self.location_timeout_ms)
    }

    /// Checks the values are usable, returning a description of the first
    /// problem found.
    pub fn validate(&self) -> Result<(), String> {
        if !self.geofence_radius_m.is_finite() || self.geofence_radius_m < 0.0 {
            return Err(format!(
                "geofence_radius_m must be a non-negative number, got {}",
                self.geofence_radius_m
            ));
        }
        if self.location_timeout_ms == 0 {
            return Err("location_timeout_ms must be greater than zero".to_string());
        }
        if self.reference_shift_hours <= Decimal::ZERO {
            return Err(format!(
                "reference_shift_hours must be positive, got {}",
                self.reference_shift_hours
            ));
        }
        if self.overhead_site_id.trim().is_empty() {
            return Err("overhead_site_id must not be empty".to_string());
        }
        Ok(())
    }
}
