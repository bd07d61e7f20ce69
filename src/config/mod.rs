//! Configuration loading and management for the site payroll engine.
//!
//! This module loads the engine's tunable parameters (geofence radius,
//! location timeout, reference shift length, overhead site id) from YAML.
//!
//! # Example
//!
//! ```no_run
//! use site_payroll_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/engine.yaml").unwrap();
//! println!("Reference shift: {} hrs", config.config().reference_shift_hours);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    DEFAULT_GEOFENCE_RADIUS_M, DEFAULT_LOCATION_TIMEOUT_MS, DEFAULT_OVERHEAD_SITE_ID, EngineConfig,
};
