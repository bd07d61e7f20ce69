//! Site model and related types.
//!
//! A site is a construction project with a fixed location. Its coordinates
//! are the centre of the geofence workers must be inside to punch in.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::GeoPoint;

/// Lifecycle status of a site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SiteStatus {
    /// Work is in progress.
    Ongoing,
    /// The project has been handed over.
    Completed,
    /// Work is paused.
    OnHold,
}

/// Represents a construction site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    /// Unique identifier for the site.
    pub id: String,
    /// Display name of the site.
    pub name: String,
    /// Free-form location label (e.g. "North Wing").
    pub location: String,
    /// Latitude of the site centre, in decimal degrees.
    pub latitude: f64,
    /// Longitude of the site centre, in decimal degrees.
    pub longitude: f64,
    /// Name of the client the site is built for.
    pub client_name: String,
    /// Total budget for the site.
    pub budget: Decimal,
    /// Current lifecycle status.
    pub status: SiteStatus,
}

impl Site {
    /// Returns the site centre as a point.
    ///
    /// # Examples
    ///
    /// ```
    /// use site_payroll_engine::models::{GeoPoint, Site, SiteStatus};
    /// use rust_decimal::Decimal;
    ///
    /// let site = Site {
    ///     id: "s1".to_string(),
    ///     name: "Emerald Heights".to_string(),
    ///     location: "North Wing".to_string(),
    ///     latitude: 34.0522,
    ///     longitude: -118.2437,
    ///     client_name: "Vertex Corp".to_string(),
    ///     budget: Decimal::new(1_200_000, 0),
    ///     status: SiteStatus::Ongoing,
    /// };
    /// assert_eq!(site.coordinates(), GeoPoint::new(34.0522, -118.2437));
    /// ```
    pub fn coordinates(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}
