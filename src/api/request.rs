//! Request types for the site payroll API.
//!
//! Payroll and ledger entry bodies deserialize straight into the engine's
//! [`PayrollRequest`](crate::engine::PayrollRequest) and
//! [`NewTransaction`](crate::engine::NewTransaction); the types here cover
//! the remaining endpoints.

use serde::{Deserialize, Serialize};

use crate::geolocation::{LocationFailure, ReportedPosition};
use crate::models::GeoPoint;

/// Request body for `POST /attendance/punch-in`.
///
/// The client reports either the device position or why it could not get
/// one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PunchInRequest {
    /// The worker punching in.
    pub worker_id: String,
    /// The device position, if one was obtained.
    #[serde(default)]
    pub position: Option<GeoPoint>,
    /// Why no position was obtained.
    #[serde(default)]
    pub location_error: Option<LocationFailure>,
}

impl PunchInRequest {
    /// Returns the reported position as a provider for the tracker.
    pub fn provider(&self) -> ReportedPosition {
        ReportedPosition::from_parts(self.position, self.location_error)
    }
}

/// Request body for `PUT /workers/:id/site`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReassignRequest {
    /// The new site, or null for the unassigned pool.
    #[serde(default)]
    pub site_id: Option<String>,
}

/// Optional `worker_id` query filter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkerFilter {
    /// Restrict results to this worker.
    #[serde(default)]
    pub worker_id: Option<String>,
}
