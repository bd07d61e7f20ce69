//! Error types for the site payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every condition the attendance and payroll components can report.
//! None of them are fatal: callers surface them and simply skip the
//! operation.

use thiserror::Error;

use crate::geolocation::LocationFailure;

/// The main error type for the site payroll engine.
///
/// # Example
///
/// ```
/// use site_payroll_engine::error::EngineError;
///
/// let error = EngineError::NotAssigned {
///     worker_id: "w1".to_string(),
/// };
/// assert_eq!(error.to_string(), "Worker 'w1' is not assigned to a site");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// The worker id does not resolve to a worker.
    #[error("Worker not found: {worker_id}")]
    WorkerNotFound {
        /// The worker id that was not found.
        worker_id: String,
    },

    /// The worker is in the unassigned pool and cannot punch in.
    #[error("Worker '{worker_id}' is not assigned to a site")]
    NotAssigned {
        /// The unassigned worker.
        worker_id: String,
    },

    /// A site id does not resolve to a site.
    #[error("Site not found: {site_id}")]
    SiteNotFound {
        /// The site id that was not found.
        site_id: String,
    },

    /// The device position could not be obtained.
    #[error("Location unavailable: {cause}")]
    LocationUnavailable {
        /// Why the position could not be obtained.
        cause: LocationFailure,
    },

    /// The reported position lies outside the site's geofence.
    #[error("Location mismatch: {distance_m:.0}m from site, must be within {radius_m:.0}m")]
    GeofenceViolation {
        /// Distance from the position to the site, in meters.
        distance_m: f64,
        /// The configured geofence radius, in meters.
        radius_m: f64,
    },

    /// The worker already has an open attendance record.
    #[error("Worker '{worker_id}' is already punched in (record '{record_id}')")]
    AlreadyOnShift {
        /// The worker attempting to punch in.
        worker_id: String,
        /// The open record.
        record_id: String,
    },

    /// No attendance record has the given id.
    #[error("Attendance record not found: {record_id}")]
    AttendanceNotFound {
        /// The record id that was not found.
        record_id: String,
    },

    /// The attendance record has already been punched out.
    #[error("Attendance record '{record_id}' is already closed")]
    AttendanceAlreadyClosed {
        /// The closed record.
        record_id: String,
    },

    /// An attendance transition would break a record invariant.
    #[error("Invalid attendance record '{record_id}': {message}")]
    InvalidAttendance {
        /// The record being transitioned.
        record_id: String,
        /// What was wrong.
        message: String,
    },

    /// A monetary amount was rejected.
    #[error("Invalid amount {amount}: {message}")]
    InvalidAmount {
        /// The rejected amount, as supplied.
        amount: String,
        /// Why it was rejected.
        message: String,
    },

    /// A settlement request referenced attendance it cannot consume.
    #[error("Invalid settlement for record '{record_id}': {message}")]
    InvalidSettlement {
        /// The offending record id.
        record_id: String,
        /// Why it cannot be settled.
        message: String,
    },

    /// The persistence collaborator failed.
    #[error("Storage error: {message}")]
    Storage {
        /// A description of the storage failure.
        message: String,
    },
}

impl EngineError {
    /// Returns true if the caller may retry the same request unchanged or
    /// after the user moves or re-enables location services.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            EngineError::LocationUnavailable { .. } | EngineError::GeofenceViolation { .. }
        )
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/engine.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/engine.yaml"
        );
    }

    #[test]
    fn test_not_assigned_displays_worker() {
        let error = EngineError::NotAssigned {
            worker_id: "w7".to_string(),
        };
        assert_eq!(error.to_string(), "Worker 'w7' is not assigned to a site");
    }

    #[test]
    fn test_geofence_violation_rounds_distances() {
        let error = EngineError::GeofenceViolation {
            distance_m: 1443.98,
            radius_m: 500.0,
        };
        assert_eq!(
            error.to_string(),
            "Location mismatch: 1444m from site, must be within 500m"
        );
    }

    #[test]
    fn test_location_unavailable_displays_cause() {
        let error = EngineError::LocationUnavailable {
            cause: LocationFailure::PermissionDenied,
        };
        assert_eq!(
            error.to_string(),
            "Location unavailable: location permission denied"
        );
    }

    #[test]
    fn test_already_on_shift_displays_record() {
        let error = EngineError::AlreadyOnShift {
            worker_id: "w1".to_string(),
            record_id: "att-1".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Worker 'w1' is already punched in (record 'att-1')"
        );
    }

    #[test]
    fn test_invalid_settlement_displays_record_and_message() {
        let error = EngineError::InvalidSettlement {
            record_id: "att-9".to_string(),
            message: "already paid".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid settlement for record 'att-9': already paid"
        );
    }

    #[test]
    fn test_retryable_kinds() {
        assert!(
            EngineError::GeofenceViolation {
                distance_m: 600.0,
                radius_m: 500.0
            }
            .is_retryable()
        );
        assert!(
            EngineError::LocationUnavailable {
                cause: LocationFailure::Timeout
            }
            .is_retryable()
        );
        assert!(
            !EngineError::NotAssigned {
                worker_id: "w1".to_string()
            }
            .is_retryable()
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_site_not_found() -> EngineResult<()> {
            Err(EngineError::SiteNotFound {
                site_id: "s9".to_string(),
            })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_site_not_found()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
