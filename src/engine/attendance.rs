//! Attendance state machine.
//!
//! Each worker is either Idle (no open record) or OnSite (exactly one open
//! record). Punch-in moves Idle to OnSite after the worker's reported
//! position passes the geofence around their assigned site; punch-out closes
//! the open record without any location check.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::calculation::distance_meters;
use crate::clock::Clock;
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::geolocation::{PositionProvider, acquire_position};
use crate::models::{Attendance, GeoPoint, Site, generate_id};
use crate::storage::Store;

use super::locks::KeyedLocks;

/// Checks a position against a site's geofence.
///
/// Returns the distance in meters when it is within `radius_m`; a distance
/// equal to the radius is admitted.
///
/// # Examples
///
/// ```
/// use site_payroll_engine::engine::check_geofence;
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
///
/// assert!(check_geofence(GeoPoint::new(34.0522, -118.2437), &site, 0.0).is_ok());
/// assert!(check_geofence(GeoPoint::new(34.0622, -118.2537), &site, 500.0).is_err());
/// ```
pub fn check_geofence(position: GeoPoint, site: &Site, radius_m: f64) -> EngineResult<f64> {
    let distance_m = distance_meters(position, site.coordinates());
    if distance_m > radius_m {
        return Err(EngineError::GeofenceViolation {
            distance_m,
            radius_m,
        });
    }
    Ok(distance_m)
}

/// Drives punch-in and punch-out for every worker.
pub struct AttendanceTracker {
    store: Arc<dyn Store>,
    clock: Arc<dyn Clock>,
    geofence_radius_m: f64,
    location_timeout: Duration,
    shift_locks: KeyedLocks,
}

impl AttendanceTracker {
    /// Creates a tracker using the geofence radius and location timeout
    /// from `config`.
    pub fn new(store: Arc<dyn Store>, clock: Arc<dyn Clock>, config: &EngineConfig) -> Self {
        Self {
            store,
            clock,
            geofence_radius_m: config.geofence_radius_m,
            location_timeout: config.location_timeout(),
            shift_locks: KeyedLocks::default(),
        }
    }

    /// Returns the configured geofence radius in meters.
    pub fn geofence_radius_m(&self) -> f64 {
        self.geofence_radius_m
    }

    /// Starts a shift for `worker_id` at their assigned site.
    ///
    /// The worker must exist, be assigned to an existing site and have no
    /// open record. Only then is a position requested from `provider`; it
    /// must arrive within the configured timeout and lie inside the
    /// geofence. The open-record check is repeated under a per-worker lock
    /// immediately before the write.
    pub async fn punch_in(
        &self,
        worker_id: &str,
        provider: &dyn PositionProvider,
    ) -> EngineResult<Attendance> {
        let worker = self
            .store
            .list_workers()
            .await?
            .into_iter()
            .find(|w| w.id == worker_id)
            .ok_or_else(|| EngineError::WorkerNotFound {
                worker_id: worker_id.to_string(),
            })?;

        let site_id = worker
            .assigned_site_id
            .clone()
            .ok_or_else(|| EngineError::NotAssigned {
                worker_id: worker_id.to_string(),
            })?;

        let site = self
            .store
            .list_sites()
            .await?
            .into_iter()
            .find(|s| s.id == site_id)
            .ok_or_else(|| EngineError::SiteNotFound {
                site_id: site_id.clone(),
            })?;

        // Reject before asking for a position.
        self.ensure_idle(worker_id).await?;

        let position = acquire_position(provider, self.location_timeout).await?;

        let distance_m = match check_geofence(position, &site, self.geofence_radius_m) {
            Ok(distance_m) => distance_m,
            Err(err) => {
                warn!(
                    worker_id = %worker_id,
                    site_id = %site.id,
                    error = %err,
                    "Punch-in rejected by geofence"
                );
                return Err(err);
            }
        };

        let _guard = self.shift_locks.lock(worker_id).await;
        self.ensure_idle(worker_id).await?;

        let record = Attendance {
            id: generate_id("att"),
            worker_id: worker_id.to_string(),
            site_id: site.id.clone(),
            punch_in: self.clock.now(),
            punch_out: None,
            location: position,
            is_paid: false,
            settled_by: None,
        };
        let record = self.store.append_attendance(record).await?;

        info!(
            worker_id = %worker_id,
            site_id = %site.id,
            record_id = %record.id,
            distance_m = distance_m.round(),
            "Punched in"
        );
        Ok(record)
    }

    /// Closes the open record `record_id`, stamping the current time.
    pub async fn punch_out(&self, record_id: &str) -> EngineResult<Attendance> {
        let worker_id = self.find_record(record_id).await?.worker_id;

        let _guard = self.shift_locks.lock(&worker_id).await;
        let mut record = self.find_record(record_id).await?;

        if !record.is_open() {
            return Err(EngineError::AttendanceAlreadyClosed {
                record_id: record_id.to_string(),
            });
        }

        let now = self.clock.now();
        if now <= record.punch_in {
            return Err(EngineError::InvalidAttendance {
                record_id: record_id.to_string(),
                message: format!(
                    "punch-out at {} is not after punch-in at {}",
                    now, record.punch_in
                ),
            });
        }

        record.punch_out = Some(now);
        let record = self.store.update_attendance(record).await?;

        info!(
            worker_id = %record.worker_id,
            record_id = %record.id,
            hours = %record.worked_hours().unwrap_or_default().round_dp(2),
            "Punched out"
        );
        Ok(record)
    }

    /// Returns open records in insertion order, optionally for one worker.
    pub async fn active_records(&self, worker_id: Option<&str>) -> EngineResult<Vec<Attendance>> {
        Ok(self
            .store
            .list_attendance()
            .await?
            .into_iter()
            .filter(|a| a.is_open() && worker_id.is_none_or(|id| a.worker_id == id))
            .collect())
    }

    /// Returns closed records most recent first, optionally for one worker.
    pub async fn completed_records(
        &self,
        worker_id: Option<&str>,
    ) -> EngineResult<Vec<Attendance>> {
        let mut completed: Vec<Attendance> = self
            .store
            .list_attendance()
            .await?
            .into_iter()
            .filter(|a| !a.is_open() && worker_id.is_none_or(|id| a.worker_id == id))
            .collect();
        completed.reverse();
        Ok(completed)
    }

    async fn ensure_idle(&self, worker_id: &str) -> EngineResult<()> {
        let open = self
            .store
            .list_attendance()
            .await?
            .into_iter()
            .find(|a| a.worker_id == worker_id && a.is_open());

        match open {
            Some(record) => Err(EngineError::AlreadyOnShift {
                worker_id: worker_id.to_string(),
                record_id: record.id,
            }),
            None => Ok(()),
        }
    }

    async fn find_record(&self, record_id: &str) -> EngineResult<Attendance> {
        let found = self
            .store
            .list_attendance()
            .await?
            .into_iter()
            .find(|a| a.id == record_id);

        found.ok_or_else(|| {
            warn!(record_id = %record_id, "Punch-out for unknown attendance record");
            EngineError::AttendanceNotFound {
                record_id: record_id.to_string(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testing::{Fixture, offset_north};
    use crate::geolocation::{FixedPosition, LocationFailure, ReportedPosition};
    use chrono::Duration as ChronoDuration;

    #[tokio::test]
    async fn test_punch_in_at_site_coordinates_succeeds() {
        let fx = Fixture::new();
        let record = fx
            .tracker()
            .punch_in("w1", &FixedPosition(fx.site_point()))
            .await
            .unwrap();

        assert_eq!(record.worker_id, "w1");
        assert_eq!(record.site_id, "s1");
        assert_eq!(record.punch_in, fx.start);
        assert!(record.is_open());
        assert!(!record.is_paid);
        assert_eq!(record.location, fx.site_point());
    }

    #[tokio::test]
    async fn test_punch_in_at_site_succeeds_with_zero_radius() {
        let fx = Fixture::with_radius(0.0);
        let result = fx
            .tracker()
            .punch_in("w1", &FixedPosition(fx.site_point()))
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_just_inside_radius_succeeds() {
        let fx = Fixture::new();
        let position = offset_north(fx.site_point(), 499.0);
        assert!(fx.tracker().punch_in("w1", &FixedPosition(position)).await.is_ok());
    }

    #[tokio::test]
    async fn test_just_outside_radius_fails() {
        let fx = Fixture::new();
        let tracker = fx.tracker();
        let position = offset_north(fx.site_point(), 501.0);

        let err = tracker.punch_in("w1", &FixedPosition(position)).await.unwrap_err();

        match err {
            EngineError::GeofenceViolation {
                distance_m,
                radius_m,
            } => {
                assert!((distance_m - 501.0).abs() < 0.01);
                assert_eq!(radius_m, 500.0);
            }
            other => panic!("unexpected error: {}", other),
        }
        assert!(tracker.active_records(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unassigned_worker_cannot_punch_in() {
        let fx = Fixture::new();
        let err = fx
            .tracker()
            .punch_in("w3", &FixedPosition(fx.site_point()))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::NotAssigned { .. }));
    }

    #[tokio::test]
    async fn test_dangling_site_reference_is_reported() {
        let fx = Fixture::new();
        let err = fx
            .tracker()
            .punch_in("w4", &FixedPosition(fx.site_point()))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::SiteNotFound { site_id } if site_id == "s404"));
    }

    #[tokio::test]
    async fn test_unknown_worker_is_reported() {
        let fx = Fixture::new();
        let err = fx
            .tracker()
            .punch_in("nobody", &FixedPosition(fx.site_point()))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::WorkerNotFound { .. }));
    }

    #[tokio::test]
    async fn test_location_failure_creates_nothing() {
        let fx = Fixture::new();
        let tracker = fx.tracker();
        let provider = ReportedPosition(Err(LocationFailure::PermissionDenied));

        let err = tracker.punch_in("w1", &provider).await.unwrap_err();

        assert!(matches!(
            err,
            EngineError::LocationUnavailable {
                cause: LocationFailure::PermissionDenied
            }
        ));
        assert!(tracker.active_records(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_second_punch_in_is_rejected_before_location() {
        let fx = Fixture::new();
        let tracker = fx.tracker();
        let first = tracker
            .punch_in("w1", &FixedPosition(fx.site_point()))
            .await
            .unwrap();

        // A failing provider proves the position was never requested.
        let provider = ReportedPosition(Err(LocationFailure::PositionUnavailable));
        let err = tracker.punch_in("w1", &provider).await.unwrap_err();

        match err {
            EngineError::AlreadyOnShift { record_id, .. } => assert_eq!(record_id, first.id),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[tokio::test]
    async fn test_concurrent_punch_ins_open_one_shift() {
        let fx = Fixture::new();
        let tracker = Arc::new(fx.tracker());
        let point = fx.site_point();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let tracker = Arc::clone(&tracker);
            handles.push(tokio::spawn(async move {
                tracker.punch_in("w1", &FixedPosition(point)).await
            }));
        }

        let mut successes = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(err) => assert!(matches!(err, EngineError::AlreadyOnShift { .. })),
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(tracker.active_records(Some("w1")).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_punch_out_closes_record() {
        let fx = Fixture::new();
        let tracker = fx.tracker();
        let record = tracker
            .punch_in("w1", &FixedPosition(fx.site_point()))
            .await
            .unwrap();

        fx.clock.advance(ChronoDuration::minutes(270));
        let closed = tracker.punch_out(&record.id).await.unwrap();

        assert_eq!(closed.punch_out, Some(fx.start + ChronoDuration::minutes(270)));
        assert_eq!(closed.location, record.location);
        assert!(tracker.active_records(None).await.unwrap().is_empty());
        assert_eq!(tracker.completed_records(Some("w1")).await.unwrap(), vec![closed]);
    }

    #[tokio::test]
    async fn test_punch_out_has_no_geofence() {
        let fx = Fixture::with_radius(0.0);
        let tracker = fx.tracker();
        let record = tracker
            .punch_in("w1", &FixedPosition(fx.site_point()))
            .await
            .unwrap();
        fx.clock.advance(ChronoDuration::hours(1));
        assert!(tracker.punch_out(&record.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_punch_out_unknown_record() {
        let fx = Fixture::new();
        let err = fx.tracker().punch_out("att-missing").await.unwrap_err();
        assert!(matches!(err, EngineError::AttendanceNotFound { .. }));
    }

    #[tokio::test]
    async fn test_punch_out_twice_is_rejected() {
        let fx = Fixture::new();
        let tracker = fx.tracker();
        let record = tracker
            .punch_in("w1", &FixedPosition(fx.site_point()))
            .await
            .unwrap();
        fx.clock.advance(ChronoDuration::hours(1));
        tracker.punch_out(&record.id).await.unwrap();

        let err = tracker.punch_out(&record.id).await.unwrap_err();
        assert!(matches!(err, EngineError::AttendanceAlreadyClosed { .. }));
    }

    #[tokio::test]
    async fn test_punch_out_at_same_instant_is_rejected() {
        let fx = Fixture::new();
        let tracker = fx.tracker();
        let record = tracker
            .punch_in("w1", &FixedPosition(fx.site_point()))
            .await
            .unwrap();

        let err = tracker.punch_out(&record.id).await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidAttendance { .. }));
        assert!(tracker.find_record(&record.id).await.unwrap().is_open());
    }

    #[tokio::test]
    async fn test_worker_can_punch_in_again_after_punch_out() {
        let fx = Fixture::new();
        let tracker = fx.tracker();
        let first = tracker
            .punch_in("w1", &FixedPosition(fx.site_point()))
            .await
            .unwrap();
        fx.clock.advance(ChronoDuration::hours(8));
        tracker.punch_out(&first.id).await.unwrap();
        fx.clock.advance(ChronoDuration::hours(16));

        let second = tracker
            .punch_in("w1", &FixedPosition(fx.site_point()))
            .await
            .unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(tracker.active_records(Some("w1")).await.unwrap(), vec![second]);
    }

    #[tokio::test]
    async fn test_queries_filter_by_worker_and_order_completed_recent_first() {
        let fx = Fixture::new();
        let tracker = fx.tracker();

        let a = tracker
            .punch_in("w1", &FixedPosition(fx.site_point()))
            .await
            .unwrap();
        fx.clock.advance(ChronoDuration::hours(1));
        tracker.punch_out(&a.id).await.unwrap();
        let b = tracker
            .punch_in("w1", &FixedPosition(fx.site_point()))
            .await
            .unwrap();
        fx.clock.advance(ChronoDuration::hours(1));
        tracker.punch_out(&b.id).await.unwrap();
        let c = tracker
            .punch_in("w2", &FixedPosition(fx.site_point()))
            .await
            .unwrap();

        let completed: Vec<String> = tracker
            .completed_records(Some("w1"))
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(completed, vec![b.id.clone(), a.id.clone()]);

        let active = tracker.active_records(None).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, c.id);
        assert!(tracker.active_records(Some("w1")).await.unwrap().is_empty());
    }
}
