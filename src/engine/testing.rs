//! Shared fixtures for engine tests.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;

use crate::clock::ManualClock;
use crate::config::EngineConfig;
use crate::models::{GeoPoint, Site, SiteStatus, Worker};
use crate::storage::{InMemoryStore, Snapshot};

use super::{AttendanceTracker, Bookkeeper, PayrollCoordinator, Roster};

/// Meters per degree of latitude on the haversine sphere.
const METERS_PER_DEGREE: f64 = 111_194.926_644_558_7;

/// Moves `point` due north by `meters` along the meridian.
pub(crate) fn offset_north(point: GeoPoint, meters: f64) -> GeoPoint {
    GeoPoint::new(point.latitude + meters / METERS_PER_DEGREE, point.longitude)
}

pub(crate) fn create_site(id: &str, latitude: f64, longitude: f64, budget: i64) -> Site {
    Site {
        id: id.to_string(),
        name: format!("Site {}", id),
        location: "Downtown".to_string(),
        latitude,
        longitude,
        client_name: "City Council".to_string(),
        budget: Decimal::new(budget, 0),
        status: SiteStatus::Ongoing,
    }
}

pub(crate) fn create_worker(id: &str, daily_rate: i64, site_id: Option<&str>) -> Worker {
    Worker {
        id: id.to_string(),
        name: format!("Worker {}", id),
        role: "Labourer".to_string(),
        daily_rate: Decimal::new(daily_rate, 0),
        assigned_site_id: site_id.map(str::to_string),
        phone: "555-0100".to_string(),
        credential: None,
    }
}

/// Two sites and four workers: w1 and w2 assigned to s1, w3 unassigned,
/// w4 pointing at a site that does not exist.
pub(crate) fn seed() -> Snapshot {
    Snapshot {
        sites: vec![
            create_site("s1", 34.0522, -118.2437, 1_000_000),
            create_site("s2", 34.0622, -118.2537, 450_000),
        ],
        workers: vec![
            create_worker("w1", 300, Some("s1")),
            create_worker("w2", 450, Some("s1")),
            create_worker("w3", 180, None),
            create_worker("w4", 200, Some("s404")),
        ],
        attendance: Vec::new(),
        transactions: Vec::new(),
    }
}

pub(crate) struct Fixture {
    pub store: Arc<InMemoryStore>,
    pub clock: Arc<ManualClock>,
    pub config: EngineConfig,
    pub start: DateTime<Utc>,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_radius(radius_m: f64) -> Self {
        Self::with_config(EngineConfig {
            geofence_radius_m: radius_m,
            ..EngineConfig::default()
        })
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let start = Utc.with_ymd_and_hms(2026, 3, 2, 7, 0, 0).unwrap();
        Self {
            store: Arc::new(InMemoryStore::new(seed())),
            clock: Arc::new(ManualClock::new(start)),
            config,
            start,
        }
    }

    pub fn site_point(&self) -> GeoPoint {
        GeoPoint::new(34.0522, -118.2437)
    }

    pub fn tracker(&self) -> AttendanceTracker {
        AttendanceTracker::new(self.store.clone(), self.clock.clone(), &self.config)
    }

    pub fn payroll(&self) -> PayrollCoordinator {
        PayrollCoordinator::new(self.store.clone(), self.clock.clone(), &self.config)
    }

    pub fn roster(&self) -> Roster {
        Roster::new(self.store.clone())
    }

    pub fn books(&self) -> Bookkeeper {
        Bookkeeper::new(self.store.clone(), self.clock.clone(), &self.config)
    }
}
