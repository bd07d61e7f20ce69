//! Attendance model.
//!
//! An attendance record is created open on punch-in, closed once on
//! punch-out, and marked paid at most once by a salary settlement.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::GeoPoint;

const MILLIS_PER_HOUR: i64 = 3_600_000;

/// Converts a millisecond duration to fractional hours.
pub fn hours_from_millis(millis: i64) -> Decimal {
    Decimal::new(millis, 0) / Decimal::new(MILLIS_PER_HOUR, 0)
}

/// Represents one shift of one worker at one site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attendance {
    /// Unique identifier for the record.
    pub id: String,
    /// The worker who punched in.
    pub worker_id: String,
    /// The worker's assigned site at punch-in time.
    pub site_id: String,
    /// When the shift started.
    pub punch_in: DateTime<Utc>,
    /// When the shift ended; `None` while the shift is open.
    #[serde(default)]
    pub punch_out: Option<DateTime<Utc>>,
    /// Device position captured at punch-in.
    pub location: GeoPoint,
    /// Whether a salary settlement has paid for this shift.
    #[serde(default)]
    pub is_paid: bool,
    /// Id of the payroll transaction that settled this shift.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settled_by: Option<String>,
}

impl Attendance {
    /// Returns true while the shift has not been punched out.
    pub fn is_open(&self) -> bool {
        self.punch_out.is_none()
    }

    /// Returns true for a closed shift that no settlement has paid for.
    pub fn is_unsettled(&self) -> bool {
        self.punch_out.is_some() && !self.is_paid
    }

    /// Returns the worked hours for a closed shift, or `None` if open.
    ///
    /// Hours are fractional with millisecond precision.
    ///
    /// # Examples
    ///
    /// ```
    /// use site_payroll_engine::models::{Attendance, GeoPoint};
    /// use chrono::{Duration, TimeZone, Utc};
    /// use rust_decimal::Decimal;
    ///
    /// let start = Utc.with_ymd_and_hms(2026, 3, 2, 7, 0, 0).unwrap();
    /// let record = Attendance {
    ///     id: "att-1".to_string(),
    ///     worker_id: "w1".to_string(),
    ///     site_id: "s1".to_string(),
    ///     punch_in: start,
    ///     punch_out: Some(start + Duration::minutes(270)),
    ///     location: GeoPoint::new(34.0522, -118.2437),
    ///     is_paid: false,
    ///     settled_by: None,
    /// };
    /// assert_eq!(record.worked_hours(), Some(Decimal::new(45, 1))); // 4.5
    /// ```
    pub fn worked_hours(&self) -> Option<Decimal> {
        self.worked_millis().map(hours_from_millis)
    }

    /// Returns the shift length in milliseconds, or `None` if open.
    ///
    /// Totals across records should add these up and convert once with
    /// [`hours_from_millis`].
    pub fn worked_millis(&self) -> Option<i64> {
        self.punch_out.map(|out| (out - self.punch_in).num_milliseconds())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn make_record(hours_worked: Option<i64>) -> Attendance {
        let start = Utc.with_ymd_and_hms(2026, 3, 2, 7, 0, 0).unwrap();
        Attendance {
            id: "att-1".to_string(),
            worker_id: "w1".to_string(),
            site_id: "s1".to_string(),
            punch_in: start,
            punch_out: hours_worked.map(|h| start + Duration::hours(h)),
            location: GeoPoint::new(34.0522, -118.2437),
            is_paid: false,
            settled_by: None,
        }
    }

    #[test]
    fn test_open_record() {
        let record = make_record(None);
        assert!(record.is_open());
        assert!(!record.is_unsettled());
        assert_eq!(record.worked_hours(), None);
    }

    #[test]
    fn test_closed_unpaid_record_is_unsettled() {
        let record = make_record(Some(9));
        assert!(!record.is_open());
        assert!(record.is_unsettled());
        assert_eq!(record.worked_hours(), Some(Decimal::new(9, 0)));
    }

    #[test]
    fn test_paid_record_is_not_unsettled() {
        let mut record = make_record(Some(8));
        record.is_paid = true;
        assert!(!record.is_unsettled());
    }

    #[test]
    fn test_fractional_hours_to_the_millisecond() {
        let mut record = make_record(None);
        record.punch_out = Some(record.punch_in + Duration::milliseconds(5_400_000 + 360));
        // 1.5 hours and 360ms = 1.5001 hours
        assert_eq!(record.worked_hours(), Some(Decimal::new(15001, 4)));
        assert_eq!(record.worked_millis(), Some(5_400_360));
    }

    #[test]
    fn test_missing_paid_flag_defaults_to_false() {
        let json = r#"{
            "id": "att-7",
            "worker_id": "w1",
            "site_id": "s1",
            "punch_in": "2026-03-02T07:00:00Z",
            "punch_out": "2026-03-02T16:00:00Z",
            "location": { "latitude": 34.0522, "longitude": -118.2437 }
        }"#;

        let record: Attendance = serde_json::from_str(json).unwrap();
        assert!(!record.is_paid);
        assert!(record.settled_by.is_none());
        assert!(record.is_unsettled());
    }

    #[test]
    fn test_open_record_deserializes_without_punch_out() {
        let json = r#"{
            "id": "att-8",
            "worker_id": "w2",
            "site_id": "s2",
            "punch_in": "2026-03-02T07:00:00Z",
            "location": { "latitude": 34.0622, "longitude": -118.2537 }
        }"#;

        let record: Attendance = serde_json::from_str(json).unwrap();
        assert!(record.is_open());
    }
}
