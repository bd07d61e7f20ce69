//! Worker model.
//!
//! This module defines the Worker struct for representing site labour in
//! the attendance and payroll system.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Represents a worker who can punch in at their assigned site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Worker {
    /// Unique identifier for the worker.
    pub id: String,
    /// The worker's name.
    pub name: String,
    /// Job role label (e.g. "Site Supervisor").
    pub role: String,
    /// Pay for a full reference shift.
    pub daily_rate: Decimal,
    /// The site the worker is currently assigned to, or `None` for the
    /// unassigned pool.
    #[serde(default)]
    pub assigned_site_id: Option<String>,
    /// Contact phone number.
    pub phone: String,
    /// Optional login credential. Never returned by the HTTP API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<String>,
}

impl Worker {
    /// Returns true if the worker is in the unassigned pool.
    ///
    /// # Examples
    ///
    /// ```
    /// use site_payroll_engine::models::Worker;
    /// use rust_decimal::Decimal;
    ///
    /// let worker = Worker {
    ///     id: "w1".to_string(),
    ///     name: "Alex Thompson".to_string(),
    ///     role: "Chief Engineer".to_string(),
    ///     daily_rate: Decimal::new(450, 0),
    ///     assigned_site_id: None,
    ///     phone: "1234567890".to_string(),
    ///     credential: None,
    /// };
    /// assert!(worker.is_unassigned());
    /// ```
    pub fn is_unassigned(&self) -> bool {
        self.assigned_site_id.is_none()
    }
}
