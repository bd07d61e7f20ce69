//! Core data models for the site payroll engine.
//!
//! This module contains the domain records shared by the attendance state
//! machine, the wage accrual calculator, and the settlement coordinator.

mod attendance;
mod audit;
mod location;
mod site;
mod transaction;
mod worker;

use uuid::Uuid;

pub use attendance::{Attendance, hours_from_millis};
pub use audit::AuditStep;
pub use location::GeoPoint;
pub use site::{Site, SiteStatus};
pub use transaction::{PaymentKind, Transaction, TransactionType};
pub use worker::Worker;

/// Generates a fresh record id with the given prefix, e.g. `att-1f0c...`.
pub fn generate_id(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4().simple())
}
