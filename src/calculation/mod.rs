//! Calculation logic for the site payroll engine.
//!
//! This module contains the pure functions behind attendance and payroll:
//! great-circle distance for geofence admission, wage accrual over unsettled
//! attendance, and the read-only ledger projections for sites and workers.

mod distance;
mod ledger;
mod wage_accrual;

pub use distance::{EARTH_RADIUS_METERS, distance_meters};
pub use ledger::{
    PortfolioTotals, SiteSummary, WorkerLedger, portfolio_totals, site_summary,
    sort_recent_first, worker_ledger,
};
pub use wage_accrual::{WageAccrual, calculate_wage_accrual, default_reference_shift_hours};
