//! Stateful engine components.
//!
//! Each component holds the [`Store`] and [`Clock`] it works against and
//! performs one family of operations:
//!
//! - [`AttendanceTracker`]: punch-in and punch-out
//! - [`PayrollCoordinator`]: wage accrual and settlement
//! - [`Roster`]: site assignment
//! - [`Bookkeeper`]: ledger entries and financial projections
//!
//! [`SiteEngine`] bundles all four over one shared store.

mod attendance;
mod bookkeeping;
mod locks;
mod payroll;
mod roster;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

use crate::clock::Clock;
use crate::config::EngineConfig;
use crate::storage::Store;

pub use attendance::{AttendanceTracker, check_geofence};
pub use bookkeeping::{Bookkeeper, NewTransaction};
pub use payroll::{PayrollCoordinator, PayrollReceipt, PayrollRequest};
pub use roster::Roster;

/// Every engine component over one store and clock.
pub struct SiteEngine {
    /// Punch-in and punch-out.
    pub attendance: AttendanceTracker,
    /// Accrual and settlement.
    pub payroll: PayrollCoordinator,
    /// Site assignment.
    pub roster: Roster,
    /// Ledger entries and projections.
    pub books: Bookkeeper,
    config: EngineConfig,
}

impl SiteEngine {
    /// Builds every component from `config`.
    pub fn new(store: Arc<dyn Store>, clock: Arc<dyn Clock>, config: EngineConfig) -> Self {
        Self {
            attendance: AttendanceTracker::new(store.clone(), clock.clone(), &config),
            payroll: PayrollCoordinator::new(store.clone(), clock.clone(), &config),
            roster: Roster::new(store.clone()),
            books: Bookkeeper::new(store, clock, &config),
            config,
        }
    }

    /// Returns the configuration the engine was built with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
