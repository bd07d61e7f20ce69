//! HTTP API module for the site payroll engine.
//!
//! This module exposes attendance, payroll, roster and ledger operations
//! as JSON endpoints.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{PunchInRequest, ReassignRequest, WorkerFilter};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
