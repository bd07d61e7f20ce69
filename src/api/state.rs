//! Application state for the site payroll API.

use std::sync::Arc;

use crate::engine::SiteEngine;

/// Shared application state.
///
/// Every handler works against the same [`SiteEngine`].
#[derive(Clone)]
pub struct AppState {
    engine: Arc<SiteEngine>,
}

impl AppState {
    /// Creates a new application state around `engine`.
    pub fn new(engine: SiteEngine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }

    /// Returns the engine.
    pub fn engine(&self) -> &SiteEngine {
        &self.engine
    }
}
