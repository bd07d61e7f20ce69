//! Worker site assignment.

use std::sync::Arc;

use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::models::Worker;
use crate::storage::Store;

/// Moves workers between sites and the unassigned pool.
pub struct Roster {
    store: Arc<dyn Store>,
}

impl Roster {
    /// Creates a roster over `store`.
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Assigns `worker_id` to `site_id`, or to the unassigned pool when
    /// `site_id` is `None`.
    ///
    /// An open shift keeps the site it was started at.
    pub async fn reassign(&self, worker_id: &str, site_id: Option<&str>) -> EngineResult<Worker> {
        let mut worker = self
            .store
            .list_workers()
            .await?
            .into_iter()
            .find(|w| w.id == worker_id)
            .ok_or_else(|| EngineError::WorkerNotFound {
                worker_id: worker_id.to_string(),
            })?;

        if let Some(site_id) = site_id {
            let sites = self.store.list_sites().await?;
            if !sites.iter().any(|s| s.id == site_id) {
                return Err(EngineError::SiteNotFound {
                    site_id: site_id.to_string(),
                });
            }
        }

        let previous = worker.assigned_site_id.take();
        worker.assigned_site_id = site_id.map(str::to_string);
        let worker = self.store.update_worker(worker).await?;

        info!(
            worker_id = %worker.id,
            from = previous.as_deref().unwrap_or("unassigned"),
            to = worker.assigned_site_id.as_deref().unwrap_or("unassigned"),
            "Worker reassigned"
        );
        Ok(worker)
    }
}
