//! In-memory store.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::EngineResult;
use crate::models::{Attendance, Site, Transaction, Worker};

use super::{Snapshot, Store};

/// A [`Store`] that keeps every collection in memory.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<Snapshot>,
}

impl InMemoryStore {
    /// Creates a store holding `snapshot`.
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            state: RwLock::new(snapshot),
        }
    }

    /// Returns a copy of the current state.
    pub async fn snapshot(&self) -> Snapshot {
        self.state.read().await.clone()
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn list_sites(&self) -> EngineResult<Vec<Site>> {
        Ok(self.state.read().await.sites.clone())
    }

    async fn list_workers(&self) -> EngineResult<Vec<Worker>> {
        Ok(self.state.read().await.workers.clone())
    }

    async fn list_attendance(&self) -> EngineResult<Vec<Attendance>> {
        Ok(self.state.read().await.attendance.clone())
    }

    async fn list_transactions(&self) -> EngineResult<Vec<Transaction>> {
        Ok(self.state.read().await.transactions.clone())
    }

    async fn append_attendance(&self, record: Attendance) -> EngineResult<Attendance> {
        self.state.write().await.append_attendance(record)
    }

    async fn update_attendance(&self, record: Attendance) -> EngineResult<Attendance> {
        self.state.write().await.update_attendance(record)
    }

    async fn append_transaction(&self, transaction: Transaction) -> EngineResult<Transaction> {
        self.state.write().await.append_transaction(transaction)
    }

    async fn update_worker(&self, worker: Worker) -> EngineResult<Worker> {
        self.state.write().await.update_worker(worker)
    }
}
