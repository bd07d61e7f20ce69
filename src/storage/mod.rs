//! Persistence collaborator for sites, workers, attendance and transactions.
//!
//! The engine never touches ambient state: every component receives a
//! [`Store`] and goes through its collection-level operations. Two
//! implementations ship with the crate: [`InMemoryStore`] for tests and
//! embedding, and [`FileStore`], which persists a JSON snapshot.

mod file;
mod memory;
mod snapshot;

use async_trait::async_trait;

use crate::error::EngineResult;
use crate::models::{Attendance, Site, Transaction, Worker};

pub use file::FileStore;
pub use memory::InMemoryStore;
pub use snapshot::Snapshot;

/// Collection-level access to persisted state.
///
/// List operations return the full current collection in insertion order.
/// Updates replace the record with the same id and fail with the matching
/// not-found error if there is none.
#[async_trait]
pub trait Store: Send + Sync {
    /// Returns every site.
    async fn list_sites(&self) -> EngineResult<Vec<Site>>;

    /// Returns every worker.
    async fn list_workers(&self) -> EngineResult<Vec<Worker>>;

    /// Returns every attendance record.
    async fn list_attendance(&self) -> EngineResult<Vec<Attendance>>;

    /// Returns every transaction.
    async fn list_transactions(&self) -> EngineResult<Vec<Transaction>>;

    /// Appends a new attendance record.
    async fn append_attendance(&self, record: Attendance) -> EngineResult<Attendance>;

    /// Replaces the attendance record with the same id.
    async fn update_attendance(&self, record: Attendance) -> EngineResult<Attendance>;

    /// Appends a new transaction.
    async fn append_transaction(&self, transaction: Transaction) -> EngineResult<Transaction>;

    /// Replaces the worker with the same id.
    async fn update_worker(&self, worker: Worker) -> EngineResult<Worker>;
}
