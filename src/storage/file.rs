//! JSON snapshot file store.
//!
//! The whole state lives in one JSON document. Every mutation is applied to
//! a copy, written to a temporary file, and renamed over the original; the
//! in-memory state only changes once the write has succeeded.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::{EngineError, EngineResult};
use crate::models::{Attendance, Site, Transaction, Worker};

use super::{Snapshot, Store};

/// A [`Store`] persisted as a JSON file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    state: RwLock<Snapshot>,
}

impl FileStore {
    /// Opens the store at `path`, seeding it with [`Snapshot::demo`] if the
    /// file does not exist yet.
    pub async fn open<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        Self::open_or_seed(path, Snapshot::demo()).await
    }

    /// Opens the store at `path`, writing `seed` to it if the file does not
    /// exist yet.
    pub async fn open_or_seed<P: AsRef<Path>>(path: P, seed: Snapshot) -> EngineResult<Self> {
        let path = path.as_ref().to_path_buf();

        let state = match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let snapshot: Snapshot =
                    serde_json::from_slice(&bytes).map_err(|e| EngineError::Storage {
                        message: format!("failed to parse {}: {}", path.display(), e),
                    })?;
                info!(
                    path = %path.display(),
                    sites = snapshot.sites.len(),
                    workers = snapshot.workers.len(),
                    attendance = snapshot.attendance.len(),
                    transactions = snapshot.transactions.len(),
                    "Loaded data file"
                );
                snapshot
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "Data file missing, seeding");
                write_snapshot(&path, &seed).await?;
                seed
            }
            Err(e) => {
                return Err(EngineError::Storage {
                    message: format!("failed to read {}: {}", path.display(), e),
                });
            }
        };

        Ok(Self {
            path,
            state: RwLock::new(state),
        })
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn mutate<T>(
        &self,
        apply: impl FnOnce(&mut Snapshot) -> EngineResult<T>,
    ) -> EngineResult<T> {
        let mut state = self.state.write().await;
        let mut next = state.clone();
        let value = apply(&mut next)?;
        write_snapshot(&self.path, &next).await?;
        *state = next;
        Ok(value)
    }
}

async fn write_snapshot(path: &Path, snapshot: &Snapshot) -> EngineResult<()> {
    let bytes = serde_json::to_vec_pretty(snapshot).map_err(|e| EngineError::Storage {
        message: format!("failed to serialize state: {}", e),
    })?;

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    tokio::fs::write(&tmp, &bytes)
        .await
        .map_err(|e| EngineError::Storage {
            message: format!("failed to write {}: {}", tmp.display(), e),
        })?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| EngineError::Storage {
            message: format!("failed to replace {}: {}", path.display(), e),
        })?;

    debug!(path = %path.display(), bytes = bytes.len(), "Data file written");
    Ok(())
}

#[async_trait]
impl Store for FileStore {
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
        self.mutate(|s| s.append_attendance(record)).await
    }

    async fn update_attendance(&self, record: Attendance) -> EngineResult<Attendance> {
        self.mutate(|s| s.update_attendance(record)).await
    }

    async fn append_transaction(&self, transaction: Transaction) -> EngineResult<Transaction> {
        self.mutate(|s| s.append_transaction(transaction)).await
    }

    async fn update_worker(&self, worker: Worker) -> EngineResult<Worker> {
        self.mutate(|s| s.update_worker(worker)).await
    }
}
