//! The persisted state of every collection.

use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{Attendance, Site, SiteStatus, Transaction, TransactionType, Worker};

/// All four collections, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Construction sites.
    #[serde(default)]
    pub sites: Vec<Site>,
    /// Workers.
    #[serde(default)]
    pub workers: Vec<Worker>,
    /// Attendance records.
    #[serde(default)]
    pub attendance: Vec<Attendance>,
    /// Income and expense transactions.
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl Snapshot {
    /// Returns the starter data set: two sites, two assigned workers and an
    /// opening milestone deposit.
    pub fn demo() -> Self {
        let opened = Utc
            .with_ymd_and_hms(2026, 1, 5, 9, 0, 0)
            .single()
            .unwrap_or_else(Utc::now);

        Self {
            sites: vec![
                Site {
                    id: "s1".to_string(),
                    name: "Emerald Heights".to_string(),
                    location: "North Wing".to_string(),
                    latitude: 34.0522,
                    longitude: -118.2437,
                    client_name: "Vertex Corp".to_string(),
                    budget: Decimal::new(1_200_000, 0),
                    status: SiteStatus::Ongoing,
                },
                Site {
                    id: "s2".to_string(),
                    name: "River Terminal".to_string(),
                    location: "East Quay".to_string(),
                    latitude: 34.0622,
                    longitude: -118.2537,
                    client_name: "Port Authority".to_string(),
                    budget: Decimal::new(450_000, 0),
                    status: SiteStatus::Ongoing,
                },
            ],
            workers: vec![
                Worker {
                    id: "w1".to_string(),
                    name: "Alex Thompson".to_string(),
                    role: "Chief Engineer".to_string(),
                    daily_rate: Decimal::new(450, 0),
                    assigned_site_id: Some("s1".to_string()),
                    phone: "1234567890".to_string(),
                    credential: None,
                },
                Worker {
                    id: "w2".to_string(),
                    name: "Jordan Lee".to_string(),
                    role: "Site Supervisor".to_string(),
                    daily_rate: Decimal::new(320, 0),
                    assigned_site_id: Some("s2".to_string()),
                    phone: "0987654321".to_string(),
                    credential: None,
                },
            ],
            attendance: Vec::new(),
            transactions: vec![Transaction {
                id: "t1".to_string(),
                site_id: "s1".to_string(),
                transaction_type: TransactionType::Income,
                amount: Decimal::new(250_000, 0),
                description: "Q3 Milestone Deposit".to_string(),
                date: opened,
                entity_id: None,
            }],
        }
    }

    pub(crate) fn append_attendance(&mut self, record: Attendance) -> EngineResult<Attendance> {
        if self.attendance.iter().any(|a| a.id == record.id) {
            return Err(EngineError::Storage {
                message: format!("duplicate attendance id '{}'", record.id),
            });
        }
        self.attendance.push(record.clone());
        Ok(record)
    }

    pub(crate) fn update_attendance(&mut self, record: Attendance) -> EngineResult<Attendance> {
        let slot = self
            .attendance
            .iter_mut()
            .find(|a| a.id == record.id)
            .ok_or_else(|| EngineError::AttendanceNotFound {
                record_id: record.id.clone(),
            })?;
        *slot = record.clone();
        Ok(record)
    }

    pub(crate) fn append_transaction(
        &mut self,
        transaction: Transaction,
    ) -> EngineResult<Transaction> {
        if self.transactions.iter().any(|t| t.id == transaction.id) {
            return Err(EngineError::Storage {
                message: format!("duplicate transaction id '{}'", transaction.id),
            });
        }
        self.transactions.push(transaction.clone());
        Ok(transaction)
    }

    pub(crate) fn update_worker(&mut self, worker: Worker) -> EngineResult<Worker> {
        let slot = self
            .workers
            .iter_mut()
            .find(|w| w.id == worker.id)
            .ok_or_else(|| EngineError::WorkerNotFound {
                worker_id: worker.id.clone(),
            })?;
        *slot = worker.clone();
        Ok(worker)
    }
}
