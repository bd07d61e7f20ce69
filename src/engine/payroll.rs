//! Payroll settlement.
//!
//! A SALARY settlement pays for specific completed shifts: the expense
//! transaction is written first and the consumed records are then marked
//! paid and linked to it. An ADVANCE only writes the transaction.

use std::collections::HashSet;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::calculation::{WageAccrual, calculate_wage_accrual};
use crate::clock::Clock;
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{Attendance, PaymentKind, Transaction, TransactionType, Worker, generate_id};
use crate::storage::Store;

use super::locks::KeyedLocks;

/// A request to pay a worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollRequest {
    /// The worker being paid.
    pub worker_id: String,
    /// Amount to pay; must be positive.
    pub amount: Decimal,
    /// Site to charge; the overhead sentinel is used when absent.
    #[serde(default)]
    pub charge_site_id: Option<String>,
    /// Narrative; a default is generated when blank.
    #[serde(default)]
    pub description: String,
    /// SALARY or ADVANCE.
    pub kind: PaymentKind,
    /// Records a SALARY settles. Empty means the worker's whole unsettled
    /// set at the time of settlement.
    #[serde(default)]
    pub attendance_ids: Vec<String>,
}

/// The outcome of a settlement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollReceipt {
    /// The expense transaction written.
    pub transaction: Transaction,
    /// Records now marked paid.
    pub settled_attendance_ids: Vec<String>,
    /// Records that should have been marked paid but whose update failed.
    pub unsettled_attendance_ids: Vec<String>,
}

impl PayrollReceipt {
    /// Returns true if every record the settlement consumed was marked paid.
    pub fn is_complete(&self) -> bool {
        self.unsettled_attendance_ids.is_empty()
    }
}

/// Computes accruals and records payroll disbursements.
pub struct PayrollCoordinator {
    store: Arc<dyn Store>,
    clock: Arc<dyn Clock>,
    reference_shift_hours: Decimal,
    overhead_site_id: String,
    settle_locks: KeyedLocks,
}

impl PayrollCoordinator {
    /// Creates a coordinator using the reference shift and overhead site id
    /// from `config`.
    pub fn new(store: Arc<dyn Store>, clock: Arc<dyn Clock>, config: &EngineConfig) -> Self {
        Self {
            store,
            clock,
            reference_shift_hours: config.reference_shift_hours,
            overhead_site_id: config.overhead_site_id.clone(),
            settle_locks: KeyedLocks::default(),
        }
    }

    /// Returns the worker's current unsettled hours and suggested wage.
    pub async fn accrual(&self, worker_id: &str) -> EngineResult<WageAccrual> {
        let worker = self.find_worker(worker_id).await?;
        let attendance = self.store.list_attendance().await?;
        Ok(calculate_wage_accrual(
            &worker,
            &attendance,
            self.reference_shift_hours,
            1,
        ))
    }

    /// Pays a worker.
    ///
    /// Every check runs before anything is written. Settlements for the
    /// same worker run one at a time.
    ///
    /// # Errors
    ///
    /// * `WorkerNotFound` - the worker does not exist
    /// * `InvalidAmount` - the amount is zero or negative
    /// * `SiteNotFound` - the charge site does not exist
    /// * `InvalidSettlement` - a record cannot be consumed, or an ADVANCE
    ///   names records
    /// * `Storage` - the transaction could not be written; nothing is paid
    pub async fn settle(&self, request: PayrollRequest) -> EngineResult<PayrollReceipt> {
        let _guard = self.settle_locks.lock(&request.worker_id).await;

        let worker = self.find_worker(&request.worker_id).await?;

        if request.amount <= Decimal::ZERO {
            return Err(EngineError::InvalidAmount {
                amount: request.amount.to_string(),
                message: "payroll amount must be greater than zero".to_string(),
            });
        }

        let site_id = match &request.charge_site_id {
            Some(site_id) => {
                let sites = self.store.list_sites().await?;
                if !sites.iter().any(|s| &s.id == site_id) {
                    return Err(EngineError::SiteNotFound {
                        site_id: site_id.clone(),
                    });
                }
                site_id.clone()
            }
            None => self.overhead_site_id.clone(),
        };

        let consumed = if request.kind.settles_attendance() {
            self.salary_records(&worker, &request.attendance_ids).await?
        } else {
            if let Some(record_id) = request.attendance_ids.first() {
                return Err(EngineError::InvalidSettlement {
                    record_id: record_id.clone(),
                    message: format!("{} cannot settle attendance", request.kind.label()),
                });
            }
            Vec::new()
        };

        let description = match request.description.trim() {
            "" => self.default_description(&worker, request.kind, &consumed),
            given => given.to_string(),
        };

        let transaction = Transaction {
            id: generate_id("txn"),
            site_id,
            transaction_type: TransactionType::Expense,
            amount: request.amount,
            description: format!("{}: {}", request.kind.label(), description),
            date: self.clock.now(),
            entity_id: Some(worker.id.clone()),
        };
        let transaction = self.store.append_transaction(transaction).await?;

        let mut settled_attendance_ids = Vec::with_capacity(consumed.len());
        let mut unsettled_attendance_ids = Vec::new();
        for mut record in consumed {
            record.is_paid = true;
            record.settled_by = Some(transaction.id.clone());
            let record_id = record.id.clone();
            match self.store.update_attendance(record).await {
                Ok(_) => settled_attendance_ids.push(record_id),
                Err(err) => {
                    error!(
                        worker_id = %worker.id,
                        transaction_id = %transaction.id,
                        record_id = %record_id,
                        error = %err,
                        "Transaction written but attendance record not marked paid"
                    );
                    unsettled_attendance_ids.push(record_id);
                }
            }
        }

        info!(
            worker_id = %worker.id,
            transaction_id = %transaction.id,
            kind = request.kind.label(),
            amount = %transaction.amount,
            records = settled_attendance_ids.len(),
            "Payroll recorded"
        );

        Ok(PayrollReceipt {
            transaction,
            settled_attendance_ids,
            unsettled_attendance_ids,
        })
    }

    async fn find_worker(&self, worker_id: &str) -> EngineResult<Worker> {
        self.store
            .list_workers()
            .await?
            .into_iter()
            .find(|w| w.id == worker_id)
            .ok_or_else(|| EngineError::WorkerNotFound {
                worker_id: worker_id.to_string(),
            })
    }

    /// Resolves and checks the records a SALARY consumes.
    async fn salary_records(
        &self,
        worker: &Worker,
        attendance_ids: &[String],
    ) -> EngineResult<Vec<Attendance>> {
        let attendance = self.store.list_attendance().await?;

        if attendance_ids.is_empty() {
            return Ok(attendance
                .into_iter()
                .filter(|a| a.worker_id == worker.id && a.is_unsettled())
                .collect());
        }

        let invalid = |record_id: &str, message: &str| EngineError::InvalidSettlement {
            record_id: record_id.to_string(),
            message: message.to_string(),
        };

        let mut seen = HashSet::new();
        let mut records = Vec::with_capacity(attendance_ids.len());
        for record_id in attendance_ids {
            if !seen.insert(record_id.as_str()) {
                return Err(invalid(record_id, "listed more than once"));
            }
            let record = attendance
                .iter()
                .find(|a| &a.id == record_id)
                .ok_or_else(|| invalid(record_id, "no such attendance record"))?;
            if record.worker_id != worker.id {
                return Err(invalid(record_id, "belongs to another worker"));
            }
            if record.is_open() {
                return Err(invalid(record_id, "shift is still open"));
            }
            if record.is_paid {
                warn!(
                    worker_id = %worker.id,
                    record_id = %record_id,
                    settled_by = record.settled_by.as_deref().unwrap_or("unknown"),
                    "Settlement names an already paid record"
                );
                return Err(invalid(record_id, "already paid"));
            }
            records.push(record.clone());
        }
        Ok(records)
    }

    fn default_description(
        &self,
        worker: &Worker,
        kind: PaymentKind,
        consumed: &[Attendance],
    ) -> String {
        match kind {
            PaymentKind::Salary => {
                calculate_wage_accrual(worker, consumed, self.reference_shift_hours, 1)
                    .suggested_description()
            }
            PaymentKind::Advance => "Advance on Wages".to_string(),
        }
    }
}
