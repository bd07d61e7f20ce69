//! Transaction model and payment classifications.
//!
//! Transactions are created once and never mutated. A payroll
//! disbursement is an EXPENSE transaction whose `entity_id` is the paid
//! worker.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Direction of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    /// Money received (client payments, deposits).
    Income,
    /// Money spent (payroll, materials, overhead).
    Expense,
}

/// Classification of a payroll disbursement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentKind {
    /// Pays for specific completed shifts and marks them settled.
    Salary,
    /// Standalone disbursement against future unsettled hours.
    Advance,
}

impl PaymentKind {
    /// Returns the label used as the transaction description prefix.
    pub fn label(&self) -> &'static str {
        match self {
            PaymentKind::Salary => "SALARY",
            PaymentKind::Advance => "ADVANCE",
        }
    }

    /// Returns true if this kind consumes attendance records.
    pub fn settles_attendance(&self) -> bool {
        matches!(self, PaymentKind::Salary)
    }
}

/// Represents a single income or expense entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier for the transaction.
    pub id: String,
    /// The site charged or credited, or the overhead sentinel.
    pub site_id: String,
    /// Income or expense.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Non-negative amount.
    pub amount: Decimal,
    /// Human-readable narrative.
    pub description: String,
    /// When the transaction was recorded.
    pub date: DateTime<Utc>,
    /// The worker paid, for payroll disbursements.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
}

impl Transaction {
    /// Returns true if this transaction pays the given worker.
    pub fn pays_worker(&self, worker_id: &str) -> bool {
        self.transaction_type == TransactionType::Expense
            && self.entity_id.as_deref() == Some(worker_id)
    }
}
