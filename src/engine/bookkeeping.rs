//! General ledger entries and financial projections.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::calculation::{
    PortfolioTotals, SiteSummary, WorkerLedger, portfolio_totals, site_summary,
    sort_recent_first, worker_ledger,
};
use crate::clock::Clock;
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{Transaction, TransactionType, generate_id};
use crate::storage::Store;

/// A manually entered income or expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    /// An existing site, or the overhead sentinel.
    pub site_id: String,
    /// INCOME or EXPENSE.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Non-negative amount.
    pub amount: Decimal,
    /// Narrative.
    #[serde(default)]
    pub description: String,
    /// Optional related worker.
    #[serde(default)]
    pub entity_id: Option<String>,
}

/// Records general ledger entries and answers financial queries.
pub struct Bookkeeper {
    store: Arc<dyn Store>,
    clock: Arc<dyn Clock>,
    reference_shift_hours: Decimal,
    overhead_site_id: String,
}

impl Bookkeeper {
    /// Creates a bookkeeper using the overhead site id and reference shift
    /// from `config`.
    pub fn new(store: Arc<dyn Store>, clock: Arc<dyn Clock>, config: &EngineConfig) -> Self {
        Self {
            store,
            clock,
            reference_shift_hours: config.reference_shift_hours,
            overhead_site_id: config.overhead_site_id.clone(),
        }
    }

    /// Appends an income or expense dated now.
    pub async fn record_transaction(&self, entry: NewTransaction) -> EngineResult<Transaction> {
        if entry.amount < Decimal::ZERO {
            return Err(EngineError::InvalidAmount {
                amount: entry.amount.to_string(),
                message: "transaction amount must not be negative".to_string(),
            });
        }

        if entry.site_id != self.overhead_site_id {
            let sites = self.store.list_sites().await?;
            if !sites.iter().any(|s| s.id == entry.site_id) {
                return Err(EngineError::SiteNotFound {
                    site_id: entry.site_id,
                });
            }
        }

        let transaction = Transaction {
            id: generate_id("txn"),
            site_id: entry.site_id,
            transaction_type: entry.transaction_type,
            amount: entry.amount,
            description: entry.description,
            date: self.clock.now(),
            entity_id: entry.entity_id,
        };
        let transaction = self.store.append_transaction(transaction).await?;

        info!(
            transaction_id = %transaction.id,
            site_id = %transaction.site_id,
            amount = %transaction.amount,
            "Transaction recorded"
        );
        Ok(transaction)
    }

    /// Returns every transaction, most recent first. Ties keep insertion order.
    pub async fn transactions_recent_first(&self) -> EngineResult<Vec<Transaction>> {
        let mut transactions = self.store.list_transactions().await?;
        sort_recent_first(&mut transactions);
        Ok(transactions)
    }

    /// Summarises one site.
    pub async fn site_summary(&self, site_id: &str) -> EngineResult<SiteSummary> {
        let site = self
            .store
            .list_sites()
            .await?
            .into_iter()
            .find(|s| s.id == site_id)
            .ok_or_else(|| EngineError::SiteNotFound {
                site_id: site_id.to_string(),
            })?;

        let transactions = self.store.list_transactions().await?;
        let attendance = self.store.list_attendance().await?;
        let workers = self.store.list_workers().await?;
        Ok(site_summary(&site, &transactions, &attendance, &workers))
    }

    /// Builds one worker's ledger.
    pub async fn worker_ledger(&self, worker_id: &str) -> EngineResult<WorkerLedger> {
        let worker = self
            .store
            .list_workers()
            .await?
            .into_iter()
            .find(|w| w.id == worker_id)
            .ok_or_else(|| EngineError::WorkerNotFound {
                worker_id: worker_id.to_string(),
            })?;

        let transactions = self.store.list_transactions().await?;
        let attendance = self.store.list_attendance().await?;
        Ok(worker_ledger(
            &worker,
            &transactions,
            &attendance,
            self.reference_shift_hours,
        ))
    }

    /// Totals across the whole portfolio.
    pub async fn portfolio(&self) -> EngineResult<PortfolioTotals> {
        let sites = self.store.list_sites().await?;
        let workers = self.store.list_workers().await?;
        let attendance = self.store.list_attendance().await?;
        let transactions = self.store.list_transactions().await?;
        Ok(portfolio_totals(&sites, &workers, &attendance, &transactions))
    }
}
