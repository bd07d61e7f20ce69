//! Read-only financial projections.
//!
//! Site summaries, per-worker ledgers and portfolio totals are derived on
//! demand from the stored collections; nothing here is persisted.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::models::{Attendance, Site, Transaction, TransactionType, Worker};

use super::wage_accrual::{WageAccrual, calculate_wage_accrual};

/// Financial and staffing summary for one site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteSummary {
    /// The summarised site.
    pub site_id: String,
    /// Sum of INCOME transactions against the site.
    pub income: Decimal,
    /// Sum of EXPENSE transactions against the site.
    pub expenses: Decimal,
    /// Income minus expenses.
    pub balance: Decimal,
    /// The site's budget.
    pub budget: Decimal,
    /// Expenses as a whole-number percentage of budget, capped at 100.
    pub burn_percent: Decimal,
    /// Workers currently assigned to the site.
    pub assigned_workers: usize,
    /// Workers with an open shift at the site.
    pub on_site_now: usize,
}

/// A worker's payment and attendance history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerLedger {
    /// The worker.
    pub worker_id: String,
    /// The worker's name.
    pub worker_name: String,
    /// Sum of EXPENSE transactions paid to the worker.
    pub total_paid: Decimal,
    /// Transactions naming the worker, most recent first.
    pub transactions: Vec<Transaction>,
    /// Number of attendance records, open or closed.
    pub shift_count: usize,
    /// The worker's attendance records, most recent first.
    pub attendance: Vec<Attendance>,
    /// Hours and suggested wage not yet settled.
    pub accrual: WageAccrual,
}

/// Totals across every site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioTotals {
    /// Sum of all INCOME transactions.
    pub total_income: Decimal,
    /// Sum of all EXPENSE transactions.
    pub total_expenses: Decimal,
    /// Income minus expenses.
    pub net: Decimal,
    /// Open attendance records.
    pub active_workers: usize,
    /// Number of sites.
    pub site_count: usize,
    /// Number of workers.
    pub worker_count: usize,
}

fn sum_by_type<'a>(
    transactions: impl Iterator<Item = &'a Transaction>,
    transaction_type: TransactionType,
) -> Decimal {
    transactions
        .filter(|t| t.transaction_type == transaction_type)
        .map(|t| t.amount)
        .sum()
}

/// Summarises a site's income, spending, budget burn and staffing.
///
/// Burn is `round(expenses / budget x 100)` capped at 100; a zero or
/// negative budget reports 0.
pub fn site_summary(
    site: &Site,
    transactions: &[Transaction],
    attendance: &[Attendance],
    workers: &[Worker],
) -> SiteSummary {
    let site_transactions = || transactions.iter().filter(|t| t.site_id == site.id);
    let income = sum_by_type(site_transactions(), TransactionType::Income);
    let expenses = sum_by_type(site_transactions(), TransactionType::Expense);

    let burn_percent = if site.budget > Decimal::ZERO {
        (expenses * Decimal::ONE_HUNDRED / site.budget)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .min(Decimal::ONE_HUNDRED)
    } else {
        Decimal::ZERO
    };

    SiteSummary {
        site_id: site.id.clone(),
        income,
        expenses,
        balance: income - expenses,
        budget: site.budget,
        burn_percent,
        assigned_workers: workers
            .iter()
            .filter(|w| w.assigned_site_id.as_deref() == Some(site.id.as_str()))
            .count(),
        on_site_now: attendance
            .iter()
            .filter(|a| a.site_id == site.id && a.is_open())
            .count(),
    }
}

/// Builds a worker's ledger: what they have been paid and what is owed.
pub fn worker_ledger(
    worker: &Worker,
    transactions: &[Transaction],
    attendance: &[Attendance],
    reference_shift_hours: Decimal,
) -> WorkerLedger {
    let mut own: Vec<Transaction> = transactions
        .iter()
        .filter(|t| t.entity_id.as_deref() == Some(worker.id.as_str()))
        .cloned()
        .collect();
    sort_recent_first(&mut own);

    let total_paid: Decimal = own
        .iter()
        .filter(|t| t.pays_worker(&worker.id))
        .map(|t| t.amount)
        .sum();

    let logs: Vec<Attendance> = attendance
        .iter()
        .rev()
        .filter(|a| a.worker_id == worker.id)
        .cloned()
        .collect();

    WorkerLedger {
        worker_id: worker.id.clone(),
        worker_name: worker.name.clone(),
        total_paid,
        transactions: own,
        shift_count: logs.len(),
        attendance: logs,
        accrual: calculate_wage_accrual(worker, attendance, reference_shift_hours, 1),
    }
}

/// Orders transactions by date, most recent first. Ties keep insertion order.
pub fn sort_recent_first(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| b.date.cmp(&a.date));
}

/// Totals income, spending and activity across all sites.
pub fn portfolio_totals(
    sites: &[Site],
    workers: &[Worker],
    attendance: &[Attendance],
    transactions: &[Transaction],
) -> PortfolioTotals {
    let total_income = sum_by_type(transactions.iter(), TransactionType::Income);
    let total_expenses = sum_by_type(transactions.iter(), TransactionType::Expense);

    PortfolioTotals {
        total_income,
        total_expenses,
        net: total_income - total_expenses,
        active_workers: attendance.iter().filter(|a| a.is_open()).count(),
        site_count: sites.len(),
        worker_count: workers.len(),
    }
}
