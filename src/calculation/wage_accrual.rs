//! Wage accrual calculation.
//!
//! This module converts a worker's completed, unsettled attendance into a
//! suggested payroll amount. The daily rate is normalised to a reference
//! shift (9 hours by default) and scaled by the hours actually worked.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::models::{Attendance, AuditStep, Worker, hours_from_millis};

/// Returns the default length of the reference shift in hours (9).
pub fn default_reference_shift_hours() -> Decimal {
    Decimal::new(9, 0)
}

/// The result of a wage accrual calculation for one worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WageAccrual {
    /// The worker the accrual is for.
    pub worker_id: String,
    /// Ids of the completed, unpaid records included, in insertion order.
    pub unsettled_record_ids: Vec<String>,
    /// Sum of worked hours across the unsettled records.
    pub unsettled_hours: Decimal,
    /// The worker's daily rate at calculation time.
    pub daily_rate: Decimal,
    /// The shift length the daily rate is normalised to.
    pub reference_shift_hours: Decimal,
    /// Suggested payment, rounded to cents.
    pub suggested_wage: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

impl WageAccrual {
    /// Returns true if there is nothing to settle.
    pub fn is_empty(&self) -> bool {
        self.unsettled_record_ids.is_empty()
    }

    /// Returns the default narrative for a salary settlement of this accrual,
    /// e.g. `Wage Settlement (4.5 hrs)`.
    pub fn suggested_description(&self) -> String {
        let hours = self
            .unsettled_hours
            .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
        format!("Wage Settlement ({:.1} hrs)", hours)
    }
}

/// Calculates the suggested wage for a worker's unsettled attendance.
///
/// A record is unsettled when it belongs to the worker, has been punched
/// out, and has not been paid. The suggestion is
/// `hours x daily_rate / reference_shift_hours`, rounded half away from zero
/// to two decimal places. A non-positive `reference_shift_hours` yields a
/// zero suggestion. The calculation never mutates its inputs.
///
/// # Arguments
///
/// * `worker` - The worker to calculate for
/// * `attendance` - The full attendance collection
/// * `reference_shift_hours` - Hours the daily rate pays for
/// * `step_number` - The step number for audit trail sequencing
///
/// # Examples
///
/// ```
/// use site_payroll_engine::calculation::{calculate_wage_accrual, default_reference_shift_hours};
/// use site_payroll_engine::models::Worker;
/// use rust_decimal::Decimal;
///
/// let worker = Worker {
///     id: "w1".to_string(),
///     name: "John Doe".to_string(),
///     role: "Foreman".to_string(),
///     daily_rate: Decimal::new(150, 0),
///     assigned_site_id: Some("s1".to_string()),
///     phone: "555-0101".to_string(),
///     credential: None,
/// };
///
/// let accrual = calculate_wage_accrual(&worker, &[], default_reference_shift_hours(), 1);
/// assert_eq!(accrual.suggested_wage, Decimal::ZERO);
/// assert!(accrual.is_empty());
/// ```
pub fn calculate_wage_accrual(
    worker: &Worker,
    attendance: &[Attendance],
    reference_shift_hours: Decimal,
    step_number: u32,
) -> WageAccrual {
    let unsettled: Vec<&Attendance> = attendance
        .iter()
        .filter(|a| a.worker_id == worker.id && a.is_unsettled())
        .collect();

    // Sum whole milliseconds and divide once; per-record hours do not add up
    // exactly for shifts like 20 minutes.
    let unsettled_millis: i64 = unsettled.iter().filter_map(|a| a.worked_millis()).sum();
    let unsettled_hours = hours_from_millis(unsettled_millis);

    let mut suggested_wage = if reference_shift_hours > Decimal::ZERO {
        (unsettled_hours * worker.daily_rate / reference_shift_hours)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    } else {
        Decimal::ZERO
    };
    suggested_wage.rescale(2);

    let unsettled_record_ids: Vec<String> = unsettled.iter().map(|a| a.id.clone()).collect();

    let audit_step = AuditStep {
        step_number,
        rule_id: "wage_accrual".to_string(),
        rule_name: "Wage Accrual".to_string(),
        input: serde_json::json!({
            "worker_id": worker.id,
            "daily_rate": worker.daily_rate.normalize().to_string(),
            "reference_shift_hours": reference_shift_hours.normalize().to_string(),
            "unsettled_records": unsettled_record_ids.len()
        }),
        output: serde_json::json!({
            "unsettled_hours": unsettled_hours.normalize().to_string(),
            "suggested_wage": suggested_wage.to_string()
        }),
        reasoning: format!(
            "{} hrs / {} x ${} = ${}",
            unsettled_hours
                .round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero)
                .normalize(),
            reference_shift_hours.normalize(),
            worker.daily_rate.normalize(),
            suggested_wage
        ),
    };

    WageAccrual {
        worker_id: worker.id.clone(),
        unsettled_record_ids,
        unsettled_hours,
        daily_rate: worker.daily_rate,
        reference_shift_hours,
        suggested_wage,
        audit_step,
    }
}
