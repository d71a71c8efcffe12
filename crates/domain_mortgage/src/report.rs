//! Display-ready simulation reports
//!
//! Headline amounts are rounded to whole euros and formatted es-ES; the rate
//! keeps three decimals. By default only the first year of the schedule is
//! included.

use core_kernel::{format_rate_percent, format_rounded_amount};
use serde::Serialize;

use crate::schedule::AmortizationRow;
use crate::simulation::Simulation;
use crate::summary::{AmortizationSummary, PaymentProgress};

/// Rows included in a report unless the full schedule is requested
pub const DEFAULT_PREVIEW_ROWS: usize = 12;

/// Formatted headline figures
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadlineFigures {
    pub monthly_payment: String,
    pub annual_payment: String,
    pub total_cost: String,
    pub total_interest: String,
    pub nominal_annual_rate: String,
}

impl HeadlineFigures {
    pub fn from_summary(summary: &AmortizationSummary) -> Self {
        Self {
            monthly_payment: format_rounded_amount(summary.monthly_payment),
            annual_payment: format_rounded_amount(summary.annual_payment),
            total_cost: format_rounded_amount(summary.total_cost),
            total_interest: format_rounded_amount(summary.total_interest),
            nominal_annual_rate: format_rate_percent(summary.nominal_annual_rate),
        }
    }
}

/// Formatted principal, interest and combined total
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentTotals {
    pub principal: String,
    pub interest: String,
    pub total: String,
}

impl PaymentTotals {
    fn new(principal: f64, interest: f64) -> Self {
        Self {
            principal: format_rounded_amount(principal),
            interest: format_rounded_amount(interest),
            total: format_rounded_amount(principal + interest),
        }
    }
}

/// A schedule row with its formatted amounts
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRowView {
    #[serde(flatten)]
    pub row: AmortizationRow,
    pub formatted_payment: String,
    pub formatted_principal: String,
    pub formatted_interest: String,
    pub formatted_balance: String,
}

impl From<&AmortizationRow> for ScheduleRowView {
    fn from(row: &AmortizationRow) -> Self {
        Self {
            row: *row,
            formatted_payment: format_rounded_amount(row.payment_amount),
            formatted_principal: format_rounded_amount(row.principal_portion),
            formatted_interest: format_rounded_amount(row.interest_portion),
            formatted_balance: format_rounded_amount(row.remaining_balance),
        }
    }
}

/// Everything the simulator page shows for one simulation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationReport {
    pub summary: AmortizationSummary,
    pub headline: HeadlineFigures,
    pub elapsed_periods: usize,
    pub total_periods: usize,
    /// Present only once something has been paid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid: Option<PaymentTotals>,
    /// Present only once something has been paid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending: Option<PaymentTotals>,
    pub rows: Vec<ScheduleRowView>,
    /// True when `rows` holds fewer rows than the schedule
    pub truncated: bool,
}

impl SimulationReport {
    /// Builds a report with the first-year preview or the full schedule
    pub fn build(simulation: &Simulation, full_schedule: bool) -> Self {
        let summary = simulation.summary();
        let schedule = simulation.schedule();
        let rows = if full_schedule {
            schedule.rows()
        } else {
            schedule.preview(DEFAULT_PREVIEW_ROWS)
        };
        let progress: &PaymentProgress = simulation.progress();
        let (paid, pending) = if progress.has_payments_made() {
            (
                Some(PaymentTotals::new(progress.paid_principal, progress.paid_interest)),
                Some(PaymentTotals::new(progress.pending_principal, progress.pending_interest)),
            )
        } else {
            (None, None)
        };

        Self {
            headline: HeadlineFigures::from_summary(&summary),
            summary,
            elapsed_periods: progress.elapsed_periods,
            total_periods: schedule.len(),
            paid,
            pending,
            rows: rows.iter().map(ScheduleRowView::from).collect(),
            truncated: rows.len() < schedule.len(),
        }
    }
}
