//! Constant-payment amortization schedules
//!
//! The fixed monthly payment follows the annuity formula
//!
//! ```text
//! payment = P · i / (1 − (1 + i)^(−n))
//! ```
//!
//! with `P` the principal, `i` the monthly rate and `n` the number of months.
//! A zero rate degenerates to straight-line repayment, `P / n`.
//!
//! Each period charges interest on the balance entering it, so periods must be
//! computed in order. Arithmetic is `f64`; once the outstanding balance drops
//! under [`BALANCE_EPSILON`] it is floored to zero, which absorbs the residue
//! floating-point drift leaves after the last payment.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::loan::LoanTerms;
use crate::summary::{AmortizationSummary, PaymentProgress};

/// Balances below this many euros are treated as fully repaid
pub const BALANCE_EPSILON: f64 = 0.01;

/// One monthly period of a schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmortizationRow {
    /// 1-based period number
    pub period_index: u32,
    /// Fixed payment, identical on every row
    pub payment_amount: f64,
    /// Capital repaid this period
    pub principal_portion: f64,
    /// Interest charged on the balance entering the period
    pub interest_portion: f64,
    /// Balance after this period's payment
    pub remaining_balance: f64,
}

/// Full repayment plan for a set of loan terms
#[derive(Debug, Clone, PartialEq)]
pub struct AmortizationSchedule {
    terms: LoanTerms,
    monthly_payment: f64,
    total_interest: f64,
    rows: Vec<AmortizationRow>,
}

/// Computes the fixed periodic payment
///
/// `periodic_rate` is the monthly rate as a fraction. `total_periods` must be
/// positive. Rates too small to move the annuity factor repay in equal
/// instalments, as a zero rate does.
pub fn fixed_payment(principal: f64, periodic_rate: f64, total_periods: u32) -> f64 {
    let n = f64::from(total_periods);
    if periodic_rate == 0.0 {
        return principal / n;
    }

    // 1 - (1 + r)^-n, without losing r when it is below f64 precision
    let denominator = -(-n * periodic_rate.ln_1p()).exp_m1();
    let payment = principal * periodic_rate / denominator;
    if denominator == 0.0 || !payment.is_finite() {
        principal / n
    } else {
        payment
    }
}

/// Computes a schedule from raw terms
///
/// Returns `None` when the principal is not positive or the term is not a
/// positive number of years.
pub fn compute_schedule(
    principal: f64,
    annual_rate_percent: f64,
    term_years: i64,
) -> Option<AmortizationSchedule> {
    LoanTerms::new(principal, annual_rate_percent, term_years)
        .map(|terms| AmortizationSchedule::compute(&terms))
}

impl AmortizationSchedule {
    /// Computes every period of the schedule
    pub fn compute(terms: &LoanTerms) -> Self {
        let total_periods = terms.total_periods();
        let periodic_rate = terms.periodic_rate();
        let payment = fixed_payment(terms.principal(), periodic_rate, total_periods);

        let mut rows = Vec::with_capacity(total_periods as usize);
        let mut outstanding = terms.principal();
        let mut total_interest = 0.0;

        for period_index in 1..=total_periods {
            let interest = outstanding * periodic_rate;
            let principal_portion = payment - interest;
            outstanding -= principal_portion;
            if outstanding < BALANCE_EPSILON {
                outstanding = 0.0;
            }
            total_interest += interest;

            rows.push(AmortizationRow {
                period_index,
                payment_amount: payment,
                principal_portion,
                interest_portion: interest,
                remaining_balance: outstanding,
            });
        }

        trace!(
            principal = terms.principal(),
            rate = terms.annual_rate_percent(),
            periods = total_periods,
            payment,
            total_interest,
            "Computed amortization schedule"
        );

        Self {
            terms: *terms,
            monthly_payment: payment,
            total_interest,
            rows,
        }
    }

    pub fn terms(&self) -> &LoanTerms {
        &self.terms
    }

    pub fn rows(&self) -> &[AmortizationRow] {
        &self.rows
    }

    /// Number of periods in the schedule
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Always false: valid terms have at least twelve periods
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn monthly_payment(&self) -> f64 {
        self.monthly_payment
    }

    pub fn total_interest(&self) -> f64 {
        self.total_interest
    }

    /// The first `count` rows, or all of them when the schedule is shorter
    pub fn preview(&self, count: usize) -> &[AmortizationRow] {
        &self.rows[..count.min(self.rows.len())]
    }

    /// Paid and pending totals once `elapsed_periods` payments have been made
    ///
    /// Counts above the schedule length are treated as the full schedule.
    pub fn progress(&self, elapsed_periods: usize) -> PaymentProgress {
        let elapsed = elapsed_periods.min(self.rows.len());
        let (paid_principal, paid_interest) = self.rows[..elapsed]
            .iter()
            .fold((0.0, 0.0), |(capital, interest), row| {
                (capital + row.principal_portion, interest + row.interest_portion)
            });

        PaymentProgress {
            elapsed_periods: elapsed,
            paid_principal,
            paid_interest,
            pending_principal: (self.terms.principal() - paid_principal).max(0.0),
            pending_interest: (self.total_interest - paid_interest).max(0.0),
        }
    }

    /// Summary with nothing paid yet
    pub fn summary(&self) -> AmortizationSummary {
        self.summary_after(0)
    }

    /// Summary once `elapsed_periods` payments have been made
    pub fn summary_after(&self, elapsed_periods: usize) -> AmortizationSummary {
        AmortizationSummary::new(
            &self.terms,
            self.monthly_payment,
            self.total_interest,
            self.progress(elapsed_periods),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_payment_annuity() {
        let payment = fixed_payment(180_000.0, 0.01 / 12.0, 360);
        assert!((payment - 578.9511).abs() < 1e-3);
    }

    #[test]
    fn test_fixed_payment_zero_rate() {
        assert_eq!(fixed_payment(100_000.0, 0.0, 120), 100_000.0 / 120.0);
    }

    #[test]
    fn test_fixed_payment_negligible_rate() {
        for rate in [1e-17, 8.3e-17, 1e-300, f64::MIN_POSITIVE] {
            let payment = fixed_payment(180_000.0, rate, 360);
            assert!(payment.is_finite(), "rate {rate}");
            assert!((payment - 500.0).abs() < 1e-6, "rate {rate}: {payment}");
        }
    }

    #[test]
    fn test_negligible_rate_schedule_is_finite() {
        let schedule = compute_schedule(180_000.0, 1e-13, 30).unwrap();

        assert!((schedule.monthly_payment() - 500.0).abs() < 1e-6);
        assert!(schedule
            .rows()
            .iter()
            .all(|row| row.payment_amount.is_finite() && row.remaining_balance.is_finite()));
        assert_eq!(schedule.rows().last().map(|row| row.remaining_balance), Some(0.0));
    }

    #[test]
    fn test_schedule_has_one_row_per_month() {
        let schedule = compute_schedule(50_000.0, 2.5, 15).unwrap();
        assert_eq!(schedule.len(), 180);
        assert_eq!(schedule.rows()[0].period_index, 1);
        assert_eq!(schedule.rows()[179].period_index, 180);
    }

    #[test]
    fn test_first_period_interest_uses_full_principal() {
        let schedule = compute_schedule(180_000.0, 1.0, 30).unwrap();
        let first = schedule.rows()[0];
        assert!((first.interest_portion - 150.0).abs() < 1e-9);
        assert!((first.remaining_balance - (180_000.0 - first.principal_portion)).abs() < 1e-9);
    }

    #[test]
    fn test_final_balance_is_floored() {
        let schedule = compute_schedule(180_000.0, 1.0, 30).unwrap();
        let last = schedule.rows().last().unwrap();
        assert_eq!(last.remaining_balance, 0.0);
    }

    #[test]
    fn test_invalid_terms_give_no_schedule() {
        assert!(compute_schedule(0.0, 1.0, 30).is_none());
        assert!(compute_schedule(180_000.0, 1.0, 0).is_none());
    }

    #[test]
    fn test_preview_is_clipped() {
        let schedule = compute_schedule(10_000.0, 3.0, 1).unwrap();
        assert_eq!(schedule.preview(12).len(), 12);
        assert_eq!(schedule.preview(500).len(), 12);
        assert_eq!(schedule.preview(3).len(), 3);
    }

    #[test]
    fn test_progress_beyond_schedule_counts_everything() {
        let schedule = compute_schedule(10_000.0, 3.0, 1).unwrap();
        let progress = schedule.progress(1_000);
        assert_eq!(progress.elapsed_periods, 12);
        assert!(progress.pending_principal < 1e-6);
        assert!(progress.pending_interest < 1e-6);
    }
}
