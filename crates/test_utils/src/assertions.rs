//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for schedules and delivered
//! notifications that give more meaningful error messages than standard
//! assertions.

use domain_lead::EmailMessage;
use domain_mortgage::{AmortizationSchedule, PaymentProgress, BALANCE_EPSILON};

/// Asserts that two amounts are equal within a tolerance
///
/// # Panics
///
/// Panics if the values differ by more than `tolerance`
pub fn assert_f64_approx_eq(actual: f64, expected: f64, tolerance: f64) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "Amounts differ by more than tolerance: actual={}, expected={}, diff={}, tolerance={}",
        actual,
        expected,
        diff,
        tolerance
    );
}

/// Asserts the structural invariants of a schedule
///
/// - one row per month of the term, numbered from 1
/// - every payment equals principal plus interest
/// - balances never increase and the last one is at most `BALANCE_EPSILON`
/// - each balance is the previous one less the period's principal, except
///   for a row floored to zero
/// - principal portions add up to the principal
///
/// # Panics
///
/// Panics on the first invariant that does not hold
pub fn assert_schedule_consistent(schedule: &AmortizationSchedule) {
    let terms = schedule.terms();
    let rows = schedule.rows();

    assert_eq!(
        rows.len(),
        terms.total_periods() as usize,
        "Schedule has {} rows for a {}-year term",
        rows.len(),
        terms.term_years()
    );

    let mut previous_balance = terms.principal();
    for (position, row) in rows.iter().enumerate() {
        assert_eq!(
            row.period_index as usize,
            position + 1,
            "Row {} is numbered {}",
            position + 1,
            row.period_index
        );

        let split = row.principal_portion + row.interest_portion;
        assert!(
            (split - row.payment_amount).abs() <= 1e-9 * row.payment_amount.max(1.0),
            "Period {}: principal {} + interest {} != payment {}",
            row.period_index,
            row.principal_portion,
            row.interest_portion,
            row.payment_amount
        );

        assert!(
            row.remaining_balance <= previous_balance + 1e-9,
            "Period {}: balance rose from {} to {}",
            row.period_index,
            previous_balance,
            row.remaining_balance
        );
        if row.remaining_balance != 0.0 {
            let expected = previous_balance - row.principal_portion;
            assert!(
                (row.remaining_balance - expected).abs() <= 1e-6,
                "Period {}: balance {} does not follow {} - {}",
                row.period_index,
                row.remaining_balance,
                previous_balance,
                row.principal_portion
            );
        }
        previous_balance = row.remaining_balance;
    }

    if let Some(last) = rows.last() {
        assert!(
            last.remaining_balance <= BALANCE_EPSILON,
            "Final balance {} is not repaid",
            last.remaining_balance
        );
    }

    let repaid: f64 = rows.iter().map(|row| row.principal_portion).sum();
    assert_f64_approx_eq(repaid, terms.principal(), 0.05);
}

/// Asserts that paid and pending figures add up to the schedule totals
///
/// # Panics
///
/// Panics if either principal or interest does not reconcile
pub fn assert_progress_reconciles(schedule: &AmortizationSchedule, progress: &PaymentProgress) {
    assert_f64_approx_eq(
        progress.paid_principal + progress.pending_principal,
        schedule.terms().principal(),
        0.05,
    );
    assert_f64_approx_eq(
        progress.paid_interest + progress.pending_interest,
        schedule.total_interest(),
        0.05,
    );
}

/// Asserts that a notification body shows a labelled value
///
/// # Panics
///
/// Panics if the `<strong>label:</strong> value` pair is missing
pub fn assert_email_shows(message: &EmailMessage, label: &str, value: &str) {
    let expected = format!("<strong>{label}:</strong> {value}");
    assert!(
        message.html_body.contains(&expected),
        "Email body lacks '{}':\n{}",
        expected,
        message.html_body
    );
}
