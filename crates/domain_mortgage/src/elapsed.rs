//! Elapsed payment periods
//!
//! Counts how many monthly payments have fallen due between the disbursement
//! month and a reference month. The count is clipped to `0..=schedule length`
//! and is meant as an exclusive bound: the first `elapsed` rows are paid.

use core_kernel::{Month, YearMonth};

use crate::schedule::AmortizationRow;

/// Elapsed periods of `rows` at `reference`
///
/// An unrecognized month name or a year of `0` means there is not enough
/// information, and yields `0`.
pub fn elapsed_periods(
    rows: &[AmortizationRow],
    disbursement_month: &str,
    disbursement_year: i64,
    reference: YearMonth,
) -> usize {
    let Some(month) = Month::from_name(disbursement_month) else {
        return 0;
    };
    if disbursement_year == 0 {
        return 0;
    }

    let years = i64::from(reference.year).saturating_sub(disbursement_year);
    let months = i64::from(reference.month.ordinal()) - i64::from(month.ordinal());
    let elapsed = years.saturating_mul(12).saturating_add(months);
    clip(elapsed, rows.len())
}

/// Elapsed periods of a schedule with `total_periods` rows
pub fn elapsed_periods_since(
    total_periods: usize,
    disbursement: YearMonth,
    reference: YearMonth,
) -> usize {
    clip(disbursement.months_until(reference), total_periods)
}

fn clip(elapsed: i64, total_periods: usize) -> usize {
    if elapsed <= 0 {
        return 0;
    }
    usize::try_from(elapsed).map_or(total_periods, |e| e.min(total_periods))
}
