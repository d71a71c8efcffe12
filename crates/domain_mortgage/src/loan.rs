//! Loan inputs and validated loan terms

use core_kernel::{Month, YearMonth};
use serde::{Deserialize, Serialize};

use crate::error::MortgageError;

/// Longest term accepted, in years
pub const MAX_TERM_YEARS: u32 = 100;

/// Loan parameters as parsed from the simulator form
///
/// Values are whatever the lenient parsers produced: a principal of `0` may
/// mean the field was empty. Use [`LoanInput::terms`] to obtain terms that
/// can be amortized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanInput {
    /// Amount borrowed, in euros
    pub principal: f64,
    /// Nominal annual rate as a percentage, index plus spread (`3.25` = 3.25%)
    pub annual_rate_percent: f64,
    /// Term in whole years
    pub term_years: i64,
    /// Month the loan was disbursed, by display name (`"Noviembre"`)
    pub disbursement_month: String,
    /// Year the loan was disbursed; `0` when unknown
    pub disbursement_year: i64,
}

impl LoanInput {
    /// Validates the amortizable part of the input
    pub fn terms(&self) -> Result<LoanTerms, MortgageError> {
        LoanTerms::try_new(self.principal, self.annual_rate_percent, self.term_years)
    }

    /// Disbursement month, when both the month name and the year are usable
    pub fn disbursement(&self) -> Option<YearMonth> {
        let month = Month::from_name(&self.disbursement_month)?;
        if self.disbursement_year == 0 {
            return None;
        }
        let year = i32::try_from(self.disbursement_year).ok()?;
        Some(YearMonth::new(year, month))
    }
}

/// Loan terms that can be amortized
///
/// Construction guarantees a positive finite principal, a term of
/// `1..=MAX_TERM_YEARS` years and a finite rate. The rate may be zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanTerms {
    principal: f64,
    annual_rate_percent: f64,
    term_years: u32,
}

impl LoanTerms {
    /// Validates raw loan terms
    pub fn try_new(
        principal: f64,
        annual_rate_percent: f64,
        term_years: i64,
    ) -> Result<Self, MortgageError> {
        if !(principal.is_finite() && principal > 0.0) {
            return Err(MortgageError::InvalidPrincipal(principal));
        }
        if !annual_rate_percent.is_finite() {
            return Err(MortgageError::InvalidRate(annual_rate_percent));
        }
        let term_years = u32::try_from(term_years)
            .ok()
            .filter(|years| (1..=MAX_TERM_YEARS).contains(years))
            .ok_or(MortgageError::InvalidTerm {
                years: term_years,
                max: MAX_TERM_YEARS,
            })?;

        Ok(Self {
            principal,
            annual_rate_percent,
            term_years,
        })
    }

    /// Validates raw loan terms, discarding the reason for a rejection
    pub fn new(principal: f64, annual_rate_percent: f64, term_years: i64) -> Option<Self> {
        Self::try_new(principal, annual_rate_percent, term_years).ok()
    }

    pub fn principal(&self) -> f64 {
        self.principal
    }

    pub fn annual_rate_percent(&self) -> f64 {
        self.annual_rate_percent
    }

    pub fn term_years(&self) -> u32 {
        self.term_years
    }

    /// Number of monthly payments
    pub fn total_periods(&self) -> u32 {
        self.term_years * 12
    }

    /// Monthly rate as a fraction (`3%` a year → `0.0025`)
    pub fn periodic_rate(&self) -> f64 {
        self.annual_rate_percent / 100.0 / 12.0
    }
}
