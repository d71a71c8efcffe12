//! Aggregate figures derived from a schedule

use serde::{Deserialize, Serialize};

use crate::loan::LoanTerms;

/// Paid and pending totals after a number of elapsed periods
///
/// `paid_principal + pending_principal` equals the principal and
/// `paid_interest + pending_interest` equals the total interest, except where
/// a pending figure was floored at zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentProgress {
    pub elapsed_periods: usize,
    pub paid_principal: f64,
    pub paid_interest: f64,
    pub pending_principal: f64,
    pub pending_interest: f64,
}

impl PaymentProgress {
    /// True once any principal or interest has been paid
    pub fn has_payments_made(&self) -> bool {
        self.paid_principal > 0.0 || self.paid_interest > 0.0
    }

    pub fn paid_total(&self) -> f64 {
        self.paid_principal + self.paid_interest
    }

    pub fn pending_total(&self) -> f64 {
        self.pending_principal + self.pending_interest
    }
}

/// Headline figures of a mortgage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmortizationSummary {
    pub monthly_payment: f64,
    /// Twelve monthly payments
    pub annual_payment: f64,
    /// Principal plus total interest
    pub total_cost: f64,
    pub total_interest: f64,
    /// Input rate, echoed for display
    pub nominal_annual_rate: f64,
    pub paid_principal: f64,
    pub paid_interest: f64,
    pub pending_principal: f64,
    pub pending_interest: f64,
}

impl AmortizationSummary {
    pub(crate) fn new(
        terms: &LoanTerms,
        monthly_payment: f64,
        total_interest: f64,
        progress: PaymentProgress,
    ) -> Self {
        Self {
            monthly_payment,
            annual_payment: monthly_payment * 12.0,
            total_cost: terms.principal() + total_interest,
            total_interest,
            nominal_annual_rate: terms.annual_rate_percent(),
            paid_principal: progress.paid_principal,
            paid_interest: progress.paid_interest,
            pending_principal: progress.pending_principal,
            pending_interest: progress.pending_interest,
        }
    }

    /// True once any principal or interest has been paid
    pub fn has_payments_made(&self) -> bool {
        self.paid_principal > 0.0 || self.paid_interest > 0.0
    }
}
