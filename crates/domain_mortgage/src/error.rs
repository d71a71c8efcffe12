//! Mortgage domain errors
//!
//! These explain why a set of loan terms cannot be amortized. They never
//! escape the simulation API as failures: callers see an absent result.

use thiserror::Error;

/// Reasons loan terms are rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MortgageError {
    /// Principal is zero, negative or not a finite number
    #[error("Principal must be a positive amount, got {0}")]
    InvalidPrincipal(f64),

    /// Term is zero, negative or longer than supported
    #[error("Term must be between 1 and {max} years, got {years}")]
    InvalidTerm { years: i64, max: u32 },

    /// Annual rate is not a finite number
    #[error("Annual rate must be a finite percentage, got {0}")]
    InvalidRate(f64),
}
