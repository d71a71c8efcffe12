//! Mortgage Domain
//!
//! Computes French (constant-payment) amortization schedules for fixed-rate
//! mortgages and evaluates them against a reference month.
//!
//! # Two-step evaluation
//!
//! A schedule depends only on the loan terms. How much of it has already been
//! paid depends on "today". The two are kept apart so one schedule can be
//! evaluated against any number of reference months:
//!
//! ```rust
//! use core_kernel::{Month, YearMonth};
//! use domain_mortgage::{compute_schedule, elapsed_periods};
//!
//! let schedule = compute_schedule(180_000.0, 1.0, 30).expect("valid terms");
//! let elapsed = elapsed_periods(
//!     schedule.rows(),
//!     "Enero",
//!     2020,
//!     YearMonth::new(2023, Month::Junio),
//! );
//! assert_eq!(elapsed, 41);
//!
//! let summary = schedule.summary_after(elapsed);
//! assert!(summary.paid_principal > 0.0);
//! ```
//!
//! # Invalid input
//!
//! Nothing here fails loudly. Terms with a non-positive principal or term
//! produce no schedule (`None`), and an unknown disbursement month produces
//! zero elapsed periods.

pub mod error;
pub mod loan;
pub mod schedule;
pub mod elapsed;
pub mod summary;
pub mod simulation;
pub mod report;

pub use error::MortgageError;
pub use loan::{LoanInput, LoanTerms, MAX_TERM_YEARS};
pub use schedule::{
    compute_schedule, fixed_payment, AmortizationRow, AmortizationSchedule, BALANCE_EPSILON,
};
pub use elapsed::{elapsed_periods, elapsed_periods_since};
pub use summary::{AmortizationSummary, PaymentProgress};
pub use simulation::{simulate, MortgageForm, MortgageSimulator, Simulation};
pub use report::{
    HeadlineFigures, PaymentTotals, ScheduleRowView, SimulationReport, DEFAULT_PREVIEW_ROWS,
};
