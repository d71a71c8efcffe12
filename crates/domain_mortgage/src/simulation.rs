//! Mortgage simulations
//!
//! Drives the engine the way the simulator page does: free-text form fields
//! are parsed leniently, the schedule is computed once, and the summary is
//! evaluated against the current month.

use std::sync::Arc;

use core_kernel::{parse_leading_integer, parse_localized_decimal, Clock, YearMonth};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::elapsed::elapsed_periods;
use crate::loan::LoanInput;
use crate::schedule::{AmortizationRow, AmortizationSchedule};
use crate::summary::{AmortizationSummary, PaymentProgress};

/// Simulator form as typed by the user
///
/// Missing fields take the values the form is pre-filled with. JSON numbers
/// are read as the text a user would have typed, so `180000` and `"180000"`
/// simulate the same loan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MortgageForm {
    /// Amount borrowed (`"180.000"`)
    #[serde(alias = "capitalPrestado", deserialize_with = "form_text")]
    pub capital: String,
    /// Euribor, or the fixed rate for fixed-rate loans (`"1"`)
    #[serde(deserialize_with = "form_text")]
    pub euribor: String,
    /// Spread over the index (`"0"`); leave at zero for fixed-rate loans
    #[serde(alias = "diferencial", deserialize_with = "form_text")]
    pub spread: String,
    /// Term in years (`"30"`)
    #[serde(alias = "anios", deserialize_with = "form_text")]
    pub years: String,
    /// Disbursement month name (`"Noviembre"`)
    #[serde(alias = "mesAdjudicacion", deserialize_with = "form_text")]
    pub disbursement_month: String,
    /// Disbursement year (`"2025"`)
    #[serde(alias = "anoAdjudicacion", deserialize_with = "form_text")]
    pub disbursement_year: String,
}

/// Reads a form field from a string or a number
///
/// Fractions get a decimal comma, since a '.' in the text reads as a
/// thousands separator. Anything else leaves the field blank.
fn form_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum FormValue {
        Text(String),
        Integer(i64),
        Decimal(f64),
        Other(IgnoredAny),
    }

    Ok(match FormValue::deserialize(deserializer)? {
        FormValue::Text(text) => text,
        FormValue::Integer(value) => value.to_string(),
        FormValue::Decimal(value) => value.to_string().replace('.', ","),
        FormValue::Other(_) => String::new(),
    })
}

impl Default for MortgageForm {
    fn default() -> Self {
        Self {
            capital: "180000".to_string(),
            euribor: "1".to_string(),
            spread: "0".to_string(),
            years: "30".to_string(),
            disbursement_month: "Noviembre".to_string(),
            disbursement_year: "2025".to_string(),
        }
    }
}

impl MortgageForm {
    /// Parses the form; the nominal rate is euribor plus spread
    pub fn to_loan_input(&self) -> LoanInput {
        LoanInput {
            principal: parse_localized_decimal(&self.capital),
            annual_rate_percent: parse_localized_decimal(&self.euribor)
                + parse_localized_decimal(&self.spread),
            term_years: parse_leading_integer(&self.years),
            disbursement_month: self.disbursement_month.clone(),
            disbursement_year: parse_leading_integer(&self.disbursement_year),
        }
    }
}

/// A schedule evaluated at a reference month
#[derive(Debug, Clone)]
pub struct Simulation {
    input: LoanInput,
    schedule: Arc<AmortizationSchedule>,
    reference: YearMonth,
    progress: PaymentProgress,
}

/// Simulates a loan as of `reference`
///
/// Returns `None`, not an error, when the principal or the term is not
/// positive: there is simply nothing to show.
pub fn simulate(input: &LoanInput, reference: YearMonth) -> Option<Simulation> {
    let terms = match input.terms() {
        Ok(terms) => terms,
        Err(reason) => {
            debug!(%reason, "Loan terms cannot be amortized");
            return None;
        }
    };

    let schedule = Arc::new(AmortizationSchedule::compute(&terms));
    Some(Simulation::evaluate(input.clone(), schedule, reference))
}

impl Simulation {
    fn evaluate(input: LoanInput, schedule: Arc<AmortizationSchedule>, reference: YearMonth) -> Self {
        let elapsed = elapsed_periods(
            schedule.rows(),
            &input.disbursement_month,
            input.disbursement_year,
            reference,
        );
        let progress = schedule.progress(elapsed);

        debug!(
            periods = schedule.len(),
            elapsed,
            reference = %reference,
            "Evaluated mortgage simulation"
        );

        Self {
            input,
            schedule,
            reference,
            progress,
        }
    }

    /// Evaluates the same schedule at another reference month
    ///
    /// The schedule is shared, not recomputed.
    pub fn re_evaluate(&self, reference: YearMonth) -> Simulation {
        Self::evaluate(self.input.clone(), Arc::clone(&self.schedule), reference)
    }

    pub fn input(&self) -> &LoanInput {
        &self.input
    }

    pub fn schedule(&self) -> &AmortizationSchedule {
        &self.schedule
    }

    pub fn rows(&self) -> &[AmortizationRow] {
        self.schedule.rows()
    }

    pub fn reference(&self) -> YearMonth {
        self.reference
    }

    pub fn elapsed_periods(&self) -> usize {
        self.progress.elapsed_periods
    }

    pub fn progress(&self) -> &PaymentProgress {
        &self.progress
    }

    pub fn summary(&self) -> AmortizationSummary {
        self.schedule.summary_after(self.progress.elapsed_periods)
    }

    /// Whether paid/pending figures are worth showing
    pub fn has_payments_made(&self) -> bool {
        self.progress.has_payments_made()
    }
}

/// Runs simulations against a clock
#[derive(Debug, Clone, Default)]
pub struct MortgageSimulator<C> {
    clock: C,
}

impl<C: Clock> MortgageSimulator<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Simulates parsed input as of the clock's current month
    pub fn simulate(&self, input: &LoanInput) -> Option<Simulation> {
        simulate(input, self.clock.current_month())
    }

    /// Parses and simulates a form as of the clock's current month
    pub fn simulate_form(&self, form: &MortgageForm) -> Option<Simulation> {
        self.simulate(&form.to_loan_input())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::{FixedClock, Month};

    fn june_2023() -> YearMonth {
        YearMonth::new(2023, Month::Junio)
    }

    #[test]
    fn test_form_defaults() {
        let input = MortgageForm::default().to_loan_input();
        assert_eq!(input.principal, 180_000.0);
        assert_eq!(input.annual_rate_percent, 1.0);
        assert_eq!(input.term_years, 30);
        assert_eq!(input.disbursement_month, "Noviembre");
        assert_eq!(input.disbursement_year, 2025);
    }

    #[test]
    fn test_form_adds_spread_to_euribor() {
        let form = MortgageForm {
            euribor: "2,5".to_string(),
            spread: "0,75".to_string(),
            ..Default::default()
        };
        assert_eq!(form.to_loan_input().annual_rate_percent, 3.25);
    }

    #[test]
    fn test_form_accepts_spanish_field_names() {
        let form: MortgageForm = serde_json::from_str(
            r#"{"capitalPrestado":"250.000","diferencial":"0,5","anios":"25","mesAdjudicacion":"Enero","anoAdjudicacion":"2020"}"#,
        )
        .unwrap();
        let input = form.to_loan_input();
        assert_eq!(input.principal, 250_000.0);
        assert_eq!(input.annual_rate_percent, 1.5);
        assert_eq!(input.term_years, 25);
        assert_eq!(input.disbursement_month, "Enero");
    }

    #[test]
    fn test_form_accepts_json_numbers() {
        let form: MortgageForm = serde_json::from_str(
            r#"{"capital":180000,"euribor":0.75,"spread":0.25,"years":"30","disbursementYear":2020}"#,
        )
        .unwrap();
        assert_eq!(form.capital, "180000");
        assert_eq!(form.euribor, "0,75");
        assert_eq!(form.disbursement_year, "2020");

        let input = form.to_loan_input();
        assert_eq!(input.principal, 180_000.0);
        assert_eq!(input.annual_rate_percent, 1.0);
        assert_eq!(input.term_years, 30);
        assert_eq!(input.disbursement_year, 2020);
    }

    #[test]
    fn test_form_blanks_values_that_are_not_text() {
        let form: MortgageForm =
            serde_json::from_str(r#"{"capital":null,"years":true,"euribor":[1]}"#).unwrap();
        assert_eq!(form.capital, "");
        assert_eq!(form.years, "");
        assert_eq!(form.euribor, "");
        assert_eq!(form.spread, "0");
        assert!(simulate(&form.to_loan_input(), june_2023()).is_none());
    }

    #[test]
    fn test_simulation_counts_elapsed_periods() {
        let form = MortgageForm {
            disbursement_month: "Enero".to_string(),
            disbursement_year: "2020".to_string(),
            ..Default::default()
        };
        let simulation = simulate(&form.to_loan_input(), june_2023()).unwrap();
        assert_eq!(simulation.elapsed_periods(), 41);
        assert!(simulation.has_payments_made());
    }

    #[test]
    fn test_invalid_form_gives_nothing() {
        let form = MortgageForm {
            capital: "".to_string(),
            ..Default::default()
        };
        assert!(simulate(&form.to_loan_input(), june_2023()).is_none());
    }

    #[test]
    fn test_re_evaluate_shares_the_schedule() {
        let form = MortgageForm {
            disbursement_month: "Enero".to_string(),
            disbursement_year: "2020".to_string(),
            ..Default::default()
        };
        let first = simulate(&form.to_loan_input(), june_2023()).unwrap();
        let later = first.re_evaluate(YearMonth::new(2030, Month::Enero));

        assert!(std::ptr::eq(first.schedule(), later.schedule()));
        assert_eq!(later.elapsed_periods(), 120);
        assert!(later.summary().paid_principal > first.summary().paid_principal);
    }

    #[test]
    fn test_simulator_uses_clock() {
        let clock = FixedClock::at_month(june_2023()).unwrap();
        let simulator = MortgageSimulator::new(clock);
        let form = MortgageForm {
            disbursement_month: "Mayo".to_string(),
            disbursement_year: "2023".to_string(),
            ..Default::default()
        };
        let simulation = simulator.simulate_form(&form).unwrap();
        assert_eq!(simulation.reference(), june_2023());
        assert_eq!(simulation.elapsed_periods(), 1);
    }
}
