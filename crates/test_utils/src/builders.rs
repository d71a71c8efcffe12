//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible defaults.
//! These builders allow tests to specify only the relevant fields while using
//! defaults for everything else.

use core_kernel::{Month, YearMonth};
use domain_lead::{ContactSubmission, PartnerSubmission};
use domain_mortgage::{LoanInput, MortgageForm};

use crate::fixtures::{LoanFixtures, SubmissionFixtures};

/// Builder for loan input, starting from the reference loan
pub struct LoanInputBuilder {
    input: LoanInput,
}

impl Default for LoanInputBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LoanInputBuilder {
    /// 180.000 € at 1% over 30 years, disbursed January 2020
    pub fn new() -> Self {
        Self {
            input: LoanFixtures::reference_loan(),
        }
    }

    pub fn with_principal(mut self, principal: f64) -> Self {
        self.input.principal = principal;
        self
    }

    /// Sets the nominal annual rate, in percent
    pub fn with_rate(mut self, annual_rate_percent: f64) -> Self {
        self.input.annual_rate_percent = annual_rate_percent;
        self
    }

    pub fn with_term_years(mut self, years: i64) -> Self {
        self.input.term_years = years;
        self
    }

    /// Sets the disbursement month
    pub fn disbursed_in(mut self, month: Month, year: i32) -> Self {
        self.input.disbursement_month = month.name().to_string();
        self.input.disbursement_year = i64::from(year);
        self
    }

    /// Sets a disbursement month name as typed, known or not
    pub fn with_month_name(mut self, name: impl Into<String>) -> Self {
        self.input.disbursement_month = name.into();
        self
    }

    /// Disburses the loan a number of months before `reference`
    pub fn disbursed_months_before(self, reference: YearMonth, months: u32) -> Self {
        let index = i64::from(reference.year) * 12 + i64::from(reference.month.ordinal())
            - i64::from(months);
        let year = index.div_euclid(12);
        let month = Month::ALL[index.rem_euclid(12) as usize];
        Self {
            input: LoanInput {
                disbursement_month: month.name().to_string(),
                disbursement_year: year,
                ..self.input
            },
        }
    }

    pub fn build(self) -> LoanInput {
        self.input
    }
}

/// Builder for the simulator form
pub struct MortgageFormBuilder {
    form: MortgageForm,
}

impl Default for MortgageFormBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MortgageFormBuilder {
    /// Starts from the form as first shown
    pub fn new() -> Self {
        Self {
            form: MortgageForm::default(),
        }
    }

    pub fn with_capital(mut self, capital: impl Into<String>) -> Self {
        self.form.capital = capital.into();
        self
    }

    pub fn with_euribor(mut self, euribor: impl Into<String>) -> Self {
        self.form.euribor = euribor.into();
        self
    }

    pub fn with_spread(mut self, spread: impl Into<String>) -> Self {
        self.form.spread = spread.into();
        self
    }

    pub fn with_years(mut self, years: impl Into<String>) -> Self {
        self.form.years = years.into();
        self
    }

    pub fn disbursed_in(mut self, month: impl Into<String>, year: impl Into<String>) -> Self {
        self.form.disbursement_month = month.into();
        self.form.disbursement_year = year.into();
        self
    }

    pub fn build(self) -> MortgageForm {
        self.form
    }
}

/// Builder for contact-form leads, starting from a complete submission
pub struct ContactSubmissionBuilder {
    submission: ContactSubmission,
}

impl Default for ContactSubmissionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactSubmissionBuilder {
    pub fn new() -> Self {
        Self {
            submission: SubmissionFixtures::contact(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.submission.name = Some(name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.submission.email = Some(email.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.submission.phone = Some(phone.into());
        self
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.submission.city = Some(city.into());
        self
    }

    /// Leaves the savings field out
    pub fn without_savings(mut self) -> Self {
        self.submission.savings = None;
        self
    }

    /// Leaves the email field out
    pub fn without_email(mut self) -> Self {
        self.submission.email = None;
        self
    }

    pub fn build(self) -> ContactSubmission {
        self.submission
    }
}

/// Builder for partnership requests
pub struct PartnerSubmissionBuilder {
    submission: PartnerSubmission,
}

impl Default for PartnerSubmissionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PartnerSubmissionBuilder {
    pub fn new() -> Self {
        Self {
            submission: SubmissionFixtures::partner(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.submission.name = Some(name.into());
        self
    }

    pub fn with_business_type(mut self, business_type: impl Into<String>) -> Self {
        self.submission.business_type = Some(business_type.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.submission.email = Some(email.into());
        self
    }

    /// Leaves the phone field out
    pub fn without_phone(mut self) -> Self {
        self.submission.phone = None;
        self
    }

    pub fn build(self) -> PartnerSubmission {
        self.submission
    }
}
