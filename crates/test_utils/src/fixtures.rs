//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for loans, lead submissions and reference
//! months. Figures quoted in the docs are the ones the engine produces.

use core_kernel::{FixedClock, Month, YearMonth};
use domain_lead::{ContactSubmission, NotificationSettings, PartnerSubmission};
use domain_mortgage::{LoanInput, MortgageForm};

/// Fixture for loan test data
pub struct LoanFixtures;

impl LoanFixtures {
    /// 180.000 € at 1% over 30 years, disbursed January 2020
    ///
    /// Payment ≈ 578.95 €, total interest ≈ 28.422 €; 41 periods have
    /// elapsed by June 2023.
    pub fn reference_loan() -> LoanInput {
        LoanInput {
            principal: 180_000.0,
            annual_rate_percent: 1.0,
            term_years: 30,
            disbursement_month: "Enero".to_string(),
            disbursement_year: 2020,
        }
    }

    /// 100.000 € interest-free over 10 years
    pub fn zero_rate_loan() -> LoanInput {
        LoanInput {
            principal: 100_000.0,
            annual_rate_percent: 0.0,
            term_years: 10,
            disbursement_month: "Marzo".to_string(),
            disbursement_year: 2021,
        }
    }

    /// 20.000 € over 3 years, fully repaid by mid-2023
    pub fn short_term_loan() -> LoanInput {
        LoanInput {
            principal: 20_000.0,
            annual_rate_percent: 1.0,
            term_years: 3,
            disbursement_month: "Enero".to_string(),
            disbursement_year: 2020,
        }
    }

    /// Principal of zero, as left by an empty capital field
    pub fn empty_capital_loan() -> LoanInput {
        LoanInput {
            principal: 0.0,
            ..Self::reference_loan()
        }
    }

    /// The simulator form as first shown
    pub fn default_form() -> MortgageForm {
        MortgageForm::default()
    }

    /// The reference loan as typed into the form
    pub fn reference_form() -> MortgageForm {
        MortgageForm {
            capital: "180.000".to_string(),
            euribor: "0,75".to_string(),
            spread: "0,25".to_string(),
            years: "30".to_string(),
            disbursement_month: "Enero".to_string(),
            disbursement_year: "2020".to_string(),
        }
    }
}

/// Fixture for reference months and clocks
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// June 2023
    pub fn june_2023() -> YearMonth {
        YearMonth::new(2023, Month::Junio)
    }

    /// A clock pinned to 1 June 2023
    pub fn june_2023_clock() -> FixedClock {
        FixedClock::at_month(Self::june_2023()).unwrap_or_else(|| unreachable!("June 2023 exists"))
    }
}

/// Fixture for lead submissions
pub struct SubmissionFixtures;

impl SubmissionFixtures {
    pub fn contact() -> ContactSubmission {
        ContactSubmission {
            name: Some("Ana García".to_string()),
            email: Some("ana.garcia@example.com".to_string()),
            phone: Some("600111222".to_string()),
            employment_status: Some("Cuenta ajena".to_string()),
            home_price: Some("250.000".to_string()),
            savings: Some("50.000".to_string()),
            city: Some("Madrid".to_string()),
        }
    }

    /// Contact form with the phone left empty
    pub fn incomplete_contact() -> ContactSubmission {
        ContactSubmission {
            phone: Some(String::new()),
            ..Self::contact()
        }
    }

    pub fn partner() -> PartnerSubmission {
        PartnerSubmission {
            name: Some("Inmobiliaria Sol".to_string()),
            business_type: Some("Inmobiliaria".to_string()),
            email: Some("info@inmobiliariasol.es".to_string()),
            phone: Some("955000000".to_string()),
        }
    }

    /// Contact form as JSON, the way the website posts it
    pub fn contact_json() -> serde_json::Value {
        serde_json::json!({
            "nombre": "Ana García",
            "email": "ana.garcia@example.com",
            "telefono": "600111222",
            "situacionLaboral": "Cuenta ajena",
            "precioVivienda": "250.000",
            "ahorros": "50.000",
            "ciudad": "Madrid"
        })
    }

    /// Partner form as JSON
    pub fn partner_json() -> serde_json::Value {
        serde_json::json!({
            "nombre": "Inmobiliaria Sol",
            "tipoNegocio": "Inmobiliaria",
            "email": "info@inmobiliariasol.es",
            "telefono": "955000000"
        })
    }

    pub fn notification_settings() -> NotificationSettings {
        NotificationSettings::new(
            "avisos@financiacionhipotecaria.com",
            "leads@financiacionhipotecaria.com",
        )
    }
}
