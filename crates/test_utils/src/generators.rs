//! Property-Based Test Generators
//!
//! Provides proptest strategies for loans and reference months, plus
//! `fake`-based lead submissions with realistic-looking values.

use core_kernel::{Month, YearMonth};
use domain_lead::{ContactSubmission, PartnerSubmission};
use domain_mortgage::{LoanInput, LoanTerms};
use fake::faker::address::en::CityName;
use fake::faker::company::en::CompanyName;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::faker::phone_number::en::PhoneNumber;
use fake::Fake;
use proptest::prelude::*;

/// Employment situations offered by the contact form
pub const EMPLOYMENT_STATUSES: [&str; 4] = ["Cuenta ajena", "Autónomo", "Funcionario", "Otro"];

/// Strategy for principals from 1.000 € to 2.000.000 €
pub fn principal_strategy() -> impl Strategy<Value = f64> {
    (1_000u32..2_000_000u32).prop_map(f64::from)
}

/// Strategy for nominal annual rates from 0% to 15%, in basis-point steps
pub fn rate_strategy() -> impl Strategy<Value = f64> {
    (0u32..1_500u32).prop_map(|bp| f64::from(bp) / 100.0)
}

/// Strategy for terms of 1 to 40 years
pub fn term_years_strategy() -> impl Strategy<Value = i64> {
    1i64..=40i64
}

/// Strategy for any month of the year
pub fn month_strategy() -> impl Strategy<Value = Month> {
    (0usize..12usize).prop_map(|index| Month::ALL[index])
}

/// Strategy for months between 1990 and 2099
pub fn year_month_strategy() -> impl Strategy<Value = YearMonth> {
    (1990i32..2100i32, month_strategy()).prop_map(|(year, month)| YearMonth::new(year, month))
}

/// Strategy for amortizable loan terms
pub fn loan_terms_strategy() -> impl Strategy<Value = LoanTerms> {
    (principal_strategy(), rate_strategy(), term_years_strategy()).prop_filter_map(
        "terms must be amortizable",
        |(principal, rate, years)| LoanTerms::new(principal, rate, years),
    )
}

/// Strategy for complete loan input with a known disbursement month
pub fn loan_input_strategy() -> impl Strategy<Value = LoanInput> {
    (
        principal_strategy(),
        rate_strategy(),
        term_years_strategy(),
        month_strategy(),
        1990i64..2030i64,
    )
        .prop_map(|(principal, rate, years, month, year)| LoanInput {
            principal,
            annual_rate_percent: rate,
            term_years: years,
            disbursement_month: month.name().to_string(),
            disbursement_year: year,
        })
}

/// Strategy for free text that may need HTML escaping
pub fn form_text_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 <>&\"'áéíóúñ]{1,40}"
}

/// A complete contact-form lead with fake personal data
pub fn fake_contact() -> ContactSubmission {
    let price: u32 = (80_000..900_000).fake();
    let savings: u32 = (5_000..200_000).fake();
    let status = EMPLOYMENT_STATUSES[(0..EMPLOYMENT_STATUSES.len()).fake::<usize>()];

    ContactSubmission {
        name: Some(Name().fake()),
        email: Some(SafeEmail().fake()),
        phone: Some(PhoneNumber().fake()),
        employment_status: Some(status.to_string()),
        home_price: Some(price.to_string()),
        savings: Some(savings.to_string()),
        city: Some(CityName().fake()),
    }
}

/// A complete partnership request with fake company data
pub fn fake_partner() -> PartnerSubmission {
    PartnerSubmission {
        name: Some(CompanyName().fake()),
        business_type: Some("Inmobiliaria".to_string()),
        email: Some(SafeEmail().fake()),
        phone: Some(PhoneNumber().fake()),
    }
}
