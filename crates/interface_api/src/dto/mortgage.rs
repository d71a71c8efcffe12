//! Mortgage simulation DTOs

use domain_mortgage::{MortgageForm, SimulationReport};
use serde::{Deserialize, Serialize};

/// Simulator form plus display options
///
/// Form fields are the simulator's text inputs; missing ones take the
/// simulator's defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SimulationRequest {
    #[serde(flatten)]
    pub form: MortgageForm,
    /// Include every row instead of the first year
    pub full_schedule: bool,
    /// Evaluate at this year instead of today; needs `reference_month`
    pub reference_year: Option<i32>,
    /// Month name, `"Enero"` .. `"Diciembre"`
    pub reference_month: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SimulationResponse {
    /// Month the paid/pending figures refer to (`"Junio 2023"`)
    pub reference: String,
    /// `null` when the input cannot be amortized
    pub simulation: Option<SimulationReport>,
}
