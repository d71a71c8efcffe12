//! Mortgage simulation handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use core_kernel::{Clock, Month, YearMonth};
use domain_mortgage::{simulate, SimulationReport};

use crate::dto::mortgage::{SimulationRequest, SimulationResponse};
use crate::error::ApiError;
use crate::AppState;

pub const INVALID_SIMULATION_MESSAGE: &str = "Datos de simulación no válidos.";

/// Simulates a mortgage from the simulator form
///
/// Evaluated against the current month unless a reference month is given.
/// Input that cannot be amortized yields `{"simulation": null}`; a body that
/// is not a JSON object is a 400.
pub async fn simulate_mortgage(
    State(state): State<AppState>,
    body: Result<Json<SimulationRequest>, JsonRejection>,
) -> Result<Json<SimulationResponse>, ApiError> {
    let Json(request) = body.map_err(|rejection| {
        tracing::debug!(error = %rejection.body_text(), "Unreadable simulation body");
        ApiError::BadRequest(INVALID_SIMULATION_MESSAGE.to_string())
    })?;
    let reference = match (request.reference_year, request.reference_month.as_deref()) {
        (Some(year), Some(month)) => {
            let month = Month::from_name(month).ok_or_else(|| {
                ApiError::BadRequest(format!("Mes de referencia desconocido: {month}"))
            })?;
            YearMonth::new(year, month)
        }
        (None, None) => state.simulator.clock().current_month(),
        _ => {
            return Err(ApiError::BadRequest(
                "referenceYear y referenceMonth deben indicarse juntos.".to_string(),
            ))
        }
    };

    let input = request.form.to_loan_input();
    let simulation = simulate(&input, reference)
        .map(|simulation| SimulationReport::build(&simulation, request.full_schedule));

    Ok(Json(SimulationResponse {
        reference: reference.to_string(),
        simulation,
    }))
}
