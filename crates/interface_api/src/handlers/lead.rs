//! Lead intake handlers
//!
//! Both endpoints answer `{"message":"OK"}` once the notification is sent.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    Json,
};
use core_kernel::OperationMetadata;
use domain_lead::{ContactSubmission, PartnerSubmission};

use crate::error::{ApiError, MessageResponse};
use crate::middleware::REQUEST_ID_HEADER;
use crate::AppState;

/// Receives a mortgage lead from the contact form
pub async fn submit_contact(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ContactSubmission>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(submission) = payload?;
    state
        .leads
        .submit_contact(submission, request_metadata(&headers))
        .await?;
    Ok(Json(MessageResponse::ok()))
}

/// Receives a partnership request
pub async fn submit_partner(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<PartnerSubmission>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(submission) = payload?;
    state
        .leads
        .submit_partner(submission, request_metadata(&headers))
        .await?;
    Ok(Json(MessageResponse::ok()))
}

fn request_metadata(headers: &HeaderMap) -> Option<OperationMetadata> {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(OperationMetadata::with_correlation_id)
}
