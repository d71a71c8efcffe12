//! HTTP API Layer
//!
//! This crate provides the REST API behind the FinanciacionHipotecaria.com
//! website using Axum.
//!
//! # Routes
//!
//! - `GET /` - plain-text banner
//! - `GET /health`, `GET /health/ready` - liveness and mailer readiness
//! - `POST /api/contact` - mortgage lead from the contact form
//! - `POST /api/partner` - partnership request
//! - `POST /api/mortgage/simulation` - amortization schedule and summary
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let state = AppState::from_config(config)?;
//! axum::serve(listener, create_router(state)).await?;
//! ```

pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use core_kernel::{Clock, CoreError, SystemClock};
use domain_lead::{LeadIntakeService, LoggingMailer, MailerPort, SmtpMailer};
use domain_mortgage::MortgageSimulator;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::handlers::{health, lead, mortgage};
use crate::middleware::request_logging_middleware;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub leads: Arc<LeadIntakeService>,
    pub simulator: Arc<MortgageSimulator<Arc<dyn Clock>>>,
    pub config: Arc<ApiConfig>,
}

impl AppState {
    pub fn new(leads: LeadIntakeService, clock: Arc<dyn Clock>, config: ApiConfig) -> Self {
        Self {
            leads: Arc::new(leads),
            simulator: Arc::new(MortgageSimulator::new(clock)),
            config: Arc::new(config),
        }
    }

    /// Wires the mailer and clock described by the configuration
    ///
    /// Without an SMTP host, notifications are written to the log.
    pub fn from_config(config: ApiConfig) -> Result<Self, CoreError> {
        let mailer: Arc<dyn MailerPort> = match config.smtp_config() {
            Some(smtp) => Arc::new(
                SmtpMailer::new(smtp).map_err(|err| CoreError::Configuration(err.to_string()))?,
            ),
            None => Arc::new(LoggingMailer::new()),
        };
        let leads = LeadIntakeService::new(mailer, config.notification_settings())
            .with_retry(config.retry_policy());
        let clock = SystemClock::new(config.timezone()?);

        Ok(Self::new(leads, Arc::new(clock), config))
    }
}

/// Creates the main API router
pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/contact", post(lead::submit_contact))
        .route("/partner", post(lead::submit_partner))
        .route("/mortgage/simulation", post(mortgage::simulate_mortgage));

    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .nest("/api", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(axum_middleware::from_fn(request_logging_middleware)),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
