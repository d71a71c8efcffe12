//! FinanciacionHipotecaria.com - API Server Binary
//!
//! This binary starts the HTTP API server behind the website.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration (notifications are only logged)
//! cargo run --bin mortgage-api
//!
//! # Relay notifications through an SMTP server
//! SMTP_HOST=smtp.example.com SMTP_USER=apikey SMTP_PASS=... EMAIL_TO=leads@example.com \
//!     cargo run --bin mortgage-api
//! ```
//!
//! # Environment Variables
//!
//! * `HOST` - Server host (default: 0.0.0.0)
//! * `PORT` - Server port (default: 3001)
//! * `SMTP_HOST`, `SMTP_PORT` (default: 2525), `SMTP_USER`, `SMTP_PASS` - SMTP relay
//! * `SMTP_SECURE` - `true` for implicit TLS; otherwise STARTTLS when the relay offers it
//! * `EMAIL_FROM` - Sender address (default: `SMTP_USER`)
//! * `EMAIL_TO` - Inbox receiving lead notifications
//! * `MAIL_RETRY_ATTEMPTS` (default: 1), `MAIL_RETRY_BACKOFF_MS`, `MAIL_TIMEOUT_SECS` (default: 30)
//! * `TIMEZONE` - Timezone deciding the current month (default: Europe/Madrid)
//! * `LOG_LEVEL` - trace, debug, info, warn, error (default: info); `RUST_LOG` wins
//! * `LOG_FORMAT` - pretty or json (default: pretty)

use anyhow::Context;
use interface_api::config::{ApiConfig, LogFormat};
use interface_api::{create_router, AppState};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Main entry point for the API server.
///
/// # Errors
///
/// Returns an error if:
/// - Configuration cannot be loaded from environment
/// - The configured timezone is unknown
/// - Server fails to bind to the configured address
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env().context("invalid configuration")?;

    init_tracing(&config.log_level, config.log_format);

    tracing::info!(
        host = config.smtp_host.as_deref().unwrap_or("-"),
        port = config.smtp_port,
        user = config.smtp_user.as_deref().unwrap_or("-"),
        secure = config.smtp_secure.as_deref().unwrap_or("-"),
        tls = ?config.smtp_tls(),
        "SMTP config"
    );
    if config.smtp_config().is_none() {
        tracing::warn!("SMTP_HOST is not set; lead notifications will only be logged");
    }

    let addr = config.server_addr();
    let state = AppState::from_config(config.clone()).context("invalid configuration")?;
    let app = create_router(state);

    let listener = TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("cannot bind {addr}"))?;

    tracing::info!("Servidor escuchando en http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
fn init_tracing(log_level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init(),
    }
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
