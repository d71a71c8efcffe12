//! SMTP Adapter
//!
//! Relays notifications through the configured SMTP server using `lettre`,
//! one connection per message. The transport upgrades the connection with
//! STARTTLS whenever the relay offers it and authenticates only afterwards,
//! so credentials never travel in clear text to a relay that supports TLS.
//!
//! | [`SmtpTls`]      | Connection                                       |
//! |------------------|--------------------------------------------------|
//! | `Opportunistic`  | plain, upgraded with STARTTLS when advertised    |
//! | `Wrapper`        | TLS from the first byte (port 465)               |
//! | `None`           | plain; local relays and tests only               |
//!
//! # Error Handling
//!
//! - Connection failures, TLS failures and timeouts -> transient `PortError`
//! - 4xx replies -> `PortError::ServiceUnavailable` (transient)
//! - 5xx replies -> `PortError::Rejected`
//! - Unusable addresses -> `PortError::Validation`

use std::fmt;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::Utc;
use lettre::message::header::ContentType;
use lettre::message::Mailbox as Recipient;
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::transport::smtp::extension::ClientId;
use lettre::transport::smtp::Error as SmtpError;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use core_kernel::{DomainPort, HealthCheckResult, HealthCheckable, OperationMetadata, PortError};

use crate::notification::EmailMessage;
use crate::ports::{DeliveryReceipt, MailerPort};

const SERVICE: &str = "smtp";

/// How the connection to the relay is secured
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SmtpTls {
    /// No encryption at all
    None,
    /// STARTTLS when the relay advertises it
    #[default]
    Opportunistic,
    /// Implicit TLS
    Wrapper,
}

/// Connection settings for the SMTP relay
#[derive(Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    /// AUTH is attempted only when both username and password are set
    pub username: Option<String>,
    pub password: Option<String>,
    pub tls: SmtpTls,
    /// Bound on the whole exchange with the relay
    pub timeout: Duration,
    /// Name announced in EHLO
    pub helo_name: String,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 2525,
            username: None,
            password: None,
            tls: SmtpTls::default(),
            timeout: Duration::from_secs(30),
            helo_name: "localhost".to_string(),
        }
    }
}

impl fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("tls", &self.tls)
            .field("timeout", &self.timeout)
            .field("helo_name", &self.helo_name)
            .finish()
    }
}

impl SmtpConfig {
    fn credentials(&self) -> Option<(&str, &str)> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => Some((user, pass)),
            _ => None,
        }
    }

    fn transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, PortError> {
        let tls = match self.tls {
            SmtpTls::None => Tls::None,
            SmtpTls::Opportunistic => Tls::Opportunistic(self.tls_parameters()?),
            SmtpTls::Wrapper => Tls::Wrapper(self.tls_parameters()?),
        };

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(self.host.as_str())
            .port(self.port)
            .tls(tls)
            .timeout(Some(self.timeout))
            .hello_name(ClientId::Domain(self.helo_name.clone()));
        if let Some((user, pass)) = self.credentials() {
            builder = builder.credentials(Credentials::new(user.to_string(), pass.to_string()));
        }
        Ok(builder.build())
    }

    fn tls_parameters(&self) -> Result<TlsParameters, PortError> {
        TlsParameters::new(self.host.clone()).map_err(|err| {
            PortError::internal(format!("invalid TLS settings for {}: {err}", self.host))
        })
    }
}

/// Mailer that relays through an SMTP server
pub struct SmtpMailer {
    config: SmtpConfig,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl fmt::Debug for SmtpMailer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpMailer").field("config", &self.config).finish()
    }
}

impl SmtpMailer {
    /// Fails only when the TLS settings cannot be built for `config.host`
    pub fn new(config: SmtpConfig) -> Result<Self, PortError> {
        let transport = config.transport()?;
        Ok(Self { config, transport })
    }

    pub fn config(&self) -> &SmtpConfig {
        &self.config
    }

    async fn deliver(&self, message: &EmailMessage) -> Result<DeliveryReceipt, PortError> {
        if message.to.is_empty() {
            return Err(PortError::validation_field("No recipients defined", "to"));
        }

        let message_id = message_id(message, &self.config.helo_name);
        let email = build_message(message, &message_id)?;

        let response = timeout(self.config.timeout, self.transport.send(email))
            .await
            .map_err(|_| PortError::timeout("smtp send", duration_ms(self.config.timeout)))?
            .map_err(|err| port_error(err, self.config.timeout))?;
        debug!(code = %response.code(), "SMTP relay replied to end of DATA");

        Ok(DeliveryReceipt {
            message_id,
            accepted: message.to.clone(),
        })
    }
}

impl DomainPort for SmtpMailer {}

#[async_trait]
impl HealthCheckable for SmtpMailer {
    /// Opens a session (TLS and AUTH included) and quits
    async fn health_check(&self) -> HealthCheckResult {
        let start = Instant::now();
        let result = timeout(self.config.timeout, self.transport.test_connection()).await;

        let latency_ms = start.elapsed().as_millis() as u64;
        match result {
            Ok(Ok(true)) => HealthCheckResult::healthy("smtp-mailer", latency_ms),
            Ok(Ok(false)) => {
                HealthCheckResult::unhealthy("smtp-mailer", latency_ms, "relay did not answer NOOP")
            }
            Ok(Err(err)) => HealthCheckResult::unhealthy("smtp-mailer", latency_ms, err.to_string()),
            Err(_) => HealthCheckResult::unhealthy("smtp-mailer", latency_ms, "health check timed out"),
        }
    }
}

#[async_trait]
impl MailerPort for SmtpMailer {
    fn name(&self) -> &'static str {
        "smtp"
    }

    async fn send(
        &self,
        message: &EmailMessage,
        metadata: Option<OperationMetadata>,
    ) -> Result<DeliveryReceipt, PortError> {
        let correlation_id = metadata.and_then(|m| m.correlation_id);
        let start = Instant::now();
        let receipt = self.deliver(message).await?;

        info!(
            host = %self.config.host,
            port = self.config.port,
            message_id = %receipt.message_id,
            correlation_id = correlation_id.as_deref().unwrap_or("-"),
            duration_ms = start.elapsed().as_millis() as u64,
            "SMTP relay accepted message"
        );
        Ok(receipt)
    }
}

fn port_error(err: SmtpError, limit: Duration) -> PortError {
    if err.is_permanent() {
        let code = err
            .status()
            .and_then(|code| code.to_string().parse().ok())
            .unwrap_or(500);
        PortError::rejected(SERVICE, code, &err)
    } else if err.is_transient() {
        PortError::ServiceUnavailable {
            service: format!("smtp: {err}"),
        }
    } else if err.is_timeout() {
        PortError::timeout("smtp send", duration_ms(limit))
    } else {
        PortError::connection_with_source("smtp relay unavailable", err)
    }
}

fn duration_ms(duration: Duration) -> u64 {
    duration.as_millis() as u64
}

fn message_id(message: &EmailMessage, helo_name: &str) -> String {
    let domain = message
        .from
        .address
        .rsplit_once('@')
        .map(|(_, domain)| domain)
        .unwrap_or(helo_name);
    let local = message
        .reference
        .clone()
        .unwrap_or_else(|| Utc::now().format("%Y%m%d%H%M%S%f").to_string());
    format!("{local}@{domain}")
}

fn build_message(message: &EmailMessage, message_id: &str) -> Result<Message, PortError> {
    let from = recipient(message.from.name.clone(), &message.from.address, "from")?;
    let mut builder = Message::builder()
        .from(from)
        .subject(message.subject.clone())
        .message_id(Some(format!("<{message_id}>")))
        .header(ContentType::TEXT_HTML);

    for to in &message.to {
        builder = builder.to(recipient(None, to, "to")?);
    }

    // The reply-to is whatever the submitter typed; a bad one must not lose the lead
    if let Some(reply_to) = &message.reply_to {
        match recipient(None, reply_to, "reply_to") {
            Ok(mailbox) => builder = builder.reply_to(mailbox),
            Err(err) => warn!(error = %err, "Dropping unusable Reply-To"),
        }
    }

    builder
        .body(message.html_body.clone())
        .map_err(|err| PortError::validation(format!("cannot build message: {err}")))
}

fn recipient(name: Option<String>, address: &str, field: &str) -> Result<Recipient, PortError> {
    let address: Address = address.trim().parse().map_err(|err| {
        PortError::validation_field(format!("invalid address {address:?}: {err}"), field)
    })?;
    Ok(Recipient::new(name, address))
}
