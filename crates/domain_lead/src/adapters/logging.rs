//! Logging Adapter
//!
//! Writes notifications to the log instead of sending them. Used when no
//! SMTP relay is configured, typically during local development.

use async_trait::async_trait;
use tracing::info;

use core_kernel::{DomainPort, HealthCheckResult, HealthCheckable, OperationMetadata, PortError};

use crate::notification::EmailMessage;
use crate::ports::{DeliveryReceipt, MailerPort};

#[derive(Debug, Clone, Default)]
pub struct LoggingMailer;

impl LoggingMailer {
    pub fn new() -> Self {
        Self
    }
}

impl DomainPort for LoggingMailer {}

#[async_trait]
impl HealthCheckable for LoggingMailer {
    async fn health_check(&self) -> HealthCheckResult {
        HealthCheckResult::healthy("logging-mailer", 0)
    }
}

#[async_trait]
impl MailerPort for LoggingMailer {
    fn name(&self) -> &'static str {
        "logging"
    }

    async fn send(
        &self,
        message: &EmailMessage,
        metadata: Option<OperationMetadata>,
    ) -> Result<DeliveryReceipt, PortError> {
        let message_id = message
            .reference
            .clone()
            .or_else(|| metadata.and_then(|m| m.correlation_id))
            .unwrap_or_else(|| "unreferenced".to_string());

        info!(
            message_id = %message_id,
            from = %message.from,
            to = ?message.to,
            reply_to = message.reply_to.as_deref().unwrap_or("-"),
            subject = %message.subject,
            body = %message.html_body,
            "Notification not sent: no SMTP relay configured"
        );

        Ok(DeliveryReceipt {
            message_id,
            accepted: message.to.clone(),
        })
    }
}
