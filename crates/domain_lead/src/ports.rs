//! Lead Domain Ports
//!
//! The intake service only needs one thing from the outside world: a way to
//! deliver an e-mail. `MailerPort` abstracts it so the transport can be
//! chosen at startup:
//!
//! - **SMTP Adapter**: relays through the configured SMTP server
//! - **Logging Adapter**: writes the message to the log (local development)
//! - **In-Memory Adapter**: records messages for tests, with failure injection
//!
//! # Usage
//!
//! ```rust,ignore
//! let mailer: Arc<dyn MailerPort> = match config.smtp {
//!     Some(smtp) => Arc::new(SmtpMailer::new(smtp)?),
//!     None => Arc::new(LoggingMailer::new()),
//! };
//! let service = LeadIntakeService::new(mailer, settings);
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use core_kernel::{DomainPort, HealthCheckable, OperationMetadata, PortError};

use crate::notification::EmailMessage;

/// What the transport reported for an accepted message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReceipt {
    /// Message-ID the transport assigned or was given
    pub message_id: String,
    /// Recipients the transport accepted
    pub accepted: Vec<String>,
}

/// Outbound e-mail transport
///
/// Implementations must report transient failures (connection problems,
/// timeouts, 4xx replies) as transient [`PortError`]s so the caller can retry
/// them, and permanent refusals as anything else.
#[async_trait]
pub trait MailerPort: DomainPort + HealthCheckable {
    /// Short adapter name for logs
    fn name(&self) -> &'static str;

    /// Delivers one message
    async fn send(
        &self,
        message: &EmailMessage,
        metadata: Option<OperationMetadata>,
    ) -> Result<DeliveryReceipt, PortError>;
}

/// Mock implementation for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    use core_kernel::HealthCheckResult;

    /// A failure to inject into the next send
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum InjectedFailure {
        /// Connection refused; retryable
        Transient,
        /// Mailbox rejected; not retryable
        Permanent,
    }

    impl InjectedFailure {
        fn to_error(self) -> PortError {
            match self {
                InjectedFailure::Transient => PortError::connection("injected connection failure"),
                InjectedFailure::Permanent => {
                    PortError::rejected("mock-mailer", 550, "injected mailbox rejection")
                }
            }
        }
    }

    /// In-memory mailer that records every delivered message
    #[derive(Debug, Default, Clone)]
    pub struct InMemoryMailer {
        sent: Arc<Mutex<Vec<EmailMessage>>>,
        failures: Arc<Mutex<VecDeque<InjectedFailure>>>,
        attempts: Arc<Mutex<u32>>,
    }

    impl InMemoryMailer {
        pub fn new() -> Self {
            Self::default()
        }

        /// Makes the next `count` sends fail
        pub async fn fail_next(&self, count: usize, failure: InjectedFailure) {
            let mut failures = self.failures.lock().await;
            failures.extend(std::iter::repeat(failure).take(count));
        }

        /// Messages delivered so far
        pub async fn sent(&self) -> Vec<EmailMessage> {
            self.sent.lock().await.clone()
        }

        /// Send calls so far, failed ones included
        pub async fn attempts(&self) -> u32 {
            *self.attempts.lock().await
        }
    }

    impl DomainPort for InMemoryMailer {}

    #[async_trait]
    impl HealthCheckable for InMemoryMailer {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult::healthy("in-memory-mailer", 0)
        }
    }

    #[async_trait]
    impl MailerPort for InMemoryMailer {
        fn name(&self) -> &'static str {
            "in-memory"
        }

        async fn send(
            &self,
            message: &EmailMessage,
            _metadata: Option<OperationMetadata>,
        ) -> Result<DeliveryReceipt, PortError> {
            *self.attempts.lock().await += 1;
            if let Some(failure) = self.failures.lock().await.pop_front() {
                return Err(failure.to_error());
            }
            if message.to.is_empty() {
                return Err(PortError::validation_field("No recipients defined", "to"));
            }

            let mut sent = self.sent.lock().await;
            sent.push(message.clone());
            Ok(DeliveryReceipt {
                message_id: message
                    .reference
                    .clone()
                    .unwrap_or_else(|| format!("in-memory-{}", sent.len())),
                accepted: message.to.clone(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::{InMemoryMailer, InjectedFailure};
    use super::*;
    use crate::notification::Mailbox;

    fn message(to: &[&str]) -> EmailMessage {
        EmailMessage {
            from: Mailbox::new("from@example.com"),
            to: to.iter().map(|s| s.to_string()).collect(),
            reply_to: None,
            subject: "Prueba".to_string(),
            html_body: "<p>Hola</p>".to_string(),
            reference: Some("LEAD-1".to_string()),
        }
    }

    #[tokio::test]
    async fn test_mock_records_messages() {
        let mailer = InMemoryMailer::new();
        let receipt = mailer.send(&message(&["to@example.com"]), None).await.unwrap();

        assert_eq!(receipt.message_id, "LEAD-1");
        assert_eq!(receipt.accepted, ["to@example.com"]);
        assert_eq!(mailer.sent().await.len(), 1);
    }

    #[tokio::test]
    async fn test_mock_injected_failures_are_consumed() {
        let mailer = InMemoryMailer::new();
        mailer.fail_next(1, InjectedFailure::Transient).await;
        mailer.fail_next(1, InjectedFailure::Permanent).await;

        let first = mailer.send(&message(&["to@example.com"]), None).await.unwrap_err();
        assert!(first.is_transient());
        let second = mailer.send(&message(&["to@example.com"]), None).await.unwrap_err();
        assert!(!second.is_transient());
        assert!(mailer.send(&message(&["to@example.com"]), None).await.is_ok());
        assert_eq!(mailer.attempts().await, 3);
    }

    #[tokio::test]
    async fn test_mock_requires_recipients() {
        let mailer = InMemoryMailer::new();
        let err = mailer.send(&message(&[]), None).await.unwrap_err();
        assert!(matches!(err, PortError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_mock_health_check() {
        let mailer = InMemoryMailer::new();
        let result = mailer.health_check().await;
        assert_eq!(result.status, core_kernel::AdapterHealth::Healthy);
    }
}
