//! Lead intake service
//!
//! Validates a submission, composes its notification and hands it to the
//! configured mailer. Transient transport failures can be retried a bounded
//! number of times; permanent ones fail immediately.

use std::sync::Arc;
use std::time::Duration;

use core_kernel::OperationMetadata;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::error::LeadError;
use crate::notification::{compose, NotificationSettings};
use crate::ports::MailerPort;
use crate::submission::{ContactSubmission, LeadKind, LeadSubmission, PartnerSubmission};

/// How often delivery is attempted
///
/// Retries give at-least-once delivery. A relay that takes the message but
/// whose answer is lost (a timeout or a 4xx after DATA) gets it again on the
/// next attempt. Every attempt carries the same Message-ID, derived from the
/// lead reference, so the inbox can recognise the copy. With the default
/// single attempt nothing is ever sent twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, first one included; at least 1
    pub max_attempts: u32,
    /// Wait before the second attempt; doubles on each further attempt
    pub backoff: Duration,
}

impl RetryPolicy {
    /// A single attempt
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            backoff: Duration::ZERO,
        }
    }

    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    fn delay_before(&self, attempt: u32) -> Duration {
        self.backoff.saturating_mul(2u32.saturating_pow(attempt.saturating_sub(2)))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

/// Outcome of an accepted submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadReceipt {
    pub reference: String,
    pub kind: LeadKind,
    pub message_id: String,
    pub attempts: u32,
}

/// Service that turns submissions into notification e-mails
///
/// # Example
///
/// ```rust,ignore
/// let service = LeadIntakeService::new(Arc::new(LoggingMailer::new()), settings)
///     .with_retry(RetryPolicy::new(3, Duration::from_millis(200)));
/// let receipt = service.submit_contact(submission, None).await?;
/// ```
#[derive(Clone)]
pub struct LeadIntakeService {
    mailer: Arc<dyn MailerPort>,
    settings: NotificationSettings,
    retry: RetryPolicy,
}

impl std::fmt::Debug for LeadIntakeService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeadIntakeService")
            .field("mailer", &self.mailer.name())
            .field("settings", &self.settings)
            .field("retry", &self.retry)
            .finish()
    }
}

impl LeadIntakeService {
    pub fn new(mailer: Arc<dyn MailerPort>, settings: NotificationSettings) -> Self {
        Self {
            mailer,
            settings,
            retry: RetryPolicy::none(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn mailer(&self) -> &Arc<dyn MailerPort> {
        &self.mailer
    }

    pub fn settings(&self) -> &NotificationSettings {
        &self.settings
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    pub async fn submit_contact(
        &self,
        submission: ContactSubmission,
        metadata: Option<OperationMetadata>,
    ) -> Result<LeadReceipt, LeadError> {
        self.submit(&submission, metadata).await
    }

    pub async fn submit_partner(
        &self,
        submission: PartnerSubmission,
        metadata: Option<OperationMetadata>,
    ) -> Result<LeadReceipt, LeadError> {
        self.submit(&submission, metadata).await
    }

    /// Validates, composes and delivers one submission
    ///
    /// # Errors
    ///
    /// - `LeadError::MissingFields` when a required field is absent or empty;
    ///   nothing is sent
    /// - `LeadError::Delivery` when the mailer failed on the last attempt
    pub async fn submit<S: LeadSubmission>(
        &self,
        submission: &S,
        metadata: Option<OperationMetadata>,
    ) -> Result<LeadReceipt, LeadError> {
        let kind = S::KIND;
        if let Err(err) = submission.check_required() {
            info!(lead_type = %kind, error = %err, "Rejected incomplete submission");
            return Err(err);
        }

        let reference = kind.new_reference();
        let message = compose(submission, &self.settings, Some(reference.clone()));
        let metadata = metadata
            .unwrap_or_default()
            .with_context("lead_type", kind.as_str())
            .with_context("reference", reference.as_str());
        let reply_domain = submission
            .reply_to()
            .and_then(|address| address.rsplit_once('@'))
            .map(|(_, domain)| domain)
            .unwrap_or("-");

        let mut attempt = 1;
        loop {
            match self.mailer.send(&message, Some(metadata.clone())).await {
                Ok(receipt) => {
                    info!(
                        lead_type = %kind,
                        reference = %reference,
                        reply_domain,
                        mailer = self.mailer.name(),
                        attempt,
                        "Lead notification sent"
                    );
                    return Ok(LeadReceipt {
                        reference,
                        kind,
                        message_id: receipt.message_id,
                        attempts: attempt,
                    });
                }
                Err(err) if err.is_transient() && attempt < self.retry.max_attempts => {
                    attempt += 1;
                    let delay = self.retry.delay_before(attempt);
                    warn!(
                        lead_type = %kind,
                        reference = %reference,
                        error = %err,
                        next_attempt = attempt,
                        delay_ms = delay.as_millis() as u64,
                        "Lead notification failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => {
                    error!(
                        lead_type = %kind,
                        reference = %reference,
                        mailer = self.mailer.name(),
                        attempt,
                        error = %err,
                        "Error sending lead notification"
                    );
                    return Err(LeadError::delivery(attempt, err));
                }
            }
        }
    }
}
