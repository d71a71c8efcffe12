//! Lead Intake Domain
//!
//! Takes in the two forms the website publishes and relays each one to the
//! brokerage by e-mail:
//!
//! - **Contact**: a prospective borrower (`nombre`, `email`, `telefono`
//!   required; employment, home price, savings and city optional)
//! - **Partner**: a business offering referrals (`nombre`, `tipoNegocio`,
//!   `email` required; phone optional)
//!
//! Delivery goes through [`MailerPort`], so the SMTP relay can be swapped
//! for a logging or in-memory mailer.
//!
//! # Examples
//!
//! ```rust
//! use domain_lead::{compose, ContactSubmission, LeadSubmission, NotificationSettings};
//!
//! let submission: ContactSubmission = serde_json::from_str(
//!     r#"{"nombre":"Ana","email":"ana@example.com","telefono":"600111222"}"#,
//! ).unwrap();
//! assert!(submission.check_required().is_ok());
//!
//! let settings = NotificationSettings::new("avisos@example.com", "leads@example.com");
//! let message = compose(&submission, &settings, None);
//! assert_eq!(message.subject, "Nuevo lead de hipoteca");
//! assert_eq!(message.reply_to.as_deref(), Some("ana@example.com"));
//! ```

pub mod adapters;
pub mod error;
pub mod notification;
pub mod ports;
pub mod service;
pub mod submission;

pub use adapters::{LoggingMailer, SmtpConfig, SmtpMailer, SmtpTls};
pub use error::{LeadError, DELIVERY_FAILED_MESSAGE, MISSING_FIELDS_MESSAGE};
pub use notification::{compose, escape_html, EmailMessage, Mailbox, NotificationSettings, BRAND_NAME};
pub use ports::{DeliveryReceipt, MailerPort};
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::{InMemoryMailer, InjectedFailure};
pub use service::{LeadIntakeService, LeadReceipt, RetryPolicy};
pub use submission::{ContactSubmission, LeadKind, LeadSubmission, PartnerSubmission};
