//! Mailer adapters
//!
//! - **SmtpMailer**: relays through an SMTP server over `lettre`
//! - **LoggingMailer**: logs the message instead of sending it
//! - **InMemoryMailer**: records messages for tests (re-exported from the
//!   ports module behind the `mock` feature)

pub mod logging;
pub mod smtp;

pub use logging::LoggingMailer;
pub use smtp::{SmtpConfig, SmtpMailer, SmtpTls};
