//! API configuration
//!
//! Read from the process environment (after `.env` is loaded) using the
//! variable names the deployment already sets: `PORT`, `SMTP_HOST`,
//! `SMTP_USER`, `EMAIL_TO`, ...

use std::time::Duration;

use core_kernel::{TemporalError, Timezone};
use domain_lead::{NotificationSettings, RetryPolicy, SmtpConfig, SmtpTls};
use serde::Deserialize;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// SMTP relay; notifications are only logged when unset
    pub smtp_host: Option<String>,
    pub smtp_port: u16,
    pub smtp_user: Option<String>,
    pub smtp_pass: Option<String>,
    /// `true` selects implicit TLS; otherwise STARTTLS is used when offered
    pub smtp_secure: Option<String>,
    /// Sender address, defaults to `smtp_user`
    pub email_from: Option<String>,
    /// Inbox receiving the notifications, comma-separated
    pub email_to: Option<String>,
    /// Log level
    pub log_level: String,
    pub log_format: LogFormat,
    /// Delivery attempts per notification, 1 = no retry; more than 1 may
    /// deliver a notification twice when the relay's answer is lost
    pub mail_retry_attempts: u32,
    pub mail_retry_backoff_ms: u64,
    pub mail_timeout_secs: u64,
    /// IANA timezone deciding which month "today" is
    pub timezone: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            smtp_host: None,
            smtp_port: 2525,
            smtp_user: None,
            smtp_pass: None,
            smtp_secure: None,
            email_from: None,
            email_to: None,
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            mail_retry_attempts: 1,
            mail_retry_backoff_ms: 500,
            mail_timeout_secs: 30,
            timezone: "Europe/Madrid".to_string(),
        }
    }
}

impl ApiConfig {
    /// Loads configuration from the process environment
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::load(config::Environment::default())
    }

    /// Loads configuration from an environment source, filling in defaults
    pub fn load(environment: config::Environment) -> Result<Self, config::ConfigError> {
        let defaults = Self::default();
        config::Config::builder()
            .set_default("host", defaults.host)?
            .set_default("port", i64::from(defaults.port))?
            .set_default("smtp_port", i64::from(defaults.smtp_port))?
            .set_default("log_level", defaults.log_level)?
            .set_default("log_format", "pretty")?
            .set_default("mail_retry_attempts", i64::from(defaults.mail_retry_attempts))?
            .set_default("mail_retry_backoff_ms", defaults.mail_retry_backoff_ms as i64)?
            .set_default("mail_timeout_secs", defaults.mail_timeout_secs as i64)?
            .set_default("timezone", defaults.timezone)?
            // Values stay strings so numeric passwords keep their leading zeros
            .add_source(environment)
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// SMTP settings, when a relay host is configured
    pub fn smtp_config(&self) -> Option<SmtpConfig> {
        let host = non_empty(&self.smtp_host)?;
        Some(SmtpConfig {
            host: host.to_string(),
            port: self.smtp_port,
            username: non_empty(&self.smtp_user).map(String::from),
            password: non_empty(&self.smtp_pass).map(String::from),
            tls: self.smtp_tls(),
            timeout: Duration::from_secs(self.mail_timeout_secs),
            ..Default::default()
        })
    }

    pub fn smtp_tls(&self) -> SmtpTls {
        match non_empty(&self.smtp_secure) {
            Some(secure) if secure.eq_ignore_ascii_case("true") => SmtpTls::Wrapper,
            _ => SmtpTls::Opportunistic,
        }
    }

    /// Sender and recipients of lead notifications
    pub fn notification_settings(&self) -> NotificationSettings {
        let from = non_empty(&self.email_from)
            .or_else(|| non_empty(&self.smtp_user))
            .unwrap_or_default();
        NotificationSettings::new(from, non_empty(&self.email_to).unwrap_or_default())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.mail_retry_attempts,
            Duration::from_millis(self.mail_retry_backoff_ms),
        )
    }

    pub fn timezone(&self) -> Result<Timezone, TemporalError> {
        Timezone::from_name(&self.timezone)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
