//! Notification e-mails
//!
//! Every accepted submission becomes one HTML e-mail to the brokerage's
//! inbox. The submitter is set as reply-to so staff can answer directly.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::submission::LeadSubmission;

/// Display name used as sender and in the e-mail footer
pub const BRAND_NAME: &str = "FinanciacionHipotecaria.com";

/// An address with an optional display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mailbox {
    pub name: Option<String>,
    pub address: String,
}

impl Mailbox {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            name: None,
            address: address.into(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl fmt::Display for Mailbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            // Names with RFC 5322 specials (the brand has a '.') are quoted
            Some(name) if name.chars().any(|c| "()<>[]:;@\\,.\"".contains(c)) => {
                let quoted = name.replace('\\', "\\\\").replace('"', "\\\"");
                write!(f, "\"{}\" <{}>", quoted, self.address)
            }
            Some(name) => write!(f, "{} <{}>", name, self.address),
            None => f.write_str(&self.address),
        }
    }
}

/// Where notifications come from and go to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationSettings {
    /// Sender address; the SMTP user when no dedicated address is configured
    pub from_address: String,
    /// Inbox receiving the notifications
    pub recipients: Vec<String>,
}

impl NotificationSettings {
    /// `recipients` may hold several comma-separated addresses
    pub fn new(from_address: impl Into<String>, recipients: &str) -> Self {
        Self {
            from_address: from_address.into(),
            recipients: recipients
                .split(',')
                .map(str::trim)
                .filter(|address| !address.is_empty())
                .map(String::from)
                .collect(),
        }
    }

    pub fn sender(&self) -> Mailbox {
        Mailbox::new(&self.from_address).with_name(BRAND_NAME)
    }
}

/// A composed e-mail, ready for any mailer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailMessage {
    pub from: Mailbox,
    pub to: Vec<String>,
    pub reply_to: Option<String>,
    pub subject: String,
    pub html_body: String,
    /// Correlates the e-mail with the submission's log lines
    pub reference: Option<String>,
}

/// Builds the notification for a submission
pub fn compose<S: LeadSubmission>(
    submission: &S,
    settings: &NotificationSettings,
    reference: Option<String>,
) -> EmailMessage {
    let subject = S::KIND.subject();
    EmailMessage {
        from: settings.sender(),
        to: settings.recipients.clone(),
        reply_to: submission.reply_to().map(String::from),
        subject: subject.to_string(),
        html_body: render_html(subject, &submission.labelled_fields()),
        reference,
    }
}

/// Heading, one paragraph per field, brand footer
pub fn render_html(heading: &str, fields: &[(&str, &str)]) -> String {
    let mut html = format!("<h2>{}</h2>\n", escape_html(heading));
    for (label, value) in fields {
        html.push_str(&format!(
            "<p><strong>{}:</strong> {}</p>\n",
            escape_html(label),
            escape_html(value)
        ));
    }
    html.push_str(&format!("<p>{BRAND_NAME}</p>\n"));
    html
}

/// Escapes text for use inside HTML elements and attributes
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
