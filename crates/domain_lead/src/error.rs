//! Lead intake errors
//!
//! Two outcomes are visible to a submitter: a form that is missing required
//! fields, and a notification that could not be delivered. Their public
//! messages are fixed; the details stay in the logs.

use core_kernel::PortError;
use thiserror::Error;

/// Message shown when required fields are missing
pub const MISSING_FIELDS_MESSAGE: &str = "Faltan campos obligatorios.";

/// Message shown when the notification could not be sent
pub const DELIVERY_FAILED_MESSAGE: &str = "Error enviando email.";

/// Errors that can occur while taking in a lead
#[derive(Debug, Error)]
pub enum LeadError {
    /// One or more required fields are absent or empty
    #[error("Missing required fields: {}", fields.join(", "))]
    MissingFields { fields: Vec<String> },

    /// The notification e-mail could not be delivered
    #[error("Notification delivery failed after {attempts} attempt(s): {source}")]
    Delivery {
        attempts: u32,
        #[source]
        source: PortError,
    },
}

impl LeadError {
    /// Creates a MissingFields error, sorting the field names
    pub fn missing_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        fields.sort();
        fields.dedup();
        LeadError::MissingFields { fields }
    }

    /// Creates a Delivery error
    pub fn delivery(attempts: u32, source: PortError) -> Self {
        LeadError::Delivery { attempts, source }
    }

    /// True when the submitter can fix the problem by correcting the form
    pub fn is_client_error(&self) -> bool {
        matches!(self, LeadError::MissingFields { .. })
    }

    /// The message returned to the submitter
    pub fn public_message(&self) -> &'static str {
        match self {
            LeadError::MissingFields { .. } => MISSING_FIELDS_MESSAGE,
            LeadError::Delivery { .. } => DELIVERY_FAILED_MESSAGE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_are_sorted_and_unique() {
        let err = LeadError::missing_fields(["telefono", "email", "telefono"]);
        match &err {
            LeadError::MissingFields { fields } => assert_eq!(fields, &["email", "telefono"]),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.to_string(), "Missing required fields: email, telefono");
        assert!(err.is_client_error());
        assert_eq!(err.public_message(), MISSING_FIELDS_MESSAGE);
    }

    #[test]
    fn test_delivery_error_hides_details_from_submitter() {
        let err = LeadError::delivery(2, PortError::connection("connection refused"));
        assert!(!err.is_client_error());
        assert_eq!(err.public_message(), DELIVERY_FAILED_MESSAGE);
        assert!(err.to_string().contains("2 attempt(s)"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
