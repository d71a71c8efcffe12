//! Contact and partner submissions
//!
//! Both forms post camelCase JSON with Spanish field names. Required fields
//! must be present and non-empty; everything else is relayed as typed. Form
//! values are usually strings, but numbers and booleans are accepted and
//! rendered as text, and `null` or `false` count as absent.

use core_kernel::{LeadId, PartnerRequestId};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::error::LeadError;

/// The two kinds of submission the site accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadKind {
    /// A prospective borrower asking to be contacted
    Contact,
    /// A business asking to become a referral partner
    Partner,
}

impl LeadKind {
    /// Subject line (and heading) of the notification e-mail
    pub fn subject(&self) -> &'static str {
        match self {
            LeadKind::Contact => "Nuevo lead de hipoteca",
            LeadKind::Partner => "Nueva solicitud de partner",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LeadKind::Contact => "contact",
            LeadKind::Partner => "partner",
        }
    }

    /// A fresh, time-ordered reference for one submission
    pub fn new_reference(&self) -> String {
        match self {
            LeadKind::Contact => LeadId::new_v7().to_string(),
            LeadKind::Partner => PartnerRequestId::new_v7().to_string(),
        }
    }
}

impl std::fmt::Display for LeadKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Behaviour shared by every submission shape
pub trait LeadSubmission: Validate + Send + Sync {
    const KIND: LeadKind;

    /// Submitter address used as the reply-to of the notification
    fn reply_to(&self) -> Option<&str>;

    /// Labelled values in the order they appear in the notification
    fn labelled_fields(&self) -> Vec<(&'static str, &str)>;

    /// Checks that every required field is present and non-empty
    fn check_required(&self) -> Result<(), LeadError> {
        self.validate().map_err(|errors| {
            LeadError::missing_fields(errors.field_errors().keys().map(|field| field.to_string()))
        })
    }
}

/// Mortgage lead from the contact form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ContactSubmission {
    #[serde(rename = "nombre", deserialize_with = "lenient_text")]
    #[validate(required, length(min = 1))]
    pub name: Option<String>,

    #[serde(deserialize_with = "lenient_text")]
    #[validate(required, length(min = 1))]
    pub email: Option<String>,

    #[serde(rename = "telefono", deserialize_with = "lenient_text")]
    #[validate(required, length(min = 1))]
    pub phone: Option<String>,

    /// Employed, self-employed, ...
    #[serde(rename = "situacionLaboral", deserialize_with = "lenient_text")]
    pub employment_status: Option<String>,

    #[serde(rename = "precioVivienda", deserialize_with = "lenient_text")]
    pub home_price: Option<String>,

    #[serde(rename = "ahorros", deserialize_with = "lenient_text")]
    pub savings: Option<String>,

    #[serde(rename = "ciudad", deserialize_with = "lenient_text")]
    pub city: Option<String>,
}

impl LeadSubmission for ContactSubmission {
    const KIND: LeadKind = LeadKind::Contact;

    fn reply_to(&self) -> Option<&str> {
        self.email.as_deref()
    }

    fn labelled_fields(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("Nombre", text(&self.name)),
            ("Email", text(&self.email)),
            ("Teléfono", text(&self.phone)),
            ("Situación laboral", text(&self.employment_status)),
            ("Precio vivienda", text(&self.home_price)),
            ("Ahorros", text(&self.savings)),
            ("Ciudad", text(&self.city)),
        ]
    }
}

/// Partnership request from the partners page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PartnerSubmission {
    #[serde(rename = "nombre", deserialize_with = "lenient_text")]
    #[validate(required, length(min = 1))]
    pub name: Option<String>,

    /// Real-estate agency, financial advisor, ...
    #[serde(rename = "tipoNegocio", deserialize_with = "lenient_text")]
    #[validate(required, length(min = 1))]
    pub business_type: Option<String>,

    #[serde(deserialize_with = "lenient_text")]
    #[validate(required, length(min = 1))]
    pub email: Option<String>,

    #[serde(rename = "telefono", deserialize_with = "lenient_text")]
    pub phone: Option<String>,
}

impl LeadSubmission for PartnerSubmission {
    const KIND: LeadKind = LeadKind::Partner;

    fn reply_to(&self) -> Option<&str> {
        self.email.as_deref()
    }

    fn labelled_fields(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("Nombre", text(&self.name)),
            ("Tipo de negocio", text(&self.business_type)),
            ("Email", text(&self.email)),
            ("Teléfono", text(&self.phone)),
        ]
    }
}

fn text(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

/// Accepts any JSON scalar as text
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) => Some(s),
        Value::Bool(true) => Some("true".to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    })
}
