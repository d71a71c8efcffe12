//! Core Kernel - Foundational types and utilities for the mortgage brokerage system
//!
//! This crate provides the building blocks shared by the domain modules:
//! - Calendar months, year/month values and injectable clocks
//! - Lenient parsing of localized (es-ES) numeric text and display formatting
//! - Common identifiers, port errors and adapter health types

pub mod locale;
pub mod temporal;
pub mod identifiers;
pub mod ports;
pub mod error;

pub use locale::{
    format_rate_percent, format_rounded_amount, parse_leading_integer,
    parse_localized_decimal, try_parse_leading_integer, try_parse_localized_decimal,
};
pub use temporal::{Clock, FixedClock, Month, SystemClock, TemporalError, Timezone, YearMonth};
pub use identifiers::{LeadId, PartnerRequestId};
pub use ports::{
    AdapterHealth, DomainPort, HealthCheckResult, HealthCheckable, OperationMetadata, PortError,
};
pub use error::CoreError;
