//! Request/response data transfer objects
//!
//! Lead submissions are deserialized straight into the domain types.

pub mod mortgage;
