//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! mortgage brokerage test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built loans, submissions and reference months
//! - `builders`: Builder patterns for test data construction
//! - `assertions`: Float and schedule assertion helpers
//! - `generators`: Property-based strategies and fake submissions

pub mod fixtures;
pub mod builders;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use assertions::*;
pub use generators::*;
