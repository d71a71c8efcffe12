//! Request handlers

pub mod health;
pub mod lead;
pub mod mortgage;
