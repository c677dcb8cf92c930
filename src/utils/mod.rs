//! Utilities
//!
//! Error handling and validation helpers.

pub mod errors;
pub mod validation;
