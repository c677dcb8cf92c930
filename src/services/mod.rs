//! Services module
//!
//! Pure computations over entries that sit between the store and the
//! handlers: dashboard aggregates and CSV export.

pub mod export_service;
pub mod summary_service;
