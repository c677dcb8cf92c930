//! Detail tracker
//!
//! Time tracking for vehicle detailing: a SQLite-backed log of detail jobs
//! with filtering, CSV export and dashboard summaries, served over a JSON API.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

pub use routes::create_router;
pub use state::AppState;
