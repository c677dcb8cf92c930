//! Shared application state
//!
//! The detail log store and configuration, built once at start-up and
//! handed to every handler through the axum router.

use crate::config::environment::EnvironmentConfig;
use crate::repositories::detail_entry_repository::DetailEntryRepository;
use chrono::{Local, NaiveDate};
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct AppState {
    pub entries: DetailEntryRepository,
    pub config: EnvironmentConfig,
    fixed_today: Option<NaiveDate>,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: EnvironmentConfig) -> Self {
        Self {
            entries: DetailEntryRepository::new(pool),
            config,
            fixed_today: None,
        }
    }

    /// Pin the calendar date used for "today" ranges
    pub fn with_fixed_today(mut self, today: NaiveDate) -> Self {
        self.fixed_today = Some(today);
        self
    }

    /// Current date in the server's local timezone
    pub fn today(&self) -> NaiveDate {
        self.fixed_today
            .unwrap_or_else(|| Local::now().date_naive())
    }
}
