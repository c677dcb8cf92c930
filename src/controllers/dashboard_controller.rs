use crate::models::detail_entry::EntryFilter;
use crate::repositories::detail_entry_repository::DetailEntryRepository;
use crate::services::summary_service::{self, Dashboard};
use crate::utils::errors::AppResult;
use chrono::NaiveDate;

pub struct DashboardController {
    repository: DetailEntryRepository,
}

impl DashboardController {
    pub fn new(repository: DetailEntryRepository) -> Self {
        Self { repository }
    }

    /// Figures over the whole log
    pub async fn dashboard(&self, today: NaiveDate) -> AppResult<Dashboard> {
        let entries = self.repository.list(&EntryFilter::default(), today).await?;
        Ok(summary_service::dashboard(&entries, today))
    }
}
