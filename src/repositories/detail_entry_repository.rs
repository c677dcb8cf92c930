use crate::models::detail_entry::{DetailEntry, DetailEntryChanges, EntryFilter, NewDetailEntry};
use crate::utils::errors::{not_found_error, validation_error, AppResult};
use crate::utils::validation::validate_hours;
use chrono::{NaiveDate, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::{debug, info};

/// The detail log store. Built once at start-up and shared through
/// `AppState`.
#[derive(Debug, Clone)]
pub struct DetailEntryRepository {
    pool: SqlitePool,
}

impl DetailEntryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, entry: &NewDetailEntry) -> AppResult<DetailEntry> {
        ensure_valid_hours(entry.hours)?;

        let created = sqlx::query_as::<_, DetailEntry>(
            r#"
            INSERT INTO detail_entries
                (plate, stock_number, detail_type, advisor, location, hours,
                 entry_date, notes, created_at)
            VALUES
                (?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&entry.plate)
        .bind(&entry.stock_number)
        .bind(entry.detail_type)
        .bind(&entry.advisor)
        .bind(entry.location)
        .bind(entry.hours)
        .bind(entry.entry_date)
        .bind(&entry.notes)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        info!("Added entry {} for plate '{}'", created.id, created.plate);
        Ok(created)
    }

    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<DetailEntry>> {
        let entry = sqlx::query_as::<_, DetailEntry>("SELECT * FROM detail_entries WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(entry)
    }

    pub async fn get(&self, id: i64) -> AppResult<DetailEntry> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Detail entry", id))
    }

    /// Entries matching `filter`, newest first. Date ranges are resolved
    /// against `today`.
    ///
    /// Date, type and location narrow the query in SQL. Search and advisor
    /// matching fold case in Rust, since SQLite's `LOWER()` only handles
    /// ASCII, so the limit is applied after them.
    pub async fn list(
        &self,
        filter: &EntryFilter,
        today: NaiveDate,
    ) -> AppResult<Vec<DetailEntry>> {
        let mut query = QueryBuilder::<Sqlite>::new("SELECT * FROM detail_entries WHERE 1 = 1");

        let (start, end) = filter.date_window(today);
        if let Some(start) = start {
            query.push(" AND entry_date >= ").push_bind(start);
        }
        if let Some(end) = end {
            query.push(" AND entry_date <= ").push_bind(end);
        }
        if let Some(detail_type) = filter.detail_type {
            query.push(" AND detail_type = ").push_bind(detail_type);
        }
        if let Some(location) = filter.location {
            query.push(" AND location = ").push_bind(location);
        }
        query.push(" ORDER BY id DESC");

        let rows = query
            .build_query_as::<DetailEntry>()
            .fetch_all(&self.pool)
            .await?;

        let search = filter.search.as_deref().unwrap_or("");
        let advisor = filter.advisor.as_deref().unwrap_or("");
        let limit = filter
            .limit
            .and_then(|limit| usize::try_from(limit).ok())
            .unwrap_or(usize::MAX);

        let entries: Vec<DetailEntry> = rows
            .into_iter()
            .filter(|entry| entry.matches_search(search) && entry.matches_advisor(advisor))
            .take(limit)
            .collect();

        debug!("Listed {} entries for {:?}", entries.len(), filter);
        Ok(entries)
    }

    pub async fn update(&self, id: i64, changes: DetailEntryChanges) -> AppResult<DetailEntry> {
        let mut entry = self.get(id).await?;
        if changes.is_empty() {
            return Ok(entry);
        }

        entry.apply(changes);
        ensure_valid_hours(entry.hours)?;

        let updated = sqlx::query_as::<_, DetailEntry>(
            r#"
            UPDATE detail_entries
            SET plate = ?, stock_number = ?, detail_type = ?, advisor = ?, location = ?,
                hours = ?, entry_date = ?, notes = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(&entry.plate)
        .bind(&entry.stock_number)
        .bind(entry.detail_type)
        .bind(&entry.advisor)
        .bind(entry.location)
        .bind(entry.hours)
        .bind(entry.entry_date)
        .bind(&entry.notes)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| not_found_error("Detail entry", id))?;

        info!("Updated entry {}", id);
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM detail_entries WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found_error("Detail entry", id));
        }

        info!("Deleted entry {}", id);
        Ok(())
    }

    /// Remove every entry, returning how many were deleted
    pub async fn delete_all(&self) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM detail_entries")
            .execute(&self.pool)
            .await?;

        info!("Cleared {} entries", result.rows_affected());
        Ok(result.rows_affected())
    }
}

fn ensure_valid_hours(hours: f64) -> AppResult<()> {
    validate_hours(hours)
        .map_err(|_| validation_error("hours", "Hours must be a number between 0 and 24"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::database::DatabaseConfig;
    use crate::database::create_pool;
    use crate::models::detail_entry::{DateRange, DetailType, Location};
    use crate::utils::errors::AppError;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        date(2024, 5, 15)
    }

    fn new_entry(plate: &str, hours: f64, entry_date: NaiveDate) -> NewDetailEntry {
        NewDetailEntry {
            plate: plate.to_string(),
            stock_number: None,
            detail_type: DetailType::CustomerVehicle,
            advisor: "Jordan".to_string(),
            location: Location::Bay1,
            hours,
            entry_date,
            notes: None,
        }
    }

    async fn repository() -> DetailEntryRepository {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        DetailEntryRepository::new(pool)
    }

    #[tokio::test]
    async fn test_create_then_list_includes_entry() {
        let repo = repository().await;
        let first = repo.create(&new_entry("ABC-123", 1.5, today())).await.unwrap();
        let second = repo.create(&new_entry("XYZ-9", 2.0, today())).await.unwrap();

        assert_ne!(first.id, second.id);
        assert!(second.id > first.id);

        let all = repo.list(&EntryFilter::default(), today()).await.unwrap();
        assert_eq!(all.len(), 2);
        // newest first
        assert_eq!(all[0], second);
        assert_eq!(all[1], first);
    }

    #[tokio::test]
    async fn test_create_rejects_negative_hours() {
        let repo = repository().await;
        let err = repo.create(&new_entry("ABC-123", -1.0, today())).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let all = repo.list(&EntryFilter::default(), today()).await.unwrap();
        assert!(all.is_empty());
    }

    #[tokio::test]
    async fn test_update_changes_only_given_fields() {
        let repo = repository().await;
        let mut entry = new_entry("ABC-123", 1.5, today());
        entry.notes = Some("rear seats".to_string());
        let created = repo.create(&entry).await.unwrap();

        let updated = repo
            .update(
                created.id,
                DetailEntryChanges {
                    hours: Some(3.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.hours, 3.0);
        assert_eq!(DetailEntry { hours: created.hours, ..updated.clone() }, created);
        assert_eq!(repo.get(created.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_update_missing_id_is_not_found() {
        let repo = repository().await;
        let err = repo
            .update(
                99,
                DetailEntryChanges {
                    hours: Some(1.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_rejects_negative_hours() {
        let repo = repository().await;
        let created = repo.create(&new_entry("ABC-123", 1.5, today())).await.unwrap();
        let err = repo
            .update(
                created.id,
                DetailEntryChanges {
                    hours: Some(-2.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(repo.get(created.id).await.unwrap().hours, 1.5);
    }

    #[tokio::test]
    async fn test_delete_one() {
        let repo = repository().await;
        let keep = repo.create(&new_entry("KEEP-1", 1.0, today())).await.unwrap();
        let gone = repo.create(&new_entry("GONE-1", 1.0, today())).await.unwrap();

        repo.delete(gone.id).await.unwrap();

        let all = repo.list(&EntryFilter::default(), today()).await.unwrap();
        assert!(all.iter().all(|e| e.id != gone.id));
        assert_eq!(all, vec![keep]);

        let err = repo.delete(gone.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_all_keeps_ids_increasing() {
        let repo = repository().await;
        repo.create(&new_entry("A1", 1.0, today())).await.unwrap();
        let last = repo.create(&new_entry("A2", 1.0, today())).await.unwrap();

        assert_eq!(repo.delete_all().await.unwrap(), 2);
        assert!(repo.list(&EntryFilter::default(), today()).await.unwrap().is_empty());

        let next = repo.create(&new_entry("A3", 1.0, today())).await.unwrap();
        assert!(next.id > last.id);
    }

    #[tokio::test]
    async fn test_today_excludes_earlier_dates() {
        let repo = repository().await;
        let yesterday = repo
            .create(&new_entry("OLD-1", 1.0, date(2024, 5, 14)))
            .await
            .unwrap();
        let current = repo.create(&new_entry("NEW-1", 1.0, today())).await.unwrap();

        let listed = repo
            .list(&EntryFilter::range(DateRange::Today), today())
            .await
            .unwrap();
        assert_eq!(listed, vec![current]);
        assert!(listed.iter().all(|e| e.id != yesterday.id));
    }

    #[tokio::test]
    async fn test_week_and_month_ranges() {
        let repo = repository().await;
        // Monday of the current week, previous Sunday, first of the month, last month
        let monday = repo.create(&new_entry("W1", 1.0, date(2024, 5, 13))).await.unwrap();
        let sunday = repo.create(&new_entry("W0", 1.0, date(2024, 5, 12))).await.unwrap();
        let first = repo.create(&new_entry("M1", 1.0, date(2024, 5, 1))).await.unwrap();
        repo.create(&new_entry("M0", 1.0, date(2024, 4, 30))).await.unwrap();

        let week = repo
            .list(&EntryFilter::range(DateRange::ThisWeek), today())
            .await
            .unwrap();
        assert_eq!(week, vec![monday.clone()]);

        let month = repo
            .list(&EntryFilter::range(DateRange::ThisMonth), today())
            .await
            .unwrap();
        assert_eq!(month, vec![first, sunday, monday]);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_over_text_fields() {
        let repo = repository().await;
        let mut with_stock = new_entry("ABC-123", 1.0, today());
        with_stock.stock_number = Some("STK-77".to_string());
        let with_stock = repo.create(&with_stock).await.unwrap();

        let mut with_notes = new_entry("QRS-1", 1.0, today());
        with_notes.notes = Some("Pet hair, heavy".to_string());
        let with_notes = repo.create(&with_notes).await.unwrap();

        let by_plate = repo.list(&EntryFilter::search("abc"), today()).await.unwrap();
        assert_eq!(by_plate, vec![with_stock.clone()]);

        let by_stock = repo.list(&EntryFilter::search("stk-7"), today()).await.unwrap();
        assert_eq!(by_stock, vec![with_stock]);

        let by_notes = repo.list(&EntryFilter::search("PET HAIR"), today()).await.unwrap();
        assert_eq!(by_notes, vec![with_notes]);

        let wildcard = repo.list(&EntryFilter::search("%"), today()).await.unwrap();
        assert!(wildcard.is_empty());

        let blank = repo.list(&EntryFilter::search("  "), today()).await.unwrap();
        assert_eq!(blank.len(), 2);
    }

    #[tokio::test]
    async fn test_exact_filters_and_limit() {
        let repo = repository().await;
        let mut demo = new_entry("DEMO-1", 1.0, today());
        demo.detail_type = DetailType::DemoUnit;
        demo.location = Location::PrepArea;
        demo.advisor = "Sam".to_string();
        let demo = repo.create(&demo).await.unwrap();
        repo.create(&new_entry("CUST-1", 1.0, today())).await.unwrap();
        repo.create(&new_entry("CUST-2", 1.0, today())).await.unwrap();

        let filter = EntryFilter {
            detail_type: Some(DetailType::DemoUnit),
            ..Default::default()
        };
        assert_eq!(repo.list(&filter, today()).await.unwrap(), vec![demo.clone()]);

        let filter = EntryFilter {
            location: Some(Location::PrepArea),
            advisor: Some("sam".to_string()),
            ..Default::default()
        };
        assert_eq!(repo.list(&filter, today()).await.unwrap(), vec![demo]);

        let filter = EntryFilter {
            limit: Some(2),
            ..Default::default()
        };
        let recent = repo.list(&filter, today()).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].plate, "CUST-2");
    }

    #[tokio::test]
    async fn test_search_folds_non_ascii_case() {
        let repo = repository().await;
        let mut accented = new_entry("ACC-1", 1.0, today());
        accented.notes = Some("ÉCLAT finish".to_string());
        let accented = repo.create(&accented).await.unwrap();
        repo.create(&new_entry("PLAIN-1", 1.0, today())).await.unwrap();

        for needle in ["ÉCLAT", "éclat", "Éclat FIN"] {
            let found = repo.list(&EntryFilter::search(needle), today()).await.unwrap();
            assert_eq!(found, vec![accented.clone()], "search {:?}", needle);
        }
    }

    #[tokio::test]
    async fn test_limit_applies_after_search() {
        let repo = repository().await;
        let mut older = new_entry("MATCH-1", 1.0, today());
        older.notes = Some("buff".to_string());
        let older = repo.create(&older).await.unwrap();
        repo.create(&new_entry("SKIP-1", 1.0, today())).await.unwrap();
        repo.create(&new_entry("SKIP-2", 1.0, today())).await.unwrap();

        let filter = EntryFilter {
            search: Some("BUFF".to_string()),
            limit: Some(1),
            ..Default::default()
        };
        assert_eq!(repo.list(&filter, today()).await.unwrap(), vec![older]);
    }

    #[tokio::test]
    async fn test_advisor_filter_folds_non_ascii_case() {
        let repo = repository().await;
        let mut entry = new_entry("ADV-1", 1.0, today());
        entry.advisor = "Élodie".to_string();
        let entry = repo.create(&entry).await.unwrap();

        let filter = EntryFilter {
            advisor: Some(" ÉLODIE ".to_string()),
            ..Default::default()
        };
        assert_eq!(repo.list(&filter, today()).await.unwrap(), vec![entry]);
    }

    #[tokio::test]
    async fn test_custom_date_bounds() {
        let repo = repository().await;
        repo.create(&new_entry("D-1", 1.0, date(2024, 5, 1))).await.unwrap();
        let second = repo.create(&new_entry("D-2", 1.0, date(2024, 5, 5))).await.unwrap();
        let third = repo.create(&new_entry("D-3", 1.0, date(2024, 5, 10))).await.unwrap();
        repo.create(&new_entry("D-4", 1.0, date(2024, 5, 11))).await.unwrap();

        let between = EntryFilter {
            from: Some(date(2024, 5, 5)),
            to: Some(date(2024, 5, 10)),
            ..Default::default()
        };
        assert_eq!(
            repo.list(&between, today()).await.unwrap(),
            vec![third.clone(), second]
        );

        let open_ended = EntryFilter {
            from: Some(date(2024, 5, 10)),
            ..Default::default()
        };
        assert_eq!(repo.list(&open_ended, today()).await.unwrap().len(), 2);

        let last_30 = EntryFilter {
            range: DateRange::Last30Days,
            to: Some(date(2024, 5, 10)),
            ..Default::default()
        };
        let listed = repo.list(&last_30, today()).await.unwrap();
        assert_eq!(listed.len(), 3);
        assert_eq!(listed[0], third);
    }

    #[tokio::test]
    async fn test_yesterday_range() {
        let repo = repository().await;
        let yesterday = repo
            .create(&new_entry("Y-1", 1.0, date(2024, 5, 14)))
            .await
            .unwrap();
        repo.create(&new_entry("T-1", 1.0, today())).await.unwrap();
        repo.create(&new_entry("O-1", 1.0, date(2024, 5, 13))).await.unwrap();

        let listed = repo
            .list(&EntryFilter::range(DateRange::Yesterday), today())
            .await
            .unwrap();
        assert_eq!(listed, vec![yesterday]);
    }
}
