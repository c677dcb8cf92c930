use crate::dto::api_response::ApiResponse;
use crate::dto::detail_entry_dto::{
    ClearedResponse, CreateDetailEntryRequest, DeletedResponse, EntryQuery, OptionsResponse,
    UpdateDetailEntryRequest,
};
use crate::models::detail_entry::{
    DateRange, DetailEntry, DetailEntryChanges, DetailType, EntryFilter, Location, NewDetailEntry,
};
use crate::repositories::detail_entry_repository::DetailEntryRepository;
use crate::services::export_service;
use crate::services::summary_service::{self, EntrySummary};
use crate::utils::errors::{add_field_error, bad_request_error, AppError, AppResult};
use crate::utils::validation::{
    normalize_optional, normalize_plate, validate_date, validate_hours, validate_plate,
};
use chrono::NaiveDate;
use std::str::FromStr;
use strum::IntoEnumIterator;
use validator::{Validate, ValidationErrors};

const PLATE_MESSAGE: &str =
    "License plate must be empty or 2-10 letters, numbers, spaces and hyphens";
const HOURS_MESSAGE: &str = "Hours must be a number between 0 and 24";
const DATE_MESSAGE: &str = "Date must be a valid calendar date in YYYY-MM-DD format";

pub struct DetailEntryController {
    repository: DetailEntryRepository,
}

impl DetailEntryController {
    pub fn new(repository: DetailEntryRepository) -> Self {
        Self { repository }
    }

    pub async fn create(
        &self,
        request: CreateDetailEntryRequest,
        today: NaiveDate,
    ) -> AppResult<ApiResponse<DetailEntry>> {
        let entry = parse_new_entry(request, today)?;
        let created = self.repository.create(&entry).await?;

        let label = if created.plate.is_empty() {
            format!("entry #{}", created.id)
        } else {
            created.plate.clone()
        };
        Ok(ApiResponse::success_with_message(
            created,
            format!("Entry added for {}", label),
        ))
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<DetailEntry> {
        self.repository.get(id).await
    }

    pub async fn list(&self, query: EntryQuery, today: NaiveDate) -> AppResult<Vec<DetailEntry>> {
        let filter = parse_filter(query)?;
        self.repository.list(&filter, today).await
    }

    pub async fn update(
        &self,
        id: i64,
        request: UpdateDetailEntryRequest,
    ) -> AppResult<ApiResponse<DetailEntry>> {
        let changes = parse_changes(request)?;
        let updated = self.repository.update(id, changes).await?;
        Ok(ApiResponse::success_with_message(
            updated,
            format!("Entry {} updated", id),
        ))
    }

    pub async fn delete(&self, id: i64) -> AppResult<ApiResponse<DeletedResponse>> {
        self.repository.delete(id).await?;
        Ok(ApiResponse::success_with_message(
            DeletedResponse { id },
            format!("Entry {} deleted", id),
        ))
    }

    pub async fn delete_all(&self) -> AppResult<ApiResponse<ClearedResponse>> {
        let deleted = self.repository.delete_all().await?;
        Ok(ApiResponse::success_with_message(
            ClearedResponse { deleted },
            format!("Cleared {} entries", deleted),
        ))
    }

    pub async fn summary(&self, query: EntryQuery, today: NaiveDate) -> AppResult<EntrySummary> {
        let entries = self.list(query, today).await?;
        Ok(summary_service::aggregate(&entries))
    }

    pub async fn export(&self, query: EntryQuery, today: NaiveDate) -> AppResult<String> {
        let entries = self.list(query, today).await?;
        Ok(export_service::export_csv(&entries))
    }

    pub fn options() -> OptionsResponse {
        OptionsResponse {
            detail_types: DetailType::iter().map(|t| t.to_string()).collect(),
            locations: Location::iter().map(|l| l.to_string()).collect(),
            date_ranges: DateRange::iter().map(|r| r.to_string()).collect(),
        }
    }
}

/// Validate a create request into a storable entry, reporting every bad
/// field at once. Text fields are trimmed before their lengths are checked.
pub fn parse_new_entry(
    mut request: CreateDetailEntryRequest,
    today: NaiveDate,
) -> AppResult<NewDetailEntry> {
    request.advisor = request.advisor.trim().to_string();
    request.stock_number = normalize_optional(request.stock_number);
    request.notes = normalize_optional(request.notes);

    let mut errors = request.validate().err().unwrap_or_else(ValidationErrors::new);

    let plate = normalize_plate(&request.plate);
    if validate_plate(&plate).is_err() {
        add_field_error(&mut errors, "plate", PLATE_MESSAGE);
    }

    let detail_type = DetailType::from_str(request.detail_type.trim());
    if detail_type.is_err() {
        let message = unknown_choice("detail type", &request.detail_type);
        add_field_error(&mut errors, "detail_type", message);
    }

    let location = Location::from_str(request.location.trim());
    if location.is_err() {
        let message = unknown_choice("location", &request.location);
        add_field_error(&mut errors, "location", message);
    }

    if validate_hours(request.hours).is_err() {
        add_field_error(&mut errors, "hours", HOURS_MESSAGE);
    }

    let entry_date = match request.entry_date.as_deref() {
        None => Ok(today),
        Some(value) => validate_date(value),
    };
    if entry_date.is_err() {
        add_field_error(&mut errors, "entry_date", DATE_MESSAGE);
    }

    match (detail_type, location, entry_date) {
        (Ok(detail_type), Ok(location), Ok(entry_date)) if errors.errors().is_empty() => {
            Ok(NewDetailEntry {
                plate,
                stock_number: request.stock_number,
                detail_type,
                advisor: request.advisor,
                location,
                hours: request.hours,
                entry_date,
                notes: request.notes,
            })
        }
        _ => Err(AppError::Validation(errors)),
    }
}

/// Validate an update request into a change set. An empty stock number or
/// notes value clears the field.
pub fn parse_changes(mut request: UpdateDetailEntryRequest) -> AppResult<DetailEntryChanges> {
    request.advisor = request.advisor.map(|advisor| advisor.trim().to_string());
    request.stock_number = request.stock_number.map(|stock| stock.trim().to_string());
    request.notes = request.notes.map(|notes| notes.trim().to_string());

    let mut errors = request.validate().err().unwrap_or_else(ValidationErrors::new);
    let mut changes = DetailEntryChanges::default();

    if let Some(plate) = request.plate {
        let plate = normalize_plate(&plate);
        match validate_plate(&plate) {
            Ok(()) => changes.plate = Some(plate),
            Err(_) => add_field_error(&mut errors, "plate", PLATE_MESSAGE),
        }
    }

    if let Some(value) = request.detail_type {
        match DetailType::from_str(value.trim()) {
            Ok(detail_type) => changes.detail_type = Some(detail_type),
            Err(_) => {
                let message = unknown_choice("detail type", &value);
                add_field_error(&mut errors, "detail_type", message)
            }
        }
    }

    if let Some(value) = request.location {
        match Location::from_str(value.trim()) {
            Ok(location) => changes.location = Some(location),
            Err(_) => {
                let message = unknown_choice("location", &value);
                add_field_error(&mut errors, "location", message)
            }
        }
    }

    if let Some(hours) = request.hours {
        match validate_hours(hours) {
            Ok(()) => changes.hours = Some(hours),
            Err(_) => add_field_error(&mut errors, "hours", HOURS_MESSAGE),
        }
    }

    if let Some(value) = request.entry_date {
        match validate_date(&value) {
            Ok(entry_date) => changes.entry_date = Some(entry_date),
            Err(_) => add_field_error(&mut errors, "entry_date", DATE_MESSAGE),
        }
    }

    changes.advisor = request.advisor;
    if let Some(stock_number) = request.stock_number {
        changes.stock_number = Some(normalize_optional(Some(stock_number)));
    }
    if let Some(notes) = request.notes {
        changes.notes = Some(normalize_optional(Some(notes)));
    }

    if errors.errors().is_empty() {
        Ok(changes)
    } else {
        Err(AppError::Validation(errors))
    }
}

/// Turn query-string parameters into a typed filter
pub fn parse_filter(query: EntryQuery) -> AppResult<EntryFilter> {
    let range = match query.range.as_deref().map(str::trim).filter(|r| !r.is_empty()) {
        Some(value) => DateRange::from_str(value)
            .map_err(|_| bad_request_error(&format!("Unknown date range '{}'", value)))?,
        None => DateRange::All,
    };

    let from = parse_query_date("from", query.from.as_deref())?;
    let to = parse_query_date("to", query.to.as_deref())?;

    let detail_type = match non_blank(query.detail_type.as_deref()) {
        Some(value) => Some(
            DetailType::from_str(value)
                .map_err(|_| bad_request_error(&unknown_choice("detail type", value)))?,
        ),
        None => None,
    };

    let location = match non_blank(query.location.as_deref()) {
        Some(value) => Some(
            Location::from_str(value)
                .map_err(|_| bad_request_error(&unknown_choice("location", value)))?,
        ),
        None => None,
    };

    if let Some(limit) = query.limit {
        if limit <= 0 {
            return Err(bad_request_error("limit must be a positive number"));
        }
    }

    Ok(EntryFilter {
        range,
        from,
        to,
        search: query.search,
        detail_type,
        location,
        advisor: query.advisor,
        limit: query.limit,
    })
}

fn parse_query_date(name: &str, value: Option<&str>) -> AppResult<Option<NaiveDate>> {
    match non_blank(value) {
        Some(value) => validate_date(value).map(Some).map_err(|_| {
            bad_request_error(&format!("'{}' must be a date in YYYY-MM-DD format", name))
        }),
        None => Ok(None),
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn unknown_choice(kind: &str, value: &str) -> String {
    format!("Unknown {} '{}'", kind, value.trim())
}
