//! Detail entry model
//!
//! One record per serviced vehicle, plus the fixed enumerations and the
//! typed filter used to query the log.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Kind of detail job
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type, Display, EnumString,
    EnumIter, AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum DetailType {
    #[serde(rename = "New Delivery")]
    #[sqlx(rename = "New Delivery")]
    #[strum(to_string = "New Delivery", serialize = "new_delivery")]
    NewDelivery,

    #[serde(rename = "CPO/Used")]
    #[sqlx(rename = "CPO/Used")]
    #[strum(to_string = "CPO/Used", serialize = "cpo_used")]
    CpoUsed,

    #[serde(rename = "Customer Vehicle")]
    #[sqlx(rename = "Customer Vehicle")]
    #[strum(to_string = "Customer Vehicle", serialize = "customer_vehicle")]
    CustomerVehicle,

    #[serde(rename = "Showroom Car")]
    #[sqlx(rename = "Showroom Car")]
    #[strum(to_string = "Showroom Car", serialize = "showroom_car")]
    ShowroomCar,

    #[serde(rename = "Demo Unit")]
    #[sqlx(rename = "Demo Unit")]
    #[strum(to_string = "Demo Unit", serialize = "demo_unit")]
    DemoUnit,

    #[serde(rename = "Other")]
    #[sqlx(rename = "Other")]
    #[strum(to_string = "Other", serialize = "other")]
    Other,
}

/// Bay or work area where the job was done
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type, Display, EnumString,
    EnumIter, AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Location {
    #[serde(rename = "Bay 1")]
    #[sqlx(rename = "Bay 1")]
    #[strum(to_string = "Bay 1", serialize = "bay_1")]
    Bay1,

    #[serde(rename = "Bay 2")]
    #[sqlx(rename = "Bay 2")]
    #[strum(to_string = "Bay 2", serialize = "bay_2")]
    Bay2,

    #[serde(rename = "Bay 3")]
    #[sqlx(rename = "Bay 3")]
    #[strum(to_string = "Bay 3", serialize = "bay_3")]
    Bay3,

    #[serde(rename = "Bay 4")]
    #[sqlx(rename = "Bay 4")]
    #[strum(to_string = "Bay 4", serialize = "bay_4")]
    Bay4,

    #[serde(rename = "Outside Area")]
    #[sqlx(rename = "Outside Area")]
    #[strum(to_string = "Outside Area", serialize = "outside_area")]
    OutsideArea,

    #[serde(rename = "Prep Area")]
    #[sqlx(rename = "Prep Area")]
    #[strum(to_string = "Prep Area", serialize = "prep_area")]
    PrepArea,

    #[serde(rename = "Detail Shop")]
    #[sqlx(rename = "Detail Shop")]
    #[strum(to_string = "Detail Shop", serialize = "detail_shop")]
    DetailShop,

    #[serde(rename = "Other")]
    #[sqlx(rename = "Other")]
    #[strum(to_string = "Other", serialize = "other")]
    Other,
}

/// Stored detail entry - maps to the `detail_entries` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct DetailEntry {
    pub id: i64,
    pub plate: String,
    pub stock_number: Option<String>,
    pub detail_type: DetailType,
    pub advisor: String,
    pub location: Location,
    pub hours: f64,
    pub entry_date: NaiveDate,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A validated entry that has not been stored yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewDetailEntry {
    pub plate: String,
    pub stock_number: Option<String>,
    pub detail_type: DetailType,
    pub advisor: String,
    pub location: Location,
    pub hours: f64,
    pub entry_date: NaiveDate,
    pub notes: Option<String>,
}

/// Validated partial update. `None` leaves a field untouched; for the
/// optional text fields `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailEntryChanges {
    pub plate: Option<String>,
    pub stock_number: Option<Option<String>>,
    pub detail_type: Option<DetailType>,
    pub advisor: Option<String>,
    pub location: Option<Location>,
    pub hours: Option<f64>,
    pub entry_date: Option<NaiveDate>,
    pub notes: Option<Option<String>>,
}

impl DetailEntryChanges {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl DetailEntry {
    /// Overwrite the given fields; id and created_at never change
    pub fn apply(&mut self, changes: DetailEntryChanges) {
        if let Some(plate) = changes.plate {
            self.plate = plate;
        }
        if let Some(stock_number) = changes.stock_number {
            self.stock_number = stock_number;
        }
        if let Some(detail_type) = changes.detail_type {
            self.detail_type = detail_type;
        }
        if let Some(advisor) = changes.advisor {
            self.advisor = advisor;
        }
        if let Some(location) = changes.location {
            self.location = location;
        }
        if let Some(hours) = changes.hours {
            self.hours = hours;
        }
        if let Some(entry_date) = changes.entry_date {
            self.entry_date = entry_date;
        }
        if let Some(notes) = changes.notes {
            self.notes = notes;
        }
    }

    /// Case-insensitive substring match over plate, stock number and notes
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [
            Some(self.plate.as_str()),
            self.stock_number.as_deref(),
            self.notes.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
    }

    /// Advisor equality ignoring case and surrounding whitespace; a blank
    /// name matches every entry
    pub fn matches_advisor(&self, advisor: &str) -> bool {
        let advisor = advisor_key(advisor);
        advisor.is_empty() || advisor_key(&self.advisor) == advisor
    }
}

/// Grouping key for advisor names: trimmed and lower-cased
pub fn advisor_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Named date window for the log view
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
    EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum DateRange {
    #[default]
    #[serde(rename = "all")]
    #[strum(serialize = "all")]
    All,

    #[serde(rename = "today")]
    #[strum(serialize = "today")]
    Today,

    #[serde(rename = "yesterday")]
    #[strum(serialize = "yesterday")]
    Yesterday,

    #[serde(rename = "this_week")]
    #[strum(serialize = "this_week")]
    ThisWeek,

    #[serde(rename = "this_month")]
    #[strum(serialize = "this_month")]
    ThisMonth,

    #[serde(rename = "last_7_days")]
    #[strum(serialize = "last_7_days")]
    Last7Days,

    #[serde(rename = "last_30_days")]
    #[strum(serialize = "last_30_days")]
    Last30Days,
}

impl DateRange {
    /// Inclusive `(start, end)` bounds relative to `today`, `None` for `All`.
    /// Weeks start on Monday.
    pub fn bounds(self, today: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
        match self {
            DateRange::All => None,
            DateRange::Today => Some((today, today)),
            DateRange::Yesterday => {
                let yesterday = today - Duration::days(1);
                Some((yesterday, yesterday))
            }
            DateRange::ThisWeek => {
                let weekday = today.weekday().num_days_from_monday();
                let start = today - Duration::days(i64::from(weekday));
                Some((start, start + Duration::days(6)))
            }
            DateRange::ThisMonth => {
                let start = today.with_day(1)?;
                let next_month = if start.month() == 12 {
                    NaiveDate::from_ymd_opt(start.year() + 1, 1, 1)?
                } else {
                    NaiveDate::from_ymd_opt(start.year(), start.month() + 1, 1)?
                };
                Some((start, next_month - Duration::days(1)))
            }
            DateRange::Last7Days => Some((today - Duration::days(6), today)),
            DateRange::Last30Days => Some((today - Duration::days(29), today)),
        }
    }
}

/// Typed query over the log. The default matches every entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryFilter {
    pub range: DateRange,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub search: Option<String>,
    pub detail_type: Option<DetailType>,
    pub location: Option<Location>,
    pub advisor: Option<String>,
    pub limit: Option<i64>,
}

impl EntryFilter {
    pub fn range(range: DateRange) -> Self {
        Self {
            range,
            ..Default::default()
        }
    }

    pub fn search(search: impl Into<String>) -> Self {
        Self {
            search: Some(search.into()),
            ..Default::default()
        }
    }

    /// Effective inclusive date window: the named range intersected with
    /// the custom `from`/`to` bounds
    pub fn date_window(&self, today: NaiveDate) -> (Option<NaiveDate>, Option<NaiveDate>) {
        let (mut start, mut end) = match self.range.bounds(today) {
            Some((start, end)) => (Some(start), Some(end)),
            None => (None, None),
        };
        if let Some(from) = self.from {
            start = Some(start.map_or(from, |s| s.max(from)));
        }
        if let Some(to) = self.to {
            end = Some(end.map_or(to, |e| e.min(to)));
        }
        (start, end)
    }
}
