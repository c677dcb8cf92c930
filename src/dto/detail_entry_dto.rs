use serde::{Deserialize, Serialize};
use validator::Validate;

// Request to log a new detail job. Length rules apply to trimmed values.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateDetailEntryRequest {
    #[serde(default)]
    pub plate: String,

    #[validate(length(max = 20, message = "Stock number must be at most 20 characters"))]
    pub stock_number: Option<String>,

    pub detail_type: String,

    #[validate(length(
        min = 1,
        max = 50,
        message = "Advisor name is required (at most 50 characters)"
    ))]
    pub advisor: String,

    pub location: String,

    pub hours: f64,

    // Defaults to today when omitted
    pub entry_date: Option<String>,

    #[validate(length(max = 2000, message = "Notes must be at most 2000 characters"))]
    pub notes: Option<String>,
}

// Partial update; absent fields keep their value, an empty string clears
// stock_number or notes
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateDetailEntryRequest {
    pub plate: Option<String>,

    #[validate(length(max = 20, message = "Stock number must be at most 20 characters"))]
    pub stock_number: Option<String>,

    pub detail_type: Option<String>,

    #[validate(length(
        min = 1,
        max = 50,
        message = "Advisor name is required (at most 50 characters)"
    ))]
    pub advisor: Option<String>,

    pub location: Option<String>,

    pub hours: Option<f64>,

    pub entry_date: Option<String>,

    #[validate(length(max = 2000, message = "Notes must be at most 2000 characters"))]
    pub notes: Option<String>,
}

// Query string for the list, summary and export endpoints
#[derive(Debug, Default, Deserialize)]
pub struct EntryQuery {
    pub range: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub search: Option<String>,
    pub detail_type: Option<String>,
    pub location: Option<String>,
    pub advisor: Option<String>,
    pub limit: Option<i64>,
}

// Choices offered by the entry form and the log filters
#[derive(Debug, Serialize)]
pub struct OptionsResponse {
    pub detail_types: Vec<String>,
    pub locations: Vec<String>,
    pub date_ranges: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub id: i64,
}

#[derive(Debug, Serialize)]
pub struct ClearedResponse {
    pub deleted: u64,
}
