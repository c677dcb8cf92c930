//! CSV export of the detail log

use crate::models::detail_entry::DetailEntry;
use chrono::NaiveDate;

pub const CSV_HEADER: [&str; 9] = [
    "id",
    "plate",
    "stock_number",
    "detail_type",
    "advisor",
    "location",
    "hours",
    "entry_date",
    "notes",
];

/// Serialize entries to CSV, one row per entry after the header row
pub fn export_csv(entries: &[DetailEntry]) -> String {
    let mut out = String::new();
    push_row(&mut out, CSV_HEADER.iter().copied());

    for entry in entries {
        let id = entry.id.to_string();
        let hours = entry.hours.to_string();
        let entry_date = entry.entry_date.format("%Y-%m-%d").to_string();
        push_row(
            &mut out,
            [
                id.as_str(),
                entry.plate.as_str(),
                entry.stock_number.as_deref().unwrap_or(""),
                entry.detail_type.as_ref(),
                entry.advisor.as_str(),
                entry.location.as_ref(),
                hours.as_str(),
                entry_date.as_str(),
                entry.notes.as_deref().unwrap_or(""),
            ],
        );
    }
    out
}

/// Download name for an export made on `date`
pub fn export_filename(date: NaiveDate) -> String {
    format!("detailing_log_{}.csv", date.format("%Y%m%d"))
}

fn push_row<'a>(out: &mut String, fields: impl IntoIterator<Item = &'a str>) {
    for (i, field) in fields.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        push_field(out, field);
    }
    out.push('\n');
}

fn push_field(out: &mut String, field: &str) {
    if field.contains([',', '"', '\r', '\n']) {
        out.push('"');
        out.push_str(&field.replace('"', "\"\""));
        out.push('"');
    } else {
        out.push_str(field);
    }
}
