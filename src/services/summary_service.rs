//! Summary service
//!
//! Pure aggregates over a slice of entries: the count/total/average summary,
//! duration spread, per-advisor and per-type breakdowns, and the dashboard
//! view built from them.

use crate::models::detail_entry::{advisor_key, DateRange, DetailEntry, DetailType};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

const RECENT_ENTRIES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EntrySummary {
    pub count: usize,
    pub total_hours: f64,
    pub average_hours: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DurationStats {
    pub min: f64,
    pub max: f64,
    pub average: f64,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdvisorStats {
    pub advisor: String,
    pub entries: usize,
    pub total_hours: f64,
    pub unique_detail_types: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeStats {
    pub detail_type: DetailType,
    pub entries: usize,
    pub total_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub overall: EntrySummary,
    pub today: EntrySummary,
    pub this_week: EntrySummary,
    pub most_common_type: Option<DetailType>,
    pub duration: DurationStats,
    pub advisors: Vec<AdvisorStats>,
    pub detail_types: Vec<TypeStats>,
    pub recent: Vec<DetailEntry>,
}

/// Count, total and mean hours. The mean of no entries is 0.
pub fn aggregate(entries: &[DetailEntry]) -> EntrySummary {
    let count = entries.len();
    let total_hours: f64 = entries.iter().map(|e| e.hours).sum();
    let average_hours = if count == 0 {
        0.0
    } else {
        total_hours / count as f64
    };

    EntrySummary {
        count,
        total_hours,
        average_hours,
    }
}

pub fn duration_stats(entries: &[DetailEntry]) -> DurationStats {
    if entries.is_empty() {
        return DurationStats {
            min: 0.0,
            max: 0.0,
            average: 0.0,
            total: 0.0,
        };
    }

    let summary = aggregate(entries);
    let (min, max) = entries
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), e| {
            (min.min(e.hours), max.max(e.hours))
        });

    DurationStats {
        min,
        max,
        average: summary.average_hours,
        total: summary.total_hours,
    }
}

/// Per-advisor totals, busiest first. Names that differ only in case or
/// padding count as one advisor, shown as first spelled in `entries`.
pub fn advisor_breakdown(entries: &[DetailEntry]) -> Vec<AdvisorStats> {
    let mut by_advisor: BTreeMap<String, (&str, usize, f64, HashSet<DetailType>)> =
        BTreeMap::new();
    for entry in entries {
        let slot = by_advisor
            .entry(advisor_key(&entry.advisor))
            .or_insert_with(|| (entry.advisor.trim(), 0, 0.0, HashSet::new()));
        slot.1 += 1;
        slot.2 += entry.hours;
        slot.3.insert(entry.detail_type);
    }

    let mut stats: Vec<AdvisorStats> = by_advisor
        .into_values()
        .map(|(advisor, entries, total_hours, types)| AdvisorStats {
            advisor: advisor.to_string(),
            entries,
            total_hours,
            unique_detail_types: types.len(),
        })
        .collect();

    // BTreeMap already yields names in order, so a stable sort keeps ties alphabetical
    stats.sort_by(|a, b| b.total_hours.total_cmp(&a.total_hours));
    stats
}

/// Per-type totals, most frequent first
pub fn type_breakdown(entries: &[DetailEntry]) -> Vec<TypeStats> {
    let mut by_type: HashMap<DetailType, (usize, f64)> = HashMap::new();
    for entry in entries {
        let slot = by_type.entry(entry.detail_type).or_insert((0, 0.0));
        slot.0 += 1;
        slot.1 += entry.hours;
    }

    let mut stats: Vec<TypeStats> = by_type
        .into_iter()
        .map(|(detail_type, (entries, total_hours))| TypeStats {
            detail_type,
            entries,
            total_hours,
        })
        .collect();

    stats.sort_by(|a, b| {
        b.entries
            .cmp(&a.entries)
            .then_with(|| a.detail_type.as_ref().cmp(b.detail_type.as_ref()))
    });
    stats
}

/// Dashboard figures for `entries` (expected newest first), with day and
/// week windows taken relative to `today`
pub fn dashboard(entries: &[DetailEntry], today: NaiveDate) -> Dashboard {
    let within = |range: DateRange| -> Vec<DetailEntry> {
        match range.bounds(today) {
            Some((start, end)) => entries
                .iter()
                .filter(|e| e.entry_date >= start && e.entry_date <= end)
                .cloned()
                .collect(),
            None => entries.to_vec(),
        }
    };

    let detail_types = type_breakdown(entries);

    Dashboard {
        overall: aggregate(entries),
        today: aggregate(&within(DateRange::Today)),
        this_week: aggregate(&within(DateRange::ThisWeek)),
        most_common_type: detail_types.first().map(|t| t.detail_type),
        duration: duration_stats(entries),
        advisors: advisor_breakdown(entries),
        detail_types,
        recent: entries.iter().take(RECENT_ENTRIES).cloned().collect(),
    }
}
