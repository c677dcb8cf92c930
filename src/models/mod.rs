//! Data models
//!
//! Rows of the `detail_entries` table and the typed inputs and filters
//! that go with them.

pub mod detail_entry;

pub use detail_entry::{
    DateRange, DetailEntry, DetailEntryChanges, DetailType, EntryFilter, Location, NewDetailEntry,
};
