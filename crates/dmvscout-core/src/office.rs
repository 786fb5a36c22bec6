//! The office record produced by the scrape and enriched downstream.
//!
//! ## Field lifecycle
//!
//! A record is created with `name` and `dates_available` filled during the
//! per-page extraction loop. `address` is assigned once per page by position
//! against the page's card order, and `travel_secs` is assigned at most once
//! during the distance enrichment pass. After that the record is immutable
//! and is what gets serialized to the checkpoint files.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One physical appointment location.
///
/// The wire format is fixed: `name`, `dates_available` (ISO `YYYY-MM-DD`
/// strings), `address`, `travel_secs`. The checkpoint files and the
/// `--parse` input mode both use exactly this shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfficeRecord {
    /// Display name from the listing card, text after the leading "N." index.
    pub name: String,

    /// Dates with a visible appointment slot, in calendar discovery order
    /// (not necessarily chronological). Empty means no visible availability.
    pub dates_available: Vec<NaiveDate>,

    /// Normalized postal address; `None` until address extraction runs.
    #[serde(default)]
    pub address: Option<String>,

    /// Travel time from the configured starting address, in whole seconds;
    /// `None` until enrichment runs (or if its batch failed).
    #[serde(default)]
    pub travel_secs: Option<u64>,
}

impl OfficeRecord {
    /// Creates a record in its initial state: name and dates known, address
    /// and travel time not yet assigned.
    #[must_use]
    pub fn new(name: impl Into<String>, dates_available: Vec<NaiveDate>) -> Self {
        Self {
            name: name.into(),
            dates_available,
            address: None,
            travel_secs: None,
        }
    }

    /// Earliest available date, or `None` when the office has no visible
    /// availability. Discovery order is not chronological, so this scans.
    #[must_use]
    pub fn earliest_date(&self) -> Option<NaiveDate> {
        self.dates_available.iter().min().copied()
    }
}

/// Sorts offices by travel time ascending, stable on ties. Offices without
/// a travel time (enrichment skipped or their batch failed) sort last.
pub fn sort_by_travel_time(offices: &mut [OfficeRecord]) {
    offices.sort_by_key(|office| (office.travel_secs.is_none(), office.travel_secs));
}
