//! Domain models for the sermon catalog.
//!
//! - [`Recording`] - One catalogued audio item
//! - [`CatalogStats`] - Aggregated counts over a collection
//! - [`DateRange`] - Earliest/latest recording dates
//! - [`ThemeCount`] - Theme name paired with its corpus-wide count

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::parser::ParsedFilename;
use crate::taxonomy::ThemeClassifier;

// =============================================================================
// Recording
// =============================================================================

/// A catalogued recording.
///
/// `year` and `themes` are derived fields: `year` from `recorded_date`,
/// `themes` from `title` through the classifier. Neither can be set directly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Recording {
    identifier: String,
    recorded_date: NaiveDate,
    title: String,
    year: i32,
    themes: Vec<String>,
    location_ref: String,
}

impl Recording {
    /// Build a recording from a parsed filename, tagging its title.
    pub fn classify(
        identifier: impl Into<String>,
        parsed: ParsedFilename,
        classifier: &ThemeClassifier,
        location_ref: impl Into<String>,
    ) -> Self {
        let themes = classifier.classify(&parsed.title);
        Self {
            identifier: identifier.into(),
            year: parsed.recorded_date.year(),
            recorded_date: parsed.recorded_date,
            title: parsed.title,
            themes,
            location_ref: location_ref.into(),
        }
    }

    /// Stable unique key (the source filename).
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn recorded_date(&self) -> NaiveDate {
        self.recorded_date
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Theme tags in taxonomy order. Never empty.
    pub fn themes(&self) -> &[String] {
        &self.themes
    }

    /// Whether this recording carries the given theme.
    pub fn has_theme(&self, theme: &str) -> bool {
        self.themes.iter().any(|t| t == theme)
    }

    /// Opaque reference to the audio payload.
    pub fn location_ref(&self) -> &str {
        &self.location_ref
    }

    /// Recompute themes from the title. Returns `true` if they changed.
    pub fn retag(&mut self, classifier: &ThemeClassifier) -> bool {
        let themes = classifier.classify(&self.title);
        if themes == self.themes {
            return false;
        }
        self.themes = themes;
        true
    }

    /// Point the recording at a new payload location.
    pub fn relocate(&mut self, location_ref: impl Into<String>) {
        self.location_ref = location_ref.into();
    }

    /// Check the model invariants on a recording loaded from outside.
    pub fn check_invariants(&self) -> Result<(), String> {
        if self.identifier.is_empty() {
            return Err("identifier is empty".to_string());
        }
        if self.year != self.recorded_date.year() {
            return Err(format!(
                "year {} does not match recorded date {}",
                self.year, self.recorded_date
            ));
        }
        if self.themes.is_empty() {
            return Err("themes are empty".to_string());
        }
        Ok(())
    }
}

// =============================================================================
// Statistics
// =============================================================================

/// Earliest and latest recording dates of a collection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub earliest: NaiveDate,
    pub latest: NaiveDate,
}

/// Aggregate counts over a collection of recordings.
///
/// Maps are ordered so that serialized output does not depend on input order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStats {
    /// Number of recordings.
    pub total_count: usize,
    /// Recordings per theme. A recording with N themes counts N times.
    pub theme_counts: BTreeMap<String, usize>,
    /// Recordings per year.
    pub year_counts: BTreeMap<i32, usize>,
    /// `None` for an empty collection.
    pub date_range: Option<DateRange>,
}

/// A theme with its number of tagged recordings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ThemeCount {
    pub name: String,
    pub count: usize,
}
