//! Query evaluation over an in-memory recording collection.
//!
//! A [`QuerySpec`] is validated once, up front. Evaluation is then a fixed
//! pipeline of independent steps:
//!
//! 1. search filter (case-insensitive title substring)
//! 2. theme filter (recording must carry every requested theme)
//! 3. stable sort
//! 4. limit
//!
//! The input slice is never reordered or mutated; results borrow from it.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

use crate::error::{QueryError, QueryResult};
use crate::models::Recording;

// =============================================================================
// Sort key
// =============================================================================

/// Result ordering. Every variant sorts stably.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum SortKey {
    #[default]
    #[serde(rename = "newest")]
    NewestFirst,
    #[serde(rename = "oldest")]
    OldestFirst,
    #[serde(rename = "title")]
    TitleAscending,
    #[serde(rename = "title-desc")]
    TitleDescending,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [
        SortKey::NewestFirst,
        SortKey::OldestFirst,
        SortKey::TitleAscending,
        SortKey::TitleDescending,
    ];

    /// Wire name, as accepted by [`FromStr`].
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::NewestFirst => "newest",
            SortKey::OldestFirst => "oldest",
            SortKey::TitleAscending => "title",
            SortKey::TitleDescending => "title-desc",
        }
    }

    fn compare(self, a: &Recording, b: &Recording) -> Ordering {
        match self {
            SortKey::NewestFirst => b.recorded_date().cmp(&a.recorded_date()),
            SortKey::OldestFirst => a.recorded_date().cmp(&b.recorded_date()),
            SortKey::TitleAscending => a.title().cmp(b.title()),
            SortKey::TitleDescending => b.title().cmp(a.title()),
        }
    }
}

impl FromStr for SortKey {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| QueryError::UnknownSortKey(s.to_string()))
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Query specification
// =============================================================================

/// Raw, unvalidated query parameters as they arrive from a caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParams {
    #[serde(default)]
    pub search: Option<String>,
    /// Repeated `themes=` parameters.
    #[serde(default)]
    pub themes: Vec<String>,
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default)]
    pub limit: Option<i64>,
}

/// A validated, immutable query.
///
/// Serializes as the filter echo returned alongside query results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QuerySpec {
    #[serde(rename = "search")]
    search_text: Option<String>,
    #[serde(rename = "themes")]
    theme_filter: Vec<String>,
    sort: SortKey,
    limit: Option<NonZeroUsize>,
}

impl QuerySpec {
    /// Everything, newest first.
    pub fn new() -> Self {
        Self::default()
    }

    /// Title search. An empty string clears it.
    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.search_text = (!text.is_empty()).then_some(text);
        self
    }

    /// Require a theme. Repeats collapse.
    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        let theme = theme.into();
        if !self.theme_filter.contains(&theme) {
            self.theme_filter.push(theme);
        }
        self
    }

    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_limit(mut self, limit: NonZeroUsize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn search_text(&self) -> Option<&str> {
        self.search_text.as_deref()
    }

    pub fn theme_filter(&self) -> &[String] {
        &self.theme_filter
    }

    pub fn sort(&self) -> SortKey {
        self.sort
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit.map(NonZeroUsize::get)
    }
}

impl TryFrom<&QueryParams> for QuerySpec {
    type Error = QueryError;

    fn try_from(params: &QueryParams) -> QueryResult<Self> {
        let mut spec = QuerySpec::new();

        if let Some(sort) = params.sort.as_deref() {
            spec = spec.with_sort(sort.parse()?);
        }

        if let Some(limit) = params.limit {
            let limit = usize::try_from(limit)
                .ok()
                .and_then(NonZeroUsize::new)
                .ok_or(QueryError::InvalidLimit(limit))?;
            spec = spec.with_limit(limit);
        }

        for theme in &params.themes {
            if theme.trim().is_empty() {
                return Err(QueryError::EmptyTheme);
            }
            spec = spec.with_theme(theme.as_str());
        }

        if let Some(search) = params.search.as_deref() {
            spec = spec.with_search(search);
        }

        Ok(spec)
    }
}

impl TryFrom<QueryParams> for QuerySpec {
    type Error = QueryError;

    fn try_from(params: QueryParams) -> QueryResult<Self> {
        QuerySpec::try_from(&params)
    }
}

// =============================================================================
// Evaluation
// =============================================================================

/// Whether a title contains `needle`, ignoring case. `needle` must already be
/// lower-cased.
pub fn matches_search(recording: &Recording, needle: &str) -> bool {
    recording.title().to_lowercase().contains(needle)
}

/// Whether a recording carries every theme in `required`.
pub fn matches_themes(recording: &Recording, required: &[String]) -> bool {
    required.iter().all(|theme| recording.has_theme(theme))
}

/// Run a validated query.
pub fn evaluate<'a>(recordings: &'a [Recording], spec: &QuerySpec) -> Vec<&'a Recording> {
    let needle = spec.search_text().map(str::to_lowercase);

    let mut results: Vec<&Recording> = recordings
        .iter()
        .filter(|r| needle.as_deref().map_or(true, |n| matches_search(r, n)))
        .filter(|r| matches_themes(r, spec.theme_filter()))
        .collect();

    // slice::sort_by is stable: ties keep input order
    results.sort_by(|a, b| spec.sort().compare(a, b));

    if let Some(limit) = spec.limit() {
        results.truncate(limit);
    }

    results
}

/// Validate raw parameters, then run the query.
pub fn evaluate_params<'a>(
    recordings: &'a [Recording],
    params: &QueryParams,
) -> QueryResult<Vec<&'a Recording>> {
    let spec = QuerySpec::try_from(params)?;
    Ok(evaluate(recordings, &spec))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_identifier;
    use crate::taxonomy::{presets, ThemeClassifier};
    use std::sync::Arc;

    fn catalog(ids: &[&str]) -> Vec<Recording> {
        let classifier = ThemeClassifier::new(Arc::new(presets::legacy()));
        ids.iter()
            .map(|id| Recording::classify(*id, parse_identifier(id).unwrap(), &classifier, *id))
            .collect()
    }

    fn titles(results: &[&Recording]) -> Vec<String> {
        results.iter().map(|r| r.title().to_string()).collect()
    }

    fn sample() -> Vec<Recording> {
        catalog(&[
            "2023-01-01_Grace_and_Faith.mp3",
            "2024-06-15_Healing_Power.mp3",
            "2022-03-10_Faith_that_Heals.mp3",
            "2023-01-01_Peace_in_the_Storm.mp3",
            "2021-12-25_Christmas_Joy.mp3",
        ])
    }

    fn params(sort: Option<&str>, limit: Option<i64>) -> QueryParams {
        QueryParams {
            sort: sort.map(String::from),
            limit,
            ..Default::default()
        }
    }

    #[test]
    fn test_newest_first_scenario() {
        let recs = catalog(&["2023-01-01_Grace_and_Faith.mp3", "2024-06-15_Healing_Power.mp3"]);
        let results = evaluate(&recs, &QuerySpec::new());
        assert_eq!(titles(&results), vec!["Healing Power", "Grace and Faith"]);
    }

    #[test]
    fn test_theme_filter_scenario() {
        let recs = catalog(&["2023-01-01_Grace_and_Faith.mp3", "2024-06-15_Healing_Power.mp3"]);
        let results = evaluate(&recs, &QuerySpec::new().with_theme("Faith"));
        assert_eq!(titles(&results), vec!["Grace and Faith"]);
    }

    #[test]
    fn test_bogus_sort_rejected() {
        let recs = sample();
        let err = evaluate_params(&recs, &params(Some("bogus"), None)).unwrap_err();
        assert_eq!(err, QueryError::UnknownSortKey("bogus".into()));
    }

    #[test]
    fn test_sort_key_names() {
        for key in SortKey::ALL {
            assert_eq!(key.as_str().parse::<SortKey>(), Ok(key));
        }
        assert!("Newest".parse::<SortKey>().is_err());
        assert!("".parse::<SortKey>().is_err());
    }

    #[test]
    fn test_theme_filter_is_and() {
        let recs = sample();
        // "Faith that Heals" is tagged Faith and Healing; "Grace and Faith" only Faith and Grace
        let both = evaluate(&recs, &QuerySpec::new().with_theme("Faith").with_theme("Healing"));
        assert_eq!(titles(&both), vec!["Faith that Heals"]);
    }

    #[test]
    fn test_theme_filter_monotonic() {
        let recs = sample();
        let mut spec = QuerySpec::new();
        let mut previous = evaluate(&recs, &spec).len();
        for theme in ["Faith", "Healing", "Grace", "Peace"] {
            spec = spec.with_theme(theme);
            let count = evaluate(&recs, &spec).len();
            assert!(count <= previous, "adding {theme} grew results");
            previous = count;
        }
        assert_eq!(previous, 0);
    }

    #[test]
    fn test_theme_names_are_case_sensitive() {
        let recs = sample();
        assert!(evaluate(&recs, &QuerySpec::new().with_theme("faith")).is_empty());
    }

    #[test]
    fn test_duplicate_themes_collapse() {
        let spec = QuerySpec::try_from(QueryParams {
            themes: vec!["Faith".into(), "Faith".into()],
            ..Default::default()
        })
        .unwrap();
        assert_eq!(spec.theme_filter(), ["Faith"]);
    }

    #[test]
    fn test_blank_theme_rejected() {
        let result = QuerySpec::try_from(QueryParams {
            themes: vec!["  ".into()],
            ..Default::default()
        });
        assert_eq!(result, Err(QueryError::EmptyTheme));
    }

    #[test]
    fn test_search_case_insensitive() {
        let recs = sample();
        let results = evaluate(&recs, &QuerySpec::new().with_search("FAITH"));
        assert_eq!(titles(&results), vec!["Grace and Faith", "Faith that Heals"]);
    }

    #[test]
    fn test_empty_search_is_no_filter() {
        let recs = sample();
        let spec = QuerySpec::new().with_search("");
        assert_eq!(spec.search_text(), None);
        assert_eq!(evaluate(&recs, &spec).len(), recs.len());
    }

    #[test]
    fn test_search_and_theme_combine() {
        let recs = sample();
        let spec = QuerySpec::new().with_search("heal").with_theme("Faith");
        assert_eq!(titles(&evaluate(&recs, &spec)), vec!["Faith that Heals"]);
    }

    #[test]
    fn test_newest_first_stable_on_ties() {
        let recs = sample();
        let results = evaluate(&recs, &QuerySpec::new());
        assert_eq!(
            titles(&results),
            vec![
                "Healing Power",
                "Grace and Faith",
                "Peace in the Storm",
                "Faith that Heals",
                "Christmas Joy",
            ]
        );
        assert!(results[0].recorded_date() >= results[results.len() - 1].recorded_date());
    }

    #[test]
    fn test_oldest_first_stable_on_ties() {
        let recs = sample();
        let results = evaluate(&recs, &QuerySpec::new().with_sort(SortKey::OldestFirst));
        assert_eq!(titles(&results)[2..4], ["Grace and Faith", "Peace in the Storm"]);
    }

    #[test]
    fn test_title_sorts() {
        let recs = sample();
        let asc = evaluate(&recs, &QuerySpec::new().with_sort(SortKey::TitleAscending));
        assert_eq!(titles(&asc)[0], "Christmas Joy");
        let desc = evaluate(&recs, &QuerySpec::new().with_sort(SortKey::TitleDescending));
        assert_eq!(titles(&desc)[0], "Peace in the Storm");
    }

    #[test]
    fn test_limit_truncates_after_sort() {
        let recs = sample();
        let results = evaluate_params(&recs, &params(Some("oldest"), Some(2))).unwrap();
        assert_eq!(titles(&results), vec!["Christmas Joy", "Faith that Heals"]);
    }

    #[test]
    fn test_limit_larger_than_results() {
        let recs = sample();
        let results = evaluate_params(&recs, &params(None, Some(50))).unwrap();
        assert_eq!(results.len(), recs.len());
    }

    #[test]
    fn test_non_positive_limit_rejected() {
        let recs = sample();
        assert_eq!(
            evaluate_params(&recs, &params(None, Some(0))).unwrap_err(),
            QueryError::InvalidLimit(0)
        );
        assert_eq!(
            evaluate_params(&recs, &params(None, Some(-3))).unwrap_err(),
            QueryError::InvalidLimit(-3)
        );
    }

    #[test]
    fn test_input_untouched() {
        let recs = sample();
        let before = recs.clone();
        let _ = evaluate(&recs, &QuerySpec::new().with_sort(SortKey::TitleAscending));
        assert_eq!(recs, before);
    }

    #[test]
    fn test_empty_collection() {
        let recs: Vec<Recording> = Vec::new();
        assert!(evaluate(&recs, &QuerySpec::new().with_theme("Faith")).is_empty());
    }

    #[test]
    fn test_spec_echo_serialization() {
        let spec = QuerySpec::try_from(QueryParams {
            search: Some("grace".into()),
            themes: vec!["Faith".into()],
            sort: Some("title-desc".into()),
            limit: Some(10),
        })
        .unwrap();
        let echo = serde_json::to_value(&spec).unwrap();
        assert_eq!(
            echo,
            serde_json::json!({
                "search": "grace",
                "themes": ["Faith"],
                "sort": "title-desc",
                "limit": 10
            })
        );
    }
}
