//! Catalog statistics.
//!
//! Counts are accumulated into ordered maps, so the result is independent of
//! the order recordings are visited in.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

use crate::models::{CatalogStats, DateRange, Recording, ThemeCount};
use crate::taxonomy::{Taxonomy, GENERAL_THEME};

static WORD_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[a-zA-Z]+\b").expect("word pattern is a valid regex"));

/// Words ignored by the title keyword analysis
const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "is",
    "are", "was", "were", "be", "been", "being", "have", "has", "had", "do", "does", "did", "will",
    "would", "could", "should", "may", "might", "must", "can", "this", "that", "these", "those",
    "i", "you", "he", "she", "it", "we", "they", "me", "him", "her", "us", "them", "my", "your",
    "his", "its", "our", "their",
];

/// Aggregate theme counts, year counts and date range over a collection.
pub fn aggregate<'a, I>(recordings: I) -> CatalogStats
where
    I: IntoIterator<Item = &'a Recording>,
{
    let mut stats = CatalogStats::default();

    for recording in recordings {
        stats.total_count += 1;

        for theme in recording.themes() {
            *stats.theme_counts.entry(theme.clone()).or_default() += 1;
        }
        *stats.year_counts.entry(recording.year()).or_default() += 1;

        let date = recording.recorded_date();
        stats.date_range = Some(match stats.date_range {
            None => DateRange { earliest: date, latest: date },
            Some(range) => DateRange {
                earliest: range.earliest.min(date),
                latest: range.latest.max(date),
            },
        });
    }

    stats
}

/// Every theme with its count, most used first.
///
/// Lists all taxonomy themes (zero counts included), then `General`, then any
/// tag present in the data but unknown to the taxonomy. Equal counts keep that
/// order.
pub fn theme_listing(stats: &CatalogStats, taxonomy: &Taxonomy) -> Vec<ThemeCount> {
    let mut names: Vec<&str> = taxonomy.theme_names();
    names.push(GENERAL_THEME);

    let extra: Vec<&str> = stats
        .theme_counts
        .keys()
        .map(String::as_str)
        .filter(|name| !names.contains(name))
        .collect();
    names.extend(extra);

    let mut listing: Vec<ThemeCount> = names
        .into_iter()
        .map(|name| ThemeCount {
            name: name.to_string(),
            count: stats.theme_counts.get(name).copied().unwrap_or(0),
        })
        .collect();

    listing.sort_by(|a, b| b.count.cmp(&a.count));
    listing
}

/// The `n` most common years, newest first on ties.
pub fn top_years(stats: &CatalogStats, n: usize) -> Vec<(i32, usize)> {
    let mut years: Vec<(i32, usize)> = stats.year_counts.iter().map(|(y, c)| (*y, *c)).collect();
    years.sort_by(|a, b| b.0.cmp(&a.0));
    years.sort_by(|a, b| b.1.cmp(&a.1));
    years.truncate(n);
    years
}

/// Lower-cased ASCII words of a title, without stop words or words of two
/// letters or fewer.
pub fn title_keywords(title: &str) -> Vec<String> {
    let lowered = title.to_lowercase();
    WORD_PATTERN
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|word| word.len() > 2 && !STOP_WORDS.contains(word))
        .map(str::to_string)
        .collect()
}

/// The `n` most frequent title keywords across a collection.
///
/// Equal counts keep the order in which the words were first seen.
pub fn keyword_frequencies<'a, I>(recordings: I, n: usize) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a Recording>,
{
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();

    for recording in recordings {
        for word in title_keywords(recording.title()) {
            match positions.get(&word) {
                Some(&index) => counts[index].1 += 1,
                None => {
                    positions.insert(word.clone(), counts.len());
                    counts.push((word, 1));
                }
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(n);
    counts
}

/// Share of the collection carrying a theme, as a percentage.
pub fn coverage_percent(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    count as f64 / total as f64 * 100.0
}
