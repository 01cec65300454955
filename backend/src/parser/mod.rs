//! Recording filename parser and discovery helpers.
//!
//! Source files are named `YYYY-MM-DD_Title_With_Underscores.mp3`. The parser
//! turns such an identifier into a date and a readable title. Anything else is
//! "not a recording": the caller skips it, nothing fails.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::fs;
use std::path::Path;

/// Audio extension stripped before matching.
const AUDIO_EXTENSION: &str = ".mp3";

static FILENAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]{4}-[0-9]{2}-[0-9]{2})_(.+)$").expect("filename pattern is a valid regex")
});

/// Date and title extracted from a recording identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFilename {
    pub recorded_date: NaiveDate,
    /// Title with every underscore replaced by a space.
    pub title: String,
}

/// Why an identifier was not accepted as a recording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Does not look like `YYYY-MM-DD_Title`.
    NoDatePrefix,
    /// Date-shaped prefix that is not a calendar date.
    InvalidDate(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoDatePrefix => write!(f, "no YYYY-MM-DD_ prefix"),
            SkipReason::InvalidDate(date) => write!(f, "invalid date '{}'", date),
        }
    }
}

/// Strip a trailing `.mp3` (any case) from an identifier.
pub fn strip_audio_extension(raw: &str) -> &str {
    let split = raw.len().saturating_sub(AUDIO_EXTENSION.len());
    match (raw.get(..split), raw.get(split..)) {
        (Some(stem), Some(ext)) if ext.eq_ignore_ascii_case(AUDIO_EXTENSION) => stem,
        _ => raw,
    }
}

/// Parse an identifier, returning `None` if it is not a recording.
///
/// # Example
/// ```ignore
/// use sermondex::parse_identifier;
///
/// let parsed = parse_identifier("2023-01-01_Grace_and_Faith.mp3").unwrap();
/// assert_eq!(parsed.title, "Grace and Faith");
/// assert!(parse_identifier("2023-13-40_Bad_Date.mp3").is_none());
/// ```
pub fn parse_identifier(raw: &str) -> Option<ParsedFilename> {
    parse_identifier_verbose(raw).ok()
}

/// Parse an identifier, reporting why it was skipped.
pub fn parse_identifier_verbose(raw: &str) -> Result<ParsedFilename, SkipReason> {
    let captures = FILENAME_PATTERN
        .captures(strip_audio_extension(raw))
        .ok_or(SkipReason::NoDatePrefix)?;

    let date_str = &captures[1];
    let recorded_date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|_| SkipReason::InvalidDate(date_str.to_string()))?;

    Ok(ParsedFilename {
        recorded_date,
        title: captures[2].replace('_', " "),
    })
}

/// Split a newline-separated listing into identifiers.
///
/// Blank lines and `#` comments are ignored; surrounding whitespace is trimmed.
pub fn parse_listing(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect()
}

/// List the `.mp3` file names in a directory, sorted by name.
pub fn scan_directory<P: AsRef<Path>>(dir: P) -> std::io::Result<Vec<String>> {
    let mut names = Vec::new();

    for entry in fs::read_dir(dir.as_ref())? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            if strip_audio_extension(name).len() < name.len() {
                names.push(name.to_string());
            }
        }
    }

    names.sort();
    Ok(names)
}
