//! Ingestion and re-tagging.
//!
//! ```rust,ignore
//! use sermondex::catalog::pipeline::{ingest_source, IngestOptions};
//!
//! let report = ingest_source(Path::new("audio/"), &classifier, &IngestOptions::default())?;
//! println!("{} recordings, {} skipped", report.recordings.len(), report.skipped.len());
//! ```

use std::collections::HashSet;
use std::path::Path;

use crate::api::logs::{log_error, log_info, log_info_indent, log_success, log_warning};
use crate::error::{PipelineError, PipelineResult};
use crate::models::Recording;
use crate::parser::{parse_identifier_verbose, parse_listing, scan_directory, SkipReason};
use crate::taxonomy::ThemeClassifier;

/// Default prefix for generated location references.
pub const DEFAULT_LOCATION_PREFIX: &str = "recordings";

/// Options for building recordings from identifiers
#[derive(Debug, Clone)]
pub struct IngestOptions {
    /// Prepended to each identifier to form its `locationRef`.
    pub location_prefix: String,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            location_prefix: DEFAULT_LOCATION_PREFIX.to_string(),
        }
    }
}

/// An identifier that did not become a recording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedIdentifier {
    pub identifier: String,
    pub reason: SkipReason,
}

/// Outcome of an ingestion run
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    /// Newest first; equal dates keep discovery order.
    pub recordings: Vec<Recording>,
    pub skipped: Vec<SkippedIdentifier>,
    /// Repeated identifiers, ignored after their first occurrence.
    pub duplicates: Vec<String>,
}

/// Outcome of a re-tag run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct RetagReport {
    pub total: usize,
    pub changed: usize,
}

/// Join a prefix and an identifier into a location reference.
pub fn location_ref_for(prefix: &str, identifier: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        identifier.to_string()
    } else {
        format!("{}/{}", prefix, identifier)
    }
}

/// Parse, tag and order a batch of identifiers.
pub fn ingest_identifiers<I, S>(
    identifiers: I,
    classifier: &ThemeClassifier,
    options: &IngestOptions,
) -> IngestReport
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut report = IngestReport::default();
    let mut seen = HashSet::new();

    for identifier in identifiers {
        let identifier = identifier.as_ref();

        if !seen.insert(identifier.to_string()) {
            report.duplicates.push(identifier.to_string());
            continue;
        }

        match parse_identifier_verbose(identifier) {
            Ok(parsed) => {
                let location = location_ref_for(&options.location_prefix, identifier);
                report
                    .recordings
                    .push(Recording::classify(identifier, parsed, classifier, location));
            }
            Err(reason) => {
                log_info_indent(format!("Skipping {}: {}", identifier, reason), 1);
                report.skipped.push(SkippedIdentifier {
                    identifier: identifier.to_string(),
                    reason,
                });
            }
        }
    }

    report
        .recordings
        .sort_by(|a, b| b.recorded_date().cmp(&a.recorded_date()));

    report
}

/// Read identifiers from a directory of `.mp3` files or a listing file, then
/// ingest them.
///
/// Fails with [`PipelineError::EmptyInput`] if nothing parsed, so a bad source
/// cannot wipe an existing catalog.
pub fn ingest_source(
    source: &Path,
    classifier: &ThemeClassifier,
    options: &IngestOptions,
) -> PipelineResult<IngestReport> {
    let read_error = |e: std::io::Error| PipelineError::Source {
        path: source.display().to_string(),
        source: e,
    };

    let identifiers = if source.is_dir() {
        log_info(format!("📂 Scanning directory {}", source.display()));
        scan_directory(source).map_err(read_error)?
    } else {
        log_info(format!("📄 Reading listing {}", source.display()));
        let text = std::fs::read_to_string(source).map_err(read_error)?;
        parse_listing(&text)
    };

    log_info(format!("Found {} candidate identifiers", identifiers.len()));

    let report = ingest_identifiers(&identifiers, classifier, options);

    if !report.skipped.is_empty() {
        log_warning(format!("{} identifiers skipped", report.skipped.len()));
    }
    if !report.duplicates.is_empty() {
        log_warning(format!("{} duplicate identifiers ignored", report.duplicates.len()));
    }
    if report.recordings.is_empty() {
        log_error(format!("No recordings found in {}", source.display()));
        return Err(PipelineError::EmptyInput(report.skipped.len()));
    }

    log_success(format!("{} recordings tagged", report.recordings.len()));
    Ok(report)
}

/// Recompute themes for every recording from its title.
pub fn retag(recordings: &mut [Recording], classifier: &ThemeClassifier) -> RetagReport {
    let changed = recordings
        .iter_mut()
        .map(|recording| recording.retag(classifier))
        .filter(|changed| *changed)
        .count();

    let report = RetagReport {
        total: recordings.len(),
        changed,
    };

    if changed > 0 {
        log_success(format!(
            "Re-tagged {} of {} recordings with taxonomy '{}'",
            changed,
            report.total,
            classifier.taxonomy().name
        ));
    } else {
        log_info(format!("All {} recordings already up to date", report.total));
    }

    report
}
