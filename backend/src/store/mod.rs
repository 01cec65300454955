//! Catalog store - the recording collection persisted as one JSON file.
//!
//! The whole collection is read into memory and written back in full. Stats
//! are recomputed on every save and stored for readers that only want counts.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::catalog::pipeline::{retag, RetagReport};
use crate::catalog::stats::aggregate;
use crate::error::{StoreError, StoreResult};
use crate::models::{CatalogStats, Recording};
use crate::taxonomy::ThemeClassifier;
use crate::validation::validate_catalog_document;

/// Catalog file used when none is configured (relative to current dir)
pub const DEFAULT_CATALOG_PATH: &str = ".sermondex/catalog.json";

/// Version written into new catalog documents
pub const CATALOG_FORMAT_VERSION: &str = "1";

/// On-disk layout
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogDocument {
    #[serde(default = "format_version")]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<String>,
    /// Name of the taxonomy the themes were computed with.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taxonomy: Option<String>,
    pub recordings: Vec<Recording>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<CatalogStats>,
}

fn format_version() -> String {
    CATALOG_FORMAT_VERSION.to_string()
}

/// File-backed recording collection
#[derive(Debug, Clone)]
pub struct CatalogStore {
    path: PathBuf,
    taxonomy: Option<String>,
    generated_at: Option<String>,
    recordings: Vec<Recording>,
}

impl CatalogStore {
    /// Open the catalog at `path`. A missing file gives an empty store.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = PathBuf::from(path.as_ref());

        if !path.exists() {
            return Ok(Self {
                path,
                taxonomy: None,
                generated_at: None,
                recordings: Vec::new(),
            });
        }

        let content = fs::read_to_string(&path)?;
        let document = Self::parse_document(&content)?;

        Ok(Self {
            path,
            taxonomy: document.taxonomy,
            generated_at: document.generated_at,
            recordings: document.recordings,
        })
    }

    /// Open the catalog and re-tag it with `classifier`, so themes reflect the
    /// active taxonomy rather than whichever one was used at ingestion.
    pub fn open_tagged(
        path: impl AsRef<Path>,
        classifier: &ThemeClassifier,
    ) -> StoreResult<(Self, RetagReport)> {
        let mut store = Self::open(path)?;
        let report = store.retag(classifier);
        Ok((store, report))
    }

    /// Validate a serialized catalog: schema first, then model invariants.
    pub fn parse_document(content: &str) -> StoreResult<CatalogDocument> {
        let value: Value = serde_json::from_str(content)?;
        validate_catalog_document(&value).map_err(StoreError::Schema)?;

        let document: CatalogDocument = serde_json::from_value(value)?;
        check_recordings(&document.recordings)?;
        Ok(document)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn recordings(&self) -> &[Recording] {
        &self.recordings
    }

    pub fn into_recordings(self) -> Vec<Recording> {
        self.recordings
    }

    pub fn len(&self) -> usize {
        self.recordings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recordings.is_empty()
    }

    /// Taxonomy the stored themes were computed with, if recorded.
    pub fn taxonomy_name(&self) -> Option<&str> {
        self.taxonomy.as_deref()
    }

    /// Timestamp of the last save (RFC 3339).
    pub fn generated_at(&self) -> Option<&str> {
        self.generated_at.as_deref()
    }

    /// Swap in a whole new collection. Nothing is written until [`save`](Self::save).
    pub fn replace_all(
        &mut self,
        recordings: Vec<Recording>,
        taxonomy_name: &str,
    ) -> StoreResult<()> {
        check_recordings(&recordings)?;
        self.recordings = recordings;
        self.taxonomy = Some(taxonomy_name.to_string());
        Ok(())
    }

    /// Re-tag every stored recording with `classifier`.
    pub fn retag(&mut self, classifier: &ThemeClassifier) -> RetagReport {
        let report = retag(&mut self.recordings, classifier);
        self.taxonomy = Some(classifier.taxonomy().name.clone());
        report
    }

    /// Point every recording at `{base_url}/{identifier}`. Returns how many
    /// references changed.
    pub fn relocate(&mut self, base_url: &str) -> usize {
        let base_url = base_url.trim_end_matches('/');
        let mut changed = 0;

        for recording in self.recordings.iter_mut() {
            let location = format!("{}/{}", base_url, recording.identifier());
            if location != recording.location_ref() {
                recording.relocate(location);
                changed += 1;
            }
        }

        changed
    }

    pub fn stats(&self) -> CatalogStats {
        aggregate(&self.recordings)
    }

    /// Write the catalog, creating parent directories as needed.
    pub fn save(&mut self) -> StoreResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let generated_at = chrono::Utc::now().to_rfc3339();
        let document = CatalogDocument {
            version: format_version(),
            generated_at: Some(generated_at.clone()),
            taxonomy: self.taxonomy.clone(),
            recordings: self.recordings.clone(),
            stats: Some(self.stats()),
        };

        let content = serde_json::to_string_pretty(&document)?;
        fs::write(&self.path, content)?;

        self.generated_at = Some(generated_at);
        Ok(())
    }
}

/// Unique identifiers and per-recording invariants.
fn check_recordings(recordings: &[Recording]) -> StoreResult<()> {
    let mut seen = HashSet::new();

    for recording in recordings {
        if !seen.insert(recording.identifier()) {
            return Err(StoreError::DuplicateIdentifier(recording.identifier().to_string()));
        }
        recording
            .check_invariants()
            .map_err(|message| StoreError::Corrupt {
                identifier: recording.identifier().to_string(),
                message,
            })?;
    }

    Ok(())
}
