//! Error types for the sermondex catalog.
//!
//! This module defines the error hierarchy used across the crate:
//!
//! - [`TaxonomyError`] - Taxonomy loading and validation errors
//! - [`QueryError`] - Query specification validation errors
//! - [`StoreError`] - Catalog store errors
//! - [`PipelineError`] - Ingestion orchestration errors
//! - [`ServerError`] - HTTP boundary errors
//!
//! Unparseable filenames are skipped, not failed (see
//! [`crate::parser::SkipReason`]). The classifier, the aggregator and the
//! evaluator's filtering steps cannot fail.
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// Taxonomy Errors
// =============================================================================

/// Errors while loading or validating a taxonomy.
#[derive(Debug, Error)]
pub enum TaxonomyError {
    /// Failed to read taxonomy file.
    #[error("Failed to read taxonomy file: {0}")]
    IoError(#[from] std::io::Error),

    /// Taxonomy JSON could not be parsed.
    #[error("Invalid taxonomy JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Document does not match the taxonomy schema.
    #[error("Taxonomy schema violation: {}", .0.join("; "))]
    Schema(Vec<String>),

    /// Two themes share a name.
    #[error("Duplicate theme: {0}")]
    DuplicateTheme(String),

    /// A theme has an empty name.
    #[error("Theme at position {0} has an empty name")]
    EmptyThemeName(usize),

    /// A theme has no keywords.
    #[error("Theme '{0}' has no keywords")]
    NoKeywords(String),

    /// An empty keyword would match every title.
    #[error("Theme '{0}' has an empty keyword")]
    EmptyKeyword(String),

    /// The fallback theme name is reserved.
    #[error("Theme name '{0}' is reserved for untagged recordings")]
    ReservedTheme(String),

    /// Unknown built-in preset.
    #[error("Unknown taxonomy preset: {0} (expected 'standard' or 'legacy')")]
    UnknownPreset(String),
}

// =============================================================================
// Query Errors
// =============================================================================

/// Validation errors for a query specification.
///
/// Raised before any filtering or sorting happens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// Sort key not in the supported set.
    #[error("Unknown sort key '{0}' (expected one of: newest, oldest, title, title-desc)")]
    UnknownSortKey(String),

    /// Limit must be a positive integer.
    #[error("Invalid limit {0}: must be a positive integer")]
    InvalidLimit(i64),

    /// Theme filter entry is blank.
    #[error("Theme filter contains an empty theme name")]
    EmptyTheme,
}

// =============================================================================
// Store Errors
// =============================================================================

/// Errors from the catalog store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// IO error.
    #[error("Catalog IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON error.
    #[error("Catalog JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Document does not match the catalog schema.
    #[error("Catalog schema violation: {}", .0.join("; "))]
    Schema(Vec<String>),

    /// Two recordings share an identifier.
    #[error("Duplicate identifier in catalog: {0}")]
    DuplicateIdentifier(String),

    /// A stored recording breaks a model invariant.
    #[error("Corrupt recording '{identifier}': {message}")]
    Corrupt { identifier: String, message: String },
}

// =============================================================================
// Pipeline Errors
// =============================================================================

/// Ingestion orchestration errors.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Failed to read the discovery source.
    #[error("Failed to read source '{path}': {source}")]
    Source {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Taxonomy error.
    #[error("Taxonomy error: {0}")]
    Taxonomy(#[from] TaxonomyError),

    /// Store error.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Nothing in the source looked like a recording.
    #[error("No recordings found ({0} identifiers skipped)")]
    EmptyInput(usize),
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Query validation failed.
    #[error("Invalid query: {0}")]
    Query(#[from] QueryError),

    /// Store error.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Invalid request.
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Server internal error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ServerError {
    /// Whether the caller is at fault (4xx) rather than the server (5xx).
    pub fn is_client_error(&self) -> bool {
        matches!(self, ServerError::Query(_) | ServerError::BadRequest(_))
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for taxonomy operations.
pub type TaxonomyResult<T> = Result<T, TaxonomyError>;

/// Result type for query validation.
pub type QueryResult<T> = Result<T, QueryError>;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;
