//! # Sermondex - sermon recording catalog
//!
//! Turns a directory of dated audio files into a tagged, queryable catalog.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ Identifiers │────▶│   Parser    │────▶│ Classifier  │────▶│   Catalog   │
//! │ (.mp3 list) │     │ (date+title)│     │ (taxonomy)  │     │ (JSON store)│
//! └─────────────┘     └─────────────┘     └─────────────┘     └──────┬──────┘
//!                                                                    │
//!                                         ┌─────────────┐     ┌──────▼──────┐
//!                                         │  HTTP API   │◀────│ Query/Stats │
//!                                         └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use sermondex::{
//!     evaluate, ingest_identifiers, presets, IngestOptions, QuerySpec, ThemeClassifier,
//! };
//!
//! let classifier = ThemeClassifier::new(Arc::new(presets::standard()));
//! let report = ingest_identifiers(
//!     ["2023-01-01_Grace_and_Faith.mp3", "2024-06-15_Healing_Power.mp3"],
//!     &classifier,
//!     &IngestOptions::default(),
//! );
//! let newest = evaluate(&report.recordings, &QuerySpec::new());
//! assert_eq!(newest[0].title(), "Healing Power");
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Domain models (Recording, CatalogStats)
//! - [`parser`] - Filename parsing and discovery
//! - [`taxonomy`] - Theme taxonomy, presets and classifier
//! - [`catalog`] - Statistics, queries, ingestion
//! - [`validation`] - JSON schema validation
//! - [`store`] - JSON catalog store
//! - [`location`] - Location reference resolution
//! - [`config`] - Runtime configuration
//! - [`api`] - HTTP API server

// Core modules
pub mod error;
pub mod models;

// Parsing and tagging
pub mod parser;
pub mod taxonomy;

// Catalog operations
pub mod catalog;

// Validation
pub mod validation;

// Persistence
pub mod store;

// Presentation
pub mod location;

// Configuration
pub mod config;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    PipelineError, PipelineResult, QueryError, QueryResult, ServerError, ServerResult, StoreError,
    StoreResult, TaxonomyError, TaxonomyResult,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{CatalogStats, DateRange, Recording, ThemeCount};

// =============================================================================
// Re-exports - Parser
// =============================================================================

pub use parser::{
    parse_identifier, parse_identifier_verbose, parse_listing, scan_directory,
    strip_audio_extension, ParsedFilename, SkipReason,
};

// =============================================================================
// Re-exports - Taxonomy
// =============================================================================

pub use taxonomy::{presets, Taxonomy, ThemeClassifier, ThemeRule, GENERAL_THEME};

// =============================================================================
// Re-exports - Catalog
// =============================================================================

pub use catalog::{
    aggregate, evaluate, evaluate_params, ingest_identifiers, ingest_source, keyword_frequencies,
    retag, theme_listing, IngestOptions, IngestReport, QueryParams, QuerySpec, RetagReport, SortKey,
};

// =============================================================================
// Re-exports - Validation
// =============================================================================

pub use validation::{validate, validate_catalog_document, validate_taxonomy_document};

// =============================================================================
// Re-exports - Store, location, config
// =============================================================================

pub use config::{AppConfig, CatalogArgs, TaxonomySource};
pub use location::{BaseUrlResolver, LocationResolver, PassthroughResolver};
pub use store::CatalogStore;

// Server
pub mod server {
    pub use crate::api::server::{build_router, start_server};
}
