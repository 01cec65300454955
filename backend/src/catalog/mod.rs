//! Operations over a recording collection.
//!
//! - [`stats`] - Aggregate counts, the theme listing and title keywords
//! - [`query`] - Search, theme filter, sort and limit
//! - [`pipeline`] - Ingestion from identifiers and batch re-tagging

pub mod pipeline;
pub mod query;
pub mod stats;

pub use pipeline::{
    ingest_identifiers, ingest_source, location_ref_for, retag, IngestOptions, IngestReport,
    RetagReport, SkippedIdentifier,
};
pub use query::{evaluate, evaluate_params, QueryParams, QuerySpec, SortKey};
pub use stats::{
    aggregate, coverage_percent, keyword_frequencies, theme_listing, title_keywords, top_years,
};
