//! Runtime configuration.
//!
//! Every setting comes from a CLI flag that falls back to an environment
//! variable. `main` loads `.env` with `dotenvy` before parsing, so a `.env`
//! file works too.
//!
//! | Variable                    | Default                   |
//! |-----------------------------|---------------------------|
//! | `SERMONDEX_CATALOG`         | `.sermondex/catalog.json` |
//! | `SERMONDEX_TAXONOMY`        | (none)                    |
//! | `SERMONDEX_PRESET`          | `standard`                |
//! | `SERMONDEX_LOCATION_PREFIX` | `recordings`              |
//! | `SERMONDEX_PUBLIC_BASE_URL` | (none)                    |
//! | `PORT`                      | `3000`                    |

use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::TaxonomyResult;
use crate::taxonomy::{Taxonomy, ThemeClassifier};

pub use crate::catalog::pipeline::DEFAULT_LOCATION_PREFIX;
pub use crate::store::DEFAULT_CATALOG_PATH;

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 3000;

/// Built-in taxonomy used when no file is given
pub const DEFAULT_PRESET: &str = "standard";

/// Log filter used when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "sermondex=info,tower_http=info";

/// Flags shared by every subcommand.
#[derive(Debug, Clone, Args)]
pub struct CatalogArgs {
    /// Catalog JSON file
    #[arg(long, global = true, env = "SERMONDEX_CATALOG", default_value = DEFAULT_CATALOG_PATH)]
    pub catalog: PathBuf,

    /// Taxonomy JSON file (overrides --preset)
    #[arg(long, global = true, env = "SERMONDEX_TAXONOMY")]
    pub taxonomy: Option<PathBuf>,

    /// Built-in taxonomy: standard or legacy
    #[arg(long, global = true, env = "SERMONDEX_PRESET", default_value = DEFAULT_PRESET)]
    pub preset: String,
}

impl CatalogArgs {
    pub fn taxonomy_source(&self) -> TaxonomySource {
        match &self.taxonomy {
            Some(path) => TaxonomySource::File(path.clone()),
            None => TaxonomySource::Preset(self.preset.clone()),
        }
    }
}

/// Where the taxonomy comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaxonomySource {
    Preset(String),
    File(PathBuf),
}

impl TaxonomySource {
    /// Load and validate the taxonomy once, frozen for sharing.
    pub fn load(&self) -> TaxonomyResult<Arc<Taxonomy>> {
        let taxonomy = match self {
            TaxonomySource::Preset(name) => Taxonomy::preset(name)?,
            TaxonomySource::File(path) => Taxonomy::from_file(path)?,
        };
        tracing::info!(
            taxonomy = %taxonomy.name,
            version = %taxonomy.version,
            themes = taxonomy.themes.len(),
            "taxonomy loaded"
        );
        Ok(Arc::new(taxonomy))
    }

    pub fn classifier(&self) -> TaxonomyResult<ThemeClassifier> {
        Ok(ThemeClassifier::new(self.load()?))
    }
}

impl Default for TaxonomySource {
    fn default() -> Self {
        TaxonomySource::Preset(DEFAULT_PRESET.to_string())
    }
}

/// Everything the HTTP server needs.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub catalog_path: PathBuf,
    pub taxonomy: TaxonomySource,
    pub port: u16,
    /// Base URL joined onto relative location references in responses.
    pub public_base_url: Option<String>,
}

impl AppConfig {
    pub fn new(args: &CatalogArgs, port: u16, public_base_url: Option<String>) -> Self {
        Self {
            catalog_path: args.catalog.clone(),
            taxonomy: args.taxonomy_source(),
            port,
            public_base_url,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            taxonomy: TaxonomySource::default(),
            port: DEFAULT_PORT,
            public_base_url: None,
        }
    }
}
