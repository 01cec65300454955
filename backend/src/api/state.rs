//! Shared server state.
//!
//! The catalog snapshot sits behind an async `RwLock`: queries take a read
//! guard, `POST /api/reload` swaps in a freshly loaded snapshot.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::catalog::pipeline::RetagReport;
use crate::catalog::stats::aggregate;
use crate::config::AppConfig;
use crate::error::{PipelineResult, ServerError, ServerResult, StoreResult};
use crate::location::{resolver_for, LocationResolver};
use crate::models::{CatalogStats, Recording};
use crate::store::CatalogStore;
use crate::taxonomy::{Taxonomy, ThemeClassifier};

/// Recordings plus their precomputed statistics.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    pub recordings: Vec<Recording>,
    pub stats: CatalogStats,
}

impl CatalogSnapshot {
    pub fn new(recordings: Vec<Recording>) -> Self {
        let stats = aggregate(&recordings);
        Self { recordings, stats }
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    catalog: Arc<RwLock<CatalogSnapshot>>,
    classifier: ThemeClassifier,
    resolver: Arc<dyn LocationResolver>,
    catalog_path: PathBuf,
}

impl AppState {
    pub fn new(
        snapshot: CatalogSnapshot,
        classifier: ThemeClassifier,
        resolver: Arc<dyn LocationResolver>,
        catalog_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            catalog: Arc::new(RwLock::new(snapshot)),
            classifier,
            resolver,
            catalog_path: catalog_path.into(),
        }
    }

    /// Load the taxonomy and the catalog described by `config`, re-tagging
    /// the catalog so served themes match the taxonomy.
    pub fn load(config: &AppConfig) -> PipelineResult<Self> {
        let classifier = config.taxonomy.classifier()?;
        let (snapshot, report) = load_snapshot(&config.catalog_path, &classifier)?;
        tracing::info!(
            catalog = %config.catalog_path.display(),
            recordings = report.total,
            retagged = report.changed,
            "catalog loaded"
        );

        let resolver: Arc<dyn LocationResolver> =
            Arc::from(resolver_for(config.public_base_url.as_deref()));

        Ok(Self::new(snapshot, classifier, resolver, config.catalog_path.clone()))
    }

    /// Read access to the current snapshot.
    pub async fn catalog(&self) -> tokio::sync::RwLockReadGuard<'_, CatalogSnapshot> {
        self.catalog.read().await
    }

    pub fn classifier(&self) -> &ThemeClassifier {
        &self.classifier
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        self.classifier.taxonomy()
    }

    pub fn resolver(&self) -> &dyn LocationResolver {
        self.resolver.as_ref()
    }

    /// Re-read the catalog file, re-tag it and swap it in.
    ///
    /// File reads and validation run on the blocking pool.
    pub async fn reload(&self) -> ServerResult<RetagReport> {
        let path = self.catalog_path.clone();
        let classifier = self.classifier.clone();

        let task = tokio::task::spawn_blocking(move || load_snapshot(&path, &classifier));
        let (snapshot, report) = task
            .await
            .map_err(|e| ServerError::Internal(format!("catalog reload task failed: {}", e)))??;

        *self.catalog.write().await = snapshot;
        Ok(report)
    }
}

fn load_snapshot(
    path: &Path,
    classifier: &ThemeClassifier,
) -> StoreResult<(CatalogSnapshot, RetagReport)> {
    let (store, report) = CatalogStore::open_tagged(path, classifier)?;
    Ok((CatalogSnapshot::new(store.into_recordings()), report))
}
