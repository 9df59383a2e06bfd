//! Product catalog service.
//!
//! Reads the catalog document from disk and caches the parsed catalog using
//! `moka` (1-minute TTL), so edits to the file go live without a restart.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tracing::{debug, instrument};

use paw_paradise_core::{Catalog, CatalogError};

/// How long a parsed catalog is served before the file is read again.
const CATALOG_TTL: Duration = Duration::from_secs(60);

/// Errors that can occur while loading the catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogServiceError {
    #[error("failed to read catalog file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid catalog file {path}: {source}")]
    Invalid {
        path: PathBuf,
        source: CatalogError,
    },
}

/// Cached access to the product catalog.
#[derive(Clone)]
pub struct CatalogService {
    path: Arc<PathBuf>,
    cache: Cache<PathBuf, Arc<Catalog>>,
}

impl CatalogService {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let cache = Cache::builder()
            .max_capacity(1)
            .time_to_live(CATALOG_TTL)
            .build();

        Self {
            path: Arc::new(path.into()),
            cache,
        }
    }

    /// Path of the catalog document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the catalog, reading the file if the cached copy expired.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid catalog.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub async fn catalog(&self) -> Result<Arc<Catalog>, CatalogServiceError> {
        if let Some(cached) = self.cache.get(self.path.as_ref()).await {
            debug!("Cache hit for catalog");
            return Ok(cached);
        }

        let catalog = Arc::new(load(&self.path).await?);
        debug!(products = catalog.len(), "Loaded catalog from disk");

        self.cache
            .insert(self.path.as_ref().clone(), Arc::clone(&catalog))
            .await;

        Ok(catalog)
    }
}

/// Read and parse a catalog document.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid catalog.
pub async fn load(path: &Path) -> Result<Catalog, CatalogServiceError> {
    let json = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CatalogServiceError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    Catalog::from_json(&json).map_err(|source| CatalogServiceError::Invalid {
        path: path.to_path_buf(),
        source,
    })
}
