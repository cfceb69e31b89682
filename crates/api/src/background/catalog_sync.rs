//! Periodic catalog refresh from a remote source.
//!
//! The source serves a versioned catalog document. A newer version is
//! validated, written to the catalog tables and then swapped into the
//! in-memory [`CatalogStore`]. Any failure keeps the current snapshot.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use idolsim_core::catalog::{CatalogDocument, CatalogSnapshot, CatalogStore};
use idolsim_core::error::CoreError;
use idolsim_db::repositories::CatalogRepo;
use serde::Deserialize;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

/// Catalog document tagged with its version, as served by the source.
#[derive(Debug, Clone, Deserialize)]
pub struct VersionedCatalog {
    pub version: u64,
    #[serde(flatten)]
    pub document: CatalogDocument,
}

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("Catalog fetch failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Catalog source returned status {0}")]
    Status(u16),

    #[error("Catalog store failed: {0}")]
    Db(#[from] sqlx::Error),

    #[error("Catalog rejected: {0}")]
    Core(#[from] CoreError),
}

/// Where catalog updates come from.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch(&self) -> Result<VersionedCatalog, SyncError>;
}

/// Fetches the catalog as JSON over HTTP with a bounded timeout.
pub struct HttpCatalogSource {
    client: reqwest::Client,
    url: String,
}

impl HttpCatalogSource {
    pub fn new(url: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn fetch(&self) -> Result<VersionedCatalog, SyncError> {
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::Status(status.as_u16()));
        }
        Ok(response.json::<VersionedCatalog>().await?)
    }
}

pub struct CatalogSync {
    pool: PgPool,
    store: Arc<CatalogStore>,
    source: Arc<dyn CatalogSource>,
    interval: Duration,
}

impl CatalogSync {
    pub fn new(
        pool: PgPool,
        store: Arc<CatalogStore>,
        source: Arc<dyn CatalogSource>,
        interval: Duration,
    ) -> Self {
        Self {
            pool,
            store,
            source,
            interval,
        }
    }

    /// Poll the source until `cancel` is triggered.
    pub async fn run(self, cancel: CancellationToken) {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            version = self.store.current().version(),
            "Catalog sync started"
        );

        let mut interval = tokio::time::interval(self.interval);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Catalog sync stopping");
                    break;
                }
                _ = interval.tick() => {
                    match self.sync_once().await {
                        Ok(true) => {}
                        Ok(false) => tracing::debug!("Catalog sync: already current"),
                        Err(e) => {
                            tracing::error!(
                                error = %e,
                                "Catalog sync failed, keeping current catalog"
                            );
                        }
                    }
                }
            }
        }
    }

    /// Fetch once and install a newer catalog. Returns whether it was installed.
    pub async fn sync_once(&self) -> Result<bool, SyncError> {
        let fetched = self.source.fetch().await?;
        let current = self.store.current().version();
        if fetched.version <= current {
            return Ok(false);
        }

        let snapshot = CatalogSnapshot::build(fetched.version, fetched.document.clone())?;
        CatalogRepo::upsert_document(&self.pool, &fetched.document).await?;
        let installed = self.store.install(snapshot);

        if installed {
            tracing::info!(from = current, to = fetched.version, "Catalog updated");
        }
        Ok(installed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn versioned_catalog_reads_flattened_document() {
        let json = serde_json::json!({
            "version": 7,
            "templates": [],
            "regions": [],
            "jobs": []
        });
        let parsed: VersionedCatalog = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.version, 7);
        assert!(parsed.document.templates.is_empty());
    }
}
