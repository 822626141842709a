//! Startup selection of the remote store.
//!
//! The choice is made once from configuration. There are no retries and no
//! reconnects: if the remote store is not usable at startup the process runs on
//! the local store until it exits.

use std::sync::Arc;

use serde::Serialize;

use super::{DocumentStore, MemoryDocumentStore, StoreError, StoreResult};

/// Connection state fixed at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendMode {
    Connected,
    LocalFallback,
}

/// Resolve the configured remote store, falling back to `None` on any problem.
pub async fn connect_remote(
    remote_url: Option<&str>,
    database: &str,
) -> Option<Arc<dyn DocumentStore>> {
    let Some(url) = remote_url else {
        tracing::info!("No remote store configured, using local storage fallback");
        return None;
    };

    match try_connect(url, database).await {
        Ok(store) => {
            tracing::info!("Remote store connected ({})", store.backend_type());
            Some(store)
        }
        Err(e) => {
            tracing::warn!("Remote store unavailable, using local storage fallback: {}", e);
            None
        }
    }
}

async fn try_connect(url: &str, database: &str) -> StoreResult<Arc<dyn DocumentStore>> {
    let store: Arc<dyn DocumentStore> = if url.starts_with("memory://") {
        Arc::new(MemoryDocumentStore::new())
    } else if url.starts_with("mongodb://") || url.starts_with("mongodb+srv://") {
        connect_mongo(url, database).await?
    } else {
        return Err(StoreError::BackendUnavailable(
            "unsupported remote store URL scheme".to_string(),
        ));
    };

    store.ping().await?;
    Ok(store)
}

#[cfg(feature = "remote-mongodb")]
async fn connect_mongo(url: &str, database: &str) -> StoreResult<Arc<dyn DocumentStore>> {
    let store = super::MongoDocumentStore::connect(url, database).await?;
    Ok(Arc::new(store))
}

#[cfg(not(feature = "remote-mongodb"))]
async fn connect_mongo(_url: &str, _database: &str) -> StoreResult<Arc<dyn DocumentStore>> {
    Err(StoreError::BackendUnavailable(
        "built without the remote-mongodb feature".to_string(),
    ))
}
