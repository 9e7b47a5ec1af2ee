use std::sync::Arc;

use anyhow::Result;
use tracing::warn;

use crate::config::Config;
use crate::store::{ContentStore, MemoryStore, PgStore};

/// Shared, immutable application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn ContentStore>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn ContentStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }

    /// Connect the configured store: PostgreSQL when `DATABASE_URL` is set,
    /// otherwise an empty in-memory store.
    pub async fn from_config(config: Config) -> Result<Self> {
        let store: Arc<dyn ContentStore> = match &config.database_url {
            Some(url) => {
                let store = PgStore::connect(url, config.database_max_connections).await?;
                store.migrate().await?;
                Arc::new(store)
            }
            None => {
                warn!("DATABASE_URL not set, using in-memory store (content is not persisted)");
                Arc::new(MemoryStore::new())
            }
        };

        Ok(Self::new(config, store))
    }
}
