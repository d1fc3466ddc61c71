//! Shared application state

use std::sync::Arc;

use crate::{
    config::Config,
    db::{MemoryStore, QueryExecutor},
    services::ListingService,
    Error, Result,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub listing: Arc<ListingService>,
}

impl AppState {
    /// State backed by the in-memory store, seeded from `store.seed_path`
    /// when configured.
    pub async fn new(config: Config) -> Result<Self> {
        let store = match &config.store.seed_path {
            Some(path) => {
                let store = MemoryStore::from_seed_file(path).await?;
                tracing::info!(seed_path = %path, "Seeded in-memory store");
                store
            }
            None => MemoryStore::new(),
        };
        Self::with_executor(config, Arc::new(store))
    }

    pub fn with_executor(config: Config, executor: Arc<dyn QueryExecutor>) -> Result<Self> {
        let offset = config.filters.offset().ok_or_else(|| {
            Error::Validation(format!(
                "filters.utc_offset_minutes out of range: {}",
                config.filters.utc_offset_minutes
            ))
        })?;

        let listing = ListingService::new(executor)
            .with_paging(config.paging.defaults())
            .with_composition(config.filters.composition)
            .with_offset(offset);

        Ok(Self {
            config: Arc::new(config),
            listing: Arc::new(listing),
        })
    }
}
