use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::clients::{FacilityLookup, build_lookup};
use crate::config::Config;
use crate::db::Store;
use crate::services::{DirectoryService, InMemoryDirectoryService};

/// HTTP client shared by the places lookup and the CLI commands.
pub fn build_shared_http_client(timeout_seconds: u64) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .user_agent(concat!("HealthFinder/", env!("CARGO_PKG_VERSION")))
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))
}

/// Everything constructed once at process start and shared by every request.
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub lookup: Arc<dyn FacilityLookup>,

    pub directory: Arc<dyn DirectoryService>,
}

impl SharedState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let http_client = build_shared_http_client(config.places.request_timeout_seconds)?;
        let lookup = build_lookup(&config.places, http_client)?;
        Ok(Self::with_lookup(config, lookup))
    }

    /// Wires the state around an explicit lookup collaborator.
    #[must_use]
    pub fn with_lookup(config: Config, lookup: Arc<dyn FacilityLookup>) -> Self {
        let store = Store::new();

        info!(provider = lookup.name(), "Facility lookup provider selected");
        if config.places.provider == crate::config::PlacesProvider::Google
            && config.places.credential().is_none()
        {
            tracing::warn!(
                "No places API key configured; facility searches will fail until {} is set",
                crate::config::PLACES_API_KEY_ENV
            );
        }

        let directory: Arc<dyn DirectoryService> =
            Arc::new(InMemoryDirectoryService::new(store.clone(), lookup.clone()));

        Self {
            config: Arc::new(config),
            store,
            lookup,
            directory,
        }
    }
}
