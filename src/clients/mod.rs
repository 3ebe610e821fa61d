//! Facility lookup collaborators.
//!
//! The directory service depends only on [`FacilityLookup`]; which
//! implementation backs it is decided once from configuration.

pub mod catalog;
pub mod places;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::config::{PlacesConfig, PlacesProvider};
use crate::domain::Coordinates;
use crate::models::NewFacility;

pub use catalog::LocalCatalog;
pub use places::PlacesClient;

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Lookup provider is not configured: {0}")]
    Configuration(String),

    #[error("Lookup provider returned {status}: {message}")]
    Upstream { status: String, message: String },

    #[error("Lookup request failed: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

/// A normalized search request handed to a collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupQuery {
    pub text: String,
    pub location: Option<Coordinates>,
    pub limit: usize,
}

#[async_trait]
pub trait FacilityLookup: Send + Sync {
    /// Short name used in logs and metrics labels.
    fn name(&self) -> &'static str;

    /// Returns normalized facilities matching the query, at most
    /// `query.limit` of them.
    async fn lookup(&self, query: &LookupQuery) -> Result<Vec<NewFacility>, LookupError>;
}

/// Builds the collaborator selected by `[places] provider`.
pub fn build_lookup(
    config: &PlacesConfig,
    http: reqwest::Client,
) -> anyhow::Result<Arc<dyn FacilityLookup>> {
    Ok(match config.provider {
        PlacesProvider::Google => Arc::new(PlacesClient::from_config(config, http)?),
        PlacesProvider::Catalog => Arc::new(LocalCatalog::new()),
    })
}
