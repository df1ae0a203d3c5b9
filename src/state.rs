use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use crate::catalog::CatalogStore;
use crate::core::fetch::{build_client, DEFAULT_FETCH_TIMEOUT_SECS};
use crate::core::pipeline::ProductMatcher;
use crate::error::Result;
use crate::models::product::EMBEDDING_DIM;

#[cfg(feature = "embeddings")]
use crate::core::embeddings::{ClipEncoder, ImageEncoder};

/// Configuration for the application
#[derive(Clone, Debug)]
pub struct Config {
    /// Address the HTTP server binds to
    pub addr: SocketAddr,
    /// Path of the JSONL catalog file
    pub catalog_path: PathBuf,
    /// Path of the TorchScript encoder export
    pub model_path: PathBuf,
    /// Bound on a single image URL fetch, in seconds
    pub fetch_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            catalog_path: PathBuf::from("data/catalog.jsonl"),
            model_path: PathBuf::from("models/clip_visual.pt"),
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Build a configuration from environment variables, falling back to
    /// defaults for anything unset. Unparsable values are logged and
    /// ignored rather than aborting startup.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("MATCHLENS_ADDR") {
            match addr.parse() {
                Ok(addr) => config.addr = addr,
                Err(e) => log::warn!("Ignoring invalid MATCHLENS_ADDR {:?}: {}", addr, e),
            }
        }
        if let Ok(path) = std::env::var("MATCHLENS_DB") {
            config.catalog_path = PathBuf::from(path);
        }
        if let Ok(path) = std::env::var("MATCHLENS_MODEL") {
            config.model_path = PathBuf::from(path);
        }
        if let Ok(secs) = std::env::var("MATCHLENS_FETCH_TIMEOUT_SECS") {
            match secs.parse() {
                Ok(secs) => config.fetch_timeout_secs = secs,
                Err(e) => log::warn!(
                    "Ignoring invalid MATCHLENS_FETCH_TIMEOUT_SECS {:?}: {}",
                    secs,
                    e
                ),
            }
        }

        config
    }
}

/// Application state that can be shared across handlers
#[derive(Debug)]
pub struct AppState {
    /// Application configuration
    pub config: Config,
    /// Shared similarity-search core
    pub matcher: ProductMatcher,
}

impl AppState {
    /// Open the catalog and load the encoder once, then wire up the
    /// pipelines.
    ///
    /// A missing or unloadable model is not fatal: the state comes up with
    /// search degraded (`EncodingUnavailable`) while catalog browsing and
    /// the health check keep working.
    pub async fn from_config(config: Config) -> Result<Arc<Self>> {
        let catalog = Arc::new(CatalogStore::open(&config.catalog_path, EMBEDDING_DIM).await?);
        let client = build_client(config.fetch_timeout_secs);

        #[cfg(feature = "embeddings")]
        let encoder = match ClipEncoder::load(&config.model_path) {
            Ok(encoder) => Some(Arc::new(encoder) as Arc<dyn ImageEncoder>),
            Err(e) => {
                log::error!("{}", e);
                log::warn!("Search will be unavailable until the model is provided");
                None
            }
        };
        #[cfg(not(feature = "embeddings"))]
        let encoder = {
            log::warn!("Built without the embeddings feature; search is unavailable");
            None
        };

        let matcher = ProductMatcher::new(encoder, client, catalog);

        Ok(Arc::new(Self { config, matcher }))
    }
}
