use std::sync::Arc;

use crate::config::{Config, StoreBackend};
use crate::evaluator::{self, FeedbackEvaluator};
use crate::store::{DataStore, MemoryStore, MongoStore};

pub mod auth_context;
pub mod profile_service;
pub mod progress_service;
pub mod session_service;
pub mod submission_service;
pub mod tips_service;

pub use auth_context::{AuthContext, Role};

pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn DataStore>,
    pub evaluator: Arc<dyn FeedbackEvaluator>,
}

impl AppState {
    pub fn new(
        config: Config,
        store: Arc<dyn DataStore>,
        evaluator: Arc<dyn FeedbackEvaluator>,
    ) -> Self {
        Self {
            config,
            store,
            evaluator,
        }
    }

    /// Connects the configured store backend and evaluator.
    pub async fn from_config(config: Config) -> anyhow::Result<Self> {
        let store: Arc<dyn DataStore> = match config.store_backend {
            StoreBackend::Mongo => {
                let client = mongodb::Client::with_uri_str(&config.mongo_uri).await?;
                let store = MongoStore::new(client.database(&config.mongo_database));

                tracing::info!("Pinging MongoDB...");
                tokio::time::timeout(std::time::Duration::from_secs(5), store.ping())
                    .await
                    .map_err(|_| anyhow::anyhow!("MongoDB ping timeout after 5s"))??;
                tracing::info!("MongoDB connected ({})", config.mongo_database);

                Arc::new(store)
            }
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory store, data is lost on restart");
                Arc::new(MemoryStore::new())
            }
        };

        let evaluator = evaluator::from_config(&config.evaluator)?;

        Ok(Self::new(config, store, evaluator))
    }
}
