use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::Config;
use crate::services::catalog::CatalogSource;
use crate::services::{BuildOptions, CorpusSnapshot, Recommender, SnapshotStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub recommender: Recommender,
    pub catalog: Arc<dyn CatalogSource>,
    pub build_options: BuildOptions,
    pub title_list_limit: usize,
    /// Held for the duration of a rebuild
    pub rebuild_lock: Arc<Mutex<()>>,
}

impl AppState {
    /// Creates state serving `snapshot`, rebuilding from `catalog` on demand
    pub fn new(config: &Config, catalog: Arc<dyn CatalogSource>, snapshot: CorpusSnapshot) -> Self {
        let store = SnapshotStore::new(snapshot);
        Self {
            recommender: Recommender::new(store, config.recommendation_count),
            catalog,
            build_options: BuildOptions::default().with_max_features(config.max_features),
            title_list_limit: config.title_list_limit,
            rebuild_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn store(&self) -> &SnapshotStore {
        self.recommender.store()
    }
}
