use std::sync::Arc;

use crate::{
    config::OrderingConfig,
    store::{DocumentStore, MemoryStore},
};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub ordering: OrderingConfig,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, ordering: OrderingConfig) -> Self {
        Self { store, ordering }
    }

    /// State backed by a fresh [`MemoryStore`] with default ordering settings.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()), OrderingConfig::default())
    }
}
