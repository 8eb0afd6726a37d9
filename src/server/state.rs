//! Shared server state

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::info;

use crate::error::{PipelineError, Result};
use crate::model_store::ModelStore;
use crate::training::PriceModel;

/// Holds the model store and the model loaded from it on first use.
pub struct AppState {
    store: Arc<dyn ModelStore>,
    model: OnceCell<Arc<PriceModel>>,
}

impl AppState {
    pub fn new(store: Arc<dyn ModelStore>) -> Self {
        Self {
            store,
            model: OnceCell::new(),
        }
    }

    /// Returns the shared model, loading it if no request has yet.
    ///
    /// Concurrent callers wait on a single load, which runs on the blocking
    /// pool. A failed load leaves the cell empty so the next request tries again.
    pub async fn model(&self) -> Result<Arc<PriceModel>> {
        let model = self
            .model
            .get_or_try_init(|| async {
                info!("Loading price model");
                let store = Arc::clone(&self.store);
                let model = tokio::task::spawn_blocking(move || store.load_model()).await??;
                Ok::<_, PipelineError>(Arc::new(model))
            })
            .await?;
        Ok(Arc::clone(model))
    }

    pub fn is_model_loaded(&self) -> bool {
        self.model.initialized()
    }
}
