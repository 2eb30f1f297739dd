use std::sync::Arc;

use sqlx::PgPool;

use crate::classification::batch::BatchClassifier;
use crate::classification::cache::TitleCache;
use crate::config::Config;
use crate::llm_client::LlmClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub llm: LlmClient,
    pub config: Config,
    /// Shared bounded LRU of title classifications. Passed by reference to
    /// the pipeline instead of living as a process global.
    pub title_cache: Arc<TitleCache>,
    /// Pluggable batch classifier. Production: LlmBatchClassifier; tests
    /// exercise the upload pipeline with stub backends.
    pub batch_classifier: Arc<dyn BatchClassifier>,
}
