use std::sync::Arc;

use sqlx::PgPool;

use crate::analysis::AnalysisPipeline;
use crate::config::Config;
use crate::news::NewsClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Stateless; one run per request. Owns the completion client and text extractor.
    pub pipeline: Arc<AnalysisPipeline>,
    pub news: NewsClient,
    pub config: Config,
}
