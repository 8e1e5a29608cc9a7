mod analysis;
mod config;
mod db;
mod errors;
mod llm_client;
mod models;
mod news;
mod reviews;
mod routes;
mod state;
mod users;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::extractor::PdfTextExtractor;
use crate::analysis::AnalysisPipeline;
use crate::config::Config;
use crate::db::{create_pool, ensure_schema};
use crate::llm_client::CohereClient;
use crate::news::NewsClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Career API v{}", env!("CARGO_PKG_VERSION"));

    // Upload directory for resume PDFs awaiting analysis
    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .with_context(|| {
            format!(
                "Failed to create upload directory {}",
                config.upload_dir.display()
            )
        })?;

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    ensure_schema(&db).await?;

    // Initialize completion client
    let completion = CohereClient::new(
        config.cohere_api_key.clone(),
        config.cohere_base_url.clone(),
    )?;
    if !completion.has_api_key() {
        warn!("COHERE_API_KEY is not set; analysis requests will fail");
    }

    let pipeline = AnalysisPipeline::new(Arc::new(completion), Arc::new(PdfTextExtractor));
    info!(
        "Analysis pipeline initialized (model: {}, temperature: {})",
        pipeline.params().model,
        pipeline.params().temperature
    );

    // Initialize news proxy
    let news = NewsClient::new(config.news_api_key.clone())?;
    if config.news_api_key.is_none() {
        warn!("NEWS_API_KEY is not set; /api/news will return a configuration error");
    }

    // Build app state
    let state = AppState {
        db,
        pipeline: Arc::new(pipeline),
        news,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
