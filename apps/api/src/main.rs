mod analysis;
mod config;
mod db;
mod enhance;
mod errors;
mod export;
mod llm_client;
mod matching;
mod models;
mod parser;
mod routes;
mod state;
mod store;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::export::renderer::TypstCliRenderer;
use crate::llm_client::{LlmClient, TextGenerator};
use crate::matching::selector::{KeywordSelector, LlmSelector, SelectorBackend, VariationSelector};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Tailor API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize SQLite (schema is created on first start)
    let db = create_pool(&config.database_url).await?;

    // Initialize text-generation client
    let llm: Arc<dyn TextGenerator> = Arc::new(LlmClient::new(
        config.openai_api_key.clone(),
        config.openai_model.clone(),
        &config.openai_base_url,
        config.llm_max_retries,
    )?);
    info!(
        "LLM client initialized (model: {}, retries: {})",
        llm.model(),
        config.llm_max_retries
    );

    // Variation selector (LlmSelector by default, swap via MATCHER_BACKEND=keyword)
    let selector: Arc<dyn VariationSelector> = match config.matcher_backend {
        SelectorBackend::Llm => Arc::new(LlmSelector::new(llm.clone())),
        SelectorBackend::Keyword => Arc::new(KeywordSelector),
    };
    info!("Matcher backend: {:?}", selector.backend());

    let renderer = Arc::new(TypstCliRenderer::new(config.typst_bin.clone()));
    info!("PDF renderer: {}", config.typst_bin);

    let state = AppState {
        db,
        llm,
        config: config.clone(),
        selector,
        renderer,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
