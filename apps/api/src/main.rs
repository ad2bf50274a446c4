mod analysis;
mod config;
mod errors;
mod extraction;
mod llm_client;
mod models;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::score::PercentPatternExtractor;
use crate::config::Config;
use crate::llm_client::build_completion_client;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed numeric env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Screener API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize completion client
    let completion = build_completion_client(&config)?;
    if completion.is_configured() {
        info!(
            "Completion client initialized (model: {}, temperature: {})",
            config.openai_model,
            llm_client::TEMPERATURE
        );
    } else {
        error!("OpenAI API key is missing. Please set OPENAI_API_KEY; analysis is disabled.");
    }

    // Initialize score extractor (percent pattern scrape by default)
    let score_extractor = Arc::new(PercentPatternExtractor);

    info!(
        "Prompt limits: resume={} chars, job description={} chars; concurrency={}",
        config.max_resume_chars, config.max_job_description_chars, config.analysis_concurrency
    );

    // Build app state
    let state = AppState {
        completion,
        score_extractor,
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
