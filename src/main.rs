mod config;
mod error;
mod handlers;
mod models;
mod presentation;
mod server;
mod services;

use anyhow::{Context, Result};
use dotenv::dotenv;
use std::sync::Arc;

use config::Config;
use handlers::{DetailedScanHandler, LlavaScanHandler, QuickScanHandler};
use server::{create_router, AppState};
use services::{OpenAIService, ReplicateClient};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables before the logger reads RUST_LOG
    dotenv().ok();
    env_logger::init();

    log::info!("🚀 Starting Food Calorie Scanner...");

    let config = Config::from_env()?;

    let replicate = Arc::new(ReplicateClient::new(
        config.replicate_api_token.clone(),
        config.replicate_base_url.clone(),
    ));
    log::info!("✅ Replicate client initialized ({})", config.replicate_base_url);

    let openai = Arc::new(OpenAIService::new(
        config.openai_api_key.clone(),
        config.openai_model.clone(),
        config.openai_base_url.clone(),
    ));
    log::info!("✅ OpenAI service initialized with model: {}", config.openai_model);

    let state = Arc::new(AppState {
        quick: Arc::new(QuickScanHandler::new(replicate.clone())),
        detailed: Arc::new(DetailedScanHandler::new(openai)),
        llava: Arc::new(LlavaScanHandler::new(replicate)),
    });

    let app = create_router(state, config.max_body_bytes);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;

    log::info!("🌐 Server listening on http://{}", config.bind_addr);
    log::info!("   POST /api/food-analysis/{{quick-scan,detailed-scan,llava-scan}}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            log::info!("🛑 Shutting down...");
        })
        .await?;

    Ok(())
}
