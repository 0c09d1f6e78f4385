use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use dotenvy::dotenv;
use tracing::{error, info};

mod config;
mod handlers;
mod llm;
mod persona;
mod pipeline;
mod state;
mod utils;
mod wizard;

use config::Config;
use llm::OpenAiClient;
use persona::ReferenceSet;
use pipeline::MatchPipeline;
use state::AppState;
use utils::logging::init_logging;

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {err}");
    }
    info!("Shutdown signal received");
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let references = ReferenceSet::load(&config.egen_example_path, &config.teto_example_path)
        .context("Failed to load reference examples")?;

    let client = Arc::new(OpenAiClient::from_config(&config));
    let pipeline = MatchPipeline::new(Arc::new(references), client.clone(), client);
    let bind_address = config.bind_address.clone();
    let state = AppState::new(Arc::new(config), pipeline);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {bind_address}"))?;
    info!("Persona match form listening on http://{}", bind_address);

    axum::serve(listener, handlers::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();

    let config = match Config::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("❌ {err}");
            return ExitCode::FAILURE;
        }
    };
    let _guards = init_logging(&config.log_level);
    info!(
        "Starting persona match (completion_model={}, image_model={})",
        config.completion_model, config.image_model
    );

    match serve(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            eprintln!("❌ {err:#}");
            ExitCode::FAILURE
        }
    }
}
