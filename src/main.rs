mod config;
mod greeting;
mod routes;
mod state;
mod translate;

use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, ServerConfig};
use greeting::{GreetingService, LocalClock, TimeGreetingService};
use state::AppState;
use translate::{DeepLTranslator, TranslateInterface, API_KEY_ENV};

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries only the greeting
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("greeting_app=info,tower_http=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config_path = AppConfig::locate()?;
    let config = AppConfig::load(&config_path)?;
    info!("Loaded configuration from: {}", config_path.display());

    let api_key = std::env::var(API_KEY_ENV).ok();
    let translator: Arc<dyn TranslateInterface> = Arc::new(DeepLTranslator::new(
        reqwest::Client::new(),
        &config.deepl,
        api_key,
    ));

    let time_greeting = Arc::new(TimeGreetingService::new(
        translator.clone(),
        Arc::new(LocalClock),
        config.greeting.language.clone(),
    ));
    let greeting_service = Arc::new(GreetingService::new(
        config.greeting.clone(),
        translator,
        time_greeting,
    ));

    greeting_service.run().await;

    if let Some(server) = &config.server {
        serve(server, AppState::new(greeting_service)).await?;
    }

    Ok(())
}

/// Keep running with the greet command exposed until Ctrl-C
async fn serve(server: &ServerConfig, app_state: AppState) -> Result<()> {
    let app = Router::new()
        .merge(routes::create_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    let listener = tokio::net::TcpListener::bind((server.host.as_str(), server.port)).await?;
    info!("Starting server on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await?;

    Ok(())
}
