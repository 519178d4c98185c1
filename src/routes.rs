use axum::{
    extract::State,
    routing::{get, post},
    Router,
    Json,
};
use serde_json::{json, Value};
use tracing::info;

use crate::state::AppState;

/// Acknowledgment returned by the greet command
pub const GREET_ACK: &str = "Greeting executed successfully.";

pub fn create_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/api/health", get(health_check))

        // The single command: run the greeting once
        .route("/greet", post(greet_user))
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn greet_user(State(state): State<AppState>) -> &'static str {
    let _guard = state.greet_lock.lock().await;

    info!("Executing greet command...");
    state.greeting_service.run().await;
    GREET_ACK
}
