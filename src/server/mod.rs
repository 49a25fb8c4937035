//! HTTP front-end for the chat pipeline.
//!
//! The handlers only translate between HTTP and [`ChatPipeline`]; all
//! moderation and provider logic lives in the pipeline.

use crate::error::ErrorKind;
use crate::pipeline::{ChatPipeline, ChatTurnResult, TurnOutcome};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tower_http::services::ServeDir;

#[derive(Clone)]
struct AppState {
    pipeline: Arc<ChatPipeline>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    message: &'static str,
}

/// Build the router. When `static_dir` is given, unmatched paths are served
/// from it (so `/` resolves to its `index.html`).
pub fn router(pipeline: Arc<ChatPipeline>, static_dir: Option<&Path>) -> Router {
    let app = Router::new()
        .route("/api/health", get(health))
        .route("/api/chat", post(chat))
        .with_state(AppState { pipeline });

    match static_dir {
        Some(dir) => {
            log::info!("[SERVER] Serving static files from {}", dir.display());
            app.fallback_service(ServeDir::new(dir))
        }
        None => app,
    }
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(
    addr: SocketAddr,
    pipeline: Arc<ChatPipeline>,
    static_dir: Option<&Path>,
) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("[SERVER] Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(pipeline, static_dir))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            log::info!("[SERVER] Shutting down");
        })
        .await
}

/// HTTP status for a finished turn.
pub fn status_for(result: &ChatTurnResult) -> StatusCode {
    match result.outcome {
        TurnOutcome::Delivered => StatusCode::OK,
        TurnOutcome::Blocked => StatusCode::BAD_REQUEST,
        TurnOutcome::Failed => match result.error_kind() {
            Some(kind) if kind.is_client_error() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        },
    }
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        message: "Server is running",
    })
}

async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> (StatusCode, Json<ChatTurnResult>) {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            log::warn!("[SERVER] Rejected chat body: {}", rejection.body_text());
            let result = ChatTurnResult::failed(ErrorKind::EmptyInput, "Invalid input");
            return (StatusCode::BAD_REQUEST, Json(result));
        }
    };

    let message = request.message.unwrap_or_default();
    let result = state.pipeline.run_turn(&message).await;
    (status_for(&result), Json(result))
}
