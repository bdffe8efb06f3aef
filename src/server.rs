//! HTTP shell: JSON prediction endpoint plus the HTML form page.

use std::future::Future;
use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use thiserror::Error;

use crate::ml::naive_bayes::PredictError;
use crate::serving::{self, ErrorResponse, MODEL_NOT_LOADED_MESSAGE, ModelSource, ModelState, WineSample};

const INDEX_HTML: &str = include_str!("../assets/web/index.html");
const SCRIPT_JS: &str = include_str!("../assets/web/script.js");

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to start async runtime: {0}")]
    Runtime(std::io::Error),
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },
    #[error("Server error: {0}")]
    Serve(std::io::Error),
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    model_loaded: bool,
}

/// Routes served by `cultivar-serve`.
pub fn router(source: Arc<ModelSource>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/static/script.js", get(script))
        .route("/predict", post(predict))
        .route("/health", get(health))
        .with_state(source)
}

/// Serve on an already bound listener until `shutdown` resolves.
pub async fn serve_on<F>(
    listener: tokio::net::TcpListener,
    source: Arc<ModelSource>,
    shutdown: F,
) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(source))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(ServerError::Serve)
}

/// Bind `addr` and serve until Ctrl+C, blocking the calling thread.
pub fn run_blocking(addr: &str, source: Arc<ModelSource>) -> Result<(), ServerError> {
    let runtime = tokio::runtime::Runtime::new().map_err(ServerError::Runtime)?;
    runtime.block_on(async move {
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.to_string(),
                source,
            })?;
        match listener.local_addr() {
            Ok(local) => tracing::info!("Listening on http://{local}"),
            Err(_) => tracing::info!("Listening on {addr}"),
        }
        serve_on(listener, source, shutdown_signal()).await?;
        tracing::info!("Server stopped");
        Ok(())
    })
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to install Ctrl+C handler: {err}");
        std::future::pending::<()>().await;
    }
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        SCRIPT_JS,
    )
}

async fn health(State(source): State<Arc<ModelSource>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        model_loaded: source.is_loaded(),
    })
}

async fn predict(State(source): State<Arc<ModelSource>>, body: Bytes) -> Response {
    let state = load_state(source).await;
    if !state.is_loaded() {
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, MODEL_NOT_LOADED_MESSAGE);
    }
    let sample = match WineSample::from_json(&body) {
        Ok(sample) => sample,
        Err(err) => return prediction_failed(err),
    };
    match serving::classify(&state, &sample) {
        Ok(response) => Json(response).into_response(),
        Err(PredictError::ModelNotLoaded) => {
            error_response(StatusCode::INTERNAL_SERVER_ERROR, MODEL_NOT_LOADED_MESSAGE)
        }
        Err(err) => prediction_failed(err),
    }
}

/// Current model state; a missing model is re-read from disk off the async workers.
async fn load_state(source: Arc<ModelSource>) -> ModelState {
    let state = source.snapshot();
    if state.is_loaded() {
        return state;
    }
    match tokio::task::spawn_blocking(move || source.current()).await {
        Ok(state) => state,
        Err(err) => {
            tracing::warn!("Model load task failed: {err}");
            ModelState::Unloaded
        }
    }
}

fn prediction_failed(err: impl std::fmt::Display) -> Response {
    tracing::debug!("Rejected prediction request: {err}");
    error_response(StatusCode::BAD_REQUEST, format!("Prediction failed: {err}"))
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}
