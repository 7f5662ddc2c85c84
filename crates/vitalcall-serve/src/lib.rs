use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use vitalcall_core::{format_for_list, normalize, CallId, CallIdError, CallPreview, CallRecord};
use vitalcall_provider::{CallProvider, ProviderError};
use vitalcall_store::CallStore;

// ── Config ──

pub struct ServeConfig {
    pub bind: String,
    pub port: u16,
    /// Default and maximum batch size for `/api/list-calls`.
    pub list_limit: usize,
}

// ── App State ──

struct AppState {
    provider: Arc<dyn CallProvider>,
    store: Option<CallStore>,
    list_limit: usize,
}

// ── Error Handling ──

enum AppError {
    BadRequest(String),
    Provider(ProviderError),
    Internal(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Provider(err) => {
                let status = match &err {
                    ProviderError::NotFound(_) => StatusCode::NOT_FOUND,
                    ProviderError::MissingApiKey => StatusCode::INTERNAL_SERVER_ERROR,
                    ProviderError::Rejected { .. }
                    | ProviderError::TooLarge { .. }
                    | ProviderError::Decode(_) => StatusCode::BAD_GATEWAY,
                    ProviderError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                };
                tracing::warn!(error = %err, status = status.as_u16(), "provider request failed");
                (status, err.to_string())
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        };
        let body = serde_json::json!({ "error": message });
        (status, Json(body)).into_response()
    }
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        Self::Provider(err)
    }
}

impl From<CallIdError> for AppError {
    fn from(err: CallIdError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Internal(err.into())
    }
}

// ── Entrypoint ──

pub async fn serve(
    provider: Arc<dyn CallProvider>,
    store: Option<CallStore>,
    config: ServeConfig,
) -> anyhow::Result<()> {
    let app = router(provider, store, config.list_limit);

    let addr = format!("{}:{}", config.bind, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("vitalcall HTTP server listening on http://{addr}");
    axum::serve(listener, app).await?;
    Ok(())
}

/// Build the router (for testing without binding to a port).
pub fn router(
    provider: Arc<dyn CallProvider>,
    store: Option<CallStore>,
    list_limit: usize,
) -> Router {
    let state = Arc::new(AppState {
        provider,
        store,
        list_limit,
    });
    Router::new()
        .route("/api/health", get(health))
        .route("/api/list-calls", get(list_calls))
        .route("/api/get-call-details", get(get_call_details))
        .route("/api/fetch-call-data", post(fetch_call_data))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Run a provider call on the blocking pool.
async fn with_provider<T, F>(state: &AppState, f: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: FnOnce(&dyn CallProvider) -> Result<T, ProviderError> + Send + 'static,
{
    let provider = Arc::clone(&state.provider);
    let result = tokio::task::spawn_blocking(move || f(provider.as_ref())).await??;
    Ok(result)
}

// ── Health ──

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "ok": true }))
}

// ── GET /api/list-calls ──

#[derive(Deserialize)]
struct ListQuery {
    limit: Option<usize>,
}

async fn list_calls(
    State(state): State<Arc<AppState>>,
    params: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<CallPreview>>, AppError> {
    let Query(params) = params?;
    let limit = match params.limit {
        None => state.list_limit,
        Some(n) if (1..=state.list_limit).contains(&n) => n,
        Some(_) => {
            return Err(AppError::BadRequest(format!(
                "limit must be between 1 and {}",
                state.list_limit
            )))
        }
    };
    let calls = with_provider(&state, move |p| p.list_calls(limit)).await?;
    tracing::debug!(count = calls.len(), "listed calls");
    Ok(Json(format_for_list(&calls)))
}

// ── GET /api/get-call-details ──

#[derive(Deserialize)]
struct CallIdQuery {
    #[serde(rename = "callId")]
    call_id: Option<String>,
}

async fn get_call_details(
    State(state): State<Arc<AppState>>,
    params: Result<Query<CallIdQuery>, QueryRejection>,
) -> Result<Json<CallRecord>, AppError> {
    let Query(params) = params?;
    let id = CallId::parse(params.call_id.as_deref().unwrap_or(""))?;
    let record = fetch_record(&state, id).await?;
    Ok(Json(record))
}

async fn fetch_record(state: &AppState, id: CallId) -> Result<CallRecord, AppError> {
    let fetch_id = id.clone();
    let raw = with_provider(state, move |p| p.get_call(&fetch_id)).await?;
    tracing::info!(call_id = %id, "fetched call");
    Ok(normalize(&raw, None))
}

// ── POST /api/fetch-call-data ──

#[derive(Deserialize)]
struct FetchBody {
    #[serde(rename = "callId")]
    call_id: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FetchResponse {
    success: bool,
    data: CallRecord,
    saved_to: Option<String>,
}

async fn fetch_call_data(
    State(state): State<Arc<AppState>>,
    body: Result<Json<FetchBody>, JsonRejection>,
) -> Result<Json<FetchResponse>, AppError> {
    let Json(body) = body?;
    let id = CallId::parse(body.call_id.as_deref().unwrap_or(""))?;
    let record = fetch_record(&state, id.clone()).await?;

    // Saving is best-effort: a failed write still returns the record.
    let saved_to = match &state.store {
        Some(store) => {
            let store = store.clone();
            let snapshot = record.clone();
            let save_id = id.clone();
            match tokio::task::spawn_blocking(move || store.save(&save_id, &snapshot)).await {
                Ok(Ok(saved)) => Some(saved.file_name),
                Ok(Err(err)) => {
                    tracing::warn!(call_id = %id, error = %err, "failed to save call snapshot");
                    None
                }
                Err(err) => {
                    tracing::warn!(call_id = %id, error = %err, "snapshot task failed");
                    None
                }
            }
        }
        None => None,
    };

    Ok(Json(FetchResponse {
        success: true,
        data: record,
        saved_to,
    }))
}

// ── Tests ──
