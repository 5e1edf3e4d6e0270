use crate::actors::{DashboardHandle, DashboardView, DetailHandle, LookupOutcome};
use crate::error::FailureKind;
use crate::storage::Storage;
use crate::store::STORAGE_KEY;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Shared state of the HTTP surface
#[derive(Clone)]
pub struct AppState {
    pub dashboard: DashboardHandle,
    pub detail: DetailHandle,
    pub storage: Arc<dyn Storage>,
    pub start_time: Instant,
}

/// Body of the lookup form
#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    #[serde(default)]
    pub repository: String,
}

/// Response for errors
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// Result of an individual check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthChecks {
    pub storage: CheckResult,
    pub dashboard: CheckResult,
    pub detail: CheckResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    pub uptime_seconds: u64,
    pub storage_backend: String,
    pub checks: HealthChecks,
}

/// Liveness probe response (minimal, just indicates the process is running)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LivenessResponse {
    pub status: String,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(get_dashboard).post(submit_repository))
        .route("/repository/*repository", get(get_repository))
        .route("/health", get(health_check))
        .route("/livez", get(liveness_check))
        .route("/readyz", get(readiness_check))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

/// Serve the views until the process is interrupted
pub async fn serve(state: AppState, addr: &str) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Explorer listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    Ok(())
}

fn internal_error(e: impl std::fmt::Display) -> Response {
    error!("Request failed: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
        .into_response()
}

/// List view
async fn get_dashboard(State(state): State<AppState>) -> Response {
    match state.dashboard.view().await {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(e) => internal_error(e),
    }
}

/// Lookup form submission; answers with the list view after the lookup settles
async fn submit_repository(
    State(state): State<AppState>,
    Json(request): Json<SubmitRequest>,
) -> Response {
    let outcome = match state.dashboard.submit(request.repository).await {
        Ok(outcome) => outcome,
        Err(e) => return internal_error(e),
    };

    let status = match &outcome {
        LookupOutcome::Added { .. } => StatusCode::OK,
        LookupOutcome::EmptyInput { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        LookupOutcome::Failed { kind, .. } => match kind {
            FailureKind::NotFound => StatusCode::NOT_FOUND,
            FailureKind::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            FailureKind::Transport | FailureKind::Other => StatusCode::BAD_GATEWAY,
        },
        LookupOutcome::PersistFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let view: DashboardView = match state.dashboard.view().await {
        Ok(view) => view,
        Err(e) => return internal_error(e),
    };
    (status, Json(view)).into_response()
}

/// Detail view; activates the screen for the repository in the path
async fn get_repository(
    State(state): State<AppState>,
    Path(repository): Path<String>,
) -> Response {
    let full_name = repository.trim_matches('/');
    if full_name.is_empty() {
        return (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "missing repository".to_string(),
            }),
        )
            .into_response();
    }

    if let Err(e) = state.detail.open(full_name).await {
        return internal_error(e);
    }
    match state.detail.view().await {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(e) => internal_error(e),
    }
}

/// Main health check endpoint
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let storage = match state.storage.get(STORAGE_KEY).await {
        Ok(_) => healthy(),
        Err(e) => unhealthy(format!("Storage read failed: {}", e)),
    };
    let dashboard = match state.dashboard.view().await {
        Ok(_) => healthy(),
        Err(e) => unhealthy(e.to_string()),
    };
    let detail = match state.detail.view().await {
        Ok(_) => healthy(),
        Err(e) => unhealthy(e.to_string()),
    };

    let overall_status = if [&storage, &dashboard, &detail]
        .iter()
        .any(|check| matches!(check.status, HealthStatus::Unhealthy))
    {
        HealthStatus::Unhealthy
    } else {
        HealthStatus::Healthy
    };

    let status_code = match overall_status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    let response = HealthResponse {
        status: overall_status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        storage_backend: state.storage.name().to_string(),
        checks: HealthChecks {
            storage,
            dashboard,
            detail,
        },
    };

    (status_code, Json(response))
}

/// Liveness probe - just checks if the process is alive
async fn liveness_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(LivenessResponse {
            status: "alive".to_string(),
        }),
    )
}

/// Readiness probe - storage reachable and both screens responsive
async fn readiness_check(State(state): State<AppState>) -> StatusCode {
    let ready = state.storage.get(STORAGE_KEY).await.is_ok()
        && state.dashboard.view().await.is_ok()
        && state.detail.view().await.is_ok();

    if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

fn healthy() -> CheckResult {
    CheckResult {
        status: HealthStatus::Healthy,
        message: None,
    }
}

fn unhealthy(message: String) -> CheckResult {
    CheckResult {
        status: HealthStatus::Unhealthy,
        message: Some(message),
    }
}
