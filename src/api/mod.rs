//! HTTP API server.
//!
//! Thin axum layer over the service traits: handlers validate input, resolve
//! the bearer token to a user, and delegate to the hosted backend through
//! `TaskStore`/`AuthBackend`. Failure detail stays server-side (tracing and
//! the audit log); clients get generic bodies.

mod ai;
mod auth;
mod tasks;


use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderMap, StatusCode},
    response::Json,
    routing::{get, patch, post},
    Router,
};
use serde_json::{json, Value};
use sparkclean_audit::{AuditEntry, AuditLogger, AuditOutcome};
use sparkclean_core::config::Config;
use sparkclean_core::error::SparkError;
use sparkclean_core::model::AuthUser;
use sparkclean_core::traits::{AuthBackend, Suggester, TaskStore};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub auth: Arc<dyn AuthBackend>,
    pub store: Arc<dyn TaskStore>,
    pub suggester: Arc<dyn Suggester>,
    pub audit: Option<AuditLogger>,
    pub lookahead_days: u32,
    pub uptime: Instant,
}

type ApiError = (StatusCode, Json<Value>);

/// The one body every server-side failure maps to. Row-not-found, foreign
/// ownership, and upstream outages are indistinguishable to the client.
fn internal() -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"error": "request failed"})),
    )
}

fn bad_request(msg: &str) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(json!({"error": msg})))
}

/// Log a failed store/backend call and hide it behind the generic 500.
fn fetch_failed(e: SparkError) -> ApiError {
    warn!("store call failed: {e}");
    internal()
}

/// Map a validation failure to a 400 with the bare message.
fn invalid(e: SparkError) -> ApiError {
    let msg = match e {
        SparkError::Validation(m) => m,
        other => other.to_string(),
    };
    bad_request(&msg)
}

fn unauthorized(msg: &str) -> ApiError {
    (StatusCode::UNAUTHORIZED, Json(json!({"error": msg})))
}

/// Resolve the request's bearer token to an authenticated user.
async fn require_user(headers: &HeaderMap, state: &ApiState) -> Result<AuthUser, ApiError> {
    let token = headers
        .get("authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| unauthorized("missing or malformed Authorization header"))?;

    match state.auth.user_from_token(token).await {
        Ok(user) => Ok(user),
        Err(SparkError::Unauthorized(_)) => Err(unauthorized("invalid or expired token")),
        Err(e) => {
            warn!("token verification failed upstream: {e}");
            Err(internal())
        }
    }
}

/// Best-effort audit write. Failures are warned and swallowed.
async fn audit(
    state: &ApiState,
    route: &str,
    method: &str,
    user: Option<&AuthUser>,
    status: StatusCode,
    outcome: AuditOutcome,
    detail: Option<String>,
    started: Instant,
) {
    let Some(logger) = &state.audit else {
        return;
    };
    let entry = AuditEntry {
        route: route.to_string(),
        method: method.to_string(),
        user_id: user.map(|u| u.id.to_string()),
        status: status.as_u16(),
        outcome,
        detail,
        processing_ms: Some(started.elapsed().as_millis() as i64),
    };
    if let Err(e) = logger.log(&entry).await {
        warn!("audit write failed: {e}");
    }
}

/// `GET /api/health` — liveness, uptime, backend reachability is not probed
/// here to keep the check cheap.
async fn health(
    axum::extract::State(state): axum::extract::State<ApiState>,
) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "uptime_secs": state.uptime.elapsed().as_secs(),
    }))
}

/// Build the API router.
pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/forgot-password", post(auth::forgot_password))
        .route("/api/auth/reset-password", post(auth::reset_password))
        .route("/api/auth/check-email", post(auth::check_email))
        .route("/api/tasks", get(tasks::list).post(tasks::create))
        .route("/api/tasks/{id}", get(tasks::get_one).patch(tasks::update))
        .route("/api/tasks/{id}/schedule", patch(tasks::schedule))
        .route("/api/ai/generate-tasks", post(ai::generate_tasks))
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .with_state(state)
}

/// Bind and serve the API until the process exits.
pub async fn serve(config: &Config, state: ApiState) -> Result<(), SparkError> {
    let addr = format!("{}:{}", config.api.host, config.api.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| SparkError::Config(format!("failed to bind {addr}: {e}")))?;

    info!("API listening on {addr}");

    axum::serve(listener, build_router(state))
        .await
        .map_err(SparkError::Io)?;

    Ok(())
}
