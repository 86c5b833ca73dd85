//! Authentication routes.
//!
//! Credential verification lives on the hosted backend; these handlers only
//! validate shapes and keep responses uniform so callers cannot probe which
//! accounts exist.

use axum::{extract::State, http::StatusCode, response::Json};
use serde::Deserialize;
use serde_json::{json, Value};
use sparkclean_audit::AuditOutcome;
use sparkclean_core::error::SparkError;
use sparkclean_core::validate;
use std::time::Instant;
use tracing::warn;

use super::{audit, bad_request, internal, invalid, unauthorized, ApiError, ApiState};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Debug, Deserialize)]
pub struct EmailRequest {
    email: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    password: String,
}

/// `POST /api/auth/login` — exchange credentials for a session.
pub async fn login(
    State(state): State<ApiState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<Value>, ApiError> {
    let started = Instant::now();

    validate::validate_email(&req.email).map_err(invalid)?;
    if req.password.is_empty() {
        return Err(bad_request("password is required"));
    }

    match state.auth.sign_in(&req.email, &req.password).await {
        Ok(session) => {
            audit(
                &state,
                "/api/auth/login",
                "POST",
                Some(&session.user),
                StatusCode::OK,
                AuditOutcome::Ok,
                None,
                started,
            )
            .await;
            Ok(Json(json!({ "session": session })))
        }
        Err(SparkError::Unauthorized(_)) => {
            audit(
                &state,
                "/api/auth/login",
                "POST",
                None,
                StatusCode::UNAUTHORIZED,
                AuditOutcome::Denied,
                Some(format!("failed login for {}", req.email)),
                started,
            )
            .await;
            Err(unauthorized("invalid credentials"))
        }
        Err(e) => {
            warn!("login failed upstream: {e}");
            audit(
                &state,
                "/api/auth/login",
                "POST",
                None,
                StatusCode::INTERNAL_SERVER_ERROR,
                AuditOutcome::Error,
                Some(e.to_string()),
                started,
            )
            .await;
            Err(internal())
        }
    }
}

/// `POST /api/auth/forgot-password` — request a recovery email.
///
/// Always returns the same 200 body. Upstream failures are logged but never
/// surfaced, so the response carries no signal about account existence.
pub async fn forgot_password(
    State(state): State<ApiState>,
    Json(req): Json<EmailRequest>,
) -> Result<Json<Value>, ApiError> {
    let started = Instant::now();

    validate::validate_email(&req.email).map_err(invalid)?;

    let outcome = match state.auth.send_recovery(&req.email).await {
        Ok(()) => AuditOutcome::Ok,
        Err(e) => {
            warn!("recovery email failed upstream: {e}");
            AuditOutcome::Error
        }
    };
    audit(
        &state,
        "/api/auth/forgot-password",
        "POST",
        None,
        StatusCode::OK,
        outcome,
        None,
        started,
    )
    .await;

    Ok(Json(json!({
        "message": "If an account exists for that email, a reset link has been sent."
    })))
}

/// `POST /api/auth/reset-password` — set a new password via a recovery token.
pub async fn reset_password(
    State(state): State<ApiState>,
    Json(req): Json<ResetPasswordRequest>,
) -> Result<Json<Value>, ApiError> {
    let started = Instant::now();

    if req.access_token.is_empty() {
        return Err(bad_request("access_token is required"));
    }
    validate::validate_password(&req.password).map_err(invalid)?;

    match state
        .auth
        .update_password(&req.access_token, req.refresh_token.as_deref(), &req.password)
        .await
    {
        Ok(()) => {
            audit(
                &state,
                "/api/auth/reset-password",
                "POST",
                None,
                StatusCode::OK,
                AuditOutcome::Ok,
                None,
                started,
            )
            .await;
            Ok(Json(json!({ "message": "Password updated." })))
        }
        Err(SparkError::Unauthorized(_)) => {
            Err(unauthorized("reset link is invalid or expired"))
        }
        Err(e) => {
            warn!("password update failed upstream: {e}");
            Err(internal())
        }
    }
}

/// `POST /api/auth/check-email` — whether an account exists for an email.
///
/// The message is identical either way; only the boolean differs, and a
/// backend failure degrades to `exists: false` with the same 200 shape.
pub async fn check_email(
    State(state): State<ApiState>,
    Json(req): Json<EmailRequest>,
) -> Result<Json<Value>, ApiError> {
    validate::validate_email(&req.email).map_err(invalid)?;

    let exists = match state.auth.email_exists(&req.email).await {
        Ok(found) => found,
        Err(e) => {
            warn!("email lookup failed upstream: {e}");
            false
        }
    };

    Ok(Json(json!({
        "exists": exists,
        "message": "Email check complete.",
    })))
}
