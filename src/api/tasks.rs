//! Task routes.
//!
//! Dates arrive as strings and are parsed strictly before any store call, so
//! malformed input never mutates a row. Updates that touch zero rows (missing
//! id or another user's id) return the same generic 500 as a backend outage.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use sparkclean_audit::AuditOutcome;
use sparkclean_core::model::{Category, Frequency, NewTask, Priority, TaskPatch};
use sparkclean_core::validate;
use std::time::Instant;
use uuid::Uuid;

use super::{audit, bad_request, fetch_failed, internal, invalid, require_user, ApiError, ApiState};
use crate::materialize;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    from: Option<String>,
    #[serde(default)]
    to: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    title: String,
    #[serde(default)]
    description: Option<String>,
    frequency: Frequency,
    category: Category,
    priority: Priority,
    #[serde(default)]
    due_date: Option<String>,
    #[serde(default)]
    is_recurring: bool,
    #[serde(default)]
    recurrence_start_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    priority: Option<Priority>,
    #[serde(default)]
    completed: Option<bool>,
    #[serde(default)]
    due_date: Option<String>,
}

/// Body for the dedicated reschedule route. Field names follow the web
/// client's camelCase payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    new_due_date: String,
    #[serde(default)]
    is_recurring: bool,
}

fn parse_optional_date(value: Option<&String>) -> Result<Option<NaiveDate>, ApiError> {
    value
        .map(|s| validate::parse_due_date(s).map_err(invalid))
        .transpose()
}

/// `GET /api/tasks` — the user's tasks plus materialized instances.
///
/// Runs a materialization pass first, so a freshly rescheduled series shows
/// its regenerated window in the same response.
pub async fn list(
    headers: HeaderMap,
    State(state): State<ApiState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, ApiError> {
    let user = require_user(&headers, &state).await?;

    let today = Utc::now().date_naive();
    let from = parse_optional_date(query.from.as_ref())?.unwrap_or(today);
    let to = match parse_optional_date(query.to.as_ref())? {
        Some(d) => d,
        None => from
            .checked_add_days(chrono::Days::new(u64::from(state.lookahead_days)))
            .unwrap_or(from),
    };
    if to < from {
        return Err(bad_request("'to' must not be before 'from'"));
    }

    materialize::run_for_user(state.store.as_ref(), user.id, today, state.lookahead_days)
        .await
        .map_err(fetch_failed)?;

    let tasks = state.store.list_tasks(user.id).await.map_err(fetch_failed)?;
    let instances = state
        .store
        .instances_between(user.id, from, to)
        .await
        .map_err(fetch_failed)?;

    Ok(Json(json!({ "tasks": tasks, "instances": instances })))
}

/// `GET /api/tasks/{id}` — a single task.
pub async fn get_one(
    headers: HeaderMap,
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let user = require_user(&headers, &state).await?;

    match state.store.get_task(user.id, id).await.map_err(fetch_failed)? {
        Some(task) => Ok(Json(json!({ "task": task }))),
        // Missing and foreign-owned look the same.
        None => Err(internal()),
    }
}

/// `POST /api/tasks` — create a task.
pub async fn create(
    headers: HeaderMap,
    State(state): State<ApiState>,
    Json(req): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let started = Instant::now();
    let user = require_user(&headers, &state).await?;

    if req.title.trim().is_empty() {
        return Err(bad_request("title is required"));
    }
    let due_date = parse_optional_date(req.due_date.as_ref())?;
    let recurrence_start_date = parse_optional_date(req.recurrence_start_date.as_ref())?;
    if req.is_recurring && recurrence_start_date.is_none() {
        return Err(bad_request(
            "recurring tasks require recurrence_start_date",
        ));
    }

    let new_task = NewTask {
        title: req.title.trim().to_string(),
        description: req.description,
        frequency: req.frequency,
        category: req.category,
        priority: req.priority,
        due_date,
        is_recurring: req.is_recurring,
        recurrence_start_date,
    };

    let task = state
        .store
        .create_task(user.id, new_task)
        .await
        .map_err(fetch_failed)?;

    audit(
        &state,
        "/api/tasks",
        "POST",
        Some(&user),
        StatusCode::CREATED,
        AuditOutcome::Ok,
        None,
        started,
    )
    .await;

    Ok((StatusCode::CREATED, Json(json!({ "task": task }))))
}

/// `PATCH /api/tasks/{id}` — partial update.
pub async fn update(
    headers: HeaderMap,
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> Result<Json<Value>, ApiError> {
    let started = Instant::now();
    let user = require_user(&headers, &state).await?;

    if req.title.as_ref().is_some_and(|t| t.trim().is_empty()) {
        return Err(bad_request("title must not be empty"));
    }
    let due_date = parse_optional_date(req.due_date.as_ref())?;

    let patch = TaskPatch {
        title: req.title,
        description: req.description,
        priority: req.priority,
        completed: req.completed,
        due_date,
    };
    if patch.is_empty() {
        return Err(bad_request("no fields to update"));
    }

    let updated = state
        .store
        .update_task(user.id, id, patch)
        .await
        .map_err(fetch_failed)?;
    if !updated {
        return Err(internal());
    }

    audit(
        &state,
        "/api/tasks/{id}",
        "PATCH",
        Some(&user),
        StatusCode::OK,
        AuditOutcome::Ok,
        None,
        started,
    )
    .await;

    refetch(&state, user.id, id).await
}

/// `PATCH /api/tasks/{id}/schedule` — reschedule a task.
///
/// One-off tasks get the new due date. Recurring tasks get a new anchor and
/// a cleared generation floor, so the next materialization pass regenerates
/// the window from the new date.
pub async fn schedule(
    headers: HeaderMap,
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ScheduleRequest>,
) -> Result<Json<Value>, ApiError> {
    let started = Instant::now();
    let user = require_user(&headers, &state).await?;

    let date = validate::parse_due_date(&req.new_due_date).map_err(invalid)?;

    let updated = if req.is_recurring {
        state.store.reset_recurrence(user.id, id, date).await
    } else {
        state.store.set_due_date(user.id, id, date).await
    }
    .map_err(fetch_failed)?;
    if !updated {
        return Err(internal());
    }

    audit(
        &state,
        "/api/tasks/{id}/schedule",
        "PATCH",
        Some(&user),
        StatusCode::OK,
        AuditOutcome::Ok,
        Some(format!("rescheduled to {date}")),
        started,
    )
    .await;

    refetch(&state, user.id, id).await
}

/// Re-read a task after a successful mutation so the response carries the
/// stored row.
async fn refetch(state: &ApiState, user_id: Uuid, id: Uuid) -> Result<Json<Value>, ApiError> {
    match state.store.get_task(user_id, id).await.map_err(fetch_failed)? {
        Some(task) => Ok(Json(json!({ "task": task }))),
        None => Err(internal()),
    }
}
