//! Task and instance rows on the hosted backend.
//!
//! Updates send `Prefer: return=representation` so the affected-row count
//! comes back as the returned array length; zero rows means the id is
//! missing or owned by someone else, and callers treat both the same way.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use sparkclean_core::error::SparkError;
use sparkclean_core::model::{
    AssessmentInput, HomeAssessment, NewTask, Task, TaskInstance, TaskPatch,
};
use sparkclean_core::traits::TaskStore;
use uuid::Uuid;

use crate::BackendClient;

#[derive(Serialize)]
struct InstanceInsert {
    task_id: Uuid,
    user_id: Uuid,
    due_date: NaiveDate,
}

#[derive(Deserialize)]
struct DateRow {
    due_date: NaiveDate,
}

fn eq(v: impl std::fmt::Display) -> String {
    format!("eq.{v}")
}

/// Build the PATCH body for a task update, skipping untouched fields.
pub(crate) fn patch_body(patch: &TaskPatch) -> Map<String, Value> {
    let mut body = Map::new();
    if let Some(ref t) = patch.title {
        body.insert("title".to_string(), json!(t));
    }
    if let Some(ref d) = patch.description {
        body.insert("description".to_string(), json!(d));
    }
    if let Some(p) = patch.priority {
        body.insert("priority".to_string(), json!(p));
    }
    if let Some(c) = patch.completed {
        body.insert("completed".to_string(), json!(c));
    }
    if let Some(d) = patch.due_date {
        body.insert("due_date".to_string(), json!(d));
    }
    body
}

impl BackendClient {
    /// PATCH rows matching (id, user_id); returns whether any row changed.
    async fn patch_task_row(
        &self,
        user_id: Uuid,
        task_id: Uuid,
        body: &Value,
        what: &str,
    ) -> Result<bool, SparkError> {
        let resp = self
            .rest_request(Method::PATCH, "tasks")
            .query(&[("id", eq(task_id)), ("user_id", eq(user_id))])
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await
            .map_err(|e| SparkError::Backend(format!("{what} request failed: {e}")))?;

        let rows: Vec<Value> = Self::expect_json(resp, what).await?;
        Ok(!rows.is_empty())
    }
}

#[async_trait]
impl TaskStore for BackendClient {
    async fn get_task(&self, user_id: Uuid, task_id: Uuid) -> Result<Option<Task>, SparkError> {
        let resp = self
            .rest_request(Method::GET, "tasks")
            .query(&[
                ("id", eq(task_id)),
                ("user_id", eq(user_id)),
                ("limit", "1".to_string()),
            ])
            .send()
            .await
            .map_err(|e| SparkError::Backend(format!("get task request failed: {e}")))?;

        let mut rows: Vec<Task> = Self::expect_json(resp, "get task").await?;
        Ok(rows.pop())
    }

    async fn list_tasks(&self, user_id: Uuid) -> Result<Vec<Task>, SparkError> {
        let resp = self
            .rest_request(Method::GET, "tasks")
            .query(&[
                ("user_id", eq(user_id)),
                ("order", "created_at.asc".to_string()),
            ])
            .send()
            .await
            .map_err(|e| SparkError::Backend(format!("list tasks request failed: {e}")))?;

        Self::expect_json(resp, "list tasks").await
    }

    async fn list_recurring(&self, user_id: Uuid) -> Result<Vec<Task>, SparkError> {
        let resp = self
            .rest_request(Method::GET, "tasks")
            .query(&[
                ("user_id", eq(user_id)),
                ("is_recurring", "eq.true".to_string()),
                ("recurrence_start_date", "not.is.null".to_string()),
            ])
            .send()
            .await
            .map_err(|e| SparkError::Backend(format!("list recurring request failed: {e}")))?;

        Self::expect_json(resp, "list recurring").await
    }

    async fn create_task(&self, user_id: Uuid, task: NewTask) -> Result<Task, SparkError> {
        let mut body = serde_json::to_value(&task)?;
        body["user_id"] = json!(user_id);

        let resp = self
            .rest_request(Method::POST, "tasks")
            .header("Prefer", "return=representation")
            .json(&body)
            .send()
            .await
            .map_err(|e| SparkError::Backend(format!("create task request failed: {e}")))?;

        let mut rows: Vec<Task> = Self::expect_json(resp, "create task").await?;
        rows.pop()
            .ok_or_else(|| SparkError::Backend("create task returned no row".to_string()))
    }

    async fn update_task(
        &self,
        user_id: Uuid,
        task_id: Uuid,
        patch: TaskPatch,
    ) -> Result<bool, SparkError> {
        let body = patch_body(&patch);
        if body.is_empty() {
            return Ok(false);
        }
        self.patch_task_row(user_id, task_id, &Value::Object(body), "update task")
            .await
    }

    async fn set_due_date(
        &self,
        user_id: Uuid,
        task_id: Uuid,
        due_date: NaiveDate,
    ) -> Result<bool, SparkError> {
        self.patch_task_row(user_id, task_id, &json!({ "due_date": due_date }), "set due date")
            .await
    }

    async fn reset_recurrence(
        &self,
        user_id: Uuid,
        task_id: Uuid,
        anchor: NaiveDate,
    ) -> Result<bool, SparkError> {
        // Clearing last_generated_date makes the next materialization pass
        // regenerate from the new anchor.
        let body = json!({
            "recurrence_start_date": anchor,
            "last_generated_date": null,
        });
        self.patch_task_row(user_id, task_id, &body, "reset recurrence").await
    }

    async fn set_last_generated(
        &self,
        user_id: Uuid,
        task_id: Uuid,
        date: NaiveDate,
    ) -> Result<bool, SparkError> {
        self.patch_task_row(
            user_id,
            task_id,
            &json!({ "last_generated_date": date }),
            "set last generated",
        )
        .await
    }

    async fn instances_between(
        &self,
        user_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<TaskInstance>, SparkError> {
        let resp = self
            .rest_request(Method::GET, "task_instances")
            .query(&[
                ("user_id", eq(user_id)),
                ("due_date", format!("gte.{from}")),
                ("due_date", format!("lte.{to}")),
                ("order", "due_date.asc".to_string()),
            ])
            .send()
            .await
            .map_err(|e| SparkError::Backend(format!("list instances request failed: {e}")))?;

        Self::expect_json(resp, "list instances").await
    }

    async fn instance_dates(
        &self,
        user_id: Uuid,
        task_id: Uuid,
    ) -> Result<Vec<NaiveDate>, SparkError> {
        let resp = self
            .rest_request(Method::GET, "task_instances")
            .query(&[
                ("user_id", eq(user_id)),
                ("task_id", eq(task_id)),
                ("select", "due_date".to_string()),
            ])
            .send()
            .await
            .map_err(|e| SparkError::Backend(format!("instance dates request failed: {e}")))?;

        let rows: Vec<DateRow> = Self::expect_json(resp, "instance dates").await?;
        Ok(rows.into_iter().map(|r| r.due_date).collect())
    }

    async fn insert_instances(
        &self,
        user_id: Uuid,
        task_id: Uuid,
        dates: &[NaiveDate],
    ) -> Result<(), SparkError> {
        if dates.is_empty() {
            return Ok(());
        }

        let rows: Vec<InstanceInsert> = dates
            .iter()
            .map(|&due_date| InstanceInsert { task_id, user_id, due_date })
            .collect();

        // The unique index on (task_id, due_date) plus ignore-duplicates
        // keeps the at-most-one-instance-per-date invariant under races.
        let resp = self
            .rest_request(Method::POST, "task_instances")
            .query(&[("on_conflict", "task_id,due_date")])
            .header("Prefer", "resolution=ignore-duplicates")
            .json(&rows)
            .send()
            .await
            .map_err(|e| SparkError::Backend(format!("insert instances request failed: {e}")))?;

        Self::expect_success(resp, "insert instances").await?;
        Ok(())
    }

    async fn upsert_assessment(
        &self,
        user_id: Uuid,
        input: &AssessmentInput,
    ) -> Result<HomeAssessment, SparkError> {
        self.upsert_assessment_row(user_id, input).await
    }

    async fn get_assessment(&self, user_id: Uuid) -> Result<Option<HomeAssessment>, SparkError> {
        self.get_assessment_row(user_id).await
    }
}
