use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::SparkError;
use crate::model::{
    AssessmentInput, AuthUser, HomeAssessment, NewTask, Recommendation, Session, Task,
    TaskInstance, TaskPatch,
};

/// The hosted auth service — credential checks, sessions, password resets.
///
/// All credential verification and token issuance happens on the hosted
/// side; implementations only shuttle requests and map failures.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Exchange email + password for a session.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, SparkError>;

    /// Resolve a bearer access token to its user.
    async fn user_from_token(&self, access_token: &str) -> Result<AuthUser, SparkError>;

    /// Ask the backend to email a password-recovery link.
    async fn send_recovery(&self, email: &str) -> Result<(), SparkError>;

    /// Set a new password using a recovery access token.
    async fn update_password(
        &self,
        access_token: &str,
        refresh_token: Option<&str>,
        new_password: &str,
    ) -> Result<(), SparkError>;

    /// Whether an account exists for this email. Requires admin credentials.
    async fn email_exists(&self, email: &str) -> Result<bool, SparkError>;
}

/// Row storage for tasks, instances, and assessments.
///
/// Every operation is scoped to the calling user's rows. Update methods
/// return whether any row was affected; an id belonging to another user
/// affects zero rows, indistinguishable from a missing id.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn get_task(&self, user_id: Uuid, task_id: Uuid) -> Result<Option<Task>, SparkError>;

    async fn list_tasks(&self, user_id: Uuid) -> Result<Vec<Task>, SparkError>;

    /// Recurring tasks with a recurrence anchor set.
    async fn list_recurring(&self, user_id: Uuid) -> Result<Vec<Task>, SparkError>;

    async fn create_task(&self, user_id: Uuid, task: NewTask) -> Result<Task, SparkError>;

    async fn update_task(
        &self,
        user_id: Uuid,
        task_id: Uuid,
        patch: TaskPatch,
    ) -> Result<bool, SparkError>;

    /// Overwrite a one-off task's due date.
    async fn set_due_date(
        &self,
        user_id: Uuid,
        task_id: Uuid,
        due_date: NaiveDate,
    ) -> Result<bool, SparkError>;

    /// Move a recurring task's anchor and clear last_generated_date, so the
    /// next materialization pass regenerates from the new anchor.
    async fn reset_recurrence(
        &self,
        user_id: Uuid,
        task_id: Uuid,
        anchor: NaiveDate,
    ) -> Result<bool, SparkError>;

    async fn set_last_generated(
        &self,
        user_id: Uuid,
        task_id: Uuid,
        date: NaiveDate,
    ) -> Result<bool, SparkError>;

    async fn instances_between(
        &self,
        user_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<TaskInstance>, SparkError>;

    /// Due dates that already have an instance for this task.
    async fn instance_dates(
        &self,
        user_id: Uuid,
        task_id: Uuid,
    ) -> Result<Vec<NaiveDate>, SparkError>;

    async fn insert_instances(
        &self,
        user_id: Uuid,
        task_id: Uuid,
        dates: &[NaiveDate],
    ) -> Result<(), SparkError>;

    /// Insert or replace the user's single assessment row.
    async fn upsert_assessment(
        &self,
        user_id: Uuid,
        input: &AssessmentInput,
    ) -> Result<HomeAssessment, SparkError>;

    async fn get_assessment(&self, user_id: Uuid) -> Result<Option<HomeAssessment>, SparkError>;
}

/// A task-suggestion source — the AI side of the house.
#[async_trait]
pub trait Suggester: Send + Sync {
    /// Human-readable provider name (the provenance tag of its output).
    fn name(&self) -> &str;

    /// Produce recommendations for an assessment in the given language.
    ///
    /// Errors are recoverable by the caller via the static fallback list.
    async fn suggest(
        &self,
        assessment: &AssessmentInput,
        language: &str,
    ) -> Result<Vec<Recommendation>, SparkError>;

    /// Check if the suggester is configured and reachable.
    async fn is_available(&self) -> bool;
}
