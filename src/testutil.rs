//! In-memory fakes for the service traits, shared by handler and
//! materializer tests. The store fake mirrors the hosted backend's
//! semantics: every operation filters on user_id, so a foreign id affects
//! zero rows.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sparkclean_core::error::SparkError;
use sparkclean_core::model::{
    AssessmentInput, AuthUser, Frequency, HomeAssessment, NewTask, Recommendation, Session, Task,
    TaskInstance, TaskPatch,
};
use sparkclean_core::model::{Category, Priority};
use sparkclean_core::traits::{AuthBackend, Suggester, TaskStore};
use uuid::Uuid;

fn backend_down() -> SparkError {
    SparkError::Backend("mock backend down".to_string())
}

// ---------------------------------------------------------------------------
// MockStore
// ---------------------------------------------------------------------------

pub struct MockStore {
    /// The user all helper constructors attach rows to.
    pub user_id: Uuid,
    tasks: Mutex<Vec<Task>>,
    instances: Mutex<Vec<TaskInstance>>,
    assessments: Mutex<HashMap<Uuid, HomeAssessment>>,
    /// Number of mutation calls that reached the store. Lets tests assert
    /// that rejected input caused zero writes.
    writes: AtomicUsize,
    /// When set, every call fails like an unreachable backend.
    pub fail: bool,
}

impl MockStore {
    pub fn new() -> Self {
        Self {
            user_id: Uuid::new_v4(),
            tasks: Mutex::new(Vec::new()),
            instances: Mutex::new(Vec::new()),
            assessments: Mutex::new(HashMap::new()),
            writes: AtomicUsize::new(0),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self { fail: true, ..Self::new() }
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn blank_task(&self, title: &str) -> Task {
        let now = Utc::now();
        Task {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: None,
            frequency: Frequency::Weekly,
            category: Category::General,
            priority: Priority::Medium,
            completed: false,
            due_date: None,
            is_recurring: false,
            recurrence_start_date: None,
            last_generated_date: None,
            user_id: self.user_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn add_recurring(
        &self,
        title: &str,
        frequency: Frequency,
        anchor: NaiveDate,
        last_generated: Option<NaiveDate>,
    ) -> Uuid {
        let mut task = self.blank_task(title);
        task.frequency = frequency;
        task.is_recurring = true;
        task.recurrence_start_date = Some(anchor);
        task.last_generated_date = last_generated;
        let id = task.id;
        self.tasks.lock().unwrap().push(task);
        id
    }

    /// A task owned by some other user, for ownership-scoping tests.
    pub fn add_foreign(&self, title: &str) -> Uuid {
        let mut task = self.blank_task(title);
        task.user_id = Uuid::new_v4();
        let id = task.id;
        self.tasks.lock().unwrap().push(task);
        id
    }

    pub fn add_one_off(&self, title: &str, due_date: Option<NaiveDate>) -> Uuid {
        let mut task = self.blank_task(title);
        task.due_date = due_date;
        let id = task.id;
        self.tasks.lock().unwrap().push(task);
        id
    }

    /// A copy of a task by id, panicking if absent.
    pub fn task(&self, id: Uuid) -> Task {
        self.tasks
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .expect("task not in mock store")
    }

    pub fn instance_dates_sync(&self, task_id: Uuid) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = self
            .instances
            .lock()
            .unwrap()
            .iter()
            .filter(|i| i.task_id == task_id)
            .map(|i| i.due_date)
            .collect();
        dates.sort();
        dates
    }

    /// Directly apply the reschedule mutation, as the schedule route would.
    pub fn reset_recurrence_sync(&self, task_id: Uuid, anchor: NaiveDate) {
        let mut tasks = self.tasks.lock().unwrap();
        let task = tasks.iter_mut().find(|t| t.id == task_id).unwrap();
        task.recurrence_start_date = Some(anchor);
        task.last_generated_date = None;
    }
}

#[async_trait]
impl TaskStore for MockStore {
    async fn get_task(&self, user_id: Uuid, task_id: Uuid) -> Result<Option<Task>, SparkError> {
        if self.fail {
            return Err(backend_down());
        }
        Ok(self
            .tasks
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == task_id && t.user_id == user_id)
            .cloned())
    }

    async fn list_tasks(&self, user_id: Uuid) -> Result<Vec<Task>, SparkError> {
        if self.fail {
            return Err(backend_down());
        }
        Ok(self
            .tasks
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_recurring(&self, user_id: Uuid) -> Result<Vec<Task>, SparkError> {
        if self.fail {
            return Err(backend_down());
        }
        Ok(self
            .tasks
            .lock()
            .unwrap()
            .iter()
            .filter(|t| {
                t.user_id == user_id && t.is_recurring && t.recurrence_start_date.is_some()
            })
            .cloned()
            .collect())
    }

    async fn create_task(&self, user_id: Uuid, task: NewTask) -> Result<Task, SparkError> {
        if self.fail {
            return Err(backend_down());
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        let now = Utc::now();
        let row = Task {
            id: Uuid::new_v4(),
            title: task.title,
            description: task.description,
            frequency: task.frequency,
            category: task.category,
            priority: task.priority,
            completed: false,
            due_date: task.due_date,
            is_recurring: task.is_recurring,
            recurrence_start_date: task.recurrence_start_date,
            last_generated_date: None,
            user_id,
            created_at: now,
            updated_at: now,
        };
        self.tasks.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn update_task(
        &self,
        user_id: Uuid,
        task_id: Uuid,
        patch: TaskPatch,
    ) -> Result<bool, SparkError> {
        if self.fail {
            return Err(backend_down());
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut tasks = self.tasks.lock().unwrap();
        let Some(task) = tasks.iter_mut().find(|t| t.id == task_id && t.user_id == user_id)
        else {
            return Ok(false);
        };
        if let Some(title) = patch.title {
            task.title = title;
        }
        if let Some(description) = patch.description {
            task.description = Some(description);
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        if let Some(completed) = patch.completed {
            task.completed = completed;
        }
        if let Some(due_date) = patch.due_date {
            task.due_date = Some(due_date);
        }
        task.updated_at = Utc::now();
        Ok(true)
    }

    async fn set_due_date(
        &self,
        user_id: Uuid,
        task_id: Uuid,
        due_date: NaiveDate,
    ) -> Result<bool, SparkError> {
        if self.fail {
            return Err(backend_down());
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut tasks = self.tasks.lock().unwrap();
        match tasks.iter_mut().find(|t| t.id == task_id && t.user_id == user_id) {
            Some(task) => {
                task.due_date = Some(due_date);
                task.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn reset_recurrence(
        &self,
        user_id: Uuid,
        task_id: Uuid,
        anchor: NaiveDate,
    ) -> Result<bool, SparkError> {
        if self.fail {
            return Err(backend_down());
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut tasks = self.tasks.lock().unwrap();
        match tasks.iter_mut().find(|t| t.id == task_id && t.user_id == user_id) {
            Some(task) => {
                task.recurrence_start_date = Some(anchor);
                task.last_generated_date = None;
                task.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_last_generated(
        &self,
        user_id: Uuid,
        task_id: Uuid,
        date: NaiveDate,
    ) -> Result<bool, SparkError> {
        if self.fail {
            return Err(backend_down());
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut tasks = self.tasks.lock().unwrap();
        match tasks.iter_mut().find(|t| t.id == task_id && t.user_id == user_id) {
            Some(task) => {
                task.last_generated_date = Some(date);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn instances_between(
        &self,
        user_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<TaskInstance>, SparkError> {
        if self.fail {
            return Err(backend_down());
        }
        let mut rows: Vec<TaskInstance> = self
            .instances
            .lock()
            .unwrap()
            .iter()
            .filter(|i| i.user_id == user_id && i.due_date >= from && i.due_date <= to)
            .cloned()
            .collect();
        rows.sort_by_key(|i| i.due_date);
        Ok(rows)
    }

    async fn instance_dates(
        &self,
        user_id: Uuid,
        task_id: Uuid,
    ) -> Result<Vec<NaiveDate>, SparkError> {
        if self.fail {
            return Err(backend_down());
        }
        Ok(self
            .instances
            .lock()
            .unwrap()
            .iter()
            .filter(|i| i.user_id == user_id && i.task_id == task_id)
            .map(|i| i.due_date)
            .collect())
    }

    async fn insert_instances(
        &self,
        user_id: Uuid,
        task_id: Uuid,
        dates: &[NaiveDate],
    ) -> Result<(), SparkError> {
        if self.fail {
            return Err(backend_down());
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut instances = self.instances.lock().unwrap();
        for &due_date in dates {
            // Same uniqueness the backend's (task_id, due_date) index gives.
            if instances.iter().any(|i| i.task_id == task_id && i.due_date == due_date) {
                continue;
            }
            instances.push(TaskInstance {
                id: Uuid::new_v4(),
                task_id,
                user_id,
                due_date,
                completed: false,
                created_at: Utc::now(),
            });
        }
        Ok(())
    }

    async fn upsert_assessment(
        &self,
        user_id: Uuid,
        input: &AssessmentInput,
    ) -> Result<HomeAssessment, SparkError> {
        if self.fail {
            return Err(backend_down());
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut assessments = self.assessments.lock().unwrap();
        let now = Utc::now();
        let row = assessments
            .entry(user_id)
            .and_modify(|a| {
                a.input = input.clone();
                a.updated_at = now;
            })
            .or_insert_with(|| HomeAssessment {
                id: Uuid::new_v4(),
                user_id,
                input: input.clone(),
                created_at: now,
                updated_at: now,
            });
        Ok(row.clone())
    }

    async fn get_assessment(&self, user_id: Uuid) -> Result<Option<HomeAssessment>, SparkError> {
        if self.fail {
            return Err(backend_down());
        }
        Ok(self.assessments.lock().unwrap().get(&user_id).cloned())
    }
}

// ---------------------------------------------------------------------------
// MockAuth
// ---------------------------------------------------------------------------

pub struct MockAuth {
    /// Bearer tokens the fake accepts, mapped to their user.
    pub tokens: HashMap<String, AuthUser>,
    /// The (email, password) pair sign-in accepts.
    pub credentials: Option<(String, String)>,
    /// `None` simulates a backend failure on the admin lookup.
    pub email_exists: Option<bool>,
    /// When set, recovery requests fail like an unreachable backend.
    pub recovery_fails: bool,
    pub recovery_sent: Mutex<Vec<String>>,
    pub password_updated_with: Mutex<Vec<String>>,
}

impl MockAuth {
    pub fn new() -> Self {
        Self {
            tokens: HashMap::new(),
            credentials: None,
            email_exists: Some(false),
            recovery_fails: false,
            recovery_sent: Mutex::new(Vec::new()),
            password_updated_with: Mutex::new(Vec::new()),
        }
    }

    /// Accept `token` for the given user id.
    pub fn with_token(mut self, token: &str, user_id: Uuid) -> Self {
        self.tokens.insert(
            token.to_string(),
            AuthUser { id: user_id, email: "ana@example.com".to_string() },
        );
        self
    }
}

#[async_trait]
impl AuthBackend for MockAuth {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, SparkError> {
        match self.credentials {
            Some((ref e, ref p)) if e == email && p == password => Ok(Session {
                access_token: "t-access".to_string(),
                refresh_token: "t-refresh".to_string(),
                expires_in: 3600,
                user: AuthUser { id: Uuid::new_v4(), email: email.to_string() },
            }),
            _ => Err(SparkError::Unauthorized("invalid credentials".to_string())),
        }
    }

    async fn user_from_token(&self, access_token: &str) -> Result<AuthUser, SparkError> {
        self.tokens
            .get(access_token)
            .cloned()
            .ok_or_else(|| SparkError::Unauthorized("invalid or expired token".to_string()))
    }

    async fn send_recovery(&self, email: &str) -> Result<(), SparkError> {
        if self.recovery_fails {
            return Err(backend_down());
        }
        self.recovery_sent.lock().unwrap().push(email.to_string());
        Ok(())
    }

    async fn update_password(
        &self,
        access_token: &str,
        _refresh_token: Option<&str>,
        _new_password: &str,
    ) -> Result<(), SparkError> {
        if access_token == "expired" {
            return Err(SparkError::Unauthorized(
                "reset link is invalid or expired".to_string(),
            ));
        }
        self.password_updated_with.lock().unwrap().push(access_token.to_string());
        Ok(())
    }

    async fn email_exists(&self, _email: &str) -> Result<bool, SparkError> {
        self.email_exists.ok_or_else(backend_down)
    }
}

// ---------------------------------------------------------------------------
// MockSuggester
// ---------------------------------------------------------------------------

pub struct MockSuggester {
    /// `None` simulates a failed model call.
    pub result: Option<Vec<Recommendation>>,
}

impl MockSuggester {
    pub fn failing() -> Self {
        Self { result: None }
    }

    pub fn with_recommendations(recs: Vec<Recommendation>) -> Self {
        Self { result: Some(recs) }
    }
}

#[async_trait]
impl Suggester for MockSuggester {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn suggest(
        &self,
        _assessment: &AssessmentInput,
        _language: &str,
    ) -> Result<Vec<Recommendation>, SparkError> {
        self.result
            .clone()
            .ok_or_else(|| SparkError::Ai("mock model failure".to_string()))
    }

    async fn is_available(&self) -> bool {
        self.result.is_some()
    }
}
