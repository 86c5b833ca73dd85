use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How often a recurring task repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    /// Parse leniently, falling back to weekly for unrecognized input.
    /// Used when normalizing AI output; API input goes through serde instead.
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "daily" => Self::Daily,
            "weekly" => Self::Weekly,
            "monthly" => Self::Monthly,
            "yearly" | "annual" | "annually" => Self::Yearly,
            _ => Self::Weekly,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

/// Which area of the home a task belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Kitchen,
    Bathroom,
    Bedroom,
    LivingRoom,
    Laundry,
    Exterior,
    General,
}

impl Category {
    /// Parse leniently, falling back to `general` for unrecognized input.
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "kitchen" => Self::Kitchen,
            "bathroom" => Self::Bathroom,
            "bedroom" => Self::Bedroom,
            "living_room" => Self::LivingRoom,
            "laundry" => Self::Laundry,
            "exterior" | "outdoor" | "outdoors" => Self::Exterior,
            _ => Self::General,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Kitchen => "kitchen",
            Self::Bathroom => "bathroom",
            Self::Bedroom => "bedroom",
            Self::LivingRoom => "living_room",
            Self::Laundry => "laundry",
            Self::Exterior => "exterior",
            Self::General => "general",
        }
    }
}

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    /// Parse leniently, falling back to `medium` for unrecognized input.
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "low" => Self::Low,
            "medium" | "normal" => Self::Medium,
            "high" | "urgent" => Self::High,
            _ => Self::Medium,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// A cleaning task, owned by exactly one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub frequency: Frequency,
    pub category: Category,
    pub priority: Priority,
    #[serde(default)]
    pub completed: bool,
    /// Concrete due date for one-off tasks.
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_recurring: bool,
    /// Anchor date for instance generation; only meaningful when recurring.
    #[serde(default)]
    pub recurrence_start_date: Option<NaiveDate>,
    /// Newest date an instance has been generated for. Null forces a full
    /// regeneration from the anchor on the next materialization pass.
    #[serde(default)]
    pub last_generated_date: Option<NaiveDate>,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A materialized occurrence of a recurring task on a specific date.
///
/// At most one instance exists per (task, due_date).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskInstance {
    pub id: Uuid,
    pub task_id: Uuid,
    pub user_id: Uuid,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields a caller may change on an existing task.
///
/// `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub completed: Option<bool>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.completed.is_none()
            && self.due_date.is_none()
    }
}

/// Payload for creating a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub frequency: Frequency,
    pub category: Category,
    pub priority: Priority,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub recurrence_start_date: Option<NaiveDate>,
}

/// One-per-user description of the home, consumed by the suggester.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentInput {
    pub home_type: String,
    pub bedrooms: u32,
    pub bathrooms: u32,
    #[serde(default)]
    pub has_pets: bool,
    #[serde(default)]
    pub has_children: bool,
    /// Free-form, e.g. "busy professional", "works from home".
    #[serde(default)]
    pub lifestyle: Option<String>,
    /// Free-form, e.g. "light daily upkeep", "deep clean weekends".
    #[serde(default)]
    pub cleaning_preference: Option<String>,
}

/// A stored home assessment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomeAssessment {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(flatten)]
    pub input: AssessmentInput,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Where a recommendation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationSource {
    Gemini,
    Fallback,
}

/// A proposed task, tagged with its provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub frequency: Frequency,
    pub category: Category,
    pub priority: Priority,
    pub source: RecommendationSource,
}

/// An authenticated session issued by the hosted backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: u64,
    pub user: AuthUser,
}

/// The backend's view of an authenticated user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
}
