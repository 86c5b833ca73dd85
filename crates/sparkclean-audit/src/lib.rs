//! # sparkclean-audit
//!
//! SQLite-backed request audit log. This is where server-side failure
//! detail lives; API clients only ever see generic error bodies. Writes are
//! best-effort — handlers log a warning and move on if the audit insert
//! fails.

use sparkclean_core::config::{shellexpand, AuditConfig};
use sparkclean_core::error::SparkError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::{debug, info};
use uuid::Uuid;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS audit_log (
    id TEXT PRIMARY KEY,
    route TEXT NOT NULL,
    method TEXT NOT NULL,
    user_id TEXT,
    status INTEGER NOT NULL,
    outcome TEXT NOT NULL,
    detail TEXT,
    processing_ms INTEGER,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);
CREATE INDEX IF NOT EXISTS idx_audit_log_created_at ON audit_log(created_at);";

/// An entry to write to the audit log.
pub struct AuditEntry {
    pub route: String,
    pub method: String,
    pub user_id: Option<String>,
    pub status: u16,
    pub outcome: AuditOutcome,
    /// Server-side detail (upstream error bodies, validation text).
    pub detail: Option<String>,
    pub processing_ms: Option<i64>,
}

/// Outcome of an audited request.
pub enum AuditOutcome {
    Ok,
    Error,
    Denied,
}

impl AuditOutcome {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Error => "error",
            Self::Denied => "denied",
        }
    }
}

/// Audit logger backed by SQLite.
#[derive(Clone)]
pub struct AuditLogger {
    pool: SqlitePool,
}

impl AuditLogger {
    /// Open (or create) the audit database and ensure the schema exists.
    pub async fn new(config: &AuditConfig) -> Result<Self, SparkError> {
        let db_path = shellexpand(&config.db_path);

        if let Some(parent) = std::path::Path::new(&db_path).parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| SparkError::Audit(format!("failed to create data dir: {e}")))?;
        }

        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{db_path}"))
            .map_err(|e| SparkError::Audit(format!("invalid db path: {e}")))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(2)
            .connect_with(opts)
            .await
            .map_err(|e| SparkError::Audit(format!("failed to connect to sqlite: {e}")))?;

        sqlx::raw_sql(SCHEMA)
            .execute(&pool)
            .await
            .map_err(|e| SparkError::Audit(format!("failed to create audit schema: {e}")))?;

        info!("Audit log initialized at {db_path}");
        Ok(Self { pool })
    }

    /// In-memory logger for tests.
    pub async fn in_memory() -> Result<Self, SparkError> {
        let opts = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| SparkError::Audit(format!("invalid db path: {e}")))?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(opts)
            .await
            .map_err(|e| SparkError::Audit(format!("failed to connect to sqlite: {e}")))?;
        sqlx::raw_sql(SCHEMA)
            .execute(&pool)
            .await
            .map_err(|e| SparkError::Audit(format!("failed to create audit schema: {e}")))?;
        Ok(Self { pool })
    }

    /// Write an entry to the audit log.
    pub async fn log(&self, entry: &AuditEntry) -> Result<(), SparkError> {
        let id = Uuid::new_v4().to_string();

        sqlx::query(
            "INSERT INTO audit_log \
             (id, route, method, user_id, status, outcome, detail, processing_ms) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&entry.route)
        .bind(&entry.method)
        .bind(&entry.user_id)
        .bind(entry.status)
        .bind(entry.outcome.as_str())
        .bind(&entry.detail)
        .bind(entry.processing_ms)
        .execute(&self.pool)
        .await
        .map_err(|e| SparkError::Audit(format!("audit log write failed: {e}")))?;

        debug!(
            "audit: {} {} [{} {}]",
            entry.method,
            entry.route,
            entry.status,
            entry.outcome.as_str()
        );

        Ok(())
    }

    /// Number of logged entries, for diagnostics.
    pub async fn count(&self) -> Result<i64, SparkError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM audit_log")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| SparkError::Audit(format!("audit count failed: {e}")))?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(route: &str, status: u16, outcome: AuditOutcome) -> AuditEntry {
        AuditEntry {
            route: route.to_string(),
            method: "POST".to_string(),
            user_id: None,
            status,
            outcome,
            detail: None,
            processing_ms: Some(12),
        }
    }

    #[tokio::test]
    async fn test_log_and_count() {
        let audit = AuditLogger::in_memory().await.unwrap();
        audit.log(&entry("/api/auth/login", 200, AuditOutcome::Ok)).await.unwrap();
        audit
            .log(&entry("/api/tasks/abc/schedule", 500, AuditOutcome::Error))
            .await
            .unwrap();
        assert_eq!(audit.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_file_backed_logger() {
        let dir = tempfile::tempdir().unwrap();
        let config = AuditConfig {
            enabled: true,
            db_path: dir.path().join("audit.db").to_string_lossy().into_owned(),
        };
        let audit = AuditLogger::new(&config).await.unwrap();
        audit.log(&entry("/api/health", 200, AuditOutcome::Ok)).await.unwrap();
        assert_eq!(audit.count().await.unwrap(), 1);
    }
}
