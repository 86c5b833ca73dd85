//! # sparkclean-backend
//!
//! Client for the hosted auth + database backend (GoTrue/PostgREST
//! compatible). Split into focused submodules:
//! - `auth` — sign-in, token introspection, password recovery, admin lookup
//! - `tasks` — task and instance rows
//! - `assessments` — the one-per-user home assessment row
//!
//! Row access runs with the service-role key and an explicit
//! `user_id=eq.{uuid}` filter on every read and write, so an id belonging
//! to another user simply matches zero rows.

mod assessments;
mod auth;
mod tasks;

use serde::de::DeserializeOwned;
use sparkclean_core::config::BackendConfig;
use sparkclean_core::error::SparkError;
use tracing::warn;

/// Client for the hosted backend. Cheap to clone; `reqwest::Client` is a
/// shared pool internally.
#[derive(Clone)]
#[cfg_attr(test, derive(Debug))]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
    service_role_key: String,
}

impl BackendClient {
    /// Create from config values.
    pub fn from_config(config: &BackendConfig) -> Result<Self, SparkError> {
        if config.url.is_empty() {
            return Err(SparkError::Config(
                "backend.url is not set in config.toml".to_string(),
            ));
        }
        if config.anon_key.is_empty() {
            return Err(SparkError::Config(
                "backend.anon_key is not set in config.toml".to_string(),
            ));
        }
        Ok(Self {
            http: reqwest::Client::new(),
            base_url: config.url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
            service_role_key: config.service_role_key.clone(),
        })
    }

    /// Probe the auth service health endpoint.
    pub async fn is_available(&self) -> bool {
        let url = format!("{}/auth/v1/health", self.base_url);
        match self.http.get(&url).header("apikey", &self.anon_key).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                warn!("backend not available: {e}");
                false
            }
        }
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.base_url)
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.base_url)
    }

    /// Row requests authenticate with the service-role key; ownership is
    /// enforced by the user_id filter each method appends.
    fn rest_request(&self, method: reqwest::Method, table: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, self.rest_url(table))
            .header("apikey", &self.service_role_key)
            .bearer_auth(&self.service_role_key)
    }

    /// Read the response body as JSON after checking the status, mapping
    /// failures to `SparkError::Backend`. The upstream body is kept in the
    /// error for server-side logs; handlers never echo it to clients.
    async fn expect_json<T: DeserializeOwned>(
        resp: reqwest::Response,
        what: &str,
    ) -> Result<T, SparkError> {
        let resp = Self::expect_success(resp, what).await?;
        resp.json()
            .await
            .map_err(|e| SparkError::Backend(format!("{what}: failed to parse response: {e}")))
    }

    async fn expect_success(
        resp: reqwest::Response,
        what: &str,
    ) -> Result<reqwest::Response, SparkError> {
        if resp.status().is_success() {
            return Ok(resp);
        }
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        Err(SparkError::Backend(format!("{what} returned {status}: {body}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sparkclean_core::model::Task;

    fn client() -> BackendClient {
        BackendClient::from_config(&BackendConfig {
            url: "https://abc.supabase.co/".to_string(),
            anon_key: "anon".to_string(),
            service_role_key: "service".to_string(),
        })
        .unwrap()
    }

    #[test]
    fn test_urls_strip_trailing_slash() {
        let c = client();
        assert_eq!(c.rest_url("tasks"), "https://abc.supabase.co/rest/v1/tasks");
        assert_eq!(
            c.auth_url("token?grant_type=password"),
            "https://abc.supabase.co/auth/v1/token?grant_type=password"
        );
    }

    #[test]
    fn test_missing_url_is_config_error() {
        let err = BackendClient::from_config(&BackendConfig::default()).unwrap_err();
        assert!(matches!(err, SparkError::Config(_)));
    }

    #[test]
    fn test_task_row_round_trip() {
        // Shape returned by the rows endpoint.
        let row = r#"{
            "id": "7d444840-9dc0-11d1-b245-5ffdce74fad2",
            "title": "Scrub the oven",
            "description": null,
            "frequency": "monthly",
            "category": "kitchen",
            "priority": "high",
            "completed": false,
            "due_date": null,
            "is_recurring": true,
            "recurrence_start_date": "2026-01-31",
            "last_generated_date": "2026-03-31",
            "user_id": "9f0c1f34-9dc0-11d1-b245-5ffdce74fad2",
            "created_at": "2026-01-31T08:00:00+00:00",
            "updated_at": "2026-03-31T08:00:00.412001+00:00"
        }"#;
        let task: Task = serde_json::from_str(row).unwrap();
        assert_eq!(task.title, "Scrub the oven");
        assert!(task.is_recurring);
        assert_eq!(
            task.recurrence_start_date.unwrap().to_string(),
            "2026-01-31"
        );
    }
}
