//! Auth endpoints — sign-in, token introspection, recovery, admin lookup.
//!
//! All credential verification happens on the hosted side. Non-2xx auth
//! responses collapse to `Unauthorized` without echoing upstream detail, so
//! callers cannot tell "no such account" from "wrong password".

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use sparkclean_core::error::SparkError;
use sparkclean_core::model::{AuthUser, Session};
use sparkclean_core::traits::AuthBackend;
use tracing::{debug, warn};

use crate::BackendClient;

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    expires_in: u64,
    user: AuthUser,
}

#[derive(Deserialize)]
struct AdminUsersResponse {
    #[serde(default)]
    users: Vec<AuthUser>,
}

#[async_trait]
impl AuthBackend for BackendClient {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, SparkError> {
        debug!("auth: POST token grant_type=password");
        let resp = self
            .http
            .post(self.auth_url("token?grant_type=password"))
            .header("apikey", &self.anon_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| SparkError::Backend(format!("sign-in request failed: {e}")))?;

        if resp.status().as_u16() == 400 || resp.status().as_u16() == 401 {
            let body = resp.text().await.unwrap_or_default();
            warn!("sign-in rejected by backend: {body}");
            return Err(SparkError::Unauthorized("invalid credentials".to_string()));
        }

        let token: TokenResponse = Self::expect_json(resp, "sign-in").await?;
        Ok(Session {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            expires_in: token.expires_in,
            user: token.user,
        })
    }

    async fn user_from_token(&self, access_token: &str) -> Result<AuthUser, SparkError> {
        let resp = self
            .http
            .get(self.auth_url("user"))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| SparkError::Backend(format!("token check failed: {e}")))?;

        if resp.status().as_u16() == 401 || resp.status().as_u16() == 403 {
            return Err(SparkError::Unauthorized("invalid or expired token".to_string()));
        }

        Self::expect_json(resp, "token check").await
    }

    async fn send_recovery(&self, email: &str) -> Result<(), SparkError> {
        debug!("auth: POST recover");
        let resp = self
            .http
            .post(self.auth_url("recover"))
            .header("apikey", &self.anon_key)
            .json(&json!({ "email": email }))
            .send()
            .await
            .map_err(|e| SparkError::Backend(format!("recovery request failed: {e}")))?;

        Self::expect_success(resp, "recovery").await?;
        Ok(())
    }

    async fn update_password(
        &self,
        access_token: &str,
        _refresh_token: Option<&str>,
        new_password: &str,
    ) -> Result<(), SparkError> {
        // The refresh token is accepted for interface parity with clients
        // that establish a full session first; password update only needs
        // the recovery access token.
        let resp = self
            .http
            .put(self.auth_url("user"))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .json(&json!({ "password": new_password }))
            .send()
            .await
            .map_err(|e| SparkError::Backend(format!("password update failed: {e}")))?;

        if resp.status().as_u16() == 401 || resp.status().as_u16() == 403 {
            return Err(SparkError::Unauthorized(
                "reset link is invalid or expired".to_string(),
            ));
        }

        Self::expect_success(resp, "password update").await?;
        Ok(())
    }

    async fn email_exists(&self, email: &str) -> Result<bool, SparkError> {
        // Admin endpoint; depends on the backend exposing its auth user
        // table, which is deployment-specific glue rather than part of the
        // task contract. Kept behind this one method so it can be swapped.
        if self.service_role_key.is_empty() {
            return Err(SparkError::Config(
                "backend.service_role_key required for email lookup".to_string(),
            ));
        }

        let resp = self
            .http
            .get(self.auth_url("admin/users"))
            .query(&[("email", email)])
            .header("apikey", &self.service_role_key)
            .bearer_auth(&self.service_role_key)
            .send()
            .await
            .map_err(|e| SparkError::Backend(format!("admin lookup failed: {e}")))?;

        let parsed: AdminUsersResponse = Self::expect_json(resp, "admin lookup").await?;
        let needle = email.trim().to_lowercase();
        Ok(parsed.users.iter().any(|u| u.email.to_lowercase() == needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_response_parsing() {
        let body = r#"{
            "access_token": "eyJh.x.y",
            "token_type": "bearer",
            "expires_in": 3600,
            "refresh_token": "r-123",
            "user": {"id": "9f0c1f34-9dc0-11d1-b245-5ffdce74fad2", "email": "ana@example.com"}
        }"#;
        let token: TokenResponse = serde_json::from_str(body).unwrap();
        assert_eq!(token.expires_in, 3600);
        assert_eq!(token.user.email, "ana@example.com");
    }

    #[test]
    fn test_admin_users_parsing_tolerates_missing_list() {
        let parsed: AdminUsersResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.users.is_empty());

        let body = r#"{"users": [{"id": "9f0c1f34-9dc0-11d1-b245-5ffdce74fad2", "email": "Ana@Example.com"}]}"#;
        let parsed: AdminUsersResponse = serde_json::from_str(body).unwrap();
        let needle = "ana@example.com";
        assert!(parsed.users.iter().any(|u| u.email.to_lowercase() == needle));
    }
}
