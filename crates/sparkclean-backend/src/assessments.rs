//! The one-per-user home assessment row.

use reqwest::Method;
use serde_json::json;
use sparkclean_core::error::SparkError;
use sparkclean_core::model::{AssessmentInput, HomeAssessment};
use uuid::Uuid;

use crate::BackendClient;

impl BackendClient {
    /// Insert or replace the user's assessment. `on_conflict=user_id` with
    /// merge-duplicates makes the row unique per user.
    pub(crate) async fn upsert_assessment_row(
        &self,
        user_id: Uuid,
        input: &AssessmentInput,
    ) -> Result<HomeAssessment, SparkError> {
        let mut body = serde_json::to_value(input)?;
        body["user_id"] = json!(user_id);

        let resp = self
            .rest_request(Method::POST, "home_assessments")
            .query(&[("on_conflict", "user_id")])
            .header("Prefer", "resolution=merge-duplicates,return=representation")
            .json(&body)
            .send()
            .await
            .map_err(|e| SparkError::Backend(format!("upsert assessment request failed: {e}")))?;

        let mut rows: Vec<HomeAssessment> = Self::expect_json(resp, "upsert assessment").await?;
        rows.pop()
            .ok_or_else(|| SparkError::Backend("upsert assessment returned no row".to_string()))
    }

    pub(crate) async fn get_assessment_row(
        &self,
        user_id: Uuid,
    ) -> Result<Option<HomeAssessment>, SparkError> {
        let resp = self
            .rest_request(Method::GET, "home_assessments")
            .query(&[
                ("user_id", format!("eq.{user_id}")),
                ("limit", "1".to_string()),
            ])
            .send()
            .await
            .map_err(|e| SparkError::Backend(format!("get assessment request failed: {e}")))?;

        let mut rows: Vec<HomeAssessment> = Self::expect_json(resp, "get assessment").await?;
        Ok(rows.pop())
    }
}

#[cfg(test)]
mod tests {
    use sparkclean_core::model::HomeAssessment;

    #[test]
    fn test_assessment_row_parsing_flattens_input() {
        let row = r#"{
            "id": "7d444840-9dc0-11d1-b245-5ffdce74fad2",
            "user_id": "9f0c1f34-9dc0-11d1-b245-5ffdce74fad2",
            "home_type": "apartment",
            "bedrooms": 2,
            "bathrooms": 1,
            "has_pets": true,
            "has_children": false,
            "lifestyle": "works from home",
            "cleaning_preference": "light daily upkeep",
            "created_at": "2026-05-01T10:00:00+00:00",
            "updated_at": "2026-05-01T10:00:00+00:00"
        }"#;
        let a: HomeAssessment = serde_json::from_str(row).unwrap();
        assert_eq!(a.input.home_type, "apartment");
        assert!(a.input.has_pets);
        assert_eq!(a.input.bedrooms, 2);
    }
}
