//! Google Gemini suggestion provider.
//!
//! Calls the Gemini `generateContent` endpoint. Auth via URL query param.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sparkclean_core::config::AiConfig;
use sparkclean_core::error::SparkError;
use sparkclean_core::model::{AssessmentInput, Recommendation};
use sparkclean_core::traits::Suggester;
use tracing::{debug, warn};

use crate::parse;
use crate::prompt;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini-backed suggester.
pub struct GeminiSuggester {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiSuggester {
    /// Create from config values.
    pub fn from_config(config: &AiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
}

#[derive(Serialize, Deserialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

impl GeminiRequest {
    fn for_prompt(system: String, user: String) -> Self {
        Self {
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart { text: user }],
            }],
            system_instruction: Some(GeminiContent {
                role: None,
                parts: vec![GeminiPart { text: system }],
            }),
        }
    }
}

fn first_candidate_text(parsed: &GeminiResponse) -> Option<&str> {
    parsed
        .candidates
        .as_ref()
        .and_then(|c| c.first())
        .and_then(|c| c.content.as_ref())
        .and_then(|c| c.parts.first())
        .map(|p| p.text.as_str())
}

#[async_trait]
impl Suggester for GeminiSuggester {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn suggest(
        &self,
        assessment: &AssessmentInput,
        language: &str,
    ) -> Result<Vec<Recommendation>, SparkError> {
        if self.api_key.is_empty() {
            return Err(SparkError::Ai("no API key configured".to_string()));
        }

        let body = GeminiRequest::for_prompt(
            prompt::system_instruction(language),
            prompt::user_prompt(assessment),
        );

        let url = format!(
            "{GEMINI_BASE_URL}/models/{}:generateContent?key={}",
            self.model, self.api_key
        );
        debug!("gemini: POST models/{}:generateContent", self.model);

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| SparkError::Ai(format!("gemini request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(SparkError::Ai(format!("gemini returned {status}: {text}")));
        }

        let parsed: GeminiResponse = resp
            .json()
            .await
            .map_err(|e| SparkError::Ai(format!("gemini: failed to parse response: {e}")))?;

        let text = first_candidate_text(&parsed)
            .ok_or_else(|| SparkError::Ai("gemini returned no candidates".to_string()))?;

        let recs = parse::recommendations_from_text(text)?;
        if recs.is_empty() {
            return Err(SparkError::Ai("gemini returned no usable suggestions".to_string()));
        }
        Ok(recs)
    }

    async fn is_available(&self) -> bool {
        if self.api_key.is_empty() {
            warn!("gemini: no API key configured");
            return false;
        }
        let url = format!("{GEMINI_BASE_URL}/models?key={}", self.api_key);
        match self.client.get(&url).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                warn!("gemini not available: {e}");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggester_name() {
        let s = GeminiSuggester::from_config(&AiConfig {
            api_key: "AIza-test".to_string(),
            model: "gemini-2.0-flash".to_string(),
        });
        assert_eq!(s.name(), "gemini");
    }

    #[test]
    fn test_request_serialization() {
        let body = GeminiRequest::for_prompt("Be terse.".to_string(), "Hello".to_string());
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("systemInstruction").is_some());
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "Hello");
    }

    #[test]
    fn test_candidate_text_extraction() {
        let json = r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"[]"}]}}]}"#;
        let resp: GeminiResponse = serde_json::from_str(json).unwrap();
        assert_eq!(first_candidate_text(&resp), Some("[]"));

        let empty: GeminiResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(first_candidate_text(&empty), None);
    }
}
