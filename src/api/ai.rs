//! AI recommendation route.
//!
//! The assessment is stored before the model call, so a model outage never
//! loses the user's input. Any suggester failure or empty result swaps in the
//! static fallback list; the response always carries at least one
//! recommendation, each tagged with its source.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use sparkclean_ai::fallback;
use sparkclean_audit::AuditOutcome;
use sparkclean_core::model::{AssessmentInput, Recommendation, RecommendationSource};
use std::time::Instant;
use tracing::warn;

use super::{audit, bad_request, fetch_failed, require_user, ApiError, ApiState};

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(flatten)]
    assessment: AssessmentInput,
    #[serde(default = "default_language")]
    language: String,
}

fn default_language() -> String {
    "en".to_string()
}

/// `POST /api/ai/generate-tasks` — store the assessment, generate
/// recommendations.
pub async fn generate_tasks(
    headers: HeaderMap,
    State(state): State<ApiState>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<Value>, ApiError> {
    let started = Instant::now();
    let user = require_user(&headers, &state).await?;

    if req.assessment.home_type.trim().is_empty() {
        return Err(bad_request("home_type is required"));
    }
    if req.assessment.bedrooms == 0 || req.assessment.bedrooms > 50 {
        return Err(bad_request("bedrooms must be between 1 and 50"));
    }
    if req.assessment.bathrooms == 0 || req.assessment.bathrooms > 50 {
        return Err(bad_request("bathrooms must be between 1 and 50"));
    }

    let assessment = state
        .store
        .upsert_assessment(user.id, &req.assessment)
        .await
        .map_err(fetch_failed)?;

    let recommendations = match state.suggester.suggest(&req.assessment, &req.language).await {
        Ok(recs) if !recs.is_empty() => recs,
        Ok(_) => {
            warn!("suggester returned no recommendations, using fallback");
            fallback::recommendations(&req.language)
        }
        Err(e) => {
            warn!("suggester failed ({e}), using fallback");
            fallback::recommendations(&req.language)
        }
    };

    let fallback_count = count_source(&recommendations, RecommendationSource::Fallback);
    let model_count = count_source(&recommendations, RecommendationSource::Gemini);

    audit(
        &state,
        "/api/ai/generate-tasks",
        "POST",
        Some(&user),
        StatusCode::OK,
        AuditOutcome::Ok,
        Some(format!("{model_count} model, {fallback_count} fallback")),
        started,
    )
    .await;

    Ok(Json(json!({
        "assessment": assessment,
        "recommendations": recommendations,
        "metadata": {
            "language": req.language,
            "model_count": model_count,
            "fallback_count": fallback_count,
        },
    })))
}

fn count_source(recs: &[Recommendation], source: RecommendationSource) -> usize {
    recs.iter().filter(|r| r.source == source).count()
}
