//! Parsing of the model's suggestion text into recommendations.
//!
//! The model is asked for bare JSON but routinely wraps it in markdown
//! fences anyway; strip those before deserializing. Unknown enum values
//! are normalized rather than rejected so one odd field does not discard
//! the whole batch.

use serde::Deserialize;
use sparkclean_core::error::SparkError;
use sparkclean_core::model::{Category, Frequency, Priority, Recommendation, RecommendationSource};

#[derive(Deserialize)]
struct RawSuggestion {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    frequency: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    priority: Option<String>,
}

/// Strip a leading/trailing markdown code fence, with or without a
/// language tag.
fn strip_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the fence line ("```json" or bare "```"), then the closing fence.
    let rest = rest.split_once('\n').map_or("", |(_, body)| body);
    rest.trim_end().trim_end_matches("```").trim()
}

/// Parse model output into provenance-tagged recommendations.
///
/// Entries without a title are dropped; a non-array body is an error.
pub fn recommendations_from_text(text: &str) -> Result<Vec<Recommendation>, SparkError> {
    let body = strip_fences(text);
    let raw: Vec<RawSuggestion> = serde_json::from_str(body)
        .map_err(|e| SparkError::Ai(format!("suggestion parse failed: {e}")))?;

    Ok(raw
        .into_iter()
        .filter(|r| !r.title.trim().is_empty())
        .map(|r| Recommendation {
            title: r.title.trim().to_string(),
            description: r.description.filter(|d| !d.trim().is_empty()),
            frequency: Frequency::parse_lenient(r.frequency.as_deref().unwrap_or("")),
            category: Category::parse_lenient(r.category.as_deref().unwrap_or("")),
            priority: Priority::parse_lenient(r.priority.as_deref().unwrap_or("")),
            source: RecommendationSource::Gemini,
        })
        .collect())
}
