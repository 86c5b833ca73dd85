//! Prompt assembly for the suggestion request.

use sparkclean_core::model::AssessmentInput;

/// System instruction: output contract plus response language.
pub fn system_instruction(language: &str) -> String {
    let lang_line = language_name(language)
        .map(|name| format!("Write all titles and descriptions in {name}."))
        .unwrap_or_else(|| "Write all titles and descriptions in English.".to_string());

    format!(
        "You are a home-cleaning planner. Respond with ONLY a JSON array, no prose \
         and no markdown fences. Each element must have exactly these fields: \
         \"title\" (short imperative), \"description\" (one sentence), \
         \"frequency\" (daily|weekly|monthly|yearly), \
         \"category\" (kitchen|bathroom|bedroom|living_room|laundry|exterior|general), \
         \"priority\" (low|medium|high). Suggest 6 to 10 tasks. {lang_line}"
    )
}

/// User prompt describing the home.
pub fn user_prompt(a: &AssessmentInput) -> String {
    let mut lines = vec![
        format!("Home type: {}", a.home_type),
        format!("Bedrooms: {}", a.bedrooms),
        format!("Bathrooms: {}", a.bathrooms),
        format!("Pets: {}", if a.has_pets { "yes" } else { "no" }),
        format!("Children: {}", if a.has_children { "yes" } else { "no" }),
    ];
    if let Some(ref lifestyle) = a.lifestyle {
        lines.push(format!("Lifestyle: {lifestyle}"));
    }
    if let Some(ref pref) = a.cleaning_preference {
        lines.push(format!("Cleaning preference: {pref}"));
    }
    format!(
        "Suggest a cleaning routine for this home:\n{}",
        lines.join("\n")
    )
}

/// Map a BCP 47-ish tag to a language name the model understands.
/// Matching is on the primary subtag; unknown tags fall back to English.
fn language_name(tag: &str) -> Option<&'static str> {
    match tag.split(['-', '_']).next().unwrap_or("").to_lowercase().as_str() {
        "en" => Some("English"),
        "es" => Some("Spanish"),
        "pt" => Some("Portuguese"),
        "fr" => Some("French"),
        "de" => Some("German"),
        "it" => Some("Italian"),
        "nl" => Some("Dutch"),
        _ => None,
    }
}
