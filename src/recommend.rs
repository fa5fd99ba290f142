//! Outfit recommendation: prompt building and structured extraction
//!
//! Builds a stylist prompt from the caller's wardrobe, invokes the
//! text-generation capability, and extracts a structured recommendation list
//! from free-form generated text. Extraction is deliberately the simple
//! first-`{`-to-last-`}` heuristic rather than a general parser: generated
//! text wraps at most one JSON object in pleasantries, and the heuristic
//! degrades to a soft failure instead of rejecting near-miss output.

use crate::capabilities::TextGeneration;
use crate::config::GenerationParams;
use crate::error::{Result, VisionError};
use crate::types::{RecommendationOutcome, WardrobeItem};
use log::info;
use tracing::{debug, warn};

/// Fixed stylist instructions, including the output schema the extractor
/// expects
pub const SYSTEM_PROMPT: &str = r#"You are an expert fashion stylist. The user will give you their complete wardrobe as a list of clothing items, each with an id, category, color, style, and material.

Your job is to suggest 3 outfit combinations from these items. Each outfit should:
- Be a complete look (top + bottom, or a dress, plus shoes if available)
- Have good color coordination and style cohesion
- Be suitable for the occasion/season if specified

Respond ONLY with valid JSON in this exact format, no other text:
{
  "recommendations": [
    {
      "outfit_items": ["item-id-1", "item-id-2", "item-id-3"],
      "occasion": "casual day out",
      "description": "A brief explanation of why these items work together",
      "style_tags": ["minimalist", "monochrome"]
    }
  ]
}"#;

/// Serialize the wardrobe and constraints into the user turn
///
/// Occasion and season are appended verbatim when supplied.
///
/// # Errors
///
/// Returns `VisionError::Internal` when the wardrobe cannot be serialized.
pub fn build_user_prompt(
    wardrobe: &[WardrobeItem],
    occasion: Option<&str>,
    season: Option<&str>,
) -> Result<String> {
    let wardrobe_json = serde_json::to_string_pretty(wardrobe)
        .map_err(|e| VisionError::internal(format!("failed to serialize wardrobe: {e}")))?;

    let mut prompt = format!("Here is my complete wardrobe:\n{wardrobe_json}");
    if let Some(occasion) = occasion {
        prompt.push_str(&format!("\n\nSuggest outfits for: {occasion}"));
    }
    if let Some(season) = season {
        prompt.push_str(&format!("\nSeason: {season}"));
    }
    Ok(prompt)
}

/// Locate the JSON-like span of generated text: first `{` to last `}`,
/// inclusive
#[must_use]
pub fn extract_json_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// Parse generated text into a recommendation outcome
///
/// A missing span or a parse failure yields the soft-failure shape carrying
/// the full raw text; this never errors.
#[must_use]
pub fn parse_outcome(text: &str) -> RecommendationOutcome {
    let Some(span) = extract_json_span(text) else {
        return RecommendationOutcome::from_raw_text(text);
    };

    match serde_json::from_str::<RecommendationOutcome>(span) {
        Ok(mut outcome) => {
            // raw_response is this crate's soft-failure signal, not part of
            // the generation schema; a model echoing it must not fake one.
            outcome.raw_response = None;
            outcome
        },
        Err(e) => {
            debug!(error = %e, "generated span did not parse");
            RecommendationOutcome::from_raw_text(text)
        },
    }
}

/// Generate and extract outfit recommendations for a wardrobe
///
/// # Errors
///
/// Returns `VisionError::Capability` when the generation capability fails.
/// Malformed output degrades to the soft-failure outcome instead.
pub fn generate_recommendations(
    generator: &dyn TextGeneration,
    wardrobe: &[WardrobeItem],
    occasion: Option<&str>,
    season: Option<&str>,
    params: &GenerationParams,
) -> Result<RecommendationOutcome> {
    let user_prompt = build_user_prompt(wardrobe, occasion, season)?;

    info!(
        "generating outfit recommendations for {} wardrobe items",
        wardrobe.len()
    );
    let text = generator
        .generate(SYSTEM_PROMPT, &user_prompt, params)
        .map_err(|e| VisionError::capability_failed(generator.name(), &e))?;
    debug!(
        preview = %text.chars().take(200).collect::<String>(),
        "raw generated text"
    );

    let outcome = parse_outcome(&text);
    if outcome.is_soft_failure() {
        warn!("generated text had no parseable JSON span, returning raw response");
    } else {
        info!("extracted {} recommendations", outcome.recommendations.len());
    }
    Ok(outcome)
}
