use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for ISO language code handling
///
/// Translation endpoints take ISO 639-1 (2-letter) codes plus the special
/// value "auto" for source-language detection. These helpers validate and
/// name codes before the pipeline starts any expensive work.

/// Check whether a code may be used as a source language ("auto" allowed)
pub fn validate_source_language(code: &str) -> Result<()> {
    let normalized = code.trim().to_lowercase();
    if normalized == "auto" {
        return Ok(());
    }
    validate_language_code(&normalized)
}

/// Validate an ISO 639-1 or ISO 639-2/T language code
pub fn validate_language_code(code: &str) -> Result<()> {
    let normalized = code.trim().to_lowercase();

    if normalized.len() == 2 && Language::from_639_1(&normalized).is_some() {
        return Ok(());
    }
    if normalized.len() == 3 && Language::from_639_3(&normalized).is_some() {
        return Ok(());
    }

    Err(anyhow!("Invalid language code: {}", code))
}

/// Check if two language codes represent the same language
pub fn language_codes_match(code1: &str, code2: &str) -> bool {
    match (to_language(code1), to_language(code2)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Get the English language name for a code ("auto" maps to "Auto-detect")
pub fn get_language_name(code: &str) -> Result<String> {
    let normalized = code.trim().to_lowercase();
    if normalized == "auto" {
        return Ok("Auto-detect".to_string());
    }

    to_language(&normalized)
        .map(|lang| lang.to_name().to_string())
        .ok_or_else(|| anyhow!("Failed to get language from code: {}", code))
}

fn to_language(code: &str) -> Option<Language> {
    let normalized = code.trim().to_lowercase();
    match normalized.len() {
        2 => Language::from_639_1(&normalized),
        3 => Language::from_639_3(&normalized),
        _ => None,
    }
}
