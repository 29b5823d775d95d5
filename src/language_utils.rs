/*!
 * Language utilities for ISO language code handling.
 *
 * This module provides functions for validating and normalizing ISO 639-1
 * (2-letter) and ISO 639-2 (3-letter) language codes, and for working with
 * the `"source-target"` language pair notation used throughout the engine.
 */

use std::collections::HashSet;

use anyhow::{Result, anyhow};
use isolang::Language;
use once_cell::sync::Lazy;

/// Language pairs the engine ships rule and lexicon support for.
///
/// `EngineConfig::supported_pairs` can replace this set per engine instance.
pub static DEFAULT_SUPPORTED_PAIRS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        "en-ru", "ru-en",
        "en-es", "es-en",
        "en-fr", "fr-en",
        "en-de", "de-en",
        "en-it", "it-en",
        "en-pt", "pt-en",
        "en-ja", "ja-en",
        "en-ar", "ar-en",
    ])
});

/// Normalize a language code to ISO 639-1 (2-letter) format
///
/// Accepts 2-letter codes directly and converts 3-letter ISO 639-2/T codes
/// when a 2-letter equivalent exists.
pub fn normalize_language_code(code: &str) -> Result<String> {
    let normalized_code = code.trim().to_lowercase();

    if normalized_code.len() == 2 {
        if Language::from_639_1(&normalized_code).is_some() {
            return Ok(normalized_code);
        }
    } else if normalized_code.len() == 3 {
        if let Some(lang) = Language::from_639_3(&normalized_code) {
            if let Some(code_639_1) = lang.to_639_1() {
                return Ok(code_639_1.to_string());
            }
        }
    }

    Err(anyhow!("Invalid language code: {}", code))
}

/// Check if a string is a valid ISO 639-1 or ISO 639-2/T language code
pub fn is_valid_language_code(code: &str) -> bool {
    normalize_language_code(code).is_ok()
}

/// Format a source and target code as a `"source-target"` pair string
pub fn format_language_pair(source: &str, target: &str) -> String {
    format!(
        "{}-{}",
        source.trim().to_lowercase(),
        target.trim().to_lowercase()
    )
}

/// Split a `"source-target"` pair string into its two codes
pub fn parse_language_pair(pair: &str) -> Result<(String, String)> {
    let mut parts = pair.trim().splitn(2, '-');
    match (parts.next(), parts.next()) {
        (Some(source), Some(target)) if !source.is_empty() && !target.is_empty() => {
            Ok((source.to_lowercase(), target.to_lowercase()))
        }
        _ => Err(anyhow!("Invalid language pair: {}", pair)),
    }
}

/// Reverse a `"source-target"` pair string into `"target-source"`
pub fn reverse_language_pair(pair: &str) -> Result<String> {
    let (source, target) = parse_language_pair(pair)?;
    Ok(format_language_pair(&target, &source))
}

/// Check whether a pair is in the supported set
///
/// When `overrides` is `Some`, it replaces the default set entirely.
pub fn is_pair_supported(source: &str, target: &str, overrides: Option<&HashSet<String>>) -> bool {
    let pair = format_language_pair(source, target);
    match overrides {
        Some(set) => set.contains(&pair),
        None => DEFAULT_SUPPORTED_PAIRS.contains(pair.as_str()),
    }
}

/// Check if two language codes match (represent the same language)
pub fn language_codes_match(code1: &str, code2: &str) -> bool {
    let normalized1 = match normalize_language_code(code1) {
        Ok(n) => n,
        Err(_) => return false,
    };

    let normalized2 = match normalize_language_code(code2) {
        Ok(n) => n,
        Err(_) => return false,
    };

    normalized1 == normalized2
}

/// Get the language name from a code
pub fn get_language_name(code: &str) -> Result<String> {
    let normalized = normalize_language_code(code)?;
    let lang = Language::from_639_1(&normalized)
        .ok_or_else(|| anyhow!("Failed to get language from code: {}", normalized))?;

    Ok(lang.to_name().to_string())
}
