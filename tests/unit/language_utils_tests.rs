/*!
 * Tests for language utility functions
 */

use std::collections::HashSet;

use translex::language_utils::{
    format_language_pair, get_language_name, is_pair_supported, is_valid_language_code,
    language_codes_match, normalize_language_code, parse_language_pair, reverse_language_pair,
};

/// Test normalization of language codes to ISO 639-1 format
#[test]
fn test_normalize_language_code_withValidCodes_shouldNormalizeCorrectly() {
    // ISO 639-1 passes through
    assert_eq!(normalize_language_code("en").unwrap(), "en");
    assert_eq!(normalize_language_code("ru").unwrap(), "ru");

    // ISO 639-2/T converts down to the 2-letter form
    assert_eq!(normalize_language_code("eng").unwrap(), "en");
    assert_eq!(normalize_language_code("rus").unwrap(), "ru");
    assert_eq!(normalize_language_code("deu").unwrap(), "de");

    // Whitespace and case
    assert_eq!(normalize_language_code(" EN ").unwrap(), "en");
    assert_eq!(normalize_language_code("ENG").unwrap(), "en");

    // Invalid codes
    assert!(normalize_language_code("xyz").is_err());
    assert!(normalize_language_code("123").is_err());
    assert!(normalize_language_code("e").is_err());
    assert!(normalize_language_code("").is_err());
}

/// Test validity checks for language codes
#[test]
fn test_is_valid_language_code_withMixedInputs_shouldClassifyCorrectly() {
    assert!(is_valid_language_code("en"));
    assert!(is_valid_language_code("fra"));
    assert!(!is_valid_language_code("xx"));
    assert!(!is_valid_language_code("english"));
}

/// Test formatting and parsing of language pair strings
#[test]
fn test_language_pair_roundTrip_shouldPreserveCodes() {
    assert_eq!(format_language_pair("EN", " ru "), "en-ru");

    let (source, target) = parse_language_pair("en-ru").unwrap();
    assert_eq!(source, "en");
    assert_eq!(target, "ru");

    assert_eq!(reverse_language_pair("en-ru").unwrap(), "ru-en");

    assert!(parse_language_pair("enru").is_err());
    assert!(parse_language_pair("-ru").is_err());
    assert!(parse_language_pair("").is_err());
}

/// Test the default supported pair set
#[test]
fn test_is_pair_supported_withDefaultSet_shouldAcceptEnglishPairs() {
    assert!(is_pair_supported("en", "ru", None));
    assert!(is_pair_supported("ru", "en", None));
    assert!(is_pair_supported("EN", "ja", None));

    // Pairs without English are not in the default set
    assert!(!is_pair_supported("ru", "ja", None));
    assert!(!is_pair_supported("en", "xx", None));
}

/// Test supported pair overrides replacing the default set
#[test]
fn test_is_pair_supported_withOverrides_shouldReplaceDefaultSet() {
    let overrides: HashSet<String> = ["ru-ja".to_string()].into_iter().collect();

    assert!(is_pair_supported("ru", "ja", Some(&overrides)));
    // Default members are gone once an override set is given
    assert!(!is_pair_supported("en", "ru", Some(&overrides)));
}

/// Test matching of different language code formats
#[test]
fn test_language_codes_match_withEquivalentCodes_shouldReturnTrue() {
    assert!(language_codes_match("en", "eng"));
    assert!(language_codes_match("eng", "en"));
    assert!(language_codes_match("EN", "en"));
    assert!(!language_codes_match("en", "ru"));
    assert!(!language_codes_match("en", "xyz"));
}

/// Test language name resolution
#[test]
fn test_get_language_name_withValidCodes_shouldReturnEnglishName() {
    assert_eq!(get_language_name("en").unwrap(), "English");
    assert_eq!(get_language_name("rus").unwrap(), "Russian");
    assert!(get_language_name("xx").is_err());
}
