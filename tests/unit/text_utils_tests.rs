/*!
 * Tests for tokenization and text normalization
 */

use translex::text_utils::{
    collapse_whitespace, detokenize, is_word_token, normalize_lookup_text, tokenize,
};

/// Test tokenization over scripts and punctuation
#[test]
fn test_tokenize_withUnicodeText_shouldSplitWordsAndMarks() {
    assert_eq!(
        tokenize("Доброе утро, мир!"),
        vec!["Доброе", "утро", ",", "мир", "!"]
    );

    // Numbers are word tokens
    assert_eq!(tokenize("room 42"), vec!["room", "42"]);

    // An ellipsis splits into single-character marks
    assert_eq!(
        tokenize("wait... go"),
        vec!["wait", ".", ".", ".", "go"]
    );
}

/// Test tokenization of degenerate inputs
#[test]
fn test_tokenize_withDegenerateInputs_shouldNotPanic() {
    assert!(tokenize("").is_empty());
    assert!(tokenize("   \t\n").is_empty());
    assert_eq!(tokenize("!!!"), vec!["!", "!", "!"]);
}

/// Test that tokenize and detokenize round-trip ordinary prose
#[test]
fn test_detokenize_afterTokenize_shouldRebuildPunctuatedText() {
    let original = "Hello... world!? (Really.)";
    let rebuilt = detokenize(&tokenize(original));
    assert_eq!(rebuilt, original);
}

/// Test lookup normalization used for cache and repository keys
#[test]
fn test_normalize_lookup_text_variants_shouldProduceOneKey() {
    let variants = ["Good Morning", "good  morning", "\"GOOD MORNING!\"", "good morning,"];
    for variant in variants {
        assert_eq!(normalize_lookup_text(variant), "good morning");
    }

    // Punctuation-only input normalizes to nothing
    assert_eq!(normalize_lookup_text("?!"), "");
}

/// Test whitespace collapse and token classification
#[test]
fn test_collapse_whitespace_andTokenClasses_shouldAgree() {
    let collapsed = collapse_whitespace(" Good \t morning  ");
    assert_eq!(collapsed, "Good morning");

    for token in tokenize(&collapsed) {
        assert!(is_word_token(&token));
    }
}
