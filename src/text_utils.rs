/*!
 * Text processing helpers shared across the translation layers.
 *
 * Tokenization, whitespace normalization, and the lookup-text normalization
 * that keeps cache keys and repository keys consistent with each other.
 */

use once_cell::sync::Lazy;
use regex::Regex;

/// Runs of whitespace, collapsed to a single space by `collapse_whitespace`
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Word tokens (letters/digits, with inner apostrophes or hyphens) or a
/// single punctuation mark
static TOKEN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\p{L}\p{N}]+(?:['’\-][\p{L}\p{N}]+)*|[^\s\p{L}\p{N}]").unwrap()
});

/// Punctuation that attaches to the preceding token when text is rebuilt
const CLOSING_MARKS: &str = ",.;:!?)]}»…";

/// Punctuation that attaches to the following token when text is rebuilt
const OPENING_MARKS: &str = "([{«";

/// Collapse all whitespace runs to single spaces and trim the ends
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text.trim(), " ").into_owned()
}

/// Split text into word and punctuation tokens
///
/// Word tokens keep inner apostrophes and hyphens (`don't`, `well-known`);
/// every other punctuation mark becomes its own single-character token.
pub fn tokenize(text: &str) -> Vec<String> {
    TOKEN_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Check whether a token is a word token rather than a punctuation mark
pub fn is_word_token(token: &str) -> bool {
    token.chars().next().is_some_and(|c| c.is_alphanumeric())
}

/// Normalize text for dictionary and phrase lookups
///
/// Keeps word tokens only, lowercased, joined by single spaces, so that
/// `"Good  morning,"` and `good morning` produce the same key.
pub fn normalize_lookup_text(text: &str) -> String {
    tokenize(text)
        .iter()
        .filter(|token| is_word_token(token))
        .map(|token| token.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Rebuild text from tokens, attaching punctuation to its neighbors
pub fn detokenize(tokens: &[String]) -> String {
    let mut result = String::new();

    for (index, token) in tokens.iter().enumerate() {
        if token.is_empty() {
            continue;
        }

        let attach_left = token.chars().count() == 1
            && token.chars().next().is_some_and(|c| CLOSING_MARKS.contains(c));
        let previous_opens = index > 0
            && tokens[index - 1].chars().count() == 1
            && tokens[index - 1]
                .chars()
                .next()
                .is_some_and(|c| OPENING_MARKS.contains(c));

        if !result.is_empty() && !attach_left && !previous_opens {
            result.push(' ');
        }

        result.push_str(token);
    }

    result
}
