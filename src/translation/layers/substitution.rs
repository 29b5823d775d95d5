/*!
 * Dictionary and phrase substitution layer.
 *
 * Phrase matches win over word-by-word translation: the layer scans token
 * spans longest-first and falls back to single-word lookups only where no
 * phrase covers the tokens. Lookups never partial-match; a token without
 * an exact dictionary entry passes through unchanged, whatever its length.
 */

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use async_trait::async_trait;

use super::TranslationLayer;
use crate::repositories::{DictionaryRepository, PhraseRecord, PhraseRepository};
use crate::text_utils;
use crate::translation::cache::CacheManager;
use crate::translation::context::{MetadataValue, TranslationContext, metadata_keys};
use crate::translation::result::LayerResult;

/// Longest phrase span considered, in word tokens
pub const MAX_PHRASE_TOKENS: usize = 6;

/// Outcome of a single word lookup
enum WordOutcome {
    /// Excluded by the request; passes through verbatim
    Excluded,
    /// Replaced by a forced, cached, or repository translation
    Replaced(String),
    /// No entry found; passes through verbatim
    Unmatched,
}

impl WordOutcome {
    /// The token to emit for this outcome
    fn rendered(&self, original: &str) -> String {
        match self {
            Self::Replaced(translation) => translation.clone(),
            Self::Excluded | Self::Unmatched => original.to_string(),
        }
    }
}

/// Word and phrase substitution against the lexical repositories
pub struct SubstitutionLayer {
    /// Word lookups
    dictionary: Arc<dyn DictionaryRepository>,

    /// Phrase lookups
    phrases: Arc<dyn PhraseRepository>,

    /// Bounded cache in front of both repositories
    cache: CacheManager,
}

impl SubstitutionLayer {
    /// Create a substitution layer over the given repositories
    pub fn new(
        dictionary: Arc<dyn DictionaryRepository>,
        phrases: Arc<dyn PhraseRepository>,
        cache: CacheManager,
    ) -> Self {
        Self {
            dictionary,
            phrases,
            cache,
        }
    }

    /// Look up a phrase span, cache-first
    async fn lookup_phrase(
        &self,
        language_pair: &str,
        span_text: &str,
        context: &TranslationContext,
    ) -> Result<Option<PhraseRecord>> {
        if context.use_cache {
            if let Some(record) = self.cache.get_phrase(language_pair, span_text) {
                return Ok(Some(record));
            }
        }

        let record = self.phrases.find_phrase(language_pair, span_text).await?;
        if let Some(record) = &record {
            if context.save_to_cache {
                self.cache
                    .store_phrase(language_pair, span_text, record.clone());
            }
        }

        Ok(record)
    }

    /// Translate a single word token
    ///
    /// Order: exclusions, forced translations, cache, repository. Only an
    /// exact normalized match counts; there is no prefix or substring
    /// fallback.
    async fn translate_word(
        &self,
        language_pair: &str,
        token: &str,
        context: &TranslationContext,
    ) -> Result<WordOutcome> {
        if context.should_exclude_word(token) {
            return Ok(WordOutcome::Excluded);
        }

        if let Some(forced) = context.get_force_translation(token) {
            return Ok(WordOutcome::Replaced(forced.to_string()));
        }

        if context.use_cache {
            if let Some(record) = self.cache.get_word(language_pair, token) {
                return Ok(WordOutcome::Replaced(record.translation));
            }
        }

        match self.dictionary.find_word(language_pair, token).await? {
            Some(record) => {
                if context.save_to_cache {
                    self.cache.store_word(language_pair, token, record.clone());
                }
                Ok(WordOutcome::Replaced(record.translation))
            }
            None => Ok(WordOutcome::Unmatched),
        }
    }
}

#[async_trait]
impl TranslationLayer for SubstitutionLayer {
    fn name(&self) -> &str {
        "substitution"
    }

    fn description(&self) -> &str {
        "Replaces words and phrases using the lexical repositories"
    }

    fn can_handle(&self, _text: &str, context: &TranslationContext) -> bool {
        !context.tokens.is_empty()
    }

    async fn process(&self, text: &str, context: &mut TranslationContext) -> LayerResult {
        let started = Instant::now();
        let pair = context.language_pair();
        let tokens = context.tokens.clone();

        let mut translated: Vec<String> = Vec::with_capacity(tokens.len());
        let mut word_by_word: Vec<String> = Vec::with_capacity(tokens.len());
        let mut matched_phrases: Vec<String> = Vec::new();
        let mut items_processed = 0;
        let mut matched_items = 0;
        let mut modifications = 0;

        let mut index = 0;
        while index < tokens.len() {
            let token = &tokens[index];

            if !text_utils::is_word_token(token) {
                translated.push(token.clone());
                word_by_word.push(token.clone());
                index += 1;
                continue;
            }

            // Phrase spans cannot cross punctuation
            let run_len = tokens[index..]
                .iter()
                .take_while(|t| text_utils::is_word_token(t))
                .count();
            let max_span = run_len.min(MAX_PHRASE_TOKENS);

            let mut phrase_hit: Option<(usize, PhraseRecord)> = None;
            if max_span >= 2 {
                for span in (2..=max_span).rev() {
                    // Spans containing an excluded or forced word never
                    // phrase-match
                    let reserved = tokens[index..index + span].iter().any(|t| {
                        context.should_exclude_word(t)
                            || context.get_force_translation(t).is_some()
                    });
                    if reserved {
                        continue;
                    }

                    let span_text = tokens[index..index + span].join(" ");
                    match self.lookup_phrase(&pair, &span_text, context).await {
                        Ok(Some(record)) if record.confidence >= context.min_confidence => {
                            phrase_hit = Some((span, record));
                            break;
                        }
                        Ok(_) => {}
                        Err(e) => {
                            return LayerResult::failure(
                                context.current_text(text),
                                &format!("phrase lookup failed: {}", e),
                                started.elapsed().as_millis() as u64,
                            );
                        }
                    }
                }
            }

            if let Some((span, record)) = phrase_hit {
                // The word-by-word rendering still translates each word so
                // the caller can compare it against the phrase translation
                for span_token in &tokens[index..index + span] {
                    match self.translate_word(&pair, span_token, context).await {
                        Ok(outcome) => word_by_word.push(outcome.rendered(span_token)),
                        Err(e) => {
                            return LayerResult::failure(
                                context.current_text(text),
                                &format!("word lookup failed: {}", e),
                                started.elapsed().as_millis() as u64,
                            );
                        }
                    }
                }

                translated.push(record.translation.clone());
                matched_phrases.push(record.source_text.clone());
                items_processed += span;
                matched_items += span;
                modifications += 1;
                index += span;
                continue;
            }

            match self.translate_word(&pair, token, context).await {
                Ok(WordOutcome::Excluded) => {
                    translated.push(token.clone());
                    word_by_word.push(token.clone());
                }
                Ok(WordOutcome::Replaced(replacement)) => {
                    items_processed += 1;
                    matched_items += 1;
                    modifications += 1;
                    translated.push(replacement.clone());
                    word_by_word.push(replacement);
                }
                Ok(WordOutcome::Unmatched) => {
                    items_processed += 1;
                    translated.push(token.clone());
                    word_by_word.push(token.clone());
                }
                Err(e) => {
                    return LayerResult::failure(
                        context.current_text(text),
                        &format!("word lookup failed: {}", e),
                        started.elapsed().as_millis() as u64,
                    );
                }
            }
            index += 1;
        }

        let rebuilt = text_utils::detokenize(&translated);
        context.translated_text = Some(rebuilt.clone());

        if !matched_phrases.is_empty() {
            let alternative = text_utils::detokenize(&word_by_word);
            if alternative != rebuilt {
                context.set_metadata(
                    metadata_keys::ALTERNATIVES,
                    MetadataValue::Tokens(vec![alternative]),
                );
            }
            context.set_metadata(
                metadata_keys::MATCHED_PHRASES,
                MetadataValue::Tokens(matched_phrases.clone()),
            );
        }

        let mut result = LayerResult::success(
            &rebuilt,
            items_processed,
            modifications,
            started.elapsed().as_millis() as u64,
            &format!(
                "matched {}/{} word token(s), {} phrase(s)",
                matched_items,
                items_processed,
                matched_phrases.len()
            ),
        );

        if items_processed > 0 {
            result = result.with_confidence(matched_items as f64 / items_processed as f64);
        }

        result
    }
}
