/*!
 * Pre-processing layer.
 *
 * Normalizes whitespace, tokenizes the input, and seeds the running
 * translation. Every later layer depends on the tokens this layer puts
 * on the context.
 */

use std::time::Instant;

use async_trait::async_trait;

use super::TranslationLayer;
use crate::text_utils;
use crate::translation::context::{MetadataValue, TranslationContext, metadata_keys};
use crate::translation::result::LayerResult;

/// Whitespace normalization and tokenization
#[derive(Debug, Default, Clone)]
pub struct PreprocessingLayer;

impl PreprocessingLayer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TranslationLayer for PreprocessingLayer {
    fn name(&self) -> &str {
        "preprocessing"
    }

    fn description(&self) -> &str {
        "Normalizes whitespace and tokenizes the input text"
    }

    fn can_handle(&self, text: &str, _context: &TranslationContext) -> bool {
        !text.trim().is_empty()
    }

    async fn process(&self, text: &str, context: &mut TranslationContext) -> LayerResult {
        let started = Instant::now();

        let normalized = text_utils::collapse_whitespace(text);
        let tokens = text_utils::tokenize(&normalized);
        let token_count = tokens.len();

        context.tokens = tokens.clone();
        context.set_metadata(metadata_keys::TOKENS, MetadataValue::Tokens(tokens));
        context.set_metadata(
            metadata_keys::TOKEN_COUNT,
            MetadataValue::Number(token_count as f64),
        );

        let modifications = if normalized == text { 0 } else { 1 };
        context.translated_text = Some(normalized.clone());

        LayerResult::success(
            &normalized,
            token_count,
            modifications,
            started.elapsed().as_millis() as u64,
            &format!("tokenized into {} token(s)", token_count),
        )
    }
}
