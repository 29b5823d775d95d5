/*!
 * Postprocessing layer.
 *
 * Final cleanup of the rendered text: whitespace and punctuation repairs
 * first, then any post_processing rules from the rule engine. Every repair
 * is idempotent, so running the layer twice changes nothing.
 */

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use super::TranslationLayer;
use crate::text_utils;
use crate::translation::context::TranslationContext;
use crate::translation::result::LayerResult;
use crate::translation::rules::{RuleEngine, RuleStage};

/// Built-in punctuation repairs, applied in order after whitespace collapse
static CLEANUP_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    vec![
        (Regex::new(r"\s+([,.;:!?])").unwrap(), "$1"),
        (Regex::new(r"\.{4,}").unwrap(), "..."),
        (Regex::new(r"!{3,}").unwrap(), "!"),
        (Regex::new(r"\?{3,}").unwrap(), "?"),
        (Regex::new(r",{2,}").unwrap(), ","),
    ]
});

/// Whitespace and punctuation cleanup plus post_processing rules
pub struct PostprocessingLayer {
    /// Compiled rules shared across the rule-driven layers
    rules: Arc<RuleEngine>,
}

impl PostprocessingLayer {
    /// Create a postprocessing layer over a compiled rule engine
    pub fn new(rules: Arc<RuleEngine>) -> Self {
        Self { rules }
    }
}

#[async_trait]
impl TranslationLayer for PostprocessingLayer {
    fn name(&self) -> &str {
        "postprocessing"
    }

    fn description(&self) -> &str {
        "Cleans up whitespace and punctuation in the final text"
    }

    fn can_handle(&self, text: &str, _context: &TranslationContext) -> bool {
        !text.trim().is_empty()
    }

    async fn process(&self, text: &str, context: &mut TranslationContext) -> LayerResult {
        let started = Instant::now();
        let mut current = context.current_text(text).to_string();
        let mut modifications = 0;

        let collapsed = text_utils::collapse_whitespace(&current);
        if collapsed != current {
            modifications += 1;
            current = collapsed;
        }

        for (pattern, replacement) in CLEANUP_PATTERNS.iter() {
            let cleaned = pattern.replace_all(&current, *replacement).into_owned();
            if cleaned != current {
                modifications += 1;
                current = cleaned;
            }
        }

        let outcome = self.rules.apply(RuleStage::PostProcessing, &current, context);
        for rule_id in &outcome.applied_rule_ids {
            context.record_applied_rule(rule_id);
        }
        modifications += outcome.applications;
        context.translated_text = Some(outcome.text.clone());

        LayerResult::success(
            &outcome.text,
            CLEANUP_PATTERNS.len() + 1 + self.rules.stage_len(RuleStage::PostProcessing),
            modifications,
            started.elapsed().as_millis() as u64,
            &format!(
                "cleaned punctuation, applied {} rule(s)",
                outcome.applications
            ),
        )
    }
}
