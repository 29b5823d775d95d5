/*!
 * Word order layer.
 *
 * Applies the word order stage of the rule engine, restricted to rules
 * whose syntactic order tags match the constituent orders of the request's
 * languages. Untagged rules apply to every pair.
 */

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use once_cell::sync::Lazy;

use super::TranslationLayer;
use crate::text_utils;
use crate::translation::context::TranslationContext;
use crate::translation::result::LayerResult;
use crate::translation::rules::{RuleEngine, RuleStage, SyntacticOrder};

/// Dominant constituent order by ISO 639-1 code
static LANGUAGE_ORDERS: Lazy<HashMap<&'static str, SyntacticOrder>> = Lazy::new(|| {
    HashMap::from([
        ("en", SyntacticOrder::Svo),
        ("ru", SyntacticOrder::Svo),
        ("es", SyntacticOrder::Svo),
        ("fr", SyntacticOrder::Svo),
        ("de", SyntacticOrder::Svo),
        ("it", SyntacticOrder::Svo),
        ("pt", SyntacticOrder::Svo),
        ("zh", SyntacticOrder::Svo),
        ("ja", SyntacticOrder::Sov),
        ("ko", SyntacticOrder::Sov),
        ("tr", SyntacticOrder::Sov),
        ("hi", SyntacticOrder::Sov),
        ("ar", SyntacticOrder::Vso),
        ("ga", SyntacticOrder::Vso),
        ("mg", SyntacticOrder::Vos),
    ])
});

/// Dominant constituent order for a language code, if known
pub fn syntactic_order_for(language: &str) -> Option<SyntacticOrder> {
    LANGUAGE_ORDERS.get(language.to_lowercase().as_str()).copied()
}

/// Rule-driven constituent reordering
pub struct WordOrderLayer {
    /// Compiled rules shared across the rule-driven layers
    rules: Arc<RuleEngine>,
}

impl WordOrderLayer {
    /// Create a word order layer over a compiled rule engine
    pub fn new(rules: Arc<RuleEngine>) -> Self {
        Self { rules }
    }
}

#[async_trait]
impl TranslationLayer for WordOrderLayer {
    fn name(&self) -> &str {
        "word_order"
    }

    fn description(&self) -> &str {
        "Reorders constituents to match the target language"
    }

    fn can_handle(&self, text: &str, context: &TranslationContext) -> bool {
        !text.trim().is_empty()
            && !context.tokens.is_empty()
            && self.rules.stage_len(RuleStage::WordOrder) > 0
    }

    async fn process(&self, text: &str, context: &mut TranslationContext) -> LayerResult {
        let started = Instant::now();
        let current = context.current_text(text).to_string();

        let source_order = syntactic_order_for(&context.source_language);
        let target_order = syntactic_order_for(&context.target_language);

        let outcome = self
            .rules
            .apply_filtered(RuleStage::WordOrder, &current, context, |rule| {
                let source_ok = rule.source_order.is_none_or(|o| source_order == Some(o));
                let target_ok = rule.target_order.is_none_or(|o| target_order == Some(o));
                source_ok && target_ok
            });

        for rule_id in &outcome.applied_rule_ids {
            context.record_applied_rule(rule_id);
        }

        if outcome.text != current {
            context.tokens = text_utils::tokenize(&outcome.text);
            context.translated_text = Some(outcome.text.clone());
        }

        LayerResult::success(
            &outcome.text,
            self.rules.stage_len(RuleStage::WordOrder),
            outcome.applications,
            started.elapsed().as_millis() as u64,
            &format!("applied {} reordering(s)", outcome.applications),
        )
    }
}
