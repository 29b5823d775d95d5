/*!
 * Grammar rewrite layer.
 *
 * Applies the grammar stage of the rule engine to the working text. The
 * layer owns no rules of its own; it shares one compiled engine with the
 * word order and postprocessing layers.
 */

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;

use super::TranslationLayer;
use crate::text_utils;
use crate::translation::context::TranslationContext;
use crate::translation::result::LayerResult;
use crate::translation::rules::{RuleEngine, RuleStage};

/// Rule-driven grammar rewrites
pub struct GrammarLayer {
    /// Compiled rules shared across the rule-driven layers
    rules: Arc<RuleEngine>,
}

impl GrammarLayer {
    /// Create a grammar layer over a compiled rule engine
    pub fn new(rules: Arc<RuleEngine>) -> Self {
        Self { rules }
    }
}

#[async_trait]
impl TranslationLayer for GrammarLayer {
    fn name(&self) -> &str {
        "grammar"
    }

    fn description(&self) -> &str {
        "Applies grammar rewrite rules for the language pair"
    }

    fn can_handle(&self, text: &str, _context: &TranslationContext) -> bool {
        !text.trim().is_empty() && self.rules.stage_len(RuleStage::Grammar) > 0
    }

    async fn process(&self, text: &str, context: &mut TranslationContext) -> LayerResult {
        let started = Instant::now();
        let current = context.current_text(text).to_string();

        let outcome = self.rules.apply(RuleStage::Grammar, &current, context);
        for rule_id in &outcome.applied_rule_ids {
            context.record_applied_rule(rule_id);
        }

        if outcome.text != current {
            // Later layers read tokens, so rewrites must refresh them
            context.tokens = text_utils::tokenize(&outcome.text);
            context.translated_text = Some(outcome.text.clone());
        }

        LayerResult::success(
            &outcome.text,
            self.rules.stage_len(RuleStage::Grammar),
            outcome.applications,
            started.elapsed().as_millis() as u64,
            &format!("applied {} grammar rewrite(s)", outcome.applications),
        )
    }
}
