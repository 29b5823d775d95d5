/*!
 * Rule matching and application.
 *
 * Patterns are compiled once when the engine is built. At apply time the
 * engine repeatedly picks the single best matching rule for the current
 * text (highest priority, definition order on ties), rewrites every
 * non-overlapping occurrence, and re-scans the rewritten text until no
 * rule matches or the per-invocation application limit is reached.
 */

use std::collections::{HashMap, HashSet};

use log::{debug, warn};
use regex::{Regex, RegexBuilder};

use super::model::{Rule, RuleStage};
use crate::translation::context::TranslationContext;

/// Rule applications allowed per `apply` invocation
///
/// A rewrite can re-enable earlier rules, so termination needs a hard
/// limit in addition to retiring no-op rules.
pub const MAX_RULE_APPLICATIONS: usize = 32;

/// A rule with its compiled pattern and definition position
#[derive(Debug, Clone)]
pub struct CompiledRule {
    /// The rule definition
    pub rule: Rule,

    /// Compiled pattern, case sensitivity already applied
    regex: Regex,

    /// Position in definition order, for stable tie-breaking
    order_index: usize,
}

impl CompiledRule {
    /// Whether the pattern matches the given text
    pub fn matches(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// Result of applying a rule stage to a text
#[derive(Debug, Clone, Default)]
pub struct StageOutcome {
    /// Text after all applications
    pub text: String,

    /// Number of rule applications that changed the text
    pub applications: usize,

    /// Identifiers of the applied rules, in application order
    pub applied_rule_ids: Vec<String>,
}

/// Compiled rule set, indexed by stage
#[derive(Debug, Default)]
pub struct RuleEngine {
    /// Rules per stage, in definition order
    stages: HashMap<RuleStage, Vec<CompiledRule>>,

    /// Patterns that failed to compile, reported once at build time
    warnings: Vec<String>,
}

impl RuleEngine {
    /// Create an engine with no rules
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile a rule collection into an engine
    ///
    /// Invalid patterns are skipped with a warning; they never fail the
    /// build.
    pub fn compile(rules: &[Rule]) -> Self {
        let mut engine = Self::new();

        for (order_index, rule) in rules.iter().enumerate() {
            let regex = RegexBuilder::new(&rule.pattern)
                .case_insensitive(!rule.case_sensitive)
                .build();

            match regex {
                Ok(regex) => {
                    engine
                        .stages
                        .entry(rule.stage)
                        .or_default()
                        .push(CompiledRule {
                            rule: rule.clone(),
                            regex,
                            order_index,
                        });
                }
                Err(e) => {
                    let message =
                        format!("rule '{}': invalid pattern: {}", rule.rule_id, e);
                    warn!("{}", message);
                    engine.warnings.push(message);
                }
            }
        }

        debug!(
            "Compiled {} rule(s), {} skipped",
            engine.len(),
            engine.warnings.len()
        );

        engine
    }

    /// Patterns skipped at build time
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Total number of compiled rules
    pub fn len(&self) -> usize {
        self.stages.values().map(|rules| rules.len()).sum()
    }

    /// Check whether the engine holds no rules
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of compiled rules in one stage
    pub fn stage_len(&self, stage: RuleStage) -> usize {
        self.stages.get(&stage).map_or(0, |rules| rules.len())
    }

    /// Apply every eligible rule of a stage to the text
    pub fn apply(
        &self,
        stage: RuleStage,
        text: &str,
        context: &TranslationContext,
    ) -> StageOutcome {
        self.apply_filtered(stage, text, context, |_| true)
    }

    /// Apply a stage with an additional per-rule filter
    ///
    /// The word-order layer uses the filter to restrict rules to those
    /// whose order tags match the language pair.
    pub fn apply_filtered<F>(
        &self,
        stage: RuleStage,
        text: &str,
        context: &TranslationContext,
        filter: F,
    ) -> StageOutcome
    where
        F: Fn(&Rule) -> bool,
    {
        let mut outcome = StageOutcome {
            text: text.to_string(),
            ..Default::default()
        };

        let Some(rules) = self.stages.get(&stage) else {
            return outcome;
        };

        // Rules whose application changed nothing; retired for the rest of
        // this invocation so they cannot loop
        let mut retired: HashSet<usize> = HashSet::new();
        let mut attempts = 0;

        loop {
            if attempts >= MAX_RULE_APPLICATIONS {
                warn!(
                    "Rule application limit reached for stage {} ({} applications)",
                    stage, attempts
                );
                break;
            }

            let chosen = rules
                .iter()
                .filter(|cr| !retired.contains(&cr.order_index))
                .filter(|cr| filter(&cr.rule))
                .filter(|cr| {
                    cr.rule
                        .applies_to_pair(&context.source_language, &context.target_language)
                })
                .filter(|cr| cr.rule.conditions_hold(&outcome.text, context))
                .filter(|cr| cr.matches(&outcome.text))
                .max_by_key(|cr| (cr.rule.priority, std::cmp::Reverse(cr.order_index)));

            let Some(chosen) = chosen else {
                break;
            };

            attempts += 1;

            let rewritten = chosen
                .regex
                .replace_all(&outcome.text, chosen.rule.replacement.as_str())
                .into_owned();

            if rewritten == outcome.text {
                retired.insert(chosen.order_index);
                continue;
            }

            debug!(
                "Applied rule '{}' ({}): '{}' -> '{}'",
                chosen.rule.rule_id, stage, outcome.text, rewritten
            );

            outcome.text = rewritten;
            outcome.applications += 1;
            outcome.applied_rule_ids.push(chosen.rule.rule_id.clone());
        }

        outcome
    }
}
