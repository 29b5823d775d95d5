/*!
 * Rule definitions for the pattern-driven transformation stages.
 *
 * Rules are data, not code: each one pairs a regex pattern with a
 * replacement template and carries the metadata the engine needs to decide
 * when it applies. Replacement templates use `$1`..`$n` capture references
 * (`${1}` when followed by a word character) and `$$` for a literal dollar.
 */

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::translation::context::TranslationContext;

/// Transformation stage a rule belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleStage {
    /// Inflection and agreement fixups
    Grammar,
    /// Constituent reordering
    WordOrder,
    /// Final cleanup of the rendered text
    PostProcessing,
}

impl RuleStage {
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Grammar => "grammar".to_string(),
            Self::WordOrder => "word_order".to_string(),
            Self::PostProcessing => "post_processing".to_string(),
        }
    }
}

impl std::fmt::Display for RuleStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for RuleStage {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "grammar" => Ok(Self::Grammar),
            "word_order" => Ok(Self::WordOrder),
            "post_processing" => Ok(Self::PostProcessing),
            _ => Err(anyhow!("Invalid rule stage: {}", s)),
        }
    }
}

/// Basic constituent order of a language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyntacticOrder {
    /// Subject-verb-object (English, Russian, French)
    Svo,
    /// Subject-object-verb (Japanese, Turkish)
    Sov,
    /// Verb-subject-object (Classical Arabic, Irish)
    Vso,
    /// Verb-object-subject (Malagasy)
    Vos,
    /// Object-subject-verb (rare)
    Osv,
    /// Object-verb-subject (rare)
    Ovs,
}

impl std::fmt::Display for SyntacticOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Svo => "svo",
            Self::Sov => "sov",
            Self::Vso => "vso",
            Self::Vos => "vos",
            Self::Osv => "osv",
            Self::Ovs => "ovs",
        };
        write!(f, "{}", name)
    }
}

impl std::str::FromStr for SyntacticOrder {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "svo" => Ok(Self::Svo),
            "sov" => Ok(Self::Sov),
            "vso" => Ok(Self::Vso),
            "vos" => Ok(Self::Vos),
            "osv" => Ok(Self::Osv),
            "ovs" => Ok(Self::Ovs),
            _ => Err(anyhow!("Invalid syntactic order: {}", s)),
        }
    }
}

/// Guard that must hold for a rule to be considered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuleCondition {
    /// The context carries at least one token
    TokensPresent,
    /// The context carries at least `count` tokens
    MinTokenCount { count: usize },
    /// The current text contains `value` (case-insensitive)
    TextContains { value: String },
    /// The request is for exactly this language pair
    LanguagePairIs { pair: String },
    /// The request runs with quality scoring enabled
    QualityModeOnly,
}

impl RuleCondition {
    /// Evaluate the condition against the current text and context
    pub fn holds(&self, text: &str, context: &TranslationContext) -> bool {
        match self {
            Self::TokensPresent => !context.tokens.is_empty(),
            Self::MinTokenCount { count } => context.tokens.len() >= *count,
            Self::TextContains { value } => {
                text.to_lowercase().contains(&value.to_lowercase())
            }
            Self::LanguagePairIs { pair } => context.language_pair() == pair.to_lowercase(),
            Self::QualityModeOnly => context.is_quality_mode_enabled(),
        }
    }
}

/// A single transformation rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    /// Stable identifier, unique within a rule set
    pub rule_id: String,

    /// Stage this rule runs in
    pub stage: RuleStage,

    /// Source language scope; `None` applies to every source language
    #[serde(default)]
    pub source_language: Option<String>,

    /// Target language scope; `None` applies to every target language
    #[serde(default)]
    pub target_language: Option<String>,

    /// Human-readable description
    #[serde(default)]
    pub description: String,

    /// Regex pattern the rule matches on
    pub pattern: String,

    /// Replacement template with `$n` capture references
    pub replacement: String,

    /// Higher priority wins; ties break by definition order
    #[serde(default)]
    pub priority: i32,

    /// Guards that must all hold
    #[serde(default)]
    pub conditions: Vec<RuleCondition>,

    /// Whether the pattern is matched case-sensitively
    #[serde(default)]
    pub case_sensitive: bool,

    /// Word-order rules only: source-side constituent order
    #[serde(default)]
    pub source_order: Option<SyntacticOrder>,

    /// Word-order rules only: target-side constituent order
    #[serde(default)]
    pub target_order: Option<SyntacticOrder>,
}

impl Rule {
    /// Whether the rule's language scope covers a request pair
    pub fn applies_to_pair(&self, source_language: &str, target_language: &str) -> bool {
        let source_ok = self
            .source_language
            .as_deref()
            .is_none_or(|scope| scope.eq_ignore_ascii_case(source_language));
        let target_ok = self
            .target_language
            .as_deref()
            .is_none_or(|scope| scope.eq_ignore_ascii_case(target_language));

        source_ok && target_ok
    }

    /// Whether every condition holds for the current text and context
    pub fn conditions_hold(&self, text: &str, context: &TranslationContext) -> bool {
        self.conditions.iter().all(|c| c.holds(text, context))
    }
}
