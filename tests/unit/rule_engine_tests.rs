/*!
 * Tests for rule compilation and application
 */

use translex::translation::rules::{RuleEngine, RuleStage, parse_rules};
use translex::translation::{TranslationContext, TranslationMode};

fn engine_from(lines: &[&str]) -> RuleEngine {
    let report = parse_rules(&lines.join("\n"), "inline");
    assert!(report.warnings.is_empty(), "fixture must parse cleanly");
    RuleEngine::compile(&report.rules)
}

/// Test that quality-only rules are skipped in fast mode
#[test]
fn test_ruleEngine_apply_qualityModeCondition_shouldGateRule() {
    let engine = engine_from(&[
        r#"{"ruleId": "expensive", "stage": "grammar", "pattern": "q+", "replacement": "Q", "conditions": [{"type": "quality_mode_only"}]}"#,
    ]);

    let fast = TranslationContext::new("en", "ru");
    let outcome = engine.apply(RuleStage::Grammar, "qqq", &fast);
    assert_eq!(outcome.text, "qqq");
    assert_eq!(outcome.applications, 0);

    let quality = TranslationContext::new("en", "ru").with_mode(TranslationMode::Quality);
    let outcome = engine.apply(RuleStage::Grammar, "qqq", &quality);
    assert_eq!(outcome.text, "Q");
    assert_eq!(outcome.applied_rule_ids, vec!["expensive"]);
}

/// Test that token-count conditions read the context
#[test]
fn test_ruleEngine_apply_minTokenCountCondition_shouldReadContextTokens() {
    let engine = engine_from(&[
        r#"{"ruleId": "long-only", "stage": "grammar", "pattern": "x", "replacement": "y", "conditions": [{"type": "min_token_count", "count": 3}]}"#,
    ]);

    let mut context = TranslationContext::new("en", "ru");
    context.tokens = vec!["a".to_string(), "b".to_string()];
    assert_eq!(engine.apply(RuleStage::Grammar, "x", &context).applications, 0);

    context.tokens.push("c".to_string());
    assert_eq!(engine.apply(RuleStage::Grammar, "x", &context).applications, 1);
}

/// Test that text conditions are re-evaluated against the rewritten text
#[test]
fn test_ruleEngine_apply_textContainsCondition_shouldSeeEarlierRewrites() {
    // The second rule only becomes eligible after the first rule has
    // rewritten the text
    let engine = engine_from(&[
        r#"{"ruleId": "first", "stage": "grammar", "pattern": "alpha", "replacement": "beta", "priority": 10}"#,
        r#"{"ruleId": "second", "stage": "grammar", "pattern": "beta", "replacement": "gamma", "conditions": [{"type": "text_contains", "value": "BETA"}]}"#,
    ]);

    let context = TranslationContext::new("en", "ru");
    let outcome = engine.apply(RuleStage::Grammar, "alpha", &context);

    assert_eq!(outcome.text, "gamma");
    assert_eq!(outcome.applied_rule_ids, vec!["first", "second"]);
}

/// Test language pair scoping through apply
#[test]
fn test_ruleEngine_apply_languageScopedRule_shouldOnlyApplyToItsPair() {
    let engine = engine_from(&[
        r#"{"ruleId": "ru-only", "stage": "grammar", "targetLanguage": "ru", "pattern": "x", "replacement": "y"}"#,
    ]);

    let ru = TranslationContext::new("en", "ru");
    assert_eq!(engine.apply(RuleStage::Grammar, "x", &ru).text, "y");

    let es = TranslationContext::new("en", "es");
    assert_eq!(engine.apply(RuleStage::Grammar, "x", &es).text, "x");
}

/// Test that an invalid pattern is reported but does not poison the set
#[test]
fn test_ruleEngine_compile_withInvalidPattern_shouldWarnAndKeepOthers() {
    let report = parse_rules(
        &[
            r#"{"ruleId": "broken", "stage": "grammar", "pattern": "([unclosed", "replacement": "x"}"#,
            r#"{"ruleId": "fine", "stage": "grammar", "pattern": "a", "replacement": "b"}"#,
        ]
        .join("\n"),
        "inline",
    );
    let engine = RuleEngine::compile(&report.rules);

    assert_eq!(engine.len(), 1);
    assert_eq!(engine.warnings().len(), 1);
    assert!(engine.warnings()[0].contains("broken"));

    let context = TranslationContext::new("en", "ru");
    assert_eq!(engine.apply(RuleStage::Grammar, "a", &context).text, "b");
}

/// Test the per-rule filter hook used by the word order layer
#[test]
fn test_ruleEngine_applyFiltered_shouldHonorCallerFilter() {
    let engine = engine_from(&[
        r#"{"ruleId": "keep", "stage": "word_order", "pattern": "a", "replacement": "b"}"#,
        r#"{"ruleId": "drop", "stage": "word_order", "pattern": "b", "replacement": "c"}"#,
    ]);

    let context = TranslationContext::new("en", "ru");
    let outcome =
        engine.apply_filtered(RuleStage::WordOrder, "a", &context, |rule| rule.rule_id == "keep");

    assert_eq!(outcome.text, "b");
    assert_eq!(outcome.applied_rule_ids, vec!["keep"]);
}

/// Test that stages do not leak into each other
#[test]
fn test_ruleEngine_apply_shouldIsolateStages() {
    let engine = engine_from(&[
        r#"{"ruleId": "grammar-rule", "stage": "grammar", "pattern": "x", "replacement": "y"}"#,
    ]);

    let context = TranslationContext::new("en", "ru");
    assert_eq!(engine.apply(RuleStage::PostProcessing, "x", &context).text, "x");
    assert_eq!(engine.stage_len(RuleStage::Grammar), 1);
    assert_eq!(engine.stage_len(RuleStage::PostProcessing), 0);
}
