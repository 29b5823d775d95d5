/*!
 * Tests for NDJSON rule file loading
 */

use anyhow::Result;
use translex::translation::rules::{RuleStage, load_dir, load_file, parse_rules};

use crate::common;

/// Test parsing a well-formed NDJSON document
#[test]
fn test_parse_rules_withValidLines_shouldLoadAllRules() {
    let content = r#"{"ruleId": "a", "stage": "grammar", "pattern": "x", "replacement": "y"}

{"ruleId": "b", "stage": "word_order", "pattern": "p", "replacement": "q", "priority": 5}
"#;

    let report = parse_rules(content, "inline");
    assert_eq!(report.rules.len(), 2);
    assert!(report.warnings.is_empty());
    assert_eq!(report.rules[0].rule_id, "a");
    assert_eq!(report.rules[1].stage, RuleStage::WordOrder);
    assert_eq!(report.rules[1].priority, 5);
}

/// Test that malformed lines are skipped with a warning
#[test]
fn test_parse_rules_withMalformedLines_shouldWarnAndContinue() {
    let content = r#"{"ruleId": "ok", "stage": "grammar", "pattern": "x", "replacement": "y"}
this is not json
{"ruleId": "", "stage": "grammar", "pattern": "x", "replacement": "y"}
{"ruleId": "also-ok", "stage": "post_processing", "pattern": "a", "replacement": "b"}
"#;

    let report = parse_rules(content, "broken.jsonl");
    assert_eq!(report.rules.len(), 2);
    assert_eq!(report.warnings.len(), 2);
    // Warnings carry the origin and line number
    assert!(report.warnings[0].starts_with("broken.jsonl:2"));
    assert!(report.warnings[1].starts_with("broken.jsonl:3"));
}

/// Test loading a single rule file from disk
#[test]
fn test_load_file_withRuleFile_shouldLoadRules() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_rule_file(
        &temp_dir.path().to_path_buf(),
        "grammar.jsonl",
        &[r#"{"ruleId": "g1", "stage": "grammar", "pattern": "colour", "replacement": "color"}"#],
    )?;

    let report = load_file(&path)?;
    assert_eq!(report.rules.len(), 1);
    assert_eq!(report.rules[0].rule_id, "g1");

    assert!(load_file(temp_dir.path().join("missing.jsonl")).is_err());
    Ok(())
}

/// Test that directory loading descends into subdirectories
#[test]
fn test_load_dir_withNestedDirectories_shouldLoadEveryRuleFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    let nested = dir.join("en-ru");
    std::fs::create_dir(&nested)?;

    common::create_rule_file(
        &dir,
        "common.jsonl",
        &[r#"{"ruleId": "top", "stage": "grammar", "pattern": "x", "replacement": "y"}"#],
    )?;
    common::create_rule_file(
        &nested,
        "grammar.ndjson",
        &[r#"{"ruleId": "nested", "stage": "grammar", "pattern": "x", "replacement": "y"}"#],
    )?;
    common::create_test_file(&dir, "notes.txt", "not a rule file")?;

    let report = load_dir(&dir)?;
    assert_eq!(report.rules.len(), 2);

    let ids: Vec<&str> = report.rules.iter().map(|r| r.rule_id.as_str()).collect();
    assert!(ids.contains(&"top"));
    assert!(ids.contains(&"nested"));

    Ok(())
}

/// Test that warnings from every file end up in the directory report
#[test]
fn test_load_dir_withMixedFiles_shouldAggregateWarnings() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();

    common::create_rule_file(
        &dir,
        "a.jsonl",
        &[
            r#"{"ruleId": "good-a", "stage": "grammar", "pattern": "x", "replacement": "y"}"#,
            "garbage line",
        ],
    )?;
    common::create_rule_file(&dir, "b.jsonl", &["more garbage"])?;

    let report = load_dir(&dir)?;
    assert_eq!(report.rules.len(), 1);
    assert_eq!(report.warnings.len(), 2);

    Ok(())
}
