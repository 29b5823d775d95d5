/*!
 * Rule file loading.
 *
 * Rule files are newline-delimited JSON, one rule per line. A malformed
 * line never fails the load: it is skipped and reported as a warning with
 * its file and line number, so one bad edit cannot take down an engine
 * that has thousands of good rules.
 */

use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, warn};
use walkdir::WalkDir;

use super::model::Rule;

/// File extensions recognized as rule files
const RULE_FILE_EXTENSIONS: [&str; 2] = ["jsonl", "ndjson"];

/// Outcome of loading rule definitions
#[derive(Debug, Default)]
pub struct RuleLoadReport {
    /// Rules that parsed cleanly, in definition order
    pub rules: Vec<Rule>,

    /// One entry per skipped line, with origin and line number
    pub warnings: Vec<String>,
}

impl RuleLoadReport {
    /// Fold another report into this one, preserving order
    pub fn merge(&mut self, other: RuleLoadReport) {
        self.rules.extend(other.rules);
        self.warnings.extend(other.warnings);
    }
}

/// Parse rules from NDJSON content
///
/// `origin` names the source (a file path, or a label for inline content)
/// in warning messages.
pub fn parse_rules(content: &str, origin: &str) -> RuleLoadReport {
    let mut report = RuleLoadReport::default();

    for (index, line) in content.lines().enumerate() {
        let line_number = index + 1;
        let trimmed = line.trim();

        if trimmed.is_empty() {
            continue;
        }

        match serde_json::from_str::<Rule>(trimmed) {
            Ok(rule) => {
                if rule.rule_id.trim().is_empty() {
                    report
                        .warnings
                        .push(format!("{}:{}: rule has an empty ruleId", origin, line_number));
                    continue;
                }
                report.rules.push(rule);
            }
            Err(e) => {
                report
                    .warnings
                    .push(format!("{}:{}: {}", origin, line_number, e));
            }
        }
    }

    if !report.warnings.is_empty() {
        warn!(
            "Skipped {} malformed rule line(s) in {}",
            report.warnings.len(),
            origin
        );
    }

    report
}

/// Load rules from a single NDJSON file
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<RuleLoadReport> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read rule file: {}", path.display()))?;

    Ok(parse_rules(&content, &path.display().to_string()))
}

/// Load every rule file under a directory
///
/// Files are visited in path order so that definition order (and with it
/// rule tie-breaking) is stable across runs. A missing directory yields an
/// empty report.
pub fn load_dir<P: AsRef<Path>>(dir: P) -> Result<RuleLoadReport> {
    let dir = dir.as_ref();
    let mut report = RuleLoadReport::default();

    if !dir.exists() {
        debug!("Rule directory {} does not exist, no rules loaded", dir.display());
        return Ok(report);
    }

    let mut paths: Vec<_> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| RULE_FILE_EXTENSIONS.contains(&ext))
        })
        .collect();
    paths.sort();

    for path in paths {
        report.merge(load_file(&path)?);
    }

    debug!(
        "Loaded {} rule(s) from {} ({} warning(s))",
        report.rules.len(),
        dir.display(),
        report.warnings.len()
    );

    Ok(report)
}
