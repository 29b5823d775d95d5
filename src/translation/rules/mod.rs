/*!
 * Rule-driven text transformation.
 *
 * - `model`: rule definitions and the conditions that guard them
 * - `loader`: NDJSON rule file parsing with tolerant error handling
 * - `engine`: compiled rule sets and the application loop
 */

pub mod engine;
pub mod loader;
pub mod model;

// Re-export main types
pub use engine::{CompiledRule, MAX_RULE_APPLICATIONS, RuleEngine, StageOutcome};
pub use loader::{RuleLoadReport, load_dir, load_file, parse_rules};
pub use model::{Rule, RuleCondition, RuleStage, SyntacticOrder};
