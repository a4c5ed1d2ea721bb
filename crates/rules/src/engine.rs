//! Rule application engine.
//!
//! Drives one classification pass over a table:
//! 1. every output field referenced by a rule (or requested explicitly) gets
//!    a column, created empty when absent, and a priority tracker
//! 2. rules run in the given order, which must be descending priority
//!    (see [`crate::resolver`])
//! 3. for each rule, the match mask AND channel mask selects records; each
//!    non-blank output is written where the tracker accepts it
//! 4. a `"<field> - Chain Overwrite"` column per output field records the
//!    accepted writes per record
//!
//! Non-output columns are never modified and rows are never reordered.

use indexmap::{IndexMap, IndexSet};
use insight_core::config::EngineConfig;
use insight_core::{FieldValue, Table};
use tracing::{debug, info, warn};

use crate::evaluator::MatchEvaluator;
use crate::resolver::resolve_with_scope;
use crate::schema::{ClassificationRule, DEFAULT_SCOPE};
use crate::summary::{ExecutionSummary, SummaryBuilder};
use crate::tracker::OverwriteTracker;

/// Suffix of the per-field audit trail column.
pub const CHAIN_SUFFIX: &str = " - Chain Overwrite";

/// Separator between chain entries.
pub const CHAIN_SEPARATOR: &str = " ➔ ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    pub default_scope: String,
    pub channel_column: String,
    pub chain_separator: String,
    pub chain_suffix: String,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            default_scope: DEFAULT_SCOPE.to_string(),
            channel_column: "Channel".to_string(),
            chain_separator: CHAIN_SEPARATOR.to_string(),
            chain_suffix: CHAIN_SUFFIX.to_string(),
        }
    }
}

impl From<&EngineConfig> for EngineOptions {
    fn from(config: &EngineConfig) -> Self {
        Self {
            default_scope: config.default_scope.clone(),
            channel_column: config.channel_column.clone(),
            chain_separator: config.chain_separator.clone(),
            ..Self::default()
        }
    }
}

/// Result of one engine pass. The table itself is mutated in place.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineRun {
    pub summary: ExecutionSummary,
    /// Names of the chain-overwrite columns, one per output field.
    pub chain_columns: Vec<String>,
    pub tracker: OverwriteTracker,
}

#[derive(Debug, Clone, Default)]
pub struct RuleEngine {
    options: EngineOptions,
}

impl RuleEngine {
    pub fn new(options: EngineOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Resolve `all_rules` for `project_name` and apply them.
    pub fn run(
        &self,
        table: &mut Table,
        all_rules: &[ClassificationRule],
        project_name: &str,
    ) -> EngineRun {
        let rules = resolve_with_scope(all_rules, project_name, &self.options.default_scope);
        self.apply(table, &rules, &[])
    }

    /// Apply an already ordered rule list.
    ///
    /// `output_fields` adds fields to track beyond those the rules reference.
    pub fn apply(
        &self,
        table: &mut Table,
        rules: &[ClassificationRule],
        output_fields: &[String],
    ) -> EngineRun {
        let fields: IndexSet<&str> = output_fields
            .iter()
            .map(String::as_str)
            .chain(rules.iter().flat_map(|r| r.outputs.keys().map(String::as_str)))
            .collect();

        let mut tracker = OverwriteTracker::new(table.len());
        for field in &fields {
            if table.ensure_column(field, FieldValue::Text(String::new())) {
                debug!(field = %field, "created output column");
            }
            tracker.track(field);
        }

        let mut summary = SummaryBuilder::new();
        for rule in rules {
            let mask = match MatchEvaluator::rule_mask(table, rule, &self.options.channel_column) {
                Ok(mask) => mask,
                Err(reason) => {
                    warn!(rule = %rule.label(), reason = %reason, "skipping rule");
                    summary.skip(rule, &reason);
                    continue;
                }
            };

            let matched = mask.iter().filter(|m| **m).count();
            let mut affected = IndexMap::new();
            for (field, value) in rule.active_outputs() {
                let mut written = 0;
                for row in mask.iter().enumerate().filter(|(_, m)| **m).map(|(r, _)| r) {
                    if tracker.offer(row, field, rule.priority, value) {
                        table.set(row, field, value.clone());
                        written += 1;
                    }
                }
                affected.insert(field.to_string(), written);
            }

            debug!(rule = %rule.label(), matched, "rule applied");
            summary.record(rule, matched, affected);
        }

        let mut chain_columns = Vec::with_capacity(fields.len());
        for field in &fields {
            let name = format!("{}{}", field, self.options.chain_suffix);
            table.put_column(&name, tracker.chain_column(field, &self.options.chain_separator));
            chain_columns.push(name);
        }

        let summary = summary.finish();
        info!(
            rules = rules.len(),
            matched_rules = summary.entries.len(),
            skipped_rules = summary.skipped.len(),
            writes = summary.total_writes(),
            "classification pass complete"
        );

        EngineRun {
            summary,
            chain_columns,
            tracker,
        }
    }
}
