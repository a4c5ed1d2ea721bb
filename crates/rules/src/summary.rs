//! Execution summary: which rules matched, how many rows they wrote, and
//! which rules were skipped and why.

use indexmap::IndexMap;
use insight_core::{FieldValue, Record, Table};
use serde::{Deserialize, Serialize};

use crate::evaluator::SkipReason;
use crate::schema::ClassificationRule;

/// One rule that matched at least one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryEntry {
    pub priority: i64,
    pub project: String,
    pub matching_column: String,
    pub matching_value: String,
    pub matching_type: String,
    pub channel: Option<String>,
    /// Records matched after the channel filter.
    pub matched_rows: usize,
    /// Accepted writes per output field.
    pub affected_rows: IndexMap<String, usize>,
}

/// A rule skipped for the whole table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedRule {
    pub priority: i64,
    pub matching_column: String,
    pub matching_value: String,
    pub matching_type: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionSummary {
    pub entries: Vec<SummaryEntry>,
    pub skipped: Vec<SkippedRule>,
}

impl ExecutionSummary {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total accepted writes across all rules and fields.
    pub fn total_writes(&self) -> usize {
        self.entries
            .iter()
            .flat_map(|e| e.affected_rows.values())
            .sum()
    }

    /// Render the entries as a table, one row per matched rule.
    pub fn to_table(&self) -> Table {
        let records: Vec<Record> = self
            .entries
            .iter()
            .map(|e| {
                let mut record = Record::new();
                record.insert("Priority".into(), FieldValue::Integer(e.priority));
                record.insert("Project".into(), e.project.clone().into());
                record.insert("Matching Column".into(), e.matching_column.clone().into());
                record.insert("Matching Value".into(), e.matching_value.clone().into());
                record.insert("Matching Type".into(), e.matching_type.clone().into());
                record.insert(
                    "Channel".into(),
                    e.channel.clone().map(FieldValue::Text).unwrap_or_default(),
                );
                record.insert("Affected Rows".into(), FieldValue::Integer(e.matched_rows as i64));
                for (field, count) in &e.affected_rows {
                    record.insert(format!("{} Written", field), FieldValue::Integer(*count as i64));
                }
                record
            })
            .collect();
        Table::from_records(records)
    }
}

/// Accumulates per-rule statistics over one engine run.
#[derive(Debug, Default)]
pub struct SummaryBuilder {
    summary: ExecutionSummary,
}

impl SummaryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a rule application. Rules that matched nothing are left out.
    pub fn record(
        &mut self,
        rule: &ClassificationRule,
        matched_rows: usize,
        affected_rows: IndexMap<String, usize>,
    ) {
        if matched_rows == 0 {
            return;
        }
        self.summary.entries.push(SummaryEntry {
            priority: rule.priority,
            project: rule.project.clone(),
            matching_column: rule.matching_column.clone(),
            matching_value: rule.matching_value.clone(),
            matching_type: rule.matching_type.to_string(),
            channel: rule.channel().map(str::to_string),
            matched_rows,
            affected_rows,
        });
    }

    pub fn skip(&mut self, rule: &ClassificationRule, reason: &SkipReason) {
        self.summary.skipped.push(SkippedRule {
            priority: rule.priority,
            matching_column: rule.matching_column.clone(),
            matching_value: rule.matching_value.clone(),
            matching_type: rule.matching_type.to_string(),
            reason: reason.to_string(),
        });
    }

    pub fn finish(self) -> ExecutionSummary {
        self.summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule() -> ClassificationRule {
        serde_yaml::from_str(
            "priority: 4\nmatching_column: Text\nmatching_value: promo\nmatching_type: contains\nchannel: Twitter\n",
        )
        .unwrap()
    }

    #[test]
    fn zero_match_rules_are_omitted() {
        let mut builder = SummaryBuilder::new();
        builder.record(&rule(), 0, IndexMap::new());
        let summary = builder.finish();
        assert!(summary.is_empty());
        assert_eq!(summary.to_table().len(), 0);
    }

    #[test]
    fn entries_render_as_table() {
        let mut builder = SummaryBuilder::new();
        let mut affected = IndexMap::new();
        affected.insert("Noise Tag".to_string(), 2);
        affected.insert("Issue".to_string(), 1);
        builder.record(&rule(), 3, affected);
        builder.skip(&rule(), &SkipReason::MissingColumn("Text".into()));

        let summary = builder.finish();
        assert_eq!(summary.total_writes(), 3);
        assert_eq!(summary.skipped.len(), 1);
        assert_eq!(summary.skipped[0].reason, "column 'Text' not found in table");

        let table = summary.to_table();
        assert_eq!(table.get(0, "Affected Rows"), Some(&FieldValue::Integer(3)));
        assert_eq!(table.get(0, "Channel"), Some(&FieldValue::from("Twitter")));
        assert_eq!(table.get(0, "Noise Tag Written"), Some(&FieldValue::Integer(2)));
    }
}
