//! Match evaluation: turns a rule's column/value/type triple into a
//! per-record boolean mask.
//!
//! Configuration problems (absent column, unparsable threshold, malformed
//! count expression, unknown type) never fail the run. They surface as a
//! [`SkipReason`] and the caller skips the rule for every record.

mod filters;
mod matcher;

use insight_core::Table;

use crate::expr::{ColumnSpec, ExprError};
use crate::schema::{ClassificationRule, MatchingType};

pub use filters::channel_mask;
pub use matcher::Matcher;

/// Why a rule was skipped for the whole table.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SkipReason {
    #[error("column '{0}' not found in table")]
    MissingColumn(String),

    #[error("threshold '{0}' is not a number")]
    InvalidThreshold(String),

    #[error("malformed expression: {0}")]
    MalformedExpression(#[from] ExprError),

    #[error("unsupported matching type '{0}'")]
    UnsupportedMatchingType(String),
}

// ── Match evaluator ─────────────────────────────────────────────────

/// Evaluates match expressions against table records.
pub struct MatchEvaluator;

impl MatchEvaluator {
    /// Evaluate one record. A rule that would be skipped matches nothing.
    pub fn evaluate(
        table: &Table,
        row: usize,
        matching_column: &str,
        matching_value: &str,
        matching_type: &MatchingType,
    ) -> bool {
        let spec = ColumnSpec::parse(matching_column);
        if spec.missing_in(table).is_some() || row >= table.len() {
            return false;
        }
        Matcher::compile(matching_type, matching_value)
            .map(|m| m.matches(&spec.comparison_string(table, row)))
            .unwrap_or(false)
    }

    /// Evaluate every record with a compiled matcher.
    ///
    /// Column presence is checked before the expression is compiled.
    pub fn mask(
        table: &Table,
        matching_column: &str,
        matching_value: &str,
        matching_type: &MatchingType,
    ) -> Result<Vec<bool>, SkipReason> {
        let spec = ColumnSpec::parse(matching_column);
        if let Some(missing) = spec.missing_in(table) {
            return Err(SkipReason::MissingColumn(missing.to_string()));
        }
        let matcher = Matcher::compile(matching_type, matching_value)?;
        Ok(Self::apply(table, &spec, &matcher))
    }

    /// Match mask AND channel mask for a classification rule.
    pub fn rule_mask(
        table: &Table,
        rule: &ClassificationRule,
        channel_column: &str,
    ) -> Result<Vec<bool>, SkipReason> {
        let mut mask = Self::mask(
            table,
            &rule.matching_column,
            &rule.matching_value,
            &rule.matching_type,
        )?;
        let channels = channel_mask(table, rule.channel(), channel_column);
        for (m, c) in mask.iter_mut().zip(channels) {
            *m &= c;
        }
        Ok(mask)
    }

    pub(crate) fn apply(table: &Table, spec: &ColumnSpec, matcher: &Matcher) -> Vec<bool> {
        (0..table.len())
            .map(|row| matcher.matches(&spec.comparison_string(table, row)))
            .collect()
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use insight_core::FieldValue;

    fn table() -> Table {
        Table::from_columns([
            (
                "Platform",
                vec!["Twitter".into(), "Twitter".into(), "Instagram".into()],
            ),
            ("Text", vec!["hello".into(), "Hello".into(), "hello".into()]),
            (
                "Followers",
                vec![FieldValue::Integer(150), "n/a".into(), FieldValue::Float(99.5)],
            ),
            (
                "Channel",
                vec!["twitter".into(), "TWITTER".into(), "instagram".into()],
            ),
        ])
    }

    #[test]
    fn composite_equals_matches_exact_pair_only() {
        let t = table();
        let mask =
            MatchEvaluator::mask(&t, "Platform+Text", "Twitter+hello", &MatchingType::Equals)
                .unwrap();
        assert_eq!(mask, vec![true, false, false]);
    }

    #[test]
    fn missing_composite_part_skips_rule() {
        let t = table();
        let err = MatchEvaluator::mask(&t, "Platform+Author", "x", &MatchingType::Contains)
            .unwrap_err();
        assert_eq!(err, SkipReason::MissingColumn("Author".to_string()));
    }

    #[test]
    fn missing_single_column_skips_rule() {
        let t = table();
        assert!(matches!(
            MatchEvaluator::mask(&t, "Author", "x", &MatchingType::Contains),
            Err(SkipReason::MissingColumn(_))
        ));
        assert!(!MatchEvaluator::evaluate(&t, 0, "Author", "x", &MatchingType::Contains));
    }

    #[test]
    fn numeric_thresholds_exclude_unparsable_values() {
        let t = table();
        let gt = MatchEvaluator::mask(&t, "Followers", "100", &MatchingType::GreaterThan).unwrap();
        assert_eq!(gt, vec![true, false, false]);
        let lt = MatchEvaluator::mask(&t, "Followers", "100", &MatchingType::LessThan).unwrap();
        assert_eq!(lt, vec![false, false, true]);
    }

    #[test]
    fn invalid_threshold_skips_rule() {
        let t = table();
        assert_eq!(
            MatchEvaluator::mask(&t, "Followers", "lots", &MatchingType::GreaterThan),
            Err(SkipReason::InvalidThreshold("lots".to_string()))
        );
    }

    #[test]
    fn unknown_type_skips_rule() {
        let t = table();
        assert!(matches!(
            MatchEvaluator::mask(&t, "Text", "x", &MatchingType::from("regex")),
            Err(SkipReason::UnsupportedMatchingType(_))
        ));
    }

    #[test]
    fn malformed_count_skips_rule() {
        let t = table();
        assert!(matches!(
            MatchEvaluator::mask(&t, "Text", "hello", &MatchingType::CountContains),
            Err(SkipReason::MalformedExpression(_))
        ));
    }

    #[test]
    fn rule_mask_applies_channel_filter() {
        let t = table();
        let rule: ClassificationRule = serde_yaml::from_str(
            "priority: 1\nmatching_column: Text\nmatching_value: hello\nmatching_type: contains\nchannel: Twitter\n",
        )
        .unwrap();
        let mask = MatchEvaluator::rule_mask(&t, &rule, "Channel").unwrap();
        assert_eq!(mask, vec![true, true, false]);
    }

    #[test]
    fn single_record_evaluation() {
        let t = table();
        assert!(MatchEvaluator::evaluate(&t, 1, "Text", "HELLO", &MatchingType::Contains));
        assert!(!MatchEvaluator::evaluate(&t, 1, "Text", "hello", &MatchingType::Equals));
        assert!(!MatchEvaluator::evaluate(&t, 9, "Text", "hello", &MatchingType::Contains));
    }
}
