//! Per-rule checks shared by classification rules and official-account entries.

use crate::evaluator::{Matcher, SkipReason};
use crate::expr::ColumnSpec;
use crate::schema::{ClassificationRule, MatchingType, OfficialAccountRule};

use super::fuzzy::fuzzy_match;
use super::ValidationResult;

pub(super) fn validate_classification(
    rule: &ClassificationRule,
    prefix: &str,
    known_columns: Option<&[&str]>,
    result: &mut ValidationResult,
) {
    if rule.project.trim().is_empty() {
        result.error(format!("{prefix}project"), "project must not be empty");
    }

    validate_columns(&rule.matching_column, prefix, known_columns, result);
    if let Err(reason) = Matcher::compile(&rule.matching_type, &rule.matching_value) {
        report_compile_error(reason, prefix, result);
    }

    if rule.active_outputs().next().is_none() {
        result.warn(
            format!("{prefix}outputs"),
            "rule has no non-blank output values and will never write",
        );
    }

    if matches!(&rule.channel, Some(c) if c.trim().is_empty()) {
        result.warn(
            format!("{prefix}channel"),
            "channel is an empty string and is treated as no channel filter",
        );
    }
}

pub(super) fn validate_official(
    entry: &OfficialAccountRule,
    prefix: &str,
    known_columns: Option<&[&str]>,
    result: &mut ValidationResult,
) {
    if entry.project.trim().is_empty() {
        result.error(format!("{prefix}project"), "project must not be empty");
    }
    if entry.channel.trim().is_empty() {
        result.error(format!("{prefix}channel"), "channel must not be empty");
    }

    validate_columns(&entry.matching_column, prefix, known_columns, result);
    match &entry.matching_type {
        MatchingType::Contains | MatchingType::Equals => {}
        MatchingType::Other(name) => unknown_type(name, prefix, result),
        other => result.error(
            format!("{prefix}matching_type"),
            format!("official account entries only support 'contains' and 'equals', got '{other}'"),
        ),
    }
}

fn validate_columns(
    matching_column: &str,
    prefix: &str,
    known_columns: Option<&[&str]>,
    result: &mut ValidationResult,
) {
    let path = format!("{prefix}matching_column");
    if matching_column.trim().is_empty() {
        result.error(path, "matching_column must not be empty");
        return;
    }
    let Some(known) = known_columns else {
        return;
    };
    let spec = ColumnSpec::parse(matching_column);
    for column in spec.columns() {
        if !known.contains(&column) {
            result.error_with_suggestion(
                path.clone(),
                format!("column '{column}' is not present in the input table"),
                fuzzy_match(column, known),
            );
        }
    }
}

fn report_compile_error(reason: SkipReason, prefix: &str, result: &mut ValidationResult) {
    match reason {
        SkipReason::UnsupportedMatchingType(name) => unknown_type(&name, prefix, result),
        other => result.error(format!("{prefix}matching_value"), other.to_string()),
    }
}

fn unknown_type(name: &str, prefix: &str, result: &mut ValidationResult) {
    result.error_with_suggestion(
        format!("{prefix}matching_type"),
        format!("unknown matching type '{name}'"),
        fuzzy_match(name, MatchingType::KNOWN),
    );
}
