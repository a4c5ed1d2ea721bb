//! Classification rule: a match condition plus the output values it writes.

use indexmap::IndexMap;
use insight_core::FieldValue;
use serde::{Deserialize, Deserializer, Serialize};

use super::MatchingType;

/// Scope tag of rules that apply to every project.
pub const DEFAULT_SCOPE: &str = "Default";

/// A single classification rule.
///
/// `matching_column` may name one column or several joined by `+`;
/// `matching_value` is interpreted according to `matching_type`.
/// Outputs with a blank value do not take part in writing that column.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ClassificationRule {
    #[serde(default = "default_scope")]
    pub project: String,
    pub priority: i64,
    pub matching_column: String,
    #[serde(deserialize_with = "scalar_string")]
    pub matching_value: String,
    pub matching_type: MatchingType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(default)]
    pub outputs: IndexMap<String, FieldValue>,
}

impl ClassificationRule {
    /// Channel filter value, ignoring blank strings.
    pub fn channel(&self) -> Option<&str> {
        self.channel
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }

    /// Output columns this rule actually writes (non-blank values only).
    pub fn active_outputs(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.outputs
            .iter()
            .filter(|(_, value)| !value.is_blank())
            .map(|(field, value)| (field.as_str(), value))
    }

    /// Short human-readable identity for logs.
    pub fn label(&self) -> String {
        format!(
            "P{} {} {} '{}'",
            self.priority, self.matching_column, self.matching_type, self.matching_value
        )
    }
}

pub(crate) fn default_scope() -> String {
    DEFAULT_SCOPE.to_string()
}

/// Accept any YAML/JSON scalar and keep its rendered string form, so
/// `matching_value: 100` and `matching_value: "100"` are the same rule.
pub(crate) fn scalar_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(FieldValue::deserialize(deserializer)?.render())
}
