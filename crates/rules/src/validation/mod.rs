//! Advisory rule validation with structured errors and suggestions.
//!
//! Checks classification rules and official-account entries against the
//! matching grammar and, when a table header is known, against the columns
//! actually present. Returns a [`ValidationResult`] with errors (the engine
//! would skip the rule) and warnings (the rule runs but is probably not
//! what the author meant). The engine never consults this module; it skips
//! bad rules on its own.

mod rule_checks;

pub mod fuzzy;

use serde::{Deserialize, Serialize};

use crate::loader::RuleLoader;
use crate::schema::{ClassificationRule, OfficialAccountRule, RuleDocument};

// ── Result types ────────────────────────────────────────────────────

/// Overall validation outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

/// A validation error: the engine would skip the rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationError {
    /// Location, e.g. `"rules[3].matching_type"`.
    pub path: String,
    pub message: String,
    /// Optional "Did you mean …?" suggestion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// A non-blocking advisory warning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationResult {
    pub(crate) fn new() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub(crate) fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.valid = false;
        self.errors.push(ValidationError {
            path: path.into(),
            message: message.into(),
            suggestion: None,
        });
    }

    pub(crate) fn error_with_suggestion(
        &mut self,
        path: impl Into<String>,
        message: impl Into<String>,
        suggestion: Option<&str>,
    ) {
        self.valid = false;
        self.errors.push(ValidationError {
            path: path.into(),
            message: message.into(),
            suggestion: suggestion.map(|s| format!("Did you mean '{s}'?")),
        });
    }

    pub(crate) fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ValidationWarning {
            path: path.into(),
            message: message.into(),
        });
    }

    /// Fold another result into this one.
    pub fn merge(&mut self, other: ValidationResult) {
        self.valid &= other.valid;
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

// ── Public API ──────────────────────────────────────────────────────

/// Validate one classification rule.
///
/// `known_columns` is the input table header; pass `None` to skip column
/// checks.
pub fn validate_rule(rule: &ClassificationRule, known_columns: Option<&[&str]>) -> ValidationResult {
    let mut result = ValidationResult::new();
    rule_checks::validate_classification(rule, "", known_columns, &mut result);
    result
}

/// Validate one official-account entry.
pub fn validate_official_account(
    entry: &OfficialAccountRule,
    known_columns: Option<&[&str]>,
) -> ValidationResult {
    let mut result = ValidationResult::new();
    rule_checks::validate_official(entry, "", known_columns, &mut result);
    result
}

/// Validate a list of classification rules; paths are `rules[<index>].<field>`.
pub fn validate_rules(rules: &[ClassificationRule], known_columns: Option<&[&str]>) -> ValidationResult {
    let mut result = ValidationResult::new();
    for (i, rule) in rules.iter().enumerate() {
        rule_checks::validate_classification(rule, &format!("rules[{i}]."), known_columns, &mut result);
    }
    result
}

/// Validate any [`RuleDocument`] variant.
pub fn validate_document(doc: &RuleDocument, known_columns: Option<&[&str]>) -> ValidationResult {
    let mut result = ValidationResult::new();
    match doc {
        RuleDocument::Classification(set) => {
            check_api_version(&set.api_version, &mut result);
            result.merge(validate_rules(&set.rules, known_columns));
        }
        RuleDocument::OfficialAccounts(setup) => {
            check_api_version(&setup.api_version, &mut result);
            for (i, entry) in setup.accounts.iter().enumerate() {
                rule_checks::validate_official(
                    entry,
                    &format!("accounts[{i}]."),
                    known_columns,
                    &mut result,
                );
            }
        }
    }
    if doc.rule_count() == 0 {
        result.warn("", "document contains no rules");
    }
    result
}

/// Parse raw YAML and validate. Parse errors come back as a single error.
pub fn validate_yaml(yaml: &str, known_columns: Option<&[&str]>) -> ValidationResult {
    match RuleLoader::parse_document(yaml) {
        Ok(doc) => validate_document(&doc, known_columns),
        Err(e) => {
            let mut result = ValidationResult::new();
            result.error("", format!("YAML parse error: {e}"));
            result
        }
    }
}

fn check_api_version(api_version: &str, result: &mut ValidationResult) {
    if api_version != "v1" {
        result.error(
            "apiVersion",
            format!("apiVersion must be 'v1', got '{api_version}'"),
        );
    }
}
