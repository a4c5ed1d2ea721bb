//! Rule sheets: rules authored as table rows rather than YAML documents.
//!
//! Headers are matched after trimming. Classification sheets carry
//! `Project`, `Priority`, `Matching Column`, `Matching Value`,
//! `Matching Type`, optional `Channel`, and one `Output <Field>` column per
//! output field. Bad rows are reported and dropped; the rest still load.

use indexmap::IndexMap;
use insight_core::{FieldValue, Table};
use tracing::warn;

use crate::schema::{ClassificationRule, MatchingType, OfficialAccountRule};

/// Header prefix marking an output column.
pub const OUTPUT_PREFIX: &str = "Output ";

/// A sheet row that could not be turned into a rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("row {row}: {message}")]
pub struct SheetRowError {
    pub row: usize,
    pub message: String,
}

/// Trimmed header → actual column name.
fn headers(table: &Table) -> IndexMap<String, String> {
    table
        .column_names()
        .map(|name| (name.trim().to_string(), name.to_string()))
        .collect()
}

struct RowReader<'a> {
    table: &'a Table,
    headers: &'a IndexMap<String, String>,
    row: usize,
}

impl<'a> RowReader<'a> {
    fn cell(&self, header: &str) -> Option<&'a FieldValue> {
        self.headers
            .get(header)
            .and_then(|name| self.table.get(self.row, name))
            .filter(|v| !matches!(v, FieldValue::Null))
    }

    fn text(&self, header: &str) -> Option<String> {
        self.cell(header).map(FieldValue::render)
    }

    fn required(&self, header: &str) -> Result<String, SheetRowError> {
        self.text(header)
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| self.error(format!("'{}' is missing", header)))
    }

    fn error(&self, message: String) -> SheetRowError {
        SheetRowError {
            row: self.row,
            message,
        }
    }

    fn priority(&self) -> Result<i64, SheetRowError> {
        let invalid = || self.error("'Priority' is missing or not an integer".to_string());
        match self.cell("Priority") {
            Some(FieldValue::Integer(i)) => Ok(*i),
            Some(value) => match value.as_number() {
                Some(n) if n.is_finite() && n.fract() == 0.0 => Ok(n as i64),
                _ => Err(invalid()),
            },
            None => Err(invalid()),
        }
    }

    fn matching_value(&self) -> Result<String, SheetRowError> {
        self.text("Matching Value")
            .ok_or_else(|| self.error("'Matching Value' is missing".to_string()))
    }

    fn matching_type(&self) -> Result<MatchingType, SheetRowError> {
        Ok(MatchingType::from(self.required("Matching Type")?.as_str()))
    }

    /// `output_headers` holds `(header, field)` pairs.
    fn classification_rule(
        &self,
        output_headers: &[(String, String)],
    ) -> Result<ClassificationRule, SheetRowError> {
        let outputs = output_headers
            .iter()
            .map(|(header, field)| (field.clone(), self.cell(header).cloned().unwrap_or_default()))
            .collect();
        Ok(ClassificationRule {
            project: self.required("Project")?,
            priority: self.priority()?,
            matching_column: self.required("Matching Column")?,
            matching_value: self.matching_value()?,
            matching_type: self.matching_type()?,
            channel: self.text("Channel").filter(|c| !c.trim().is_empty()),
            outputs,
        })
    }

    fn official_account(&self) -> Result<OfficialAccountRule, SheetRowError> {
        Ok(OfficialAccountRule {
            project: self.required("Project")?,
            channel: self.required("Channel")?,
            verified_account: self.text("Verified Account").unwrap_or_default(),
            matching_column: self.required("Matching Column")?,
            matching_value: self.matching_value()?,
            matching_type: self.matching_type()?,
        })
    }
}

/// Convert a classification rule sheet into rules, in row order.
pub fn rules_from_table(table: &Table) -> (Vec<ClassificationRule>, Vec<SheetRowError>) {
    let headers = headers(table);
    let output_headers: Vec<(String, String)> = headers
        .keys()
        .filter_map(|h| {
            h.strip_prefix(OUTPUT_PREFIX)
                .map(|field| (h.clone(), field.trim().to_string()))
        })
        .collect();

    let mut rules = Vec::new();
    let mut errors = Vec::new();
    for row in 0..table.len() {
        let reader = RowReader {
            table,
            headers: &headers,
            row,
        };
        match reader.classification_rule(&output_headers) {
            Ok(rule) => rules.push(rule),
            Err(e) => {
                warn!(error = %e, "rejected rule sheet row");
                errors.push(e);
            }
        }
    }
    (rules, errors)
}

/// Convert an official-account setup sheet (`Project`, `Channel`,
/// `Verified Account`, `Matching Column`, `Matching Value`, `Matching Type`).
pub fn official_accounts_from_table(
    table: &Table,
) -> (Vec<OfficialAccountRule>, Vec<SheetRowError>) {
    let headers = headers(table);
    let mut accounts = Vec::new();
    let mut errors = Vec::new();
    for row in 0..table.len() {
        let reader = RowReader {
            table,
            headers: &headers,
            row,
        };
        match reader.official_account() {
            Ok(rule) => accounts.push(rule),
            Err(e) => {
                warn!(error = %e, "rejected official account sheet row");
                errors.push(e);
            }
        }
    }
    (accounts, errors)
}
