//! Table preparation steps run around the classification passes.
//!
//! Order used by the batch runner: verified-flag standardization before the
//! official-account pass, [`strip_noise_tag_decimal`] between the official
//! pass and the rule engine, and [`derive_followers`] after the engine.

use insight_core::{FieldValue, Table};

use crate::official::{NOISE_TAG_COLUMN, VERIFIED_COLUMN};

pub const ORIGINAL_REACH_COLUMN: &str = "Original Reach";
pub const POTENTIAL_REACH_COLUMN: &str = "Potential Reach";
pub const FOLLOWERS_COLUMN: &str = "Followers";

/// Rewrite the `Verified Account` column to `Yes`/`No`.
///
/// Only a trimmed, case-insensitive `yes` becomes `Yes`; `true`, `1`, blanks
/// and everything else become `No`. Returns false when the table has no such
/// column.
pub fn standardize_verified_column(table: &mut Table) -> bool {
    let Some(cells) = table.column(VERIFIED_COLUMN) else {
        return false;
    };
    let standardized: Vec<FieldValue> = cells
        .iter()
        .map(|v| match v.render().trim().to_lowercase().as_str() {
            "yes" => FieldValue::from("Yes"),
            _ => FieldValue::from("No"),
        })
        .collect();
    table.put_column(VERIFIED_COLUMN, standardized);
    true
}

/// Strip a trailing `.0` from `Noise Tag` cells, so a `1.0` read from a
/// numeric export becomes `1`. Returns the number of cells rewritten.
pub fn strip_noise_tag_decimal(table: &mut Table) -> usize {
    let Some(cells) = table.column(NOISE_TAG_COLUMN) else {
        return 0;
    };

    let mut changed = 0;
    let cleaned: Vec<FieldValue> = cells
        .iter()
        .map(|v| {
            let rendered = v.render();
            match rendered.strip_suffix(".0") {
                Some(stripped) => {
                    changed += 1;
                    FieldValue::from(stripped)
                }
                None => v.clone(),
            }
        })
        .collect();

    if changed > 0 {
        table.put_column(NOISE_TAG_COLUMN, cleaned);
    }
    changed
}

/// Set `Followers = Original Reach + Potential Reach` when both columns
/// exist. Null and non-numeric cells count as 0. The sum stays an integer
/// when both cells are integers (or null). Returns false when either reach
/// column is missing.
pub fn derive_followers(table: &mut Table) -> bool {
    let (Some(original), Some(potential)) = (
        table.column(ORIGINAL_REACH_COLUMN),
        table.column(POTENTIAL_REACH_COLUMN),
    ) else {
        return false;
    };

    let followers: Vec<FieldValue> = original
        .iter()
        .zip(potential)
        .map(|(a, b)| match (integral(a), integral(b)) {
            (Some(a), Some(b)) => FieldValue::Integer(a + b),
            _ => FieldValue::Float(
                a.as_number().unwrap_or(0.0) + b.as_number().unwrap_or(0.0),
            ),
        })
        .collect();
    table.put_column(FOLLOWERS_COLUMN, followers);
    true
}

fn integral(value: &FieldValue) -> Option<i64> {
    match value {
        FieldValue::Integer(i) => Some(*i),
        FieldValue::Null => Some(0),
        _ => None,
    }
}
