//! Official-account classifier.
//!
//! A narrower sibling of the rule engine: a record is marked as an official
//! account when its channel, its verification flag and a literal
//! `contains`/`equals` match on one column all agree with a setup entry.
//! Only the setup flag is normalized; the record flag is compared trimmed and
//! lowercased, so tables should go through
//! [`crate::prep::standardize_verified_column`] first.
//! Writes are unconditional; a later entry simply overwrites an earlier one.

use insight_core::{FieldValue, Table};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::evaluator::{Matcher, SkipReason};
use crate::schema::OfficialAccountRule;

pub const OFFICIAL_ACCOUNT_COLUMN: &str = "Official Account";
pub const OFFICIAL_ACCOUNT_VALUE: &str = "Official Account";
pub const NOISE_TAG_COLUMN: &str = "Noise Tag";
pub const NOISE_TAG_VALUE: &str = "1";
pub const VERIFIED_COLUMN: &str = "Verified Account";

/// Setup-side flag: `true`, `yes` and `1` (any case, trimmed) are `"yes"`;
/// anything else is `"no"`.
pub fn normalize_verified_flag(raw: &str) -> &'static str {
    match raw.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" => "yes",
        _ => "no",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OfficialAccountMatch {
    pub channel: String,
    pub matching_column: String,
    pub matching_value: String,
    pub matched_rows: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OfficialAccountOutcome {
    pub matches: Vec<OfficialAccountMatch>,
    pub skipped: Vec<(OfficialAccountRule, SkipReason)>,
}

impl OfficialAccountOutcome {
    pub fn matched_rows(&self) -> usize {
        self.matches.iter().map(|m| m.matched_rows).sum()
    }
}

#[derive(Debug, Clone)]
pub struct OfficialAccountClassifier {
    channel_column: String,
}

impl Default for OfficialAccountClassifier {
    fn default() -> Self {
        Self::new("Channel")
    }
}

impl OfficialAccountClassifier {
    pub fn new(channel_column: impl Into<String>) -> Self {
        Self {
            channel_column: channel_column.into(),
        }
    }

    /// Apply every setup entry scoped to `project`, in source order.
    pub fn apply(
        &self,
        table: &mut Table,
        setup: &[OfficialAccountRule],
        project: &str,
    ) -> OfficialAccountOutcome {
        let mut outcome = OfficialAccountOutcome::default();
        let scoped: Vec<&OfficialAccountRule> =
            setup.iter().filter(|r| r.project == project).collect();
        if scoped.is_empty() {
            return outcome;
        }

        table.ensure_column(OFFICIAL_ACCOUNT_COLUMN, FieldValue::Text(String::new()));
        table.ensure_column(NOISE_TAG_COLUMN, FieldValue::Text(String::new()));

        for rule in scoped {
            let mask = match self.mask(table, rule) {
                Ok(mask) => mask,
                Err(reason) => {
                    warn!(
                        channel = %rule.channel,
                        column = %rule.matching_column,
                        reason = %reason,
                        "skipping official account entry"
                    );
                    outcome.skipped.push((rule.clone(), reason));
                    continue;
                }
            };

            let mut matched = 0;
            for row in mask.iter().enumerate().filter(|(_, m)| **m).map(|(r, _)| r) {
                table.set(row, OFFICIAL_ACCOUNT_COLUMN, OFFICIAL_ACCOUNT_VALUE.into());
                table.set(row, NOISE_TAG_COLUMN, NOISE_TAG_VALUE.into());
                matched += 1;
            }
            debug!(channel = %rule.channel, matched, "official account entry applied");

            outcome.matches.push(OfficialAccountMatch {
                channel: rule.channel.clone(),
                matching_column: rule.matching_column.clone(),
                matching_value: rule.matching_value.clone(),
                matched_rows: matched,
            });
        }

        info!(
            project = %project,
            matched = outcome.matched_rows(),
            skipped = outcome.skipped.len(),
            "official account pass complete"
        );
        outcome
    }

    fn mask(&self, table: &Table, rule: &OfficialAccountRule) -> Result<Vec<bool>, SkipReason> {
        for column in [
            rule.matching_column.as_str(),
            self.channel_column.as_str(),
            VERIFIED_COLUMN,
        ] {
            if !table.has_column(column) {
                return Err(SkipReason::MissingColumn(column.to_string()));
            }
        }
        let matcher = Matcher::compile_simple(&rule.matching_type, &rule.matching_value)?;
        let verified = normalize_verified_flag(&rule.verified_account);
        let channel = rule.channel.trim().to_lowercase();

        let render = |row: usize, column: &str| {
            table
                .get(row, column)
                .map(FieldValue::render)
                .unwrap_or_default()
        };

        Ok((0..table.len())
            .map(|row| {
                render(row, VERIFIED_COLUMN).trim().to_lowercase() == verified
                    && render(row, &self.channel_column).trim().to_lowercase() == channel
                    && matcher.matches(&render(row, &rule.matching_column))
            })
            .collect())
    }
}
