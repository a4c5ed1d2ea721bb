//! Official-account setup entries.

use serde::{Deserialize, Serialize};

use super::rule::scalar_string;
use super::MatchingType;

/// Marks records as an official account when channel, verification flag and
/// a simple `contains`/`equals` match all agree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct OfficialAccountRule {
    pub project: String,
    pub channel: String,
    /// Raw flag as authored (`TRUE`, `yes`, `1`, ...); normalized at use.
    #[serde(deserialize_with = "scalar_string")]
    pub verified_account: String,
    pub matching_column: String,
    #[serde(deserialize_with = "scalar_string")]
    pub matching_value: String,
    pub matching_type: MatchingType,
}
