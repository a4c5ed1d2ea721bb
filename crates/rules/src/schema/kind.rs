//! Rule kind enum for two-pass deserialization dispatch.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported document kinds for two-pass deserialization dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleKind {
    ClassificationRules,
    OfficialAccountSetup,
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleKind::ClassificationRules => write!(f, "ClassificationRules"),
            RuleKind::OfficialAccountSetup => write!(f, "OfficialAccountSetup"),
        }
    }
}

impl FromStr for RuleKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "ClassificationRules" => Ok(RuleKind::ClassificationRules),
            "OfficialAccountSetup" => Ok(RuleKind::OfficialAccountSetup),
            other => Err(format!("unknown rule kind: '{}'", other)),
        }
    }
}
