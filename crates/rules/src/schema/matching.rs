//! Matching type enum shared by classification and official-account rules.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a rule compares its matching value against a record.
///
/// Unknown type strings deserialize into [`MatchingType::Other`] instead of
/// failing, so a typo in one rule never blocks loading the whole rule set.
/// The engine skips such rules at evaluation time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MatchingType {
    Contains,
    Equals,
    GreaterThan,
    LessThan,
    CountContains,
    Other(String),
}

impl MatchingType {
    /// All recognized type names, used for suggestions.
    pub const KNOWN: &'static [&'static str] = &[
        "contains",
        "equals",
        "greater_than",
        "less_than",
        "count_contains",
    ];

    pub fn as_str(&self) -> &str {
        match self {
            MatchingType::Contains => "contains",
            MatchingType::Equals => "equals",
            MatchingType::GreaterThan => "greater_than",
            MatchingType::LessThan => "less_than",
            MatchingType::CountContains => "count_contains",
            MatchingType::Other(s) => s,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, MatchingType::Other(_))
    }
}

impl fmt::Display for MatchingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchingType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(MatchingType::from(s))
    }
}

impl From<&str> for MatchingType {
    fn from(s: &str) -> Self {
        match s.trim() {
            "contains" => MatchingType::Contains,
            "equals" => MatchingType::Equals,
            "greater_than" => MatchingType::GreaterThan,
            "less_than" => MatchingType::LessThan,
            "count_contains" => MatchingType::CountContains,
            other => MatchingType::Other(other.to_string()),
        }
    }
}

impl Serialize for MatchingType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for MatchingType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(MatchingType::from(s.as_str()))
    }
}
