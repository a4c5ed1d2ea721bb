//! Compiled matchers, one per matching type.

use insight_core::parse_number;

use crate::expr::{ContainsExpr, CountExpr};
use crate::schema::MatchingType;

use super::SkipReason;

/// A matching value compiled once per rule and applied to every record's
/// comparison string.
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Compound case-insensitive substring expression.
    Contains(ContainsExpr),
    /// Plain case-insensitive substring (needle lowercased, no syntax).
    Substring(String),
    /// Case-sensitive equality.
    Equals(String),
    GreaterThan(f64),
    LessThan(f64),
    CountContains(CountExpr),
}

impl Matcher {
    /// Compile the full matching grammar.
    pub fn compile(matching_type: &MatchingType, value: &str) -> Result<Self, SkipReason> {
        match matching_type {
            MatchingType::Contains => Ok(Matcher::Contains(ContainsExpr::parse(value))),
            MatchingType::Equals => Ok(Matcher::Equals(value.to_string())),
            MatchingType::GreaterThan => Ok(Matcher::GreaterThan(threshold(value)?)),
            MatchingType::LessThan => Ok(Matcher::LessThan(threshold(value)?)),
            MatchingType::CountContains => Ok(Matcher::CountContains(CountExpr::parse(value)?)),
            MatchingType::Other(other) => Err(SkipReason::UnsupportedMatchingType(other.clone())),
        }
    }

    /// Compile the restricted grammar: literal `contains` and `equals` only.
    pub fn compile_simple(matching_type: &MatchingType, value: &str) -> Result<Self, SkipReason> {
        match matching_type {
            MatchingType::Contains => Ok(Matcher::Substring(value.to_lowercase())),
            MatchingType::Equals => Ok(Matcher::Equals(value.to_string())),
            other => Err(SkipReason::UnsupportedMatchingType(other.to_string())),
        }
    }

    pub fn matches(&self, text: &str) -> bool {
        match self {
            Matcher::Contains(expr) => expr.matches(text),
            Matcher::Substring(needle) => text.to_lowercase().contains(needle.as_str()),
            Matcher::Equals(expected) => text == expected,
            Matcher::GreaterThan(limit) => parse_number(text).is_some_and(|n| n > *limit),
            Matcher::LessThan(limit) => parse_number(text).is_some_and(|n| n < *limit),
            Matcher::CountContains(expr) => expr.matches(text),
        }
    }
}

fn threshold(value: &str) -> Result<f64, SkipReason> {
    parse_number(value).ok_or_else(|| SkipReason::InvalidThreshold(value.to_string()))
}
