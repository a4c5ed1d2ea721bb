//! `count_contains` expressions: `<keyword>:max=<N>` / `<keyword>:min=<N>`.

use regex::Regex;

use super::ExprError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountBound {
    Max(i64),
    Min(i64),
}

impl CountBound {
    pub fn admits(&self, count: i64) -> bool {
        match *self {
            CountBound::Max(n) => count <= n,
            CountBound::Min(n) => count >= n,
        }
    }
}

/// Whole-word, case-insensitive keyword counter with a bound.
#[derive(Debug, Clone)]
pub struct CountExpr {
    pub keyword: String,
    pub bound: CountBound,
    pattern: Regex,
}

impl CountExpr {
    pub fn parse(raw: &str) -> Result<Self, ExprError> {
        let parts: Vec<&str> = raw.split(':').collect();
        let [keyword, constraint] = parts.as_slice() else {
            return Err(ExprError::MalformedCount(raw.to_string()));
        };

        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(ExprError::EmptyKeyword(raw.to_string()));
        }

        let constraint = constraint.trim();
        let bound = if constraint.contains("max=") {
            CountBound::Max(parse_bound(&constraint.replace("max=", ""))?)
        } else if constraint.contains("min=") {
            CountBound::Min(parse_bound(&constraint.replace("min=", ""))?)
        } else {
            return Err(ExprError::UnknownConstraint(constraint.to_string()));
        };

        let pattern = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(keyword)))
            .map_err(|e| ExprError::Pattern(e.to_string()))?;

        Ok(Self {
            keyword: keyword.to_string(),
            bound,
            pattern,
        })
    }

    /// Number of non-overlapping whole-word occurrences.
    pub fn count(&self, text: &str) -> i64 {
        self.pattern.find_iter(text).count() as i64
    }

    pub fn matches(&self, text: &str) -> bool {
        self.bound.admits(self.count(text))
    }
}

fn parse_bound(raw: &str) -> Result<i64, ExprError> {
    raw.trim()
        .parse()
        .map_err(|_| ExprError::InvalidBound(raw.trim().to_string()))
}
