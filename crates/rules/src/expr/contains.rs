//! Compound `contains` expressions.

use super::COMPOSITE_SEPARATOR;

const ALTERNATIVE_SEPARATOR: char = '|';
const NEGATION: char = '!';

/// One alternative inside a term. Needles are stored lowercased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alternative {
    pub needle: String,
    pub negated: bool,
}

/// A required term: passes when no negative alternative is present and, if
/// there are positive alternatives, at least one of them is present.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Term {
    pub alternatives: Vec<Alternative>,
}

/// All terms must pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainsExpr {
    pub terms: Vec<Term>,
}

impl ContainsExpr {
    /// Parse a `contains` matching value.
    ///
    /// A value without any separator is taken verbatim (only a leading `!`
    /// is interpreted). Once separators are present every piece is trimmed.
    pub fn parse(raw: &str) -> Self {
        let has_separators =
            raw.contains(COMPOSITE_SEPARATOR) || raw.contains(ALTERNATIVE_SEPARATOR);
        if !has_separators {
            return Self {
                terms: vec![Term {
                    alternatives: vec![Alternative::parse(raw)],
                }],
            };
        }

        let terms = raw
            .split(COMPOSITE_SEPARATOR)
            .map(|term| Term {
                alternatives: term
                    .split(ALTERNATIVE_SEPARATOR)
                    .map(|alt| Alternative::parse(alt.trim()))
                    .collect(),
            })
            .collect();
        Self { terms }
    }

    /// Evaluate against a comparison string (case-insensitive).
    pub fn matches(&self, text: &str) -> bool {
        let haystack = text.to_lowercase();
        self.terms.iter().all(|t| t.matches_lowercase(&haystack))
    }
}

impl Alternative {
    fn parse(raw: &str) -> Self {
        match raw.strip_prefix(NEGATION) {
            Some(rest) => Self {
                needle: rest.to_lowercase(),
                negated: true,
            },
            None => Self {
                needle: raw.to_lowercase(),
                negated: false,
            },
        }
    }
}

impl Term {
    fn matches_lowercase(&self, haystack: &str) -> bool {
        let mut any_positive = false;
        let mut positive_hit = false;
        for alt in &self.alternatives {
            let present = haystack.contains(alt.needle.as_str());
            if alt.negated {
                if present {
                    return false;
                }
            } else {
                any_positive = true;
                positive_hit |= present;
            }
        }
        !any_positive || positive_hit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(expr: &str, text: &str) -> bool {
        ContainsExpr::parse(expr).matches(text)
    }

    #[test]
    fn bare_value_is_case_insensitive_substring() {
        assert!(m("Giveaway", "Join our GIVEAWAY now"));
        assert!(!m("giveaway", "nothing here"));
    }

    #[test]
    fn negated_bare_value() {
        assert!(m("!foo", "bar baz"));
        assert!(!m("!foo", "some FOO text"));
    }

    #[test]
    fn and_of_or_terms() {
        assert!(m("a+b|c", "xa yc"));
        assert!(m("a+b|c", "ab"));
        assert!(!m("a+b|c", "a only"));
        assert!(!m("a+b|c", "bc only"));
    }

    #[test]
    fn mixed_positive_and_negative_alternatives() {
        let expr = "promo|sale|!scam";
        assert!(m(expr, "big sale today"));
        assert!(!m(expr, "sale scam"));
        assert!(!m(expr, "nothing"));
    }

    #[test]
    fn all_negative_term() {
        assert!(m("!spam|!scam", "legit post"));
        assert!(!m("!spam|!scam", "this is spam"));
    }

    #[test]
    fn pieces_are_trimmed_when_compound() {
        let expr = ContainsExpr::parse(" Hello + !World ");
        assert_eq!(expr.terms.len(), 2);
        assert_eq!(expr.terms[0].alternatives[0].needle, "hello");
        assert!(expr.terms[1].alternatives[0].negated);
        assert!(m(" Hello + !World ", "hello there"));
    }

    #[test]
    fn regex_metacharacters_are_literal() {
        assert!(m("c.t", "a c.t here"));
        assert!(!m("c.t", "a cat here"));
        assert!(m("(50%)", "discount (50%) off"));
    }
}
