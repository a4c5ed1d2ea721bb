//! Parsers for the small expression language used in rule cells.
//!
//! The same separators carry different meanings depending on position:
//! - column position: `A+B` joins the values of columns A and B with `+`
//! - `contains` values: `+` separates required terms (AND), `|` separates
//!   alternatives within a term (OR), a leading `!` negates an alternative
//! - `count_contains` values: `<keyword>:max=<N>` or `<keyword>:min=<N>`
//!
//! There is no escaping. A literal `+` or `|` inside a value is always read as
//! a separator.

mod column;
mod contains;
mod count;

pub use column::ColumnSpec;
pub use contains::{Alternative, ContainsExpr, Term};
pub use count::{CountBound, CountExpr};

/// Separator between composite column parts and between their joined values.
pub const COMPOSITE_SEPARATOR: char = '+';

/// Errors raised while parsing an expression cell.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExprError {
    #[error("count expression '{0}' must have the form '<keyword>:<max|min>=<N>'")]
    MalformedCount(String),

    #[error("count expression '{0}' has an empty keyword")]
    EmptyKeyword(String),

    #[error("count bound '{0}' is not an integer")]
    InvalidBound(String),

    #[error("count constraint '{0}' must start with 'max=' or 'min='")]
    UnknownConstraint(String),

    #[error("keyword pattern could not be compiled: {0}")]
    Pattern(String),
}
