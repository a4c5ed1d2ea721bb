//! Column specification: one column or a `+`-joined composite.

use insight_core::Table;

use super::COMPOSITE_SEPARATOR;

/// Which table column(s) a rule reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSpec {
    Single(String),
    /// Parts are trimmed; values are joined with `+` in this order.
    Composite(Vec<String>),
}

impl ColumnSpec {
    pub fn parse(raw: &str) -> Self {
        if raw.contains(COMPOSITE_SEPARATOR) {
            ColumnSpec::Composite(
                raw.split(COMPOSITE_SEPARATOR)
                    .map(|p| p.trim().to_string())
                    .collect(),
            )
        } else {
            ColumnSpec::Single(raw.to_string())
        }
    }

    pub fn columns(&self) -> Vec<&str> {
        match self {
            ColumnSpec::Single(name) => vec![name.as_str()],
            ColumnSpec::Composite(parts) => parts.iter().map(String::as_str).collect(),
        }
    }

    /// First referenced column the table does not have, if any.
    pub fn missing_in<'a>(&'a self, table: &Table) -> Option<&'a str> {
        self.columns().into_iter().find(|c| !table.has_column(c))
    }

    /// Comparison string for one row: the rendered value, or the rendered
    /// values of every part joined with `+`.
    pub fn comparison_string(&self, table: &Table, row: usize) -> String {
        let render = |column: &str| {
            table
                .get(row, column)
                .map(|v| v.render())
                .unwrap_or_default()
        };
        match self {
            ColumnSpec::Single(name) => render(name),
            ColumnSpec::Composite(parts) => parts
                .iter()
                .map(|p| render(p))
                .collect::<Vec<_>>()
                .join(&COMPOSITE_SEPARATOR.to_string()),
        }
    }
}
