//! Filesystem rule loader.
//!
//! Reads rule documents from a YAML file or a directory tree of YAML files
//! via two-pass deserialization (RuleEnvelope -> RuleDocument), and rule
//! sheets (JSON arrays of row records with `Output <Field>` columns).

mod core;
mod error;
mod sheet;

#[cfg(test)]
mod tests;

pub use self::core::RuleLoader;
pub use self::error::{LoadResult, LoadStatus, Result, RuleError};
pub use self::sheet::{official_accounts_from_table, rules_from_table, SheetRowError, OUTPUT_PREFIX};
