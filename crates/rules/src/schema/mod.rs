//! YAML DSL schema types with serde deserialization.
//!
//! Defines the type hierarchy for rule documents:
//! - `RuleEnvelope`: lightweight first-pass header (apiVersion, kind, metadata)
//! - `RuleDocument`: enum dispatching to kind-specific types
//! - `ClassificationRule` / `OfficialAccountRule`: the rule entries themselves

mod document;
mod envelope;
mod kind;
mod matching;
mod metadata;
mod official;
mod rule;

pub use document::*;
pub use envelope::*;
pub use kind::*;
pub use matching::*;
pub use metadata::*;
pub use official::*;
pub use rule::{ClassificationRule, DEFAULT_SCOPE};

#[cfg(test)]
mod tests;
