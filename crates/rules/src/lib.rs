//! Priority-ordered rule engine for classifying social-media mentions.
//!
//! This crate provides:
//! - YAML rule documents and tabular rule sheets with serde deserialization
//! - A small matching grammar (compound contains, numeric thresholds,
//!   whole-word keyword counts, composite columns)
//! - Default/project rule-set resolution and first-match-wins priority writes
//!   with a per-field overwrite history
//! - Official-account tagging, table preparation steps and an execution
//!   summary report

pub mod engine;
pub mod evaluator;
pub mod expr;
pub mod loader;
pub mod official;
pub mod prep;
pub mod resolver;
pub mod schema;
pub mod summary;
pub mod tracker;
pub mod validation;

pub use engine::{EngineOptions, EngineRun, RuleEngine};
pub use official::OfficialAccountClassifier;
