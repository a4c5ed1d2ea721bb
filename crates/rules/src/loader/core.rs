//! Core [`RuleLoader`] struct: filesystem-backed rule document loading.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use insight_core::Table;
use tracing::{info, warn};

use crate::schema::{ClassificationRule, OfficialAccountRule, RuleDocument, RuleEnvelope};

use super::error::{LoadResult, LoadStatus, Result, RuleError};
use super::sheet::{official_accounts_from_table, rules_from_table, SheetRowError};

/// Filesystem-backed rule loader.
///
/// Scans a file or directory (recursively, in sorted path order) for
/// `*.yml` / `*.yaml` files and keeps the parsed [`RuleDocument`]s keyed by
/// `metadata.id` in load order, so rule source order is deterministic. A
/// later document with a repeated id replaces the earlier one and takes its
/// own position in the order.
pub struct RuleLoader {
    /// Rule file or root directory containing rule YAML files.
    rules_path: PathBuf,
    documents: IndexMap<String, RuleDocument>,
}

impl RuleLoader {
    pub fn new(rules_path: PathBuf) -> Self {
        Self {
            rules_path,
            documents: IndexMap::new(),
        }
    }

    /// Load the configured path (file or directory).
    ///
    /// Dotfiles (filenames starting with `.`) and non-YAML files are skipped.
    /// Parse errors are reported per-file but do not abort the scan.
    pub fn load_all(&mut self) -> Result<Vec<LoadResult>> {
        let mut results = Vec::new();
        let root = self.rules_path.clone();
        if root.is_file() {
            self.load_entry(root, &mut results);
        } else if root.is_dir() {
            self.scan_dir_recursive(&root, &mut results)?;
        } else {
            return Err(RuleError::Validation(format!(
                "rules path '{}' does not exist",
                root.display()
            )));
        }
        Ok(results)
    }

    /// Recursively scan a directory for YAML rule files.
    fn scan_dir_recursive(&mut self, dir: &Path, results: &mut Vec<LoadResult>) -> Result<()> {
        let entries = match fs::read_dir(dir) {
            Ok(e) => e,
            Err(e) => {
                warn!(path = %dir.display(), error = %e, "failed to read directory");
                return Ok(());
            }
        };

        let mut paths = entries
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<Vec<_>>>()?;
        paths.sort();

        for path in paths {
            // Skip dotfiles/dotdirs
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if name.starts_with('.') {
                    if path.is_file() {
                        results.push(LoadResult {
                            path,
                            status: LoadStatus::Skipped {
                                reason: "dotfile".to_string(),
                            },
                        });
                    }
                    continue;
                }
            }

            if path.is_dir() {
                self.scan_dir_recursive(&path, results)?;
                continue;
            }

            self.load_entry(path, results);
        }

        Ok(())
    }

    fn load_entry(&mut self, path: PathBuf, results: &mut Vec<LoadResult>) {
        let is_yaml = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e == "yml" || e == "yaml")
            .unwrap_or(false);

        if !is_yaml {
            results.push(LoadResult {
                path,
                status: LoadStatus::Skipped {
                    reason: "not a YAML file".to_string(),
                },
            });
            return;
        }

        match Self::load_file(&path) {
            Ok(doc) => {
                let rule_id = doc.metadata().id.clone();
                let rules = doc.rule_count();
                info!(rule_id = %rule_id, kind = %doc.kind(), rules, path = %path.display(), "loaded rule document");
                if self.replace_document(doc) {
                    warn!(rule_id = %rule_id, path = %path.display(), "duplicate document id, later file wins");
                }
                results.push(LoadResult {
                    path,
                    status: LoadStatus::Loaded { rule_id, rules },
                });
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load rule file");
                results.push(LoadResult {
                    path,
                    status: LoadStatus::Failed {
                        error: e.to_string(),
                    },
                });
            }
        }
    }

    /// Parse a single YAML file into a [`RuleDocument`] via two-pass deserialization.
    ///
    /// First pass: deserialize as [`RuleEnvelope`] to read the `kind` field.
    /// Second pass: reconstruct and deserialize into the kind-specific type.
    pub fn load_file(path: &Path) -> Result<RuleDocument> {
        let contents = fs::read_to_string(path)?;
        Self::parse_document(&contents)
    }

    /// Parse YAML text into a [`RuleDocument`].
    pub fn parse_document(contents: &str) -> Result<RuleDocument> {
        // First pass: extract envelope (kind + metadata).
        let envelope: RuleEnvelope = serde_yaml::from_str(contents)?;

        if envelope.metadata.id.is_empty() {
            return Err(RuleError::Validation(
                "rule metadata.id must not be empty".to_string(),
            ));
        }

        // Second pass: deserialize into kind-specific type.
        envelope.parse_full().map_err(|e| {
            RuleError::Validation(format!(
                "failed to parse rule '{}': {}",
                envelope.metadata.id, e
            ))
        })
    }

    /// Read a JSON rule sheet (array of row records) into classification rules.
    pub fn load_rule_sheet(path: &Path) -> Result<(Vec<ClassificationRule>, Vec<SheetRowError>)> {
        let table = Table::read_json(path)?;
        let (rules, errors) = rules_from_table(&table);
        info!(path = %path.display(), rules = rules.len(), rejected = errors.len(), "loaded rule sheet");
        Ok((rules, errors))
    }

    /// Read a JSON official-account setup sheet.
    pub fn load_official_sheet(
        path: &Path,
    ) -> Result<(Vec<OfficialAccountRule>, Vec<SheetRowError>)> {
        let table = Table::read_json(path)?;
        let (accounts, errors) = official_accounts_from_table(&table);
        info!(path = %path.display(), accounts = accounts.len(), rejected = errors.len(), "loaded official account sheet");
        Ok((accounts, errors))
    }

    /// Insert an already parsed document.
    pub fn insert_document(&mut self, doc: RuleDocument) {
        self.replace_document(doc);
    }

    /// Insert at the end of the load order, dropping any earlier document with
    /// the same id. Returns true when one was dropped.
    fn replace_document(&mut self, doc: RuleDocument) -> bool {
        let id = doc.metadata().id.clone();
        let replaced = self.documents.shift_remove(&id).is_some();
        self.documents.insert(id, doc);
        replaced
    }

    pub fn rules_path(&self) -> &Path {
        &self.rules_path
    }

    pub fn documents(&self) -> impl Iterator<Item = &RuleDocument> {
        self.documents.values()
    }

    /// Classification rules of every enabled document, in load order.
    pub fn classification_rules(&self) -> Vec<ClassificationRule> {
        self.documents
            .values()
            .filter(|d| d.metadata().enabled)
            .filter_map(RuleDocument::as_classification)
            .flat_map(|d| d.rules.iter().cloned())
            .collect()
    }

    /// Official-account entries of every enabled document, in load order.
    pub fn official_accounts(&self) -> Vec<OfficialAccountRule> {
        self.documents
            .values()
            .filter(|d| d.metadata().enabled)
            .filter_map(RuleDocument::as_official_accounts)
            .flat_map(|d| d.accounts.iter().cloned())
            .collect()
    }
}
