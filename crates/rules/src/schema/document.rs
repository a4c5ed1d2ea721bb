//! Multi-kind rule document container and accessors.

use serde::{Deserialize, Serialize};

use super::{ClassificationRule, CommonMetadata, OfficialAccountRule, RuleKind};

/// `kind: ClassificationRules` — an ordered list of classification rules.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ClassificationRuleSet {
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    pub kind: String,
    pub metadata: CommonMetadata,
    #[serde(default)]
    pub rules: Vec<ClassificationRule>,
}

/// `kind: OfficialAccountSetup` — per-project official account matchers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct OfficialAccountSetup {
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    pub kind: String,
    pub metadata: CommonMetadata,
    #[serde(default)]
    pub accounts: Vec<OfficialAccountRule>,
}

/// A fully deserialized rule document of any supported kind.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleDocument {
    Classification(ClassificationRuleSet),
    OfficialAccounts(OfficialAccountSetup),
}

impl RuleDocument {
    /// Get the document's metadata regardless of kind.
    pub fn metadata(&self) -> &CommonMetadata {
        match self {
            RuleDocument::Classification(doc) => &doc.metadata,
            RuleDocument::OfficialAccounts(doc) => &doc.metadata,
        }
    }

    pub fn kind(&self) -> RuleKind {
        match self {
            RuleDocument::Classification(_) => RuleKind::ClassificationRules,
            RuleDocument::OfficialAccounts(_) => RuleKind::OfficialAccountSetup,
        }
    }

    /// Number of rule entries carried by the document.
    pub fn rule_count(&self) -> usize {
        match self {
            RuleDocument::Classification(doc) => doc.rules.len(),
            RuleDocument::OfficialAccounts(doc) => doc.accounts.len(),
        }
    }

    pub fn as_classification(&self) -> Option<&ClassificationRuleSet> {
        match self {
            RuleDocument::Classification(doc) => Some(doc),
            _ => None,
        }
    }

    pub fn as_official_accounts(&self) -> Option<&OfficialAccountSetup> {
        match self {
            RuleDocument::OfficialAccounts(doc) => Some(doc),
            _ => None,
        }
    }

    /// Serialize this document to YAML, delegating to the inner type.
    pub fn to_yaml(&self) -> std::result::Result<String, serde_yaml::Error> {
        match self {
            RuleDocument::Classification(doc) => serde_yaml::to_string(doc),
            RuleDocument::OfficialAccounts(doc) => serde_yaml::to_string(doc),
        }
    }
}
