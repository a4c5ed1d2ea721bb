//! Tests for the rule loader module.

use std::fs;

use insight_core::{FieldValue, Table};
use tempfile::TempDir;

use super::*;
use crate::schema::{MatchingType, RuleKind};

const RULES_YAML: &str = r#"
apiVersion: v1
kind: ClassificationRules
metadata:
  id: noise-rules
  name: Noise Rules
rules:
  - priority: 10
    matching_column: Text
    matching_value: giveaway
    matching_type: contains
    outputs:
      Noise Tag: "1"
"#;

const OFFICIAL_YAML: &str = r#"
apiVersion: v1
kind: OfficialAccountSetup
metadata:
  id: official
  name: Official Accounts
accounts:
  - project: Acme
    channel: Instagram
    verified_account: "yes"
    matching_column: Author
    matching_value: acme
    matching_type: contains
"#;

fn temp_loader() -> (TempDir, RuleLoader) {
    let dir = TempDir::new().expect("create tempdir");
    let loader = RuleLoader::new(dir.path().to_path_buf());
    (dir, loader)
}

#[test]
fn load_rule_from_file() {
    let (dir, _) = temp_loader();
    let rule_path = dir.path().join("noise.yml");
    fs::write(&rule_path, RULES_YAML).unwrap();

    let doc = RuleLoader::load_file(&rule_path).unwrap();
    assert_eq!(doc.metadata().id, "noise-rules");
    assert_eq!(doc.kind(), RuleKind::ClassificationRules);
    assert_eq!(doc.rule_count(), 1);
}

#[test]
fn load_single_file_path() {
    let dir = TempDir::new().unwrap();
    let rule_path = dir.path().join("noise.yaml");
    fs::write(&rule_path, RULES_YAML).unwrap();

    let mut loader = RuleLoader::new(rule_path);
    let results = loader.load_all().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(loader.classification_rules().len(), 1);
}

#[test]
fn load_all_skips_dotfiles_and_non_yaml() {
    let (dir, mut loader) = temp_loader();

    fs::write(dir.path().join("rules.yml"), RULES_YAML).unwrap();
    fs::write(dir.path().join(".hidden.yml"), RULES_YAML).unwrap();
    fs::write(dir.path().join("readme.txt"), "not a rule").unwrap();

    let results = loader.load_all().unwrap();

    let loaded = results
        .iter()
        .filter(|r| matches!(r.status, LoadStatus::Loaded { .. }))
        .count();
    let skipped = results
        .iter()
        .filter(|r| matches!(r.status, LoadStatus::Skipped { .. }))
        .count();

    assert_eq!(loaded, 1);
    assert_eq!(skipped, 2);
}

#[test]
fn load_all_recursive_in_sorted_order() {
    let (dir, mut loader) = temp_loader();

    let sub = dir.path().join("b-project");
    fs::create_dir(&sub).unwrap();
    fs::write(
        sub.join("project.yml"),
        RULES_YAML
            .replace("noise-rules", "project-rules")
            .replace("giveaway", "contest"),
    )
    .unwrap();
    fs::write(dir.path().join("a-defaults.yml"), RULES_YAML).unwrap();
    fs::write(dir.path().join("c-official.yml"), OFFICIAL_YAML).unwrap();

    loader.load_all().unwrap();

    let values: Vec<String> = loader
        .classification_rules()
        .into_iter()
        .map(|r| r.matching_value)
        .collect();
    assert_eq!(values, vec!["giveaway", "contest"]);
    assert_eq!(loader.official_accounts().len(), 1);
    assert_eq!(loader.documents().count(), 3);
}

#[test]
fn parse_failure_is_reported_not_fatal() {
    let (dir, mut loader) = temp_loader();
    fs::write(dir.path().join("good.yml"), RULES_YAML).unwrap();
    fs::write(dir.path().join("bad.yml"), "apiVersion: v1\nkind: [oops").unwrap();

    let results = loader.load_all().unwrap();
    let failed = results
        .iter()
        .filter(|r| matches!(r.status, LoadStatus::Failed { .. }))
        .count();
    assert_eq!(failed, 1);
    assert_eq!(loader.classification_rules().len(), 1);
}

#[test]
fn disabled_documents_contribute_nothing() {
    let (dir, mut loader) = temp_loader();
    let disabled = RULES_YAML.replace("name: Noise Rules", "name: Noise Rules\n  enabled: false");
    fs::write(dir.path().join("off.yml"), disabled).unwrap();

    loader.load_all().unwrap();
    assert_eq!(loader.documents().count(), 1);
    assert!(loader.classification_rules().is_empty());
}

#[test]
fn empty_id_rejected() {
    let yaml = RULES_YAML.replace("id: noise-rules", "id: \"\"");
    let err = RuleLoader::parse_document(&yaml).unwrap_err();
    assert!(matches!(err, RuleError::Validation(_)));
}

#[test]
fn missing_path_is_an_error() {
    let mut loader = RuleLoader::new("/definitely/not/here".into());
    assert!(loader.load_all().is_err());
}

#[test]
fn insert_document_replaces_by_id() {
    let mut loader = RuleLoader::new("unused".into());
    loader.insert_document(RuleLoader::parse_document(RULES_YAML).unwrap());
    loader.insert_document(RuleLoader::parse_document(RULES_YAML).unwrap());
    assert_eq!(loader.documents().count(), 1);
    assert_eq!(loader.rules_path(), std::path::Path::new("unused"));
}

#[test]
fn duplicate_id_takes_position_of_later_file() {
    let (dir, mut loader) = temp_loader();
    fs::write(dir.path().join("a.yml"), RULES_YAML).unwrap();
    fs::write(
        dir.path().join("b.yml"),
        RULES_YAML
            .replace("noise-rules", "other-rules")
            .replace("giveaway", "contest"),
    )
    .unwrap();
    fs::write(
        dir.path().join("c.yml"),
        RULES_YAML.replace("giveaway", "sweepstakes"),
    )
    .unwrap();

    loader.load_all().unwrap();

    let ids: Vec<&str> = loader.documents().map(|d| d.metadata().id.as_str()).collect();
    assert_eq!(ids, vec!["other-rules", "noise-rules"]);
    let values: Vec<String> = loader
        .classification_rules()
        .into_iter()
        .map(|r| r.matching_value)
        .collect();
    assert_eq!(values, vec!["contest", "sweepstakes"]);
}

// ── Rule sheets ─────────────────────────────────────────────────

fn rule_sheet() -> Table {
    Table::from_columns([
        (" Project ", vec!["Default".into(), "Acme".into(), FieldValue::Null]),
        (
            "Priority",
            vec![FieldValue::Float(10.0), FieldValue::Integer(3), FieldValue::Integer(1)],
        ),
        ("Matching Column", vec!["Text".into(), "Followers".into(), "Text".into()]),
        ("Matching Value", vec!["promo".into(), FieldValue::Integer(100), "x".into()]),
        ("Matching Type", vec!["contains".into(), "greater_than".into(), "equals".into()]),
        ("Channel", vec![FieldValue::Null, "Twitter".into(), FieldValue::Null]),
        ("Output Noise Tag", vec![FieldValue::Integer(0), FieldValue::Null, "1".into()]),
        ("Output Issue", vec!["Promotion".into(), "Influencer".into(), FieldValue::Null]),
    ])
}

#[test]
fn rule_sheet_rows_become_rules() {
    let (rules, errors) = rules_from_table(&rule_sheet());

    assert_eq!(rules.len(), 2);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].row, 2);

    let first = &rules[0];
    assert_eq!(first.project, "Default");
    assert_eq!(first.priority, 10);
    assert_eq!(first.channel, None);
    assert_eq!(
        first.outputs.keys().collect::<Vec<_>>(),
        vec!["Noise Tag", "Issue"]
    );

    let second = &rules[1];
    assert_eq!(second.matching_value, "100");
    assert_eq!(second.matching_type, MatchingType::GreaterThan);
    assert_eq!(second.channel(), Some("Twitter"));
    assert_eq!(
        second.active_outputs().map(|(f, _)| f).collect::<Vec<_>>(),
        vec!["Issue"]
    );
}

#[test]
fn non_integer_priority_rejected() {
    let sheet = Table::from_columns([
        ("Project", vec!["Default".into(), "Default".into()]),
        ("Priority", vec![FieldValue::Float(2.5), "high".into()]),
        ("Matching Column", vec!["Text".into(), "Text".into()]),
        ("Matching Value", vec!["a".into(), "b".into()]),
        ("Matching Type", vec!["contains".into(), "contains".into()]),
    ]);
    let (rules, errors) = rules_from_table(&sheet);
    assert!(rules.is_empty());
    assert_eq!(errors.len(), 2);
    assert!(errors[0].to_string().contains("Priority"));
}

#[test]
fn official_sheet_rows_become_entries() {
    let sheet = Table::from_columns([
        ("Project", vec!["Acme".into()]),
        ("Channel", vec!["Instagram".into()]),
        ("Verified Account", vec![FieldValue::Boolean(true)]),
        ("Matching Column", vec!["Author".into()]),
        ("Matching Value", vec!["acme".into()]),
        ("Matching Type", vec!["contains".into()]),
    ]);
    let (accounts, errors) = official_accounts_from_table(&sheet);
    assert!(errors.is_empty());
    assert_eq!(accounts[0].verified_account, "True");
}

#[test]
fn rule_sheet_from_json_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rules.json");
    fs::write(
        &path,
        r#"[{"Project": "Default", "Priority": 5, "Matching Column": "Text",
             "Matching Value": "spam:min=2", "Matching Type": "count_contains",
             "Output Noise Tag": "1"}]"#,
    )
    .unwrap();

    let (rules, errors) = RuleLoader::load_rule_sheet(&path).unwrap();
    assert!(errors.is_empty());
    assert_eq!(rules[0].matching_type, MatchingType::CountContains);
}
