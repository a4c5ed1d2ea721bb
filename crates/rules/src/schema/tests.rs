//! Tests for schema types.

use insight_core::FieldValue;

use super::*;

const CLASSIFICATION_YAML: &str = r#"
apiVersion: v1
kind: ClassificationRules
metadata:
  id: noise-defaults
  name: Default Noise Rules
  tags: [noise]
rules:
  - priority: 10
    matching_column: Text
    matching_value: giveaway
    matching_type: contains
    outputs:
      Noise Tag: "1"
  - project: Acme
    priority: 5
    matching_column: Followers
    matching_value: 100
    matching_type: greater_than
    channel: Twitter
    outputs:
      Noise Tag: 0
      Issue: ""
"#;

const OFFICIAL_YAML: &str = r#"
apiVersion: v1
kind: OfficialAccountSetup
metadata:
  id: acme-official
  name: Acme Official Accounts
accounts:
  - project: Acme
    channel: Instagram
    verified_account: true
    matching_column: Author
    matching_value: acme
    matching_type: contains
"#;

#[test]
fn parse_classification_rules() {
    let doc: ClassificationRuleSet = serde_yaml::from_str(CLASSIFICATION_YAML).unwrap();
    assert_eq!(doc.metadata.id, "noise-defaults");
    assert!(doc.metadata.enabled);
    assert_eq!(doc.rules.len(), 2);

    let first = &doc.rules[0];
    assert_eq!(first.project, DEFAULT_SCOPE);
    assert_eq!(first.matching_type, MatchingType::Contains);
    assert_eq!(first.channel(), None);

    let second = &doc.rules[1];
    assert_eq!(second.project, "Acme");
    assert_eq!(second.matching_value, "100");
    assert_eq!(second.matching_type, MatchingType::GreaterThan);
    assert_eq!(second.channel(), Some("Twitter"));
    assert_eq!(second.outputs.get("Noise Tag"), Some(&FieldValue::Integer(0)));
}

#[test]
fn blank_outputs_are_inactive() {
    let doc: ClassificationRuleSet = serde_yaml::from_str(CLASSIFICATION_YAML).unwrap();
    let active: Vec<&str> = doc.rules[1].active_outputs().map(|(f, _)| f).collect();
    assert_eq!(active, vec!["Noise Tag"]);
}

#[test]
fn blank_channel_is_no_filter() {
    let mut rule: ClassificationRule = serde_yaml::from_str(
        "priority: 1\nmatching_column: Text\nmatching_value: x\nmatching_type: equals\nchannel: '  '\n",
    )
    .unwrap();
    assert_eq!(rule.channel(), None);
    rule.channel = Some(" Facebook ".to_string());
    assert_eq!(rule.channel(), Some("Facebook"));
}

#[test]
fn unknown_matching_type_still_parses() {
    let rule: ClassificationRule = serde_yaml::from_str(
        "priority: 1\nmatching_column: Text\nmatching_value: x\nmatching_type: startswith\n",
    )
    .unwrap();
    assert_eq!(rule.matching_type, MatchingType::Other("startswith".to_string()));
    assert!(!rule.matching_type.is_known());
    assert_eq!(rule.matching_type.to_string(), "startswith");
}

#[test]
fn unknown_rule_field_rejected() {
    let result: Result<ClassificationRule, _> = serde_yaml::from_str(
        "priority: 1\nmatching_column: Text\nmatching_value: x\nmatching_type: equals\ncolour: red\n",
    );
    assert!(result.is_err());
}

#[test]
fn parse_official_account_setup() {
    let doc: OfficialAccountSetup = serde_yaml::from_str(OFFICIAL_YAML).unwrap();
    assert_eq!(doc.accounts.len(), 1);
    assert_eq!(doc.accounts[0].verified_account, "True");
    assert_eq!(doc.accounts[0].matching_type, MatchingType::Contains);
}

#[test]
fn envelope_two_pass_dispatch() {
    let envelope: RuleEnvelope = serde_yaml::from_str(CLASSIFICATION_YAML).unwrap();
    assert_eq!(envelope.rule_kind().unwrap(), RuleKind::ClassificationRules);
    let doc = envelope.parse_full().unwrap();
    assert_eq!(doc.kind(), RuleKind::ClassificationRules);
    assert_eq!(doc.rule_count(), 2);
    assert!(doc.as_classification().is_some());
    assert!(doc.as_official_accounts().is_none());

    let envelope: RuleEnvelope = serde_yaml::from_str(OFFICIAL_YAML).unwrap();
    let doc = envelope.parse_full().unwrap();
    assert_eq!(doc.kind(), RuleKind::OfficialAccountSetup);
    assert_eq!(doc.metadata().id, "acme-official");
}

#[test]
fn envelope_rejects_unknown_kind() {
    let yaml = "apiVersion: v1\nkind: AnomalyRule\nmetadata:\n  id: x\n  name: X\n";
    let envelope: RuleEnvelope = serde_yaml::from_str(yaml).unwrap();
    assert!(envelope.parse_full().is_err());
}

#[test]
fn document_yaml_round_trip() {
    let envelope: RuleEnvelope = serde_yaml::from_str(CLASSIFICATION_YAML).unwrap();
    let doc = envelope.parse_full().unwrap();
    let yaml = doc.to_yaml().unwrap();
    let reparsed = serde_yaml::from_str::<RuleEnvelope>(&yaml)
        .unwrap()
        .parse_full()
        .unwrap();
    assert_eq!(doc, reparsed);
}
