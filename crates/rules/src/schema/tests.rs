//! Tests for schema types.

use super::*;

const FEATURE_YAML: &str = r#"
apiVersion: v1
kind: FeatureConfig
metadata:
  id: features-eur
  name: EUR features
  description: Euro reporting window
  tags: [eur]
spec:
  currency: { minor_units: 100 }
  near_threshold: { lower: 9000, upper: 10000 }
  round_number: { modulus: 50 }
  std_dev: population
"#;

const SCORING_YAML: &str = r#"
apiVersion: v1
kind: ScoringConfig
metadata:
  id: velocity-only
  name: Velocity only
spec:
  tiers: { medium: 20, high: 40 }
  rules:
    - id: busy
      when:
        operator: or
        conditions:
          - { feature: transactions_per_day, operator: gt, value: 3 }
          - { feature: velocity_score, operator: gte, value: 10 }
      points: 25
      message: Busy account
"#;

#[test]
fn rule_kind_from_str() {
    assert_eq!("FeatureConfig".parse::<RuleKind>().unwrap(), RuleKind::FeatureConfig);
    assert_eq!("ScoringConfig".parse::<RuleKind>().unwrap(), RuleKind::ScoringConfig);
    assert!("AnomalyRule".parse::<RuleKind>().is_err());
}

#[test]
fn rule_kind_display() {
    assert_eq!(RuleKind::FeatureConfig.to_string(), "FeatureConfig");
    assert_eq!(RuleKind::ScoringConfig.to_string(), "ScoringConfig");
}

#[test]
fn rule_envelope_dispatches_by_kind() {
    let envelope: RuleEnvelope = serde_yaml::from_str(FEATURE_YAML).unwrap();
    assert_eq!(envelope.rule_kind().unwrap(), RuleKind::FeatureConfig);
    assert_eq!(envelope.metadata.id, "features-eur");

    let doc = envelope.parse_full().unwrap();
    assert_eq!(doc.kind(), RuleKind::FeatureConfig);
    let rule = doc.as_feature_config().unwrap();
    assert_eq!(rule.spec.round_number.modulus, 50.0);
    assert!(doc.as_scoring_config().is_none());

    let envelope: RuleEnvelope = serde_yaml::from_str(SCORING_YAML).unwrap();
    let doc = envelope.parse_full().unwrap();
    assert_eq!(doc.kind(), RuleKind::ScoringConfig);
    assert_eq!(doc.as_scoring_config().unwrap().spec.rules.len(), 1);
}

#[test]
fn rule_envelope_unknown_kind_errors() {
    let yaml = r#"
apiVersion: v1
kind: AlertConfig
metadata: { id: alerts, name: Alerts }
spec: {}
"#;
    let envelope: RuleEnvelope = serde_yaml::from_str(yaml).unwrap();
    let err = envelope.parse_full().unwrap_err();
    assert!(err.contains("unknown rule kind"), "{}", err);
}

#[test]
fn wrong_spec_for_kind_errors() {
    // A scoring spec under a FeatureConfig header.
    let yaml = SCORING_YAML.replace("kind: ScoringConfig", "kind: FeatureConfig");
    let envelope: RuleEnvelope = serde_yaml::from_str(&yaml).unwrap();
    assert!(envelope.parse_full().is_err());
}

#[test]
fn rule_document_metadata_accessor() {
    let doc = RuleDocument::from_yaml_as(RuleKind::FeatureConfig, FEATURE_YAML).unwrap();
    let meta = doc.metadata();
    assert_eq!(meta.name, "EUR features");
    assert_eq!(meta.description.as_deref(), Some("Euro reporting window"));
    assert_eq!(meta.tags.as_deref(), Some(&["eur".to_string()][..]));
    assert!(meta.enabled);
    assert!(meta.extends.is_none());
}

#[test]
fn common_metadata_with_extends() {
    let yaml = "id: child\nname: Child\nextends: parent\nenabled: false\n";
    let meta: CommonMetadata = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(meta.extends.as_deref(), Some("parent"));
    assert!(!meta.enabled);
}

#[test]
fn unknown_metadata_field_rejected() {
    let yaml = "id: x\nname: X\nowner: someone\n";
    assert!(serde_yaml::from_str::<CommonMetadata>(yaml).is_err());
}

#[test]
fn scoring_document_serializes_predicates_to_json() {
    let doc = RuleDocument::from_yaml_as(RuleKind::ScoringConfig, SCORING_YAML).unwrap();
    let rule = doc.as_scoring_config().unwrap();

    let json = serde_json::to_value(rule).unwrap();
    assert_eq!(json["kind"], "ScoringConfig");
    assert_eq!(json["spec"]["rules"][0]["when"]["operator"], "or");
    assert_eq!(json["spec"]["rules"][0]["when"]["conditions"][1]["feature"], "velocity_score");
}

#[test]
fn threshold_operator_symbols() {
    let ops = [
        (ThresholdOperator::Gt, ">"),
        (ThresholdOperator::Gte, ">="),
        (ThresholdOperator::Lt, "<"),
        (ThresholdOperator::Lte, "<="),
        (ThresholdOperator::Eq, "=="),
        (ThresholdOperator::Neq, "!="),
    ];
    for (op, symbol) in ops {
        assert_eq!(op.symbol(), symbol);
    }
}

#[test]
fn malformed_yaml_errors() {
    assert!(serde_yaml::from_str::<RuleEnvelope>("apiVersion: v1\nkind: [").is_err());
    // Missing metadata
    assert!(serde_yaml::from_str::<RuleEnvelope>("apiVersion: v1\nkind: FeatureConfig\n").is_err());
}
