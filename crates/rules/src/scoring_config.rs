//! ScoringConfig rule kind: the ordered rule table, score cap and tier cutoffs.

use serde::{Deserialize, Serialize};

use txwatch_core::RiskTier;

use crate::schema::{CommonMetadata, Predicate};

// ── YAML-level types ────────────────────────────────────────────────

/// Top-level ScoringConfig rule document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfigRule {
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    pub kind: String,
    pub metadata: CommonMetadata,
    pub spec: ScoringConfigSpec,
}

/// Specification section of a ScoringConfig rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfigSpec {
    /// Reported scores are clamped to this value.
    #[serde(default = "default_max_score")]
    pub max_score: u32,
    pub tiers: TierCutoffs,
    /// Evaluated in order; flags are reported in this order.
    pub rules: Vec<ScoringRuleDef>,
}

fn default_max_score() -> u32 {
    100
}

/// Lower bounds (inclusive) of the MEDIUM and HIGH tiers on the clamped score.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TierCutoffs {
    pub medium: u32,
    pub high: u32,
}

impl TierCutoffs {
    pub fn classify(&self, score: u32) -> RiskTier {
        if score >= self.high {
            RiskTier::High
        } else if score >= self.medium {
            RiskTier::Medium
        } else {
            RiskTier::Low
        }
    }
}

/// One row of the rule table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringRuleDef {
    pub id: String,
    pub when: Predicate,
    pub points: u32,
    pub message: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{LogicalOperator, ThresholdOperator};

    const DEFAULT_YAML: &str = include_str!("../../../data/rules/scoring/scoring-default.yml");

    #[test]
    fn parse_scoring_config_yaml() {
        let rule: ScoringConfigRule = serde_yaml::from_str(DEFAULT_YAML).unwrap();
        assert_eq!(rule.kind, "ScoringConfig");
        assert_eq!(rule.spec.max_score, 100);
        assert_eq!(rule.spec.rules.len(), 4);

        let ids: Vec<&str> = rule.spec.rules.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["structuring", "high-velocity", "round-numbers", "large-amounts"]);

        let points: Vec<u32> = rule.spec.rules.iter().map(|r| r.points).collect();
        assert_eq!(points, vec![40, 25, 20, 15]);
    }

    #[test]
    fn default_predicates_are_strict_greater_than() {
        let rule: ScoringConfigRule = serde_yaml::from_str(DEFAULT_YAML).unwrap();
        for r in &rule.spec.rules {
            match &r.when {
                Predicate::Compare(c) => assert_eq!(c.operator, ThresholdOperator::Gt, "{}", r.id),
                Predicate::Compose(_) => panic!("default rule {} should be a comparison", r.id),
            }
        }
    }

    #[test]
    fn tier_cutoffs_classify_boundaries() {
        let tiers = TierCutoffs { medium: 30, high: 60 };
        assert_eq!(tiers.classify(0), RiskTier::Low);
        assert_eq!(tiers.classify(29), RiskTier::Low);
        assert_eq!(tiers.classify(30), RiskTier::Medium);
        assert_eq!(tiers.classify(59), RiskTier::Medium);
        assert_eq!(tiers.classify(60), RiskTier::High);
        assert_eq!(tiers.classify(100), RiskTier::High);
    }

    #[test]
    fn parse_nested_composition() {
        let yaml = r#"
apiVersion: v1
kind: ScoringConfig
metadata:
  id: nested
  name: Nested
spec:
  tiers: { medium: 30, high: 60 }
  rules:
    - id: busy-and-big
      when:
        operator: and
        conditions:
          - { feature: transactions_per_day, operator: gte, value: 2 }
          - operator: not
            conditions:
              - { feature: avg_amount, operator: lt, value: 1000 }
      points: 10
      message: Busy and big
"#;
        let rule: ScoringConfigRule = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(rule.spec.max_score, 100);
        let def = &rule.spec.rules[0];
        assert!(def.enabled);
        match &def.when {
            Predicate::Compose(comp) => {
                assert_eq!(comp.operator, LogicalOperator::And);
                assert_eq!(comp.conditions.len(), 2);
            }
            other => panic!("expected composition, got {:?}", other),
        }
        assert_eq!(def.when.feature_names(), vec!["transactions_per_day", "avg_amount"]);
    }

    #[test]
    fn non_numeric_points_rejected() {
        let yaml = r#"
apiVersion: v1
kind: ScoringConfig
metadata:
  id: bad-points
  name: Bad
spec:
  tiers: { medium: 30, high: 60 }
  rules:
    - id: r1
      when: { feature: avg_amount, operator: gt, value: 1 }
      points: lots
      message: nope
"#;
        assert!(serde_yaml::from_str::<ScoringConfigRule>(yaml).is_err());
    }

    #[test]
    fn missing_message_rejected() {
        let yaml = r#"
apiVersion: v1
kind: ScoringConfig
metadata:
  id: no-message
  name: Bad
spec:
  tiers: { medium: 30, high: 60 }
  rules:
    - id: r1
      when: { feature: avg_amount, operator: gt, value: 1 }
      points: 5
"#;
        assert!(serde_yaml::from_str::<ScoringConfigRule>(yaml).is_err());
    }
}
