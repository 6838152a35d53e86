//! Validation for FeatureConfig and ScoringConfig documents.

use std::collections::HashSet;

use txwatch_core::Feature;

use super::fuzzy::{is_document_id, suggest_feature};
use super::ValidationResult;

use crate::feature_config::FeatureConfigRule;
use crate::schema::{LogicalOperator, Predicate};
use crate::scoring_config::ScoringConfigRule;

// ── Common metadata validation ──────────────────────────────────────

fn validate_common_metadata(
    api_version: &str,
    kind: &str,
    expected_kind: &str,
    id: &str,
    enabled: bool,
    result: &mut ValidationResult,
) {
    if api_version != "v1" {
        result.error(
            "apiVersion",
            format!("apiVersion must be 'v1', got '{}'", api_version),
        );
    }
    if kind != expected_kind {
        result.error(
            "kind",
            format!("kind must be '{}', got '{}'", expected_kind, kind),
        );
    }
    if !is_document_id(id) {
        result.error(
            "metadata.id",
            format!(
                "id must be kebab-case (lowercase alphanumeric + hyphens), got '{}'",
                id
            ),
        );
    }
    if !enabled {
        result.warn("metadata.enabled", "document is disabled and cannot be selected for scoring");
    }
}

// ── FeatureConfig validation ────────────────────────────────────────

fn is_whole_minor(amount: f64, scale: u32) -> bool {
    let in_minor = amount * f64::from(scale);
    (in_minor - in_minor.round()).abs() <= 1e-9
}

pub fn validate_feature_config(rule: &FeatureConfigRule, result: &mut ValidationResult) {
    validate_common_metadata(
        &rule.api_version,
        &rule.kind,
        "FeatureConfig",
        &rule.metadata.id,
        rule.metadata.enabled,
        result,
    );

    let spec = &rule.spec;
    let scale = spec.currency.minor_units;
    if scale == 0 {
        result.error("spec.currency.minor_units", "minor_units must be at least 1");
    }

    let window = &spec.near_threshold;
    if !window.lower.is_finite() || !window.upper.is_finite() {
        result.error("spec.near_threshold", "window bounds must be finite numbers");
    } else {
        if window.lower < 0.0 {
            result.error(
                "spec.near_threshold.lower",
                format!("lower bound must be non-negative, got {}", window.lower),
            );
        }
        if window.lower >= window.upper {
            result.error(
                "spec.near_threshold",
                format!(
                    "window must satisfy lower < upper: lower({}) upper({})",
                    window.lower, window.upper
                ),
            );
        }
        if scale > 0 {
            for (name, bound) in [("lower", window.lower), ("upper", window.upper)] {
                if !is_whole_minor(bound, scale) {
                    result.error(
                        format!("spec.near_threshold.{}", name),
                        format!(
                            "{} bound {} is not a whole number of minor units (scale {})",
                            name, bound, scale
                        ),
                    );
                }
            }
        }
    }

    let modulus = spec.round_number.modulus;
    if !modulus.is_finite() || modulus <= 0.0 {
        result.error(
            "spec.round_number.modulus",
            format!("modulus must be a positive number, got {}", modulus),
        );
    } else if scale > 0 && !is_whole_minor(modulus, scale) {
        result.error(
            "spec.round_number.modulus",
            format!(
                "modulus {} is not a whole number of minor units (scale {})",
                modulus, scale
            ),
        );
    }
}

// ── ScoringConfig validation ────────────────────────────────────────

pub fn validate_scoring_config(rule: &ScoringConfigRule, result: &mut ValidationResult) {
    validate_common_metadata(
        &rule.api_version,
        &rule.kind,
        "ScoringConfig",
        &rule.metadata.id,
        rule.metadata.enabled,
        result,
    );

    let spec = &rule.spec;

    // Tier cutoffs must be ascending and reachable.
    let t = &spec.tiers;
    if t.medium >= t.high {
        result.error(
            "spec.tiers",
            format!("tiers must be ascending: medium({}) < high({})", t.medium, t.high),
        );
    }
    if t.high > spec.max_score {
        result.error(
            "spec.tiers.high",
            format!(
                "high cutoff {} is above max_score {} and can never be reached",
                t.high, spec.max_score
            ),
        );
    }
    if spec.max_score == 0 {
        result.error("spec.max_score", "max_score must be positive");
    }

    if spec.rules.is_empty() {
        result.warn("spec.rules", "rule table is empty; every subject will score 0");
    }

    let mut seen_ids = HashSet::new();
    for (i, def) in spec.rules.iter().enumerate() {
        let path = format!("spec.rules[{}]", i);

        if def.id.trim().is_empty() {
            result.error(format!("{}.id", path), "rule id must not be empty");
        } else if !seen_ids.insert(def.id.as_str()) {
            result.error(format!("{}.id", path), format!("duplicate rule id '{}'", def.id));
        }

        if def.message.trim().is_empty() {
            result.error(format!("{}.message", path), "message must not be empty");
        }

        if def.points == 0 {
            result.warn(
                format!("{}.points", path),
                format!("rule '{}' contributes 0 points", def.id),
            );
        }
        if def.points > spec.max_score {
            result.warn(
                format!("{}.points", path),
                format!(
                    "rule '{}' alone exceeds max_score ({} > {})",
                    def.id, def.points, spec.max_score
                ),
            );
        }

        validate_predicate(&def.when, &format!("{}.when", path), result);
    }
}

fn validate_predicate(predicate: &Predicate, path: &str, result: &mut ValidationResult) {
    match predicate {
        Predicate::Compare(cmp) => {
            if cmp.feature.parse::<Feature>().is_err() {
                let names: Vec<&str> = Feature::ALL.iter().map(|f| f.as_str()).collect();
                let message = format!("unknown feature '{}'", cmp.feature);
                match suggest_feature(&cmp.feature, &names) {
                    Some(s) => result.error_with_suggestion(format!("{}.feature", path), message, s),
                    None => result.error(format!("{}.feature", path), message),
                }
            }
            if !cmp.value.is_finite() {
                result.error(
                    format!("{}.value", path),
                    format!("comparison value must be finite, got {}", cmp.value),
                );
            }
        }
        Predicate::Compose(comp) => {
            if comp.conditions.is_empty() {
                result.error(format!("{}.conditions", path), "composition has no conditions");
            }
            if comp.operator == LogicalOperator::Not && comp.conditions.len() != 1 {
                result.error(
                    format!("{}.conditions", path),
                    format!("'not' takes exactly one condition, got {}", comp.conditions.len()),
                );
            }
            for (i, child) in comp.conditions.iter().enumerate() {
                validate_predicate(child, &format!("{}.conditions[{}]", path, i), result);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::RuleDocument;
    use crate::validation::validate_document;

    fn scoring(yaml: &str) -> ScoringConfigRule {
        serde_yaml::from_str(yaml).unwrap()
    }

    fn feature(yaml: &str) -> FeatureConfigRule {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn shipped_defaults_are_valid() {
        let f = feature(include_str!("../../../../data/rules/features/features-default.yml"));
        let s = scoring(include_str!("../../../../data/rules/scoring/scoring-default.yml"));

        let r = validate_document(&RuleDocument::FeatureConfig(f));
        assert!(r.valid, "{:?}", r.errors);
        let r = validate_document(&RuleDocument::ScoringConfig(s));
        assert!(r.valid, "{:?}", r.errors);
        assert!(r.warnings.is_empty());
    }

    #[test]
    fn unknown_feature_suggests_closest() {
        let rule = scoring(
            r#"
apiVersion: v1
kind: ScoringConfig
metadata: { id: typo, name: Typo }
spec:
  tiers: { medium: 30, high: 60 }
  rules:
    - id: structuring
      when: { feature: near_treshold_count, operator: gt, value: 5 }
      points: 40
      message: Structuring
"#,
        );
        let mut result = ValidationResult::new();
        validate_scoring_config(&rule, &mut result);

        assert!(!result.valid);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].path, "spec.rules[0].when.feature");
        assert_eq!(result.errors[0].suggestion.as_deref(), Some("near_threshold_count"));
    }

    #[test]
    fn duplicate_ids_and_empty_message() {
        let rule = scoring(
            r#"
apiVersion: v1
kind: ScoringConfig
metadata: { id: dupes, name: Dupes }
spec:
  tiers: { medium: 30, high: 60 }
  rules:
    - id: r1
      when: { feature: avg_amount, operator: gt, value: 1 }
      points: 10
      message: first
    - id: r1
      when: { feature: avg_amount, operator: gt, value: 2 }
      points: 10
      message: "  "
"#,
        );
        let mut result = ValidationResult::new();
        validate_scoring_config(&rule, &mut result);

        let paths: Vec<&str> = result.errors.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["spec.rules[1].id", "spec.rules[1].message"]);
    }

    #[test]
    fn tiers_must_ascend_and_fit_under_cap() {
        let rule = scoring(
            r#"
apiVersion: v1
kind: ScoringConfig
metadata: { id: bad-tiers, name: Bad }
spec:
  max_score: 50
  tiers: { medium: 60, high: 60 }
  rules: []
"#,
        );
        let mut result = ValidationResult::new();
        validate_scoring_config(&rule, &mut result);

        assert!(!result.valid);
        let paths: Vec<&str> = result.errors.iter().map(|e| e.path.as_str()).collect();
        assert!(paths.contains(&"spec.tiers"));
        assert!(paths.contains(&"spec.tiers.high"));
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn not_requires_single_condition() {
        let rule = scoring(
            r#"
apiVersion: v1
kind: ScoringConfig
metadata: { id: bad-not, name: Bad }
spec:
  tiers: { medium: 30, high: 60 }
  rules:
    - id: r1
      when:
        operator: not
        conditions:
          - { feature: avg_amount, operator: gt, value: 1 }
          - { feature: max_amount, operator: gt, value: 1 }
      points: 5
      message: m
    - id: r2
      when: { operator: or, conditions: [] }
      points: 5
      message: m
"#,
        );
        let mut result = ValidationResult::new();
        validate_scoring_config(&rule, &mut result);

        let paths: Vec<&str> = result.errors.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["spec.rules[0].when.conditions", "spec.rules[1].when.conditions"]);
    }

    #[test]
    fn feature_window_and_modulus_checks() {
        let rule = feature(
            r#"
apiVersion: v1
kind: FeatureConfig
metadata: { id: bad-window, name: Bad }
spec:
  currency: { minor_units: 100 }
  near_threshold: { lower: 10000, upper: 9000 }
  round_number: { modulus: 0.005 }
"#,
        );
        let mut result = ValidationResult::new();
        validate_feature_config(&rule, &mut result);

        let paths: Vec<&str> = result.errors.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["spec.near_threshold", "spec.round_number.modulus"]);
    }

    #[test]
    fn window_bounds_must_be_whole_minor_units() {
        let rule = feature(
            r#"
apiVersion: v1
kind: FeatureConfig
metadata: { id: sub-cent-window, name: Sub cent }
spec:
  near_threshold: { lower: 8999.995, upper: 10000 }
"#,
        );
        let mut result = ValidationResult::new();
        validate_feature_config(&rule, &mut result);

        assert!(!result.valid);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].path, "spec.near_threshold.lower");
        assert!(result.errors[0].message.contains("whole number of minor units"));
    }

    #[test]
    fn non_kebab_id_rejected() {
        let rule = feature(
            r#"
apiVersion: v1
kind: FeatureConfig
metadata: { id: Features_Default, name: Bad }
spec:
  near_threshold: { lower: 9000, upper: 10000 }
"#,
        );
        let mut result = ValidationResult::new();
        validate_feature_config(&rule, &mut result);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].path, "metadata.id");
    }
}
