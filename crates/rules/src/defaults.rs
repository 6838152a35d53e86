//! Built-in rule documents embedded at compile time.
//!
//! These reproduce the reference heuristics (reporting window [9000, 10000),
//! round-number modulus 100, four-rule table, tiers 30/60) and are used when
//! no rules directory is configured.

use crate::evaluator::RiskScorer;
use crate::feature_config::{CompiledFeatureConfig, FeatureConfigRule};
use crate::loader::{Result, RuleError};
use crate::schema::RuleDocument;
use crate::scoring_config::ScoringConfigRule;
use crate::validation::validate_document;

/// Source of the `features-default` document.
pub const DEFAULT_FEATURE_CONFIG_YAML: &str =
    include_str!("../../../data/rules/features/features-default.yml");

/// Source of the `scoring-default` document.
pub const DEFAULT_SCORING_CONFIG_YAML: &str =
    include_str!("../../../data/rules/scoring/scoring-default.yml");

/// Parse the built-in FeatureConfig document.
pub fn default_feature_config() -> Result<FeatureConfigRule> {
    Ok(serde_yaml::from_str(DEFAULT_FEATURE_CONFIG_YAML)?)
}

/// Parse the built-in ScoringConfig document.
pub fn default_scoring_config() -> Result<ScoringConfigRule> {
    Ok(serde_yaml::from_str(DEFAULT_SCORING_CONFIG_YAML)?)
}

/// Both built-in documents, in the order a loader would index them.
pub fn builtin_documents() -> Result<Vec<RuleDocument>> {
    Ok(vec![
        RuleDocument::FeatureConfig(default_feature_config()?),
        RuleDocument::ScoringConfig(default_scoring_config()?),
    ])
}

/// Validated, compiled built-in feature config.
pub fn builtin_feature_config() -> Result<CompiledFeatureConfig> {
    let rule = default_feature_config()?;
    let validation = validate_document(&RuleDocument::FeatureConfig(rule.clone()));
    if !validation.valid {
        return Err(RuleError::Validation(validation.error_summary()));
    }
    Ok(rule.compile())
}

/// Scorer over the built-in rule table.
pub fn builtin_scorer() -> Result<RiskScorer> {
    RiskScorer::from_config(&default_scoring_config()?)
}
