//! Multi-kind rule document container and accessors.

use super::{CommonMetadata, RuleKind};
use crate::feature_config::FeatureConfigRule;
use crate::scoring_config::ScoringConfigRule;

/// A fully deserialized rule document of any supported kind.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleDocument {
    /// Feature config -- currency scale, threshold window, round-number modulus.
    FeatureConfig(FeatureConfigRule),
    /// Scoring config -- rule table and tier cutoffs.
    ScoringConfig(ScoringConfigRule),
}

impl RuleDocument {
    /// Deserialize YAML text as the given kind.
    pub fn from_yaml_as(kind: RuleKind, yaml: &str) -> std::result::Result<Self, String> {
        match kind {
            RuleKind::FeatureConfig => serde_yaml::from_str::<FeatureConfigRule>(yaml)
                .map(RuleDocument::FeatureConfig)
                .map_err(|e| e.to_string()),
            RuleKind::ScoringConfig => serde_yaml::from_str::<ScoringConfigRule>(yaml)
                .map(RuleDocument::ScoringConfig)
                .map_err(|e| e.to_string()),
        }
    }

    /// Get the document's metadata regardless of kind.
    pub fn metadata(&self) -> &CommonMetadata {
        match self {
            RuleDocument::FeatureConfig(rule) => &rule.metadata,
            RuleDocument::ScoringConfig(rule) => &rule.metadata,
        }
    }

    /// Get the rule kind.
    pub fn kind(&self) -> RuleKind {
        match self {
            RuleDocument::FeatureConfig(_) => RuleKind::FeatureConfig,
            RuleDocument::ScoringConfig(_) => RuleKind::ScoringConfig,
        }
    }

    /// Try to extract as a `FeatureConfigRule` reference.
    pub fn as_feature_config(&self) -> Option<&FeatureConfigRule> {
        match self {
            RuleDocument::FeatureConfig(rule) => Some(rule),
            _ => None,
        }
    }

    /// Try to extract as a `ScoringConfigRule` reference.
    pub fn as_scoring_config(&self) -> Option<&ScoringConfigRule> {
        match self {
            RuleDocument::ScoringConfig(rule) => Some(rule),
            _ => None,
        }
    }
}
