//! Rule kind enum for two-pass deserialization dispatch.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported rule kinds for two-pass deserialization dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleKind {
    FeatureConfig,
    ScoringConfig,
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleKind::FeatureConfig => write!(f, "FeatureConfig"),
            RuleKind::ScoringConfig => write!(f, "ScoringConfig"),
        }
    }
}

impl FromStr for RuleKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "FeatureConfig" => Ok(RuleKind::FeatureConfig),
            "ScoringConfig" => Ok(RuleKind::ScoringConfig),
            other => Err(format!("unknown rule kind: '{}'", other)),
        }
    }
}
