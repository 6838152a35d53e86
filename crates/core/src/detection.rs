use serde::{Deserialize, Serialize};

use crate::features::FeatureVector;
use crate::transaction::SubjectId;

/// Discrete risk category derived from the clamped score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskTier::Low => write!(f, "LOW"),
            RiskTier::Medium => write!(f, "MEDIUM"),
            RiskTier::High => write!(f, "HIGH"),
        }
    }
}

/// A scoring rule whose predicate held.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggeredRule {
    pub rule_id: String,
    pub points: u32,
    pub message: String,
}

/// Outcome of scoring one feature vector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionResult {
    /// Clamped to the configured maximum (100 by default).
    pub risk_score: u32,
    /// Sum of triggered points before clamping.
    pub raw_score: u32,
    pub risk_level: RiskTier,
    /// Messages of triggered rules, in rule-table order.
    pub flags: Vec<String>,
    pub triggered: Vec<TriggeredRule>,
}

/// Features and detection result for one subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub user_id: SubjectId,
    pub features: FeatureVector,
    pub detection: DetectionResult,
}
