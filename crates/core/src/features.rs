use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::TxWatchError;

/// Fixed-shape summary of one subject's transaction history.
///
/// Amount statistics are in major currency units. Produced once per scoring
/// call and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub avg_amount: f64,
    pub std_amount: f64,
    pub max_amount: f64,
    pub min_amount: f64,
    pub near_threshold_count: u32,
    pub total_transactions: u32,
    pub transactions_per_day: f64,
    pub round_number_ratio: f64,
    pub velocity_score: f64,
}

/// Names of the feature vector fields, used by rule predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    AvgAmount,
    StdAmount,
    MaxAmount,
    MinAmount,
    NearThresholdCount,
    TotalTransactions,
    TransactionsPerDay,
    RoundNumberRatio,
    VelocityScore,
}

impl Feature {
    /// All features in vector order.
    pub const ALL: [Feature; 9] = [
        Feature::AvgAmount,
        Feature::StdAmount,
        Feature::MaxAmount,
        Feature::MinAmount,
        Feature::NearThresholdCount,
        Feature::TotalTransactions,
        Feature::TransactionsPerDay,
        Feature::RoundNumberRatio,
        Feature::VelocityScore,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Feature::AvgAmount => "avg_amount",
            Feature::StdAmount => "std_amount",
            Feature::MaxAmount => "max_amount",
            Feature::MinAmount => "min_amount",
            Feature::NearThresholdCount => "near_threshold_count",
            Feature::TotalTransactions => "total_transactions",
            Feature::TransactionsPerDay => "transactions_per_day",
            Feature::RoundNumberRatio => "round_number_ratio",
            Feature::VelocityScore => "velocity_score",
        }
    }
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Feature {
    type Err = TxWatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Feature::ALL
            .iter()
            .copied()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| TxWatchError::UnknownFeature(s.to_string()))
    }
}

impl FeatureVector {
    /// Read a feature by name. Counts are widened to `f64`.
    pub fn get(&self, feature: Feature) -> f64 {
        match feature {
            Feature::AvgAmount => self.avg_amount,
            Feature::StdAmount => self.std_amount,
            Feature::MaxAmount => self.max_amount,
            Feature::MinAmount => self.min_amount,
            Feature::NearThresholdCount => self.near_threshold_count as f64,
            Feature::TotalTransactions => self.total_transactions as f64,
            Feature::TransactionsPerDay => self.transactions_per_day,
            Feature::RoundNumberRatio => self.round_number_ratio,
            Feature::VelocityScore => self.velocity_score,
        }
    }

    /// Values in [`Feature::ALL`] order.
    pub fn to_vec(&self) -> Vec<f64> {
        Feature::ALL.iter().map(|f| self.get(*f)).collect()
    }
}
