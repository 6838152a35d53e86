//! Predicate types for scoring rules: comparison leaves and boolean trees.

use serde::{Deserialize, Serialize};

/// Condition under which a scoring rule fires.
///
/// Either a single feature comparison or a nested AND/OR/NOT composition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Predicate {
    /// Compare one feature against a constant.
    Compare(Comparison),
    /// Combine other predicates.
    Compose(Composition),
}

/// A direct feature check against a threshold.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Comparison {
    /// Feature vector field name (e.g. `near_threshold_count`).
    pub feature: String,
    pub operator: ThresholdOperator,
    pub value: f64,
}

/// Boolean composition over child predicates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Composition {
    pub operator: LogicalOperator,
    pub conditions: Vec<Predicate>,
}

/// Comparison operators for feature checks.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdOperator {
    Gt,
    Gte,
    Lt,
    Lte,
    Eq,
    Neq,
}

impl ThresholdOperator {
    /// Apply the operator as `lhs <op> rhs`.
    pub fn apply(&self, lhs: f64, rhs: f64) -> bool {
        match self {
            ThresholdOperator::Gt => lhs > rhs,
            ThresholdOperator::Gte => lhs >= rhs,
            ThresholdOperator::Lt => lhs < rhs,
            ThresholdOperator::Lte => lhs <= rhs,
            ThresholdOperator::Eq => (lhs - rhs).abs() < f64::EPSILON,
            ThresholdOperator::Neq => (lhs - rhs).abs() >= f64::EPSILON,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            ThresholdOperator::Gt => ">",
            ThresholdOperator::Gte => ">=",
            ThresholdOperator::Lt => "<",
            ThresholdOperator::Lte => "<=",
            ThresholdOperator::Eq => "==",
            ThresholdOperator::Neq => "!=",
        }
    }
}

/// Logical operators for predicate composition.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LogicalOperator {
    And,
    Or,
    Not,
}

impl Predicate {
    /// Every feature name referenced anywhere in the tree, depth-first.
    pub fn feature_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_features(&mut names);
        names
    }

    fn collect_features<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Predicate::Compare(c) => out.push(c.feature.as_str()),
            Predicate::Compose(comp) => {
                for child in &comp.conditions {
                    child.collect_features(out);
                }
            }
        }
    }
}
