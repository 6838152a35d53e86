//! Predicate trees compiled against the typed feature vector.
//!
//! Leaves compare one named feature against a constant; interior nodes
//! combine children with AND, OR, or NOT.

use txwatch_core::{Feature, FeatureVector};

use crate::schema::{LogicalOperator, Predicate, ThresholdOperator};

/// A [`Predicate`] with feature names resolved to [`Feature`] variants.
#[derive(Debug, Clone, PartialEq)]
pub enum CompiledPredicate {
    Compare {
        feature: Feature,
        operator: ThresholdOperator,
        value: f64,
    },
    All(Vec<CompiledPredicate>),
    Any(Vec<CompiledPredicate>),
    Not(Box<CompiledPredicate>),
}

impl CompiledPredicate {
    /// Shorthand for a single comparison leaf.
    pub fn compare(feature: Feature, operator: ThresholdOperator, value: f64) -> Self {
        CompiledPredicate::Compare {
            feature,
            operator,
            value,
        }
    }

    /// Resolve feature names. Fails on the first unknown feature or a
    /// `not` node without exactly one child.
    pub fn compile(predicate: &Predicate) -> Result<Self, String> {
        match predicate {
            Predicate::Compare(cmp) => {
                let feature = cmp.feature.parse::<Feature>().map_err(|e| e.to_string())?;
                Ok(CompiledPredicate::compare(feature, cmp.operator, cmp.value))
            }
            Predicate::Compose(comp) => {
                let children = comp
                    .conditions
                    .iter()
                    .map(CompiledPredicate::compile)
                    .collect::<Result<Vec<_>, _>>()?;
                match comp.operator {
                    LogicalOperator::And => Ok(CompiledPredicate::All(children)),
                    LogicalOperator::Or => Ok(CompiledPredicate::Any(children)),
                    LogicalOperator::Not => {
                        let mut children = children;
                        if children.len() != 1 {
                            return Err(format!(
                                "'not' takes exactly one condition, got {}",
                                children.len()
                            ));
                        }
                        Ok(CompiledPredicate::Not(Box::new(children.remove(0))))
                    }
                }
            }
        }
    }

    /// Evaluate against a feature vector.
    pub fn holds(&self, features: &FeatureVector) -> bool {
        match self {
            CompiledPredicate::Compare {
                feature,
                operator,
                value,
            } => operator.apply(features.get(*feature), *value),
            CompiledPredicate::All(children) => children.iter().all(|c| c.holds(features)),
            CompiledPredicate::Any(children) => children.iter().any(|c| c.holds(features)),
            CompiledPredicate::Not(inner) => !inner.holds(features),
        }
    }

    /// Human-readable form, e.g. `near_threshold_count > 5`.
    pub fn describe(&self) -> String {
        match self {
            CompiledPredicate::Compare {
                feature,
                operator,
                value,
            } => format!("{} {} {}", feature, operator.symbol(), value),
            CompiledPredicate::All(children) => join_described(children, " AND "),
            CompiledPredicate::Any(children) => join_described(children, " OR "),
            CompiledPredicate::Not(inner) => format!("NOT ({})", inner.describe()),
        }
    }
}

/// Describe children, parenthesizing nested AND/OR groups.
fn join_described(children: &[CompiledPredicate], sep: &str) -> String {
    children
        .iter()
        .map(|c| match c {
            CompiledPredicate::All(_) | CompiledPredicate::Any(_) => format!("({})", c.describe()),
            _ => c.describe(),
        })
        .collect::<Vec<_>>()
        .join(sep)
}

// ── Tests ───────────────────────────────────────────────────────────
