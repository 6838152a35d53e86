//! Risk scoring rule engine driven by YAML rule documents.
//!
//! This crate provides:
//! - YAML rule documents (`FeatureConfig`, `ScoringConfig`) with serde deserialization
//! - Filesystem loader with `extends` inheritance between documents
//! - Load-time validation with "did you mean" suggestions
//! - The compiled rule table and [`RiskScorer`](evaluator::RiskScorer)

pub mod defaults;
pub mod evaluator;
pub mod feature_config;
pub mod loader;
pub mod schema;
pub mod scoring_config;
pub mod validation;

pub use evaluator::{RiskScorer, ScoringRule};
pub use feature_config::{CompiledFeatureConfig, FeatureConfigRule, StdDevMode};
pub use loader::{RuleError, RuleLoader};
pub use scoring_config::ScoringConfigRule;
