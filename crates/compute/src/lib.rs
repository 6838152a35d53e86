//! Feature extraction and per-subject analysis.
//!
//! [`FeatureExtractor`] reduces one subject's transaction history to a
//! [`FeatureVector`](txwatch_core::FeatureVector); [`Engine`] pairs it with a
//! [`RiskScorer`](txwatch_rules::RiskScorer) and fans batches out across
//! subjects with `rayon`.

pub mod engine;
pub mod error;
pub mod features;
pub mod metrics;

pub use engine::{Engine, SubjectReport};
pub use error::ExtractError;
pub use features::FeatureExtractor;
pub use metrics::BatchMetrics;
