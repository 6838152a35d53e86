//! YAML DSL schema types with serde deserialization.
//!
//! Defines the type hierarchy for rule documents:
//! - `RuleEnvelope`: lightweight first-pass header (apiVersion, kind, metadata)
//! - `RuleDocument`: enum dispatching to kind-specific types
//! - `Predicate`: comparison leaves and AND/OR/NOT trees used by scoring rules

mod composition;
mod document;
mod envelope;
mod kind;
mod metadata;

pub use composition::*;
pub use document::*;
pub use envelope::*;
pub use kind::*;
pub use metadata::*;

#[cfg(test)]
mod tests;
