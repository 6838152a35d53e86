//! Filesystem rule loader with `extends` inheritance.
//!
//! Scans the rules directory for YAML documents, resolves `metadata.extends`
//! chains by deep-merging parents into children, then parses every document
//! by kind (RuleEnvelope -> RuleDocument) and validates it before indexing.

mod core;
mod error;
mod extends;


pub use self::core::RuleLoader;
pub use self::error::{LoadResult, LoadStatus, Result, RuleError};
pub use self::extends::{deep_merge, resolve_chain};
