//! Rule validation with structured errors and suggestions.
//!
//! Validates FeatureConfig and ScoringConfig documents at load time so that a
//! malformed rule table is rejected before any transaction is scored.
//! Returns a [`ValidationResult`] with errors (block loading) and warnings (advisory).

pub(crate) mod config_checks;

pub(crate) mod fuzzy;

use crate::schema::*;
use serde::{Deserialize, Serialize};

// ── Result types ────────────────────────────────────────────────────

/// Overall validation outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

/// A blocking validation error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationError {
    /// JSON-path-like location, e.g. `"spec.rules[0].when.feature"`.
    pub path: String,
    pub message: String,
    /// Optional "Did you mean …?" suggestion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// A non-blocking advisory warning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationResult {
    pub(crate) fn new() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub(crate) fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.valid = false;
        self.errors.push(ValidationError {
            path: path.into(),
            message: message.into(),
            suggestion: None,
        });
    }

    pub(crate) fn error_with_suggestion(
        &mut self,
        path: impl Into<String>,
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) {
        self.valid = false;
        self.errors.push(ValidationError {
            path: path.into(),
            message: message.into(),
            suggestion: Some(suggestion.into()),
        });
    }

    pub(crate) fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ValidationWarning {
            path: path.into(),
            message: message.into(),
        });
    }

    /// Join all errors into one line, for embedding in a [`RuleError`](crate::loader::RuleError).
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| match &e.suggestion {
                Some(s) => format!("{}: {} (did you mean '{}'?)", e.path, e.message, s),
                None => format!("{}: {}", e.path, e.message),
            })
            .collect::<Vec<_>>()
            .join("; ")
    }
}

// ── Public API ──────────────────────────────────────────────────────

/// Validate any [`RuleDocument`] variant, dispatching to the appropriate validator.
pub fn validate_document(doc: &RuleDocument) -> ValidationResult {
    let mut result = ValidationResult::new();
    match doc {
        RuleDocument::FeatureConfig(rule) => {
            config_checks::validate_feature_config(rule, &mut result);
        }
        RuleDocument::ScoringConfig(rule) => {
            config_checks::validate_scoring_config(rule, &mut result);
        }
    }
    result
}

/// Parse raw YAML of any kind and validate. Parse errors are reported as validation errors.
pub fn validate_yaml(yaml: &str) -> ValidationResult {
    let parsed = serde_yaml::from_str::<RuleEnvelope>(yaml)
        .map_err(|e| format!("YAML parse error: {e}"))
        .and_then(|envelope| envelope.parse_full());
    match parsed {
        Ok(doc) => validate_document(&doc),
        Err(e) => {
            let mut result = ValidationResult::new();
            result.error("", e);
            result
        }
    }
}
