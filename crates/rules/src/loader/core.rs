//! Core [`RuleLoader`] struct: filesystem-backed rule loading with `extends` resolution.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::defaults::{DEFAULT_FEATURE_CONFIG_YAML, DEFAULT_SCORING_CONFIG_YAML};
use crate::evaluator::RiskScorer;
use crate::feature_config::CompiledFeatureConfig;
use crate::schema::{RuleDocument, RuleEnvelope, RuleKind};
use crate::validation::validate_document;

use super::error::{LoadResult, LoadStatus, Result, RuleError};
use super::extends::resolve_chain;

/// Filesystem-backed rule loader.
///
/// Scans a directory (recursively) for `*.yml` / `*.yaml` files, resolves
/// `metadata.extends` chains, deserializes each document into a
/// [`RuleDocument`] via two-pass deserialization and validates it. Only
/// documents that pass validation are indexed.
pub struct RuleLoader {
    /// Root directory containing rule YAML files.
    rules_dir: PathBuf,
    /// Validated documents keyed by `metadata.id`.
    documents: HashMap<String, RuleDocument>,
    /// Raw built-in documents available as `extends` parents and fallbacks.
    builtins: HashMap<String, serde_yaml::Value>,
}

impl RuleLoader {
    /// Create a new loader for the given directory. Nothing is read until
    /// [`load_all`](Self::load_all).
    pub fn new(rules_dir: impl Into<PathBuf>) -> Self {
        Self {
            rules_dir: rules_dir.into(),
            documents: HashMap::new(),
            builtins: HashMap::new(),
        }
    }

    /// Register the built-in `features-default` / `scoring-default` documents.
    ///
    /// They are indexed on the next [`load_all`](Self::load_all) and can be
    /// extended by files on disk. A file with the same ID replaces them.
    pub fn with_builtin_defaults(mut self) -> Result<Self> {
        for source in [DEFAULT_FEATURE_CONFIG_YAML, DEFAULT_SCORING_CONFIG_YAML] {
            let raw: serde_yaml::Value = serde_yaml::from_str(source)?;
            let id = raw_id(&raw)
                .ok_or_else(|| RuleError::Validation("built-in document has no metadata.id".into()))?;
            self.builtins.insert(id, raw);
        }
        Ok(self)
    }

    /// Recursively scan the rules directory and load all YAML files.
    ///
    /// Dotfiles and non-YAML files are skipped. Parse, inheritance and
    /// validation errors, and unreadable subdirectories, are reported per
    /// path and do not abort the scan; a failed file is never indexed.
    /// Returns an error only if the rules directory itself cannot be read.
    pub fn load_all(&mut self) -> Result<Vec<LoadResult>> {
        let mut results = Vec::new();
        let mut files = Vec::new();
        scan_dir_recursive(&self.rules_dir, &mut files, &mut results)?;

        // Pass 1: raw YAML values keyed by id, so children can find parents.
        let mut raw_values = self.builtins.clone();
        let mut sources: Vec<(String, PathBuf)> = Vec::new();
        for path in files {
            match read_raw(&path) {
                Ok(raw) => match raw_id(&raw) {
                    Some(id) if sources.iter().any(|(seen, _)| *seen == id) => {
                        results.push(failed(path, format!("duplicate document id '{}'", id)));
                    }
                    Some(id) => {
                        raw_values.insert(id.clone(), raw);
                        sources.push((id, path));
                    }
                    None => results.push(failed(path, "rule metadata.id must not be empty".into())),
                },
                Err(e) => results.push(failed(path, e.to_string())),
            }
        }

        // Pass 2: resolve inheritance, parse by kind, validate.
        self.documents.clear();
        for (id, raw) in &self.builtins {
            if sources.iter().any(|(seen, _)| seen == id) {
                continue;
            }
            match parse_and_validate(raw) {
                Ok(doc) => {
                    debug!(rule_id = %id, "indexed built-in rule");
                    self.documents.insert(id.clone(), doc);
                }
                Err(e) => warn!(rule_id = %id, error = %e, "built-in rule rejected"),
            }
        }

        for (id, path) in sources {
            let outcome = resolve_chain(&id, &raw_values)
                .map_err(RuleError::Validation)
                .and_then(|merged| parse_and_validate(&merged));
            match outcome {
                Ok(doc) => {
                    info!(rule_id = %id, kind = %doc.kind(), path = %path.display(), "loaded rule");
                    self.documents.insert(id.clone(), doc);
                    results.push(LoadResult {
                        path,
                        status: LoadStatus::Loaded { rule_id: id },
                    });
                }
                Err(e) => {
                    warn!(rule_id = %id, path = %path.display(), error = %e, "failed to load rule file");
                    results.push(failed(path, e.to_string()));
                }
            }
        }

        Ok(results)
    }

    /// Parse and validate a single YAML file without `extends` resolution.
    pub fn load_file(&self, path: &Path) -> Result<RuleDocument> {
        let raw = read_raw(path)?;
        if raw_id(&raw).is_none() {
            return Err(RuleError::Validation(
                "rule metadata.id must not be empty".to_string(),
            ));
        }
        parse_and_validate(&raw)
    }

    /// Get the rules directory path.
    pub fn rules_dir(&self) -> &Path {
        &self.rules_dir
    }

    /// All indexed documents.
    pub fn documents(&self) -> &HashMap<String, RuleDocument> {
        &self.documents
    }

    /// Indexed document IDs, sorted.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.documents.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn get(&self, id: &str) -> Option<&RuleDocument> {
        self.documents.get(id)
    }

    /// Compiled FeatureConfig by ID. Disabled documents are refused.
    pub fn feature_config(&self, id: &str) -> Result<CompiledFeatureConfig> {
        let rule = self
            .get(id)
            .and_then(RuleDocument::as_feature_config)
            .ok_or_else(|| not_found(id, RuleKind::FeatureConfig))?;
        ensure_enabled(id, rule.metadata.enabled, RuleKind::FeatureConfig)?;
        Ok(rule.compile())
    }

    /// Scorer compiled from a ScoringConfig by ID. Disabled documents are refused.
    pub fn scorer(&self, id: &str) -> Result<RiskScorer> {
        let rule = self
            .get(id)
            .and_then(RuleDocument::as_scoring_config)
            .ok_or_else(|| not_found(id, RuleKind::ScoringConfig))?;
        ensure_enabled(id, rule.metadata.enabled, RuleKind::ScoringConfig)?;
        RiskScorer::from_config(rule)
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

/// Recursively collect YAML files under `dir`, sorted by path.
fn scan_dir_recursive(dir: &Path, files: &mut Vec<PathBuf>, results: &mut Vec<LoadResult>) -> Result<()> {
    let mut entries = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort();

    for path in entries {
        // Skip dotfiles/dotdirs
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if name.starts_with('.') {
                if path.is_file() {
                    results.push(LoadResult {
                        path,
                        status: LoadStatus::Skipped {
                            reason: "dotfile".to_string(),
                        },
                    });
                }
                continue;
            }
        }

        if path.is_dir() {
            if let Err(e) = scan_dir_recursive(&path, files, results) {
                warn!(path = %path.display(), error = %e, "failed to read directory");
                results.push(failed(path, format!("failed to read directory: {}", e)));
            }
            continue;
        }

        let is_yaml = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e == "yml" || e == "yaml")
            .unwrap_or(false);

        if is_yaml {
            files.push(path);
        } else {
            results.push(LoadResult {
                path,
                status: LoadStatus::Skipped {
                    reason: "not a YAML file".to_string(),
                },
            });
        }
    }

    Ok(())
}

fn read_raw(path: &Path) -> Result<serde_yaml::Value> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&contents)?)
}

fn raw_id(raw: &serde_yaml::Value) -> Option<String> {
    raw.get("metadata")
        .and_then(|meta| meta.get("id"))
        .and_then(|v| v.as_str())
        .filter(|id| !id.is_empty())
        .map(|id| id.to_string())
}

/// Two-pass deserialization followed by document validation.
fn parse_and_validate(raw: &serde_yaml::Value) -> Result<RuleDocument> {
    // First pass: envelope (kind + metadata).
    let envelope: RuleEnvelope = serde_yaml::from_value(raw.clone())?;

    // Second pass: kind-specific type.
    let doc = envelope.parse_full().map_err(|e| {
        RuleError::Validation(format!("failed to parse rule '{}': {}", envelope.metadata.id, e))
    })?;

    let validation = validate_document(&doc);
    for w in &validation.warnings {
        debug!(rule_id = %envelope.metadata.id, path = %w.path, warning = %w.message, "rule warning");
    }
    if !validation.valid {
        return Err(RuleError::Validation(format!(
            "rule '{}': {}",
            envelope.metadata.id,
            validation.error_summary()
        )));
    }
    Ok(doc)
}

fn failed(path: PathBuf, error: String) -> LoadResult {
    LoadResult {
        path,
        status: LoadStatus::Failed { error },
    }
}

fn ensure_enabled(id: &str, enabled: bool, kind: RuleKind) -> Result<()> {
    if enabled {
        Ok(())
    } else {
        Err(RuleError::Disabled(format!("{} document '{}' has enabled: false", kind, id)))
    }
}

fn not_found(id: &str, kind: RuleKind) -> RuleError {
    RuleError::NotFound(format!("no {} document with id '{}'", kind, id))
}
