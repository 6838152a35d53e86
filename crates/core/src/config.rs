use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_bool(profile: &str, key: &str, default: bool) -> bool {
    profiled_env_opt(profile, key)
        .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub rules: RulesConfig,
    pub output: OutputConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `TXWATCH_PROFILE`. When set (e.g. `PROD`), every
    /// key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("TXWATCH_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            rules: RulesConfig::from_env_profiled(p),
            output: OutputConfig::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!(
            "  rules:   dir={}, features={}, scoring={}",
            self.rules.rules_dir.display(),
            self.rules.feature_config_id,
            self.rules.scoring_config_id
        );
        tracing::info!("  output:  pretty={}", self.output.pretty);
    }
}

// ── Rules ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Directory scanned for rule YAML documents.
    pub rules_dir: PathBuf,
    /// `metadata.id` of the FeatureConfig document to extract with.
    pub feature_config_id: String,
    /// `metadata.id` of the ScoringConfig document to score with.
    pub scoring_config_id: String,
}

impl RulesConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            rules_dir: PathBuf::from(profiled_env_or(p, "RULES_DIR", "data/rules")),
            feature_config_id: profiled_env_or(p, "FEATURE_CONFIG_ID", "features-default"),
            scoring_config_id: profiled_env_or(p, "SCORING_CONFIG_ID", "scoring-default"),
        }
    }
}

// ── Output ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub pretty: bool,
}

impl OutputConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            pretty: profiled_env_bool(p, "OUTPUT_PRETTY", false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profiled_lookup_prefers_prefixed_key() {
        env::set_var("TXWTEST_RULES_DIR", "/etc/txwatch/rules");
        env::set_var("TXWTEST_OUTPUT_PRETTY", "yes");
        let cfg = Config::for_profile("txwtest");
        assert_eq!(cfg.profile, "TXWTEST");
        assert_eq!(cfg.rules.rules_dir, PathBuf::from("/etc/txwatch/rules"));
        assert!(cfg.output.pretty);
        env::remove_var("TXWTEST_RULES_DIR");
        env::remove_var("TXWTEST_OUTPUT_PRETTY");
    }

    #[test]
    fn default_profile_label() {
        let cfg = Config::for_profile("");
        assert_eq!(cfg.profile_label(), "default");
    }
}
