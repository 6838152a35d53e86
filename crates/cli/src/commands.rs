use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use tracing::{info, warn};

use txwatch_compute::Engine;
use txwatch_core::Config;
use txwatch_rules::loader::{LoadResult, LoadStatus};
use txwatch_rules::validation::validate_document;
use txwatch_rules::{CompiledFeatureConfig, RiskScorer, RuleLoader, StdDevMode};

use crate::cli::{AnalyzeArgs, RuleSelection, ValidateArgs};
use crate::input::read_transactions;

/// Rule selection with every field resolved against the environment config.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRules {
    pub rules_dir: PathBuf,
    pub feature_config_id: String,
    pub scoring_config_id: String,
}

impl ResolvedRules {
    pub fn resolve(selection: &RuleSelection, config: &Config) -> Self {
        Self {
            rules_dir: selection
                .rules_dir
                .clone()
                .unwrap_or_else(|| config.rules.rules_dir.clone()),
            feature_config_id: selection
                .feature_config
                .clone()
                .unwrap_or_else(|| config.rules.feature_config_id.clone()),
            scoring_config_id: selection
                .scoring_config
                .clone()
                .unwrap_or_else(|| config.rules.scoring_config_id.clone()),
        }
    }
}

/// Build an engine from a rules directory, falling back to the embedded
/// defaults when the directory does not exist.
pub fn build_engine(rules: &ResolvedRules) -> Result<Engine> {
    let mut loader = RuleLoader::new(&rules.rules_dir).with_builtin_defaults()?;

    if rules.rules_dir.is_dir() {
        let results = loader
            .load_all()
            .with_context(|| format!("failed to scan rules directory {}", rules.rules_dir.display()))?;
        let failed = results.iter().filter(|r| r.is_failed()).count();
        if failed > 0 {
            warn!(failed, "some rule documents were rejected; run `txwatch validate` for details");
        }
        return Engine::from_loader(&loader, &rules.feature_config_id, &rules.scoring_config_id)
            .context("failed to configure engine");
    }

    if rules.feature_config_id != "features-default" || rules.scoring_config_id != "scoring-default" {
        bail!(
            "rule documents '{}' / '{}' need a rules directory, but {} does not exist",
            rules.feature_config_id,
            rules.scoring_config_id,
            rules.rules_dir.display()
        );
    }
    warn!(path = %rules.rules_dir.display(), "rules directory not found; using built-in rules");
    Engine::builtin().context("built-in rules are invalid")
}

// ── analyze ─────────────────────────────────────────────────────────

pub fn analyze(args: &AnalyzeArgs, config: &Config) -> Result<ExitCode> {
    let rules = ResolvedRules::resolve(&args.rules, config);
    let engine = build_engine(&rules)?;

    let transactions = read_transactions(&args.input)?;
    info!(records = transactions.len(), input = %args.input, "transactions read");

    let (reports, metrics) = engine.analyze_batch_with_metrics(transactions);

    let pretty = args.pretty || config.output.pretty;
    let out = if pretty {
        serde_json::to_string_pretty(&reports)?
    } else {
        serde_json::to_string(&reports)?
    };
    println!("{}", out);

    if args.metrics {
        eprintln!("{}", serde_json::to_string(&metrics)?);
    }
    Ok(ExitCode::SUCCESS)
}

// ── validate ────────────────────────────────────────────────────────

pub fn validate(args: &ValidateArgs, config: &Config) -> Result<ExitCode> {
    let dir = args
        .rules_dir
        .clone()
        .unwrap_or_else(|| config.rules.rules_dir.clone());
    let (report, ok) = validate_dir(&dir)?;
    print!("{}", report);
    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Load every document under `dir` and render a per-file report.
/// Returns `false` when any document failed. Built-in documents are
/// available as `extends` parents but are not reported.
pub fn validate_dir(dir: &Path) -> Result<(String, bool)> {
    let mut loader = RuleLoader::new(dir).with_builtin_defaults()?;
    let results = loader
        .load_all()
        .with_context(|| format!("failed to scan rules directory {}", dir.display()))?;
    Ok(render_validation(&loader, &results))
}

fn render_validation(loader: &RuleLoader, results: &[LoadResult]) -> (String, bool) {
    let mut out = String::new();
    let mut loaded = 0usize;
    let mut errors = 0usize;
    let mut warnings = 0usize;

    for result in results {
        match &result.status {
            LoadStatus::Loaded { rule_id } => {
                loaded += 1;
                let _ = writeln!(out, "ok    {} ({})", result.path.display(), rule_id);
                if let Some(doc) = loader.get(rule_id) {
                    for w in validate_document(doc).warnings {
                        warnings += 1;
                        let _ = writeln!(out, "  warning: {}: {}", w.path, w.message);
                    }
                }
            }
            LoadStatus::Failed { error } => {
                errors += 1;
                let _ = writeln!(out, "FAIL  {}", result.path.display());
                let _ = writeln!(out, "  error: {}", error);
            }
            LoadStatus::Skipped { .. } => {}
        }
    }

    let _ = writeln!(
        out,
        "{} document(s) loaded, {} error(s), {} warning(s)",
        loaded,
        errors,
        warnings
    );
    (out, errors == 0)
}

// ── rules ───────────────────────────────────────────────────────────

pub fn rules(selection: &RuleSelection, config: &Config) -> Result<ExitCode> {
    let rules = ResolvedRules::resolve(selection, config);
    let engine = build_engine(&rules)?;
    print!(
        "{}",
        render_rules(&rules, engine.extractor().config(), engine.scorer())
    );
    Ok(ExitCode::SUCCESS)
}

/// Human-readable summary of the effective feature config and rule table.
pub fn render_rules(rules: &ResolvedRules, features: &CompiledFeatureConfig, scorer: &RiskScorer) -> String {
    let mut out = String::new();
    let std_mode = match features.std_dev {
        StdDevMode::Sample => "sample",
        StdDevMode::Population => "population",
    };
    let _ = writeln!(out, "features: {}", rules.feature_config_id);
    let _ = writeln!(
        out,
        "  near-threshold window  [{}, {})",
        features.to_major(features.near_threshold_lower),
        features.to_major(features.near_threshold_upper)
    );
    let _ = writeln!(out, "  round-number modulus   {}", features.to_major(features.round_modulus));
    let _ = writeln!(out, "  minor units per major  {}", features.minor_units_per_major);
    let _ = writeln!(out, "  std deviation          {}", std_mode);

    let tiers = scorer.tiers();
    let _ = writeln!(out, "scoring: {}", rules.scoring_config_id);
    let _ = writeln!(
        out,
        "  max score {}, MEDIUM >= {}, HIGH >= {}",
        scorer.max_score(),
        tiers.medium,
        tiers.high
    );

    let width = scorer.rules().iter().map(|r| r.id.len()).max().unwrap_or(0);
    for (i, rule) in scorer.rules().iter().enumerate() {
        let _ = writeln!(
            out,
            "  {:>2}. {:<width$}  +{:<3}  {}  => {}",
            i + 1,
            rule.id,
            rule.points,
            rule.predicate.describe(),
            rule.message,
            width = width
        );
    }
    out
}
