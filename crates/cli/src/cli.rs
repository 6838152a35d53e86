use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Transaction-history risk scoring.
///
/// Reduces each account holder's transactions to a feature vector and scores
/// it against a YAML rule table. Reports go to stdout as JSON; logs go to
/// stderr (set `RUST_LOG` to change verbosity).
#[derive(Parser, Debug)]
#[command(name = "txwatch", version, about = "Score transaction histories for structuring and velocity risk")]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze a JSON array of transactions, one report per subject.
    Analyze(AnalyzeArgs),
    /// Load and validate every rule document in a directory.
    Validate(ValidateArgs),
    /// Print the effective feature config and rule table.
    Rules(RuleSelection),
}

/// Which rule documents to use. Unset fields fall back to the environment.
#[derive(Args, Debug, Clone, Default)]
pub struct RuleSelection {
    /// Directory of rule YAML files (env: RULES_DIR, default data/rules)
    #[arg(long)]
    pub rules_dir: Option<PathBuf>,

    /// FeatureConfig document id (env: FEATURE_CONFIG_ID)
    #[arg(long = "features")]
    pub feature_config: Option<String>,

    /// ScoringConfig document id (env: SCORING_CONFIG_ID)
    #[arg(long = "scoring")]
    pub scoring_config: Option<String>,
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Input file, or `-` for stdin
    #[arg(long, short, env = "TXWATCH_INPUT", default_value = "-")]
    pub input: String,

    #[command(flatten)]
    pub rules: RuleSelection,

    /// Pretty-print the JSON output (env: OUTPUT_PRETTY)
    #[arg(long)]
    pub pretty: bool,

    /// Also print batch metrics as JSON on stderr
    #[arg(long)]
    pub metrics: bool,
}

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Directory of rule YAML files (env: RULES_DIR, default data/rules)
    #[arg(long)]
    pub rules_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_analyze_with_overrides() {
        let args = CliArgs::try_parse_from([
            "txwatch",
            "analyze",
            "--input",
            "txns.json",
            "--rules-dir",
            "rules",
            "--scoring",
            "scoring-strict",
            "--pretty",
        ])
        .unwrap();

        match args.command {
            Command::Analyze(a) => {
                assert_eq!(a.input, "txns.json");
                assert_eq!(a.rules.rules_dir, Some(PathBuf::from("rules")));
                assert_eq!(a.rules.scoring_config.as_deref(), Some("scoring-strict"));
                assert!(a.rules.feature_config.is_none());
                assert!(a.pretty);
                assert!(!a.metrics);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn parse_rules_defaults() {
        let args = CliArgs::try_parse_from(["txwatch", "rules"]).unwrap();
        match args.command {
            Command::Rules(sel) => {
                assert!(sel.rules_dir.is_none());
                assert!(sel.scoring_config.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn subcommand_required() {
        assert!(CliArgs::try_parse_from(["txwatch"]).is_err());
    }
}
