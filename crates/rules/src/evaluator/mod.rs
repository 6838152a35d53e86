//! Rule-table scorer: feature vector in, bounded score, tier and flags out.
//!
//! The rule table is plain data, an ordered list of
//! (predicate, points, message) entries. Aggregation, clamping and tiering
//! live here and never change when rules are added or reweighted.

mod composition;

pub use composition::CompiledPredicate;

use tracing::debug;
use txwatch_core::{DetectionResult, FeatureVector, TriggeredRule};

use crate::loader::{Result, RuleError};
use crate::scoring_config::{ScoringConfigRule, TierCutoffs};
use crate::validation::config_checks::validate_scoring_config;
use crate::validation::ValidationResult;

// ── Rule table ──────────────────────────────────────────────────────

/// One compiled row of the rule table.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringRule {
    pub id: String,
    pub predicate: CompiledPredicate,
    pub points: u32,
    pub message: String,
}

impl ScoringRule {
    pub fn new(
        id: impl Into<String>,
        predicate: CompiledPredicate,
        points: u32,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            predicate,
            points,
            message: message.into(),
        }
    }
}

// ── Scorer ──────────────────────────────────────────────────────────

/// Evaluates every rule independently against one immutable feature vector.
///
/// Stateless after construction; safe to share across threads.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskScorer {
    rules: Vec<ScoringRule>,
    tiers: TierCutoffs,
    max_score: u32,
}

impl RiskScorer {
    pub fn new(rules: Vec<ScoringRule>, tiers: TierCutoffs, max_score: u32) -> Self {
        Self {
            rules,
            tiers,
            max_score,
        }
    }

    /// Validate and compile a ScoringConfig document.
    ///
    /// Any validation error rejects the whole document; disabled rules are
    /// dropped from the table.
    pub fn from_config(rule: &ScoringConfigRule) -> Result<Self> {
        let mut validation = ValidationResult::new();
        validate_scoring_config(rule, &mut validation);
        if !validation.valid {
            return Err(RuleError::Validation(format!(
                "scoring config '{}': {}",
                rule.metadata.id,
                validation.error_summary()
            )));
        }

        let mut rules = Vec::with_capacity(rule.spec.rules.len());
        for def in rule.spec.rules.iter().filter(|d| d.enabled) {
            let predicate = CompiledPredicate::compile(&def.when).map_err(|e| {
                RuleError::Validation(format!("rule '{}': {}", def.id, e))
            })?;
            rules.push(ScoringRule::new(
                def.id.clone(),
                predicate,
                def.points,
                def.message.clone(),
            ));
        }

        debug!(
            config_id = %rule.metadata.id,
            rules = rules.len(),
            max_score = rule.spec.max_score,
            "compiled scoring config"
        );

        Ok(Self::new(rules, rule.spec.tiers.clone(), rule.spec.max_score))
    }

    /// Append a rule at the end of the table.
    pub fn with_rule(mut self, rule: ScoringRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(&self) -> &[ScoringRule] {
        &self.rules
    }

    pub fn tiers(&self) -> &TierCutoffs {
        &self.tiers
    }

    pub fn max_score(&self) -> u32 {
        self.max_score
    }

    /// Score a feature vector.
    ///
    /// Flags keep rule-table order. Clamping caps `risk_score` only; every
    /// triggered rule is still reported.
    pub fn score(&self, features: &FeatureVector) -> DetectionResult {
        let triggered: Vec<TriggeredRule> = self
            .rules
            .iter()
            .filter(|rule| rule.predicate.holds(features))
            .map(|rule| TriggeredRule {
                rule_id: rule.id.clone(),
                points: rule.points,
                message: rule.message.clone(),
            })
            .collect();

        let raw_score = triggered
            .iter()
            .fold(0u32, |acc, t| acc.saturating_add(t.points));
        let risk_score = raw_score.min(self.max_score);
        let risk_level = self.tiers.classify(risk_score);
        let flags = triggered.iter().map(|t| t.message.clone()).collect();

        DetectionResult {
            risk_score,
            raw_score,
            risk_level,
            flags,
            triggered,
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────
