use std::collections::HashMap;
use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use txwatch_core::{Analysis, SubjectId, Transaction};
use txwatch_rules::defaults::{builtin_feature_config, builtin_scorer};
use txwatch_rules::loader::Result as RuleResult;
use txwatch_rules::{CompiledFeatureConfig, RiskScorer, RuleLoader};

use crate::error::ExtractError;
use crate::features::FeatureExtractor;
use crate::metrics::BatchMetrics;

/// Outcome for one subject of a batch. Exactly one of `analysis` / `error` is set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectReport {
    pub user_id: SubjectId,
    pub transaction_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<Analysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SubjectReport {
    fn new(user_id: SubjectId, transaction_count: usize, result: Result<Analysis, ExtractError>) -> Self {
        let (analysis, error) = match result {
            Ok(a) => (Some(a), None),
            Err(e) => (None, Some(e.to_string())),
        };
        Self {
            user_id,
            transaction_count,
            analysis,
            error,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.analysis.is_some()
    }
}

/// Feature extractor and risk scorer bound to one pair of rule documents.
///
/// Immutable after construction, so one engine can serve any number of
/// concurrent callers.
#[derive(Debug, Clone)]
pub struct Engine {
    extractor: FeatureExtractor,
    scorer: RiskScorer,
}

impl Engine {
    pub fn new(features: CompiledFeatureConfig, scorer: RiskScorer) -> Self {
        Self {
            extractor: FeatureExtractor::new(features),
            scorer,
        }
    }

    /// Engine over the embedded `features-default` / `scoring-default` documents.
    pub fn builtin() -> RuleResult<Self> {
        Ok(Self::new(builtin_feature_config()?, builtin_scorer()?))
    }

    /// Engine over documents indexed by a loader.
    pub fn from_loader(loader: &RuleLoader, feature_id: &str, scoring_id: &str) -> RuleResult<Self> {
        let features = loader.feature_config(feature_id)?;
        let scorer = loader.scorer(scoring_id)?;
        info!(
            features = %feature_id,
            scoring = %scoring_id,
            rules = scorer.rules().len(),
            "engine configured"
        );
        Ok(Self::new(features, scorer))
    }

    pub fn extractor(&self) -> &FeatureExtractor {
        &self.extractor
    }

    pub fn scorer(&self) -> &RiskScorer {
        &self.scorer
    }

    /// Extract and score one subject's history.
    ///
    /// The subject id is taken from the first record.
    pub fn analyze(&self, transactions: &[Transaction]) -> Result<Analysis, ExtractError> {
        let features = self.extractor.extract(transactions)?;
        let detection = self.scorer.score(&features);
        let user_id = transactions
            .first()
            .map(|t| t.user_id.clone())
            .unwrap_or_default();

        debug!(
            user_id = %user_id,
            transactions = features.total_transactions,
            risk_score = detection.risk_score,
            risk_level = %detection.risk_level,
            flags = detection.flags.len(),
            "subject analyzed"
        );

        Ok(Analysis {
            user_id,
            features,
            detection,
        })
    }

    /// Analyze a mixed batch, one report per subject in first-seen order.
    pub fn analyze_batch(&self, transactions: Vec<Transaction>) -> Vec<SubjectReport> {
        self.analyze_batch_with_metrics(transactions).0
    }

    /// Like [`analyze_batch`](Self::analyze_batch), also returning run metrics.
    ///
    /// Subjects are analyzed in parallel; one subject's invalid history
    /// only fails its own report.
    pub fn analyze_batch_with_metrics(
        &self,
        transactions: Vec<Transaction>,
    ) -> (Vec<SubjectReport>, BatchMetrics) {
        let start = Instant::now();
        let groups = group_by_subject(transactions);

        let reports: Vec<SubjectReport> = groups
            .into_par_iter()
            .map(|(user_id, history)| {
                let result = self.analyze(&history);
                if let Err(ref e) = result {
                    warn!(user_id = %user_id, error = %e, "subject rejected");
                }
                SubjectReport::new(user_id, history.len(), result)
            })
            .collect();

        let metrics = BatchMetrics::from_reports(&reports, start.elapsed());
        info!(
            subjects = metrics.subjects,
            transactions = metrics.transactions,
            failed = metrics.failed,
            high = metrics.high,
            elapsed_ms = metrics.elapsed_ms,
            "batch analyzed"
        );
        (reports, metrics)
    }
}

/// Split records by subject, keeping first-seen subject order and input
/// order within each subject.
fn group_by_subject(transactions: Vec<Transaction>) -> Vec<(SubjectId, Vec<Transaction>)> {
    let mut index: HashMap<SubjectId, usize> = HashMap::new();
    let mut groups: Vec<(SubjectId, Vec<Transaction>)> = Vec::new();

    for txn in transactions {
        match index.get(&txn.user_id) {
            Some(&i) => groups[i].1.push(txn),
            None => {
                index.insert(txn.user_id.clone(), groups.len());
                groups.push((txn.user_id.clone(), vec![txn]));
            }
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use txwatch_core::{RiskTier, TransactionType};

    fn txn(id: &str, user: &str, amount: f64, date: &str) -> Transaction {
        Transaction {
            id: id.into(),
            user_id: user.into(),
            amount,
            date: date.into(),
            kind: TransactionType::Transfer,
            description: String::new(),
        }
    }

    #[test]
    fn group_keeps_first_seen_order() {
        let groups = group_by_subject(vec![
            txn("1", "bob", 1.0, "2024-01-01"),
            txn("2", "alice", 1.0, "2024-01-01"),
            txn("3", "bob", 2.0, "2024-01-02"),
            txn("4", "carol", 1.0, "2024-01-01"),
            txn("5", "alice", 3.0, "2024-01-03"),
        ]);
        let users: Vec<&str> = groups.iter().map(|(u, _)| u.as_str()).collect();
        assert_eq!(users, vec!["bob", "alice", "carol"]);
        let bob_ids: Vec<&str> = groups[0].1.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(bob_ids, vec!["1", "3"]);
    }

    #[test]
    fn analyze_uses_first_record_subject() {
        let engine = Engine::builtin().unwrap();
        let analysis = engine
            .analyze(&[txn("1", "user_042", 120.0, "2024-01-01")])
            .unwrap();
        assert_eq!(analysis.user_id, "user_042");
        assert_eq!(analysis.detection.risk_level, RiskTier::Low);
    }

    #[test]
    fn analyze_propagates_extract_errors() {
        let engine = Engine::builtin().unwrap();
        assert_eq!(engine.analyze(&[]), Err(ExtractError::EmptyHistory));
    }

    #[test]
    fn batch_isolates_invalid_subjects() {
        let engine = Engine::builtin().unwrap();
        let (reports, metrics) = engine.analyze_batch_with_metrics(vec![
            txn("1", "good", 100.0, "2024-01-01"),
            txn("2", "bad", 100.0, "not-a-date"),
            txn("3", "good", 150.0, "2024-01-02"),
        ]);

        assert_eq!(reports.len(), 2);
        assert!(reports[0].is_ok());
        assert_eq!(reports[0].transaction_count, 2);
        assert!(!reports[1].is_ok());
        assert!(reports[1].error.as_deref().unwrap().contains("not-a-date"));

        assert_eq!(metrics.subjects, 2);
        assert_eq!(metrics.transactions, 3);
        assert_eq!(metrics.failed, 1);
        assert_eq!(metrics.low, 1);
    }

    #[test]
    fn report_serializes_analysis_or_error() {
        let engine = Engine::builtin().unwrap();
        let reports = engine.analyze_batch(vec![
            txn("1", "ok", 100.0, "2024-01-01"),
            txn("2", "broken", -1.0, "2024-01-01"),
        ]);
        let json = serde_json::to_value(&reports).unwrap();

        assert_eq!(json[0]["user_id"], "ok");
        assert_eq!(json[0]["analysis"]["detection"]["risk_level"], "LOW");
        assert!(json[0].get("error").is_none());

        assert!(json[1].get("analysis").is_none());
        assert!(json[1]["error"].as_str().unwrap().contains("negative"));
    }

    #[test]
    fn empty_batch_is_empty() {
        let engine = Engine::builtin().unwrap();
        assert!(engine.analyze_batch(Vec::new()).is_empty());
    }
}
