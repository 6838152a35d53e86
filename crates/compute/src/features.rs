use std::collections::HashSet;

use chrono::NaiveDate;
use txwatch_core::{FeatureVector, Transaction};
use txwatch_rules::{CompiledFeatureConfig, StdDevMode};

use crate::error::ExtractError;

/// Amounts at or above this many minor units cannot be represented exactly.
const MAX_MINOR_UNITS: f64 = 9.0e15;

/// Reduces one subject's transaction history to a [`FeatureVector`].
///
/// Amounts are scaled to minor units once; the threshold window, the
/// round-number check and the running sums all work on the scaled values.
/// Whole-unit amounts stay exact integers, so cent amounts never pick up
/// float drift and sub-cent amounts are never rounded into the window.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureExtractor {
    config: CompiledFeatureConfig,
}

/// Raw counters accumulated over a subject's history.
struct HistoryAccumulator {
    amounts: Vec<f64>,
    sum: f64,
    min: f64,
    max: f64,
    near_threshold: u32,
    round: u32,
    dates: HashSet<NaiveDate>,
}

impl HistoryAccumulator {
    fn with_capacity(n: usize) -> Self {
        Self {
            amounts: Vec::with_capacity(n),
            sum: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            near_threshold: 0,
            round: 0,
            dates: HashSet::new(),
        }
    }

    fn push(&mut self, minor: f64, date: NaiveDate, config: &CompiledFeatureConfig) {
        self.amounts.push(minor);
        self.sum += minor;
        self.min = self.min.min(minor);
        self.max = self.max.max(minor);
        if config.is_near_threshold(minor) {
            self.near_threshold += 1;
        }
        if config.is_round(minor) {
            self.round += 1;
        }
        self.dates.insert(date);
    }
}

impl FeatureExtractor {
    pub fn new(config: CompiledFeatureConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompiledFeatureConfig {
        &self.config
    }

    /// Extract the feature vector for a non-empty history.
    ///
    /// Records are checked in order; the first record with a negative,
    /// non-finite or oversized amount, or an unparseable date, aborts
    /// extraction.
    pub fn extract(&self, transactions: &[Transaction]) -> Result<FeatureVector, ExtractError> {
        if transactions.is_empty() {
            return Err(ExtractError::EmptyHistory);
        }

        let mut acc = HistoryAccumulator::with_capacity(transactions.len());
        for (index, txn) in transactions.iter().enumerate() {
            let minor = self.amount_in_minor_units(index, txn)?;
            let date = txn.calendar_date().map_err(|_| ExtractError::InvalidDate {
                index,
                id: txn.id.clone(),
                value: txn.date.clone(),
            })?;
            acc.push(minor, date, &self.config);
        }

        Ok(self.finish(&acc))
    }

    fn amount_in_minor_units(&self, index: usize, txn: &Transaction) -> Result<f64, ExtractError> {
        let invalid = |reason: String| ExtractError::InvalidAmount {
            index,
            id: txn.id.clone(),
            reason,
        };

        if !txn.amount.is_finite() {
            return Err(invalid(format!("{} is not a finite number", txn.amount)));
        }
        if txn.amount < 0.0 {
            return Err(invalid(format!("{} is negative", txn.amount)));
        }
        let minor = self.config.to_minor(txn.amount);
        if minor >= MAX_MINOR_UNITS {
            return Err(invalid(format!("{} is too large", txn.amount)));
        }
        Ok(minor)
    }

    fn finish(&self, acc: &HistoryAccumulator) -> FeatureVector {
        let n = acc.amounts.len();
        let total = n as f64;
        let scale = self.config.minor_units_per_major as f64;

        let min_amount = acc.min / scale;
        let max_amount = acc.max / scale;
        let mean_minor = acc.sum / total;
        // Rounding in the division can drift a hair outside [min, max].
        let avg_amount = (mean_minor / scale).clamp(min_amount, max_amount);

        let std_amount = std_dev(&acc.amounts, mean_minor, self.config.std_dev) / scale;

        let distinct_days = acc.dates.len();
        let transactions_per_day = if distinct_days > 0 {
            total / distinct_days as f64
        } else {
            0.0
        };

        FeatureVector {
            avg_amount,
            std_amount,
            max_amount,
            min_amount,
            near_threshold_count: acc.near_threshold,
            total_transactions: n as u32,
            transactions_per_day,
            round_number_ratio: f64::from(acc.round) / total,
            velocity_score: transactions_per_day * avg_amount / 1000.0,
        }
    }
}

/// Standard deviation of minor-unit amounts around `mean`.
///
/// A single observation has no spread under either convention.
fn std_dev(values: &[f64], mean: f64, mode: StdDevMode) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let sum_sq: f64 = values
        .iter()
        .map(|&v| {
            let d = v - mean;
            d * d
        })
        .sum();
    let divisor = match mode {
        StdDevMode::Sample => (n - 1) as f64,
        StdDevMode::Population => n as f64,
    };
    (sum_sq / divisor).sqrt()
}

// ── Tests ───────────────────────────────────────────────────────────
