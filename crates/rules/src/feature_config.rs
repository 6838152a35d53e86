//! FeatureConfig rule kind: currency scale, near-threshold reporting window,
//! round-number modulus, and dispersion convention for feature extraction.

use serde::{Deserialize, Serialize};

use crate::schema::CommonMetadata;

// ── YAML-level types ────────────────────────────────────────────────

/// Top-level FeatureConfig rule document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FeatureConfigRule {
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    pub kind: String,
    pub metadata: CommonMetadata,
    pub spec: FeatureConfigSpec,
}

/// Specification section of a FeatureConfig rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FeatureConfigSpec {
    #[serde(default)]
    pub currency: CurrencyScale,
    /// Half-open `[lower, upper)` window just under the reporting limit.
    pub near_threshold: ThresholdWindow,
    #[serde(default)]
    pub round_number: RoundNumber,
    #[serde(default)]
    pub std_dev: StdDevMode,
}

/// How many minor units (cents) make one major unit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CurrencyScale {
    pub minor_units: u32,
}

impl Default for CurrencyScale {
    fn default() -> Self {
        Self { minor_units: 100 }
    }
}

/// Amount window in major units.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ThresholdWindow {
    pub lower: f64,
    pub upper: f64,
}

/// An amount is "round" when it is an exact multiple of `modulus` major units.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RoundNumber {
    pub modulus: f64,
}

impl Default for RoundNumber {
    fn default() -> Self {
        Self { modulus: 100.0 }
    }
}

/// Standard deviation convention for `std_amount`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StdDevMode {
    /// Divide by `n - 1`.
    #[default]
    Sample,
    /// Divide by `n`.
    Population,
}

// ── Compiled (hot-path) types ───────────────────────────────────────

/// Relative tolerance, in multiples of machine epsilon, under which a scaled
/// amount is treated as a whole number of minor units.
const SNAP_ULPS: f64 = 4.0;

/// Pre-compiled feature config with every amount bound expressed in
/// integer minor units.
///
/// Amounts are scaled with [`to_minor`](Self::to_minor) before any check.
/// Float noise from decimal representation is snapped to the nearest whole
/// minor unit; real sub-unit precision (e.g. `9999.999` in cents) is kept,
/// so the window compares the exact value and such an amount is never round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledFeatureConfig {
    pub minor_units_per_major: i64,
    /// Inclusive lower bound of the near-threshold window, minor units.
    pub near_threshold_lower: i64,
    /// Exclusive upper bound of the near-threshold window, minor units.
    pub near_threshold_upper: i64,
    /// Round-number modulus in minor units.
    pub round_modulus: i64,
    pub std_dev: StdDevMode,
}

impl CompiledFeatureConfig {
    /// Scale a major-unit amount to minor units.
    ///
    /// Returns a whole number when the amount is a whole number of minor
    /// units up to a few ulps of representation error.
    pub fn to_minor(&self, amount: f64) -> f64 {
        let scaled = amount * self.minor_units_per_major as f64;
        let whole = scaled.round();
        if (scaled - whole).abs() <= scaled.abs() * SNAP_ULPS * f64::EPSILON {
            whole
        } else {
            scaled
        }
    }

    /// Convert minor units back to major units.
    pub fn to_major(&self, minor: i64) -> f64 {
        minor as f64 / self.minor_units_per_major as f64
    }

    pub fn is_near_threshold(&self, minor: f64) -> bool {
        minor >= self.near_threshold_lower as f64 && minor < self.near_threshold_upper as f64
    }

    /// Only whole minor-unit amounts can be exact multiples of the modulus.
    pub fn is_round(&self, minor: f64) -> bool {
        self.round_modulus > 0 && minor.fract() == 0.0 && (minor as i64) % self.round_modulus == 0
    }
}

impl FeatureConfigRule {
    /// Compile the YAML config into minor-unit bounds.
    ///
    /// Assumes the document passed validation; a zero currency scale is
    /// treated as 1 so conversion never divides by zero.
    pub fn compile(&self) -> CompiledFeatureConfig {
        let minor_units_per_major = i64::from(self.spec.currency.minor_units.max(1));
        let scale = minor_units_per_major as f64;
        let to_minor = |v: f64| (v * scale).round() as i64;

        CompiledFeatureConfig {
            minor_units_per_major,
            near_threshold_lower: to_minor(self.spec.near_threshold.lower),
            near_threshold_upper: to_minor(self.spec.near_threshold.upper),
            round_modulus: to_minor(self.spec.round_number.modulus),
            std_dev: self.spec.std_dev,
        }
    }
}
