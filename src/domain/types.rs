//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory by the estimator and synthesizer
//! - exported to JSON for API/chart consumers
//! - reloaded later for comparisons across reporting years

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Which financial metric a query ranks.
///
/// The reference statistics describe gross annual salary; derived metrics
/// rank against salary anchors scaled by a fixed multiplier (see
/// [`Metric::anchor_multiplier`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Salary,
    NetWorth,
    Rent,
}

impl Metric {
    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            Metric::Salary => "salary",
            Metric::NetWorth => "net worth",
            Metric::Rent => "rent",
        }
    }

    /// Factor applied to the salary anchors before ranking/bucketing this metric.
    ///
    /// - salary: the anchors themselves (1.0)
    /// - net worth: 3.0 × annual salary (typical household wealth-to-income level)
    /// - rent: 0.025 × annual salary (monthly rent at ~30% of monthly income)
    pub fn anchor_multiplier(self) -> f64 {
        match self {
            Metric::Salary => 1.0,
            Metric::NetWorth => 3.0,
            Metric::Rent => 0.025,
        }
    }
}

/// Six-statistic summary of one population segment (a country or region).
///
/// This is the whole population model: no raw samples, no parametric CDF.
/// The five percentile anchors must be strictly increasing; entries that
/// violate this are rejected at load time and never reach the estimator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentStats {
    /// Display name ("Spain", "Galicia", ...).
    pub segment: String,
    /// ISO currency code the statistics are denominated in.
    pub currency: String,
    /// Reporting year of the underlying survey.
    pub year: i32,
    pub mean: f64,
    pub median: f64,
    pub p10: f64,
    pub p25: f64,
    pub p75: f64,
    pub p90: f64,
    /// Provenance of the statistics (survey / publication name).
    pub source: String,
}

impl SegmentStats {
    /// The five interpolation anchors as `(value, percentile)` pairs.
    pub fn anchors(&self) -> [(f64, f64); 5] {
        [
            (self.p10, 10.0),
            (self.p25, 25.0),
            (self.median, 50.0),
            (self.p75, 75.0),
            (self.p90, 90.0),
        ]
    }

    /// Validate the anchor invariant: non-negative and strictly increasing.
    ///
    /// Duplicate adjacent anchors are rejected too: they would make the
    /// interpolation degenerate (zero-width band).
    pub fn validate(&self) -> Result<(), String> {
        let anchors = self.anchors();
        for (value, pct) in anchors {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("p{pct:.0} anchor is not a non-negative finite number: {value}"));
            }
        }
        for pair in anchors.windows(2) {
            let (lo, lo_pct) = pair[0];
            let (hi, hi_pct) = pair[1];
            if hi <= lo {
                return Err(format!(
                    "anchors not strictly increasing: p{lo_pct:.0}={lo} vs p{hi_pct:.0}={hi}"
                ));
            }
        }
        if !self.mean.is_finite() || self.mean < 0.0 {
            return Err(format!("mean is not a non-negative finite number: {}", self.mean));
        }
        Ok(())
    }
}

/// Ephemeral query input: a raw value, its currency, and the target segment.
///
/// Owned entirely by the caller; nothing here is persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Query {
    pub value: f64,
    pub currency: String,
    pub segment: String,
    pub metric: Metric,
}

/// One synthesized visualization range.
///
/// `label` and `weight` are the collaborator contract (chart renderers);
/// the numeric bounds are carried alongside so consumers don't have to
/// re-parse the label. `upper = None` marks the open-ended top bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bucket {
    pub label: String,
    pub weight: u32,
    pub lower: f64,
    pub upper: Option<f64>,
}

/// Configuration for dataset loading.
///
/// Whether live user submissions feed the reference dataset is an explicit
/// value handed to the loader, not module-level mutable state.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Designated reporting year when parsing tabular sources.
    pub year: i32,
    /// Include segments derived from community submissions.
    pub include_submissions: bool,
    /// Minimum submission rows per segment before its derived statistics
    /// are trusted; smaller groups are skipped.
    pub min_submissions: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            year: 2023,
            include_submissions: false,
            min_submissions: 100,
        }
    }
}

/// One load-time rejection, kept for operators.
#[derive(Debug, Clone)]
pub struct Rejection {
    pub key: String,
    pub reason: String,
}

/// Diagnostics from a dataset load: what was published, what was rejected.
///
/// Rejections are an operator concern only — `ReferenceDataset::get` simply
/// reports rejected keys as not found.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub loaded: usize,
    pub rejections: Vec<Rejection>,
}

impl LoadReport {
    pub fn reject(&mut self, key: impl Into<String>, reason: impl Into<String>) {
        self.rejections.push(Rejection {
            key: key.into(),
            reason: reason.into(),
        });
    }
}
