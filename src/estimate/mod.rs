//! Percentile estimation against six-statistic reference populations.
//!
//! The population model is shape-free: five known `(value, percentile)`
//! anchors — (p10, 10), (p25, 25), (median, 50), (p75, 75), (p90, 90) —
//! and piecewise-linear interpolation between them. Above p90 the estimate
//! extrapolates with a fixed rule and hard-caps at 99: the reference data
//! has no true maximum, so the model never asserts a literal 100th
//! percentile.
//!
//! Everything here is pure over the immutable dataset and rate table, so
//! concurrent callers need no locking.

use crate::data::ReferenceDataset;
use crate::domain::{Metric, Query, SegmentStats};
use crate::fx::RateTable;

/// Percentile reported when the requested segment has no entry.
///
/// The ranking UI must always render something, so an unknown segment
/// degrades to the median rather than erroring.
pub const FALLBACK_PERCENTILE: f64 = 50.0;

/// Every additional `p90 * EXTRAPOLATION_BAND` above p90 adds 10 percentile
/// points, capped at 99.
const EXTRAPOLATION_BAND: f64 = 0.2;

/// Maps raw values to estimated percentile ranks.
#[derive(Debug, Clone, Copy)]
pub struct PercentileEstimator<'a> {
    dataset: &'a ReferenceDataset,
    rates: &'a RateTable,
}

impl<'a> PercentileEstimator<'a> {
    pub fn new(dataset: &'a ReferenceDataset, rates: &'a RateTable) -> Self {
        Self { dataset, rates }
    }

    /// Estimate the percentile of `value` (in `currency`) within `segment`.
    ///
    /// Result is in `[0, 99]`, unrounded; callers round for display.
    /// Unknown segments return [`FALLBACK_PERCENTILE`].
    pub fn estimate(&self, value: f64, currency: &str, segment: &str) -> f64 {
        self.estimate_metric(value, currency, segment, Metric::Salary)
    }

    /// Estimate a full [`Query`], scaling anchors for derived metrics.
    pub fn estimate_query(&self, query: &Query) -> f64 {
        self.estimate_metric(query.value, &query.currency, &query.segment, query.metric)
    }

    fn estimate_metric(&self, value: f64, currency: &str, segment: &str, metric: Metric) -> f64 {
        let Some(stats) = self.dataset.get(segment) else {
            return FALLBACK_PERCENTILE;
        };
        let local_value = self.rates.convert(value, currency, &stats.currency);
        rank_in_segment(stats, local_value, metric.anchor_multiplier())
    }
}

/// Rank a value (already in the segment's currency) against scaled anchors.
///
/// Exposed for callers that already hold a [`SegmentStats`], e.g. the
/// distribution synthesizer's tests and future raw-sample backends.
pub fn rank_in_segment(stats: &SegmentStats, value: f64, anchor_scale: f64) -> f64 {
    let mut anchors = stats.anchors();
    for (x, _) in &mut anchors {
        *x *= anchor_scale;
    }
    rank_on_anchors(&anchors, value).clamp(0.0, 99.0)
}

/// Piecewise-linear interpolation over the anchor polyline.
fn rank_on_anchors(anchors: &[(f64, f64); 5], value: f64) -> f64 {
    let (p10, p10_pct) = anchors[0];
    if value <= p10 {
        return p10_pct;
    }

    for pair in anchors.windows(2) {
        let (x0, y0) = pair[0];
        let (x1, y1) = pair[1];
        if value <= x1 {
            // Duplicate adjacent anchors are a data defect the loader
            // rejects; snap to the lower percentile instead of dividing
            // by zero if such an entry is constructed directly.
            if x1 == x0 {
                return y0;
            }
            return y0 + (value - x0) / (x1 - x0) * (y1 - y0);
        }
    }

    let (p90, p90_pct) = anchors[4];
    let headroom = p90 * EXTRAPOLATION_BAND;
    if headroom <= 0.0 {
        return p90_pct;
    }
    (p90_pct + (value - p90) / headroom * 10.0).min(99.0)
}
