//! Synthesized distribution buckets for chart consumers.
//!
//! Only six summary numbers are known per segment, so no true histogram is
//! possible. Instead the synthesizer fabricates six ranges directly from
//! the anchor breakpoints and assigns a fixed canonical weight to each —
//! the expected population mass between those percentile bands:
//!
//! ```text
//! 0–p10      10
//! p10–p25    15
//! p25–median 25
//! median–p75 25
//! p75–p90    15
//! p90–∞      10
//! ```

use crate::data::ReferenceDataset;
use crate::domain::{Bucket, Metric};

/// Canonical relative mass of each percentile band, in bucket order.
pub const BUCKET_WEIGHTS: [u32; 6] = [10, 15, 25, 25, 15, 10];

/// Fabricates visualization buckets from segment summary statistics.
#[derive(Debug, Clone, Copy)]
pub struct DistributionSynthesizer<'a> {
    dataset: &'a ReferenceDataset,
}

impl<'a> DistributionSynthesizer<'a> {
    pub fn new(dataset: &'a ReferenceDataset) -> Self {
        Self { dataset }
    }

    /// Six ascending buckets for a segment/metric, empty if the segment is
    /// unknown. Anchors are scaled by the metric multiplier before labels
    /// are rendered, so e.g. rent buckets sit at rent-sized boundaries.
    pub fn buckets(&self, segment: &str, metric: Metric) -> Vec<Bucket> {
        let Some(stats) = self.dataset.get(segment) else {
            return Vec::new();
        };

        let scale = metric.anchor_multiplier();
        let edges = [
            0.0,
            stats.p10 * scale,
            stats.p25 * scale,
            stats.median * scale,
            stats.p75 * scale,
            stats.p90 * scale,
        ];

        let mut out = Vec::with_capacity(BUCKET_WEIGHTS.len());
        for (i, &weight) in BUCKET_WEIGHTS.iter().enumerate() {
            let lower = edges[i];
            let upper = edges.get(i + 1).copied();
            let label = match upper {
                Some(hi) => format!("{}-{}", kilo_label(lower), kilo_label(hi)),
                None => format!("{}+", kilo_label(lower)),
            };
            out.push(Bucket {
                label,
                weight,
                lower,
                upper,
            });
        }
        out
    }
}

/// Render a boundary in rounded thousands with a `k` suffix ("23k").
fn kilo_label(value: f64) -> String {
    format!("{}k", (value / 1000.0).round() as i64)
}
