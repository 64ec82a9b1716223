//! Formatted terminal output: rank summaries, bucket tables, segment lists.
//!
//! All output here is deterministic (no timestamps, no map iteration order)
//! so it can be locked down with golden assertions.

use crate::data::ReferenceDataset;
use crate::domain::{Bucket, LoadReport, Query, SegmentStats};
use crate::fx::RateTable;

/// Format the rank result for one query.
///
/// Percentiles are computed unrounded and rounded here, at the display
/// boundary. Summary statistics are converted into the query's currency so
/// the user compares like with like.
pub fn format_rank_summary(
    query: &Query,
    percentile: f64,
    stats: Option<&SegmentStats>,
    rates: &RateTable,
) -> String {
    let mut out = String::new();

    out.push_str("=== finrank ===\n");
    out.push_str(&format!(
        "Your {} of {:.2} {} ranks at the {}th percentile",
        query.metric.display_name(),
        query.value,
        query.currency,
        percentile.round() as i64,
    ));

    match stats {
        Some(s) => {
            out.push_str(&format!(" in {}.\n", s.segment));
            out.push_str(&format!(
                "It exceeds an estimated {}% of the reference population.\n\n",
                percentile.round() as i64
            ));
            let scale = query.metric.anchor_multiplier();
            let mean = rates.convert(s.mean * scale, &s.currency, &query.currency);
            let median = rates.convert(s.median * scale, &s.currency, &query.currency);
            out.push_str(&format!("Reference ({}, {}):\n", s.segment, s.year));
            out.push_str(&format!("- mean  : {mean:.2} {}\n", query.currency));
            out.push_str(&format!("- median: {median:.2} {}\n", query.currency));
            out.push_str(&format!("- source: {}\n", s.source));
        }
        None => {
            out.push_str(" (no reference data for this segment; median assumed).\n");
        }
    }

    out
}

/// Format the synthesized bucket table, optionally with ascii weight bars.
pub fn format_buckets(segment: &str, metric_label: &str, buckets: &[Bucket], chart: bool) -> String {
    if buckets.is_empty() {
        return format!("No reference data for segment '{segment}'.\n");
    }

    let mut out = String::new();
    out.push_str(&format!("Distribution of {metric_label} ({segment}):\n"));

    let label_width = buckets.iter().map(|b| b.label.len()).max().unwrap_or(0);
    for bucket in buckets {
        out.push_str(&format!(
            "{:<width$}  {:>3}",
            bucket.label,
            bucket.weight,
            width = label_width
        ));
        if chart {
            out.push_str("  ");
            out.push_str(&"#".repeat(bucket.weight as usize));
        }
        out.push('\n');
    }
    out
}

/// Format the loaded segment list, in key order.
pub fn format_segments(dataset: &ReferenceDataset) -> String {
    let mut out = String::new();
    out.push_str(&format!("Loaded segments: {}\n", dataset.len()));
    for (key, s) in dataset.iter() {
        out.push_str(&format!(
            "{key:<24} {:<4} {}  median={:.2} mean={:.2}  [{}]\n",
            s.currency, s.year, s.median, s.mean, s.source
        ));
    }
    out
}

/// Format load-time rejections for operators (stderr).
pub fn format_load_report(report: &LoadReport) -> String {
    let mut out = String::new();
    for rejection in &report.rejections {
        out.push_str(&format!(
            "warning: excluded segment '{}': {}\n",
            rejection.key, rejection.reason
        ));
    }
    out
}
