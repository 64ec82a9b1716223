//! Segment statistics derived from community submissions.
//!
//! Live user submissions only feed the reference dataset when the loader
//! is explicitly configured to allow it (`include_submissions`), and only
//! for segments with at least `min_submissions` rows — small samples would
//! skew the anchors badly. Both knobs live on [`LoaderConfig`]; there is
//! no global mutable feature flag.
//!
//! Rows within a segment may arrive in mixed currencies; they are
//! normalized into the segment's first-seen currency before the quantiles
//! are taken.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::data::SegmentSource;
use crate::domain::{LoaderConfig, SegmentStats};
use crate::error::AppError;
use crate::fx::RateTable;

/// One anonymous submission row.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmissionRow {
    pub segment: String,
    pub currency: String,
    pub salary: f64,
}

/// Derives six-statistic entries from raw submission rows.
#[derive(Debug, Clone)]
pub struct SubmissionSource {
    rows: Vec<SubmissionRow>,
    rates: RateTable,
}

impl SubmissionSource {
    pub fn new(rows: Vec<SubmissionRow>, rates: RateTable) -> Self {
        Self { rows, rates }
    }

    /// Read rows from a JSON array file.
    pub fn from_path(path: impl AsRef<Path>, rates: RateTable) -> Result<Self, AppError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            AppError::usage(format!("Failed to read submissions file {}: {e}", path.display()))
        })?;
        let rows = serde_json::from_str(&text).map_err(|e| {
            AppError::data(format!("Failed to parse submissions file {}: {e}", path.display()))
        })?;
        Ok(Self::new(rows, rates))
    }
}

impl SegmentSource for SubmissionSource {
    fn name(&self) -> &'static str {
        "submissions"
    }

    fn load_entries(&self, config: &LoaderConfig) -> Result<BTreeMap<String, SegmentStats>, AppError> {
        if !config.include_submissions {
            return Ok(BTreeMap::new());
        }

        // Group salaries by segment, normalized into the group's currency.
        let mut groups: BTreeMap<String, (String, String, Vec<f64>)> = BTreeMap::new();
        for row in &self.rows {
            if !row.salary.is_finite() || row.salary < 0.0 {
                continue;
            }
            let key = row.segment.trim().to_lowercase();
            if key.is_empty() {
                continue;
            }
            let (_, currency, salaries) = groups
                .entry(key)
                .or_insert_with(|| (row.segment.clone(), row.currency.clone(), Vec::new()));
            salaries.push(self.rates.convert(row.salary, &row.currency, currency));
        }

        let mut out = BTreeMap::new();
        for (key, (segment, currency, mut salaries)) in groups {
            // Sample-size gate: undersized groups are skipped, not erred.
            if salaries.len() < config.min_submissions {
                continue;
            }
            salaries.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            let n = salaries.len() as f64;
            let mean = salaries.iter().sum::<f64>() / n;
            out.insert(
                key,
                SegmentStats {
                    segment,
                    currency,
                    year: config.year,
                    mean,
                    median: quantile(&salaries, 0.50),
                    p10: quantile(&salaries, 0.10),
                    p25: quantile(&salaries, 0.25),
                    p75: quantile(&salaries, 0.75),
                    p90: quantile(&salaries, 0.90),
                    source: format!("community submissions (n={})", salaries.len()),
                },
            );
        }
        Ok(out)
    }
}

/// Linearly interpolated quantile over a sorted, non-empty sample.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    let h = (sorted.len() - 1) as f64 * q;
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    let frac = h - lo as f64;
    sorted[lo] + frac * (sorted[hi] - sorted[lo])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(segment: &str, n: usize) -> Vec<SubmissionRow> {
        // Salaries 10_000, 11_000, ... — strictly increasing, so the
        // derived anchors are too.
        (0..n)
            .map(|i| SubmissionRow {
                segment: segment.to_string(),
                currency: "USD".to_string(),
                salary: 10_000.0 + 1_000.0 * i as f64,
            })
            .collect()
    }

    fn config(min: usize) -> LoaderConfig {
        LoaderConfig {
            include_submissions: true,
            min_submissions: min,
            ..LoaderConfig::default()
        }
    }

    #[test]
    fn disabled_flag_yields_no_entries() {
        let source = SubmissionSource::new(rows("berlin", 200), RateTable::default_usd());
        let entries = source
            .load_entries(&LoaderConfig {
                include_submissions: false,
                ..LoaderConfig::default()
            })
            .expect("load");
        assert!(entries.is_empty());
    }

    #[test]
    fn undersized_groups_are_gated_out() {
        let mut all = rows("berlin", 120);
        all.extend(rows("lisbon", 40));
        let source = SubmissionSource::new(all, RateTable::default_usd());

        let entries = source.load_entries(&config(100)).expect("load");
        assert!(entries.contains_key("berlin"));
        assert!(!entries.contains_key("lisbon"), "undersized group must be absent");
    }

    #[test]
    fn derived_anchors_satisfy_the_invariant() {
        let source = SubmissionSource::new(rows("berlin", 150), RateTable::default_usd());
        let entries = source.load_entries(&config(100)).expect("load");
        let stats = &entries["berlin"];
        assert!(stats.validate().is_ok(), "derived entry should be valid: {stats:?}");
        assert_eq!(stats.source, "community submissions (n=150)");
    }

    #[test]
    fn quantile_interpolates_linearly() {
        let sorted = [10.0, 20.0, 30.0, 40.0, 50.0];
        assert_eq!(quantile(&sorted, 0.0), 10.0);
        assert_eq!(quantile(&sorted, 0.5), 30.0);
        assert_eq!(quantile(&sorted, 1.0), 50.0);
        // h = 4 * 0.1 = 0.4 -> 10 + 0.4 * 10.
        assert!((quantile(&sorted, 0.10) - 14.0).abs() < 1e-12);
        assert!((quantile(&sorted, 0.25) - 20.0).abs() < 1e-12);
    }

    #[test]
    fn mixed_currencies_normalize_to_first_seen() {
        let rates = RateTable::default_usd();
        let mut all = rows("madrid", 100);
        for row in &mut all {
            row.currency = "EUR".to_string();
        }
        // Tack on USD rows; they should be converted into EUR.
        all.push(SubmissionRow {
            segment: "madrid".to_string(),
            currency: "USD".to_string(),
            salary: 109_000.0,
        });
        let source = SubmissionSource::new(all, rates.clone());

        let entries = source.load_entries(&config(100)).expect("load");
        let stats = &entries["madrid"];
        assert_eq!(stats.currency, "EUR");
        // EUR rows are 10_000..=109_000 step 1_000 (sum 5_950_000); the USD
        // row converts to 109_000 / 1.09 = 100_000 EUR.
        let converted = rates.convert(109_000.0, "USD", "EUR");
        assert!((converted - 100_000.0).abs() < 1e-6);
        let expected_mean = (5_950_000.0 + converted) / 101.0;
        assert!(
            (stats.mean - expected_mean).abs() < 1e-6,
            "expected mean {expected_mean}, got {}",
            stats.mean
        );
    }
}
