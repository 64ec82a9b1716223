//! Reference dataset assembly and publication.
//!
//! Loading is build-then-publish: every source is drained and validated
//! into a complete map before a [`ReferenceDataset`] is constructed, so
//! concurrent readers never observe a partially populated dataset. After
//! construction the dataset is immutable and freely shareable across
//! threads.

use std::collections::BTreeMap;

use crate::domain::{LoadReport, LoaderConfig, SegmentStats};
use crate::error::AppError;

pub mod countries;
pub mod ine;
pub mod submissions;

pub use countries::StaticCountrySource;
pub use ine::IneTableSource;
pub use submissions::SubmissionSource;

/// A provider of segment statistics.
///
/// One capability, several implementations (static country constants,
/// parsed regional tables, derived community statistics) — composed by
/// [`ReferenceDataset::load`] rather than special-cased.
pub trait SegmentSource {
    /// Short name for load diagnostics.
    fn name(&self) -> &'static str;

    /// Produce candidate entries keyed by normalized segment key.
    ///
    /// Entries returned here are candidates only: the integrity gate in
    /// [`ReferenceDataset::load`] still applies.
    fn load_entries(&self, config: &LoaderConfig) -> Result<BTreeMap<String, SegmentStats>, AppError>;
}

/// Immutable mapping from segment key to summary statistics.
#[derive(Debug, Clone, Default)]
pub struct ReferenceDataset {
    entries: BTreeMap<String, SegmentStats>,
}

impl ReferenceDataset {
    /// Drain all sources, validate, and publish a complete dataset.
    ///
    /// Sources are merged in order; a later source never overwrites a key
    /// an earlier source already claimed. Entries violating the anchor
    /// invariant are excluded and recorded in the [`LoadReport`] — they
    /// must never reach the estimator. A failing source (I/O, parse)
    /// aborts the whole load: a half-loaded dataset is worse than none.
    pub fn load(
        sources: &[&dyn SegmentSource],
        config: &LoaderConfig,
    ) -> Result<(Self, LoadReport), AppError> {
        let mut entries = BTreeMap::new();
        let mut report = LoadReport::default();

        for source in sources {
            for (key, stats) in source.load_entries(config)? {
                let key = normalize_key(&key);
                if entries.contains_key(&key) {
                    report.reject(
                        key,
                        format!("duplicate key from source '{}', keeping earlier entry", source.name()),
                    );
                    continue;
                }
                if let Err(reason) = stats.validate() {
                    report.reject(key, format!("{} ({})", reason, source.name()));
                    continue;
                }
                entries.insert(key, stats);
            }
        }

        report.loaded = entries.len();
        Ok((Self { entries }, report))
    }

    /// Look up a segment. Rejected and never-loaded keys look identical
    /// here: plain "not found".
    pub fn get(&self, key: &str) -> Option<&SegmentStats> {
        self.entries.get(&normalize_key(key))
    }

    /// All published entries, in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SegmentStats)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Segment keys are case- and padding-insensitive.
fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedSource {
        name: &'static str,
        entries: Vec<(String, SegmentStats)>,
    }

    impl SegmentSource for FixedSource {
        fn name(&self) -> &'static str {
            self.name
        }

        fn load_entries(&self, _config: &LoaderConfig) -> Result<BTreeMap<String, SegmentStats>, AppError> {
            Ok(self.entries.iter().cloned().collect())
        }
    }

    fn stats(median: f64) -> SegmentStats {
        SegmentStats {
            segment: "Test".to_string(),
            currency: "EUR".to_string(),
            year: 2023,
            mean: median * 1.2,
            median,
            p10: median * 0.5,
            p25: median * 0.7,
            p75: median * 1.5,
            p90: median * 2.0,
            source: "test".to_string(),
        }
    }

    #[test]
    fn malformed_entries_are_excluded_and_reported() {
        let mut bad = stats(20_000.0);
        bad.p25 = bad.median; // duplicate adjacent anchors
        let source = FixedSource {
            name: "fixed",
            entries: vec![("good".to_string(), stats(30_000.0)), ("bad".to_string(), bad)],
        };

        let (dataset, report) =
            ReferenceDataset::load(&[&source], &LoaderConfig::default()).expect("load");

        assert!(dataset.get("good").is_some());
        assert!(dataset.get("bad").is_none(), "malformed entry must not be published");
        assert_eq!(report.loaded, 1);
        assert_eq!(report.rejections.len(), 1);
        assert_eq!(report.rejections[0].key, "bad");
    }

    #[test]
    fn earlier_sources_win_on_key_collision() {
        let first = FixedSource {
            name: "first",
            entries: vec![("spain".to_string(), stats(23_000.0))],
        };
        let second = FixedSource {
            name: "second",
            entries: vec![("Spain".to_string(), stats(99_000.0))],
        };

        let (dataset, report) =
            ReferenceDataset::load(&[&first, &second], &LoaderConfig::default()).expect("load");

        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.get("spain").map(|s| s.median), Some(23_000.0));
        assert!(report.rejections.iter().any(|r| r.reason.contains("duplicate key")));
    }

    #[test]
    fn lookup_normalizes_keys() {
        let source = FixedSource {
            name: "fixed",
            entries: vec![("galicia".to_string(), stats(21_000.0))],
        };
        let (dataset, _) = ReferenceDataset::load(&[&source], &LoaderConfig::default()).expect("load");
        assert!(dataset.get("  Galicia ").is_some());
    }
}
