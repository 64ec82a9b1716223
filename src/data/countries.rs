//! Built-in national salary statistics.
//!
//! Values come straight from the official publications, in local currency
//! (annual gross salary):
//!
//! - Spain: INE, Encuesta Anual de Estructura Salarial 2023
//! - United States: BLS, Occupational Employment and Wage Statistics 2023
//!   (p10/p25/p75/p90 are full-time worker estimates)
//! - United Kingdom: ONS, Annual Survey of Hours and Earnings 2023

use std::collections::BTreeMap;

use crate::data::SegmentSource;
use crate::domain::{LoaderConfig, SegmentStats};
use crate::error::AppError;

/// The static country table shipped with the binary.
pub struct StaticCountrySource;

impl SegmentSource for StaticCountrySource {
    fn name(&self) -> &'static str {
        "static-countries"
    }

    fn load_entries(&self, _config: &LoaderConfig) -> Result<BTreeMap<String, SegmentStats>, AppError> {
        let mut out = BTreeMap::new();
        out.insert(
            "spain".to_string(),
            SegmentStats {
                segment: "Spain".to_string(),
                currency: "EUR".to_string(),
                year: 2023,
                mean: 28_049.94,
                median: 23_349.0,
                p10: 11_466.88,
                p25: 16_632.97,
                p75: 34_991.64,
                p90: 49_836.0,
                source: "INE - Encuesta Anual de Estructura Salarial 2023".to_string(),
            },
        );
        out.insert(
            "usa".to_string(),
            SegmentStats {
                segment: "United States".to_string(),
                currency: "USD".to_string(),
                year: 2023,
                mean: 63_795.0,
                median: 48_060.0,
                p10: 29_000.0,
                p25: 36_000.0,
                p75: 72_000.0,
                p90: 101_250.0,
                source: "BLS - Occupational Employment and Wage Statistics 2023".to_string(),
            },
        );
        out.insert(
            "uk".to_string(),
            SegmentStats {
                segment: "United Kingdom".to_string(),
                currency: "GBP".to_string(),
                year: 2023,
                mean: 35_828.0,
                median: 34_963.0,
                p10: 19_461.0,
                p25: 25_000.0,
                p75: 47_106.0,
                p90: 63_472.0,
                source: "ONS - Annual Survey of Hours and Earnings 2023".to_string(),
            },
        );
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_three_countries_pass_the_anchor_invariant() {
        let entries = StaticCountrySource
            .load_entries(&LoaderConfig::default())
            .expect("static load");
        assert_eq!(entries.len(), 3);
        for (key, stats) in &entries {
            assert!(stats.validate().is_ok(), "{key} should be valid");
        }
    }

    #[test]
    fn currencies_match_the_publication() {
        let entries = StaticCountrySource
            .load_entries(&LoaderConfig::default())
            .expect("static load");
        assert_eq!(entries["spain"].currency, "EUR");
        assert_eq!(entries["usa"].currency, "USD");
        assert_eq!(entries["uk"].currency, "GBP");
    }
}
