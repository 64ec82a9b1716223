//! INE salary-table ingestion.
//!
//! The INE (Instituto Nacional de Estadística) publishes the Annual Salary
//! Structure Survey as a flat list of records. Each record carries a
//! metadata facet list — one facet naming the region, one naming the
//! statistic — and a per-year observation series. Reassembling the six
//! summary statistics for a region therefore means:
//!
//! 1. group records by region identity (code + name)
//! 2. map each statistic tag onto the corresponding field, keeping only
//!    the designated reporting year's value
//! 3. drop any region that does not end up with all six fields populated
//!    (the completeness gate — partial groups are excluded silently)
//!
//! The table can be read from a local JSON file or fetched once over HTTP
//! at startup; either way the result is published read-only.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use reqwest::blocking::Client;
use serde::Deserialize;

use crate::data::SegmentSource;
use crate::domain::{LoaderConfig, SegmentStats};
use crate::error::AppError;

/// INE Tempus JSON API endpoint for table 28191 (salary structure survey,
/// statistical measures and simple percentiles by region).
const DEFAULT_TABLE_URL: &str = "https://servicios.ine.es/wstempus/js/ES/DATOS_TABLA/28191?tip=AM";

/// Env var overriding the table URL (useful for mirrors and testing).
const TABLE_URL_ENV: &str = "INE_TABLE_URL";

const SOURCE_LABEL: &str = "INE - Encuesta Anual de Estructura Salarial";

/// Facet variables that identify the region dimension.
const REGION_VARIABLES: [&str; 2] = ["Total Nacional", "Comunidades y Ciudades Autónomas"];

/// Facet variables that identify the statistic dimension.
const STATISTIC_VARIABLES: [&str; 2] = ["Medidas estadísticas", "Percentiles simples"];

/// Where the raw table comes from.
#[derive(Debug, Clone)]
enum TableOrigin {
    File(PathBuf),
    Http(String),
}

/// Loads segment statistics from an INE-shaped JSON table.
#[derive(Debug, Clone)]
pub struct IneTableSource {
    origin: TableOrigin,
}

impl IneTableSource {
    /// Read the table from a local JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        Self {
            origin: TableOrigin::File(path.as_ref().to_path_buf()),
        }
    }

    /// Fetch the table over HTTP; `INE_TABLE_URL` in the environment (or
    /// `.env`) overrides the default endpoint.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let url = std::env::var(TABLE_URL_ENV).unwrap_or_else(|_| DEFAULT_TABLE_URL.to_string());
        Self {
            origin: TableOrigin::Http(url),
        }
    }

    fn fetch_records(&self) -> Result<Vec<RawRecord>, AppError> {
        match &self.origin {
            TableOrigin::File(path) => {
                let text = std::fs::read_to_string(path).map_err(|e| {
                    AppError::usage(format!("Failed to read table file {}: {e}", path.display()))
                })?;
                serde_json::from_str(&text).map_err(|e| {
                    AppError::data(format!("Failed to parse table file {}: {e}", path.display()))
                })
            }
            TableOrigin::Http(url) => {
                let response = Client::new()
                    .get(url)
                    .send()
                    .and_then(|r| r.error_for_status())
                    .map_err(|e| AppError::data(format!("Failed to fetch INE table: {e}")))?;
                response
                    .json()
                    .map_err(|e| AppError::data(format!("Failed to decode INE table: {e}")))
            }
        }
    }
}

impl SegmentSource for IneTableSource {
    fn name(&self) -> &'static str {
        "ine-table"
    }

    fn load_entries(&self, config: &LoaderConfig) -> Result<BTreeMap<String, SegmentStats>, AppError> {
        let records = self.fetch_records()?;
        Ok(entries_from_records(&records, config.year))
    }
}

/// One raw table record: metadata facets plus a per-year series.
#[derive(Debug, Clone, Deserialize)]
struct RawRecord {
    #[serde(rename = "MetaData", default)]
    metadata: Vec<RawFacet>,
    #[serde(rename = "Data", default)]
    data: Vec<RawObservation>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawFacet {
    /// Which dimension this facet belongs to ("Total Nacional",
    /// "Medidas estadísticas", ...).
    #[serde(rename = "T3_Variable", default)]
    variable: String,
    /// The facet value ("Galicia", "Mediana", ...).
    #[serde(rename = "Nombre", default)]
    name: String,
    #[serde(rename = "Codigo", default)]
    code: String,
}

#[derive(Debug, Clone, Deserialize)]
struct RawObservation {
    #[serde(rename = "Anyo")]
    year: i32,
    #[serde(rename = "Valor")]
    value: Option<f64>,
}

/// Which of the six fields a statistic tag populates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatisticKind {
    Mean,
    Median,
    P10,
    P25,
    P75,
    P90,
}

impl StatisticKind {
    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "Media" => Some(Self::Mean),
            "Mediana" => Some(Self::Median),
            "Percentil 10" => Some(Self::P10),
            "Cuartil inferior" => Some(Self::P25),
            "Cuartil superior" => Some(Self::P75),
            "Percentil 90" => Some(Self::P90),
            _ => None,
        }
    }
}

/// A region group being assembled; becomes an entry only when complete.
#[derive(Debug, Clone, Default)]
struct PartialEntry {
    region: String,
    mean: Option<f64>,
    median: Option<f64>,
    p10: Option<f64>,
    p25: Option<f64>,
    p75: Option<f64>,
    p90: Option<f64>,
}

impl PartialEntry {
    fn set(&mut self, kind: StatisticKind, value: f64) {
        let slot = match kind {
            StatisticKind::Mean => &mut self.mean,
            StatisticKind::Median => &mut self.median,
            StatisticKind::P10 => &mut self.p10,
            StatisticKind::P25 => &mut self.p25,
            StatisticKind::P75 => &mut self.p75,
            StatisticKind::P90 => &mut self.p90,
        };
        *slot = Some(value);
    }

    fn complete(self, year: i32) -> Option<SegmentStats> {
        Some(SegmentStats {
            segment: self.region.clone(),
            currency: "EUR".to_string(),
            year,
            mean: self.mean?,
            median: self.median?,
            p10: self.p10?,
            p25: self.p25?,
            p75: self.p75?,
            p90: self.p90?,
            source: format!("{SOURCE_LABEL} {year}"),
        })
    }
}

/// Group, map, and gate raw records into candidate entries.
fn entries_from_records(records: &[RawRecord], year: i32) -> BTreeMap<String, SegmentStats> {
    // Group by region identity (code + name keeps distinct regions with
    // identical display names apart).
    let mut groups: BTreeMap<String, PartialEntry> = BTreeMap::new();

    for record in records {
        let Some(value) = record
            .data
            .iter()
            .find(|obs| obs.year == year)
            .and_then(|obs| obs.value)
        else {
            continue;
        };

        let Some(region) = record
            .metadata
            .iter()
            .find(|f| REGION_VARIABLES.contains(&f.variable.as_str()))
        else {
            continue;
        };
        let Some(kind) = record
            .metadata
            .iter()
            .find(|f| STATISTIC_VARIABLES.contains(&f.variable.as_str()))
            .and_then(|f| StatisticKind::from_tag(&f.name))
        else {
            continue;
        };

        let group_key = format!("{}-{}", region.code, region.name);
        let entry = groups.entry(group_key).or_default();
        entry.region = region.name.clone();
        entry.set(kind, value);
    }

    // Completeness gate: only fully populated groups are published;
    // partial groups vanish without an error.
    groups
        .into_values()
        .filter_map(|partial| {
            let key = partial.region.to_lowercase();
            partial.complete(year).map(|stats| (key, stats))
        })
        .collect()
}
