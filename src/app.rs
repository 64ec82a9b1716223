//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - composes segment sources and loads the reference dataset
//! - runs the estimator / synthesizer
//! - prints reports (rejections go to stderr, for operators)

use clap::Parser;

use crate::cli::{BucketsArgs, Cli, Command, DataArgs, RankArgs};
use crate::data::{
    IneTableSource, ReferenceDataset, SegmentSource, StaticCountrySource, SubmissionSource,
};
use crate::distribution::DistributionSynthesizer;
use crate::domain::{LoadReport, LoaderConfig, Query};
use crate::error::AppError;
use crate::estimate::PercentileEstimator;
use crate::fx::RateTable;

/// Entry point for the `finrank` binary.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    match cli.command {
        Command::Rank(args) => handle_rank(args),
        Command::Buckets(args) => handle_buckets(args),
        Command::Segments(args) => handle_segments(args),
    }
}

fn handle_rank(args: RankArgs) -> Result<(), AppError> {
    let dataset = load_dataset(&args.data)?;
    let rates = RateTable::default_usd();
    let estimator = PercentileEstimator::new(&dataset, &rates);

    let query = Query {
        value: args.value,
        currency: args.currency,
        segment: args.segment,
        metric: args.metric,
    };
    let percentile = estimator.estimate_query(&query);

    print!(
        "{}",
        crate::report::format_rank_summary(&query, percentile, dataset.get(&query.segment), &rates)
    );
    Ok(())
}

fn handle_buckets(args: BucketsArgs) -> Result<(), AppError> {
    let dataset = load_dataset(&args.data)?;
    let synth = DistributionSynthesizer::new(&dataset);
    let buckets = synth.buckets(&args.segment, args.metric);

    print!(
        "{}",
        crate::report::format_buckets(&args.segment, args.metric.display_name(), &buckets, args.chart)
    );
    Ok(())
}

fn handle_segments(args: DataArgs) -> Result<(), AppError> {
    let dataset = load_dataset(&args)?;
    print!("{}", crate::report::format_segments(&dataset));
    Ok(())
}

/// Compose sources per flags and publish the dataset.
///
/// The static country table always loads first, so built-in keys win over
/// anything a parsed table tries to redefine.
fn load_dataset(args: &DataArgs) -> Result<ReferenceDataset, AppError> {
    let config = LoaderConfig {
        year: args.year,
        include_submissions: args.include_submissions,
        min_submissions: args.min_submissions,
    };

    let mut sources: Vec<Box<dyn SegmentSource>> = vec![Box::new(StaticCountrySource)];
    if let Some(path) = &args.table {
        sources.push(Box::new(IneTableSource::from_path(path)));
    } else if args.fetch {
        sources.push(Box::new(IneTableSource::from_env()));
    }
    if let Some(path) = &args.submissions {
        sources.push(Box::new(SubmissionSource::from_path(path, RateTable::default_usd())?));
    }

    let refs: Vec<&dyn SegmentSource> = sources.iter().map(|s| s.as_ref()).collect();
    let (dataset, report) = ReferenceDataset::load(&refs, &config)?;
    warn_rejections(&report);
    Ok(dataset)
}

fn warn_rejections(report: &LoadReport) {
    if !report.rejections.is_empty() {
        eprint!("{}", crate::report::format_load_report(report));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn data_args() -> DataArgs {
        DataArgs {
            table: None,
            fetch: false,
            submissions: None,
            include_submissions: false,
            min_submissions: 100,
            year: 2023,
        }
    }

    #[test]
    fn default_load_publishes_the_static_countries() {
        let dataset = load_dataset(&data_args()).expect("load");
        assert_eq!(dataset.len(), 3);
        assert!(dataset.get("spain").is_some());
        assert!(dataset.get("usa").is_some());
        assert!(dataset.get("uk").is_some());
    }

    #[test]
    fn table_file_extends_the_dataset_without_overriding_builtins() {
        let stats = [
            ("Media", 28_000.0),
            ("Mediana", 23_000.0),
            ("Percentil 10", 11_000.0),
            ("Cuartil inferior", 16_000.0),
            ("Cuartil superior", 35_000.0),
            ("Percentil 90", 49_000.0),
        ];
        let records: Vec<serde_json::Value> = stats
            .iter()
            .map(|(tag, value)| {
                let variable = if *tag == "Media" || *tag == "Mediana" {
                    "Medidas estadísticas"
                } else {
                    "Percentiles simples"
                };
                json!({
                    "MetaData": [
                        { "T3_Variable": "Comunidades y Ciudades Autónomas",
                          "Nombre": "Galicia", "Codigo": "12" },
                        { "T3_Variable": variable, "Nombre": tag, "Codigo": "" },
                    ],
                    "Data": [ { "Anyo": 2023, "Valor": value } ],
                })
            })
            .collect();

        let path = std::env::temp_dir().join("finrank_app_test_table.json");
        std::fs::write(&path, serde_json::to_string(&records).expect("serialize"))
            .expect("write temp table");

        let mut args = data_args();
        args.table = Some(path.clone());
        let dataset = load_dataset(&args).expect("load");
        std::fs::remove_file(&path).ok();

        assert_eq!(dataset.len(), 4);
        let galicia = dataset.get("galicia").expect("galicia entry");
        assert_eq!(galicia.currency, "EUR");
        assert_eq!(galicia.median, 23_000.0);
        // Built-in Spain survives untouched.
        assert_eq!(dataset.get("spain").map(|s| s.median), Some(23_349.0));
    }
}
