//! Command-line parsing for the ranking engine front-end.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the engine code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::Metric;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "finrank",
    version,
    about = "Rank salaries, net worth, and rent against national statistics"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Rank a value against a segment's reference distribution.
    Rank(RankArgs),
    /// Print synthesized distribution buckets for a segment.
    Buckets(BucketsArgs),
    /// List loaded segments and their summary statistics.
    Segments(DataArgs),
}

/// Dataset-loading options shared by every subcommand.
#[derive(Debug, Parser, Clone)]
pub struct DataArgs {
    /// Load an INE-style JSON table from a local file.
    #[arg(long, value_name = "PATH")]
    pub table: Option<PathBuf>,

    /// Fetch the INE table over HTTP (INE_TABLE_URL overrides the endpoint).
    #[arg(long, conflicts_with = "table")]
    pub fetch: bool,

    /// JSON file of community submission rows.
    #[arg(long, value_name = "PATH")]
    pub submissions: Option<PathBuf>,

    /// Include segments derived from community submissions.
    #[arg(long)]
    pub include_submissions: bool,

    /// Minimum submission rows per segment before its statistics are used.
    #[arg(long, default_value_t = 100)]
    pub min_submissions: usize,

    /// Designated reporting year for tabular sources.
    #[arg(long, default_value_t = 2023)]
    pub year: i32,
}

/// Options for `finrank rank`.
#[derive(Debug, Parser, Clone)]
pub struct RankArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Raw value to rank.
    #[arg(short = 'v', long)]
    pub value: f64,

    /// ISO currency code of the value.
    #[arg(short = 'c', long, default_value = "EUR")]
    pub currency: String,

    /// Segment key (spain, usa, uk, or a region loaded via --table).
    #[arg(short = 's', long)]
    pub segment: String,

    /// Which metric the value represents.
    #[arg(short = 'm', long, value_enum, default_value_t = Metric::Salary)]
    pub metric: Metric,
}

/// Options for `finrank buckets`.
#[derive(Debug, Parser, Clone)]
pub struct BucketsArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Segment key (spain, usa, uk, or a region loaded via --table).
    #[arg(short = 's', long)]
    pub segment: String,

    /// Which metric to bucket.
    #[arg(short = 'm', long, value_enum, default_value_t = Metric::Salary)]
    pub metric: Metric,

    /// Render ascii weight bars next to the table.
    #[arg(long)]
    pub chart: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_args_parse_with_defaults() {
        let cli = Cli::try_parse_from(["finrank", "rank", "-v", "30000", "-s", "spain"])
            .expect("args should parse");
        let Command::Rank(args) = cli.command else {
            panic!("expected rank subcommand");
        };
        assert_eq!(args.value, 30_000.0);
        assert_eq!(args.currency, "EUR");
        assert_eq!(args.metric, Metric::Salary);
        assert_eq!(args.data.min_submissions, 100);
        assert_eq!(args.data.year, 2023);
    }

    #[test]
    fn metric_values_parse_lowercase() {
        let cli = Cli::try_parse_from([
            "finrank", "buckets", "-s", "usa", "-m", "net-worth", "--chart",
        ])
        .expect("args should parse");
        let Command::Buckets(args) = cli.command else {
            panic!("expected buckets subcommand");
        };
        assert_eq!(args.metric, Metric::NetWorth);
        assert!(args.chart);
    }

    #[test]
    fn table_and_fetch_are_mutually_exclusive() {
        let res = Cli::try_parse_from([
            "finrank", "segments", "--table", "t.json", "--fetch",
        ]);
        assert!(res.is_err());
    }
}
