//! Command-line parsing for the `pb` binary.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! pipeline code; dispatch lives in `app`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "pb", version, about = "Price-series features and quantile band forecasts")]
pub struct Cli {
    /// Directory holding `quantile_q90.json` / `quantile_q10.json`
    /// (overrides PRICE_BAND_MODEL_DIR).
    #[arg(long, global = true, value_name = "DIR")]
    pub models: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the pipeline on a JSON series document or a price-history CSV.
    Run(RunArgs),
    /// Fetch a series document over HTTP and run the pipeline on it.
    Fetch(FetchArgs),
    /// Predict bounds directly from a features JSON map.
    Predict(PredictArgs),
    /// Run the pipeline on a synthetic random-walk price series.
    Demo(DemoArgs),
    /// Run several documents in parallel and print a JSON array.
    Batch(BatchArgs),
    /// Show where models are looked up and whether they load.
    Status,
}

/// Output options shared by all pipeline commands.
#[derive(Debug, Args, Clone)]
pub struct OutputArgs {
    /// Print a human-readable summary instead of JSON.
    #[arg(long)]
    pub summary: bool,

    /// Pretty-print JSON.
    #[arg(long)]
    pub pretty: bool,

    /// Also write the JSON result to this file.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Restrict every series to these x labels (comma-separated).
#[derive(Debug, Args, Clone)]
pub struct DateFilterArgs {
    #[arg(long, value_delimiter = ',', value_name = "DATES")]
    pub dates: Vec<String>,
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Input file (`.csv` is read as a price history, anything else as JSON).
    pub input: PathBuf,

    /// Date column for CSV input.
    #[arg(long, default_value = "Date")]
    pub date_column: String,

    /// Value column for CSV input.
    #[arg(long, default_value = "Close")]
    pub value_column: String,

    /// Series name for CSV input.
    #[arg(long, default_value = "Price")]
    pub name: String,

    #[command(flatten)]
    pub filter: DateFilterArgs,

    #[command(flatten)]
    pub out: OutputArgs,
}

#[derive(Debug, Args)]
pub struct FetchArgs {
    /// URL serving a JSON series document (defaults to PRICE_BAND_SOURCE_URL).
    pub url: Option<String>,

    #[command(flatten)]
    pub filter: DateFilterArgs,

    #[command(flatten)]
    pub out: OutputArgs,
}

#[derive(Debug, Args)]
pub struct PredictArgs {
    /// JSON object mapping feature names to values.
    pub features: PathBuf,

    #[command(flatten)]
    pub out: OutputArgs,
}

#[derive(Debug, Args)]
pub struct DemoArgs {
    /// Number of daily points.
    #[arg(short = 'n', long, default_value_t = 60)]
    pub points: usize,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Starting price.
    #[arg(long, default_value_t = 100.0)]
    pub start_price: f64,

    /// Daily log drift.
    #[arg(long, default_value_t = 0.0005)]
    pub drift: f64,

    /// Daily log volatility.
    #[arg(long, default_value_t = 0.02)]
    pub volatility: f64,

    #[command(flatten)]
    pub out: OutputArgs,
}

#[derive(Debug, Args)]
pub struct BatchArgs {
    /// JSON series documents.
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Pretty-print JSON.
    #[arg(long)]
    pub pretty: bool,

    /// Also write the JSON array to this file.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}
