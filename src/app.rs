//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and loads settings
//! - sets up logging
//! - picks a series source per command
//! - runs the pipeline and prints or exports the result

use std::path::Path;

use clap::Parser;
use serde::Serialize;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::{
    BatchArgs, Command, DateFilterArgs, DemoArgs, FetchArgs, OutputArgs, PredictArgs, RunArgs,
};
use crate::data::{
    CsvColumns, CsvSource, HttpSource, JsonFileSource, SampleConfig, SeriesSource, fetch_or_empty,
    generate_series,
};
use crate::domain::{FeatureVector, PipelineOutput, SeriesDocument};
use crate::error::AppError;
use crate::predict::{FsModelLoader, PredictionEngine};

pub mod pipeline;
pub mod settings;

use pipeline::Pipeline;
use settings::{SOURCE_URL_VAR, Settings};

/// Entry point for the `pb` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();
    let settings = Settings::from_env();
    init_logging(&settings, cli.verbose);

    let model_dir = cli.models.clone().unwrap_or_else(|| settings.model_dir.clone());
    debug!(model_dir = %model_dir.display(), "using model directory");
    let pipeline = Pipeline::new(PredictionEngine::new(FsModelLoader::new(model_dir)));

    match cli.command {
        Command::Run(args) => handle_run(&pipeline, args),
        Command::Fetch(args) => handle_fetch(&pipeline, &settings, args),
        Command::Predict(args) => handle_predict(&pipeline, args),
        Command::Demo(args) => handle_demo(&pipeline, args),
        Command::Batch(args) => handle_batch(&pipeline, args),
        Command::Status => handle_status(&pipeline),
    }
}

/// Logs go to stderr so stdout stays parseable JSON.
fn init_logging(settings: &Settings, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("price_band=debug")
    } else {
        EnvFilter::try_new(&settings.log_filter).unwrap_or_else(|_| EnvFilter::new("price_band=info"))
    };

    // A second init (e.g. from tests) is harmless.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn handle_run(pipeline: &Pipeline, args: RunArgs) -> Result<(), AppError> {
    let source: Box<dyn SeriesSource> = if is_csv(&args.input) {
        let columns = CsvColumns {
            date: args.date_column,
            value: args.value_column,
            series_name: args.name,
        };
        Box::new(CsvSource::new(args.input.clone(), columns))
    } else {
        Box::new(JsonFileSource::new(args.input.clone()))
    };

    let doc = load_document(source.as_ref(), &args.filter);
    let output = pipeline.run(&doc);
    emit_output(&output, &args.out, Some(&args.input.display().to_string()))
}

fn handle_fetch(pipeline: &Pipeline, settings: &Settings, args: FetchArgs) -> Result<(), AppError> {
    let url = args
        .url
        .or_else(|| settings.source_url.clone())
        .ok_or_else(|| {
            AppError::new(
                2,
                format!("No URL given and {SOURCE_URL_VAR} is not set"),
            )
        })?;

    let doc = match HttpSource::new(url.clone()) {
        Ok(source) => load_document(&source, &args.filter),
        Err(err) => {
            warn!(url = %url, error = %err, "could not build HTTP client");
            SeriesDocument::failed(err.to_string())
        }
    };

    let output = pipeline.run(&doc);
    emit_output(&output, &args.out, Some(&url))
}

fn handle_predict(pipeline: &Pipeline, args: PredictArgs) -> Result<(), AppError> {
    let text = std::fs::read_to_string(&args.features).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to read features '{}': {e}", args.features.display()),
        )
    })?;
    let features: FeatureVector = serde_json::from_str(&text)
        .map_err(|e| AppError::new(2, format!("Invalid features JSON: {e}")))?;

    let prediction = pipeline.engine().predict(&features);
    if args.out.summary {
        print!("{}", crate::report::format_prediction(&prediction));
    } else {
        println!("{}", crate::io::to_json(&prediction, args.out.pretty)?);
    }
    if let Some(path) = &args.out.output {
        crate::io::write_json(path, &prediction, args.out.pretty)?;
    }
    Ok(())
}

fn handle_demo(pipeline: &Pipeline, args: DemoArgs) -> Result<(), AppError> {
    let config = SampleConfig {
        points: args.points,
        start_price: args.start_price,
        drift: args.drift,
        volatility: args.volatility,
        seed: args.seed,
        ..SampleConfig::default()
    };
    let series = generate_series(&config).map_err(|e| AppError::new(2, e.to_string()))?;
    info!(points = config.points, seed = config.seed, "generated synthetic series");

    let doc = SeriesDocument::from_series(vec![series]);
    let output = pipeline.run(&doc);
    emit_output(&output, &args.out, Some("synthetic"))
}

fn handle_batch(pipeline: &Pipeline, args: BatchArgs) -> Result<(), AppError> {
    let docs: Vec<SeriesDocument> = args
        .inputs
        .iter()
        .map(|path| fetch_or_empty(&JsonFileSource::new(path.clone())))
        .collect();

    let outputs = pipeline.run_batch(&docs);
    info!(documents = outputs.len(), "batch complete");

    println!("{}", crate::io::to_json(&outputs, args.pretty)?);
    write_optional(args.output.as_deref(), &outputs, args.pretty)
}

fn handle_status(pipeline: &Pipeline) -> Result<(), AppError> {
    let engine = pipeline.engine();
    println!("Models: {}", engine.describe_loader());
    match engine.models() {
        Ok(_) => println!("Status: loaded (q10/q90)"),
        Err(err) => println!("Status: unavailable ({err}); predictions use the fallback heuristic"),
    }
    Ok(())
}

fn load_document(source: &dyn SeriesSource, filter: &DateFilterArgs) -> SeriesDocument {
    let mut doc = fetch_or_empty(source);
    if !filter.dates.is_empty() {
        doc.filter_dates(&filter.dates);
        debug!(labels = filter.dates.len(), "applied date filter");
    }
    doc
}

fn emit_output(output: &PipelineOutput, args: &OutputArgs, source: Option<&str>) -> Result<(), AppError> {
    if args.summary {
        print!("{}", crate::report::format_run_summary(output, source));
    } else {
        println!("{}", crate::io::to_json(output, args.pretty)?);
    }
    write_optional(args.output.as_deref(), output, args.pretty)
}

fn write_optional<T: Serialize>(path: Option<&Path>, value: &T, pretty: bool) -> Result<(), AppError> {
    if let Some(path) = path {
        crate::io::write_json(path, value, pretty)?;
        info!(path = %path.display(), "wrote result");
    }
    Ok(())
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_detection_is_by_extension() {
        assert!(is_csv(Path::new("prices.CSV")));
        assert!(is_csv(&std::path::PathBuf::from("data/prices.csv")));
        assert!(!is_csv(Path::new("doc.json")));
        assert!(!is_csv(Path::new("noext")));
    }

    #[test]
    fn date_filter_applies_to_loaded_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        std::fs::write(
            &path,
            r#"{"axis": [{"name": "Price", "x": ["2025-01-01", "2025-01-02", "2025-01-03"], "y": [1, 2, 3]}]}"#,
        )
        .unwrap();

        let filter = DateFilterArgs {
            dates: vec!["2025-01-01".to_string(), "2025-01-03".to_string()],
        };
        let doc = load_document(&JsonFileSource::new(path), &filter);
        assert_eq!(doc.axis.len(), 1);
        assert_eq!(doc.axis[0].x.len(), 2);
    }

    #[test]
    fn missing_file_degrades_to_empty_document() {
        let filter = DateFilterArgs { dates: Vec::new() };
        let doc = load_document(&JsonFileSource::new("/nonexistent/doc.json"), &filter);
        assert!(doc.axis.is_empty());
        assert!(doc.error.is_some());
    }
}
