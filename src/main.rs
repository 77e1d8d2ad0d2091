//! CLI entry point for the DatexII to GeoJSON converter.
//!
//! Converts an energy-infrastructure publication (file or URL) into a
//! scored, percentile-ranked GeoJSON FeatureCollection.

use anyhow::Result;
use clap::{Parser, Subcommand};
use datex_geojson::{
    convert,
    fetch::read_source,
    output::{append_record, print_json, write_geojson},
    stats::ConversionStats,
};
use std::ffi::OsStr;
use std::path::Path;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "datex_geojson")]
#[command(about = "DatexII energy infrastructure → GeoJSON with capacity scoring", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a DatexII XML publication into a GeoJSON FeatureCollection
    Convert {
        /// Path to file or URL to fetch
        #[arg(value_name = "XML_FILE_OR_URL")]
        source: String,

        /// GeoJSON file to write
        #[arg(value_name = "GEOJSON_FILE")]
        output: String,

        /// Optional: CSV file to append run statistics to
        #[arg(long)]
        stats_csv: Option<String>,
    },
    /// Run the conversion without writing output and log the statistics
    Inspect {
        /// Path to file or URL to fetch
        #[arg(value_name = "XML_FILE_OR_URL")]
        source: String,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let _log_guard = init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            source,
            output,
            stats_csv,
        } => {
            let bytes = read_source(&source)?;
            let conversion = convert(&bytes)?;
            let size = write_geojson(&output, &conversion.collection)?;

            let stats = ConversionStats::from_conversion(&conversion)
                .with_source(&source)
                .with_output_bytes(size);
            info!(
                features = stats.features,
                dropped = stats.sites_dropped,
                retention_pct = stats.retention_pct(),
                "Conversion finished"
            );
            if let Some(path) = stats_csv {
                append_record(&path, &stats)?;
            }

            println!("Converted '{source}' → '{output}' ({size} bytes)");
        }
        Commands::Inspect { source } => {
            let bytes = read_source(&source)?;
            let conversion = convert(&bytes)?;
            let stats = ConversionStats::from_conversion(&conversion).with_source(&source);
            print_json(&stats)?;
        }
    }

    Ok(())
}

/// Logging setup: colored stderr + JSON rolling log file.
///
/// The returned guard flushes the file writer when dropped.
fn init_tracing() -> WorkerGuard {
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/datex_geojson.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("datex_geojson.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(env_filter("RUST_LOG", "info"));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(env_filter("RUST_LOG_JSON", "debug"));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    guard
}

fn env_filter(var: &str, default: &str) -> EnvFilter {
    EnvFilter::try_from_env(var).unwrap_or_else(|_| EnvFilter::new(default))
}
