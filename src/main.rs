use clap::Parser;
use sales_analytics::catalog::{
    FileCatalog, HttpCatalog, ProductCatalog, StaticCatalog, DEFAULT_CATALOG_URL,
    DEFAULT_TIMEOUT_SECS,
};
use sales_analytics::logging::{self, emit_info_line};
use sales_analytics::pipeline::{run_pipeline, PipelineConfig};
use sales_analytics::validation::FilterOptions;
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Parser)]
#[command(name = "sales-analytics")]
#[command(about = "Sales transaction analytics and catalog enrichment", long_about = None)]
struct Cli {
    #[arg(long, default_value = "data/sales_data.txt")]
    input: PathBuf,
    #[arg(long, default_value = "data/enriched_sales_data.txt")]
    enriched_output: PathBuf,
    #[arg(long, default_value = "output/sales_report.txt")]
    report: PathBuf,
    #[arg(long, default_value = DEFAULT_CATALOG_URL)]
    catalog_url: String,
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    catalog_timeout_secs: u64,
    /// Read the catalog payload from a JSON file instead of the network.
    #[arg(long, conflicts_with = "offline")]
    catalog_file: Option<PathBuf>,
    /// Skip the catalog entirely; every record is reported unmatched.
    #[arg(long, default_value_t = false)]
    offline: bool,
    #[arg(long)]
    region: Option<String>,
    #[arg(long)]
    min_amount: Option<f64>,
    #[arg(long)]
    max_amount: Option<f64>,
    #[arg(long, default_value_t = 5)]
    top: usize,
    #[arg(long, default_value_t = 10)]
    low_threshold: i64,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    logging::init_logging("sales-analytics")?;
    let cli = Cli::parse();

    if let (Some(min), Some(max)) = (cli.min_amount, cli.max_amount) {
        if min > max {
            return Err(format!("--min-amount {min} is greater than --max-amount {max}"));
        }
    }

    let catalog = build_catalog(&cli)?;
    let config = PipelineConfig {
        input: cli.input,
        enriched_output: cli.enriched_output,
        report_output: cli.report,
        filter: FilterOptions {
            region: cli.region,
            min_amount: cli.min_amount,
            max_amount: cli.max_amount,
        },
        top_n: cli.top,
        low_threshold: cli.low_threshold,
    };

    emit_info_line(&"=".repeat(40));
    emit_info_line("SALES ANALYTICS SYSTEM");
    emit_info_line(&"=".repeat(40));

    let start = Instant::now();
    let summary = run_pipeline(&config, &*catalog).map_err(|err| err.to_string())?;
    emit_info_line(&format!(
        "Processed {} lines: valid={} invalid={} malformed={} matched={}",
        summary.lines_read,
        summary.validation.final_count,
        summary.validation.invalid,
        summary.malformed,
        summary.enriched_matched
    ));
    emit_info_line(&format!("Run time: {} ms", start.elapsed().as_millis()));
    Ok(())
}

fn build_catalog(cli: &Cli) -> Result<Box<dyn ProductCatalog>, String> {
    if cli.offline {
        return Ok(Box::new(StaticCatalog::default()));
    }
    if let Some(path) = &cli.catalog_file {
        return Ok(Box::new(FileCatalog::new(path)));
    }
    let catalog = HttpCatalog::new(
        cli.catalog_url.clone(),
        Duration::from_secs(cli.catalog_timeout_secs),
    )
    .map_err(|err| err.to_string())?;
    Ok(Box::new(catalog))
}
