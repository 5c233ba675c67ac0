use crate::analysis::analyze;
use crate::catalog::{create_product_mapping, ProductCatalog};
use crate::enrich::{enrich_sales_data, enrichment_stats, save_enriched_data};
use crate::error::SalesError;
use crate::logging::emit_info_line;
use crate::parser::parse_transactions;
use crate::reader::read_sales_lines;
use crate::report::{write_sales_report, ReportOptions};
use crate::util::format_currency;
use crate::validation::{
    amount_range, available_regions, is_valid, validate_and_filter, FilterOptions,
    ValidationSummary,
};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub input: PathBuf,
    pub enriched_output: PathBuf,
    pub report_output: PathBuf,
    pub filter: FilterOptions,
    pub top_n: usize,
    pub low_threshold: i64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("data/sales_data.txt"),
            enriched_output: PathBuf::from("data/enriched_sales_data.txt"),
            report_output: PathBuf::from("output/sales_report.txt"),
            filter: FilterOptions::default(),
            top_n: 5,
            low_threshold: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PipelineSummary {
    pub lines_read: usize,
    pub parsed: usize,
    pub malformed: usize,
    pub validation: ValidationSummary,
    pub total_revenue: f64,
    pub products_fetched: usize,
    pub enriched_matched: usize,
    pub enriched_saved: bool,
}

pub fn run_pipeline(
    config: &PipelineConfig,
    catalog: &dyn ProductCatalog,
) -> Result<PipelineSummary, SalesError> {
    emit_info_line("[1/10] Reading sales data...");
    let lines = read_sales_lines(&config.input)?;
    emit_info_line(&format!("Successfully read {} transactions", lines.len()));

    emit_info_line("[2/10] Parsing and cleaning data...");
    let batch = parse_transactions(&lines);
    emit_info_line(&format!(
        "Parsed {} records ({} malformed rows dropped)",
        batch.transactions.len(),
        batch.malformed
    ));
    let parsed = batch.transactions.len();

    emit_info_line("[3/10] Filter options available:");
    let candidates: Vec<_> = batch
        .transactions
        .iter()
        .filter(|tx| is_valid(tx))
        .cloned()
        .collect();
    emit_info_line(&format!("Regions: {}", available_regions(&candidates).join(", ")));
    match amount_range(&candidates) {
        Some(range) => emit_info_line(&format!(
            "Amount Range: {} - {}",
            format_currency(range.min),
            format_currency(range.max)
        )),
        None => emit_info_line("Amount Range: n/a (no valid transactions)"),
    }
    log_filter(&config.filter);

    emit_info_line("[4/10] Validating transactions...");
    let (transactions, invalid, validation) =
        validate_and_filter(batch.transactions, &config.filter);
    emit_info_line(&format!(
        "Valid: {} | Invalid: {} | Filtered by region: {} | Filtered by amount: {}",
        validation.final_count, invalid, validation.filtered_by_region, validation.filtered_by_amount
    ));

    emit_info_line("[5/10] Analyzing sales data...");
    let analysis = analyze(&transactions, config.top_n, config.low_threshold);
    emit_info_line(&format!(
        "Analysis complete: revenue {} across {} regions, {} products below quantity {}",
        format_currency(analysis.total_revenue),
        analysis.regions.len(),
        analysis.low_performers.len(),
        config.low_threshold
    ));
    if let Some(peak) = &analysis.peak_day {
        log::debug!("peak day {} with {}", peak.date, format_currency(peak.revenue));
    }

    emit_info_line(&format!(
        "[6/10] Fetching product data from {}...",
        catalog.name()
    ));
    let products = catalog.fetch_all_products();
    emit_info_line(&format!("Fetched {} products", products.len()));

    emit_info_line("[7/10] Enriching sales data...");
    let mapping = create_product_mapping(&products);
    let enriched = enrich_sales_data(&transactions, &mapping);
    let stats = enrichment_stats(&enriched);
    emit_info_line(&format!(
        "Enriched {}/{} transactions ({:.1}%)",
        stats.matched, stats.total, stats.success_rate
    ));

    emit_info_line("[8/10] Saving enriched data...");
    let enriched_saved = match save_enriched_data(&config.enriched_output, &enriched) {
        Ok(()) => {
            emit_info_line(&format!(
                "Saved to: {}",
                config.enriched_output.display()
            ));
            true
        }
        Err(err) => {
            log::error!("could not save enriched data: {err}");
            false
        }
    };

    emit_info_line("[9/10] Generating report...");
    let options = ReportOptions::now(config.top_n, config.low_threshold);
    write_sales_report(&config.report_output, &transactions, &enriched, &options)?;
    emit_info_line(&format!(
        "Report saved to: {}",
        config.report_output.display()
    ));

    emit_info_line("[10/10] Process Complete!");

    Ok(PipelineSummary {
        lines_read: lines.len(),
        parsed,
        malformed: batch.malformed,
        validation,
        total_revenue: analysis.total_revenue,
        products_fetched: products.len(),
        enriched_matched: stats.matched,
        enriched_saved,
    })
}

fn log_filter(filter: &FilterOptions) {
    if filter == &FilterOptions::default() {
        emit_info_line("No filters applied");
        return;
    }
    emit_info_line(&format!(
        "Applying filters: region={} min_amount={} max_amount={}",
        filter.region.as_deref().unwrap_or("any"),
        filter.min_amount.map_or("none".to_string(), format_currency),
        filter.max_amount.map_or("none".to_string(), format_currency)
    ));
}
