//! End-to-end runs over a small sales log in a scratch directory.

use sales_analytics::catalog::StaticCatalog;
use sales_analytics::enrich::load_enriched_data;
use sales_analytics::models::CatalogProduct;
use sales_analytics::pipeline::{run_pipeline, PipelineConfig};
use sales_analytics::validation::FilterOptions;
use sales_analytics::SalesError;
use std::path::Path;

const SALES_LOG: &str = "\
TransactionID|Date|ProductID|ProductName|Quantity|UnitPrice|CustomerID|Region
T001|2024-12-01|P101|Laptop,Gaming|2|45,000.00|C001|North
T002|2024-12-01|P102|Mouse|10|500.00|C002|South

T003|2024-12-02|P101|Laptop|1|45,000.00|C003|North
T004|2024-12-02|P110|USB Cable|0|150.00|C004|East
T005|2024-12-03|P103|Webcam|3|2,500.50|C002|
X006|2024-12-03|P104|Keyboard|1|1,200.00|C005|West
T007|2024-12-03|P104|Keyboard|1|1,200.00
T008|2024-12-04|P999|Monitor|1|abc|C006|West
T009|2024-12-04|P999|Monitor|1|12,000.00|C006|West
";

fn product(id: i64, title: &str, category: &str) -> CatalogProduct {
    CatalogProduct {
        id,
        title: Some(title.to_string()),
        category: Some(category.to_string()),
        brand: Some("Acme".to_string()),
        rating: Some(4.2),
    }
}

fn config_in(dir: &Path) -> PipelineConfig {
    let input = dir.join("sales_data.txt");
    std::fs::write(&input, SALES_LOG).unwrap();
    PipelineConfig {
        input,
        enriched_output: dir.join("data").join("enriched_sales_data.txt"),
        report_output: dir.join("output").join("sales_report.txt"),
        ..PipelineConfig::default()
    }
}

#[test]
fn full_run_writes_both_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    let catalog = StaticCatalog::new(vec![
        product(101, "Laptop", "laptops"),
        product(102, "Mouse", "accessories"),
    ]);

    let summary = run_pipeline(&config, &catalog).unwrap();
    assert_eq!(summary.lines_read, 9);
    assert_eq!(summary.parsed, 7);
    assert_eq!(summary.malformed, 2);
    assert_eq!(summary.validation.invalid, 3);
    assert_eq!(summary.validation.final_count, 4);
    assert_eq!(summary.total_revenue, 152_000.0);
    assert_eq!(summary.products_fetched, 2);
    assert_eq!(summary.enriched_matched, 3);
    assert!(summary.enriched_saved);

    let enriched = load_enriched_data(&config.enriched_output).unwrap();
    assert_eq!(enriched.len(), 4);
    assert_eq!(enriched[0].transaction.product_name, "Laptop");
    assert_eq!(enriched[0].api_category.as_deref(), Some("laptops"));
    assert!(!enriched[3].api_match);

    let report = std::fs::read_to_string(&config.report_output).unwrap();
    assert!(report.contains("Records Processed: 4"));
    assert!(report.contains("Total Revenue:        \u{20b9}152,000.00"));
    assert!(report.contains("Date Range:           2024-12-01 to 2024-12-04"));
    assert!(report.contains("Success Rate:    75.00%"));
    assert!(report.contains("Unmatched Products:\n- Monitor\n"));
}

#[test]
fn empty_catalog_still_produces_report() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    let summary = run_pipeline(&config, &StaticCatalog::default()).unwrap();
    assert_eq!(summary.enriched_matched, 0);

    let enriched = load_enriched_data(&config.enriched_output).unwrap();
    assert!(enriched.iter().all(|tx| !tx.api_match && tx.api_brand.is_none()));
    let report = std::fs::read_to_string(&config.report_output).unwrap();
    assert!(report.contains("Enriched Records: 0"));
    assert!(report.contains("Success Rate:    0.00%"));
}

#[test]
fn filters_narrow_the_report() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(dir.path());
    config.filter = FilterOptions {
        region: Some("North".to_string()),
        min_amount: Some(50_000.0),
        max_amount: None,
    };

    let summary = run_pipeline(&config, &StaticCatalog::default()).unwrap();
    assert_eq!(summary.validation.filtered_by_region, 2);
    assert_eq!(summary.validation.filtered_by_amount, 1);
    assert_eq!(summary.validation.final_count, 1);
    assert_eq!(summary.total_revenue, 90_000.0);
}

#[test]
fn filter_removing_everything_renders_empty_report() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(dir.path());
    config.filter.region = Some("Nowhere".to_string());

    let summary = run_pipeline(&config, &StaticCatalog::default()).unwrap();
    assert_eq!(summary.validation.final_count, 0);
    let report = std::fs::read_to_string(&config.report_output).unwrap();
    assert!(report.contains("Total Revenue:        \u{20b9}0.00"));
    assert!(report.contains("Best Selling Day:\nN/A"));
}

#[test]
fn missing_input_aborts_run() {
    let dir = tempfile::tempdir().unwrap();
    let config = PipelineConfig {
        input: dir.path().join("absent.txt"),
        ..PipelineConfig::default()
    };
    let err = run_pipeline(&config, &StaticCatalog::default()).unwrap_err();
    assert!(matches!(err, SalesError::InputNotFound(_)));
}
