use crate::analysis::{analyze, SalesAnalysis};
use crate::enrich::{enrichment_stats, EnrichmentStats};
use crate::error::SalesError;
use crate::models::{EnrichedTransaction, Transaction};
use crate::util::{format_currency, safe_ratio};
use chrono::NaiveDateTime;
use std::fmt;
use std::path::Path;

const RULE_WIDTH: usize = 44;

#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub generated_at: NaiveDateTime,
    pub top_n: usize,
    pub low_threshold: i64,
}

impl ReportOptions {
    pub fn now(top_n: usize, low_threshold: i64) -> Self {
        Self {
            generated_at: chrono::Local::now().naive_local(),
            top_n,
            low_threshold,
        }
    }
}

/// Fully computed report, rendered through `Display`.
pub struct SalesReport {
    generated_at: NaiveDateTime,
    top_n: usize,
    low_threshold: i64,
    analysis: SalesAnalysis,
    enrichment: EnrichmentStats,
    date_range: Option<(String, String)>,
}

impl SalesReport {
    pub fn build(
        transactions: &[Transaction],
        enriched: &[EnrichedTransaction],
        options: &ReportOptions,
    ) -> Self {
        let date_range = transactions
            .iter()
            .map(|tx| tx.date.as_str())
            .min()
            .zip(transactions.iter().map(|tx| tx.date.as_str()).max())
            .map(|(start, end)| (start.to_string(), end.to_string()));

        Self {
            generated_at: options.generated_at,
            top_n: options.top_n,
            low_threshold: options.low_threshold,
            analysis: analyze(transactions, options.top_n, options.low_threshold),
            enrichment: enrichment_stats(enriched),
            date_range,
        }
    }

    fn write_header(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", "=".repeat(RULE_WIDTH))?;
        writeln!(f, "           SALES ANALYTICS REPORT")?;
        writeln!(
            f,
            "     Generated: {}",
            self.generated_at.format("%Y-%m-%d %H:%M:%S")
        )?;
        writeln!(f, "     Records Processed: {}", self.analysis.transaction_count)?;
        writeln!(f, "{}", "=".repeat(RULE_WIDTH))?;
        writeln!(f)
    }

    fn write_overall(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let analysis = &self.analysis;
        let average = safe_ratio(analysis.total_revenue, analysis.transaction_count as f64);
        let range = match &self.date_range {
            Some((start, end)) => format!("{start} to {end}"),
            None => "N/A".to_string(),
        };

        section(f, "OVERALL SUMMARY")?;
        writeln!(f, "Total Revenue:        {}", format_currency(analysis.total_revenue))?;
        writeln!(f, "Total Transactions:   {}", analysis.transaction_count)?;
        writeln!(f, "Average Order Value:  {}", format_currency(average))?;
        writeln!(f, "Date Range:           {range}")?;
        writeln!(f)
    }

    fn write_regions(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        section(f, "REGION-WISE PERFORMANCE")?;
        writeln!(f, "{:<10}{:<15}{:<12}{}", "Region", "Sales", "% of Total", "Transactions")?;
        for region in &self.analysis.regions {
            writeln!(
                f,
                "{:<10}{}   {:>6.2}%      {}",
                region.region,
                format_currency(region.total_sales),
                region.percentage,
                region.transaction_count
            )?;
        }
        writeln!(f)
    }

    fn write_top_products(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        section(f, &format!("TOP {} PRODUCTS", self.top_n))?;
        writeln!(f, "{:<5}{:<20}{:<8}{}", "Rank", "Product", "Qty", "Revenue")?;
        for (idx, product) in self.analysis.top_products.iter().enumerate() {
            writeln!(
                f,
                "{:<5}{:<20}{:<8}{}",
                idx + 1,
                product.name,
                product.total_quantity,
                format_currency(product.total_revenue)
            )?;
        }
        writeln!(f)
    }

    fn write_top_customers(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        section(f, &format!("TOP {} CUSTOMERS", self.top_n))?;
        writeln!(f, "{:<5}{:<12}{:<15}{}", "Rank", "Customer", "Spent", "Orders")?;
        for (idx, customer) in self.analysis.customers.iter().take(self.top_n).enumerate() {
            writeln!(
                f,
                "{:<5}{:<12}{}   {}",
                idx + 1,
                customer.customer_id,
                format_currency(customer.total_spent),
                customer.purchase_count
            )?;
        }
        writeln!(f)
    }

    fn write_daily(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        section(f, "DAILY SALES TREND")?;
        writeln!(f, "{:<12}{:<15}{:<8}{}", "Date", "Revenue", "Txns", "Customers")?;
        for day in &self.analysis.daily {
            writeln!(
                f,
                "{:<12}{}   {:<8}{}",
                day.date,
                format_currency(day.revenue),
                day.transaction_count,
                day.unique_customers
            )?;
        }
        writeln!(f)
    }

    fn write_product_performance(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        section(f, "PRODUCT PERFORMANCE ANALYSIS")?;
        writeln!(f, "Best Selling Day:")?;
        match &self.analysis.peak_day {
            Some(peak) => writeln!(
                f,
                "{} | Revenue: {} | Transactions: {}",
                peak.date,
                format_currency(peak.revenue),
                peak.transaction_count
            )?,
            None => writeln!(f, "N/A")?,
        }
        writeln!(f)?;

        writeln!(f, "Low Performing Products (Quantity < {}):", self.low_threshold)?;
        if self.analysis.low_performers.is_empty() {
            writeln!(f, "None")?;
        }
        for product in &self.analysis.low_performers {
            writeln!(
                f,
                "- {} | Qty: {} | Revenue: {}",
                product.name,
                product.total_quantity,
                format_currency(product.total_revenue)
            )?;
        }

        writeln!(f)?;
        writeln!(f, "Average Transaction Value per Region:")?;
        for (region, average) in &self.analysis.region_averages {
            writeln!(f, "- {}: {}", region, format_currency(*average))?;
        }
        writeln!(f)
    }

    fn write_enrichment(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        section(f, "API ENRICHMENT SUMMARY")?;
        writeln!(f, "Enriched Records: {}", self.enrichment.matched)?;
        writeln!(f, "Success Rate:    {:.2}%", self.enrichment.success_rate)?;
        writeln!(f, "Unmatched Products:")?;
        for name in &self.enrichment.unmatched_products {
            writeln!(f, "- {name}")?;
        }
        Ok(())
    }
}

impl fmt::Display for SalesReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_header(f)?;
        self.write_overall(f)?;
        self.write_regions(f)?;
        self.write_top_products(f)?;
        self.write_top_customers(f)?;
        self.write_daily(f)?;
        self.write_product_performance(f)?;
        self.write_enrichment(f)
    }
}

fn section(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    writeln!(f, "{title}")?;
    writeln!(f, "{}", "-".repeat(RULE_WIDTH))
}

pub fn render_sales_report(
    transactions: &[Transaction],
    enriched: &[EnrichedTransaction],
    options: &ReportOptions,
) -> String {
    SalesReport::build(transactions, enriched, options).to_string()
}

/// Renders the report and overwrites `path` with it.
pub fn write_sales_report(
    path: &Path,
    transactions: &[Transaction],
    enriched: &[EnrichedTransaction],
    options: &ReportOptions,
) -> Result<(), SalesError> {
    let write_err = |source| SalesError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }

    let text = render_sales_report(transactions, enriched, options);
    std::fs::write(path, text).map_err(write_err)?;
    log::info!("Sales report generated successfully at: {}", path.display());
    Ok(())
}
