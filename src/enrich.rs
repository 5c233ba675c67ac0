use crate::error::SalesError;
use crate::models::{CatalogEntry, EnrichedTransaction, Transaction};
use crate::util::percentage;
use csv::{QuoteStyle, ReaderBuilder, WriterBuilder};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

pub const ENRICHED_HEADER: [&str; 12] = [
    "TransactionID",
    "Date",
    "ProductID",
    "ProductName",
    "Quantity",
    "UnitPrice",
    "CustomerID",
    "Region",
    "API_Category",
    "API_Brand",
    "API_Rating",
    "API_Match",
];

#[derive(Debug, Clone, PartialEq)]
pub struct EnrichmentStats {
    pub total: usize,
    pub matched: usize,
    pub success_rate: f64,
    /// Distinct product names without a catalog match, sorted.
    pub unmatched_products: Vec<String>,
}

/// Catalog id for a product id such as `P101`. Only one leading `P` is stripped.
pub fn product_key(product_id: &str) -> Option<i64> {
    product_id.strip_prefix('P')?.trim().parse::<i64>().ok()
}

pub fn enrich_transaction(
    transaction: Transaction,
    mapping: &HashMap<i64, CatalogEntry>,
) -> EnrichedTransaction {
    match product_key(&transaction.product_id).and_then(|key| mapping.get(&key)) {
        Some(entry) => EnrichedTransaction::matched(transaction, entry),
        None => EnrichedTransaction::unmatched(transaction),
    }
}

pub fn enrich_sales_data(
    transactions: &[Transaction],
    mapping: &HashMap<i64, CatalogEntry>,
) -> Vec<EnrichedTransaction> {
    transactions
        .iter()
        .cloned()
        .map(|tx| enrich_transaction(tx, mapping))
        .collect()
}

pub fn enrichment_stats(enriched: &[EnrichedTransaction]) -> EnrichmentStats {
    let matched = enriched.iter().filter(|tx| tx.api_match).count();
    let unmatched_products: BTreeSet<&str> = enriched
        .iter()
        .filter(|tx| !tx.api_match)
        .map(|tx| tx.transaction.product_name.as_str())
        .collect();

    EnrichmentStats {
        total: enriched.len(),
        matched,
        success_rate: percentage(matched as f64, enriched.len() as f64),
        unmatched_products: unmatched_products.into_iter().map(str::to_string).collect(),
    }
}

fn match_flag(matched: bool) -> &'static str {
    if matched {
        "True"
    } else {
        "False"
    }
}

fn enriched_row(tx: &EnrichedTransaction) -> [String; 12] {
    let core = &tx.transaction;
    [
        core.transaction_id.clone(),
        core.date.clone(),
        core.product_id.clone(),
        core.product_name.clone(),
        core.quantity.to_string(),
        format!("{:.2}", core.unit_price),
        core.customer_id.clone(),
        core.region.clone(),
        tx.api_category.clone().unwrap_or_default(),
        tx.api_brand.clone().unwrap_or_default(),
        tx.api_rating.map(|rating| rating.to_string()).unwrap_or_default(),
        match_flag(tx.api_match).to_string(),
    ]
}

/// Writes the enriched dataset as `|`-delimited text, replacing any existing file.
pub fn save_enriched_data(path: &Path, enriched: &[EnrichedTransaction]) -> Result<(), SalesError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| SalesError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let mut writer = WriterBuilder::new()
        .delimiter(b'|')
        .quote_style(QuoteStyle::Never)
        .from_path(path)?;
    writer.write_record(ENRICHED_HEADER)?;
    for tx in enriched {
        writer.write_record(enriched_row(tx))?;
    }
    writer.flush().map_err(|source| SalesError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads a file produced by [`save_enriched_data`]. Rows that do not parse
/// are skipped.
pub fn load_enriched_data(path: &Path) -> Result<Vec<EnrichedTransaction>, SalesError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b'|')
        .quoting(false)
        .flexible(true)
        .from_path(path)?;

    let mut out = Vec::new();
    for result in reader.records() {
        let record = result?;
        match parse_enriched_record(&record) {
            Some(tx) => out.push(tx),
            None => log::debug!("skipping enriched row {:?}", record.position()),
        }
    }
    Ok(out)
}

fn parse_enriched_record(record: &csv::StringRecord) -> Option<EnrichedTransaction> {
    if record.len() != ENRICHED_HEADER.len() {
        return None;
    }
    let optional = |idx: usize| Some(record[idx].to_string()).filter(|value| !value.is_empty());

    let transaction = Transaction {
        transaction_id: record[0].to_string(),
        date: record[1].to_string(),
        product_id: record[2].to_string(),
        product_name: record[3].to_string(),
        quantity: record[4].parse().ok()?,
        unit_price: record[5].parse().ok()?,
        customer_id: record[6].to_string(),
        region: record[7].to_string(),
    };

    Some(EnrichedTransaction {
        transaction,
        api_category: optional(8),
        api_brand: optional(9),
        api_rating: optional(10).and_then(|value| value.parse().ok()),
        api_match: record[11].eq_ignore_ascii_case("true"),
    })
}
