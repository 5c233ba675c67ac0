use crate::models::Transaction;
use thiserror::Error;

const FIELD_COUNT: usize = 8;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("expected 8 fields, found {0}")]
    FieldCount(usize),

    #[error("quantity is not an integer: '{0}'")]
    Quantity(String),

    #[error("unit price is not a number: '{0}'")]
    UnitPrice(String),
}

/// Result of normalizing a batch of raw lines.
#[derive(Debug, Clone, Default)]
pub struct ParsedBatch {
    pub transactions: Vec<Transaction>,
    /// Rows dropped for a wrong field count or a non-numeric quantity/price.
    pub malformed: usize,
}

pub fn parse_line(line: &str) -> Result<Transaction, ParseError> {
    let fields: Vec<&str> = line.split('|').collect();
    if fields.len() != FIELD_COUNT {
        return Err(ParseError::FieldCount(fields.len()));
    }

    let quantity_raw = strip_separators(fields[4]);
    let quantity = quantity_raw
        .parse::<i64>()
        .map_err(|_| ParseError::Quantity(quantity_raw.clone()))?;
    let price_raw = strip_separators(fields[5]);
    let unit_price = price_raw
        .parse::<f64>()
        .ok()
        .filter(|price| price.is_finite())
        .ok_or_else(|| ParseError::UnitPrice(price_raw.clone()))?;

    Ok(Transaction {
        transaction_id: fields[0].trim().to_string(),
        date: fields[1].trim().to_string(),
        product_id: fields[2].trim().to_string(),
        product_name: clean_product_name(fields[3]),
        quantity,
        unit_price,
        customer_id: fields[6].trim().to_string(),
        region: fields[7].trim().to_string(),
    })
}

pub fn parse_transactions<S: AsRef<str>>(lines: &[S]) -> ParsedBatch {
    let mut batch = ParsedBatch::default();
    for (idx, line) in lines.iter().enumerate() {
        match parse_line(line.as_ref()) {
            Ok(transaction) => batch.transactions.push(transaction),
            Err(err) => {
                log::debug!("dropping line {}: {}", idx + 1, err);
                batch.malformed += 1;
            }
        }
    }
    batch
}

fn clean_product_name(raw: &str) -> String {
    raw.split(',').next().unwrap_or_default().trim().to_string()
}

fn strip_separators(raw: &str) -> String {
    raw.replace(',', "").trim().to_string()
}
