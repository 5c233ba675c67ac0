use crate::models::Transaction;
use std::collections::BTreeSet;

/// Optional narrowing applied to records that already passed validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    pub region: Option<String>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationSummary {
    pub total_input: usize,
    pub invalid: usize,
    pub filtered_by_region: usize,
    pub filtered_by_amount: usize,
    pub final_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmountRange {
    pub min: f64,
    pub max: f64,
}

pub fn is_valid(tx: &Transaction) -> bool {
    tx.quantity > 0
        && tx.unit_price > 0.0
        && tx.transaction_id.starts_with('T')
        && tx.product_id.starts_with('P')
        && tx.customer_id.starts_with('C')
        && !tx.region.is_empty()
}

pub fn validate_and_filter(
    transactions: Vec<Transaction>,
    filter: &FilterOptions,
) -> (Vec<Transaction>, usize, ValidationSummary) {
    let total_input = transactions.len();
    let (valid, invalid): (Vec<Transaction>, Vec<Transaction>) =
        transactions.into_iter().partition(is_valid);
    let invalid_count = invalid.len();

    let region = filter.region.as_deref().filter(|region| !region.is_empty());
    let mut filtered_by_region = 0usize;
    let mut filtered_by_amount = 0usize;
    let mut kept = Vec::with_capacity(valid.len());

    for tx in valid {
        if let Some(region) = region {
            if tx.region != region {
                filtered_by_region += 1;
                continue;
            }
        }

        let amount = tx.amount();
        let below = filter.min_amount.is_some_and(|min| amount < min);
        let above = filter.max_amount.is_some_and(|max| amount > max);
        if below || above {
            filtered_by_amount += 1;
            continue;
        }

        kept.push(tx);
    }

    let summary = ValidationSummary {
        total_input,
        invalid: invalid_count,
        filtered_by_region,
        filtered_by_amount,
        final_count: kept.len(),
    };
    (kept, invalid_count, summary)
}

pub fn available_regions(transactions: &[Transaction]) -> Vec<String> {
    transactions
        .iter()
        .map(|tx| tx.region.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Smallest and largest transaction amount, `None` for an empty set.
pub fn amount_range(transactions: &[Transaction]) -> Option<AmountRange> {
    transactions.iter().map(Transaction::amount).fold(None, |range, amount| {
        Some(match range {
            None => AmountRange {
                min: amount,
                max: amount,
            },
            Some(AmountRange { min, max }) => AmountRange {
                min: min.min(amount),
                max: max.max(amount),
            },
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(id: &str, qty: i64, price: f64, region: &str) -> Transaction {
        Transaction {
            transaction_id: id.to_string(),
            date: "2024-01-01".to_string(),
            product_id: "P101".to_string(),
            product_name: "Widget".to_string(),
            quantity: qty,
            unit_price: price,
            customer_id: "C1".to_string(),
            region: region.to_string(),
        }
    }

    #[test]
    fn zero_quantity_is_invalid() {
        let input = vec![tx("T1", 2, 10.0, "North"), tx("T2", 0, 10.0, "North")];
        let (valid, invalid, summary) = validate_and_filter(input, &FilterOptions::default());
        assert_eq!(valid.len(), 1);
        assert_eq!(invalid, 1);
        assert_eq!(summary.invalid, 1);
        assert_eq!(summary.total_input, 2);
        assert_eq!(summary.final_count, 1);
    }

    #[test]
    fn rejects_bad_prefixes_and_missing_region() {
        let mut bad_product = tx("T3", 1, 1.0, "North");
        bad_product.product_id = "X9".to_string();
        let mut bad_customer = tx("T4", 1, 1.0, "North");
        bad_customer.customer_id = "K1".to_string();
        let input = vec![
            tx("X1", 1, 1.0, "North"),
            tx("T2", 1, -1.0, "North"),
            bad_product,
            bad_customer,
            tx("T5", 1, 1.0, ""),
        ];
        let (valid, invalid, _) = validate_and_filter(input, &FilterOptions::default());
        assert!(valid.is_empty());
        assert_eq!(invalid, 5);
    }

    #[test]
    fn filters_by_region_then_amount_inclusive() {
        let input = vec![
            tx("T1", 1, 100.0, "North"),
            tx("T2", 1, 50.0, "North"),
            tx("T3", 1, 200.0, "North"),
            tx("T4", 1, 100.0, "South"),
            tx("T5", 1, 250.0, "North"),
        ];
        let filter = FilterOptions {
            region: Some("North".to_string()),
            min_amount: Some(100.0),
            max_amount: Some(200.0),
        };
        let (valid, invalid, summary) = validate_and_filter(input, &filter);
        let ids: Vec<&str> = valid.iter().map(|tx| tx.transaction_id.as_str()).collect();
        assert_eq!(ids, vec!["T1", "T3"]);
        assert_eq!(invalid, 0);
        assert_eq!(summary.filtered_by_region, 1);
        assert_eq!(summary.filtered_by_amount, 2);
        assert_eq!(summary.final_count, 2);
    }

    #[test]
    fn empty_region_filter_is_ignored() {
        let filter = FilterOptions {
            region: Some(String::new()),
            ..FilterOptions::default()
        };
        let (valid, _, summary) = validate_and_filter(vec![tx("T1", 1, 1.0, "East")], &filter);
        assert_eq!(valid.len(), 1);
        assert_eq!(summary.filtered_by_region, 0);
    }

    #[test]
    fn amount_range_handles_empty_input() {
        assert_eq!(amount_range(&[]), None);
        let range = amount_range(&[tx("T1", 2, 5.0, "N"), tx("T2", 1, 3.0, "N")]).unwrap();
        assert_eq!(range, AmountRange { min: 3.0, max: 10.0 });
    }

    #[test]
    fn regions_are_sorted_and_distinct() {
        let input = [tx("T1", 1, 1.0, "West"), tx("T2", 1, 1.0, "East"), tx("T3", 1, 1.0, "West")];
        assert_eq!(available_regions(&input), vec!["East".to_string(), "West".to_string()]);
    }
}
