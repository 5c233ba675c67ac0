//! Property tests for the aggregation engine.

use proptest::prelude::*;
use sales_analytics::analysis::{
    calculate_total_revenue, low_performing_products, product_summary, region_wise_sales,
    top_selling_products,
};
use sales_analytics::enrich::{enrich_sales_data, load_enriched_data, save_enriched_data};
use sales_analytics::Transaction;
use std::collections::HashMap;

fn arb_transaction() -> impl Strategy<Value = Transaction> {
    (
        1u32..500,
        1u32..29,
        1u32..20,
        prop::sample::select(vec!["Laptop", "Mouse", "Webcam", "Monitor", "Cable"]),
        1i64..60,
        1u32..1_000_000,
        1u32..15,
        prop::sample::select(vec!["North", "South", "East", "West"]),
    )
        .prop_map(|(id, day, product, name, quantity, cents, customer, region)| Transaction {
            transaction_id: format!("T{id:03}"),
            date: format!("2024-12-{day:02}"),
            product_id: format!("P{}", 100 + product),
            product_name: name.to_string(),
            quantity,
            unit_price: f64::from(cents) / 100.0,
            customer_id: format!("C{customer:03}"),
            region: region.to_string(),
        })
}

fn arb_transactions() -> impl Strategy<Value = Vec<Transaction>> {
    prop::collection::vec(arb_transaction(), 0..40)
}

proptest! {
    #[test]
    fn region_sales_sum_to_total(txs in arb_transactions()) {
        let total = calculate_total_revenue(&txs);
        let regions = region_wise_sales(&txs);
        let region_sum: f64 = regions.iter().map(|r| r.total_sales).sum();
        prop_assert!((region_sum - total).abs() <= 1e-6 * total.max(1.0));

        let count: usize = regions.iter().map(|r| r.transaction_count).sum();
        prop_assert_eq!(count, txs.len());
        prop_assert!(regions.windows(2).all(|w| w[0].total_sales >= w[1].total_sales));
    }

    #[test]
    fn top_products_bounded_and_sorted(txs in arb_transactions(), n in 0usize..8) {
        let top = top_selling_products(&txs, n);
        let all = product_summary(&txs);
        prop_assert!(top.len() <= n);
        prop_assert_eq!(top.len(), n.min(all.len()));
        prop_assert!(top.windows(2).all(|w| w[0].total_quantity >= w[1].total_quantity));
        for product in &top {
            let full = all.iter().find(|p| p.name == product.name);
            prop_assert!(full.is_some_and(|p| p.total_quantity == product.total_quantity));
        }
    }

    #[test]
    fn low_performers_are_exactly_below_threshold(txs in arb_transactions(), threshold in 0i64..120) {
        let low = low_performing_products(&txs, threshold);
        let expected = product_summary(&txs)
            .iter()
            .filter(|p| p.total_quantity < i128::from(threshold))
            .count();
        prop_assert_eq!(low.len(), expected);
        prop_assert!(low.iter().all(|p| p.total_quantity < i128::from(threshold)));
        prop_assert!(low.windows(2).all(|w| w[0].total_quantity <= w[1].total_quantity));
    }

    #[test]
    fn enriched_file_round_trips_core_fields(txs in arb_transactions()) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("enriched.txt");
        let enriched = enrich_sales_data(&txs, &HashMap::new());
        save_enriched_data(&path, &enriched).unwrap();

        let loaded = load_enriched_data(&path).unwrap();
        let core: Vec<Transaction> = loaded.into_iter().map(|tx| tx.transaction).collect();
        prop_assert_eq!(core, txs);
    }
}
