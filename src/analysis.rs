use crate::models::Transaction;
use crate::util::{percentage, round2, safe_ratio};
use std::collections::{BTreeSet, HashMap, HashSet};

#[derive(Debug, Clone, PartialEq)]
pub struct RegionSales {
    pub region: String,
    pub total_sales: f64,
    pub transaction_count: usize,
    /// Share of total revenue, rounded to two decimals.
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductSales {
    pub name: String,
    /// Widened so that summing any number of `i64` quantities cannot overflow.
    pub total_quantity: i128,
    pub total_revenue: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CustomerStats {
    pub customer_id: String,
    pub total_spent: f64,
    pub purchase_count: usize,
    pub avg_order_value: f64,
    pub products_bought: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailySales {
    pub date: String,
    pub revenue: f64,
    pub transaction_count: usize,
    pub unique_customers: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PeakDay {
    pub date: String,
    pub revenue: f64,
    pub transaction_count: usize,
}

/// Every aggregate the report needs, computed from one transaction set.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesAnalysis {
    pub total_revenue: f64,
    pub transaction_count: usize,
    pub regions: Vec<RegionSales>,
    pub top_products: Vec<ProductSales>,
    pub customers: Vec<CustomerStats>,
    pub daily: Vec<DailySales>,
    pub peak_day: Option<PeakDay>,
    pub low_performers: Vec<ProductSales>,
    pub region_averages: Vec<(String, f64)>,
}

pub fn analyze(transactions: &[Transaction], top_n: usize, low_threshold: i64) -> SalesAnalysis {
    SalesAnalysis {
        total_revenue: calculate_total_revenue(transactions),
        transaction_count: transactions.len(),
        regions: region_wise_sales(transactions),
        top_products: top_selling_products(transactions, top_n),
        customers: customer_analysis(transactions),
        daily: daily_sales_trend(transactions),
        peak_day: find_peak_sales_day(transactions),
        low_performers: low_performing_products(transactions, low_threshold),
        region_averages: average_transaction_value_by_region(transactions),
    }
}

/// Groups by key in order of first appearance, folding each transaction into
/// the accumulator for its key.
fn group_by<V, K, F>(transactions: &[Transaction], key: K, mut fold: F) -> Vec<(String, V)>
where
    V: Default,
    K: Fn(&Transaction) -> &str,
    F: FnMut(&mut V, &Transaction),
{
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(String, V)> = Vec::new();
    for tx in transactions {
        let name = key(tx);
        let slot = *index.entry(name).or_insert_with(|| {
            groups.push((name.to_string(), V::default()));
            groups.len() - 1
        });
        fold(&mut groups[slot].1, tx);
    }
    groups
}

/// Full-precision sum of every transaction amount.
pub fn calculate_total_revenue(transactions: &[Transaction]) -> f64 {
    transactions.iter().map(Transaction::amount).sum()
}

pub fn region_wise_sales(transactions: &[Transaction]) -> Vec<RegionSales> {
    let total_revenue = calculate_total_revenue(transactions);
    let groups = group_by(
        transactions,
        |tx| tx.region.as_str(),
        |acc: &mut (f64, usize), tx| {
            acc.0 += tx.amount();
            acc.1 += 1;
        },
    );

    let mut regions: Vec<RegionSales> = groups
        .into_iter()
        .map(|(region, (total_sales, transaction_count))| RegionSales {
            region,
            total_sales,
            transaction_count,
            percentage: round2(percentage(total_sales, total_revenue)),
        })
        .collect();
    regions.sort_by(|a, b| b.total_sales.total_cmp(&a.total_sales));
    regions
}

/// Quantity and revenue per product name, in order of first appearance.
pub fn product_summary(transactions: &[Transaction]) -> Vec<ProductSales> {
    group_by(
        transactions,
        |tx| tx.product_name.as_str(),
        |acc: &mut (i128, f64), tx| {
            acc.0 += i128::from(tx.quantity);
            acc.1 += tx.amount();
        },
    )
    .into_iter()
    .map(|(name, (total_quantity, total_revenue))| ProductSales {
        name,
        total_quantity,
        total_revenue,
    })
    .collect()
}

pub fn top_selling_products(transactions: &[Transaction], n: usize) -> Vec<ProductSales> {
    let mut products = product_summary(transactions);
    products.sort_by(|a, b| b.total_quantity.cmp(&a.total_quantity));
    products
        .into_iter()
        .take(n)
        .map(|product| ProductSales {
            total_revenue: round2(product.total_revenue),
            ..product
        })
        .collect()
}

pub fn customer_analysis(transactions: &[Transaction]) -> Vec<CustomerStats> {
    #[derive(Default)]
    struct Acc {
        spent: f64,
        count: usize,
        products: BTreeSet<String>,
    }

    let groups = group_by(
        transactions,
        |tx| tx.customer_id.as_str(),
        |acc: &mut Acc, tx| {
            acc.spent += tx.amount();
            acc.count += 1;
            acc.products.insert(tx.product_name.clone());
        },
    );

    let mut customers: Vec<CustomerStats> = groups
        .into_iter()
        .map(|(customer_id, acc)| CustomerStats {
            customer_id,
            total_spent: acc.spent,
            purchase_count: acc.count,
            avg_order_value: round2(safe_ratio(acc.spent, acc.count as f64)),
            products_bought: acc.products,
        })
        .collect();
    customers.sort_by(|a, b| b.total_spent.total_cmp(&a.total_spent));
    customers
}

/// Revenue, transaction count and distinct customers per date, oldest first.
pub fn daily_sales_trend(transactions: &[Transaction]) -> Vec<DailySales> {
    #[derive(Default)]
    struct Acc<'a> {
        revenue: f64,
        count: usize,
        customers: HashSet<&'a str>,
    }

    let mut groups: Vec<(String, Acc<'_>)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for tx in transactions {
        let slot = *index.entry(tx.date.as_str()).or_insert_with(|| {
            groups.push((tx.date.clone(), Acc::default()));
            groups.len() - 1
        });
        let acc = &mut groups[slot].1;
        acc.revenue += tx.amount();
        acc.count += 1;
        acc.customers.insert(tx.customer_id.as_str());
    }

    let mut daily: Vec<DailySales> = groups
        .into_iter()
        .map(|(date, acc)| DailySales {
            date,
            revenue: round2(acc.revenue),
            transaction_count: acc.count,
            unique_customers: acc.customers.len(),
        })
        .collect();
    daily.sort_by(|a, b| a.date.cmp(&b.date));
    daily
}

/// Date with the highest revenue. Days are scanned in order of first
/// appearance against a negative-infinity baseline, so the earliest-seen day
/// wins a tie and a set of non-positive days still yields a peak.
pub fn find_peak_sales_day(transactions: &[Transaction]) -> Option<PeakDay> {
    let groups = group_by(
        transactions,
        |tx| tx.date.as_str(),
        |acc: &mut (f64, usize), tx| {
            acc.0 += tx.amount();
            acc.1 += 1;
        },
    );

    let mut peak: Option<(String, f64, usize)> = None;
    let mut peak_revenue = f64::NEG_INFINITY;
    for (date, (revenue, count)) in groups {
        if revenue > peak_revenue {
            peak_revenue = revenue;
            peak = Some((date, revenue, count));
        }
    }

    peak.map(|(date, revenue, transaction_count)| PeakDay {
        date,
        revenue: round2(revenue),
        transaction_count,
    })
}

/// Every product whose total quantity is below `threshold`, smallest first.
pub fn low_performing_products(transactions: &[Transaction], threshold: i64) -> Vec<ProductSales> {
    let threshold = i128::from(threshold);
    let mut low: Vec<ProductSales> = product_summary(transactions)
        .into_iter()
        .filter(|product| product.total_quantity < threshold)
        .map(|product| ProductSales {
            total_revenue: round2(product.total_revenue),
            ..product
        })
        .collect();
    low.sort_by_key(|product| product.total_quantity);
    low
}

/// Mean transaction amount per region, in order of first appearance.
pub fn average_transaction_value_by_region(transactions: &[Transaction]) -> Vec<(String, f64)> {
    group_by(
        transactions,
        |tx| tx.region.as_str(),
        |acc: &mut (f64, usize), tx| {
            acc.0 += tx.amount();
            acc.1 += 1;
        },
    )
    .into_iter()
    .map(|(region, (revenue, count))| (region, safe_ratio(revenue, count as f64)))
    .collect()
}
