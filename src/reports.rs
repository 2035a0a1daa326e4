//! Read-only aggregations over the record collections
//!
//! Everything here is a pure derivation; nothing mutates the dataset. The
//! trailing-window report takes its reference day as a parameter so callers
//! (and tests) control what "today" means.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};

use crate::models::Dataset;

/// Fixed per-sale deduction used for the net profit figure, in monetary
/// units. A sale below the overhead contributes zero, never negative.
pub const OVERHEAD_PER_SALE: f64 = 7000.0;

/// Total value of sellable stock: sum of current quantity times unit price.
pub fn inventory_value(data: &Dataset) -> f64 {
    data.inventory
        .iter()
        .map(|p| p.current_quantity as f64 * p.unit_price)
        .sum()
}

/// Sum of all sale amounts.
pub fn total_sales(data: &Dataset) -> f64 {
    data.sales.iter().map(|s| s.amount).sum()
}

/// Net profit: per sale, the amount minus the fixed overhead, floored at
/// zero.
pub fn net_profit(data: &Dataset) -> f64 {
    data.sales
        .iter()
        .map(|s| (s.amount - OVERHEAD_PER_SALE).max(0.0))
        .sum()
}

/// Units sold per calendar month, keyed `YYYY-MM`.
pub fn units_by_month(data: &Dataset) -> BTreeMap<String, i64> {
    let mut totals = BTreeMap::new();
    for sale in &data.sales {
        *totals
            .entry(sale.date.format("%Y-%m").to_string())
            .or_insert(0) += sale.quantity;
    }
    totals
}

/// Units sold per calendar day within one month.
pub fn units_by_day(data: &Dataset, year: i32, month: u32) -> BTreeMap<NaiveDate, i64> {
    let mut totals = BTreeMap::new();
    for sale in &data.sales {
        if sale.date.year() == year && sale.date.month() == month {
            *totals.entry(sale.date).or_insert(0) += sale.quantity;
        }
    }
    totals
}

/// Sale amounts per day over the trailing 30-day window ending at `today`.
pub fn sales_last_30_days(data: &Dataset, today: NaiveDate) -> BTreeMap<NaiveDate, f64> {
    let cutoff = today - Duration::days(30);
    let mut totals = BTreeMap::new();
    for sale in &data.sales {
        if sale.date >= cutoff {
            *totals.entry(sale.date).or_insert(0.0) += sale.amount;
        }
    }
    totals
}

/// Per-customer sales rollup.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CustomerSales {
    pub total_amount: f64,
    pub units: i64,
    pub credit_sales: usize,
}

/// Sales grouped by customer name: amount, units, and how many of the sales
/// were on credit.
pub fn sales_by_customer(data: &Dataset) -> BTreeMap<String, CustomerSales> {
    let mut totals: BTreeMap<String, CustomerSales> = BTreeMap::new();
    for sale in &data.sales {
        let entry = totals.entry(sale.customer_name.clone()).or_default();
        entry.total_amount += sale.amount;
        entry.units += sale.quantity;
        if sale.is_credit {
            entry.credit_sales += 1;
        }
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{new_record_id, Product, Sale};

    fn sale(date: NaiveDate, customer: &str, quantity: i64, amount: f64, is_credit: bool) -> Sale {
        Sale {
            id: new_record_id(),
            date,
            customer_name: customer.to_string(),
            product_name: "BoxA".to_string(),
            quantity,
            unit_price: amount / quantity as f64,
            amount,
            is_credit,
        }
    }

    fn day(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_inventory_value() {
        let mut data = Dataset::default();
        data.inventory.push(Product {
            name: "BoxA".to_string(),
            current_quantity: 7,
            unit_price: 1000.0,
            registered_quantity: 10,
        });
        data.inventory.push(Product {
            name: "BoxB".to_string(),
            current_quantity: 2,
            unit_price: 500.0,
            registered_quantity: 2,
        });
        // Valued at current stock, not lifetime registered.
        assert_eq!(inventory_value(&data), 8000.0);
    }

    #[test]
    fn test_total_sales_sums_amounts() {
        let mut data = Dataset::default();
        data.sales.push(sale(day(2024, 3, 1), "Alice", 3, 3000.0, false));
        data.sales.push(sale(day(2024, 3, 2), "Bob", 2, 2000.0, true));
        assert_eq!(total_sales(&data), 5000.0);
    }

    #[test]
    fn test_net_profit_floors_each_sale_at_zero() {
        let mut data = Dataset::default();
        data.sales.push(sale(day(2024, 3, 1), "Alice", 5, 5000.0, false));
        assert_eq!(net_profit(&data), 0.0);

        data.sales.push(sale(day(2024, 3, 2), "Bob", 10, 10000.0, false));
        // 5000 contributes 0, 10000 contributes 3000.
        assert_eq!(net_profit(&data), 3000.0);
    }

    #[test]
    fn test_units_by_month_groups_quantities() {
        let mut data = Dataset::default();
        data.sales.push(sale(day(2024, 2, 28), "Alice", 4, 4000.0, false));
        data.sales.push(sale(day(2024, 3, 1), "Alice", 3, 3000.0, false));
        data.sales.push(sale(day(2024, 3, 15), "Bob", 2, 2000.0, false));

        let by_month = units_by_month(&data);
        assert_eq!(by_month.get("2024-02"), Some(&4));
        assert_eq!(by_month.get("2024-03"), Some(&5));
    }

    #[test]
    fn test_units_by_day_filters_to_month() {
        let mut data = Dataset::default();
        data.sales.push(sale(day(2024, 3, 1), "Alice", 3, 3000.0, false));
        data.sales.push(sale(day(2024, 3, 1), "Bob", 1, 1000.0, false));
        data.sales.push(sale(day(2024, 4, 1), "Bob", 9, 9000.0, false));

        let by_day = units_by_day(&data, 2024, 3);
        assert_eq!(by_day.len(), 1);
        assert_eq!(by_day.get(&day(2024, 3, 1)), Some(&4));
    }

    #[test]
    fn test_sales_last_30_days_window() {
        let today = day(2024, 3, 31);
        let mut data = Dataset::default();
        data.sales.push(sale(day(2024, 3, 30), "Alice", 1, 1000.0, false));
        data.sales.push(sale(day(2024, 3, 1), "Alice", 1, 2000.0, false));
        data.sales.push(sale(day(2024, 1, 15), "Bob", 1, 9000.0, false));

        let window = sales_last_30_days(&data, today);
        assert_eq!(window.len(), 2);
        assert_eq!(window.get(&day(2024, 3, 30)), Some(&1000.0));
        assert!(!window.contains_key(&day(2024, 1, 15)));
    }

    #[test]
    fn test_sales_by_customer_rollup() {
        let mut data = Dataset::default();
        data.sales.push(sale(day(2024, 3, 1), "Alice", 3, 3000.0, false));
        data.sales.push(sale(day(2024, 3, 2), "Alice", 2, 2000.0, true));
        data.sales.push(sale(day(2024, 3, 3), "Bob", 1, 1000.0, true));

        let rollup = sales_by_customer(&data);
        let alice = rollup.get("Alice").unwrap();
        assert_eq!(alice.total_amount, 5000.0);
        assert_eq!(alice.units, 5);
        assert_eq!(alice.credit_sales, 1);

        let bob = rollup.get("Bob").unwrap();
        assert_eq!(bob.credit_sales, 1);
    }

    #[test]
    fn test_empty_dataset_aggregations() {
        let data = Dataset::default();
        assert_eq!(inventory_value(&data), 0.0);
        assert_eq!(total_sales(&data), 0.0);
        assert_eq!(net_profit(&data), 0.0);
        assert!(units_by_month(&data).is_empty());
        assert!(sales_by_customer(&data).is_empty());
    }
}
