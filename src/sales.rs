//! Sales engine: recording and reversing sales
//!
//! A sale captures the product's unit price at the moment it is recorded
//! and decrements the product's current quantity. A credit sale also opens
//! exactly one linked credit line. Reversal restores stock, removes linked
//! credit lines, and deletes the sale rows, all computed in memory before
//! the caller persists.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::error::{LedgerError, Result};
use crate::models::{new_record_id, CreditLine, Dataset, Sale};

/// Record a sale. The customer and product must resolve; the quantity must
/// be positive and not exceed the product's current stock. On the
/// insufficient-stock path nothing is mutated.
pub fn record_sale(
    data: &mut Dataset,
    date: NaiveDate,
    customer_name: &str,
    product_name: &str,
    quantity: i64,
    is_credit: bool,
) -> Result<Sale> {
    if quantity <= 0 {
        return Err(LedgerError::Validation(format!(
            "sale quantity must be positive, got {}",
            quantity
        )));
    }
    if data.find_customer(customer_name).is_none() {
        return Err(LedgerError::NotFound(format!("customer '{}'", customer_name)));
    }

    let product = data
        .find_product_mut(product_name)
        .ok_or_else(|| LedgerError::NotFound(format!("product '{}'", product_name)))?;

    if product.current_quantity < quantity {
        return Err(LedgerError::InsufficientStock {
            product: product_name.to_string(),
            requested: quantity,
            available: product.current_quantity,
        });
    }

    // Price captured at call time; the amount is fixed from here on.
    let unit_price = product.unit_price;
    let amount = quantity as f64 * unit_price;
    product.current_quantity -= quantity;

    let sale = Sale {
        id: new_record_id(),
        date,
        customer_name: customer_name.to_string(),
        product_name: product_name.to_string(),
        quantity,
        unit_price,
        amount,
        is_credit,
    };
    data.sales.push(sale.clone());

    if is_credit {
        data.credits.push(CreditLine {
            id: new_record_id(),
            sale_id: Some(sale.id.clone()),
            customer_name: customer_name.to_string(),
            amount,
            opening_date: date,
            paid: false,
            payment_date: None,
        });
    }

    log::info!(
        "Recorded sale {}: {} x '{}' to '{}' for {}{}",
        sale.id,
        quantity,
        product_name,
        customer_name,
        amount,
        if is_credit { " (credit)" } else { "" }
    );
    Ok(sale)
}

/// Outcome of a batch reversal.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ReversalSummary {
    pub sales_removed: usize,
    pub credits_removed: usize,
    /// Products referenced by reversed sales that no longer exist; their
    /// stock restoration was skipped.
    pub missing_products: Vec<String>,
}

/// Reverse a batch of sales. Every referenced id must resolve before any
/// mutation happens. For each sale: the product's current quantity is
/// restored (skipped with a warning when the product row is gone), linked
/// credit lines are removed, and the sale row is deleted.
///
/// Credit lines written by this engine are matched by their stored sale id.
/// Legacy lines without one fall back to the (customer, amount, opening
/// date) heuristic, which can over-delete when two credit sales share all
/// three values. Known limitation carried over from the original records.
pub fn reverse_sales(data: &mut Dataset, sale_ids: &[String]) -> Result<ReversalSummary> {
    let ids: HashSet<&str> = sale_ids.iter().map(String::as_str).collect();

    for id in &ids {
        if data.find_sale(id).is_none() {
            return Err(LedgerError::NotFound(format!("sale '{}'", id)));
        }
    }

    let mut summary = ReversalSummary::default();
    let reversed: Vec<Sale> = data
        .sales
        .iter()
        .filter(|s| ids.contains(s.id.as_str()))
        .cloned()
        .collect();

    // Restore stock.
    for sale in &reversed {
        match data.find_product_mut(&sale.product_name) {
            Some(product) => product.current_quantity += sale.quantity,
            None => {
                log::warn!(
                    "Product '{}' no longer exists; skipping stock restoration for sale {}",
                    sale.product_name,
                    sale.id
                );
                summary.missing_products.push(sale.product_name.clone());
            }
        }
    }

    // Remove linked credit lines.
    let credit_sales: Vec<&Sale> = reversed.iter().filter(|s| s.is_credit).collect();
    let before = data.credits.len();
    data.credits.retain(|credit| match &credit.sale_id {
        Some(sale_id) => !ids.contains(sale_id.as_str()),
        None => !credit_sales.iter().any(|sale| {
            credit.customer_name == sale.customer_name
                && credit.amount == sale.amount
                && credit.opening_date == sale.date
        }),
    });
    summary.credits_removed = before - data.credits.len();

    // Remove the sale rows.
    let before = data.sales.len();
    data.sales.retain(|s| !ids.contains(s.id.as_str()));
    summary.sales_removed = before - data.sales.len();

    log::info!(
        "Reversed {} sale(s), removed {} credit line(s)",
        summary.sales_removed,
        summary.credits_removed
    );
    Ok(summary)
}
