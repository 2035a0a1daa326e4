//! Inventory ledger: product registration, restock, removal, low stock
//!
//! Each product carries two counters. The current quantity is what can be
//! sold right now; the registered quantity is the lifetime total of units
//! ever received. Sales touch only the former, so the registered counter is
//! not reconciled against sales.

use crate::error::{LedgerError, Result};
use crate::models::{Dataset, Product};

/// Products at or below this stock level show up in the low-stock alert.
pub const LOW_STOCK_THRESHOLD: i64 = 2;

/// Register a new product. Initial current and registered quantities are
/// both the initial quantity. Product names are unique; registering an
/// existing name is rejected instead of appending a duplicate row.
pub fn register_product(
    data: &mut Dataset,
    name: &str,
    initial_quantity: i64,
    unit_price: f64,
) -> Result<Product> {
    let name = name.trim();
    if name.is_empty() {
        return Err(LedgerError::Validation("product name cannot be empty".to_string()));
    }
    if unit_price <= 0.0 {
        return Err(LedgerError::Validation(format!(
            "unit price must be positive, got {}",
            unit_price
        )));
    }
    if initial_quantity < 0 {
        return Err(LedgerError::Validation(format!(
            "initial quantity cannot be negative, got {}",
            initial_quantity
        )));
    }
    if data.find_product(name).is_some() {
        return Err(LedgerError::Validation(format!(
            "product '{}' is already registered",
            name
        )));
    }

    let product = Product {
        name: name.to_string(),
        current_quantity: initial_quantity,
        unit_price,
        registered_quantity: initial_quantity,
    };
    data.inventory.push(product.clone());
    log::info!(
        "Registered product '{}' with {} units at {}",
        name,
        initial_quantity,
        unit_price
    );
    Ok(product)
}

/// Add units to an existing product. Both counters grow by the added
/// quantity; the unit price is overwritten unconditionally with the new one.
pub fn restock(
    data: &mut Dataset,
    name: &str,
    added_quantity: i64,
    new_unit_price: f64,
) -> Result<Product> {
    if added_quantity <= 0 {
        return Err(LedgerError::Validation(format!(
            "added quantity must be positive, got {}",
            added_quantity
        )));
    }
    if new_unit_price < 0.0 {
        return Err(LedgerError::Validation(format!(
            "unit price cannot be negative, got {}",
            new_unit_price
        )));
    }

    let product = data
        .find_product_mut(name)
        .ok_or_else(|| LedgerError::NotFound(format!("product '{}'", name)))?;

    product.current_quantity += added_quantity;
    product.registered_quantity += added_quantity;
    product.unit_price = new_unit_price;
    log::info!(
        "Restocked '{}': +{} units, price now {}",
        name,
        added_quantity,
        new_unit_price
    );
    Ok(product.clone())
}

/// Delete a product row. Historical sales referencing it are left alone;
/// the dangling reference is a display concern.
pub fn remove_product(data: &mut Dataset, name: &str) -> Result<()> {
    let index = data
        .inventory
        .iter()
        .position(|p| p.name == name)
        .ok_or_else(|| LedgerError::NotFound(format!("product '{}'", name)))?;
    data.inventory.remove(index);
    log::info!("Removed product '{}'", name);
    Ok(())
}

/// Products with current quantity at or below the threshold, in insertion
/// order.
pub fn low_stock(data: &Dataset, threshold: i64) -> Vec<&Product> {
    data.inventory
        .iter()
        .filter(|p| p.current_quantity <= threshold)
        .collect()
}
