//! Customer registry
//!
//! Customers are looked up by name elsewhere in the system, so names are
//! unique. Deleting a customer does not cascade: past sales and credit
//! lines keep referencing the name.

use crate::error::{LedgerError, Result};
use crate::models::{Customer, Dataset};

/// Register a new customer. Name and identification number are required;
/// phone is free text and may repeat.
pub fn register_customer(
    data: &mut Dataset,
    name: &str,
    id_number: &str,
    phone: &str,
) -> Result<Customer> {
    let name = name.trim();
    if name.is_empty() {
        return Err(LedgerError::Validation("customer name cannot be empty".to_string()));
    }
    if id_number.trim().is_empty() {
        return Err(LedgerError::Validation(
            "customer identification number cannot be empty".to_string(),
        ));
    }
    if data.find_customer(name).is_some() {
        return Err(LedgerError::Validation(format!(
            "customer '{}' is already registered",
            name
        )));
    }

    let customer = Customer {
        name: name.to_string(),
        id_number: id_number.trim().to_string(),
        phone: phone.trim().to_string(),
    };
    data.customers.push(customer.clone());
    log::info!("Registered customer '{}'", name);
    Ok(customer)
}

/// Delete a customer row. Sales and credits referencing the name are left
/// untouched.
pub fn remove_customer(data: &mut Dataset, name: &str) -> Result<()> {
    let index = data
        .customers
        .iter()
        .position(|c| c.name == name)
        .ok_or_else(|| LedgerError::NotFound(format!("customer '{}'", name)))?;
    data.customers.remove(index);
    log::info!("Removed customer '{}'", name);
    Ok(())
}
