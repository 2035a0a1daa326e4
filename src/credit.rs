//! Credit ledger: outstanding balances and payments
//!
//! Paying is one-directional: once a line is paid there is no un-paying.
//! Marking an already-paid line simply refreshes the payment date, matching
//! the original records' behavior.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;

use crate::error::{LedgerError, Result};
use crate::models::{CreditLine, Dataset};

/// Mark a credit line as paid at the given time. Idempotent with refresh:
/// an already-paid line stays paid and gets the new payment date.
pub fn mark_paid(data: &mut Dataset, credit_id: &str, now: NaiveDateTime) -> Result<CreditLine> {
    let credit = data
        .find_credit_mut(credit_id)
        .ok_or_else(|| LedgerError::NotFound(format!("credit line '{}'", credit_id)))?;

    credit.paid = true;
    credit.payment_date = Some(now);
    log::info!(
        "Credit line {} for '{}' marked paid ({})",
        credit.id,
        credit.customer_name,
        credit.amount
    );
    Ok(credit.clone())
}

/// Sum of all unpaid credit amounts.
pub fn outstanding_total(data: &Dataset) -> f64 {
    data.credits
        .iter()
        .filter(|c| !c.paid)
        .map(|c| c.amount)
        .sum()
}

/// Unpaid credit amounts grouped by customer name.
pub fn outstanding_by_customer(data: &Dataset) -> BTreeMap<String, f64> {
    let mut totals = BTreeMap::new();
    for credit in data.credits.iter().filter(|c| !c.paid) {
        *totals.entry(credit.customer_name.clone()).or_insert(0.0) += credit.amount;
    }
    totals
}
