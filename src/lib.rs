//! Retail Ledger - Inventory, Sales & Customer Credit
//!
//! Single-operator tracker for a small retail operation: products with
//! current and lifetime stock counters, sales with captured prices, and
//! customer credit lines, all persisted as flat CSV files that are loaded
//! and rewritten together.

pub mod auth;
pub mod credit;
pub mod customers;
pub mod error;
pub mod inventory;
pub mod ledger;
pub mod models;
pub mod reports;
pub mod sales;
pub mod store;

// Re-export commonly used items
pub use auth::{confirm_reversal, verify_operator, ReversalToken, Session};
pub use error::{LedgerError, Result};
pub use inventory::LOW_STOCK_THRESHOLD;
pub use ledger::Ledger;
pub use models::{Credential, CreditLine, Customer, Dataset, Product, Sale};
pub use reports::OVERHEAD_PER_SALE;
pub use sales::ReversalSummary;
pub use store::Store;
