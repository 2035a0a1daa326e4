//! Ledger façade: the interface the presentation layer calls
//!
//! Owns the store and the loaded dataset. Every mutating operation applies
//! its whole change in memory first and then persists all four collections
//! as one batch; if the operation fails, nothing is written, so the
//! previously persisted state stays intact. A failed save surfaces the
//! persistence error without retry.

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};

use crate::auth::ReversalToken;
use crate::error::Result;
use crate::models::{Credential, CreditLine, Customer, Dataset, Product, Sale};
use crate::sales::ReversalSummary;
use crate::store::Store;
use crate::{credit, customers, inventory, sales};

pub struct Ledger {
    store: Store,
    data: Dataset,
}

impl Ledger {
    /// Open the data directory and load all four collections.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let store = Store::open(dir)?;
        let data = store.load_all()?;
        Ok(Self { store, data })
    }

    pub fn dir(&self) -> &Path {
        self.store.dir()
    }

    /// The loaded collections, for read-only views and aggregations.
    pub fn data(&self) -> &Dataset {
        &self.data
    }

    /// Re-read all collections from disk, discarding the in-memory state.
    pub fn reload(&mut self) -> Result<()> {
        self.data = self.store.load_all()?;
        Ok(())
    }

    pub fn credentials(&self) -> Result<Vec<Credential>> {
        self.store.load_credentials()
    }

    pub fn register_product(
        &mut self,
        name: &str,
        initial_quantity: i64,
        unit_price: f64,
    ) -> Result<Product> {
        let product = inventory::register_product(&mut self.data, name, initial_quantity, unit_price)?;
        self.store.save_all(&self.data)?;
        Ok(product)
    }

    pub fn restock(
        &mut self,
        name: &str,
        added_quantity: i64,
        new_unit_price: f64,
    ) -> Result<Product> {
        let product = inventory::restock(&mut self.data, name, added_quantity, new_unit_price)?;
        self.store.save_all(&self.data)?;
        Ok(product)
    }

    pub fn remove_product(&mut self, name: &str) -> Result<()> {
        inventory::remove_product(&mut self.data, name)?;
        self.store.save_all(&self.data)
    }

    pub fn register_customer(
        &mut self,
        name: &str,
        id_number: &str,
        phone: &str,
    ) -> Result<Customer> {
        let customer = customers::register_customer(&mut self.data, name, id_number, phone)?;
        self.store.save_all(&self.data)?;
        Ok(customer)
    }

    pub fn remove_customer(&mut self, name: &str) -> Result<()> {
        customers::remove_customer(&mut self.data, name)?;
        self.store.save_all(&self.data)
    }

    pub fn record_sale(
        &mut self,
        date: NaiveDate,
        customer_name: &str,
        product_name: &str,
        quantity: i64,
        is_credit: bool,
    ) -> Result<Sale> {
        let sale = sales::record_sale(
            &mut self.data,
            date,
            customer_name,
            product_name,
            quantity,
            is_credit,
        )?;
        self.store.save_all(&self.data)?;
        Ok(sale)
    }

    /// Reverse a batch of sales. The token proves the operator passed the
    /// confirmation gate; there is no other way to reach this mutation.
    pub fn reverse_sales(
        &mut self,
        sale_ids: &[String],
        _token: &ReversalToken,
    ) -> Result<ReversalSummary> {
        let summary = sales::reverse_sales(&mut self.data, sale_ids)?;
        self.store.save_all(&self.data)?;
        Ok(summary)
    }

    pub fn mark_paid(&mut self, credit_id: &str) -> Result<CreditLine> {
        let paid = credit::mark_paid(&mut self.data, credit_id, Local::now().naive_local())?;
        self.store.save_all(&self.data)?;
        Ok(paid)
    }
}
