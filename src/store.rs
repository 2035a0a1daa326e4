//! Record store: CSV persistence for the four record collections
//!
//! Each collection lives in one flat CSV file inside the data directory.
//! Loads backfill columns that older files are missing; saves rewrite every
//! file through a temp-file-then-rename replace so a crash never leaves a
//! truncated collection behind. A lock file keeps the directory
//! single-writer for the lifetime of the `Store`.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::auth::{DEFAULT_OPERATOR, DEFAULT_PASSWORD};
use crate::error::{LedgerError, Result};
use crate::models::{new_record_id, Credential, CreditLine, Customer, Dataset, Product, Sale};

const INVENTORY_FILE: &str = "inventory.csv";
const CUSTOMERS_FILE: &str = "customers.csv";
const SALES_FILE: &str = "sales.csv";
const CREDITS_FILE: &str = "credits.csv";
const CREDENTIALS_FILE: &str = "credentials.csv";
const LOCK_FILE: &str = ".lock";

/// Exclusive marker file inside the data directory. Created on open,
/// removed on drop.
#[derive(Debug)]
struct LockFile {
    path: PathBuf,
}

impl LockFile {
    fn acquire(path: PathBuf) -> Result<Self> {
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(_) => Ok(Self { path }),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                Err(LedgerError::StoreLocked(path.display().to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl Drop for LockFile {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            log::warn!("Failed to remove lock file {}: {}", self.path.display(), e);
        }
    }
}

/// Handle on a data directory holding the five CSV files.
#[derive(Debug)]
pub struct Store {
    dir: PathBuf,
    _lock: LockFile,
}

impl Store {
    /// Open a data directory, creating it if needed. Acquires the
    /// single-writer lock and bootstraps the credentials file with the
    /// default operator row on first run.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        let lock = LockFile::acquire(dir.join(LOCK_FILE))?;
        let store = Self { dir, _lock: lock };
        store.bootstrap_credentials()?;
        Ok(store)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load all four record collections. Missing files yield empty
    /// collections; missing columns are backfilled with their defaults.
    pub fn load_all(&self) -> Result<Dataset> {
        let inventory = read_records::<InventoryRow>(&self.dir.join(INVENTORY_FILE))?
            .into_iter()
            .map(InventoryRow::into_product)
            .collect();
        let customers = read_records::<Customer>(&self.dir.join(CUSTOMERS_FILE))?;
        let sales = read_records::<SaleRow>(&self.dir.join(SALES_FILE))?
            .into_iter()
            .map(SaleRow::into_sale)
            .collect();
        let credits = read_records::<CreditRow>(&self.dir.join(CREDITS_FILE))?
            .into_iter()
            .map(CreditRow::into_credit_line)
            .collect();

        Ok(Dataset {
            inventory,
            customers,
            sales,
            credits,
        })
    }

    /// Persist all four record collections as one batch. Each file is
    /// replaced atomically; a failure surfaces immediately, without retry.
    pub fn save_all(&self, data: &Dataset) -> Result<()> {
        write_records(&self.dir.join(INVENTORY_FILE), &data.inventory)?;
        write_records(&self.dir.join(CUSTOMERS_FILE), &data.customers)?;
        write_records(&self.dir.join(SALES_FILE), &data.sales)?;
        write_records(&self.dir.join(CREDITS_FILE), &data.credits)?;
        log::debug!(
            "Saved {} products, {} customers, {} sales, {} credits to {}",
            data.inventory.len(),
            data.customers.len(),
            data.sales.len(),
            data.credits.len(),
            self.dir.display()
        );
        Ok(())
    }

    /// Load the operator credential rows.
    pub fn load_credentials(&self) -> Result<Vec<Credential>> {
        read_records(&self.dir.join(CREDENTIALS_FILE))
    }

    /// Create the credentials file with the fixed default operator if it
    /// does not exist yet.
    fn bootstrap_credentials(&self) -> Result<()> {
        let path = self.dir.join(CREDENTIALS_FILE);
        if path.exists() {
            return Ok(());
        }
        let default_row = Credential {
            username: DEFAULT_OPERATOR.to_string(),
            password_hash: crate::auth::sha256_hex(DEFAULT_PASSWORD),
        };
        write_records(&path, &[default_row])?;
        log::info!("Bootstrapped credentials file for '{}'", DEFAULT_OPERATOR);
        Ok(())
    }
}

fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut records = Vec::new();
    for result in rdr.deserialize() {
        records.push(result?);
    }
    Ok(records)
}

fn write_records<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    let tmp = path.with_extension("csv.tmp");
    {
        let mut wtr = csv::Writer::from_path(&tmp)?;
        for record in records {
            wtr.serialize(record)?;
        }
        wtr.flush()?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Inventory row as found on disk. Files written before the price and
/// lifetime-counter columns existed lack them; they default to 0 and the
/// current quantity respectively.
#[derive(Debug, Deserialize)]
struct InventoryRow {
    name: String,
    #[serde(rename = "currentQuantity")]
    current_quantity: i64,
    #[serde(rename = "unitPrice", default)]
    unit_price: Option<f64>,
    #[serde(rename = "registeredQuantity", default)]
    registered_quantity: Option<i64>,
}

impl InventoryRow {
    fn into_product(self) -> Product {
        Product {
            registered_quantity: self.registered_quantity.unwrap_or(self.current_quantity),
            name: self.name,
            current_quantity: self.current_quantity,
            unit_price: self.unit_price.unwrap_or(0.0),
        }
    }
}

/// Sale row as found on disk. Rows without an `id` get a fresh one; the id
/// becomes stable once the collection is saved again.
#[derive(Debug, Deserialize)]
struct SaleRow {
    #[serde(default)]
    id: Option<String>,
    date: NaiveDate,
    #[serde(rename = "customerName")]
    customer_name: String,
    #[serde(rename = "productName")]
    product_name: String,
    quantity: i64,
    #[serde(rename = "unitPrice", default)]
    unit_price: Option<f64>,
    amount: f64,
    #[serde(rename = "isCredit", default)]
    is_credit: Option<bool>,
}

impl SaleRow {
    fn into_sale(self) -> Sale {
        Sale {
            id: self.id.filter(|id| !id.is_empty()).unwrap_or_else(new_record_id),
            date: self.date,
            customer_name: self.customer_name,
            product_name: self.product_name,
            quantity: self.quantity,
            unit_price: self.unit_price.unwrap_or(0.0),
            amount: self.amount,
            is_credit: self.is_credit.unwrap_or(false),
        }
    }
}

/// Credit row as found on disk. Legacy rows carry neither their own id nor
/// the originating sale's; the latter stays absent so reversal falls back to
/// heuristic matching for them.
#[derive(Debug, Deserialize)]
struct CreditRow {
    #[serde(default)]
    id: Option<String>,
    #[serde(rename = "saleId", default)]
    sale_id: Option<String>,
    #[serde(rename = "customerName")]
    customer_name: String,
    amount: f64,
    #[serde(rename = "openingDate")]
    opening_date: NaiveDate,
    paid: bool,
    #[serde(rename = "paymentDate", default)]
    payment_date: Option<NaiveDateTime>,
}

impl CreditRow {
    fn into_credit_line(self) -> CreditLine {
        CreditLine {
            id: self.id.filter(|id| !id.is_empty()).unwrap_or_else(new_record_id),
            sale_id: self.sale_id.filter(|id| !id.is_empty()),
            customer_name: self.customer_name,
            amount: self.amount,
            opening_date: self.opening_date,
            paid: self.paid,
            payment_date: self.payment_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &Path, name: &str, content: &str) {
        let mut f = fs::File::create(dir.join(name)).unwrap();
        write!(f, "{}", content).unwrap();
    }

    #[test]
    fn test_open_creates_directory_and_credentials() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("data");
        let store = Store::open(&dir).unwrap();

        assert!(dir.join(CREDENTIALS_FILE).exists());
        let creds = store.load_credentials().unwrap();
        assert_eq!(creds.len(), 1);
        assert_eq!(creds[0].username, DEFAULT_OPERATOR);
        assert_eq!(creds[0].password_hash, crate::auth::sha256_hex(DEFAULT_PASSWORD));
    }

    #[test]
    fn test_open_does_not_overwrite_existing_credentials() {
        let tmp = TempDir::new().unwrap();
        write_file(
            tmp.path(),
            CREDENTIALS_FILE,
            "username,passwordHash\nother,abc123\n",
        );
        let store = Store::open(tmp.path()).unwrap();
        let creds = store.load_credentials().unwrap();
        assert_eq!(creds.len(), 1);
        assert_eq!(creds[0].username, "other");
    }

    #[test]
    fn test_lock_is_exclusive_and_released_on_drop() {
        let tmp = TempDir::new().unwrap();
        let store = Store::open(tmp.path()).unwrap();

        match Store::open(tmp.path()) {
            Err(LedgerError::StoreLocked(_)) => {}
            other => panic!("expected StoreLocked, got {:?}", other.map(|_| ())),
        }

        drop(store);
        assert!(Store::open(tmp.path()).is_ok());
    }

    #[test]
    fn test_load_all_missing_files_yield_empty_collections() {
        let tmp = TempDir::new().unwrap();
        let store = Store::open(tmp.path()).unwrap();
        let data = store.load_all().unwrap();
        assert!(data.inventory.is_empty());
        assert!(data.customers.is_empty());
        assert!(data.sales.is_empty());
        assert!(data.credits.is_empty());
    }

    #[test]
    fn test_inventory_backfill_missing_columns() {
        let tmp = TempDir::new().unwrap();
        write_file(
            tmp.path(),
            INVENTORY_FILE,
            "name,currentQuantity\nBoxA,5\nBoxB,0\n",
        );
        let store = Store::open(tmp.path()).unwrap();
        let data = store.load_all().unwrap();

        assert_eq!(data.inventory.len(), 2);
        assert_eq!(data.inventory[0].unit_price, 0.0);
        assert_eq!(data.inventory[0].registered_quantity, 5);
        assert_eq!(data.inventory[1].registered_quantity, 0);
    }

    #[test]
    fn test_sales_backfill_assigns_ids_and_defaults() {
        let tmp = TempDir::new().unwrap();
        write_file(
            tmp.path(),
            SALES_FILE,
            "date,customerName,productName,quantity,amount\n2024-03-01,Alice,BoxA,2,2000\n",
        );
        let store = Store::open(tmp.path()).unwrap();
        let data = store.load_all().unwrap();

        assert_eq!(data.sales.len(), 1);
        let sale = &data.sales[0];
        assert!(!sale.id.is_empty());
        assert_eq!(sale.unit_price, 0.0);
        assert!(!sale.is_credit);
        assert_eq!(sale.amount, 2000.0);
    }

    #[test]
    fn test_credits_backfill_keeps_missing_sale_link_absent() {
        let tmp = TempDir::new().unwrap();
        write_file(
            tmp.path(),
            CREDITS_FILE,
            "customerName,amount,openingDate,paid,paymentDate\nBob,3000,2024-03-01,false,\n",
        );
        let store = Store::open(tmp.path()).unwrap();
        let data = store.load_all().unwrap();

        assert_eq!(data.credits.len(), 1);
        let credit = &data.credits[0];
        assert!(!credit.id.is_empty());
        assert_eq!(credit.sale_id, None);
        assert_eq!(credit.payment_date, None);
        assert!(!credit.paid);
    }

    #[test]
    fn test_save_all_round_trips_dataset() {
        let tmp = TempDir::new().unwrap();
        let store = Store::open(tmp.path()).unwrap();

        let data = Dataset {
            inventory: vec![Product {
                name: "BoxA".to_string(),
                current_quantity: 7,
                unit_price: 1000.0,
                registered_quantity: 10,
            }],
            customers: vec![Customer {
                name: "Alice".to_string(),
                id_number: "42".to_string(),
                phone: "555-0100".to_string(),
            }],
            sales: vec![Sale {
                id: new_record_id(),
                date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                customer_name: "Alice".to_string(),
                product_name: "BoxA".to_string(),
                quantity: 3,
                unit_price: 1000.0,
                amount: 3000.0,
                is_credit: false,
            }],
            credits: vec![],
        };

        store.save_all(&data).unwrap();
        let loaded = store.load_all().unwrap();
        assert_eq!(loaded, data);
        assert!(!tmp.path().join("inventory.csv.tmp").exists());
    }
}
