use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stock-keeping unit tracked by name. `current_quantity` is the sellable
/// stock on hand; `registered_quantity` is the lifetime count of units ever
/// received via registration or restock. Sales decrement the former only,
/// so the two counters are independent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    #[serde(rename = "currentQuantity")]
    pub current_quantity: i64,
    #[serde(rename = "unitPrice")]
    pub unit_price: f64,
    #[serde(rename = "registeredQuantity")]
    pub registered_quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    #[serde(rename = "idNumber")]
    pub id_number: String,
    pub phone: String,
}

/// An immutable record of a quantity sold at a captured price. The unit
/// price is a snapshot taken when the sale was recorded; later price changes
/// on the product do not touch it, and `amount` is never recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub id: String,
    pub date: NaiveDate,
    #[serde(rename = "customerName")]
    pub customer_name: String,
    #[serde(rename = "productName")]
    pub product_name: String,
    pub quantity: i64,
    #[serde(rename = "unitPrice")]
    pub unit_price: f64,
    pub amount: f64,
    #[serde(rename = "isCredit")]
    pub is_credit: bool,
}

/// An amount owed by a customer, opened by a credit sale. `sale_id` links
/// back to the originating sale; rows loaded from files written before the
/// column existed carry `None` and are matched heuristically on reversal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditLine {
    pub id: String,
    #[serde(rename = "saleId")]
    pub sale_id: Option<String>,
    #[serde(rename = "customerName")]
    pub customer_name: String,
    pub amount: f64,
    #[serde(rename = "openingDate")]
    pub opening_date: NaiveDate,
    pub paid: bool,
    #[serde(rename = "paymentDate")]
    pub payment_date: Option<NaiveDateTime>,
}

/// One operator login row from the credentials file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub username: String,
    #[serde(rename = "passwordHash")]
    pub password_hash: String,
}

/// Generate a fresh record identifier.
pub fn new_record_id() -> String {
    Uuid::new_v4().to_string()
}

/// The four record collections, loaded and saved together. All mutating
/// operations work on this in-memory state; persistence rewrites all four
/// files as one batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub inventory: Vec<Product>,
    pub customers: Vec<Customer>,
    pub sales: Vec<Sale>,
    pub credits: Vec<CreditLine>,
}

impl Dataset {
    pub fn find_product(&self, name: &str) -> Option<&Product> {
        self.inventory.iter().find(|p| p.name == name)
    }

    pub fn find_product_mut(&mut self, name: &str) -> Option<&mut Product> {
        self.inventory.iter_mut().find(|p| p.name == name)
    }

    pub fn find_customer(&self, name: &str) -> Option<&Customer> {
        self.customers.iter().find(|c| c.name == name)
    }

    pub fn find_sale(&self, id: &str) -> Option<&Sale> {
        self.sales.iter().find(|s| s.id == id)
    }

    pub fn find_credit_mut(&mut self, id: &str) -> Option<&mut CreditLine> {
        self.credits.iter_mut().find(|c| c.id == id)
    }
}
