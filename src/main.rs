//! Retail Ledger CLI
//!
//! Thin presentation layer over the ledger library: collects input, verifies
//! the operator, invokes one operation, prints the result.

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use retail_ledger::{auth, credit, inventory, reports, Ledger, LOW_STOCK_THRESHOLD};
use std::path::PathBuf;

/// Inventory, sales and customer credit tracker backed by CSV files
#[derive(Parser, Debug)]
#[command(name = "retail_ledger")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the data directory holding the CSV files
    #[arg(short, long, default_value_t = default_data_dir())]
    data_dir: String,

    /// Operator username
    #[arg(short, long)]
    user: String,

    /// Operator password
    #[arg(short, long)]
    password: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Register a new product
    AddProduct {
        name: String,
        quantity: i64,
        price: f64,
    },
    /// Add units to an existing product and set its new unit price
    Restock {
        name: String,
        quantity: i64,
        price: f64,
    },
    /// Delete a product
    RemoveProduct { name: String },
    /// List products at or below the low-stock threshold
    LowStock {
        #[arg(long, default_value_t = LOW_STOCK_THRESHOLD)]
        threshold: i64,
    },
    /// Register a new customer
    AddCustomer {
        name: String,
        id_number: String,
        #[arg(default_value = "")]
        phone: String,
    },
    /// Delete a customer
    RemoveCustomer { name: String },
    /// Record a sale
    Sell {
        customer: String,
        product: String,
        quantity: i64,
        /// Sale date (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Record the sale on credit
        #[arg(long)]
        credit: bool,
    },
    /// List recorded sales with their ids
    Sales,
    /// Reverse sales by id, restoring stock and removing linked credits
    Reverse {
        /// Confirmation secret for destructive reversal
        #[arg(long)]
        confirm: String,
        ids: Vec<String>,
    },
    /// List credit lines and outstanding balances
    Credits,
    /// Mark a credit line as paid
    PayCredit { id: String },
    /// Print the summary report
    Report,
}

/// Returns the default data directory: ~/.local/share/retail_ledger
fn default_data_dir() -> String {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("retail_ledger")
        .to_string_lossy()
        .to_string()
}

fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut ledger = match Ledger::open(&args.data_dir) {
        Ok(ledger) => ledger,
        Err(e) => {
            log::error!("Failed to open data directory: {}", e);
            std::process::exit(1);
        }
    };

    let credentials = match ledger.credentials() {
        Ok(credentials) => credentials,
        Err(e) => {
            log::error!("Failed to load credentials: {}", e);
            std::process::exit(1);
        }
    };
    let session = match auth::verify_operator(&credentials, &args.user, &args.password) {
        Some(session) => session,
        None => {
            log::error!("Invalid username or password");
            std::process::exit(1);
        }
    };
    log::debug!("Operator '{}' verified", session.username);

    if let Err(e) = run(&mut ledger, args.command) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(ledger: &mut Ledger, command: Command) -> retail_ledger::Result<()> {
    match command {
        Command::AddProduct {
            name,
            quantity,
            price,
        } => {
            let product = ledger.register_product(&name, quantity, price)?;
            println!(
                "Registered '{}': {} units at {:.0}",
                product.name, product.current_quantity, product.unit_price
            );
        }
        Command::Restock {
            name,
            quantity,
            price,
        } => {
            let product = ledger.restock(&name, quantity, price)?;
            println!(
                "Restocked '{}': {} in stock ({} lifetime), price {:.0}",
                product.name,
                product.current_quantity,
                product.registered_quantity,
                product.unit_price
            );
        }
        Command::RemoveProduct { name } => {
            ledger.remove_product(&name)?;
            println!("Removed product '{}'", name);
        }
        Command::LowStock { threshold } => {
            let alerts = inventory::low_stock(ledger.data(), threshold);
            if alerts.is_empty() {
                println!("No products at or below {} units", threshold);
            }
            for product in alerts {
                println!("{}: {} units left", product.name, product.current_quantity);
            }
        }
        Command::AddCustomer {
            name,
            id_number,
            phone,
        } => {
            let customer = ledger.register_customer(&name, &id_number, &phone)?;
            println!("Registered customer '{}'", customer.name);
        }
        Command::RemoveCustomer { name } => {
            ledger.remove_customer(&name)?;
            println!("Removed customer '{}'", name);
        }
        Command::Sell {
            customer,
            product,
            quantity,
            date,
            credit,
        } => {
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            let sale = ledger.record_sale(date, &customer, &product, quantity, credit)?;
            println!(
                "Sale {}: {} x '{}' to '{}' for {:.0}{}",
                sale.id,
                sale.quantity,
                sale.product_name,
                sale.customer_name,
                sale.amount,
                if sale.is_credit { " (credit)" } else { "" }
            );
        }
        Command::Sales => {
            for sale in &ledger.data().sales {
                println!(
                    "{}  {}  {:<20} {:<20} {:>5}  {:>10.0}{}",
                    sale.id,
                    sale.date,
                    sale.customer_name,
                    sale.product_name,
                    sale.quantity,
                    sale.amount,
                    if sale.is_credit { "  credit" } else { "" }
                );
            }
        }
        Command::Reverse { confirm, ids } => {
            let token = match auth::confirm_reversal(&confirm) {
                Some(token) => token,
                None => {
                    log::error!("Confirmation secret rejected; nothing reversed");
                    std::process::exit(1);
                }
            };
            let summary = ledger.reverse_sales(&ids, &token)?;
            println!(
                "Reversed {} sale(s), removed {} credit line(s)",
                summary.sales_removed, summary.credits_removed
            );
            for name in &summary.missing_products {
                println!("Stock not restored for missing product '{}'", name);
            }
        }
        Command::Credits => {
            for line in &ledger.data().credits {
                println!(
                    "{}  {}  {:<20} {:>10.0}  {}",
                    line.id,
                    line.opening_date,
                    line.customer_name,
                    line.amount,
                    if line.paid { "paid" } else { "pending" }
                );
            }
            println!("Outstanding total: {:.0}", credit::outstanding_total(ledger.data()));
            for (customer, amount) in credit::outstanding_by_customer(ledger.data()) {
                println!("  {}: {:.0}", customer, amount);
            }
        }
        Command::PayCredit { id } => {
            let paid = ledger.mark_paid(&id)?;
            println!(
                "Credit line {} for '{}' paid ({:.0})",
                paid.id, paid.customer_name, paid.amount
            );
        }
        Command::Report => {
            let data = ledger.data();
            println!("Customers:         {}", data.customers.len());
            println!("Inventory value:   {:.0}", reports::inventory_value(data));
            println!("Total sales:       {:.0}", reports::total_sales(data));
            println!("Net profit:        {:.0}", reports::net_profit(data));
            println!("Credit pending:    {:.0}", credit::outstanding_total(data));
            println!();
            println!("Units sold by month:");
            for (month, units) in reports::units_by_month(data) {
                println!("  {}: {}", month, units);
            }
            println!();
            println!("Sales by customer:");
            for (customer, rollup) in reports::sales_by_customer(data) {
                println!(
                    "  {}: {:.0} ({} units, {} on credit)",
                    customer, rollup.total_amount, rollup.units, rollup.credit_sales
                );
            }
        }
    }
    Ok(())
}
