//! # Seed Data Generator
//!
//! Populates a development ledger with sample clients, products, sales and
//! payments.
//!
//! ## Usage
//! ```bash
//! # Seed ./fiado_dev.db
//! cargo run -p fiado-db --bin seed
//!
//! # Specify database path
//! cargo run -p fiado-db --bin seed -- --db ./data/fiado.db
//! ```
//!
//! ## Generated Data
//! - A dozen clients and a small price list (unit and kg products)
//! - Sales over the last 30 days, roughly one in three on credit
//! - A payment against each debtor covering part of the debt
//!
//! Values derive from the row index, so every run produces the same ledger.

use chrono::{Duration, Utc};
use fiado_core::balance::{client_debt, quote_sale_total};
use fiado_core::{
    Money, NewPayment, NewProduct, NewSale, Payment, PaymentMethod, Quantity, Sale, UnitKind,
};
use fiado_db::{Database, DbConfig};
use std::env;

const CLIENTS: &[&str] = &[
    "Ana Souza",
    "Bruno Lima",
    "Carla Mendes",
    "Daniel Rocha",
    "Eduarda Alves",
    "Fernando Dias",
    "Gabriela Nunes",
    "Heitor Castro",
    "Isabela Moura",
    "João Pereira",
    "Larissa Costa",
    "Marcos Ribeiro",
];

/// (name, price in cents, unit kind)
const PRODUCTS: &[(&str, i64, UnitKind)] = &[
    ("Pão francês", 1600, UnitKind::Kg),
    ("Queijo muçarela", 4990, UnitKind::Kg),
    ("Presunto", 3890, UnitKind::Kg),
    ("Banana prata", 699, UnitKind::Kg),
    ("Tomate", 899, UnitKind::Kg),
    ("Leite integral 1L", 589, UnitKind::Unit),
    ("Café 500g", 1899, UnitKind::Unit),
    ("Arroz 5kg", 2790, UnitKind::Unit),
    ("Feijão carioca 1kg", 849, UnitKind::Unit),
    ("Açúcar 1kg", 479, UnitKind::Unit),
    ("Refrigerante 2L", 999, UnitKind::Unit),
    ("Sabão em pó", 1450, UnitKind::Unit),
];

/// Sales generated per client.
const SALES_PER_CLIENT: usize = 6;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./fiado_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Fiado Ledger Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./fiado_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Fiado Ledger Seed Data Generator");
    println!("===================================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.clients().count().await? + db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} clients/products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let start = std::time::Instant::now();

    // Clients
    let mut clients = Vec::with_capacity(CLIENTS.len());
    for name in CLIENTS {
        clients.push(db.clients().insert(name).await?);
    }
    println!("✓ {} clients", clients.len());

    // Products
    let mut products = Vec::with_capacity(PRODUCTS.len());
    for (name, cents, unit_kind) in PRODUCTS {
        let product = db
            .products()
            .insert(&NewProduct {
                name: name.to_string(),
                price: Money::from_cents(*cents),
                unit_kind: *unit_kind,
            })
            .await?;
        products.push(product);
    }
    println!("✓ {} products", products.len());

    // Sales
    let now = Utc::now();
    let mut sales: Vec<Sale> = Vec::new();
    for (client_idx, client) in clients.iter().enumerate() {
        for n in 0..SALES_PER_CLIENT {
            let seed = client_idx * SALES_PER_CLIENT + n;
            let product = &products[(seed * 7) % products.len()];
            let quantity = match product.unit_kind {
                UnitKind::Kg => Quantity::from_milli(250 + ((seed * 137) % 1750) as i64),
                UnitKind::Unit => Quantity::units(1 + (seed % 4) as i64),
            };
            let payment_method = if seed % 3 == 0 {
                PaymentMethod::Credit
            } else {
                PaymentMethod::Cash
            };

            let sale = db
                .sales()
                .insert(&NewSale {
                    client_id: client.id,
                    product_id: product.id,
                    quantity,
                    unit_kind: product.unit_kind,
                    total: quote_sale_total(product.price(), quantity)?,
                    payment_method,
                    occurred_at: now - Duration::hours(((seed * 11) % (30 * 24)) as i64),
                })
                .await?;
            sales.push(sale);
        }
    }
    println!("✓ {} sales", sales.len());

    // Payments: each debtor pays about half of what they owe.
    let mut payments: Vec<Payment> = Vec::new();
    for client in &clients {
        let debt = client_debt(client.id, &sales, &payments);
        let half = Money::from_cents(debt.cents() / 2);
        if !half.is_positive() {
            continue;
        }
        let payment = db
            .payments()
            .insert(&NewPayment {
                client_id: client.id,
                amount: half,
                description: Some("Pagamento parcial".to_string()),
                occurred_at: now - Duration::hours(2),
            })
            .await?;
        payments.push(payment);
    }
    println!("✓ {} payments", payments.len());

    let elapsed = start.elapsed();
    println!();
    println!("Seeded in {:.2?}", elapsed);
    println!("✓ Seed complete!");

    Ok(())
}
