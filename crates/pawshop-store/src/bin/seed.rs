//! # Seed Data Generator
//!
//! Populates a store with the demo pet-shop catalog for development.
//!
//! ## Usage
//! ```bash
//! # Seed the default data directory (./pawshop-data)
//! cargo run -p pawshop-store --bin seed
//!
//! # Specify a data directory
//! cargo run -p pawshop-store --bin seed -- --data-dir /tmp/shop
//! ```
//!
//! The `PAWSHOP_DATA_DIR` environment variable is honored when no flag is
//! given, matching the register app's resolution order.
//!
//! ## Generated Catalog
//! The classic starter catalog of a small pet shop:
//! - Ração a granel (sold by kg) and closed bags
//! - Acessórios and higiene items
//! - One grooming service (infinite stock by virtue of its category)
//!
//! Seeding is additive-by-replacement: it OVERWRITES the product collection
//! but leaves sales, customers and settings alone.

use std::env;
use std::process;

use uuid::Uuid;

use pawshop_core::types::{Product, UnitType};
use pawshop_core::SERVICES_CATEGORY;
use pawshop_store::{Store, StoreConfig, StoreResult};

/// (code, name, category, subgroup, cost, price, stock, unit type, color)
#[allow(clippy::type_complexity)]
const CATALOG: &[(
    &str,
    &str,
    &str,
    Option<&str>,
    i64,
    i64,
    f64,
    UnitType,
    Option<&str>,
)] = &[
    // Ração por kg (granel)
    (
        "RAC-KG",
        "Ração Golden Adulto Frango (Granel)",
        "Ração",
        Some("Golden"),
        1200,
        1850,
        50.0,
        UnitType::Kg,
        Some("#f59e0b"),
    ),
    (
        "RAC-KG2",
        "Ração Royal Canin Gatos (Granel)",
        "Ração",
        Some("Royal Canin"),
        2500,
        3890,
        30.0,
        UnitType::Kg,
        Some("#f59e0b"),
    ),
    // Sacos fechados (unidade)
    (
        "SAC-15",
        "Ração Golden Adulto Frango Saco 15kg",
        "Ração",
        Some("Golden"),
        14000,
        18990,
        10.0,
        UnitType::Un,
        None,
    ),
    (
        "SAC-10",
        "Ração Premier Filhotes Saco 10kg",
        "Ração",
        Some("Premier"),
        16000,
        21500,
        5.0,
        UnitType::Un,
        None,
    ),
    // Acessórios e higiene
    (
        "ACE001",
        "Coleira de Couro Ajustável",
        "Acessórios",
        None,
        1500,
        3500,
        10.0,
        UnitType::Un,
        Some("#3b82f6"),
    ),
    (
        "HIG001",
        "Shampoo Neutro 500ml",
        "Higiene",
        None,
        1800,
        3200,
        15.0,
        UnitType::Un,
        Some("#10b981"),
    ),
    // Serviços
    (
        "SRV001",
        "Banho - Porte Pequeno",
        SERVICES_CATEGORY,
        None,
        1500,
        5000,
        999.0,
        UnitType::Un,
        None,
    ),
];

fn main() {
    if let Err(e) = run() {
        eprintln!("seed failed: {}", e);
        process::exit(1);
    }
}

fn run() -> StoreResult<()> {
    let data_dir = resolve_data_dir();
    println!("Seeding store at {}", data_dir);

    let store = Store::open(StoreConfig::new(&data_dir))?;

    let products: Vec<Product> = CATALOG
        .iter()
        .map(
            |(code, name, category, subgroup, cost, price, stock, unit_type, color)| Product {
                id: Uuid::new_v4().to_string(),
                code: code.to_string(),
                name: name.to_string(),
                category: category.to_string(),
                subgroup: subgroup.map(str::to_string),
                cost_price_cents: *cost,
                price_cents: *price,
                stock: *stock,
                unit_type: *unit_type,
                color: color.map(str::to_string),
            },
        )
        .collect();

    store.save(pawshop_store::keys::PRODUCTS, &products)?;

    println!("Seeded {} products:", products.len());
    for product in &products {
        println!(
            "  {:<8} {:<45} estoque {:>7}",
            product.code,
            product.name,
            product.unit_type.format_quantity(product.stock)
        );
    }

    Ok(())
}

/// Flag > environment > default, in that order.
fn resolve_data_dir() -> String {
    let args: Vec<String> = env::args().collect();
    if let Some(pos) = args.iter().position(|a| a == "--data-dir") {
        if let Some(dir) = args.get(pos + 1) {
            return dir.clone();
        }
    }
    env::var("PAWSHOP_DATA_DIR").unwrap_or_else(|_| "./pawshop-data".to_string())
}
