//! # Seed Data Generator
//!
//! Populates an empty database with the sample jewelry catalogue.
//!
//! ## Usage
//! ```bash
//! cargo run -p vedaa-db --bin seed
//!
//! # Specify database path
//! cargo run -p vedaa-db --bin seed -- --db ./data/vedaa.db
//! ```

use std::env;

use rust_decimal::Decimal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use vedaa_core::{ItemStatus, NewJewelryItem};
use vedaa_db::{Database, DbConfig};

/// (name, category, metal, purity, weight in centigrams, making charge, description)
const CATALOGUE: &[(&str, &str, &str, &str, i64, i64, &str)] = &[
    ("Diamond Solitaire Ring", "Rings", "Gold", "22K", 450, 2500, "Elegant solitaire ring with certified diamond"),
    ("Gold Temple Necklace", "Necklaces", "Gold", "22K", 4500, 15000, "Traditional temple design necklace with intricate work"),
    ("Pearl Drop Earrings", "Earrings", "Gold", "18K", 820, 3500, "Elegant pearl drop earrings with gold frame"),
    ("Kundan Bridal Set", "Sets", "Gold", "22K", 12000, 45000, "Complete bridal kundan set with necklace, earrings, and maang tikka"),
    ("Rose Gold Bracelet", "Bracelets", "Gold", "18K", 1250, 4500, "Modern rose gold bracelet with delicate chain design"),
    ("Antique Jhumka Earrings", "Earrings", "Gold", "22K", 1800, 6500, "Traditional jhumka earrings with antique finish"),
    ("Polki Diamond Choker", "Necklaces", "Gold", "22K", 6500, 28000, "Royal polki diamond choker with meenakari work"),
    ("Gold Kada Bangle", "Bangles", "Gold", "22K", 3200, 8500, "Heavy gold kada with traditional design"),
    ("Silver Anklet Pair", "Anklets", "Silver", "925", 4500, 1200, "Traditional silver anklet pair with bells"),
    ("Diamond Tennis Bracelet", "Bracelets", "Gold", "18K", 1500, 12000, "Classic diamond tennis bracelet with certified stones"),
];

fn catalogue() -> Vec<NewJewelryItem> {
    CATALOGUE
        .iter()
        .map(|&(name, category, metal, purity, centigrams, making, description)| NewJewelryItem {
            name: name.to_string(),
            category: category.to_string(),
            image_ref: String::new(),
            metal_type: metal.to_string(),
            purity: purity.to_string(),
            weight_grams: Decimal::new(centigrams, 2),
            making_charge: Decimal::from(making),
            description: Some(description.to_string()),
            status: ItemStatus::Active,
        })
        .collect()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = env::args().collect();
    let mut db_path = String::from("./vedaa_dev.db");

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
                println!("Vedaa Jewellers catalogue seeder");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./vedaa_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    let db = Database::new(DbConfig::new(&db_path)).await?;

    let existing = db.items().count().await?;
    if existing > 0 {
        warn!(existing, "Catalogue already populated, skipping seed");
        println!("Database already has {} items. Delete it to reseed.", existing);
        return Ok(());
    }

    let mut inserted = 0;
    for item in catalogue() {
        match db.items().add(&item).await {
            Ok(_) => inserted += 1,
            Err(e) => eprintln!("Failed to insert {}: {}", item.name, e),
        }
    }

    info!(inserted, path = %db_path, "Seed complete");
    println!("Seeded {} jewelry items into {}", inserted, db_path);

    db.close().await;
    Ok(())
}
