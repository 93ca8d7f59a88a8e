//! # Seed Data Generator
//!
//! Populates the database with a small storefront catalog for development.
//!
//! ## Usage
//! ```bash
//! # Seed into the default development database
//! cargo run -p batido-db --bin seed
//!
//! # Specify database path
//! cargo run -p batido-db --bin seed -- --db ./data/batido.db
//! ```
//!
//! ## Generated Catalog
//! - Base ingredients (leche, agua, helado) and complements (chocolate,
//!   vainilla, fresa, mango, azucar, granola)
//! - Drinks (malteadas, jugos) with their recipes wired up
//!
//! Seeding runs as an admin principal so it passes the same policy gate as
//! any other caller; there is no backdoor write path.

use std::collections::HashMap;
use std::env;

use batido_core::{IngredientFields, IngredientKind, Principal, ProductFields, Role};
use batido_db::{Database, DbConfig};

/// name, price_cents, calories, vegetarian, healthy, kind, flavor
const INGREDIENTS: &[(&str, i64, i64, bool, bool, IngredientKind, Option<&str>)] = &[
    ("leche", 150, 120, true, true, IngredientKind::Base, None),
    ("agua", 20, 0, true, true, IngredientKind::Base, None),
    ("helado", 250, 210, true, false, IngredientKind::Base, None),
    ("chocolate", 180, 150, true, false, IngredientKind::Complement, Some("chocolate")),
    ("vainilla", 120, 90, true, false, IngredientKind::Complement, Some("vainilla")),
    ("fresa", 140, 35, true, true, IngredientKind::Complement, Some("fresa")),
    ("mango", 130, 60, true, true, IngredientKind::Complement, Some("mango")),
    ("azucar", 40, 80, true, false, IngredientKind::Complement, None),
    ("granola", 90, 110, true, true, IngredientKind::Complement, None),
];

/// name, kind, price_cents, container, volume_oz, recipe (ingredient names)
const PRODUCTS: &[(&str, &str, i64, &str, Option<i64>, &[&str])] = &[
    (
        "Malteada de chocolate",
        "malteada",
        650,
        "vaso grande",
        Some(16),
        &["leche", "helado", "chocolate"],
    ),
    (
        "Malteada de vainilla",
        "malteada",
        600,
        "vaso grande",
        Some(16),
        &["leche", "helado", "vainilla"],
    ),
    (
        "Jugo de mango",
        "jugo",
        350,
        "vaso mediano",
        Some(12),
        &["agua", "mango", "azucar"],
    ),
    (
        "Licuado de fresa",
        "licuado",
        450,
        "vaso grande",
        Some(16),
        &["leche", "fresa", "granola"],
    ),
    // no recipe on purpose: sells without touching inventory
    ("Agua embotellada", "bebida", 150, "botella", Some(20), &[]),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./batido_dev.db");

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
                println!("Batido Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./batido_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Batido Seed Data Generator");
    println!("=============================");
    println!("Database: {}", db_path);
    println!();

    // Connect to database
    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Check existing catalog
    let existing = db.ingredients().list().await?;
    if !existing.is_empty() {
        println!("⚠ Database already has {} ingredients", existing.len());
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let seeder = Principal::new("seed-admin", "seed@batido.dev", Role::Admin);

    // Ingredients
    println!();
    println!("Seeding ingredients...");

    let mut ingredient_ids: HashMap<&str, String> = HashMap::new();
    for (name, price_cents, calories, vegetarian, healthy, kind, flavor) in INGREDIENTS {
        let fields = IngredientFields {
            name: name.to_string(),
            price_cents: *price_cents,
            calories: *calories,
            stock: 10,
            vegetarian: *vegetarian,
            healthy: *healthy,
            kind: *kind,
            flavor: flavor.map(str::to_string),
        };
        let created = db.ingredients().create(Some(&seeder), &fields).await?;
        ingredient_ids.insert(name, created.id);
    }
    println!("  {} ingredients", ingredient_ids.len());

    // Products and their recipes
    println!("Seeding products...");

    let mut product_count = 0;
    let mut edge_count = 0;
    for (name, kind, price_cents, container, volume_oz, recipe) in PRODUCTS {
        let fields = ProductFields {
            name: name.to_string(),
            kind: kind.to_string(),
            price_cents: *price_cents,
            container: container.to_string(),
            volume_oz: *volume_oz,
        };
        let product = db.products().create(Some(&seeder), &fields).await?;
        product_count += 1;

        for ingredient_name in *recipe {
            let ingredient_id = &ingredient_ids[ingredient_name];
            db.recipes()
                .require(Some(&seeder), &product.id, ingredient_id)
                .await?;
            edge_count += 1;
        }
    }
    println!("  {} products, {} recipe edges", product_count, edge_count);

    println!();
    println!("✓ Seed complete!");

    db.close().await;
    Ok(())
}
