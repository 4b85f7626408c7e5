//! Database seeder for Salesdesk development and testing.
//!
//! Seeds a demo company with salespersons, PO types, products and three
//! years of invoices, then prints an owner token for trying the analytics
//! endpoints locally.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use uuid::Uuid;

use salesdesk_db::{
    CompanyRepository,
    entities::{invoice_items, invoices, po_types, products, salespersons},
};
use salesdesk_shared::{JwtConfig, JwtService, Role};

/// Demo company ID (consistent for all seeds)
const DEMO_COMPANY_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0001);
/// Demo user ID put in the printed token
const DEMO_USER_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0002);

const SALESPERSONS: [&str; 4] = ["Ana Putri", "Budi Santoso", "Citra Lestari", "Dewi Anggraini"];
const PO_TYPES: [&str; 3] = ["Retail", "Wholesale", "Distributor"];
/// Product name and unit price.
const PRODUCTS: [(&str, i64); 4] = [
    ("Rice 50kg", 750_000),
    ("Cooking Oil 18L", 420_000),
    ("Sugar 50kg", 680_000),
    ("Flour 25kg", 310_000),
];
const YEARS: [i32; 3] = [2022, 2023, 2024];
const INVOICES_PER_SALESPERSON_PER_MONTH: u32 = 6;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    println!("Connecting to database...");
    let db = salesdesk_db::connect(&database_url).await?;

    let companies = CompanyRepository::new(db.clone());
    if companies.find_by_id(DEMO_COMPANY_ID).await?.is_some() {
        println!("  Demo company already exists, skipping...");
    } else {
        println!("Seeding demo company...");
        companies.create(DEMO_COMPANY_ID, "Demo Trading Co").await?;

        println!("Seeding reference data...");
        let salesperson_ids = seed_named(&db, &SALESPERSONS, NamedKind::Salesperson).await?;
        let po_type_ids = seed_named(&db, &PO_TYPES, NamedKind::PoType).await?;
        let product_names: Vec<&str> = PRODUCTS.iter().map(|(name, _)| *name).collect();
        let product_ids = seed_named(&db, &product_names, NamedKind::Product).await?;

        println!("Seeding invoices...");
        let count = seed_invoices(&db, &salesperson_ids, &po_type_ids, &product_ids).await?;
        println!("  Inserted {count} invoices");
    }

    print_dev_token()?;
    println!("Seeding complete!");
    Ok(())
}

#[derive(Clone, Copy)]
enum NamedKind {
    Salesperson,
    PoType,
    Product,
}

/// Inserts one row per name and returns the new IDs in the same order.
async fn seed_named(
    db: &DatabaseConnection,
    names: &[&str],
    kind: NamedKind,
) -> anyhow::Result<Vec<Uuid>> {
    let mut ids = Vec::with_capacity(names.len());

    for name in names {
        let id = Uuid::new_v4();
        let now = Utc::now().into();
        match kind {
            NamedKind::Salesperson => {
                salespersons::ActiveModel {
                    id: Set(id),
                    company_id: Set(DEMO_COMPANY_ID),
                    name: Set((*name).to_string()),
                    created_at: Set(now),
                }
                .insert(db)
                .await?;
            }
            NamedKind::PoType => {
                po_types::ActiveModel {
                    id: Set(id),
                    company_id: Set(DEMO_COMPANY_ID),
                    name: Set((*name).to_string()),
                    created_at: Set(now),
                }
                .insert(db)
                .await?;
            }
            NamedKind::Product => {
                products::ActiveModel {
                    id: Set(id),
                    company_id: Set(DEMO_COMPANY_ID),
                    name: Set((*name).to_string()),
                    created_at: Set(now),
                }
                .insert(db)
                .await?;
            }
        }
        println!("  Created {name}");
        ids.push(id);
    }

    Ok(ids)
}

/// Seeds invoices for every month of `YEARS`.
///
/// Quantities follow a fixed pattern so that repeated runs against a fresh
/// database produce the same reports.
async fn seed_invoices(
    db: &DatabaseConnection,
    salesperson_ids: &[Uuid],
    po_type_ids: &[Uuid],
    product_ids: &[Uuid],
) -> anyhow::Result<usize> {
    let mut sequence = 0_usize;

    for year in YEARS {
        for month in 1..=12_u32 {
            for (s, salesperson_id) in salesperson_ids.iter().enumerate() {
                for k in 0..INVOICES_PER_SALESPERSON_PER_MONTH {
                    sequence += 1;
                    let day = 1 + (k * 5 + u32::try_from(s)? * 2) % 28;
                    let date = NaiveDate::from_ymd_opt(year, month, day)
                        .context("seed date out of range")?;
                    let po_type_id = po_type_ids[(sequence + s) % po_type_ids.len()];

                    let lines = invoice_lines(sequence, product_ids)?;
                    let total: Decimal = lines.iter().map(|line| line.2).sum();

                    let invoice_id = Uuid::new_v4();
                    invoices::ActiveModel {
                        id: Set(invoice_id),
                        company_id: Set(DEMO_COMPANY_ID),
                        invoice_number: Set(format!("INV-{year}{month:02}-{sequence:05}")),
                        invoice_date: Set(date),
                        salesperson_id: Set(Some(*salesperson_id)),
                        po_type_id: Set(Some(po_type_id)),
                        total_amount: Set(total),
                        created_at: Set(Utc::now().into()),
                    }
                    .insert(db)
                    .await?;

                    for (product_id, quantity, line_total, unit_price) in lines {
                        invoice_items::ActiveModel {
                            id: Set(Uuid::new_v4()),
                            invoice_id: Set(invoice_id),
                            product_id: Set(Some(product_id)),
                            quantity: Set(quantity),
                            unit_price: Set(unit_price),
                            line_total: Set(line_total),
                        }
                        .insert(db)
                        .await?;
                    }
                }
            }
        }
    }

    Ok(sequence)
}

/// Product, quantity, line total and unit price of each line of invoice `sequence`.
fn invoice_lines(
    sequence: usize,
    product_ids: &[Uuid],
) -> anyhow::Result<Vec<(Uuid, i64, Decimal, Decimal)>> {
    let line_count = 1 + sequence % 3;
    let mut lines = Vec::with_capacity(line_count);

    for line in 0..line_count {
        let index = (sequence + line) % product_ids.len();
        let quantity = 40 + i64::try_from((sequence * 7 + line * 11) % 80)?;
        let unit_price = Decimal::from(PRODUCTS[index].1);
        lines.push((
            product_ids[index],
            quantity,
            unit_price * Decimal::from(quantity),
            unit_price,
        ));
    }

    Ok(lines)
}

/// Prints an owner token for the demo company.
///
/// Uses `SALESDESK__JWT__SECRET` when set so the token validates against a
/// locally running server.
fn print_dev_token() -> anyhow::Result<()> {
    let mut config = JwtConfig {
        access_token_expires_minutes: 24 * 60,
        ..JwtConfig::default()
    };
    if let Ok(secret) = std::env::var("SALESDESK__JWT__SECRET") {
        config.secret = secret;
    }

    let token = JwtService::new(config).issue_access_token(DEMO_USER_ID, DEMO_COMPANY_ID, Role::Owner)?;
    println!("Demo company: {DEMO_COMPANY_ID}");
    println!("Owner token (24h): {token}");
    Ok(())
}
