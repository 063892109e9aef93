// SPDX-FileCopyrightText: 2026 Insight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Demo data seeding for the analytics tables.
//!
//! Clears and repopulates customers, products, and sales with generated
//! data so the service can be exercised without a production dump. Volumes
//! and date spreads match the reference dataset: two years of signups, one
//! year of sales.

use chrono::{Duration as ChronoDuration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use insight_core::InsightError;

use crate::database::Database;

const CUSTOMER_COUNT: usize = 1_000;
const PRODUCT_COUNT: usize = 75;
const SALES_COUNT: usize = 12_000;

const CATEGORIES: &[&str] = &[
    "Electronics",
    "Furniture",
    "Clothing",
    "Books",
    "Toys",
    "Sports",
    "Beauty",
    "Automotive",
    "Garden",
    "Grocery",
];

const FIRST_NAMES: &[&str] = &[
    "Ada", "Alan", "Grace", "Edsger", "Barbara", "Donald", "Margaret", "John", "Joan", "Dennis",
    "Radia", "Ken", "Frances", "Tim", "Hedy", "Claude", "Katherine", "Linus", "Annie", "Vint",
];

const LAST_NAMES: &[&str] = &[
    "Lovelace", "Turing", "Hopper", "Dijkstra", "Liskov", "Knuth", "Hamilton", "McCarthy",
    "Clarke", "Ritchie", "Perlman", "Thompson", "Allen", "Berners-Lee", "Lamarr", "Shannon",
    "Johnson", "Torvalds", "Easley", "Cerf",
];

const PRODUCT_ADJECTIVES: &[&str] = &[
    "Compact", "Deluxe", "Classic", "Portable", "Premium", "Essential", "Modern", "Rugged",
];

/// Row counts written by a seeding run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub customers: usize,
    pub products: usize,
    pub sales: usize,
}

/// Clears the analytics tables and repopulates them with generated data.
///
/// Deterministic for a given `seed`, so repeated runs produce the same
/// dataset.
pub async fn seed(db: &Database, seed: u64) -> Result<SeedReport, InsightError> {
    db.call_timed(move |conn| {
        let mut rng = StdRng::seed_from_u64(seed);
        let today = Utc::now().date_naive();
        let tx = conn.transaction()?;

        tx.execute_batch("DELETE FROM sales; DELETE FROM products; DELETE FROM customers;")?;

        {
            let mut insert = tx.prepare(
                "INSERT INTO customers (id, name, signup_date) VALUES (?1, ?2, ?3)",
            )?;
            for id in 1..=CUSTOMER_COUNT {
                let name = format!(
                    "{} {}",
                    FIRST_NAMES[rng.gen_range(0..FIRST_NAMES.len())],
                    LAST_NAMES[rng.gen_range(0..LAST_NAMES.len())],
                );
                let signup = today - ChronoDuration::days(rng.gen_range(0..730));
                insert.execute(rusqlite::params![
                    id as i64,
                    name,
                    signup.format("%Y-%m-%d").to_string()
                ])?;
            }
        }

        {
            let mut insert = tx.prepare(
                "INSERT INTO products (id, name, category, price) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for id in 1..=PRODUCT_COUNT {
                let category = CATEGORIES[(id - 1) % CATEGORIES.len()];
                let name = format!(
                    "{} {} #{}",
                    PRODUCT_ADJECTIVES[rng.gen_range(0..PRODUCT_ADJECTIVES.len())],
                    category,
                    id,
                );
                let price = (rng.gen_range(5.0_f64..500.0) * 100.0).round() / 100.0;
                insert.execute(rusqlite::params![id as i64, name, category, price])?;
            }
        }

        {
            let mut insert = tx.prepare(
                "INSERT INTO sales (id, customer_id, product_id, sale_date, quantity)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for id in 1..=SALES_COUNT {
                let customer_id = rng.gen_range(1..=CUSTOMER_COUNT) as i64;
                let product_id = rng.gen_range(1..=PRODUCT_COUNT) as i64;
                let sale_date = today - ChronoDuration::days(rng.gen_range(0..365));
                let quantity = rng.gen_range(1..=10_i64);
                insert.execute(rusqlite::params![
                    id as i64,
                    customer_id,
                    product_id,
                    sale_date.format("%Y-%m-%d").to_string(),
                    quantity
                ])?;
            }
        }

        tx.commit()?;
        Ok(SeedReport {
            customers: CUSTOMER_COUNT,
            products: PRODUCT_COUNT,
            sales: SALES_COUNT,
        })
    })
    .await
    .inspect(|report| {
        info!(
            customers = report.customers,
            products = report.products,
            sales = report.sales,
            "demo data seeded"
        );
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use insight_core::SqlDatabase;
    use std::time::Duration;

    #[tokio::test]
    async fn seeding_populates_all_three_tables() {
        let db = Database::open_in_memory(Duration::from_secs(30)).await.unwrap();
        let report = seed(&db, 42).await.unwrap();
        assert_eq!(report.customers, 1_000);
        assert_eq!(report.products, 75);
        assert_eq!(report.sales, 12_000);

        let rows = db
            .query("SELECT COUNT(*) AS n FROM sales")
            .await
            .unwrap();
        assert_eq!(rows[0]["n"], serde_json::json!(12_000));
    }

    #[tokio::test]
    async fn seeding_is_deterministic_and_reentrant() {
        let db = Database::open_in_memory(Duration::from_secs(30)).await.unwrap();
        seed(&db, 7).await.unwrap();
        let first = db
            .query("SELECT name FROM customers WHERE id = 1")
            .await
            .unwrap();
        // A second run replaces, not appends.
        seed(&db, 7).await.unwrap();
        let second = db
            .query("SELECT name FROM customers WHERE id = 1")
            .await
            .unwrap();
        assert_eq!(first, second);
        let count = db
            .query("SELECT COUNT(*) AS n FROM customers")
            .await
            .unwrap();
        assert_eq!(count[0]["n"], serde_json::json!(1_000));
    }
}
