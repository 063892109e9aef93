// SPDX-FileCopyrightText: 2026 Insight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The fixed three-table analytics schema.
//!
//! The schema is small and known ahead of time; both the DDL and the literal
//! description embedded in generation prompts live here so they cannot drift
//! apart.

/// DDL for the analytics tables. Idempotent; run on every open.
pub const DDL: &str = "
CREATE TABLE IF NOT EXISTS customers (
    id          INTEGER PRIMARY KEY,
    name        TEXT NOT NULL,
    signup_date TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS products (
    id       INTEGER PRIMARY KEY,
    name     TEXT NOT NULL,
    category TEXT NOT NULL,
    price    REAL NOT NULL
);
CREATE TABLE IF NOT EXISTS sales (
    id          INTEGER PRIMARY KEY,
    customer_id INTEGER NOT NULL REFERENCES customers(id),
    product_id  INTEGER NOT NULL REFERENCES products(id),
    sale_date   TEXT NOT NULL,
    quantity    INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_sales_date     ON sales(sale_date);
CREATE INDEX IF NOT EXISTS idx_sales_customer ON sales(customer_id);
CREATE INDEX IF NOT EXISTS idx_sales_product  ON sales(product_id);
";

/// The literal schema description embedded in language-model prompts.
pub const PROMPT_SCHEMA: &str = "\
Table: customers, Columns: id (INTEGER), name (TEXT), signup_date (DATE)
Table: products, Columns: id (INTEGER), name (TEXT), category (TEXT), price (DECIMAL)
Table: sales, Columns: id (INTEGER), customer_id (INTEGER), product_id (INTEGER), sale_date (DATE), quantity (INTEGER)";

/// The topical domain the schema covers, for the relevancy firewall prompt.
pub const TOPIC_DOMAIN: &str = "sales, products, and customers";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_schema_names_every_table() {
        for table in ["customers", "products", "sales"] {
            assert!(PROMPT_SCHEMA.contains(table));
            assert!(DDL.contains(table));
        }
    }
}
