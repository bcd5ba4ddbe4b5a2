use anyhow::{Context, Result};
use sqlx::{Pool, Sqlite};

pub async fn create_schema(connection: &Pool<Sqlite>) -> Result<()> {
    create_categories(connection)
        .await
        .with_context(|| "Failed to create categories table")?;
    create_assets(connection)
        .await
        .with_context(|| "Failed to create assets table")?;
    create_run_inputs(connection)
        .await
        .with_context(|| "Failed to create run_inputs table")?;
    create_category_allocations(connection)
        .await
        .with_context(|| "Failed to create category_allocations table")?;
    create_purchase_instructions(connection)
        .await
        .with_context(|| "Failed to create purchase_instructions table")?;

    Ok(())
}

async fn create_categories(connection: &Pool<Sqlite>) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS categories (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            target_weight REAL NOT NULL,
            currency_domain TEXT NOT NULL,
            unit_policy TEXT NOT NULL,
            position INTEGER NOT NULL,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(connection)
    .await?;

    Ok(())
}

async fn create_assets(connection: &Pool<Sqlite>) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS assets (
            category_id TEXT NOT NULL REFERENCES categories(id),
            ticker TEXT NOT NULL,
            current_quantity REAL,
            current_value REAL NOT NULL,
            quoted_price REAL,
            target_weight REAL NOT NULL,
            position INTEGER NOT NULL,
            updated_at DATETIME DEFAULT CURRENT_TIMESTAMP,
            PRIMARY KEY (category_id, ticker)
        )
        "#,
    )
    .execute(connection)
    .await?;

    Ok(())
}

async fn create_run_inputs(connection: &Pool<Sqlite>) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS run_inputs (
            key TEXT PRIMARY KEY,
            value REAL,
            updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(connection)
    .await?;

    Ok(())
}

async fn create_category_allocations(connection: &Pool<Sqlite>) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS category_allocations (
            category_id TEXT PRIMARY KEY REFERENCES categories(id),
            allocated_amount REAL NOT NULL,
            calculated_at DATETIME NOT NULL
        )
        "#,
    )
    .execute(connection)
    .await?;

    Ok(())
}

async fn create_purchase_instructions(connection: &Pool<Sqlite>) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS purchase_instructions (
            category_id TEXT NOT NULL,
            ticker TEXT NOT NULL,
            position INTEGER NOT NULL,
            quantity REAL,
            allocated_amount REAL NOT NULL,
            allocated_currency TEXT NOT NULL,
            resulting_total REAL NOT NULL,
            calculated_at DATETIME NOT NULL,
            PRIMARY KEY (category_id, ticker)
        )
        "#,
    )
    .execute(connection)
    .await?;

    Ok(())
}
