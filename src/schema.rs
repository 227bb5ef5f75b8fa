//! The normalized relational schema: four tables, their keys and constraints,
//! and indexes on every foreign-key column.

use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::{
    db::{DbPool, OrmConn, execute_script},
    error::AppResult,
};

pub const SCHEMA_SQL: &str = include_str!("../migrations/0001_normalized_schema.sql");

/// Tables in dependency order: referenced tables before referencing ones.
pub const TABLES: [&str; 4] = ["customers", "products", "orders", "order_items"];

pub const INDEXES: [&str; 3] = [
    "idx_order_items_order",
    "idx_order_items_product",
    "idx_orders_customer",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow, ToSchema)]
pub struct ColumnInfo {
    pub table_name: String,
    pub column_name: String,
    pub data_type: String,
    pub is_nullable: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow, ToSchema)]
pub struct IndexInfo {
    pub index_name: String,
    pub table_name: String,
    pub definition: String,
}

/// Drops and recreates the four tables and their indexes in one transaction.
pub async fn apply_schema(conn: &OrmConn) -> AppResult<()> {
    tracing::info!("dropping existing tables and recreating schema");
    let statements = execute_script(conn, SCHEMA_SQL).await?;
    tracing::info!(statements, "schema created");
    Ok(())
}

pub async fn describe_schema(pool: &DbPool) -> AppResult<Vec<ColumnInfo>> {
    let columns = sqlx::query_as::<_, ColumnInfo>(
        r#"
        SELECT table_name::text AS table_name,
               column_name::text AS column_name,
               data_type::text AS data_type,
               is_nullable::text AS is_nullable
        FROM information_schema.columns
        WHERE table_schema = 'public'
          AND table_name IN ('customers', 'products', 'orders', 'order_items')
        ORDER BY table_name, ordinal_position
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(columns)
}

pub async fn list_indexes(pool: &DbPool) -> AppResult<Vec<IndexInfo>> {
    let indexes = sqlx::query_as::<_, IndexInfo>(
        r#"
        SELECT indexname::text AS index_name,
               tablename::text AS table_name,
               indexdef AS definition
        FROM pg_indexes
        WHERE schemaname = 'public'
          AND indexname LIKE 'idx\_%'
        ORDER BY indexname
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(indexes)
}
