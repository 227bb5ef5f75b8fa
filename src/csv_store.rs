//! CSV files exchanged between pipeline stages.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Serialize, de::DeserializeOwned};

use crate::{
    error::AppResult,
    models::FlatOrder,
    normalize::NormalizedTables,
};

pub const FLAT_ORDERS_FILE: &str = "denormalized_orders.csv";
pub const CUSTOMERS_FILE: &str = "normalized_customers.csv";
pub const PRODUCTS_FILE: &str = "normalized_products.csv";
pub const ORDERS_FILE: &str = "normalized_orders.csv";
pub const ORDER_ITEMS_FILE: &str = "normalized_order_items.csv";

pub fn write_table<T: Serialize>(path: &Path, rows: &[T]) -> AppResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    tracing::debug!(path = %path.display(), rows = rows.len(), "wrote csv");
    Ok(())
}

pub fn read_table<T: DeserializeOwned>(path: &Path) -> AppResult<Vec<T>> {
    let mut reader = csv::Reader::from_path(path)?;
    let rows = reader.deserialize().collect::<Result<Vec<T>, _>>()?;
    tracing::debug!(path = %path.display(), rows = rows.len(), "read csv");
    Ok(rows)
}

/// Locations of the five interchange files under one data directory.
#[derive(Debug, Clone)]
pub struct DataFiles {
    dir: PathBuf,
}

impl DataFiles {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn flat_orders(&self) -> PathBuf {
        self.dir.join(FLAT_ORDERS_FILE)
    }

    pub fn customers(&self) -> PathBuf {
        self.dir.join(CUSTOMERS_FILE)
    }

    pub fn products(&self) -> PathBuf {
        self.dir.join(PRODUCTS_FILE)
    }

    pub fn orders(&self) -> PathBuf {
        self.dir.join(ORDERS_FILE)
    }

    pub fn order_items(&self) -> PathBuf {
        self.dir.join(ORDER_ITEMS_FILE)
    }

    pub fn write_flat(&self, rows: &[FlatOrder]) -> AppResult<()> {
        write_table(&self.flat_orders(), rows)
    }

    pub fn read_flat(&self) -> AppResult<Vec<FlatOrder>> {
        read_table(&self.flat_orders())
    }

    pub fn write_normalized(&self, tables: &NormalizedTables) -> AppResult<()> {
        write_table(&self.customers(), &tables.customers)?;
        write_table(&self.products(), &tables.products)?;
        write_table(&self.orders(), &tables.orders)?;
        write_table(&self.order_items(), &tables.order_items)
    }

    pub fn read_normalized(&self) -> AppResult<NormalizedTables> {
        Ok(NormalizedTables {
            customers: read_table(&self.customers())?,
            products: read_table(&self.products())?,
            orders: read_table(&self.orders())?,
            order_items: read_table(&self.order_items())?,
        })
    }
}
