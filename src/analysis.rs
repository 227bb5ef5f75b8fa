//! Measures the redundancy a denormalized table carries.

use std::{
    collections::{BTreeMap, HashMap},
    fmt,
};

use serde::Serialize;
use utoipa::ToSchema;

use crate::models::FlatOrder;

/// Rows that would have to change if one customer's details changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct UpdateAnomaly {
    pub customer_id: String,
    pub customer_name: String,
    pub rows_to_update: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RedundancyReport {
    pub rows: usize,
    pub unique_customers: usize,
    pub unique_products: usize,
    pub customer_repetition: f64,
    pub product_repetition: f64,
    pub update_anomalies: Vec<UpdateAnomaly>,
    pub address_chars_stored: usize,
    pub address_chars_needed: usize,
}

impl RedundancyReport {
    pub fn wasted_address_chars(&self) -> usize {
        self.address_chars_stored - self.address_chars_needed
    }
}

pub fn analyze_redundancy(rows: &[FlatOrder]) -> RedundancyReport {
    let mut customers: BTreeMap<&str, (&str, usize)> = BTreeMap::new();
    let mut first_address: HashMap<&str, usize> = HashMap::new();
    let mut products: HashMap<&str, usize> = HashMap::new();
    let mut address_chars_stored = 0;

    for row in rows {
        let entry = customers
            .entry(row.customer_id.as_str())
            .or_insert((row.customer_name.as_str(), 0));
        entry.1 += 1;
        *products.entry(row.product_id.as_str()).or_default() += 1;

        let chars = row.customer_address.chars().count();
        address_chars_stored += chars;
        first_address.entry(row.customer_id.as_str()).or_insert(chars);
    }

    let update_anomalies = customers
        .iter()
        .map(|(id, (name, count))| UpdateAnomaly {
            customer_id: id.to_string(),
            customer_name: name.to_string(),
            rows_to_update: *count,
        })
        .collect();

    RedundancyReport {
        rows: rows.len(),
        unique_customers: customers.len(),
        unique_products: products.len(),
        customer_repetition: ratio(rows.len(), customers.len()),
        product_repetition: ratio(rows.len(), products.len()),
        update_anomalies,
        address_chars_stored,
        address_chars_needed: first_address.values().sum(),
    }
}

fn ratio(rows: usize, unique: usize) -> f64 {
    if unique == 0 {
        0.0
    } else {
        rows as f64 / unique as f64
    }
}

impl fmt::Display for RedundancyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== DENORMALIZATION ISSUES ===")?;
        writeln!(f)?;
        writeln!(f, "1. DATA REDUNDANCY:")?;
        writeln!(f, "Unique customers: {}", self.unique_customers)?;
        writeln!(f, "Unique products: {}", self.unique_products)?;
        writeln!(f, "Customer records: {}", self.rows)?;
        writeln!(
            f,
            "-> Customer data repeated {:.1}x, product data repeated {:.1}x",
            self.customer_repetition, self.product_repetition
        )?;
        writeln!(f)?;
        writeln!(f, "2. UPDATE ANOMALIES:")?;
        for anomaly in &self.update_anomalies {
            writeln!(
                f,
                "If {} ({}) changes email, must update {} records",
                anomaly.customer_name, anomaly.customer_id, anomaly.rows_to_update
            )?;
        }
        writeln!(f)?;
        writeln!(f, "3. STORAGE WASTE:")?;
        writeln!(
            f,
            "Address storage: {} chars vs {} chars needed",
            self.address_chars_stored, self.address_chars_needed
        )?;
        write!(f, "Wasted: {} characters", self.wasted_address_chars())
    }
}
