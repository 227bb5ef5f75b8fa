//! Decomposition of the flat order table into customers, products, orders and
//! order items.
//!
//! Each target table is a projection of the flat rows onto a fixed column
//! subset, deduplicated with first-appearance order kept. The functional
//! dependencies behind the split are fixed:
//!
//! - `customer_id -> name, email, address, city, state, zip`
//! - `product_id -> name, description, price, category`
//! - `order_id -> order_date, customer_id`
//!
//! A projection that leaves two different tuples under one key means the
//! flat data breaks its dependency, and the decomposition is rejected. So is
//! a row whose total is not its quantity times its unit price.

use std::{
    collections::{HashMap, HashSet},
    hash::Hash,
};

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::{Customer, FlatOrder, LineKey, Order, OrderItem, Product},
};

/// `(referencing column, referenced key)` pairs of the normalized schema.
pub const RELATIONSHIPS: [(&str, &str); 3] = [
    ("orders.customer_id", "customers.customer_id"),
    ("order_items.order_id", "orders.order_id"),
    ("order_items.product_id", "products.product_id"),
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct NormalizedTables {
    pub customers: Vec<Customer>,
    pub products: Vec<Product>,
    pub orders: Vec<Order>,
    pub order_items: Vec<OrderItem>,
}

pub fn normalize(rows: &[FlatOrder]) -> AppResult<NormalizedTables> {
    for row in rows {
        ensure_line_total(row)?;
    }

    let customers = project(rows, FlatOrder::customer);
    ensure_unique_key("customers", &customers, |c| c.customer_id.clone())?;

    let products = project(rows, FlatOrder::product);
    ensure_unique_key("products", &products, |p| p.product_id.clone())?;

    let orders = project(rows, FlatOrder::order);
    ensure_unique_key("orders", &orders, |o| o.order_id.to_string())?;

    // Line items are not deduplicated: every flat row is one line.
    let order_items = rows
        .iter()
        .zip(1..)
        .map(|(row, line_item_id)| OrderItem {
            order_id: row.order_id,
            product_id: row.product_id.clone(),
            quantity: row.quantity,
            total_amount: row.total_amount,
            line_item_id,
        })
        .collect();

    let tables = NormalizedTables {
        customers,
        products,
        orders,
        order_items,
    };
    tracing::info!(
        customers = tables.customers.len(),
        products = tables.products.len(),
        orders = tables.orders.len(),
        order_items = tables.order_items.len(),
        "normalized flat orders"
    );
    Ok(tables)
}

/// Distinct projected tuples, in the order they first appear.
pub fn project<T, F>(rows: &[FlatOrder], projection: F) -> Vec<T>
where
    T: Eq + Hash + Clone,
    F: Fn(&FlatOrder) -> T,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for row in rows {
        let tuple = projection(row);
        if seen.insert(tuple.clone()) {
            out.push(tuple);
        }
    }
    out
}

/// `total_amount` must equal `quantity × product_price`.
pub fn ensure_line_total(row: &FlatOrder) -> AppResult<()> {
    let expected = row.product_price * Decimal::from(row.quantity);
    if row.total_amount != expected {
        tracing::error!(
            order_id = row.order_id,
            product_id = %row.product_id,
            %expected,
            actual = %row.total_amount,
            "line total does not match quantity and price"
        );
        return Err(AppError::LineTotal {
            order_id: row.order_id,
            product_id: row.product_id.clone(),
            expected,
            actual: row.total_amount,
        });
    }
    Ok(())
}

fn ensure_unique_key<T, K>(table: &'static str, tuples: &[T], key: K) -> AppResult<()>
where
    K: Fn(&T) -> String,
{
    let mut keys = HashSet::new();
    for tuple in tuples {
        let k = key(tuple);
        if !keys.insert(k.clone()) {
            tracing::error!(table, key = %k, "functional dependency violated");
            return Err(AppError::FunctionalDependency { table, key: k });
        }
    }
    Ok(())
}

/// Every order's customer and every line's order and product must exist.
pub fn check_referential_integrity(tables: &NormalizedTables) -> AppResult<()> {
    let customers: HashSet<&str> = tables
        .customers
        .iter()
        .map(|c| c.customer_id.as_str())
        .collect();
    let orders: HashSet<i32> = tables.orders.iter().map(|o| o.order_id).collect();
    let products: HashSet<&str> = tables
        .products
        .iter()
        .map(|p| p.product_id.as_str())
        .collect();

    for order in &tables.orders {
        if !customers.contains(order.customer_id.as_str()) {
            return Err(AppError::DanglingReference {
                table: "orders",
                column: "customer_id",
                value: order.customer_id.clone(),
            });
        }
    }
    for item in &tables.order_items {
        if !orders.contains(&item.order_id) {
            return Err(AppError::DanglingReference {
                table: "order_items",
                column: "order_id",
                value: item.order_id.to_string(),
            });
        }
        if !products.contains(item.product_id.as_str()) {
            return Err(AppError::DanglingReference {
                table: "order_items",
                column: "product_id",
                value: item.product_id.clone(),
            });
        }
    }
    Ok(())
}

/// Joins the four tables back into flat rows, ordered by line item id.
pub fn reconstruct(tables: &NormalizedTables) -> AppResult<Vec<FlatOrder>> {
    check_referential_integrity(tables)?;

    let customers: HashMap<&str, &Customer> = tables
        .customers
        .iter()
        .map(|c| (c.customer_id.as_str(), c))
        .collect();
    let products: HashMap<&str, &Product> = tables
        .products
        .iter()
        .map(|p| (p.product_id.as_str(), p))
        .collect();
    let orders: HashMap<i32, &Order> = tables.orders.iter().map(|o| (o.order_id, o)).collect();

    let mut items: Vec<&OrderItem> = tables.order_items.iter().collect();
    items.sort_by_key(|item| item.line_item_id);

    // Lookups cannot miss after the integrity check above.
    let rows = items
        .into_iter()
        .map(|item| {
            let order = orders[&item.order_id];
            let customer = customers[order.customer_id.as_str()];
            let product = products[item.product_id.as_str()];
            FlatOrder {
                order_id: order.order_id,
                order_date: order.order_date,
                customer_id: customer.customer_id.clone(),
                customer_name: customer.customer_name.clone(),
                customer_email: customer.customer_email.clone(),
                customer_address: customer.customer_address.clone(),
                customer_city: customer.customer_city.clone(),
                customer_state: customer.customer_state.clone(),
                customer_zip: customer.customer_zip.clone(),
                product_id: product.product_id.clone(),
                product_name: product.product_name.clone(),
                product_description: product.product_description.clone(),
                product_price: product.product_price,
                product_category: product.product_category.clone(),
                quantity: item.quantity,
                total_amount: item.total_amount,
            }
        })
        .collect();
    Ok(rows)
}

/// Line keys of the flat rows, sorted; used to compare multisets of lines.
pub fn sorted_line_keys(rows: &[FlatOrder]) -> Vec<LineKey> {
    let mut keys: Vec<LineKey> = rows.iter().map(FlatOrder::line_key).collect();
    keys.sort();
    keys
}
