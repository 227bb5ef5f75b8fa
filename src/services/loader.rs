use sea_orm::{ActiveValue::NotSet, DatabaseTransaction, EntityTrait, Set, TransactionTrait};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    db::OrmConn,
    entity::{
        Customers, OrderItems, Orders, Products, customers, order_items, orders, products,
    },
    error::AppResult,
    models::{Customer, Order, OrderItem, Product},
    normalize::NormalizedTables,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct LoadSummary {
    pub customers: usize,
    pub products: usize,
    pub orders: usize,
    pub order_items: usize,
}

/// Inserts the four tables parents-first in a single transaction. Any
/// failure rolls the whole load back.
pub async fn load_normalized(conn: &OrmConn, tables: &NormalizedTables) -> AppResult<LoadSummary> {
    let txn = conn.begin().await?;
    match insert_tables(&txn, tables).await {
        Ok(summary) => {
            txn.commit().await?;
            tracing::info!(
                customers = summary.customers,
                products = summary.products,
                orders = summary.orders,
                order_items = summary.order_items,
                "loaded normalized tables"
            );
            Ok(summary)
        }
        Err(err) => {
            tracing::error!(error = %err, "load failed, rolling back");
            txn.rollback().await?;
            Err(err)
        }
    }
}

async fn insert_tables(txn: &DatabaseTransaction, tables: &NormalizedTables) -> AppResult<LoadSummary> {
    if !tables.customers.is_empty() {
        Customers::insert_many(tables.customers.iter().map(customer_active))
            .exec(txn)
            .await?;
    }
    tracing::debug!(rows = tables.customers.len(), "inserted customers");

    if !tables.products.is_empty() {
        Products::insert_many(tables.products.iter().map(product_active))
            .exec(txn)
            .await?;
    }
    tracing::debug!(rows = tables.products.len(), "inserted products");

    if !tables.orders.is_empty() {
        Orders::insert_many(tables.orders.iter().map(order_active))
            .exec(txn)
            .await?;
    }
    tracing::debug!(rows = tables.orders.len(), "inserted orders");

    // line_item_id comes from the SERIAL sequence, in insertion order.
    let mut items: Vec<&OrderItem> = tables.order_items.iter().collect();
    items.sort_by_key(|item| item.line_item_id);
    if !items.is_empty() {
        OrderItems::insert_many(items.into_iter().map(order_item_active))
            .exec(txn)
            .await?;
    }
    tracing::debug!(rows = tables.order_items.len(), "inserted order items");

    Ok(LoadSummary {
        customers: tables.customers.len(),
        products: tables.products.len(),
        orders: tables.orders.len(),
        order_items: tables.order_items.len(),
    })
}

fn optional(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn customer_active(customer: &Customer) -> customers::ActiveModel {
    customers::ActiveModel {
        customer_id: Set(customer.customer_id.clone()),
        customer_name: Set(customer.customer_name.clone()),
        customer_email: Set(customer.customer_email.clone()),
        address: Set(optional(&customer.customer_address)),
        city: Set(optional(&customer.customer_city)),
        state: Set(optional(&customer.customer_state)),
        zip_code: Set(optional(&customer.customer_zip)),
        created_at: NotSet,
    }
}

fn product_active(product: &Product) -> products::ActiveModel {
    products::ActiveModel {
        product_id: Set(product.product_id.clone()),
        product_name: Set(product.product_name.clone()),
        description: Set(optional(&product.product_description)),
        price: Set(product.product_price),
        category: Set(optional(&product.product_category)),
        created_at: NotSet,
    }
}

fn order_active(order: &Order) -> orders::ActiveModel {
    orders::ActiveModel {
        order_id: Set(order.order_id),
        order_date: Set(order.order_date),
        customer_id: Set(order.customer_id.clone()),
        created_at: NotSet,
    }
}

fn order_item_active(item: &OrderItem) -> order_items::ActiveModel {
    order_items::ActiveModel {
        line_item_id: NotSet,
        order_id: Set(item.order_id),
        product_id: Set(item.product_id.clone()),
        quantity: Set(item.quantity),
        line_total: Set(item.total_amount),
    }
}
