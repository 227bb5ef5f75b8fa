use sea_orm::{EntityTrait, QueryOrder};

use crate::{
    db::OrmConn,
    entity::{
        Customers, OrderItems, Orders, Products, customers, order_items, orders, products,
    },
    error::AppResult,
    models::{Customer, Order, OrderItem, Product},
    normalize::NormalizedTables,
};

pub async fn list_customers(conn: &OrmConn) -> AppResult<Vec<Customer>> {
    let rows = Customers::find()
        .order_by_asc(customers::Column::CustomerId)
        .all(conn)
        .await?
        .into_iter()
        .map(customer_from_entity)
        .collect();
    Ok(rows)
}

pub async fn list_products(conn: &OrmConn) -> AppResult<Vec<Product>> {
    let rows = Products::find()
        .order_by_asc(products::Column::ProductId)
        .all(conn)
        .await?
        .into_iter()
        .map(product_from_entity)
        .collect();
    Ok(rows)
}

pub async fn list_orders(conn: &OrmConn) -> AppResult<Vec<Order>> {
    let rows = Orders::find()
        .order_by_asc(orders::Column::OrderId)
        .all(conn)
        .await?
        .into_iter()
        .map(order_from_entity)
        .collect();
    Ok(rows)
}

pub async fn list_order_items(conn: &OrmConn) -> AppResult<Vec<OrderItem>> {
    let rows = OrderItems::find()
        .order_by_asc(order_items::Column::LineItemId)
        .all(conn)
        .await?
        .into_iter()
        .map(order_item_from_entity)
        .collect();
    Ok(rows)
}

/// Reads all four tables back out of the database.
pub async fn fetch_tables(conn: &OrmConn) -> AppResult<NormalizedTables> {
    Ok(NormalizedTables {
        customers: list_customers(conn).await?,
        products: list_products(conn).await?,
        orders: list_orders(conn).await?,
        order_items: list_order_items(conn).await?,
    })
}

fn customer_from_entity(model: customers::Model) -> Customer {
    Customer {
        customer_id: model.customer_id,
        customer_name: model.customer_name,
        customer_email: model.customer_email,
        customer_address: model.address.unwrap_or_default(),
        customer_city: model.city.unwrap_or_default(),
        // CHAR(2) comes back blank-padded.
        customer_state: model.state.map(|s| s.trim_end().to_string()).unwrap_or_default(),
        customer_zip: model.zip_code.unwrap_or_default(),
    }
}

fn product_from_entity(model: products::Model) -> Product {
    Product {
        product_id: model.product_id,
        product_name: model.product_name,
        product_description: model.description.unwrap_or_default(),
        product_price: model.price,
        product_category: model.category.unwrap_or_default(),
    }
}

fn order_from_entity(model: orders::Model) -> Order {
    Order {
        order_id: model.order_id,
        order_date: model.order_date,
        customer_id: model.customer_id,
    }
}

fn order_item_from_entity(model: order_items::Model) -> OrderItem {
    OrderItem {
        order_id: model.order_id,
        product_id: model.product_id,
        quantity: model.quantity,
        total_amount: model.line_total,
        line_item_id: model.line_item_id,
    }
}
