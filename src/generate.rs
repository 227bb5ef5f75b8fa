//! Synthetic, intentionally denormalized order data.

use chrono::{Duration, NaiveDateTime, SubsecRound};
use rand::{Rng, seq::SliceRandom};
use rust_decimal::Decimal;

use crate::{config::GeneratorSettings, error::AppResult, models::FlatOrder};

pub struct CatalogCustomer {
    pub id: &'static str,
    pub name: &'static str,
    pub email: &'static str,
    pub address: &'static str,
    pub city: &'static str,
    pub state: &'static str,
    pub zip: &'static str,
}

pub struct CatalogProduct {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Price in cents.
    pub price_cents: i64,
    pub category: &'static str,
}

impl CatalogProduct {
    pub fn price(&self) -> Decimal {
        Decimal::new(self.price_cents, 2)
    }
}

pub static CUSTOMERS: [CatalogCustomer; 3] = [
    CatalogCustomer {
        id: "CUST001",
        name: "Alice Johnson",
        email: "alice@email.com",
        address: "123 Main St",
        city: "New York",
        state: "NY",
        zip: "10001",
    },
    CatalogCustomer {
        id: "CUST002",
        name: "Bob Smith",
        email: "bob@email.com",
        address: "456 Oak Ave",
        city: "Los Angeles",
        state: "CA",
        zip: "90001",
    },
    CatalogCustomer {
        id: "CUST003",
        name: "Carol White",
        email: "carol@email.com",
        address: "789 Pine Rd",
        city: "Chicago",
        state: "IL",
        zip: "60601",
    },
];

pub static PRODUCTS: [CatalogProduct; 4] = [
    CatalogProduct {
        id: "PROD001",
        name: "Laptop",
        description: "High-performance laptop",
        price_cents: 99999,
        category: "Electronics",
    },
    CatalogProduct {
        id: "PROD002",
        name: "Mouse",
        description: "Wireless mouse",
        price_cents: 2999,
        category: "Electronics",
    },
    CatalogProduct {
        id: "PROD003",
        name: "Notebook",
        description: "Spiral notebook",
        price_cents: 499,
        category: "Stationery",
    },
    CatalogProduct {
        id: "PROD004",
        name: "Pen",
        description: "Ballpoint pen pack",
        price_cents: 999,
        category: "Stationery",
    },
];

pub const MAX_QUANTITY: i32 = 5;
pub const MAX_AGE_DAYS: i64 = 30;

/// Generates `settings.order_count` orders with consecutive ids. Each order
/// picks one customer, a date 1..=30 days before `now`, and between one and
/// `max_lines_per_order` distinct products, each becoming one flat row.
pub fn generate_flat_orders<R: Rng>(
    rng: &mut R,
    settings: &GeneratorSettings,
    now: NaiveDateTime,
) -> AppResult<Vec<FlatOrder>> {
    let order_ids = settings.order_ids()?;
    let max_lines = settings.max_lines_per_order.clamp(1, PRODUCTS.len());
    let now = now.trunc_subsecs(0);
    let mut rows = Vec::with_capacity(settings.order_count);

    for order_id in order_ids {
        let customer = &CUSTOMERS[rng.gen_range(0..CUSTOMERS.len())];
        let order_date = now - Duration::days(rng.gen_range(1..=MAX_AGE_DAYS));
        let lines = rng.gen_range(1..=max_lines);

        for product in PRODUCTS.choose_multiple(rng, lines) {
            let quantity = rng.gen_range(1..=MAX_QUANTITY);
            let price = product.price();
            rows.push(FlatOrder {
                order_id,
                order_date,
                customer_id: customer.id.to_string(),
                customer_name: customer.name.to_string(),
                customer_email: customer.email.to_string(),
                customer_address: customer.address.to_string(),
                customer_city: customer.city.to_string(),
                customer_state: customer.state.to_string(),
                customer_zip: customer.zip.to_string(),
                product_id: product.id.to_string(),
                product_name: product.name.to_string(),
                product_description: product.description.to_string(),
                product_price: price,
                product_category: product.category.to_string(),
                quantity,
                total_amount: price * Decimal::from(quantity),
            });
        }
    }

    tracing::debug!(orders = settings.order_count, rows = rows.len(), "generated flat orders");
    Ok(rows)
}
