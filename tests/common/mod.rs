#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use order_normalizer::{
    config::GeneratorSettings, generate::generate_flat_orders, models::FlatOrder,
};
use rand::{SeedableRng, rngs::StdRng};
use rust_decimal::Decimal;

pub fn fixed_now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 15)
        .and_then(|d| d.and_hms_opt(12, 30, 45))
        .expect("valid timestamp")
}

pub fn seeded_rows(seed: u64, orders: usize, max_lines: usize) -> Vec<FlatOrder> {
    let settings = GeneratorSettings {
        order_count: orders,
        max_lines_per_order: max_lines,
        seed: Some(seed),
        ..GeneratorSettings::default()
    };
    let mut rng = StdRng::seed_from_u64(seed);
    generate_flat_orders(&mut rng, &settings, fixed_now()).expect("generate")
}

/// A hand-built flat row; price and total are in cents.
pub fn flat_row(
    order_id: i32,
    customer: (&str, &str),
    product: (&str, &str, i64),
    quantity: i32,
) -> FlatOrder {
    let price = Decimal::new(product.2, 2);
    FlatOrder {
        order_id,
        order_date: fixed_now(),
        customer_id: customer.0.to_string(),
        customer_name: customer.1.to_string(),
        customer_email: format!("{}@email.com", customer.1.to_lowercase().replace(' ', ".")),
        customer_address: "1 Test Way".to_string(),
        customer_city: "Springfield".to_string(),
        customer_state: "IL".to_string(),
        customer_zip: "62701".to_string(),
        product_id: product.0.to_string(),
        product_name: product.1.to_string(),
        product_description: format!("{} description", product.1),
        product_price: price,
        product_category: "Test".to_string(),
        quantity,
        total_amount: price * Decimal::from(quantity),
    }
}

pub fn temp_dir(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("order-normalizer-{label}-{}", uuid::Uuid::new_v4()))
}
