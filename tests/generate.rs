mod common;

use std::collections::HashSet;

use chrono::Duration;
use order_normalizer::{
    config::GeneratorSettings,
    error::AppError,
    generate::{CUSTOMERS, MAX_AGE_DAYS, MAX_QUANTITY, PRODUCTS, generate_flat_orders},
};
use rand::{SeedableRng, rngs::StdRng};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use common::{fixed_now, seeded_rows};

#[test]
fn totals_are_quantity_times_price() {
    let rows = seeded_rows(7, 50, 3);
    assert!(!rows.is_empty());
    for row in &rows {
        assert_eq!(row.total_amount, row.product_price * Decimal::from(row.quantity));
        assert!((1..=MAX_QUANTITY).contains(&row.quantity));
    }
}

#[test]
fn one_line_per_order_by_default() {
    let rows = seeded_rows(1, 20, 1);
    assert_eq!(rows.len(), 20);
    let ids: Vec<i32> = rows.iter().map(|r| r.order_id).collect();
    assert_eq!(ids, (1000..1020).collect::<Vec<_>>());
}

#[test]
fn dates_fall_within_the_last_thirty_days_at_whole_seconds() {
    let now = fixed_now();
    for row in seeded_rows(3, 40, 1) {
        let age = now - row.order_date;
        assert!(age >= Duration::days(1) && age <= Duration::days(MAX_AGE_DAYS));
        assert_eq!(row.order_date.and_utc().timestamp_subsec_nanos(), 0);
    }
}

#[test]
fn lines_of_one_order_share_header_and_have_distinct_products() {
    let rows = seeded_rows(11, 30, 4);
    assert!(rows.len() > 30, "expected some multi-line orders");
    for order_id in rows.iter().map(|r| r.order_id).collect::<HashSet<_>>() {
        let lines: Vec<_> = rows.iter().filter(|r| r.order_id == order_id).collect();
        let products: HashSet<_> = lines.iter().map(|r| r.product_id.as_str()).collect();
        assert_eq!(products.len(), lines.len());
        assert!(lines.iter().all(|r| r.customer_id == lines[0].customer_id));
        assert!(lines.iter().all(|r| r.order_date == lines[0].order_date));
    }
}

#[test]
fn rows_come_from_the_catalog() {
    let rows = seeded_rows(5, 25, 2);
    for row in &rows {
        let customer = CUSTOMERS.iter().find(|c| c.id == row.customer_id).expect("known customer");
        assert_eq!(customer.email, row.customer_email);
        let product = PRODUCTS.iter().find(|p| p.id == row.product_id).expect("known product");
        assert_eq!(product.price(), row.product_price);
    }
    assert_eq!(PRODUCTS[0].price(), dec!(999.99));
}

#[test]
fn same_seed_reproduces_rows() {
    assert_eq!(seeded_rows(42, 20, 2), seeded_rows(42, 20, 2));
}

#[test]
fn order_ids_past_i32_max_are_a_config_error() {
    let settings = GeneratorSettings {
        order_count: 5,
        first_order_id: i32::MAX - 2,
        ..GeneratorSettings::default()
    };
    let mut rng = StdRng::seed_from_u64(8);
    assert!(matches!(
        generate_flat_orders(&mut rng, &settings, fixed_now()),
        Err(AppError::Config(_))
    ));
}

#[test]
fn order_ids_up_to_i32_max_are_generated() {
    let settings = GeneratorSettings {
        order_count: 2,
        first_order_id: i32::MAX - 2,
        ..GeneratorSettings::default()
    };
    let mut rng = StdRng::seed_from_u64(8);
    let rows = generate_flat_orders(&mut rng, &settings, fixed_now()).expect("generate");
    let ids: Vec<i32> = rows.iter().map(|r| r.order_id).collect();
    assert_eq!(ids, [i32::MAX - 2, i32::MAX - 1]);
}
