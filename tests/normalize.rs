mod common;

use std::collections::HashSet;

use order_normalizer::{
    error::AppError,
    models::FlatOrder,
    normalize::{check_referential_integrity, normalize, reconstruct, sorted_line_keys},
};

use common::{flat_row, seeded_rows};
use rust_decimal_macros::dec;

#[test]
fn each_table_holds_the_distinct_projections() {
    let rows = seeded_rows(9, 40, 3);
    let tables = normalize(&rows).expect("normalize");

    let customers: HashSet<_> = rows.iter().map(FlatOrder::customer).collect();
    let products: HashSet<_> = rows.iter().map(FlatOrder::product).collect();
    let orders: HashSet<_> = rows.iter().map(FlatOrder::order).collect();

    assert_eq!(tables.customers.len(), customers.len());
    assert_eq!(tables.customers.iter().cloned().collect::<HashSet<_>>(), customers);
    assert_eq!(tables.products.len(), products.len());
    assert_eq!(tables.products.iter().cloned().collect::<HashSet<_>>(), products);
    assert_eq!(tables.orders.len(), orders.len());
    assert_eq!(tables.orders.iter().cloned().collect::<HashSet<_>>(), orders);
    assert_eq!(tables.order_items.len(), rows.len());
}

#[test]
fn projection_keeps_first_appearance_order() {
    let rows = vec![
        flat_row(1, ("C2", "Bob Smith"), ("P1", "Laptop", 99999), 1),
        flat_row(2, ("C1", "Alice Johnson"), ("P2", "Mouse", 2999), 2),
        flat_row(3, ("C2", "Bob Smith"), ("P1", "Laptop", 99999), 3),
    ];
    let tables = normalize(&rows).expect("normalize");
    let ids: Vec<_> = tables.customers.iter().map(|c| c.customer_id.as_str()).collect();
    assert_eq!(ids, ["C2", "C1"]);
    let line_ids: Vec<_> = tables.order_items.iter().map(|i| i.line_item_id).collect();
    assert_eq!(line_ids, [1, 2, 3]);
}

#[test]
fn multi_line_orders_collapse_to_one_header() {
    let rows = vec![
        flat_row(10, ("C1", "Alice Johnson"), ("P1", "Laptop", 99999), 1),
        flat_row(10, ("C1", "Alice Johnson"), ("P2", "Mouse", 2999), 4),
    ];
    let tables = normalize(&rows).expect("normalize");
    assert_eq!(tables.orders.len(), 1);
    assert_eq!(tables.order_items.len(), 2);
}

#[test]
fn conflicting_customer_attributes_are_rejected() {
    let mut second = flat_row(2, ("C1", "Alice Johnson"), ("P1", "Laptop", 99999), 1);
    second.customer_email = "other@email.com".into();
    let rows = vec![flat_row(1, ("C1", "Alice Johnson"), ("P1", "Laptop", 99999), 1), second];

    match normalize(&rows) {
        Err(AppError::FunctionalDependency { table, key }) => {
            assert_eq!(table, "customers");
            assert_eq!(key, "C1");
        }
        other => panic!("expected functional dependency error, got {other:?}"),
    }
}

#[test]
fn conflicting_order_headers_are_rejected() {
    let rows = vec![
        flat_row(5, ("C1", "Alice Johnson"), ("P1", "Laptop", 99999), 1),
        flat_row(5, ("C2", "Bob Smith"), ("P2", "Mouse", 2999), 1),
    ];
    assert!(matches!(
        normalize(&rows),
        Err(AppError::FunctionalDependency { table: "orders", .. })
    ));
}

#[test]
fn total_that_is_not_quantity_times_price_is_rejected() {
    let mut rows = seeded_rows(6, 10, 2);
    rows[0].total_amount = dec!(1.00);
    let expected = rows[0].product_price * rust_decimal::Decimal::from(rows[0].quantity);

    match normalize(&rows) {
        Err(AppError::LineTotal { order_id, product_id, expected: want, actual }) => {
            assert_eq!(order_id, rows[0].order_id);
            assert_eq!(product_id, rows[0].product_id);
            assert_eq!(want, expected);
            assert_eq!(actual, dec!(1.00));
        }
        other => panic!("expected line total error, got {other:?}"),
    }
}

#[test]
fn totals_with_different_scale_still_match() {
    let mut row = flat_row(1, ("C1", "Alice Johnson"), ("P1", "Notebook", 499), 2);
    row.total_amount = dec!(9.9800);
    assert!(normalize(&[row]).is_ok());
}

#[test]
fn joining_the_tables_reproduces_the_flat_rows() {
    let rows = seeded_rows(21, 30, 3);
    let tables = normalize(&rows).expect("normalize");
    let rebuilt = reconstruct(&tables).expect("reconstruct");
    assert_eq!(rebuilt, rows);
    assert_eq!(sorted_line_keys(&rebuilt), sorted_line_keys(&rows));
}

#[test]
fn dangling_product_reference_is_reported() {
    let rows = seeded_rows(2, 5, 1);
    let mut tables = normalize(&rows).expect("normalize");
    tables.order_items[0].product_id = "PROD999".into();

    match check_referential_integrity(&tables) {
        Err(AppError::DanglingReference { table, column, value }) => {
            assert_eq!((table, column), ("order_items", "product_id"));
            assert_eq!(value, "PROD999");
        }
        other => panic!("expected dangling reference, got {other:?}"),
    }
    assert!(reconstruct(&tables).is_err());
}

#[test]
fn order_without_customer_is_reported() {
    let rows = seeded_rows(4, 5, 1);
    let mut tables = normalize(&rows).expect("normalize");
    tables.orders[0].customer_id = "INVALID".into();
    assert!(matches!(
        check_referential_integrity(&tables),
        Err(AppError::DanglingReference { table: "orders", column: "customer_id", .. })
    ));
}
