mod common;

use order_normalizer::{
    dto::reports::{CustomerSpend, ReconstructedRow},
    models::FlatOrder,
    normalize::normalize,
    verify::{
        customer_spend_from_flat, verify_customer_spend, verify_line_totals, verify_projections,
        verify_reconstruction,
    },
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use common::{flat_row, seeded_rows};

fn joined(row: &FlatOrder, line_item_id: i32) -> ReconstructedRow {
    ReconstructedRow {
        order_id: row.order_id,
        order_date: row.order_date,
        customer_id: row.customer_id.clone(),
        customer_name: row.customer_name.clone(),
        product_id: row.product_id.clone(),
        product_name: row.product_name.clone(),
        quantity: row.quantity,
        unit_price: row.product_price,
        line_total: row.total_amount,
        line_item_id,
    }
}

#[test]
fn reconstruction_matches_regardless_of_row_order() {
    let flat = seeded_rows(13, 15, 2);
    let mut rows: Vec<_> = flat.iter().zip(1..).map(|(r, id)| joined(r, id)).collect();
    rows.reverse();

    let check = verify_reconstruction(&flat, &rows);
    assert!(check.is_exact(), "{check:?}");
    assert_eq!(check.expected_lines, flat.len());
    assert_eq!(check.reconstructed_lines, flat.len());
}

#[test]
fn reconstruction_reports_missing_and_unexpected_lines() {
    let flat = vec![
        flat_row(1, ("C1", "Alice Johnson"), ("P1", "Laptop", 99999), 1),
        flat_row(2, ("C1", "Alice Johnson"), ("P2", "Mouse", 2999), 2),
    ];
    let mut changed = joined(&flat[1], 2);
    changed.quantity = 3;
    let rows = vec![joined(&flat[0], 1), changed];

    let check = verify_reconstruction(&flat, &rows);
    assert!(!check.is_exact());
    assert_eq!(check.missing.len(), 1);
    assert_eq!(check.missing[0].quantity, 2);
    assert_eq!(check.unexpected.len(), 1);
    assert_eq!(check.unexpected[0].quantity, 3);
}

#[test]
fn duplicated_join_rows_are_not_exact() {
    let flat = vec![flat_row(1, ("C1", "Alice Johnson"), ("P1", "Laptop", 99999), 1)];
    let rows = vec![joined(&flat[0], 1), joined(&flat[0], 2)];
    let check = verify_reconstruction(&flat, &rows);
    assert_eq!(check.unexpected.len(), 1);
}

#[test]
fn spend_is_summed_per_customer() {
    let flat = vec![
        flat_row(1, ("C1", "Alice Johnson"), ("P1", "Laptop", 99999), 3),
        flat_row(2, ("C1", "Alice Johnson"), ("P2", "Mouse", 2999), 1),
        flat_row(3, ("C2", "Bob Smith"), ("P2", "Mouse", 2999), 2),
    ];
    let totals = customer_spend_from_flat(&flat);
    assert_eq!(totals["C1"], dec!(3029.96));
    assert_eq!(totals["C2"], dec!(59.98));

    let spend = vec![
        CustomerSpend {
            customer_id: "C1".into(),
            customer_name: "Alice Johnson".into(),
            total_orders: 2,
            total_spent: dec!(3029.96),
        },
        CustomerSpend {
            customer_id: "C2".into(),
            customer_name: "Bob Smith".into(),
            total_orders: 1,
            total_spent: dec!(59.98),
        },
        CustomerSpend {
            customer_id: "C3".into(),
            customer_name: "Carol White".into(),
            total_orders: 0,
            total_spent: Decimal::ZERO,
        },
    ];
    let check = verify_customer_spend(&flat, &spend);
    assert!(check.is_exact(), "{check:?}");
    assert_eq!(check.customers, 3);
}

#[test]
fn spend_mismatch_is_reported() {
    let flat = vec![flat_row(1, ("C1", "Alice Johnson"), ("P1", "Laptop", 99999), 1)];
    let spend = vec![CustomerSpend {
        customer_id: "C1".into(),
        customer_name: "Alice Johnson".into(),
        total_orders: 1,
        total_spent: dec!(999.98),
    }];
    let check = verify_customer_spend(&flat, &spend);
    assert_eq!(check.mismatches.len(), 1);
    assert_eq!(check.mismatches[0].expected, dec!(999.99));
}

#[test]
fn projections_of_normalized_tables_are_exact() {
    let flat = seeded_rows(17, 25, 3);
    let tables = normalize(&flat).expect("normalize");
    assert!(verify_projections(&flat, &tables).is_exact());
}

#[test]
fn duplicated_or_missing_table_rows_are_flagged() {
    let flat = seeded_rows(19, 10, 1);
    let mut tables = normalize(&flat).expect("normalize");
    let dup = tables.customers[0].clone();
    tables.customers.push(dup);
    tables.order_items.pop();

    let check = verify_projections(&flat, &tables);
    assert_eq!(check.mismatched_tables, ["customers", "order_items"]);
}

#[test]
fn joined_line_totals_match_quantity_times_price() {
    let flat = seeded_rows(23, 12, 3);
    let rows: Vec<_> = flat.iter().zip(1..).map(|(r, id)| joined(r, id)).collect();
    let check = verify_line_totals(&rows);
    assert!(check.is_exact(), "{check}");
    assert_eq!(check.lines, flat.len());
}

#[test]
fn wrong_stored_line_total_is_flagged() {
    let flat = vec![
        flat_row(1, ("C1", "Alice Johnson"), ("P1", "Laptop", 99999), 2),
        flat_row(2, ("C2", "Bob Smith"), ("P2", "Mouse", 2999), 1),
    ];
    let mut rows: Vec<_> = flat.iter().zip(1..).map(|(r, id)| joined(r, id)).collect();
    rows[0].line_total = dec!(1.00);

    let check = verify_line_totals(&rows);
    assert!(!check.is_exact());
    assert_eq!(check.mismatched.len(), 1);
    assert_eq!(check.mismatched[0].order_id, 1);
    assert_eq!(check.mismatched[0].total, dec!(1.00));
}
