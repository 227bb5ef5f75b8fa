mod common;

use std::fs;

use order_normalizer::{
    csv_store::{DataFiles, FLAT_ORDERS_FILE},
    normalize::normalize,
};

use common::{seeded_rows, temp_dir};

#[test]
fn flat_file_has_the_fixed_header_and_reads_back() {
    let dir = temp_dir("flat");
    let files = DataFiles::new(&dir);
    let rows = seeded_rows(8, 6, 2);

    files.write_flat(&rows).expect("write flat");
    let text = fs::read_to_string(dir.join(FLAT_ORDERS_FILE)).expect("read text");
    let header = text.lines().next().expect("header");
    assert_eq!(
        header,
        "order_id,order_date,customer_id,customer_name,customer_email,customer_address,\
         customer_city,customer_state,customer_zip,product_id,product_name,\
         product_description,product_price,product_category,quantity,total_amount"
    );
    // Prices stay exact decimal strings.
    assert!(text.contains(",999.99,") || !rows.iter().any(|r| r.product_id == "PROD001"));

    assert_eq!(files.read_flat().expect("read flat"), rows);
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn normalized_files_read_back_into_the_same_tables() {
    let dir = temp_dir("normalized");
    let files = DataFiles::new(&dir);
    let tables = normalize(&seeded_rows(12, 10, 3)).expect("normalize");

    files.write_normalized(&tables).expect("write");
    let items_header = fs::read_to_string(files.order_items())
        .expect("read items")
        .lines()
        .next()
        .map(str::to_string);
    assert_eq!(
        items_header.as_deref(),
        Some("order_id,product_id,quantity,total_amount,line_item_id")
    );

    assert_eq!(files.read_normalized().expect("read"), tables);
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn missing_file_is_an_error() {
    let files = DataFiles::new(temp_dir("missing"));
    assert!(files.read_flat().is_err());
}
