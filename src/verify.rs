//! Comparisons between the flat source and what comes back out of the
//! normalized tables.

use std::{
    collections::{BTreeMap, HashSet},
    fmt,
    hash::Hash,
};

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    dto::reports::{CustomerSpend, ReconstructedRow},
    models::{FlatOrder, LineKey},
    normalize::{NormalizedTables, project, sorted_line_keys},
};

/// Tables whose contents differ from the distinct projections of the flat rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct ProjectionCheck {
    pub mismatched_tables: Vec<String>,
}

impl ProjectionCheck {
    pub fn is_exact(&self) -> bool {
        self.mismatched_tables.is_empty()
    }
}

/// Each table must hold exactly the distinct projected tuples, with no
/// duplicates; order items must match the flat lines one for one.
pub fn verify_projections(flat: &[FlatOrder], tables: &NormalizedTables) -> ProjectionCheck {
    let mut mismatched_tables = Vec::new();

    if !same_set(&project(flat, FlatOrder::customer), &tables.customers) {
        mismatched_tables.push("customers".to_string());
    }
    if !same_set(&project(flat, FlatOrder::product), &tables.products) {
        mismatched_tables.push("products".to_string());
    }
    if !same_set(&project(flat, FlatOrder::order), &tables.orders) {
        mismatched_tables.push("orders".to_string());
    }

    let mut item_keys: Vec<LineKey> = tables
        .order_items
        .iter()
        .map(|item| LineKey {
            order_id: item.order_id,
            product_id: item.product_id.clone(),
            quantity: item.quantity,
            total: item.total_amount,
        })
        .collect();
    item_keys.sort();
    if item_keys != sorted_line_keys(flat) {
        mismatched_tables.push("order_items".to_string());
    }

    ProjectionCheck { mismatched_tables }
}

fn same_set<T: Eq + Hash>(expected: &[T], actual: &[T]) -> bool {
    let expected_set: HashSet<&T> = expected.iter().collect();
    let actual_set: HashSet<&T> = actual.iter().collect();
    expected.len() == actual.len() && actual_set.len() == actual.len() && expected_set == actual_set
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct ReconstructionCheck {
    pub expected_lines: usize,
    pub reconstructed_lines: usize,
    /// Flat lines the join did not produce.
    pub missing: Vec<LineKey>,
    /// Joined lines with no flat counterpart.
    pub unexpected: Vec<LineKey>,
}

impl ReconstructionCheck {
    pub fn is_exact(&self) -> bool {
        self.missing.is_empty() && self.unexpected.is_empty()
    }
}

/// Compares `(order, product, quantity, total)` tuples as multisets.
pub fn verify_reconstruction(flat: &[FlatOrder], rows: &[ReconstructedRow]) -> ReconstructionCheck {
    let expected = sorted_line_keys(flat);
    let mut actual: Vec<LineKey> = rows.iter().map(ReconstructedRow::line_key).collect();
    actual.sort();

    let (missing, unexpected) = multiset_difference(&expected, &actual);
    ReconstructionCheck {
        expected_lines: expected.len(),
        reconstructed_lines: actual.len(),
        missing,
        unexpected,
    }
}

/// Both inputs sorted. Returns (only in `left`, only in `right`).
fn multiset_difference<T: Ord + Clone>(left: &[T], right: &[T]) -> (Vec<T>, Vec<T>) {
    let (mut i, mut j) = (0, 0);
    let (mut only_left, mut only_right) = (Vec::new(), Vec::new());
    while i < left.len() && j < right.len() {
        match left[i].cmp(&right[j]) {
            std::cmp::Ordering::Equal => {
                i += 1;
                j += 1;
            }
            std::cmp::Ordering::Less => {
                only_left.push(left[i].clone());
                i += 1;
            }
            std::cmp::Ordering::Greater => {
                only_right.push(right[j].clone());
                j += 1;
            }
        }
    }
    only_left.extend_from_slice(&left[i..]);
    only_right.extend_from_slice(&right[j..]);
    (only_left, only_right)
}

/// Joined lines whose stored total is not `quantity × unit price`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct LineTotalCheck {
    pub lines: usize,
    pub mismatched: Vec<LineKey>,
}

impl LineTotalCheck {
    pub fn is_exact(&self) -> bool {
        self.mismatched.is_empty()
    }
}

pub fn verify_line_totals(rows: &[ReconstructedRow]) -> LineTotalCheck {
    let mismatched = rows
        .iter()
        .filter(|row| row.line_total != row.unit_price * Decimal::from(row.quantity))
        .map(ReconstructedRow::line_key)
        .collect();
    LineTotalCheck {
        lines: rows.len(),
        mismatched,
    }
}

/// Sum of `total_amount` per customer id.
pub fn customer_spend_from_flat(flat: &[FlatOrder]) -> BTreeMap<String, Decimal> {
    let mut totals = BTreeMap::new();
    for row in flat {
        *totals.entry(row.customer_id.clone()).or_insert(Decimal::ZERO) += row.total_amount;
    }
    totals
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct SpendMismatch {
    pub customer_id: String,
    #[schema(value_type = String)]
    pub expected: Decimal,
    #[schema(value_type = String)]
    pub actual: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct SpendCheck {
    pub customers: usize,
    pub mismatches: Vec<SpendMismatch>,
}

impl SpendCheck {
    pub fn is_exact(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// Customers missing on either side count as zero spend.
pub fn verify_customer_spend(flat: &[FlatOrder], spend: &[CustomerSpend]) -> SpendCheck {
    let expected = customer_spend_from_flat(flat);
    let actual: BTreeMap<String, Decimal> = spend
        .iter()
        .map(|s| (s.customer_id.clone(), s.total_spent))
        .collect();

    let ids: std::collections::BTreeSet<&String> = expected.keys().chain(actual.keys()).collect();
    let mismatches = ids
        .iter()
        .filter_map(|id| {
            let e = expected.get(*id).copied().unwrap_or(Decimal::ZERO);
            let a = actual.get(*id).copied().unwrap_or(Decimal::ZERO);
            (e != a).then(|| SpendMismatch {
                customer_id: (*id).clone(),
                expected: e,
                actual: a,
            })
        })
        .collect();

    SpendCheck {
        customers: ids.len(),
        mismatches,
    }
}

impl fmt::Display for ReconstructionCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "reconstruction: {} of {} lines rebuilt",
            self.reconstructed_lines, self.expected_lines
        )?;
        if !self.is_exact() {
            write!(
                f,
                ", {} missing, {} unexpected",
                self.missing.len(),
                self.unexpected.len()
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for LineTotalCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line totals: {} lines checked", self.lines)?;
        for key in &self.mismatched {
            write!(
                f,
                "\n  order {} {} x{}: stored {}",
                key.order_id, key.product_id, key.quantity, key.total
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for SpendCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "customer spend: {} customers compared", self.customers)?;
        for m in &self.mismatches {
            write!(f, "\n  {}: expected {} got {}", m.customer_id, m.expected, m.actual)?;
        }
        Ok(())
    }
}
