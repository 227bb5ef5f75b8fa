//! Constraint probes: statements that try to break the schema's keys and
//! checks against loaded data. Each probe runs in its own transaction, which
//! is always rolled back, so the database is left as it was.

use std::fmt;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseTransaction, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait, sea_query::Expr,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    db::OrmConn,
    entity::{
        Customers, OrderItems, Orders, Products, customers, order_items, orders, products,
    },
    error::{AppError, AppResult, ConstraintKind},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Probe {
    /// Order whose customer does not exist.
    InvalidCustomerReference,
    /// Second customer with an existing email.
    DuplicateEmail,
    /// Product with a price below zero.
    NegativePrice,
    /// Order item with quantity 0.
    ZeroQuantity,
    /// Delete a customer that still has orders.
    DeleteReferencedCustomer,
    /// Delete a product that still has order items.
    DeleteReferencedProduct,
    /// Delete an order; its items must go with it.
    CascadeOrderDelete,
    /// Rename a customer id; its orders must follow.
    CascadeCustomerIdUpdate,
}

pub const ALL_PROBES: [Probe; 8] = [
    Probe::InvalidCustomerReference,
    Probe::DuplicateEmail,
    Probe::NegativePrice,
    Probe::ZeroQuantity,
    Probe::DeleteReferencedCustomer,
    Probe::DeleteReferencedProduct,
    Probe::CascadeOrderDelete,
    Probe::CascadeCustomerIdUpdate,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Rejected(ConstraintKind),
    Accepted,
    /// The statement succeeded but the expected cascade did not happen.
    AcceptedWithoutEffect,
}

impl Probe {
    pub fn expected(self) -> Outcome {
        match self {
            Probe::InvalidCustomerReference
            | Probe::DeleteReferencedCustomer
            | Probe::DeleteReferencedProduct => Outcome::Rejected(ConstraintKind::ForeignKey),
            Probe::DuplicateEmail => Outcome::Rejected(ConstraintKind::Unique),
            Probe::NegativePrice | Probe::ZeroQuantity => Outcome::Rejected(ConstraintKind::Check),
            Probe::CascadeOrderDelete | Probe::CascadeCustomerIdUpdate => Outcome::Accepted,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ProbeOutcome {
    pub probe: Probe,
    pub expected: Outcome,
    pub observed: Outcome,
    pub detail: Option<String>,
}

impl ProbeOutcome {
    pub fn passed(&self) -> bool {
        self.expected == self.observed
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.passed() { "ok" } else { "FAILED" };
        write!(
            f,
            "[{mark}] {:?}: expected {:?}, observed {:?}",
            self.probe, self.expected, self.observed
        )?;
        if let Some(detail) = &self.detail {
            write!(f, " ({detail})")?;
        }
        Ok(())
    }
}

/// Existing rows the probes aim at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeTargets {
    pub customer_id: String,
    pub customer_email: String,
    pub product_id: String,
    pub order_id: i32,
    pub unused_order_id: i32,
}

impl ProbeTargets {
    /// Picks the first loaded order item and the rows it references.
    pub async fn discover(conn: &OrmConn) -> AppResult<Self> {
        let item = OrderItems::find()
            .order_by_asc(order_items::Column::LineItemId)
            .one(conn)
            .await?
            .ok_or_else(|| AppError::BadRequest("probes need at least one loaded order item".into()))?;
        let order = Orders::find_by_id(item.order_id)
            .one(conn)
            .await?
            .ok_or(AppError::NotFound)?;
        let customer = Customers::find_by_id(order.customer_id.clone())
            .one(conn)
            .await?
            .ok_or(AppError::NotFound)?;
        let lowest = Orders::find()
            .order_by_asc(orders::Column::OrderId)
            .one(conn)
            .await?
            .map_or(order.order_id, |o| o.order_id);
        let highest = Orders::find()
            .order_by_desc(orders::Column::OrderId)
            .one(conn)
            .await?
            .map_or(order.order_id, |o| o.order_id);
        let spare_id = unused_order_id(lowest, highest).ok_or_else(|| {
            AppError::BadRequest("no free order id outside the loaded range".into())
        })?;

        Ok(Self {
            customer_id: customer.customer_id,
            customer_email: customer.customer_email,
            product_id: item.product_id,
            order_id: order.order_id,
            unused_order_id: spare_id,
        })
    }
}

/// An order id just outside `lowest..=highest`: above it when possible,
/// otherwise below it.
pub fn unused_order_id(lowest: i32, highest: i32) -> Option<i32> {
    highest.checked_add(1).or_else(|| lowest.checked_sub(1))
}

pub async fn run_probes(conn: &OrmConn) -> AppResult<Vec<ProbeOutcome>> {
    let targets = ProbeTargets::discover(conn).await?;
    let mut outcomes = Vec::with_capacity(ALL_PROBES.len());
    for probe in ALL_PROBES {
        let outcome = run_probe(conn, probe, &targets).await?;
        if outcome.passed() {
            tracing::info!(probe = ?probe, observed = ?outcome.observed, "constraint probe passed");
        } else {
            tracing::warn!(probe = ?probe, expected = ?outcome.expected, observed = ?outcome.observed, "constraint probe failed");
        }
        outcomes.push(outcome);
    }
    Ok(outcomes)
}

/// Runs one probe in a transaction that is rolled back afterwards. Constraint
/// rejections are recorded as outcomes; any other error is returned.
pub async fn run_probe(conn: &OrmConn, probe: Probe, targets: &ProbeTargets) -> AppResult<ProbeOutcome> {
    let txn = conn.begin().await?;
    let result = execute(&txn, probe, targets).await;
    txn.rollback().await?;

    let (observed, detail) = match result {
        Ok(true) => (Outcome::Accepted, None),
        Ok(false) => (Outcome::AcceptedWithoutEffect, None),
        Err(AppError::Constraint { kind, message }) => (Outcome::Rejected(kind), Some(message)),
        Err(err) => {
            tracing::error!(probe = ?probe, error = %err, "constraint probe errored");
            return Err(err);
        }
    };

    Ok(ProbeOutcome {
        probe,
        expected: probe.expected(),
        observed,
        detail,
    })
}

/// Returns whether the statement's intended effect is visible afterwards.
async fn execute(txn: &DatabaseTransaction, probe: Probe, targets: &ProbeTargets) -> AppResult<bool> {
    match probe {
        Probe::InvalidCustomerReference => {
            orders::ActiveModel {
                order_id: Set(targets.unused_order_id),
                order_date: Set(Utc::now().naive_utc()),
                customer_id: Set("INVALID".into()),
                created_at: NotSet,
            }
            .insert(txn)
            .await?;
            Ok(true)
        }
        Probe::DuplicateEmail => {
            customers::ActiveModel {
                customer_id: Set("DUPE001".into()),
                customer_name: Set("Duplicate Email".into()),
                customer_email: Set(targets.customer_email.clone()),
                address: Set(None),
                city: Set(None),
                state: Set(None),
                zip_code: Set(None),
                created_at: NotSet,
            }
            .insert(txn)
            .await?;
            Ok(true)
        }
        Probe::NegativePrice => {
            products::ActiveModel {
                product_id: Set("NEG001".into()),
                product_name: Set("Negative".into()),
                description: Set(None),
                price: Set(Decimal::new(-100, 2)),
                category: Set(None),
                created_at: NotSet,
            }
            .insert(txn)
            .await?;
            Ok(true)
        }
        Probe::ZeroQuantity => {
            order_items::ActiveModel {
                line_item_id: NotSet,
                order_id: Set(targets.order_id),
                product_id: Set(targets.product_id.clone()),
                quantity: Set(0),
                line_total: Set(Decimal::ZERO),
            }
            .insert(txn)
            .await?;
            Ok(true)
        }
        Probe::DeleteReferencedCustomer => {
            let res = Customers::delete_by_id(targets.customer_id.clone())
                .exec(txn)
                .await?;
            Ok(res.rows_affected == 1)
        }
        Probe::DeleteReferencedProduct => {
            let res = Products::delete_by_id(targets.product_id.clone())
                .exec(txn)
                .await?;
            Ok(res.rows_affected == 1)
        }
        Probe::CascadeOrderDelete => {
            Orders::delete_by_id(targets.order_id).exec(txn).await?;
            let remaining = OrderItems::find()
                .filter(order_items::Column::OrderId.eq(targets.order_id))
                .count(txn)
                .await?;
            Ok(remaining == 0)
        }
        Probe::CascadeCustomerIdUpdate => {
            const MOVED_ID: &str = "MOVED01";
            let before = Orders::find()
                .filter(orders::Column::CustomerId.eq(targets.customer_id.clone()))
                .count(txn)
                .await?;
            Customers::update_many()
                .col_expr(customers::Column::CustomerId, Expr::value(MOVED_ID))
                .filter(customers::Column::CustomerId.eq(targets.customer_id.clone()))
                .exec(txn)
                .await?;
            let after = Orders::find()
                .filter(orders::Column::CustomerId.eq(MOVED_ID))
                .count(txn)
                .await?;
            Ok(before > 0 && after == before)
        }
    }
}
