use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use crate::models::LineKey;

/// One row of the denormalized view rebuilt by joining the four tables.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct ReconstructedRow {
    pub order_id: i32,
    pub order_date: NaiveDateTime,
    pub customer_id: String,
    pub customer_name: String,
    pub product_id: String,
    pub product_name: String,
    pub quantity: i32,
    #[schema(value_type = String)]
    pub unit_price: Decimal,
    #[schema(value_type = String)]
    pub line_total: Decimal,
    pub line_item_id: i32,
}

impl ReconstructedRow {
    pub fn line_key(&self) -> LineKey {
        LineKey {
            order_id: self.order_id,
            product_id: self.product_id.clone(),
            quantity: self.quantity,
            total: self.line_total,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct CustomerSpend {
    pub customer_id: String,
    pub customer_name: String,
    pub total_orders: i64,
    #[schema(value_type = String)]
    pub total_spent: Decimal,
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ReconstructedQuery {
    /// Maximum number of rows; all rows when absent.
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct ReconstructedList {
    #[schema(value_type = Vec<ReconstructedRow>)]
    pub items: Vec<ReconstructedRow>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct CustomerSpendList {
    #[schema(value_type = Vec<CustomerSpend>)]
    pub items: Vec<CustomerSpend>,
}
