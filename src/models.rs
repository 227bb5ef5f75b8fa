//! Row shapes of the CSV interchange files. Field names are the CSV headers.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One denormalized row: an (order, product) pairing with every customer and
/// product attribute copied in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct FlatOrder {
    pub order_id: i32,
    pub order_date: NaiveDateTime,
    pub customer_id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_address: String,
    pub customer_city: String,
    pub customer_state: String,
    pub customer_zip: String,
    pub product_id: String,
    pub product_name: String,
    pub product_description: String,
    #[serde(with = "rust_decimal::serde::str")]
    #[schema(value_type = String)]
    pub product_price: Decimal,
    pub product_category: String,
    pub quantity: i32,
    #[serde(with = "rust_decimal::serde::str")]
    #[schema(value_type = String)]
    pub total_amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct Customer {
    pub customer_id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_address: String,
    pub customer_city: String,
    pub customer_state: String,
    pub customer_zip: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub product_id: String,
    pub product_name: String,
    pub product_description: String,
    #[serde(with = "rust_decimal::serde::str")]
    #[schema(value_type = String)]
    pub product_price: Decimal,
    pub product_category: String,
}

/// Order header.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub order_id: i32,
    pub order_date: NaiveDateTime,
    pub customer_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct OrderItem {
    pub order_id: i32,
    pub product_id: String,
    pub quantity: i32,
    #[serde(with = "rust_decimal::serde::str")]
    #[schema(value_type = String)]
    pub total_amount: Decimal,
    pub line_item_id: i32,
}

impl FlatOrder {
    pub fn customer(&self) -> Customer {
        Customer {
            customer_id: self.customer_id.clone(),
            customer_name: self.customer_name.clone(),
            customer_email: self.customer_email.clone(),
            customer_address: self.customer_address.clone(),
            customer_city: self.customer_city.clone(),
            customer_state: self.customer_state.clone(),
            customer_zip: self.customer_zip.clone(),
        }
    }

    pub fn product(&self) -> Product {
        Product {
            product_id: self.product_id.clone(),
            product_name: self.product_name.clone(),
            product_description: self.product_description.clone(),
            product_price: self.product_price,
            product_category: self.product_category.clone(),
        }
    }

    pub fn order(&self) -> Order {
        Order {
            order_id: self.order_id,
            order_date: self.order_date,
            customer_id: self.customer_id.clone(),
        }
    }

    /// The tuple a reconstruction join has to reproduce.
    pub fn line_key(&self) -> LineKey {
        LineKey {
            order_id: self.order_id,
            product_id: self.product_id.clone(),
            quantity: self.quantity,
            total: self.total_amount,
        }
    }
}

/// `(order, product, quantity, total)` identity of one order line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, ToSchema)]
pub struct LineKey {
    pub order_id: i32,
    pub product_id: String,
    pub quantity: i32,
    #[schema(value_type = String)]
    pub total: Decimal,
}
