use utoipa::{OpenApi, openapi::OpenApi as OpenApiSpec};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::reports::{CustomerSpend, CustomerSpendList, ReconstructedList, ReconstructedRow},
    models::{Customer, Order, OrderItem, Product},
    response::{ApiResponse, Meta},
    routes::{health, reports, tables},
    schema::ColumnInfo,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "order-normalizer",
        description = "Read-only views over the normalized order tables"
    ),
    paths(
        health::health_check,
        tables::list_customers,
        tables::list_products,
        tables::list_orders,
        tables::list_order_items,
        reports::reconstructed_view,
        reports::customer_spend,
        reports::schema_columns,
    ),
    components(
        schemas(
            Customer,
            Product,
            Order,
            OrderItem,
            ReconstructedRow,
            ReconstructedList,
            CustomerSpend,
            CustomerSpendList,
            ColumnInfo,
            Meta,
            ApiResponse<ReconstructedList>,
            ApiResponse<CustomerSpendList>,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Tables", description = "Rows of the four normalized tables"),
        (name = "Reports", description = "Join and aggregation queries"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
