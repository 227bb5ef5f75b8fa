use axum::{Json, Router, extract::State, routing::get};

use crate::{
    error::AppResult,
    models::{Customer, Order, OrderItem, Product},
    response::{ApiResponse, Meta},
    services::tables,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/customers", get(list_customers))
        .route("/products", get(list_products))
        .route("/orders", get(list_orders))
        .route("/order-items", get(list_order_items))
}

#[utoipa::path(
    get,
    path = "/api/customers",
    responses((status = 200, description = "Customers table", body = ApiResponse<Vec<Customer>>)),
    tag = "Tables"
)]
pub async fn list_customers(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<Customer>>>> {
    let rows = tables::list_customers(&state.orm).await?;
    let meta = Meta::count(rows.len());
    Ok(Json(ApiResponse::success("Customers", rows, Some(meta))))
}

#[utoipa::path(
    get,
    path = "/api/products",
    responses((status = 200, description = "Products table", body = ApiResponse<Vec<Product>>)),
    tag = "Tables"
)]
pub async fn list_products(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<Product>>>> {
    let rows = tables::list_products(&state.orm).await?;
    let meta = Meta::count(rows.len());
    Ok(Json(ApiResponse::success("Products", rows, Some(meta))))
}

#[utoipa::path(
    get,
    path = "/api/orders",
    responses((status = 200, description = "Orders table", body = ApiResponse<Vec<Order>>)),
    tag = "Tables"
)]
pub async fn list_orders(State(state): State<AppState>) -> AppResult<Json<ApiResponse<Vec<Order>>>> {
    let rows = tables::list_orders(&state.orm).await?;
    let meta = Meta::count(rows.len());
    Ok(Json(ApiResponse::success("Orders", rows, Some(meta))))
}

#[utoipa::path(
    get,
    path = "/api/order-items",
    responses((status = 200, description = "Order items table", body = ApiResponse<Vec<OrderItem>>)),
    tag = "Tables"
)]
pub async fn list_order_items(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<OrderItem>>>> {
    let rows = tables::list_order_items(&state.orm).await?;
    let meta = Meta::count(rows.len());
    Ok(Json(ApiResponse::success("Order items", rows, Some(meta))))
}
