use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};

use crate::{
    dto::reports::{CustomerSpendList, ReconstructedList, ReconstructedQuery},
    error::{AppError, AppResult},
    response::{ApiResponse, Meta},
    schema::{ColumnInfo, describe_schema},
    services::reports,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/reconstructed", get(reconstructed_view))
        .route("/customer-spend", get(customer_spend))
        .route("/schema", get(schema_columns))
}

#[utoipa::path(
    get,
    path = "/api/reports/reconstructed",
    params(ReconstructedQuery),
    responses(
        (status = 200, description = "Denormalized view rebuilt by joins", body = ApiResponse<ReconstructedList>),
        (status = 400, description = "Negative limit"),
    ),
    tag = "Reports"
)]
pub async fn reconstructed_view(
    State(state): State<AppState>,
    Query(query): Query<ReconstructedQuery>,
) -> AppResult<Json<ApiResponse<ReconstructedList>>> {
    if query.limit.is_some_and(|limit| limit < 0) {
        return Err(AppError::BadRequest("limit must not be negative".into()));
    }
    let items = reports::fetch_reconstructed_view(&state.pool, query.limit).await?;
    let meta = match query.limit {
        Some(limit) => Meta::limited(limit, items.len()),
        None => Meta::count(items.len()),
    };
    Ok(Json(ApiResponse::success(
        "Reconstructed view",
        ReconstructedList { items },
        Some(meta),
    )))
}

#[utoipa::path(
    get,
    path = "/api/reports/customer-spend",
    responses((status = 200, description = "Orders and spend per customer", body = ApiResponse<CustomerSpendList>)),
    tag = "Reports"
)]
pub async fn customer_spend(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<CustomerSpendList>>> {
    let items = reports::fetch_customer_spend(&state.pool).await?;
    let meta = Meta::count(items.len());
    Ok(Json(ApiResponse::success(
        "Customer summary",
        CustomerSpendList { items },
        Some(meta),
    )))
}

#[utoipa::path(
    get,
    path = "/api/reports/schema",
    responses((status = 200, description = "Columns of the normalized tables", body = ApiResponse<Vec<ColumnInfo>>)),
    tag = "Reports"
)]
pub async fn schema_columns(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<ColumnInfo>>>> {
    let columns = describe_schema(&state.pool).await?;
    let meta = Meta::count(columns.len());
    Ok(Json(ApiResponse::success("Schema", columns, Some(meta))))
}
