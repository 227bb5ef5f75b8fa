use crate::{
    db::DbPool,
    dto::reports::{CustomerSpend, ReconstructedRow},
    error::AppResult,
};

/// Rebuilds the denormalized view by joining orders, customers, order items
/// and products. `limit = None` returns every line.
pub async fn fetch_reconstructed_view(
    pool: &DbPool,
    limit: Option<i64>,
) -> AppResult<Vec<ReconstructedRow>> {
    let rows = sqlx::query_as::<_, ReconstructedRow>(
        r#"
        SELECT
            o.order_id,
            o.order_date,
            c.customer_id,
            c.customer_name,
            p.product_id,
            p.product_name,
            oi.quantity,
            p.price AS unit_price,
            oi.line_total,
            oi.line_item_id
        FROM orders o
        JOIN customers c ON o.customer_id = c.customer_id
        JOIN order_items oi ON o.order_id = oi.order_id
        JOIN products p ON oi.product_id = p.product_id
        ORDER BY o.order_id, oi.line_item_id
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Order count and total spend per customer; customers without orders report zero.
pub async fn fetch_customer_spend(pool: &DbPool) -> AppResult<Vec<CustomerSpend>> {
    let rows = sqlx::query_as::<_, CustomerSpend>(
        r#"
        SELECT
            c.customer_id,
            c.customer_name,
            COUNT(DISTINCT o.order_id) AS total_orders,
            COALESCE(SUM(oi.line_total), 0)::NUMERIC(12,2) AS total_spent
        FROM customers c
        LEFT JOIN orders o ON c.customer_id = o.customer_id
        LEFT JOIN order_items oi ON o.order_id = oi.order_id
        GROUP BY c.customer_id, c.customer_name
        ORDER BY total_spent DESC, c.customer_id
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
