use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    db::DbPool,
    dto::orders::{
        CreateOrderRequest, OrderLineView, OrderView, OrderWithLines, UpdateOrderStatusRequest,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, Role},
    models::{Order, OrderLine, order_status},
};

/// Which side of an order the caller is allowed to see. Resolved once from
/// the caller's role; each variant maps to a fixed query predicate.
#[derive(Debug, Clone, Copy)]
pub enum OrderScope {
    Buyer(Uuid),
    Seller(Uuid),
}

impl OrderScope {
    pub fn for_caller(user: &AuthUser) -> Self {
        match user.role {
            Role::Seller => OrderScope::Seller(user.user_id),
            _ => OrderScope::Buyer(user.user_id),
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrderBuyerRow {
    #[sqlx(flatten)]
    order: Order,
    buyer_name: String,
}

#[derive(Debug, sqlx::FromRow)]
struct LineViewRow {
    order_id: Uuid,
    product_id: Uuid,
    quantity: i32,
    unit_price: i64,
    product_name: String,
    product_image: String,
    product_price: i64,
}

pub async fn create(
    pool: &DbPool,
    user: &AuthUser,
    payload: CreateOrderRequest,
) -> AppResult<OrderWithLines> {
    if payload.lines.is_empty() {
        return Err(AppError::BadRequest("No order items".into()));
    }
    for line in &payload.lines {
        if line.quantity < 1 {
            return Err(AppError::BadRequest("Quantity must be at least 1".into()));
        }
        if line.unit_price < 0 {
            return Err(AppError::BadRequest("Price must not be negative".into()));
        }
    }

    let mut txn = pool.begin().await?;

    let order_id = Uuid::new_v4();
    let order: Order = sqlx::query_as(
        r#"
        INSERT INTO orders (
            id, buyer_id, seller_id, total_amount, status,
            shipping_name, shipping_address, shipping_phone, payment_reference
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING *
        "#,
    )
    .bind(order_id)
    .bind(user.user_id)
    .bind(payload.seller)
    .bind(payload.total)
    .bind(order_status::PENDING)
    .bind(&payload.shipping.name)
    .bind(&payload.shipping.address)
    .bind(&payload.shipping.phone)
    .bind(&payload.payment_reference)
    .fetch_one(&mut *txn)
    .await?;

    let mut lines: Vec<OrderLine> = Vec::with_capacity(payload.lines.len());
    for input in &payload.lines {
        let line: OrderLine = sqlx::query_as(
            r#"
            INSERT INTO order_lines (id, order_id, product_id, quantity, unit_price)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(order.id)
        .bind(input.product_id)
        .bind(input.quantity)
        .bind(input.unit_price)
        .fetch_one(&mut *txn)
        .await?;
        lines.push(line);
    }

    txn.commit().await?;

    if let Err(err) = log_audit(
        pool,
        Some(user.user_id),
        "order_created",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id, "total": order.total_amount })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    tracing::info!(order_id = %order.id, buyer = %user.user_id, "order created");

    Ok(OrderWithLines { order, lines })
}

pub async fn list(pool: &DbPool, user: &AuthUser) -> AppResult<Vec<OrderView>> {
    let rows: Vec<OrderBuyerRow> = match OrderScope::for_caller(user) {
        OrderScope::Seller(seller_id) => {
            sqlx::query_as(
                r#"
                SELECT o.*, u.display_name AS buyer_name
                FROM orders o
                JOIN users u ON u.id = o.buyer_id
                WHERE o.seller_id = $1
                ORDER BY o.created_at DESC
                "#,
            )
            .bind(seller_id)
            .fetch_all(pool)
            .await?
        }
        OrderScope::Buyer(buyer_id) => {
            sqlx::query_as(
                r#"
                SELECT o.*, u.display_name AS buyer_name
                FROM orders o
                JOIN users u ON u.id = o.buyer_id
                WHERE o.buyer_id = $1
                ORDER BY o.created_at DESC
                "#,
            )
            .bind(buyer_id)
            .fetch_all(pool)
            .await?
        }
    };

    let order_ids: Vec<Uuid> = rows.iter().map(|r| r.order.id).collect();
    let mut lines = load_line_views(pool, &order_ids).await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let order_lines = lines.remove(&row.order.id).unwrap_or_default();
            to_view(row, order_lines)
        })
        .collect())
}

pub async fn get_by_id(pool: &DbPool, user: &AuthUser, id: Uuid) -> AppResult<OrderView> {
    let row: Option<OrderBuyerRow> = sqlx::query_as(
        r#"
        SELECT o.*, u.display_name AS buyer_name
        FROM orders o
        JOIN users u ON u.id = o.buyer_id
        WHERE o.id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    let row = match row {
        Some(r) => r,
        None => return Err(AppError::NotFound),
    };

    if row.order.buyer_id != user.user_id && row.order.seller_id != user.user_id {
        return Err(AppError::Unauthorized);
    }

    let mut lines = load_line_views(pool, &[row.order.id]).await?;
    let order_lines = lines.remove(&row.order.id).unwrap_or_default();
    Ok(to_view(row, order_lines))
}

pub async fn update_status(
    pool: &DbPool,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<Order> {
    if payload.status.trim().is_empty() {
        return Err(AppError::BadRequest("Status is required".into()));
    }

    let order: Option<Order> = sqlx::query_as("SELECT * FROM orders WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    if order.seller_id != user.user_id {
        return Err(AppError::Unauthorized);
    }

    // Any non-empty status value is accepted; only `delivered` has a side
    // effect, and the delivery flags are never unset by a later transition.
    let (is_delivered, delivered_at) = if payload.status == order_status::DELIVERED {
        (true, Some(Utc::now()))
    } else {
        (order.is_delivered, order.delivered_at)
    };

    let updated: Order = sqlx::query_as(
        r#"
        UPDATE orders
        SET status = $2, is_delivered = $3, delivered_at = $4
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(order.id)
    .bind(&payload.status)
    .bind(is_delivered)
    .bind(delivered_at)
    .fetch_one(pool)
    .await?;

    if let Err(err) = log_audit(
        pool,
        Some(user.user_id),
        "order_status_update",
        Some("orders"),
        Some(serde_json::json!({ "order_id": updated.id, "status": updated.status })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(updated)
}

async fn load_line_views(
    pool: &DbPool,
    order_ids: &[Uuid],
) -> AppResult<HashMap<Uuid, Vec<OrderLineView>>> {
    if order_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows: Vec<LineViewRow> = sqlx::query_as(
        r#"
        SELECT ol.order_id, ol.product_id, ol.quantity, ol.unit_price,
               p.name AS product_name, p.image AS product_image, p.price AS product_price
        FROM order_lines ol
        JOIN products p ON p.id = ol.product_id
        WHERE ol.order_id = ANY($1)
        ORDER BY ol.created_at
        "#,
    )
    .bind(order_ids)
    .fetch_all(pool)
    .await?;

    let mut grouped: HashMap<Uuid, Vec<OrderLineView>> = HashMap::new();
    for row in rows {
        grouped.entry(row.order_id).or_default().push(OrderLineView {
            product_id: row.product_id,
            quantity: row.quantity,
            unit_price: row.unit_price,
            product_name: row.product_name,
            product_image: row.product_image,
            product_price: row.product_price,
        });
    }
    Ok(grouped)
}

fn to_view(row: OrderBuyerRow, lines: Vec<OrderLineView>) -> OrderView {
    OrderView {
        id: row.order.id,
        buyer_id: row.order.buyer_id,
        buyer_name: row.buyer_name,
        seller_id: row.order.seller_id,
        total_amount: row.order.total_amount,
        status: row.order.status,
        is_delivered: row.order.is_delivered,
        delivered_at: row.order.delivered_at,
        created_at: row.order.created_at,
        lines,
    }
}
