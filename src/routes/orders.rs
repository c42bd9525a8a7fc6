//! Orders: creation from pizza references, per-user and admin listings,
//! and the admin-driven status lifecycle.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::auth::{AdminUser, AuthUser};
use crate::domain::cart::{PizzaKind, PizzaRef};
use crate::domain::order::{self, OrderEntryRequest, OrderStatus};
use crate::error::{ApiError, ApiResult};
use crate::events::{self, DomainEvent};
use crate::models::{self, MaterializedItem, OrderItemRecord};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub items: Vec<OrderEntryRequest>,
}

#[derive(Debug, FromRow)]
struct OrderWithEmail {
    id: Uuid,
    user_id: Uuid,
    status: OrderStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    user_email: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_email: String,
    pub status: OrderStatus,
    pub items: Vec<MaterializedItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub async fn create_order(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Json(req): Json<CreateOrderRequest>,
) -> ApiResult<(StatusCode, Json<OrderResponse>)> {
    let entries = order::normalize_entries(&req.items)?;
    if entries.is_empty() {
        return Err(ApiError::Validation("Order must contain at least one item".into()));
    }

    // Every reference must resolve before anything is written.
    for (pizza, _) in &entries {
        if models::fetch_pizza(&state.db, pizza.kind, pizza.id).await?.is_none() {
            return Err(match pizza.kind {
                PizzaKind::Custom => ApiError::NotFound("Custom pizza not found".into()),
                PizzaKind::Variety => ApiError::NotFound("Pizza variety not found".into()),
            });
        }
    }

    let mut tx = state.db.begin().await?;
    let order_id = Uuid::new_v4();
    sqlx::query("INSERT INTO orders (id, user_id) VALUES ($1, $2)")
        .bind(order_id)
        .bind(principal.id)
        .execute(&mut *tx)
        .await?;
    for (pizza, quantity) in &entries {
        sqlx::query(
            "INSERT INTO order_items (id, order_id, pizza_type, pizza_id, quantity) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(Uuid::new_v4())
        .bind(order_id)
        .bind(pizza.kind)
        .bind(pizza.id)
        .bind(*quantity)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    events::publish(
        &state.nats,
        DomainEvent::OrderCreated { order_id, user_id: principal.id },
    )
    .await;
    tracing::info!(%order_id, user_id = %principal.id, "order placed");

    let order = fetch_order(&state.db, order_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Order not found".into()))?;
    Ok((StatusCode::CREATED, Json(into_response(&state.db, order).await?)))
}

pub async fn my_orders(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> ApiResult<Json<Vec<OrderResponse>>> {
    let orders: Vec<OrderWithEmail> = sqlx::query_as(
        "SELECT o.*, u.email AS user_email FROM orders o \
         JOIN users u ON u.id = o.user_id \
         WHERE o.user_id = $1 ORDER BY o.created_at DESC",
    )
    .bind(principal.id)
    .fetch_all(&state.db)
    .await?;

    let mut responses = Vec::with_capacity(orders.len());
    for order in orders {
        responses.push(into_response(&state.db, order).await?);
    }
    Ok(Json(responses))
}

pub async fn all_orders(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
) -> ApiResult<Json<Vec<OrderResponse>>> {
    let orders: Vec<OrderWithEmail> = sqlx::query_as(
        "SELECT o.*, u.email AS user_email FROM orders o \
         JOIN users u ON u.id = o.user_id \
         ORDER BY o.created_at DESC",
    )
    .fetch_all(&state.db)
    .await?;

    let mut responses = Vec::with_capacity(orders.len());
    for order in orders {
        responses.push(into_response(&state.db, order).await?);
    }
    Ok(Json(responses))
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

pub async fn update_status(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateStatusRequest>,
) -> ApiResult<Json<OrderResponse>> {
    let next: OrderStatus = req
        .status
        .parse()
        .map_err(|_| ApiError::Validation("Invalid order status".into()))?;

    let order = fetch_order(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Order not found".into()))?;
    if !order.status.can_advance_to(next) {
        return Err(ApiError::Validation(format!(
            "Cannot move order from {} to {}",
            order.status, next
        )));
    }

    sqlx::query("UPDATE orders SET status = $2, updated_at = NOW() WHERE id = $1")
        .bind(id)
        .bind(next)
        .execute(&state.db)
        .await?;

    events::publish(&state.nats, DomainEvent::OrderStatusChanged { order_id: id, status: next })
        .await;

    let order = fetch_order(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Order not found".into()))?;
    Ok(Json(into_response(&state.db, order).await?))
}

async fn fetch_order(db: &PgPool, id: Uuid) -> Result<Option<OrderWithEmail>, sqlx::Error> {
    sqlx::query_as(
        "SELECT o.*, u.email AS user_email FROM orders o \
         JOIN users u ON u.id = o.user_id WHERE o.id = $1",
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

async fn into_response(db: &PgPool, order: OrderWithEmail) -> Result<OrderResponse, sqlx::Error> {
    let items: Vec<OrderItemRecord> =
        sqlx::query_as("SELECT * FROM order_items WHERE order_id = $1")
            .bind(order.id)
            .fetch_all(db)
            .await?;
    let refs: Vec<(PizzaRef, i32)> = items
        .iter()
        .map(|item| (PizzaRef { kind: item.pizza_type, id: item.pizza_id }, item.quantity))
        .collect();
    Ok(OrderResponse {
        id: order.id,
        user_id: order.user_id,
        user_email: order.user_email,
        status: order.status,
        items: models::materialize_refs(db, &refs).await?,
        created_at: order.created_at,
        updated_at: order.updated_at,
    })
}
