//! Per-user cart: read-modify-write over the stored item list, with every
//! mutation responding with the materialized cart.

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::domain::cart::{CartContents, CartEntry, PizzaKind, PizzaRef};
use crate::error::{ApiError, ApiResult};
use crate::models::{self, CartItemRecord, CartRecord, MaterializedItem};
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartMutation {
    pub pizza_type: String,
    pub pizza_id: Uuid,
    pub quantity: Option<i32>,
}

impl CartMutation {
    fn pizza(&self) -> Result<PizzaRef, ApiError> {
        let kind: PizzaKind = self
            .pizza_type
            .parse()
            .map_err(|_| ApiError::Validation("Invalid pizza type".into()))?;
        Ok(PizzaRef { kind, id: self.pizza_id })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub items: Vec<MaterializedItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub async fn add_to_cart(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Json(req): Json<CartMutation>,
) -> ApiResult<Json<CartResponse>> {
    let pizza = req.pizza()?;
    let quantity = req.quantity.unwrap_or(1);
    if quantity < 1 {
        return Err(ApiError::Validation("Quantity must be at least 1".into()));
    }

    if models::fetch_pizza(&state.db, pizza.kind, pizza.id).await?.is_none() {
        return Err(not_found_for(pizza.kind));
    }

    let cart = get_or_create_cart(&state.db, principal.id).await?;
    let mut contents = load_contents(&state.db, cart.id).await?;
    contents.add(pizza, quantity);
    save_contents(&state.db, cart.id, &contents).await?;

    Ok(Json(materialize(&state.db, cart).await?))
}

pub async fn get_cart(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> ApiResult<Response> {
    match find_cart(&state.db, principal.id).await? {
        // A user who never added anything simply has nothing in the cart.
        None => Ok(Json(json!({"items": []})).into_response()),
        Some(cart) => Ok(Json(materialize(&state.db, cart).await?).into_response()),
    }
}

pub async fn remove_item(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Json(req): Json<CartMutation>,
) -> ApiResult<Json<CartResponse>> {
    let pizza = req.pizza()?;
    let cart = find_cart(&state.db, principal.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Cart not found".into()))?;

    let mut contents = load_contents(&state.db, cart.id).await?;
    // Absent entry: save and return the cart unchanged.
    contents.remove(pizza);
    save_contents(&state.db, cart.id, &contents).await?;

    Ok(Json(materialize(&state.db, cart).await?))
}

pub async fn update_quantity(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Json(req): Json<CartMutation>,
) -> ApiResult<Json<CartResponse>> {
    let pizza = req.pizza()?;
    let cart = find_cart(&state.db, principal.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Cart not found".into()))?;

    let mut contents = load_contents(&state.db, cart.id).await?;
    contents
        .set_quantity(pizza, req.quantity.unwrap_or(1))
        .map_err(|_| ApiError::NotFound("Item not found in cart".into()))?;
    save_contents(&state.db, cart.id, &contents).await?;

    Ok(Json(materialize(&state.db, cart).await?))
}

fn not_found_for(kind: PizzaKind) -> ApiError {
    match kind {
        PizzaKind::Custom => ApiError::NotFound("Custom pizza not found".into()),
        PizzaKind::Variety => ApiError::NotFound("Pizza variety not found".into()),
    }
}

async fn find_cart(db: &PgPool, user_id: Uuid) -> Result<Option<CartRecord>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM carts WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(db)
        .await
}

async fn get_or_create_cart(db: &PgPool, user_id: Uuid) -> Result<CartRecord, sqlx::Error> {
    sqlx::query("INSERT INTO carts (id, user_id) VALUES ($1, $2) ON CONFLICT (user_id) DO NOTHING")
        .bind(Uuid::new_v4())
        .bind(user_id)
        .execute(db)
        .await?;
    sqlx::query_as("SELECT * FROM carts WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(db)
        .await
}

async fn load_contents(db: &PgPool, cart_id: Uuid) -> Result<CartContents, sqlx::Error> {
    let records: Vec<CartItemRecord> =
        sqlx::query_as("SELECT * FROM cart_items WHERE cart_id = $1 ORDER BY position")
            .bind(cart_id)
            .fetch_all(db)
            .await?;
    Ok(CartContents::from_entries(
        records
            .into_iter()
            .map(|r| CartEntry {
                pizza: PizzaRef { kind: r.pizza_type, id: r.pizza_id },
                quantity: r.quantity,
            })
            .collect(),
    ))
}

async fn save_contents(db: &PgPool, cart_id: Uuid, contents: &CartContents) -> Result<(), sqlx::Error> {
    let mut tx = db.begin().await?;
    sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
        .bind(cart_id)
        .execute(&mut *tx)
        .await?;
    for (position, entry) in contents.entries().iter().enumerate() {
        sqlx::query(
            "INSERT INTO cart_items (id, cart_id, pizza_type, pizza_id, quantity, position) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(Uuid::new_v4())
        .bind(cart_id)
        .bind(entry.pizza.kind)
        .bind(entry.pizza.id)
        .bind(entry.quantity)
        .bind(position as i32)
        .execute(&mut *tx)
        .await?;
    }
    sqlx::query("UPDATE carts SET updated_at = NOW() WHERE id = $1")
        .bind(cart_id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await
}

async fn materialize(db: &PgPool, cart: CartRecord) -> Result<CartResponse, sqlx::Error> {
    let contents = load_contents(db, cart.id).await?;
    let refs: Vec<(PizzaRef, i32)> =
        contents.entries().iter().map(|e| (e.pizza, e.quantity)).collect();
    Ok(CartResponse {
        id: cart.id,
        user_id: cart.user_id,
        items: models::materialize_refs(db, &refs).await?,
        created_at: cart.created_at,
        updated_at: cart.updated_at,
    })
}
