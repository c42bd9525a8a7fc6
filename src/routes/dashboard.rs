//! Aggregate views: admin counts plus inventory, and the user-facing
//! variety listing.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use serde_json::json;

use crate::auth::{AdminUser, AuthUser, Role};
use crate::error::ApiResult;
use crate::models::{Ingredient, PizzaVariety};
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboard {
    pub total_orders: i64,
    pub total_users: i64,
    pub inventory: Vec<Ingredient>,
    pub low_stock: Vec<Ingredient>,
}

pub async fn admin_dashboard(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
) -> ApiResult<Json<AdminDashboard>> {
    let total_orders: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM orders")
        .fetch_one(&state.db)
        .await?;
    let total_users: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE role = $1")
        .bind(Role::User)
        .fetch_one(&state.db)
        .await?;
    let inventory: Vec<Ingredient> =
        sqlx::query_as("SELECT * FROM ingredients ORDER BY created_at DESC")
            .fetch_all(&state.db)
            .await?;
    let low_stock = inventory
        .iter()
        .filter(|item| item.is_active && item.stock <= item.threshold)
        .cloned()
        .collect();

    Ok(Json(AdminDashboard {
        total_orders: total_orders.0,
        total_users: total_users.0,
        inventory,
        low_stock,
    }))
}

pub async fn user_dashboard(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
) -> ApiResult<Json<serde_json::Value>> {
    let pizzas: Vec<PizzaVariety> =
        sqlx::query_as("SELECT * FROM pizza_varieties ORDER BY created_at DESC")
            .fetch_all(&state.db)
            .await?;
    let message = if pizzas.is_empty() {
        "No pizzas available right now"
    } else {
        "Pizzas fetched successfully"
    };
    Ok(Json(json!({"message": message, "pizzas": pizzas})))
}
