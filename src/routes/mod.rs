//! HTTP surface.

pub mod auth;
pub mod cart;
pub mod dashboard;
pub mod inventory;
pub mod orders;
pub mod pizza;
pub mod variety;

use axum::routing::{get, patch, post, put};
use axum::{Json, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async {
            Json(serde_json::json!({"status": "healthy", "service": "pizzeria-backend"}))
        }))
        .route("/auth/register", post(auth::register))
        .route("/auth/verify-email", get(auth::verify_email))
        .route("/auth/login", post(auth::login))
        .route("/auth/forgot-password", post(auth::forgot_password))
        .route("/auth/reset-password", post(auth::reset_password))
        .route("/inventory", get(inventory::list_items).post(inventory::add_item))
        .route("/inventory/:id", put(inventory::update_item).delete(inventory::delete_item))
        .route("/inventory/:id/stock", patch(inventory::set_stock))
        .route("/inventory/category/:category/stock", patch(inventory::set_category_stock))
        .route("/pizza/custom", post(pizza::create_custom_pizza))
        .route("/variety", get(variety::list_varieties).post(variety::add_variety))
        .route("/cart", get(cart::get_cart))
        .route("/cart/add", post(cart::add_to_cart))
        .route("/cart/remove", post(cart::remove_item))
        .route("/cart/update", post(cart::update_quantity))
        .route("/orders", post(orders::create_order))
        .route("/orders/mine", get(orders::my_orders))
        .route("/orders/all", get(orders::all_orders))
        .route("/orders/:id/status", put(orders::update_status))
        .route("/admin/dashboard", get(dashboard::admin_dashboard))
        .route("/user/dashboard", get(dashboard::user_dashboard))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
