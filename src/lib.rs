//! Pizzeria ordering backend
//!
//! REST service for a pizza shop: ingredient inventory, custom pizza
//! assembly with stock reservation, an admin-curated variety catalog,
//! per-user carts and orders with a delivery lifecycle.
//!
//! ## Features
//! - Ingredient catalog with per-item stock tracking
//! - Custom pizza assembly (validate, price, decrement stock atomically)
//! - Pre-defined pizza varieties
//! - Per-user cart with merge-on-add semantics
//! - Orders with a forward-only status lifecycle
//! - Token-based authentication with email verification

use std::sync::Arc;

pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod events;
pub mod mail;
pub mod models;
pub mod routes;

use crate::{config::Config, mail::Mailer};

#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub nats: Option<async_nats::Client>,
    pub config: Arc<Config>,
    pub mailer: Arc<Mailer>,
}
