//! Persistent records, one struct per table, plus the materialization
//! helpers shared by carts and orders.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::auth::Role;
use crate::domain::cart::{PizzaKind, PizzaRef};
use crate::domain::catalog::{CatalogEntry, Category};
use crate::domain::order::OrderStatus;

#[derive(Clone, Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub is_verified: bool,
    #[serde(skip_serializing)]
    pub verification_token: Option<String>,
    #[serde(skip_serializing)]
    pub reset_token: Option<String>,
    #[serde(skip_serializing)]
    pub reset_token_expires: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    pub id: Uuid,
    pub category: Category,
    pub name: String,
    pub price: i64,
    pub stock: i32,
    pub unit: String,
    pub threshold: i32,
    pub photo: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Ingredient {
    pub fn catalog_entry(&self) -> CatalogEntry {
        CatalogEntry {
            id: self.id,
            name: self.name.clone(),
            category: self.category,
            price: self.price,
            stock: self.stock,
        }
    }
}

/// Immutable once created; `price` is a snapshot of the ingredient prices
/// at assembly time, never recomputed.
#[derive(Clone, Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CustomPizza {
    pub id: Uuid,
    pub base: String,
    pub sauce: String,
    pub cheese: String,
    pub veggies: Vec<String>,
    pub meat: Vec<String>,
    pub price: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PizzaVariety {
    pub id: Uuid,
    pub name: String,
    pub base: String,
    pub sauce: String,
    pub cheese: String,
    pub veggies: Vec<String>,
    pub meat: Vec<String>,
    pub price: i64,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, FromRow)]
pub struct CartRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, FromRow)]
pub struct CartItemRecord {
    pub id: Uuid,
    pub cart_id: Uuid,
    pub pizza_type: PizzaKind,
    pub pizza_id: Uuid,
    pub quantity: i32,
    pub position: i32,
}

#[derive(Clone, Debug, FromRow)]
pub struct OrderRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, FromRow)]
pub struct OrderItemRecord {
    pub id: Uuid,
    pub order_id: Uuid,
    pub pizza_type: PizzaKind,
    pub pizza_id: Uuid,
    pub quantity: i32,
}

/// A resolved pizza reference for display; the kind lives next to it in
/// [`MaterializedItem`], so the body itself is untagged.
#[derive(Clone, Debug, Serialize)]
#[serde(untagged)]
pub enum PizzaRecord {
    Custom(CustomPizza),
    Variety(PizzaVariety),
}

/// A cart or order entry with its reference replaced by the full record.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterializedItem {
    pub pizza_type: PizzaKind,
    pub pizza: Option<PizzaRecord>,
    pub quantity: i32,
}

pub async fn fetch_pizza(
    db: &PgPool,
    kind: PizzaKind,
    id: Uuid,
) -> Result<Option<PizzaRecord>, sqlx::Error> {
    match kind {
        PizzaKind::Custom => Ok(sqlx::query_as::<_, CustomPizza>(
            "SELECT * FROM custom_pizzas WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(db)
        .await?
        .map(PizzaRecord::Custom)),
        PizzaKind::Variety => Ok(sqlx::query_as::<_, PizzaVariety>(
            "SELECT * FROM pizza_varieties WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(db)
        .await?
        .map(PizzaRecord::Variety)),
    }
}

pub async fn materialize_refs(
    db: &PgPool,
    refs: &[(PizzaRef, i32)],
) -> Result<Vec<MaterializedItem>, sqlx::Error> {
    let mut items = Vec::with_capacity(refs.len());
    for (pizza, quantity) in refs {
        items.push(MaterializedItem {
            pizza_type: pizza.kind,
            pizza: fetch_pizza(db, pizza.kind, pizza.id).await?,
            quantity: *quantity,
        });
    }
    Ok(items)
}
