//! The admin-curated variety catalog. Creation validates every ingredient
//! pair but never consumes stock; a variety is a definition, not an order.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::auth::AdminUser;
use crate::domain::catalog;
use crate::domain::recipe::Recipe;
use crate::error::{ApiError, ApiResult};
use crate::models::{Ingredient, PizzaVariety};
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateVarietyRequest {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[serde(flatten)]
    #[validate]
    pub recipe: Recipe,
    #[validate(range(min = 0, message = "price must not be negative"))]
    pub price: i64,
    pub image: Option<String>,
}

pub async fn add_variety(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Json(req): Json<CreateVarietyRequest>,
) -> ApiResult<(StatusCode, Json<PizzaVariety>)> {
    req.validate()?;

    let pairs = req.recipe.category_pairs();
    let names: Vec<String> = pairs.iter().map(|(name, _)| name.clone()).collect();
    let rows: Vec<Ingredient> =
        sqlx::query_as("SELECT * FROM ingredients WHERE name = ANY($1) AND is_active")
            .bind(&names)
            .fetch_all(&state.db)
            .await?;
    let entries: Vec<_> = rows.iter().map(Ingredient::catalog_entry).collect();

    // Collect every failing pair before responding, unlike the assembler.
    let unavailable = catalog::unavailable_pairs(&pairs, &entries);
    if !unavailable.is_empty() {
        return Err(ApiError::UnavailableIngredients(unavailable));
    }

    let variety: PizzaVariety = sqlx::query_as(
        "INSERT INTO pizza_varieties (id, name, base, sauce, cheese, veggies, meat, price, image) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(&req.name)
    .bind(&req.recipe.base)
    .bind(&req.recipe.sauce)
    .bind(&req.recipe.cheese)
    .bind(&req.recipe.veggies)
    .bind(&req.recipe.meat)
    .bind(req.price)
    .bind(&req.image)
    .fetch_one(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(variety)))
}

pub async fn list_varieties(State(state): State<AppState>) -> ApiResult<Json<Vec<PizzaVariety>>> {
    let varieties: Vec<PizzaVariety> =
        sqlx::query_as("SELECT * FROM pizza_varieties ORDER BY created_at DESC")
            .fetch_all(&state.db)
            .await?;
    Ok(Json(varieties))
}
