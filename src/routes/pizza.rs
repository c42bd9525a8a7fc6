//! The custom pizza assembler: validate, price, decrement, persist.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::domain::catalog::{self, AvailabilityError};
use crate::domain::recipe::Recipe;
use crate::error::ApiResult;
use crate::models::{CustomPizza, Ingredient};
use crate::AppState;

/// Runs the whole validate-then-decrement flow inside one transaction with
/// conditional decrements, so a request that fails partway leaves every
/// stock level untouched, concurrent requests included.
pub async fn create_custom_pizza(
    State(state): State<AppState>,
    Json(recipe): Json<Recipe>,
) -> ApiResult<(StatusCode, Json<serde_json::Value>)> {
    recipe.validate()?;
    let names = recipe.flattened();

    let mut tx = state.db.begin().await?;

    let rows: Vec<Ingredient> =
        sqlx::query_as("SELECT * FROM ingredients WHERE name = ANY($1) AND is_active")
            .bind(&names)
            .fetch_all(&mut *tx)
            .await?;
    let entries: Vec<_> = rows.iter().map(Ingredient::catalog_entry).collect();
    let resolved = catalog::resolve_occurrences(&names, &entries)?;

    for occurrence in &resolved.occurrences {
        let decremented = sqlx::query(
            "UPDATE ingredients SET stock = stock - 1, updated_at = NOW() \
             WHERE id = $1 AND stock > 0",
        )
        .bind(occurrence.id)
        .execute(&mut *tx)
        .await?;
        if decremented.rows_affected() == 0 {
            // Raced against another assembly; dropping the tx undoes the
            // decrements already applied for this request.
            return Err(AvailabilityError::OutOfStock(occurrence.name.clone()).into());
        }
    }

    let pizza: CustomPizza = sqlx::query_as(
        "INSERT INTO custom_pizzas (id, base, sauce, cheese, veggies, meat, price) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(&recipe.base)
    .bind(&recipe.sauce)
    .bind(&recipe.cheese)
    .bind(&recipe.veggies)
    .bind(&recipe.meat)
    .bind(resolved.price)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(pizza_id = %pizza.id, price = pizza.price, "custom pizza assembled");
    Ok((StatusCode::CREATED, Json(json!({"message": "Custom pizza created", "pizza": pizza}))))
}
