//! Ingredient catalog administration. Writes are admin-only; the listing
//! is open to any authenticated caller (the pizza builder reads it).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::auth::{AdminUser, AuthUser};
use crate::domain::catalog::Category;
use crate::error::{ApiError, ApiResult};
use crate::models::Ingredient;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    pub category: Option<Category>,
    pub name: Option<String>,
    pub price: Option<i64>,
    pub stock: Option<i32>,
    pub unit: Option<String>,
    pub threshold: Option<i32>,
    pub photo: Option<String>,
}

pub async fn add_item(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Json(req): Json<CreateItemRequest>,
) -> ApiResult<(StatusCode, Json<serde_json::Value>)> {
    let (Some(category), Some(name), Some(price)) = (req.category, req.name, req.price) else {
        return Err(ApiError::Validation("Category, name and price are required".into()));
    };
    if name.trim().is_empty() {
        return Err(ApiError::Validation("Name must not be empty".into()));
    }
    if price < 0 {
        return Err(ApiError::Validation("Price must not be negative".into()));
    }
    let stock = req.stock.unwrap_or(0);
    if stock < 0 {
        return Err(ApiError::Validation("Stock must not be negative".into()));
    }

    let item: Ingredient = sqlx::query_as(
        "INSERT INTO ingredients (id, category, name, price, stock, unit, threshold, photo) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(category)
    .bind(&name)
    .bind(price)
    .bind(stock)
    .bind(req.unit.unwrap_or_else(|| "pcs".to_string()))
    .bind(req.threshold.unwrap_or(20))
    .bind(&req.photo)
    .fetch_one(&state.db)
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({"message": "Inventory item added successfully", "item": item})),
    ))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub category: Option<Category>,
}

pub async fn list_items(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Query(q): Query<ListQuery>,
) -> ApiResult<Json<Vec<Ingredient>>> {
    let items: Vec<Ingredient> = match q.category {
        Some(category) => {
            sqlx::query_as("SELECT * FROM ingredients WHERE category = $1 ORDER BY created_at DESC")
                .bind(category)
                .fetch_all(&state.db)
                .await?
        }
        None => {
            sqlx::query_as("SELECT * FROM ingredients ORDER BY created_at DESC")
                .fetch_all(&state.db)
                .await?
        }
    };
    Ok(Json(items))
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemRequest {
    pub category: Option<Category>,
    pub name: Option<String>,
    pub price: Option<i64>,
    pub stock: Option<i32>,
    pub unit: Option<String>,
    pub threshold: Option<i32>,
    pub photo: Option<String>,
    pub is_active: Option<bool>,
}

pub async fn update_item(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateItemRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    if req.price.is_some_and(|p| p < 0) {
        return Err(ApiError::Validation("Price must not be negative".into()));
    }
    if req.stock.is_some_and(|s| s < 0) {
        return Err(ApiError::Validation("Stock must not be negative".into()));
    }

    let item: Option<Ingredient> = sqlx::query_as(
        "UPDATE ingredients SET \
           category = COALESCE($2, category), \
           name = COALESCE($3, name), \
           price = COALESCE($4, price), \
           stock = COALESCE($5, stock), \
           unit = COALESCE($6, unit), \
           threshold = COALESCE($7, threshold), \
           photo = COALESCE($8, photo), \
           is_active = COALESCE($9, is_active), \
           updated_at = NOW() \
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(req.category)
    .bind(&req.name)
    .bind(req.price)
    .bind(req.stock)
    .bind(&req.unit)
    .bind(req.threshold)
    .bind(&req.photo)
    .bind(req.is_active)
    .fetch_optional(&state.db)
    .await?;

    let item = item.ok_or_else(|| ApiError::NotFound("Inventory item not found".into()))?;
    Ok(Json(json!({"message": "Inventory item updated successfully", "item": item})))
}

pub async fn delete_item(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let deleted: Option<(Uuid,)> =
        sqlx::query_as("DELETE FROM ingredients WHERE id = $1 RETURNING id")
            .bind(id)
            .fetch_optional(&state.db)
            .await?;
    if deleted.is_none() {
        return Err(ApiError::NotFound("Inventory item not found".into()));
    }
    Ok(Json(json!({"message": "Inventory item deleted successfully"})))
}

#[derive(Debug, Deserialize)]
pub struct SetStockRequest {
    pub stock: Option<i32>,
}

pub async fn set_stock(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<Uuid>,
    Json(req): Json<SetStockRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let stock = valid_stock(req.stock)?;
    let item: Option<Ingredient> = sqlx::query_as(
        "UPDATE ingredients SET stock = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(stock)
    .fetch_optional(&state.db)
    .await?;

    let item = item.ok_or_else(|| ApiError::NotFound("Inventory item not found".into()))?;
    Ok(Json(json!({"message": "Stock updated successfully", "item": item})))
}

/// Bulk reset, e.g. restocking every veggie after a delivery.
pub async fn set_category_stock(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(category): Path<Category>,
    Json(req): Json<SetStockRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let stock = valid_stock(req.stock)?;
    let result = sqlx::query(
        "UPDATE ingredients SET stock = $2, updated_at = NOW() WHERE category = $1",
    )
    .bind(category)
    .bind(stock)
    .execute(&state.db)
    .await?;

    Ok(Json(json!({
        "message": "Stock updated successfully",
        "updated": result.rows_affected(),
    })))
}

fn valid_stock(stock: Option<i32>) -> Result<i32, ApiError> {
    match stock {
        Some(stock) if stock >= 0 => Ok(stock),
        _ => Err(ApiError::Validation("Valid stock number is required and must be >= 0".into())),
    }
}
