// src/handlers/product.rs
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sqlx::Error as SqlxError;
use tracing::{error, instrument};

use crate::dtos::product::{CreateProductRequest, ProductResponse, UpdateProductRequest};
use crate::error::AppError;
use crate::models::product::Product;
use crate::state::AppState;

const PRODUCT_COLUMNS: &str = "id, name, sku, category, price, created_at";

fn map_unique_violation(err: SqlxError, message: &str) -> AppError {
    match err {
        SqlxError::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
            AppError::validation(message)
        }
        other => other.into(),
    }
}

// GET /products - List all products
#[instrument(skip(state))]
pub async fn get_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductResponse>>, AppError> {
    match sqlx::query_as::<_, Product>(&format!(
        "SELECT {} FROM products ORDER BY name",
        PRODUCT_COLUMNS
    ))
    .fetch_all(&state.db_pool)
    .await
    {
        Ok(products) => {
            let response = products.into_iter().map(ProductResponse::from).collect();
            Ok(Json(response))
        }
        Err(e) => {
            error!(?e, "Failed to fetch products");
            Err(e.into())
        }
    }
}

// GET /products/:id - Get single product
#[instrument(skip(state), fields(id))]
pub async fn get_product(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<ProductResponse>, AppError> {
    let product = sqlx::query_as::<_, Product>(&format!(
        "SELECT {} FROM products WHERE id = $1",
        PRODUCT_COLUMNS
    ))
    .bind(id)
    .fetch_optional(&state.db_pool)
    .await?
    .ok_or_else(|| AppError::not_found("Product not found"))?;

    Ok(Json(ProductResponse::from(product)))
}

// POST /products - Create new product
#[instrument(skip(state, payload))]
pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), AppError> {
    if payload.product_name.trim().is_empty() || payload.sku.trim().is_empty() {
        return Err(AppError::validation("Product name and SKU are required"));
    }
    if payload.price < 0.0 {
        return Err(AppError::validation("Price cannot be negative"));
    }

    let product = sqlx::query_as::<_, Product>(&format!(
        "INSERT INTO products (name, sku, category, price)
         VALUES ($1, $2, $3, $4) RETURNING {}",
        PRODUCT_COLUMNS
    ))
    .bind(&payload.product_name)
    .bind(&payload.sku)
    .bind(&payload.category)
    .bind(payload.price)
    .fetch_one(&state.db_pool)
    .await
    .map_err(|e| map_unique_violation(e, "SKU already exists"))?;

    Ok((StatusCode::CREATED, Json(ProductResponse::from(product))))
}

// PUT /products/:id - Update product
#[instrument(skip(state, payload), fields(id))]
pub async fn update_product(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateProductRequest>,
) -> Result<Json<ProductResponse>, AppError> {
    if matches!(payload.price, Some(p) if p < 0.0) {
        return Err(AppError::validation("Price cannot be negative"));
    }

    let product = sqlx::query_as::<_, Product>(&format!(
        "UPDATE products SET
         name = COALESCE($1, name),
         sku = COALESCE($2, sku),
         category = COALESCE($3, category),
         price = COALESCE($4, price)
         WHERE id = $5 RETURNING {}",
        PRODUCT_COLUMNS
    ))
    .bind(payload.product_name)
    .bind(payload.sku)
    .bind(payload.category)
    .bind(payload.price)
    .bind(id)
    .fetch_optional(&state.db_pool)
    .await
    .map_err(|e| map_unique_violation(e, "SKU already exists"))?
    .ok_or_else(|| AppError::not_found("Product not found"))?;

    Ok(Json(ProductResponse::from(product)))
}

// DELETE /products/:id - Delete product
#[instrument(skip(state), fields(id))]
pub async fn delete_product(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(&state.db_pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Product not found"));
    }

    Ok(Json(serde_json::json!({ "message": "Product deleted successfully" })))
}
