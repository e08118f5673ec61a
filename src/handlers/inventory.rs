// src/handlers/inventory.rs
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use sqlx::{Error as SqlxError, FromRow};
use tracing::instrument;

use crate::dtos::inventory::{CreateInventoryRequest, InventoryResponse};
use crate::dtos::pagination::{total_pages, PageQuery};
use crate::error::AppError;
use crate::models::inventory::InventoryRecord;
use crate::state::AppState;

#[derive(Debug, FromRow)]
struct InventoryRow {
    id: i64,
    product_id: i64,
    product_name: String,
    stock_level: i32,
    serial_numbers: Vec<String>,
    created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl From<InventoryRow> for InventoryResponse {
    fn from(r: InventoryRow) -> Self {
        Self {
            id: r.id,
            product_id: r.product_id,
            product_name: r.product_name,
            stock_level: r.stock_level,
            serial_numbers: r.serial_numbers,
            created_at: r.created_at,
        }
    }
}

const INVENTORY_SELECT: &str = "SELECT i.id, i.product_id, p.name AS product_name,
        i.stock_level, i.serial_numbers, i.created_at
 FROM inventory i
 JOIN products p ON i.product_id = p.id";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryListResponse {
    pub data: Vec<InventoryResponse>,
    pub total_pages: i64,
    pub current_page: i64,
}

// GET /inventory
#[instrument(skip(state))]
pub async fn list_inventory(
    State(state): State<AppState>,
    Query(params): Query<PageQuery>,
) -> Result<Json<InventoryListResponse>, AppError> {
    let limit = params.limit.max(1);
    let page = params.page.max(1);

    let rows = sqlx::query_as::<_, InventoryRow>(&format!(
        "{} ORDER BY p.name LIMIT $1 OFFSET $2",
        INVENTORY_SELECT
    ))
    .bind(limit)
    .bind((page - 1) * limit)
    .fetch_all(&state.db_pool)
    .await?;

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM inventory")
        .fetch_one(&state.db_pool)
        .await?;

    Ok(Json(InventoryListResponse {
        data: rows.into_iter().map(InventoryResponse::from).collect(),
        total_pages: total_pages(total, limit),
        current_page: page,
    }))
}

// GET /inventory/:id
#[instrument(skip(state), fields(id))]
pub async fn get_inventory(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<InventoryResponse>, AppError> {
    let row = sqlx::query_as::<_, InventoryRow>(&format!("{} WHERE i.id = $1", INVENTORY_SELECT))
        .bind(id)
        .fetch_optional(&state.db_pool)
        .await?
        .ok_or_else(|| AppError::not_found("Inventory item not found"))?;

    Ok(Json(InventoryResponse::from(row)))
}

// POST /inventory - open an inventory record for a product
#[instrument(skip(state, req), fields(product_id = req.product_id))]
pub async fn create_inventory(
    State(state): State<AppState>,
    Json(req): Json<CreateInventoryRequest>,
) -> Result<(StatusCode, Json<InventoryResponse>), AppError> {
    if req.stock_level < 0 {
        return Err(AppError::validation("Stock level cannot be negative"));
    }

    let product_name: String = sqlx::query_scalar("SELECT name FROM products WHERE id = $1")
        .bind(req.product_id)
        .fetch_optional(&state.db_pool)
        .await?
        .ok_or_else(|| {
            AppError::not_found(format!("Product not found: {}", req.product_id))
        })?;

    let record = sqlx::query_as::<_, InventoryRecord>(
        "INSERT INTO inventory (product_id, stock_level, serial_numbers)
         VALUES ($1, $2, $3)
         RETURNING id, product_id, stock_level, serial_numbers, created_at",
    )
    .bind(req.product_id)
    .bind(req.stock_level)
    .bind(&req.serial_numbers)
    .fetch_one(&state.db_pool)
    .await
    .map_err(|e| match e {
        SqlxError::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
            AppError::validation("Inventory record already exists for this product")
        }
        other => other.into(),
    })?;

    Ok((
        StatusCode::CREATED,
        Json(InventoryResponse {
            id: record.id,
            product_id: record.product_id,
            product_name,
            stock_level: record.stock_level,
            serial_numbers: record.serial_numbers,
            created_at: record.created_at,
        }),
    ))
}
