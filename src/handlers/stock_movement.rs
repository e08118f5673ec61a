use axum::{
    extract::{Query, State},
    Json,
};
use sqlx::FromRow;
use tracing::instrument;

use crate::dtos::pagination::total_pages;
use crate::dtos::stock_movement::{
    AddStockMovementRequest, AddStockMovementResponse, MovementPageQuery,
    StockMovementListItem, StockMovementListResponse, StockMovementResponse,
};
use crate::error::AppError;
use crate::models::stock_movement::{MovementType, StockMovementRecord};
use crate::state::AppState;

/// INCREASE movements must supply one serial per unit. The sale flow never
/// goes through here; this guard only applies to direct stock entry.
fn validate_increase_serials(quantity: i32, serials: &[String]) -> Result<(), AppError> {
    if serials.len() != quantity as usize {
        return Err(AppError::validation(
            "Serial numbers must match the quantity",
        ));
    }
    Ok(())
}

/// Removes the listed serials from the inventory set. Serials that are not
/// present are ignored; a DECREASE is allowed to name serials the record
/// never tracked.
fn remove_serials(existing: &[String], removed: &[String]) -> Vec<String> {
    existing
        .iter()
        .filter(|sn| !removed.contains(*sn))
        .cloned()
        .collect()
}

#[derive(Debug, FromRow)]
struct InventoryWithProduct {
    id: i64,
    serial_numbers: Vec<String>,
    product_name: String,
}

// POST /stock-movements
#[instrument(skip(state, req), fields(inventory_id = req.inventory_id))]
pub async fn add_stock_movement(
    State(state): State<AppState>,
    Json(req): Json<AddStockMovementRequest>,
) -> Result<Json<AddStockMovementResponse>, AppError> {
    if req.quantity <= 0 {
        return Err(AppError::validation("Quantity must be greater than 0"));
    }

    let mut tx = state.db_pool.begin().await?;

    let inventory = sqlx::query_as::<_, InventoryWithProduct>(
        "SELECT i.id, i.serial_numbers, p.name AS product_name
         FROM inventory i
         JOIN products p ON i.product_id = p.id
         WHERE i.id = $1",
    )
    .bind(req.inventory_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AppError::not_found("Inventory item not found"))?;

    let new_stock_level: i32 = match req.movement_type {
        MovementType::Increase => {
            validate_increase_serials(req.quantity, &req.serial_numbers)?;
            sqlx::query_scalar(
                "UPDATE inventory
                 SET stock_level = stock_level + $1,
                     serial_numbers = serial_numbers || $2
                 WHERE id = $3
                 RETURNING stock_level",
            )
            .bind(req.quantity)
            .bind(&req.serial_numbers)
            .bind(inventory.id)
            .fetch_one(&mut *tx)
            .await?
        }
        MovementType::Decrease => {
            let remaining = remove_serials(&inventory.serial_numbers, &req.serial_numbers);
            // Conditional so a concurrent decrease cannot push the level
            // negative between our read and this write.
            sqlx::query_scalar(
                "UPDATE inventory
                 SET stock_level = stock_level - $1,
                     serial_numbers = $2
                 WHERE id = $3 AND stock_level >= $1
                 RETURNING stock_level",
            )
            .bind(req.quantity)
            .bind(&remaining)
            .bind(inventory.id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::insufficient_stock(&inventory.product_name))?
        }
    };

    let movement = sqlx::query_as::<_, StockMovementRecord>(
        "INSERT INTO stock_movements (inventory_id, movement_type, quantity, serial_numbers, reason)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING id, inventory_id, movement_type, quantity, serial_numbers, reason, created_at",
    )
    .bind(inventory.id)
    .bind(req.movement_type.as_str())
    .bind(req.quantity)
    .bind(&req.serial_numbers)
    .bind(&req.reason)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(Json(AddStockMovementResponse {
        message: "Stock successfully updated!".to_string(),
        stock_movement: StockMovementResponse::from(movement),
        new_stock_level,
    }))
}

#[derive(Debug, FromRow)]
struct MovementWithProduct {
    id: i64,
    inventory_id: i64,
    movement_type: String,
    quantity: i32,
    serial_numbers: Vec<String>,
    reason: String,
    created_at: chrono::DateTime<chrono::Utc>,
    product_name: String,
}

// GET /stock-movements
#[instrument(skip(state))]
pub async fn list_stock_movements(
    State(state): State<AppState>,
    Query(params): Query<MovementPageQuery>,
) -> Result<Json<StockMovementListResponse>, AppError> {
    let limit = params.limit.max(1);
    let page = params.page.max(1);

    let rows = sqlx::query_as::<_, MovementWithProduct>(
        "SELECT sm.id, sm.inventory_id, sm.movement_type, sm.quantity,
                sm.serial_numbers, sm.reason, sm.created_at,
                p.name AS product_name
         FROM stock_movements sm
         JOIN inventory i ON sm.inventory_id = i.id
         JOIN products p ON i.product_id = p.id
         ORDER BY sm.created_at DESC, sm.id DESC
         LIMIT $1 OFFSET $2",
    )
    .bind(limit)
    .bind((page - 1) * limit)
    .fetch_all(&state.db_pool)
    .await?;

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM stock_movements")
        .fetch_one(&state.db_pool)
        .await?;

    let data = rows
        .into_iter()
        .map(|r| StockMovementListItem {
            movement: StockMovementResponse {
                id: r.id,
                inventory_id: r.inventory_id,
                movement_type: MovementType::from_db(&r.movement_type),
                quantity: r.quantity,
                serial_numbers: r.serial_numbers,
                reason: r.reason,
                timestamp: r.created_at,
            },
            product_name: r.product_name,
        })
        .collect();

    Ok(Json(StockMovementListResponse {
        data,
        total,
        total_pages: total_pages(total, limit),
        current_page: page,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn serials(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn increase_requires_one_serial_per_unit() {
        assert!(validate_increase_serials(3, &serials(&["S1", "S2", "S3"])).is_ok());
        assert!(validate_increase_serials(3, &serials(&["S1", "S2"])).is_err());
        assert!(validate_increase_serials(1, &serials(&[])).is_err());
    }

    #[test]
    fn remove_serials_drops_matches_only() {
        let existing = serials(&["S1", "S2", "S3"]);
        let remaining = remove_serials(&existing, &serials(&["S2"]));
        assert_eq!(remaining, serials(&["S1", "S3"]));
    }

    #[test]
    fn remove_serials_ignores_unknown_serials() {
        let existing = serials(&["S1", "S2"]);
        let remaining = remove_serials(&existing, &serials(&["S9", "S2"]));
        assert_eq!(remaining, serials(&["S1"]));
    }

    #[test]
    fn remove_serials_on_empty_set_is_noop() {
        assert!(remove_serials(&[], &serials(&["S1"])).is_empty());
    }
}
