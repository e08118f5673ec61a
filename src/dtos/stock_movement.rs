use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::stock_movement::{MovementType, StockMovementRecord};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddStockMovementRequest {
    pub inventory_id: i64,
    #[serde(rename = "type")]
    pub movement_type: MovementType,
    pub quantity: i32,
    #[serde(default)]
    pub serial_numbers: Vec<String>,
    pub reason: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockMovementResponse {
    pub id: i64,
    pub inventory_id: i64,
    #[serde(rename = "type")]
    pub movement_type: MovementType,
    pub quantity: i32,
    pub serial_numbers: Vec<String>,
    pub reason: String,
    pub timestamp: DateTime<Utc>,
}

impl From<StockMovementRecord> for StockMovementResponse {
    fn from(m: StockMovementRecord) -> Self {
        Self {
            id: m.id,
            inventory_id: m.inventory_id,
            movement_type: MovementType::from_db(&m.movement_type),
            quantity: m.quantity,
            serial_numbers: m.serial_numbers,
            reason: m.reason,
            timestamp: m.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddStockMovementResponse {
    pub message: String,
    pub stock_movement: StockMovementResponse,
    pub new_stock_level: i32,
}

fn default_page() -> i64 {
    1
}

// The movement feed pages in fives, unlike the other lists.
fn default_limit() -> i64 {
    5
}

#[derive(Debug, Deserialize)]
pub struct MovementPageQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

/// List item with the product name populated from the inventory record.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockMovementListItem {
    #[serde(flatten)]
    pub movement: StockMovementResponse,
    pub product_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockMovementListResponse {
    pub data: Vec<StockMovementListItem>,
    pub total: i64,
    pub total_pages: i64,
    pub current_page: i64,
}
