use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, FromRow)]
pub struct InventoryRecord {
    pub id: i64,
    pub product_id: i64,
    pub stock_level: i32,
    pub serial_numbers: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
}
