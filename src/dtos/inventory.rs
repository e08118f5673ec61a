use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInventoryRequest {
    pub product_id: i64,
    #[serde(default)]
    pub stock_level: i32,
    #[serde(default)]
    pub serial_numbers: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryResponse {
    pub id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub stock_level: i32,
    pub serial_numbers: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
}
