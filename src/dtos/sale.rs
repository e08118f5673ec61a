use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::dtos::product::ProductSummary;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleItemRequest {
    /// Product id.
    pub product: i64,
    pub quantity: i32,
}

/// Shared by POST /sales and PUT /sales/:id — an update is a full
/// replacement of the sale's items and header fields.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRequest {
    pub client_name: String,
    pub sale_items: Vec<SaleItemRequest>,
    pub date_of_purchase: NaiveDate,
    pub warranty: String,
    pub term_payable: String,
    pub mode_of_payment: String,
    pub status: String,
}

fn default_sort_by() -> String {
    "dateOfPurchase".to_string()
}

fn default_order() -> String {
    "desc".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleListQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    pub search: Option<String>,
    #[serde(default = "default_sort_by")]
    pub sort_by: String,
    #[serde(default = "default_order")]
    pub order: String,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    10
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleItemResponse {
    pub product: ProductSummary,
    pub quantity: i32,
    pub total_amount: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleResponse {
    pub id: i64,
    pub sale_number: String,
    pub client_name: String,
    pub sale_items: Vec<SaleItemResponse>,
    pub overall_total_amount: f64,
    pub date_of_purchase: NaiveDate,
    pub warranty: String,
    pub term_payable: String,
    pub mode_of_payment: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleEnvelope {
    pub message: String,
    pub sale: SaleResponse,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleListResponse {
    pub data: Vec<SaleResponse>,
    pub total_pages: i64,
    pub current_page: i64,
}
