use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::product::Product;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub product_name: String,
    pub sku: String,
    pub category: String,
    pub price: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub product_name: Option<String>,
    pub sku: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: i64,
    pub product_name: String,
    pub sku: String,
    pub category: String,
    pub price: f64,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<Product> for ProductResponse {
    fn from(p: Product) -> Self {
        Self {
            id: p.id,
            product_name: p.name,
            sku: p.sku,
            category: p.category,
            price: p.price,
            created_at: p.created_at,
        }
    }
}

/// The product fields embedded in sale responses, mirroring what the
/// front end expects when sale items are populated.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub id: i64,
    pub product_name: String,
    pub sku: String,
    pub category: String,
    pub price: f64,
}
