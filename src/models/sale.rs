use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

#[derive(Debug, FromRow)]
pub struct Sale {
    pub id: i64,
    pub sale_number: String,
    pub client_name: String,
    pub overall_total: f64,
    pub date_of_purchase: NaiveDate,
    pub warranty: String,
    pub term_payable: String,
    pub mode_of_payment: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
pub struct SaleItem {
    pub id: i64,
    pub sale_id: i64,
    pub product_id: i64,
    pub quantity: i32,
    /// Snapshot of unit price * quantity at sale time, never recomputed.
    pub total_amount: f64,
}
