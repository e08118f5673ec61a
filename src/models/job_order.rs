use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

#[derive(Debug, FromRow)]
pub struct JobOrder {
    pub id: i64,
    pub job_order_number: String,
    pub sale_id: i64,
    /// Denormalized from the referenced sale at create/update time.
    pub client_name: String,
    pub address: String,
    pub contact_info: String,
    pub description: String,
    pub installation_date: NaiveDate,
    pub status: String,
    pub created_at: DateTime<Utc>,
}
