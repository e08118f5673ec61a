use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

#[derive(Debug, FromRow)]
pub struct Quotation {
    pub id: i64,
    pub quotation_number: String,
    pub company_name: String,
    pub address: String,
    pub contact_no: String,
    pub tin: Option<String>,
    pub client_name: String,
    pub quotation_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub reference: Option<String>,
    pub sales_person: Option<String>,
    pub payment_term: Option<String>,
    pub created_at: DateTime<Utc>,
}
