use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::quotation::Quotation;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuotationRequest {
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
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotationResponse {
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

impl From<Quotation> for QuotationResponse {
    fn from(q: Quotation) -> Self {
        Self {
            id: q.id,
            quotation_number: q.quotation_number,
            company_name: q.company_name,
            address: q.address,
            contact_no: q.contact_no,
            tin: q.tin,
            client_name: q.client_name,
            quotation_date: q.quotation_date,
            expiry_date: q.expiry_date,
            reference: q.reference,
            sales_person: q.sales_person,
            payment_term: q.payment_term,
            created_at: q.created_at,
        }
    }
}
