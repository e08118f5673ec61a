use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::job_order::JobOrder;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobOrderRequest {
    pub sale_id: i64,
    pub address: String,
    pub contact_info: String,
    pub description: String,
    pub installation_date: NaiveDate,
    pub status: String,
}

fn default_sort_by() -> String {
    "installationDate".to_string()
}

fn default_order() -> String {
    "desc".to_string()
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    10
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobOrderListQuery {
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

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobOrderResponse {
    pub id: i64,
    pub job_order_number: String,
    pub sale_id: i64,
    pub client_name: String,
    pub address: String,
    pub contact_info: String,
    pub description: String,
    pub installation_date: NaiveDate,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<JobOrder> for JobOrderResponse {
    fn from(j: JobOrder) -> Self {
        Self {
            id: j.id,
            job_order_number: j.job_order_number,
            sale_id: j.sale_id,
            client_name: j.client_name,
            address: j.address,
            contact_info: j.contact_info,
            description: j.description,
            installation_date: j.installation_date,
            status: j.status,
            created_at: j.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobOrderEnvelope {
    pub message: String,
    pub job_order: JobOrderResponse,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobOrderListResponse {
    pub data: Vec<JobOrderResponse>,
    pub total_pages: i64,
    pub current_page: i64,
}
