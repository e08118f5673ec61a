// src/handlers/job_order.rs
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::instrument;

use crate::counter::next_document_number;
use crate::dtos::job_order::{
    JobOrderEnvelope, JobOrderListQuery, JobOrderListResponse, JobOrderRequest,
    JobOrderResponse,
};
use crate::dtos::pagination::total_pages;
use crate::error::AppError;
use crate::models::job_order::JobOrder;
use crate::state::AppState;

const JOB_ORDER_COLUMNS: &str = "id, job_order_number, sale_id, client_name, address,
 contact_info, description, installation_date, status, created_at";

fn validate_request(req: &JobOrderRequest) -> Result<(), AppError> {
    if req.sale_id <= 0
        || req.address.trim().is_empty()
        || req.contact_info.trim().is_empty()
        || req.description.trim().is_empty()
        || req.status.trim().is_empty()
    {
        return Err(AppError::validation("All fields are required"));
    }
    Ok(())
}

/// The job order snapshots the client name from its sale at create and
/// update time rather than joining at read time.
async fn sale_client_name(db_pool: &sqlx::PgPool, sale_id: i64) -> Result<String, AppError> {
    sqlx::query_scalar("SELECT client_name FROM sales WHERE id = $1")
        .bind(sale_id)
        .fetch_optional(db_pool)
        .await?
        .ok_or_else(|| AppError::not_found("Sale not found"))
}

// POST /job-orders
#[instrument(skip(state, req), fields(sale_id = req.sale_id))]
pub async fn create_job_order(
    State(state): State<AppState>,
    Json(req): Json<JobOrderRequest>,
) -> Result<(StatusCode, Json<JobOrderEnvelope>), AppError> {
    validate_request(&req)?;

    let client_name = sale_client_name(&state.db_pool, req.sale_id).await?;

    let mut tx = state.db_pool.begin().await?;
    let job_order_number = next_document_number(&mut *tx, "jobOrder", "JO").await?;

    let job_order = sqlx::query_as::<_, JobOrder>(&format!(
        "INSERT INTO job_orders (job_order_number, sale_id, client_name, address,
                                 contact_info, description, installation_date, status)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
         RETURNING {}",
        JOB_ORDER_COLUMNS
    ))
    .bind(&job_order_number)
    .bind(req.sale_id)
    .bind(&client_name)
    .bind(&req.address)
    .bind(&req.contact_info)
    .bind(&req.description)
    .bind(req.installation_date)
    .bind(&req.status)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(job_order_number = %job_order.job_order_number, "Job order created");

    Ok((
        StatusCode::CREATED,
        Json(JobOrderEnvelope {
            message: "Job Order created successfully".to_string(),
            job_order: JobOrderResponse::from(job_order),
        }),
    ))
}

fn sort_column(sort_by: &str) -> &'static str {
    match sort_by {
        "clientName" => "client_name",
        "jobOrderID" | "jobOrderNumber" => "job_order_number",
        "status" => "status",
        "createdAt" => "created_at",
        _ => "installation_date",
    }
}

fn order_keyword(order: &str) -> &'static str {
    if order.eq_ignore_ascii_case("asc") {
        "ASC"
    } else {
        "DESC"
    }
}

// GET /job-orders
#[instrument(skip(state))]
pub async fn list_job_orders(
    State(state): State<AppState>,
    Query(params): Query<JobOrderListQuery>,
) -> Result<Json<JobOrderListResponse>, AppError> {
    let limit = params.limit.max(1);
    let page = params.page.max(1);
    let search = params
        .search
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(|s| format!("%{}%", s));

    let query = format!(
        "SELECT {} FROM job_orders
         WHERE ($1::TEXT IS NULL OR job_order_number ILIKE $1 OR client_name ILIKE $1)
         ORDER BY {} {}, id DESC LIMIT $2 OFFSET $3",
        JOB_ORDER_COLUMNS,
        sort_column(&params.sort_by),
        order_keyword(&params.order)
    );

    let job_orders = sqlx::query_as::<_, JobOrder>(&query)
        .bind(&search)
        .bind(limit)
        .bind((page - 1) * limit)
        .fetch_all(&state.db_pool)
        .await?;

    let total: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM job_orders
         WHERE ($1::TEXT IS NULL OR job_order_number ILIKE $1 OR client_name ILIKE $1)",
    )
    .bind(&search)
    .fetch_one(&state.db_pool)
    .await?;

    Ok(Json(JobOrderListResponse {
        data: job_orders.into_iter().map(JobOrderResponse::from).collect(),
        total_pages: total_pages(total, limit),
        current_page: page,
    }))
}

// GET /job-orders/:id
#[instrument(skip(state), fields(id))]
pub async fn get_job_order(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<JobOrderResponse>, AppError> {
    let job_order = sqlx::query_as::<_, JobOrder>(&format!(
        "SELECT {} FROM job_orders WHERE id = $1",
        JOB_ORDER_COLUMNS
    ))
    .bind(id)
    .fetch_optional(&state.db_pool)
    .await?
    .ok_or_else(|| AppError::not_found("Job Order not found"))?;

    Ok(Json(JobOrderResponse::from(job_order)))
}

// PUT /job-orders/:id
#[instrument(skip(state, req), fields(id))]
pub async fn update_job_order(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(req): Json<JobOrderRequest>,
) -> Result<Json<JobOrderEnvelope>, AppError> {
    validate_request(&req)?;

    let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM job_orders WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db_pool)
        .await?;
    if exists.is_none() {
        return Err(AppError::not_found("Job Order not found"));
    }

    // Re-read the referenced sale so the denormalized name tracks it.
    let client_name = sale_client_name(&state.db_pool, req.sale_id).await?;

    let job_order = sqlx::query_as::<_, JobOrder>(&format!(
        "UPDATE job_orders SET sale_id = $1, client_name = $2, address = $3,
                contact_info = $4, description = $5, installation_date = $6, status = $7
         WHERE id = $8
         RETURNING {}",
        JOB_ORDER_COLUMNS
    ))
    .bind(req.sale_id)
    .bind(&client_name)
    .bind(&req.address)
    .bind(&req.contact_info)
    .bind(&req.description)
    .bind(req.installation_date)
    .bind(&req.status)
    .bind(id)
    .fetch_one(&state.db_pool)
    .await?;

    Ok(Json(JobOrderEnvelope {
        message: "Job Order updated successfully".to_string(),
        job_order: JobOrderResponse::from(job_order),
    }))
}

// DELETE /job-orders/:id
#[instrument(skip(state), fields(id))]
pub async fn delete_job_order(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    let result = sqlx::query("DELETE FROM job_orders WHERE id = $1")
        .bind(id)
        .execute(&state.db_pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Job Order not found"));
    }

    Ok(Json(json!({ "message": "Job Order deleted successfully" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_column_whitelist() {
        assert_eq!(sort_column("clientName"), "client_name");
        assert_eq!(sort_column("jobOrderID"), "job_order_number");
        assert_eq!(sort_column("installationDate"), "installation_date");
        assert_eq!(sort_column("anything else"), "installation_date");
    }
}
