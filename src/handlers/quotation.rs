// src/handlers/quotation.rs
use axum::{extract::State, http::StatusCode, Json};
use tracing::instrument;

use crate::counter::next_document_number;
use crate::dtos::quotation::{CreateQuotationRequest, QuotationResponse};
use crate::error::AppError;
use crate::models::quotation::Quotation;
use crate::state::AppState;

const QUOTATION_COLUMNS: &str = "id, quotation_number, company_name, address, contact_no,
 tin, client_name, quotation_date, expiry_date, reference, sales_person, payment_term,
 created_at";

// GET /quotations - newest first
#[instrument(skip(state))]
pub async fn list_quotations(
    State(state): State<AppState>,
) -> Result<Json<Vec<QuotationResponse>>, AppError> {
    let quotations = sqlx::query_as::<_, Quotation>(&format!(
        "SELECT {} FROM quotations ORDER BY created_at DESC",
        QUOTATION_COLUMNS
    ))
    .fetch_all(&state.db_pool)
    .await?;

    Ok(Json(
        quotations.into_iter().map(QuotationResponse::from).collect(),
    ))
}

// POST /quotations
#[instrument(skip(state, req), fields(client_name = %req.client_name))]
pub async fn create_quotation(
    State(state): State<AppState>,
    Json(req): Json<CreateQuotationRequest>,
) -> Result<(StatusCode, Json<QuotationResponse>), AppError> {
    if req.company_name.trim().is_empty()
        || req.address.trim().is_empty()
        || req.contact_no.trim().is_empty()
        || req.client_name.trim().is_empty()
    {
        return Err(AppError::validation("All fields are required"));
    }

    let mut tx = state.db_pool.begin().await?;
    let quotation_number = next_document_number(&mut *tx, "quotation", "QTN").await?;

    let quotation = sqlx::query_as::<_, Quotation>(&format!(
        "INSERT INTO quotations (quotation_number, company_name, address, contact_no, tin,
                                 client_name, quotation_date, expiry_date, reference,
                                 sales_person, payment_term)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
         RETURNING {}",
        QUOTATION_COLUMNS
    ))
    .bind(&quotation_number)
    .bind(&req.company_name)
    .bind(&req.address)
    .bind(&req.contact_no)
    .bind(&req.tin)
    .bind(&req.client_name)
    .bind(req.quotation_date)
    .bind(req.expiry_date)
    .bind(&req.reference)
    .bind(&req.sales_person)
    .bind(&req.payment_term)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok((StatusCode::CREATED, Json(QuotationResponse::from(quotation))))
}
