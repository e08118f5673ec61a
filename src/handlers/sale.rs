use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use sqlx::{FromRow, Postgres, Transaction};
use tracing::instrument;

use crate::counter::next_document_number;
use crate::dtos::pagination::total_pages;
use crate::dtos::product::ProductSummary;
use crate::dtos::sale::{
    SaleEnvelope, SaleItemRequest, SaleItemResponse, SaleListQuery, SaleListResponse,
    SaleRequest, SaleResponse,
};
use crate::error::AppError;
use crate::models::product::Product;
use crate::models::sale::{Sale, SaleItem};
use crate::state::AppState;

const SELECT_PRODUCT: &str =
    "SELECT id, name, sku, category, price, created_at FROM products WHERE id = $1";

const SELECT_SALE: &str = "SELECT id, sale_number, client_name, overall_total, date_of_purchase,
        warranty, term_payable, mode_of_payment, status, created_at
 FROM sales WHERE id = $1";

/// A sale item that has passed validation and had its inventory deducted.
/// Carries the product so responses can embed the catalog summary without
/// a second lookup.
struct ProcessedItem {
    product: Product,
    quantity: i32,
    total_amount: f64,
}

fn validate_sale_request(req: &SaleRequest) -> Result<(), AppError> {
    if req.client_name.trim().is_empty()
        || req.warranty.trim().is_empty()
        || req.term_payable.trim().is_empty()
        || req.mode_of_payment.trim().is_empty()
        || req.status.trim().is_empty()
        || req.sale_items.is_empty()
    {
        return Err(AppError::validation("All fields are required"));
    }
    Ok(())
}

/// Per-item deduction pass shared by create and update. For each item, in
/// input order: resolve the product, resolve its inventory record, deduct
/// stock, and log a DECREASE movement. The stock check and decrement are a
/// single conditional UPDATE so two concurrent sales cannot both pass the
/// check and drive the level negative. Runs inside the caller's
/// transaction, so a failure on a later item undoes earlier deductions.
async fn apply_sale_items(
    tx: &mut Transaction<'_, Postgres>,
    items: &[SaleItemRequest],
    reason: &str,
) -> Result<(Vec<ProcessedItem>, f64), AppError> {
    let mut overall_total = 0.0_f64;
    let mut processed = Vec::with_capacity(items.len());

    for item in items {
        if item.product <= 0 || item.quantity <= 0 {
            return Err(AppError::validation(
                "Each sale item must have a product and quantity",
            ));
        }

        let product = sqlx::query_as::<_, Product>(SELECT_PRODUCT)
            .bind(item.product)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("Product not found: {}", item.product))
            })?;

        let inventory_id: i64 = sqlx::query_scalar(
            "SELECT id FROM inventory WHERE product_id = $1",
        )
        .bind(product.id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| {
            AppError::not_found(format!(
                "Inventory record not found for product: {}",
                product.id
            ))
        })?;

        // Conditional decrement: zero rows affected means the current level
        // is below the requested quantity.
        let updated = sqlx::query(
            "UPDATE inventory SET stock_level = stock_level - $1
             WHERE id = $2 AND stock_level >= $1",
        )
        .bind(item.quantity)
        .bind(inventory_id)
        .execute(&mut **tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(AppError::insufficient_stock(&product.name));
        }

        record_movement(tx, inventory_id, "DECREASE", item.quantity, reason).await?;

        let item_total = product.price * item.quantity as f64;
        overall_total += item_total;
        processed.push(ProcessedItem {
            product,
            quantity: item.quantity,
            total_amount: item_total,
        });
    }

    Ok((processed, overall_total))
}

/// Reversal pass for update and delete: add each item's quantity back to
/// its inventory record and log an INCREASE movement. A missing inventory
/// record is skipped silently so a sale stays deletable after its
/// inventory has been repaired or removed out of band.
async fn reverse_sale_items(
    tx: &mut Transaction<'_, Postgres>,
    sale_id: i64,
    reason: &str,
) -> Result<(), AppError> {
    let items = sqlx::query_as::<_, SaleItem>(
        "SELECT id, sale_id, product_id, quantity, total_amount
         FROM sale_items WHERE sale_id = $1 ORDER BY id",
    )
    .bind(sale_id)
    .fetch_all(&mut **tx)
    .await?;

    for item in items {
        let inventory_id: Option<i64> =
            sqlx::query_scalar("SELECT id FROM inventory WHERE product_id = $1")
                .bind(item.product_id)
                .fetch_optional(&mut **tx)
                .await?;

        let Some(inventory_id) = inventory_id else {
            tracing::warn!(
                product_id = item.product_id,
                sale_id,
                "No inventory record for sale item, skipping reversal"
            );
            continue;
        };

        sqlx::query("UPDATE inventory SET stock_level = stock_level + $1 WHERE id = $2")
            .bind(item.quantity)
            .bind(inventory_id)
            .execute(&mut **tx)
            .await?;

        record_movement(tx, inventory_id, "INCREASE", item.quantity, reason).await?;
    }

    Ok(())
}

async fn record_movement(
    tx: &mut Transaction<'_, Postgres>,
    inventory_id: i64,
    movement_type: &str,
    quantity: i32,
    reason: &str,
) -> Result<(), AppError> {
    // Sale-driven movements never carry serial numbers.
    sqlx::query(
        "INSERT INTO stock_movements (inventory_id, movement_type, quantity, serial_numbers, reason)
         VALUES ($1, $2, $3, '{}', $4)",
    )
    .bind(inventory_id)
    .bind(movement_type)
    .bind(quantity)
    .bind(reason)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

async fn insert_sale_items(
    tx: &mut Transaction<'_, Postgres>,
    sale_id: i64,
    items: &[ProcessedItem],
) -> Result<(), AppError> {
    for item in items {
        sqlx::query(
            "INSERT INTO sale_items (sale_id, product_id, quantity, total_amount)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(sale_id)
        .bind(item.product.id)
        .bind(item.quantity)
        .bind(item.total_amount)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

fn build_response(sale: Sale, items: Vec<ProcessedItem>) -> SaleResponse {
    let sale_items = items
        .into_iter()
        .map(|i| SaleItemResponse {
            product: ProductSummary {
                id: i.product.id,
                product_name: i.product.name,
                sku: i.product.sku,
                category: i.product.category,
                price: i.product.price,
            },
            quantity: i.quantity,
            total_amount: i.total_amount,
        })
        .collect();

    SaleResponse {
        id: sale.id,
        sale_number: sale.sale_number,
        client_name: sale.client_name,
        sale_items,
        overall_total_amount: sale.overall_total,
        date_of_purchase: sale.date_of_purchase,
        warranty: sale.warranty,
        term_payable: sale.term_payable,
        mode_of_payment: sale.mode_of_payment,
        status: sale.status,
        created_at: sale.created_at,
    }
}

// POST /sales
#[instrument(skip(state, req), fields(client_name = %req.client_name))]
pub async fn create_sale(
    State(state): State<AppState>,
    Json(req): Json<SaleRequest>,
) -> Result<(StatusCode, Json<SaleEnvelope>), AppError> {
    validate_sale_request(&req)?;

    let mut tx = state.db_pool.begin().await?;

    let (processed, overall_total) =
        apply_sale_items(&mut tx, &req.sale_items, "Sale deduction").await?;

    let sale_number = next_document_number(&mut *tx, "sale", "SALE").await?;

    let sale = sqlx::query_as::<_, Sale>(
        "INSERT INTO sales (sale_number, client_name, overall_total, date_of_purchase,
                            warranty, term_payable, mode_of_payment, status)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
         RETURNING id, sale_number, client_name, overall_total, date_of_purchase,
                   warranty, term_payable, mode_of_payment, status, created_at",
    )
    .bind(&sale_number)
    .bind(&req.client_name)
    .bind(overall_total)
    .bind(req.date_of_purchase)
    .bind(&req.warranty)
    .bind(&req.term_payable)
    .bind(&req.mode_of_payment)
    .bind(&req.status)
    .fetch_one(&mut *tx)
    .await?;

    insert_sale_items(&mut tx, sale.id, &processed).await?;

    tx.commit().await?;

    tracing::info!(sale_number = %sale.sale_number, "Sale created");

    Ok((
        StatusCode::CREATED,
        Json(SaleEnvelope {
            message: "Sale created successfully".to_string(),
            sale: build_response(sale, processed),
        }),
    ))
}

// PUT /sales/:id
#[instrument(skip(state, req), fields(id))]
pub async fn update_sale(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(req): Json<SaleRequest>,
) -> Result<Json<SaleEnvelope>, AppError> {
    validate_sale_request(&req)?;

    let mut tx = state.db_pool.begin().await?;

    sqlx::query_as::<_, Sale>(SELECT_SALE)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::not_found("Sale not found"))?;

    // Give back the old items' stock before deducting the new ones.
    reverse_sale_items(&mut tx, id, "Sale update reversal").await?;

    let (processed, overall_total) =
        apply_sale_items(&mut tx, &req.sale_items, "Sale update deduction").await?;

    let sale = sqlx::query_as::<_, Sale>(
        "UPDATE sales SET client_name = $1, overall_total = $2, date_of_purchase = $3,
                          warranty = $4, term_payable = $5, mode_of_payment = $6, status = $7
         WHERE id = $8
         RETURNING id, sale_number, client_name, overall_total, date_of_purchase,
                   warranty, term_payable, mode_of_payment, status, created_at",
    )
    .bind(&req.client_name)
    .bind(overall_total)
    .bind(req.date_of_purchase)
    .bind(&req.warranty)
    .bind(&req.term_payable)
    .bind(&req.mode_of_payment)
    .bind(&req.status)
    .bind(id)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query("DELETE FROM sale_items WHERE sale_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    insert_sale_items(&mut tx, id, &processed).await?;

    tx.commit().await?;

    Ok(Json(SaleEnvelope {
        message: "Sale updated successfully".to_string(),
        sale: build_response(sale, processed),
    }))
}

// DELETE /sales/:id
#[instrument(skip(state), fields(id))]
pub async fn delete_sale(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    let mut tx = state.db_pool.begin().await?;

    sqlx::query_as::<_, Sale>(SELECT_SALE)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::not_found("Sale not found"))?;

    // Restore stock before removing the document; items cascade with it.
    reverse_sale_items(&mut tx, id, "Sale deletion - stock restored").await?;

    sqlx::query("DELETE FROM sales WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(Json(json!({
        "message": "Sale deleted and inventory updated accordingly"
    })))
}

#[derive(Debug, FromRow)]
struct SaleItemRow {
    sale_id: i64,
    product_id: i64,
    quantity: i32,
    total_amount: f64,
    product_name: String,
    sku: String,
    category: String,
    price: f64,
}

impl SaleItemRow {
    fn into_response(self) -> SaleItemResponse {
        SaleItemResponse {
            product: ProductSummary {
                id: self.product_id,
                product_name: self.product_name,
                sku: self.sku,
                category: self.category,
                price: self.price,
            },
            quantity: self.quantity,
            total_amount: self.total_amount,
        }
    }
}

async fn fetch_items_for_sales(
    db_pool: &sqlx::PgPool,
    sale_ids: &[i64],
) -> Result<Vec<SaleItemRow>, AppError> {
    let rows = sqlx::query_as::<_, SaleItemRow>(
        "SELECT si.sale_id, si.product_id, si.quantity, si.total_amount,
                p.name AS product_name, p.sku, p.category, p.price
         FROM sale_items si
         JOIN products p ON si.product_id = p.id
         WHERE si.sale_id = ANY($1)
         ORDER BY si.id",
    )
    .bind(sale_ids)
    .fetch_all(db_pool)
    .await?;
    Ok(rows)
}

fn assemble(sale: Sale, item_rows: Vec<SaleItemRow>) -> SaleResponse {
    SaleResponse {
        id: sale.id,
        sale_number: sale.sale_number,
        client_name: sale.client_name,
        sale_items: item_rows.into_iter().map(SaleItemRow::into_response).collect(),
        overall_total_amount: sale.overall_total,
        date_of_purchase: sale.date_of_purchase,
        warranty: sale.warranty,
        term_payable: sale.term_payable,
        mode_of_payment: sale.mode_of_payment,
        status: sale.status,
        created_at: sale.created_at,
    }
}

// GET /sales/:id
#[instrument(skip(state), fields(id))]
pub async fn get_sale(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<SaleResponse>, AppError> {
    let sale = sqlx::query_as::<_, Sale>(SELECT_SALE)
        .bind(id)
        .fetch_optional(&state.db_pool)
        .await?
        .ok_or_else(|| AppError::not_found("Sale not found"))?;

    let items = fetch_items_for_sales(&state.db_pool, &[sale.id]).await?;
    Ok(Json(assemble(sale, items)))
}

/// Maps the client-facing sortBy value onto a real column. Anything not in
/// the whitelist falls back to the purchase date so arbitrary input never
/// reaches the ORDER BY clause.
fn sort_column(sort_by: &str) -> &'static str {
    match sort_by {
        "clientName" => "client_name",
        "saleID" | "saleNumber" => "sale_number",
        "overallTotalAmount" => "overall_total",
        "createdAt" => "created_at",
        _ => "date_of_purchase",
    }
}

fn order_keyword(order: &str) -> &'static str {
    if order.eq_ignore_ascii_case("asc") {
        "ASC"
    } else {
        "DESC"
    }
}

// GET /sales
#[instrument(skip(state))]
pub async fn list_sales(
    State(state): State<AppState>,
    Query(params): Query<SaleListQuery>,
) -> Result<Json<SaleListResponse>, AppError> {
    let limit = params.limit.max(1);
    let page = params.page.max(1);
    let search = params
        .search
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(|s| format!("%{}%", s));

    let order_clause = format!(
        " ORDER BY {} {}, id DESC LIMIT $2 OFFSET $3",
        sort_column(&params.sort_by),
        order_keyword(&params.order)
    );

    let base = "SELECT id, sale_number, client_name, overall_total, date_of_purchase,
                       warranty, term_payable, mode_of_payment, status, created_at
                FROM sales
                WHERE ($1::TEXT IS NULL OR sale_number ILIKE $1 OR client_name ILIKE $1)";

    let sales = sqlx::query_as::<_, Sale>(&format!("{}{}", base, order_clause))
        .bind(&search)
        .bind(limit)
        .bind((page - 1) * limit)
        .fetch_all(&state.db_pool)
        .await?;

    let total: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sales
         WHERE ($1::TEXT IS NULL OR sale_number ILIKE $1 OR client_name ILIKE $1)",
    )
    .bind(&search)
    .fetch_one(&state.db_pool)
    .await?;

    let sale_ids: Vec<i64> = sales.iter().map(|s| s.id).collect();
    let mut item_rows = fetch_items_for_sales(&state.db_pool, &sale_ids).await?;

    let data: Vec<SaleResponse> = sales
        .into_iter()
        .map(|sale| {
            let (mine, rest): (Vec<_>, Vec<_>) =
                item_rows.drain(..).partition(|r| r.sale_id == sale.id);
            item_rows = rest;
            assemble(sale, mine)
        })
        .collect();

    Ok(Json(SaleListResponse {
        data,
        total_pages: total_pages(total, limit),
        current_page: page,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_column_whitelists_known_fields() {
        assert_eq!(sort_column("clientName"), "client_name");
        assert_eq!(sort_column("saleID"), "sale_number");
        assert_eq!(sort_column("overallTotalAmount"), "overall_total");
    }

    #[test]
    fn sort_column_rejects_unknown_input() {
        assert_eq!(sort_column("dateOfPurchase"), "date_of_purchase");
        assert_eq!(sort_column("1; DROP TABLE sales"), "date_of_purchase");
        assert_eq!(sort_column(""), "date_of_purchase");
    }

    #[test]
    fn order_keyword_defaults_to_desc() {
        assert_eq!(order_keyword("asc"), "ASC");
        assert_eq!(order_keyword("ASC"), "ASC");
        assert_eq!(order_keyword("desc"), "DESC");
        assert_eq!(order_keyword("whatever"), "DESC");
    }

    #[test]
    fn validation_rejects_blank_header_fields() {
        let req = SaleRequest {
            client_name: " ".to_string(),
            sale_items: vec![SaleItemRequest { product: 1, quantity: 1 }],
            date_of_purchase: chrono::NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            warranty: "1 year".to_string(),
            term_payable: "30 days".to_string(),
            mode_of_payment: "cash".to_string(),
            status: "completed".to_string(),
        };
        assert!(validate_sale_request(&req).is_err());
    }

    #[test]
    fn validation_rejects_empty_items() {
        let req = SaleRequest {
            client_name: "Acme".to_string(),
            sale_items: vec![],
            date_of_purchase: chrono::NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            warranty: "1 year".to_string(),
            term_payable: "30 days".to_string(),
            mode_of_payment: "cash".to_string(),
            status: "completed".to_string(),
        };
        assert!(validate_sale_request(&req).is_err());
    }
}
