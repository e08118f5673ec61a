pub mod products;
pub mod inventory;
pub mod sales;
pub mod stock_movements;
pub mod job_orders;
pub mod quotations;

use axum::Router;
use crate::state::AppState;

pub fn create_router() -> Router<AppState> {
    Router::new()
        .merge(products::routes())
        .merge(inventory::routes())
        .merge(sales::routes())
        .merge(stock_movements::routes())
        .merge(job_orders::routes())
        .merge(quotations::routes())
}
