use axum::{routing::get, Router};
use crate::handlers::stock_movement;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/stock-movements",
        get(stock_movement::list_stock_movements).post(stock_movement::add_stock_movement),
    )
}
