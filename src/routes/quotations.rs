use axum::{routing::get, Router};
use crate::handlers::quotation::{create_quotation, list_quotations};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/quotations", get(list_quotations).post(create_quotation))
}
