use axum::{routing::get, Router};
use crate::handlers::job_order::{
    create_job_order, delete_job_order, get_job_order, list_job_orders, update_job_order,
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/job-orders", get(list_job_orders).post(create_job_order))
        .route(
            "/job-orders/{id}",
            get(get_job_order)
                .put(update_job_order)
                .delete(delete_job_order),
        )
}
