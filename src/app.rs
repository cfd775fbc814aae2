use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/month/prev", post(handlers::month_prev))
        .route("/month/next", post(handlers::month_next))
        .route("/day/:day/click", post(handlers::click_day))
        .route("/api/month", get(handlers::get_month))
        .route("/api/navigate", post(handlers::navigate))
        .route("/api/click", post(handlers::click))
        .with_state(state)
}
