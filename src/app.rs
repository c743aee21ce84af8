use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, patch, post},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/tasks", get(handlers::list_tasks).post(handlers::add_task))
        .route("/api/tasks/:id", patch(handlers::edit_task).delete(handlers::delete_task))
        .route("/api/tasks/:id/toggle", post(handlers::toggle_task))
        .route("/api/week", get(handlers::get_week))
        .route("/api/chart", get(handlers::get_chart))
        .route(
            "/api/preferences/dark-mode",
            get(handlers::get_dark_mode).put(handlers::set_dark_mode),
        )
        .route("/api/preferences/welcome", get(handlers::get_welcome))
        .route("/api/preferences/welcome/dismiss", post(handlers::dismiss_welcome))
        .with_state(state)
}
