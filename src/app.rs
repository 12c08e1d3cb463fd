use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, post, put},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/session", post(handlers::start_session))
        .route("/api/tasks", get(handlers::list_tasks).post(handlers::add_task))
        .route("/api/tasks/:id", delete(handlers::delete_task))
        .route("/api/tasks/:id/progress", put(handlers::set_progress))
        .route("/api/tasks/:id/chunks/:position", post(handlers::click_chunk))
        .route("/api/stats", get(handlers::get_stats))
        .route("/api/export", get(handlers::export_backup))
        .route("/api/import", post(handlers::import_backup))
        .route("/api/suggestions", post(handlers::suggest))
        .route("/api/suggestions/dismiss", post(handlers::dismiss_suggestions))
        .with_state(state)
}
