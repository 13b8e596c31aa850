use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{delete, get, post},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/collections", post(handlers::form_create_collection))
        .route("/collections/:id/select", post(handlers::form_select_collection))
        .route("/collections/:id/delete", post(handlers::form_delete_collection))
        .route("/stories", post(handlers::form_create_story))
        .route("/stories/:id/reverse", post(handlers::form_reverse_story))
        .route("/api/state", get(handlers::get_state))
        .route(
            "/api/collections",
            get(handlers::list_collections).post(handlers::create_collection),
        )
        .route("/api/collections/:id", delete(handlers::delete_collection))
        .route("/api/collections/:id/select", post(handlers::select_collection))
        .route(
            "/api/stories",
            get(handlers::list_stories).post(handlers::create_story),
        )
        .route("/api/stories/:id/reverse", post(handlers::reverse_story))
        .route("/api/chart", get(handlers::get_chart))
        .with_state(state)
}
