use axum::{
    Router,
    routing::{get, post},
};

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().nest("/emojis", emoji_routes())
}

fn emoji_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::emoji::list_emojis))
        .route("/generate", post(handlers::generate::generate_emoji))
        .route(
            "/generations/{prediction_id}",
            get(handlers::generate::get_generation_status),
        )
        .route("/{id}/like", post(handlers::emoji::like_emoji))
}
