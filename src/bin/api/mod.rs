pub mod recipes;
pub mod users;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tokio::task::spawn_blocking;
use tower_http::trace::TraceLayer;

use crate::{
    association::{self, Association},
    error::AppError,
    state::AppState,
    subscriptions,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/recipes/download_shopping_cart",
            get(recipes::download_shopping_cart),
        )
        .route(
            "/api/recipes/:id/favorite",
            post(recipes::add_favorite).delete(recipes::remove_favorite),
        )
        .route(
            "/api/recipes/:id/shopping_cart",
            post(recipes::add_to_shopping_cart).delete(recipes::remove_from_shopping_cart),
        )
        .route(subscriptions::PATH, get(users::list_subscriptions))
        .route(
            "/api/users/:id/subscribe",
            post(users::subscribe).delete(users::unsubscribe),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn add(state: AppState, user_id: i32, association: Association) -> Result<Response, AppError> {
    let loader = state.loader;
    let target =
        spawn_blocking(move || association::add(loader.as_ref(), user_id, association)).await??;

    Ok((StatusCode::CREATED, Json(target)).into_response())
}

async fn remove(
    state: AppState,
    user_id: i32,
    association: Association,
) -> Result<Response, AppError> {
    let loader = state.loader;
    spawn_blocking(move || association::remove(loader.as_ref(), user_id, association)).await??;

    Ok(StatusCode::NO_CONTENT.into_response())
}
