use axum::{
    extract::{Path, Query, State},
    response::Response,
    Json,
};
use tokio::task::spawn_blocking;

use super::{add, remove};
use crate::{
    association::Association,
    auth::AuthUser,
    database::models::user::AuthorSummary,
    error::AppError,
    state::AppState,
    subscriptions::{self, Page, SubscriptionsQuery},
};

pub async fn list_subscriptions(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(query): Query<SubscriptionsQuery>,
) -> Result<Json<Page<AuthorSummary>>, AppError> {
    let loader = state.loader;
    let page =
        spawn_blocking(move || subscriptions::list(loader.as_ref(), user_id, &query)).await??;

    Ok(Json(page))
}

pub async fn subscribe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(author_id): Path<i32>,
) -> Result<Response, AppError> {
    add(state, user_id, Association::Subscription(author_id)).await
}

pub async fn unsubscribe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(author_id): Path<i32>,
) -> Result<Response, AppError> {
    remove(state, user_id, Association::Subscription(author_id)).await
}
