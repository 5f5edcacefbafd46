use axum::{
    extract::{Path, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use tokio::task::spawn_blocking;
use tracing::info;

use super::{add, remove};
use crate::{
    association::Association,
    auth::AuthUser,
    error::AppError,
    shopping_list::{self, renderer::RenderedDocument},
    state::AppState,
};

pub async fn add_favorite(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(recipe_id): Path<i32>,
) -> Result<Response, AppError> {
    add(state, user_id, Association::Favorite(recipe_id)).await
}

pub async fn remove_favorite(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(recipe_id): Path<i32>,
) -> Result<Response, AppError> {
    remove(state, user_id, Association::Favorite(recipe_id)).await
}

pub async fn add_to_shopping_cart(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(recipe_id): Path<i32>,
) -> Result<Response, AppError> {
    add(state, user_id, Association::ShoppingCart(recipe_id)).await
}

pub async fn remove_from_shopping_cart(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(recipe_id): Path<i32>,
) -> Result<Response, AppError> {
    remove(state, user_id, Association::ShoppingCart(recipe_id)).await
}

pub async fn download_shopping_cart(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Response, AppError> {
    let loader = state.loader.clone();
    let renderer = state.renderer.clone();

    let document = spawn_blocking(move || -> Result<RenderedDocument, AppError> {
        let list = shopping_list::aggregate(loader.as_ref(), user_id)?;
        Ok(renderer.render(&list)?)
    })
    .await??;

    info!(user_id, pages = document.page_count, "Shopping list generated");

    let headers = [
        (CONTENT_TYPE, RenderedDocument::CONTENT_TYPE.to_owned()),
        (CONTENT_DISPOSITION, document.content_disposition()),
    ];

    Ok((headers, document.bytes).into_response())
}
