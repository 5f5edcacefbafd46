use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::trace;

use crate::{error::AppError, state::AppState};

const TOKEN_PREFIX: &str = "Token ";

/// Id of the user behind a valid `Authorization: Token <key>` header.
///
/// Rejects with 401 before the handler body runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser(pub i32);

fn token_from_parts(parts: &Parts) -> Option<String> {
    let header = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix(TOKEN_PREFIX)?.trim();

    (!token.is_empty()).then(|| token.to_owned())
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = token_from_parts(parts).ok_or(AppError::Unauthorized)?;

        let loader = state.loader.clone();
        let user_id = tokio::task::spawn_blocking(move || loader.authenticate(&token))
            .await??
            .ok_or(AppError::Unauthorized)?;

        trace!(user_id, "Authenticated request");

        Ok(AuthUser(user_id))
    }
}
