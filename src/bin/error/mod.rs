use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tokio::task::JoinError;
use tracing::error;

use crate::{data_loader::data_loader::LoaderError, shopping_list::renderer::RenderError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication credentials were not provided or are invalid")]
    Unauthorized,

    #[error("No such {0}")]
    NotFound(&'static str),

    #[error("{0}")]
    AlreadyExists(&'static str),

    #[error("Cannot subscribe to yourself")]
    InvalidSubscription,

    #[error("Required resource unavailable: {0}")]
    ResourceUnavailable(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<LoaderError> for AppError {
    fn from(err: LoaderError) -> Self {
        AppError::InternalError(err.to_string())
    }
}

impl From<RenderError> for AppError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::ResourceUnavailable { .. } => AppError::ResourceUnavailable(err.to_string()),
            RenderError::Document(_) => AppError::InternalError(err.to_string()),
        }
    }
}

impl From<JoinError> for AppError {
    fn from(err: JoinError) -> Self {
        AppError::InternalError(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::AlreadyExists { .. } | AppError::InvalidSubscription => {
                StatusCode::BAD_REQUEST
            }
            AppError::ResourceUnavailable { .. } | AppError::InternalError { .. } => {
                error!("{self}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let detail = match status {
            // Keep server-side details in the logs
            StatusCode::INTERNAL_SERVER_ERROR => "Internal server error".to_owned(),
            _ => self.to_string(),
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
