use crate::common::newtypes::CommentId;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

pub type BackendResult<T> = Result<T, BackendError>;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("{0}")]
    Validation(String),
    #[error("not found")]
    NotFound,
    #[error("permission denied")]
    PermissionDenied,
    /// Some descendants could not be removed during a cascading delete.
    /// Nodes in `deleted_ids` stay deleted, there is no rollback.
    #[error("cascade delete incomplete")]
    PartialCascade {
        deleted_ids: Vec<CommentId>,
        failed_ids: Vec<CommentId>,
    },
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    deleted_ids: Option<Vec<CommentId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    failed_ids: Option<Vec<CommentId>>,
}

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let status = match &self {
            BackendError::Validation(_) => StatusCode::BAD_REQUEST,
            BackendError::NotFound => StatusCode::NOT_FOUND,
            BackendError::PermissionDenied => StatusCode::FORBIDDEN,
            BackendError::PartialCascade { .. } | BackendError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = match self {
            BackendError::PartialCascade {
                deleted_ids,
                failed_ids,
            } => ErrorResponse {
                error: "cascade delete incomplete".to_string(),
                deleted_ids: Some(deleted_ids),
                failed_ids: Some(failed_ids),
            },
            other => ErrorResponse {
                error: other.to_string(),
                deleted_ids: None,
                failed_ids: None,
            },
        };
        (status, Json(body)).into_response()
    }
}

impl From<std::io::Error> for BackendError {
    fn from(value: std::io::Error) -> Self {
        Self::Internal(value.into())
    }
}

impl From<bcrypt::BcryptError> for BackendError {
    fn from(value: bcrypt::BcryptError) -> Self {
        Self::Internal(value.into())
    }
}

impl From<jsonwebtoken::errors::Error> for BackendError {
    fn from(value: jsonwebtoken::errors::Error) -> Self {
        Self::Internal(value.into())
    }
}

impl From<config::ConfigError> for BackendError {
    fn from(value: config::ConfigError) -> Self {
        Self::Internal(value.into())
    }
}
