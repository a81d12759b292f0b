use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

use crate::storage::StorageError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClubError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("invalid state: {0}")]
    State(String),
    #[error("verification failed: {0}")]
    Auth(String),
    #[error("storage error: {0}")]
    Storage(String),
}

pub type ClubResult<T> = Result<T, ClubError>;

impl ClubError {
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            ClubError::Validation(_) => "validation",
            ClubError::NotFound(_) => "not_found",
            ClubError::Conflict(_) => "conflict",
            ClubError::State(_) => "state",
            ClubError::Auth(_) => "auth",
            ClubError::Storage(_) => "storage",
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn state(msg: impl Into<String>) -> Self {
        Self::State(msg.into())
    }

    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth(msg.into())
    }
}

impl From<StorageError> for ClubError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::UniqueViolation(msg) => Self::Conflict(msg),
            StorageError::Db(msg) => Self::Storage(msg),
        }
    }
}

impl From<serde_json::Error> for ClubError {
    fn from(err: serde_json::Error) -> Self {
        Self::Validation(err.to_string())
    }
}

impl ResponseError for ClubError {
    fn status_code(&self) -> StatusCode {
        match self {
            ClubError::Validation(_) => StatusCode::BAD_REQUEST,
            ClubError::NotFound(_) => StatusCode::NOT_FOUND,
            ClubError::Conflict(_) => StatusCode::CONFLICT,
            ClubError::State(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ClubError::Auth(_) => StatusCode::FORBIDDEN,
            ClubError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let ClubError::Storage(msg) = self {
            tracing::error!(error = %msg, "storage failure while serving request");
        }
        HttpResponse::build(self.status_code()).json(json!({
            "error": self.to_string(),
            "kind": self.kind(),
        }))
    }
}
