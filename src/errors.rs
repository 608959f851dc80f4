use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use std::fmt;

use crate::{services::storage_service::StorageError, views};

/// A lightweight wrapper for request errors that renders the error view.
///
/// Whatever the failure, the browser gets the error page; a backend call
/// failure never turns into a redirect.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,

    /// Optional operator-facing hint shown under the message.
    pub hint: Option<String>,
}

impl AppError {
    /// Create a new AppError with a specific status and message.
    pub fn new(status: StatusCode, msg: impl Into<String>) -> Self {
        Self {
            status,
            message: msg.into(),
            hint: None,
        }
    }

    /// Shortcut for 404 Not Found
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, msg)
    }

    /// Shortcut for 400 Bad Request
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, msg)
    }

    /// Attach a hint line to the rendered page.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Html(views::error_page(
            self.status.as_u16(),
            &self.message,
            self.hint.as_deref(),
        ));
        (self.status, body).into_response()
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        let status = match &err {
            StorageError::BucketNotFound(_) | StorageError::ObjectNotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            StorageError::BucketAlreadyExists(_) => StatusCode::CONFLICT,
            StorageError::InvalidBucketName { .. } | StorageError::InvalidObjectKey => {
                StatusCode::BAD_REQUEST
            }
            StorageError::Backend(_) => StatusCode::BAD_GATEWAY,
        };
        AppError::new(status, err.to_string())
    }
}
