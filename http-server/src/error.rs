use crate::dto::MessageResponse;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use core_library::LibraryError;
use core_service::{CoreError, ErrorKind};
use thiserror::Error;
use tracing::{error, warn};

/// Handler failure. Always rendered as `{ "message": ... }`.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed query string, path or body
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Core(err) => match err.kind() {
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::AlreadyExists => StatusCode::CONFLICT,
                ErrorKind::InvalidInput | ErrorKind::OutOfRange => StatusCode::BAD_REQUEST,
                ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// Text safe to hand to the client. Internal causes are never included.
    fn client_message(&self) -> String {
        match self {
            Self::BadRequest(message) => message.clone(),
            Self::Core(err) => match err {
                CoreError::Library { source, .. } => match source {
                    LibraryError::NotFound { .. } => "Song not found".to_string(),
                    LibraryError::AlreadyExists { .. } => "Song already exists".to_string(),
                    LibraryError::InvalidInput { message, .. } => message.clone(),
                    LibraryError::Database(_) | LibraryError::Migration(_) => {
                        "Internal server error".to_string()
                    }
                },
                CoreError::OutOfRange { .. } => "Page out of range".to_string(),
                CoreError::InvalidInput { message, .. } => message.clone(),
                CoreError::Enrichment(_) => "Internal server error".to_string(),
            },
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            warn!(status = status.as_u16(), error = %self, "Request rejected");
        }

        (status, Json(MessageResponse::new(self.client_message()))).into_response()
    }
}
