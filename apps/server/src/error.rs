use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use keymote_core::errors::{Error as CoreError, LibraryError, PresenterError};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Wraps a failed presenter script in a user-facing `context`. A missing
    /// scripting host stays a 501.
    pub fn presenter(context: &str) -> impl FnOnce(CoreError) -> ApiError + '_ {
        move |err| match err {
            CoreError::Presenter(PresenterError::ScriptFailed(stderr)) => {
                ApiError::Internal(format!("{context} Error: {stderr}"))
            }
            other => ApiError::Core(other),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    status: &'static str,
    message: String,
}

fn core_status(err: &CoreError) -> StatusCode {
    match err {
        CoreError::Validation(_) => StatusCode::BAD_REQUEST,
        CoreError::Library(LibraryError::AccessDenied) => StatusCode::FORBIDDEN,
        CoreError::Library(LibraryError::NotFound(_)) => StatusCode::NOT_FOUND,
        CoreError::Library(_) => StatusCode::BAD_REQUEST,
        CoreError::Presenter(PresenterError::Unavailable) => StatusCode::NOT_IMPLEMENTED,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Core(e) => core_status(e),
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!("Request failed with {}: {}", status, self);
        } else {
            tracing::warn!("Request rejected with {}: {}", status, self);
        }
        let body = Json(ErrorBody {
            status: "error",
            message: self.to_string(),
        });
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(format!("Invalid data format. {}", rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
