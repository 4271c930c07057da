use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use queryboard_core::domain::{ServiceError, StoreError};
use serde::Serialize;

pub enum AppError {
    /// Internal errors - logged but return generic 500 to user
    Internal(anyhow::Error),
    /// Validation errors - message is safe to show
    Validation(String),
    /// Malformed request that never reached validation
    BadRequest(&'static str),
    NotFound,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(ErrorBody { error: message })).into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Internal(err) => {
                tracing::error!("internal error: {:?}", err);
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            AppError::Validation(msg) => error_response(StatusCode::BAD_REQUEST, &msg),
            AppError::BadRequest(msg) => error_response(StatusCode::BAD_REQUEST, msg),
            AppError::NotFound => error_response(StatusCode::NOT_FOUND, "Not found"),
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(v) => AppError::Validation(v.to_string()),
            ServiceError::Store(s) => AppError::from(s),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Internal(err.into())
    }
}
