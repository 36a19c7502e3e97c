use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use database::DbError;
use reporter::error::ReporterError;
use serde_json::json;
use thiserror::Error;

pub const SUMMARY_FAILURE: &str = "Failed to fetch portfolio financial summary";

#[derive(Error, Debug)]
pub enum AppError {
    /// A reporter failure; `message` is what the client sees on a 500.
    #[error("{message}: {source}")]
    Reporter {
        message: &'static str,
        #[source]
        source: ReporterError,
    },
    /// A store failure; `message` is what the client sees on a 500.
    #[error("{message}: {source}")]
    Database {
        message: &'static str,
        #[source]
        source: DbError,
    },
    #[error("Invalid request: {0}")]
    BadRequest(String),
}

impl AppError {
    pub fn reporter(message: &'static str) -> impl FnOnce(ReporterError) -> Self {
        move |source| AppError::Reporter { message, source }
    }

    pub fn database(message: &'static str) -> impl FnOnce(DbError) -> Self {
        move |source| AppError::Database { message, source }
    }
}

impl From<core_types::CoreError> for AppError {
    fn from(err: core_types::CoreError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Reporter { message, source } => {
                if source.is_client_error() {
                    (StatusCode::BAD_REQUEST, source.to_string())
                } else {
                    tracing::error!(error = ?source, "{}", message);
                    (StatusCode::INTERNAL_SERVER_ERROR, message.to_string())
                }
            }
            AppError::Database { message, source } => match &source {
                DbError::NotFound => (StatusCode::NOT_FOUND, source.to_string()),
                DbError::UnknownProperty(_) => (StatusCode::BAD_REQUEST, source.to_string()),
                _ => {
                    tracing::error!(error = ?source, "{}", message);
                    (StatusCode::INTERNAL_SERVER_ERROR, message.to_string())
                }
            },
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
