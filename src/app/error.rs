use crate::domain::validation::FieldViolation;
use crate::storage::StoreError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Every way a student operation can fail, mapped onto HTTP by [`IntoResponse`].
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("validation failed ({} violation(s))", .0.len())]
    Validation(Vec<FieldViolation>),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    /// `context` is the only part of a store failure a client ever sees.
    #[error("{context}: {source}")]
    Store {
        context: &'static str,
        #[source]
        source: StoreError,
    },
}

impl AppError {
    /// Adapter for `map_err` that tags a store failure with a client-safe message.
    pub fn store(context: &'static str) -> impl FnOnce(StoreError) -> AppError {
        move |source| AppError::Store { context, source }
    }
}

impl From<FieldViolation> for AppError {
    fn from(v: FieldViolation) -> Self {
        AppError::Validation(vec![v])
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(errors) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "errors": errors }))).into_response()
            }
            AppError::Conflict(message) => (StatusCode::BAD_REQUEST, Json(message)).into_response(),
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, Json(message)).into_response(),
            AppError::Store { context, source } => {
                tracing::error!(error = %source, "{}", context);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": context })),
                )
                    .into_response()
            }
        }
    }
}
