// src/routes/mod.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::catch_panic::CatchPanicLayer;

use crate::AppState;

pub mod health;
pub mod reports;

/// Fixed-shape JSON error body: `{"error": "..."}`.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    pub error: String,
}

/// Errors surfaced to clients. Detail is logged where the error is
/// raised; the client only ever sees the message carried here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiError {
    Validation(&'static str),
    Auth,
    NotFound(&'static str),
    Forbidden(&'static str),
    Internal(&'static str),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Auth => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ApiError::Auth => "Authentication required",
            ApiError::Validation(m)
            | ApiError::NotFound(m)
            | ApiError::Forbidden(m)
            | ApiError::Internal(m) => m,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message().to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    let reports = Router::new()
        .route("/api/reports", get(reports::list_reports))
        .layer(CatchPanicLayer::custom(reports::panic_response));

    Router::new()
        .route("/health", get(health::health))
        .merge(reports)
        .with_state(state)
}
