//! API error types with IntoResponse
//!
//! Every error leaves the service as an `application/problem+json` document
//! with the same `{type, title, status, detail?, instance?}` shape;
//! validation failures add an `errors` list of `{loc, msg, type}`.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::db::DbError;
use crate::models::FieldError;

/// `Content-Type` for problem documents
pub const PROBLEM_JSON: &str = "application/problem+json";

/// Problem-details body
#[derive(Debug, Clone, Serialize)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

impl ProblemDetails {
    pub fn new(status: StatusCode) -> Self {
        Self {
            kind: "about:blank".into(),
            title: status.canonical_reason().unwrap_or("Error").into(),
            status: status.as_u16(),
            detail: None,
            instance: None,
            errors: Vec::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }
}

impl IntoResponse for ProblemDetails {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (
            status,
            [(header::CONTENT_TYPE, HeaderValue::from_static(PROBLEM_JSON))],
            Json(self),
        )
            .into_response()
    }
}

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Request failed validation (422)
    Validation(Vec<FieldError>),

    /// Resource not found (404)
    NotFound { resource: &'static str, id: String },

    /// No route for the path (404)
    RouteNotFound { path: String },

    /// Route exists, method doesn't (405)
    MethodNotAllowed { path: String },

    /// Database error (500, or 503 when the pool is exhausted; logged)
    Database(DbError),
}

impl ApiError {
    fn problem(&self) -> ProblemDetails {
        match self {
            Self::Validation(errors) => {
                let mut problem = ProblemDetails::new(StatusCode::UNPROCESSABLE_ENTITY)
                    .with_title("Validation Error")
                    .with_detail("Request validation failed");
                problem.errors = errors.clone();
                problem
            }
            Self::NotFound { resource, id } => ProblemDetails::new(StatusCode::NOT_FOUND)
                .with_detail(format!("{} '{}' not found", capitalize(resource), id)),
            Self::RouteNotFound { path } => ProblemDetails::new(StatusCode::NOT_FOUND)
                .with_detail("The requested resource was not found.")
                .with_instance(path.clone()),
            Self::MethodNotAllowed { path } => {
                ProblemDetails::new(StatusCode::METHOD_NOT_ALLOWED).with_instance(path.clone())
            }
            Self::Database(DbError::Sqlx(sqlx::Error::PoolTimedOut)) => {
                tracing::error!("Database pool exhausted");
                ProblemDetails::new(StatusCode::SERVICE_UNAVAILABLE)
                    .with_detail("database unavailable, try again later")
            }
            Self::Database(e) => {
                // Log the actual error, return generic message
                tracing::error!("Database error: {}", e);
                ProblemDetails::new(StatusCode::INTERNAL_SERVER_ERROR)
                    .with_detail("an internal error occurred")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.problem().into_response()
    }
}

impl From<Vec<FieldError>> for ApiError {
    fn from(errors: Vec<FieldError>) -> Self {
        Self::Validation(errors)
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound { resource, id } => Self::NotFound { resource, id },
            _ => Self::Database(e),
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
