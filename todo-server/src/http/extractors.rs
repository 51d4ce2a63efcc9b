//! Custom Axum extractors
//!
//! Each rejection is turned into an [`ApiError::Validation`] so malformed
//! paths, queries, and bodies share the problem-details shape.

use axum::body::Bytes;
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use serde_json::Value;
use uuid::Uuid;

use super::error::ApiError;
use crate::models::{FieldError, FromJsonBody, Pagination, PaginationParams, ValidationError};

/// Extract and validate a todo UUID from path
pub struct TodoId(pub Uuid);

impl<S> FromRequestParts<S> for TodoId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let invalid = || {
            ApiError::Validation(vec![FieldError::new(
                ["path", "todo_id"],
                ValidationError::InvalidUuid,
            )])
        };

        let Path(id): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| invalid())?;

        let uuid = Uuid::parse_str(&id).map_err(|_| invalid())?;
        Ok(Self(uuid))
    }
}

/// Extract `page` / `page_size` query parameters
pub struct PageQuery(pub Pagination);

impl<S> FromRequestParts<S> for PageQuery
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params): Query<PaginationParams> = Query::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                ApiError::Validation(vec![FieldError::new(
                    ["query"],
                    ValidationError::Malformed {
                        reason: rejection.body_text(),
                    },
                )])
            })?;

        Ok(Self(Pagination::try_from(params)?))
    }
}

/// Parse a JSON body and validate it field by field
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: FromJsonBody,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body_error = |error| ApiError::Validation(vec![FieldError::new(["body"], error)]);

        let bytes = Bytes::from_request(req, state).await.map_err(|rejection| {
            body_error(ValidationError::Malformed {
                reason: rejection.body_text(),
            })
        })?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(body_error(ValidationError::Missing));
        }

        let value: Value =
            serde_json::from_slice(&bytes).map_err(|_| body_error(ValidationError::InvalidJson))?;

        Ok(Self(T::from_json(&value)?))
    }
}
