//! Todo endpoints
//!
//! Each handler validates its input first, then opens one store session for
//! the rest of the request. The session (and its pooled connection) is
//! released when the handler returns, whether it succeeded or not.

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::http::error::ApiError;
use crate::http::extractors::{PageQuery, TodoId, ValidJson};
use crate::models::{TodoCreate, TodoListResponse, TodoResponse, TodoUpdate};
use crate::state::AppState;

/// GET /todos - newest first, paginated
async fn list_todos(
    State(state): State<AppState>,
    PageQuery(page): PageQuery,
) -> Result<Json<TodoListResponse>, ApiError> {
    let mut session = state.session().await?;
    let result = session.list_page(page).await?;

    Ok(Json(result.map(TodoResponse::from)))
}

/// POST /todos - create a todo
async fn create_todo(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<TodoCreate>,
) -> Result<(StatusCode, Json<TodoResponse>), ApiError> {
    let mut session = state.session().await?;
    let todo = session.create(input.into()).await?;
    tracing::debug!(id = %todo.id, "Created todo");

    Ok((StatusCode::CREATED, Json(TodoResponse::from(todo))))
}

/// GET /todos/{id} - fetch a single todo
async fn get_todo(
    State(state): State<AppState>,
    TodoId(id): TodoId,
) -> Result<Json<TodoResponse>, ApiError> {
    let todo = state.session().await?.find_by_id(id).await?;
    Ok(Json(TodoResponse::from(todo)))
}

/// PUT /todos/{id} - overwrite only the supplied fields
async fn update_todo(
    State(state): State<AppState>,
    TodoId(id): TodoId,
    ValidJson(input): ValidJson<TodoUpdate>,
) -> Result<Json<TodoResponse>, ApiError> {
    let mut session = state.session().await?;
    let todo = session.update(id, input.into()).await?;

    Ok(Json(TodoResponse::from(todo)))
}

/// DELETE /todos/{id}
async fn delete_todo(
    State(state): State<AppState>,
    TodoId(id): TodoId,
) -> Result<StatusCode, ApiError> {
    state.session().await?.delete(id).await?;
    tracing::debug!(%id, "Deleted todo");

    Ok(StatusCode::NO_CONTENT)
}

/// Todo routes, mounted under `/api`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route(
            "/todos/{id}",
            get(get_todo).put(update_todo).delete(delete_todo),
        )
}
