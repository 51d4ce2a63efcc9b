//! Repository interface for todo persistence
//!
//! A [`TodoStore`] hands out one scoped [`TodoRepository`] session per
//! request. A Postgres session owns a single pooled connection; dropping the
//! session returns it to the pool on every exit path, errors included.

pub mod memory;
pub mod todos;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{NewTodo, Paginated, Pagination, Todo, TodoChanges};

pub use memory::MemoryTodoStore;
pub use todos::PgTodoStore;

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },
}

impl DbError {
    pub fn todo_not_found(id: Uuid) -> Self {
        Self::NotFound {
            resource: "todo",
            id: id.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Source of scoped repository sessions
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Acquire a session; the backing connection is released when it drops.
    async fn session(&self) -> Result<Box<dyn TodoRepository>, DbError>;

    /// Round-trip to the backing store.
    async fn ping(&self) -> Result<(), DbError>;
}

/// Persistence operations for todos
#[async_trait]
pub trait TodoRepository: Send {
    /// Insert a todo with a generated id; `created_at == updated_at`.
    async fn create(&mut self, new: NewTodo) -> Result<Todo, DbError>;

    async fn find_by_id(&mut self, id: Uuid) -> Result<Todo, DbError>;

    /// Overwrite the supplied fields and refresh `updated_at`.
    ///
    /// Empty changes return the stored record untouched.
    async fn update(&mut self, id: Uuid, changes: TodoChanges) -> Result<Todo, DbError>;

    async fn delete(&mut self, id: Uuid) -> Result<(), DbError>;

    /// Newest first (`created_at DESC, id DESC`) with the overall total.
    async fn list_page(&mut self, page: Pagination) -> Result<Paginated<Todo>, DbError>;
}
