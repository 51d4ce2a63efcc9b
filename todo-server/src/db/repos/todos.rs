//! Postgres todo repository
//!
//! Every write is a single statement with `RETURNING`, so there is no
//! read-modify-write window inside the service. Concurrent updates to the
//! same row are last-writer-wins at the database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::pool::PoolConnection;
use sqlx::{Connection, FromRow, PgPool, Postgres};
use uuid::Uuid;

use super::{DbError, TodoRepository, TodoStore};
use crate::models::{NewTodo, Paginated, Pagination, Todo, TodoChanges};

/// Todo row as stored in the `todos` table
#[derive(Debug, Clone, FromRow)]
struct TodoRow {
    id: Uuid,
    title: String,
    description: Option<String>,
    completed: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<TodoRow> for Todo {
    fn from(r: TodoRow) -> Self {
        Self {
            id: r.id,
            title: r.title,
            description: r.description,
            completed: r.completed,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Pool-backed store
#[derive(Clone)]
pub struct PgTodoStore {
    pool: PgPool,
}

impl PgTodoStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TodoStore for PgTodoStore {
    async fn session(&self) -> Result<Box<dyn TodoRepository>, DbError> {
        let conn = self.pool.acquire().await?;
        Ok(Box::new(PgTodoSession { conn }))
    }

    async fn ping(&self) -> Result<(), DbError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// One checked-out connection; returned to the pool on drop
struct PgTodoSession {
    conn: PoolConnection<Postgres>,
}

#[async_trait]
impl TodoRepository for PgTodoSession {
    async fn create(&mut self, new: NewTodo) -> Result<Todo, DbError> {
        let row: TodoRow = sqlx::query_as(
            r#"
            INSERT INTO todos (id, title, description)
            VALUES ($1, $2, $3)
            RETURNING id, title, description, completed, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new.title)
        .bind(new.description.as_deref())
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(row.into())
    }

    async fn find_by_id(&mut self, id: Uuid) -> Result<Todo, DbError> {
        let row: TodoRow = sqlx::query_as(
            r#"
            SELECT id, title, description, completed, created_at, updated_at
            FROM todos
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *self.conn)
        .await?
        .ok_or_else(|| DbError::todo_not_found(id))?;

        Ok(row.into())
    }

    async fn update(&mut self, id: Uuid, changes: TodoChanges) -> Result<Todo, DbError> {
        if changes.is_empty() {
            return self.find_by_id(id).await;
        }

        // updated_at always moves forward, even within one clock tick
        let row: TodoRow = sqlx::query_as(
            r#"
            UPDATE todos SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                completed = COALESCE($4, completed),
                updated_at = GREATEST(NOW(), updated_at + INTERVAL '1 microsecond')
            WHERE id = $1
            RETURNING id, title, description, completed, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(changes.title.as_deref())
        .bind(changes.description.as_deref())
        .bind(changes.completed)
        .fetch_optional(&mut *self.conn)
        .await?
        .ok_or_else(|| DbError::todo_not_found(id))?;

        Ok(row.into())
    }

    async fn delete(&mut self, id: Uuid) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1")
            .bind(id)
            .execute(&mut *self.conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::todo_not_found(id));
        }
        Ok(())
    }

    async fn list_page(&mut self, page: Pagination) -> Result<Paginated<Todo>, DbError> {
        // Count and page from one snapshot
        let mut tx = self.conn.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await?;

        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM todos")
            .fetch_one(&mut *tx)
            .await?;

        let rows: Vec<TodoRow> = sqlx::query_as(
            r#"
            SELECT id, title, description, completed, created_at, updated_at
            FROM todos
            ORDER BY created_at DESC, id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Paginated {
            items: rows.into_iter().map(Todo::from).collect(),
            total,
            page: page.page,
            page_size: page.page_size,
        })
    }
}
