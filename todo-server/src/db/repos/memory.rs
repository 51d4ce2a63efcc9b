//! In-process todo store
//!
//! Same contract as the Postgres store, backed by a map behind an async
//! lock. Timestamps are truncated to microseconds to match `TIMESTAMPTZ`.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, TimeDelta, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{DbError, TodoRepository, TodoStore};
use crate::models::{NewTodo, Paginated, Pagination, Todo, TodoChanges};

type Todos = Arc<RwLock<HashMap<Uuid, Todo>>>;

/// Map-backed store; clones share the same data
#[derive(Clone, Default)]
pub struct MemoryTodoStore {
    todos: Todos,
}

impl MemoryTodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored todos
    pub async fn len(&self) -> usize {
        self.todos.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl TodoStore for MemoryTodoStore {
    async fn session(&self) -> Result<Box<dyn TodoRepository>, DbError> {
        Ok(Box::new(MemorySession {
            todos: Arc::clone(&self.todos),
        }))
    }

    async fn ping(&self) -> Result<(), DbError> {
        Ok(())
    }
}

struct MemorySession {
    todos: Todos,
}

fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Current time, or one microsecond past `previous` if the clock hasn't moved on.
fn advance(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = now();
    if now > previous {
        now
    } else {
        previous + TimeDelta::microseconds(1)
    }
}

#[async_trait]
impl TodoRepository for MemorySession {
    async fn create(&mut self, new: NewTodo) -> Result<Todo, DbError> {
        let created_at = now();
        let todo = Todo {
            id: Uuid::new_v4(),
            title: new.title,
            description: new.description,
            completed: false,
            created_at,
            updated_at: created_at,
        };

        self.todos.write().await.insert(todo.id, todo.clone());
        Ok(todo)
    }

    async fn find_by_id(&mut self, id: Uuid) -> Result<Todo, DbError> {
        self.todos
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| DbError::todo_not_found(id))
    }

    async fn update(&mut self, id: Uuid, changes: TodoChanges) -> Result<Todo, DbError> {
        let mut todos = self.todos.write().await;
        let todo = todos
            .get_mut(&id)
            .ok_or_else(|| DbError::todo_not_found(id))?;

        if !changes.is_empty() {
            changes.apply_to(todo);
            todo.updated_at = advance(todo.updated_at);
        }
        Ok(todo.clone())
    }

    async fn delete(&mut self, id: Uuid) -> Result<(), DbError> {
        self.todos
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DbError::todo_not_found(id))
    }

    async fn list_page(&mut self, page: Pagination) -> Result<Paginated<Todo>, DbError> {
        let todos = self.todos.read().await;

        let mut all: Vec<&Todo> = todos.values().collect();
        all.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        let items = all
            .into_iter()
            .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(page.limit()).unwrap_or(usize::MAX))
            .cloned()
            .collect();

        Ok(Paginated {
            items,
            total: todos.len() as i64,
            page: page.page,
            page_size: page.page_size,
        })
    }
}
