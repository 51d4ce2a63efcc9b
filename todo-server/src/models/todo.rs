//! Todo entity and its request/response schemas

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::pagination::Paginated;
use super::validation::{BodyFields, FieldError, FromJsonBody};

/// Minimum title length in characters
pub const TITLE_MIN_LEN: usize = 1;

/// Maximum title length in characters
pub const TITLE_MAX_LEN: usize = 200;

/// Maximum description length in characters
pub const DESCRIPTION_MAX_LEN: usize = 1000;

/// A stored todo item.
///
/// `id` and `created_at` never change after creation; `updated_at` moves
/// forward on every mutation and is never earlier than `created_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Todo {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied when inserting a todo
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub title: String,
    pub description: Option<String>,
}

/// Partial update: `None` leaves the stored value untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

impl TodoChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.completed.is_none()
    }

    /// Overwrite the supplied fields on `todo` (timestamps are left to the caller).
    pub fn apply_to(self, todo: &mut Todo) {
        if let Some(title) = self.title {
            todo.title = title;
        }
        if let Some(description) = self.description {
            todo.description = Some(description);
        }
        if let Some(completed) = self.completed {
            todo.completed = completed;
        }
    }
}

/// POST body: `{title, description?}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoCreate {
    pub title: String,
    pub description: Option<String>,
}

impl FromJsonBody for TodoCreate {
    fn from_json(body: &Value) -> Result<Self, Vec<FieldError>> {
        let mut fields = BodyFields::new(body)?;
        let title = fields.required_str("title", TITLE_MIN_LEN, TITLE_MAX_LEN);
        let description = fields.optional_str("description", 0, DESCRIPTION_MAX_LEN);
        fields.finish()?;

        Ok(Self {
            // finish() fails whenever a required field is missing
            title: title.unwrap_or_default(),
            description,
        })
    }
}

impl From<TodoCreate> for NewTodo {
    fn from(create: TodoCreate) -> Self {
        Self {
            title: create.title,
            description: create.description,
        }
    }
}

/// PUT body: `{title?, description?, completed?}`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

impl FromJsonBody for TodoUpdate {
    fn from_json(body: &Value) -> Result<Self, Vec<FieldError>> {
        let mut fields = BodyFields::new(body)?;
        let title = fields.optional_str("title", TITLE_MIN_LEN, TITLE_MAX_LEN);
        let description = fields.optional_str("description", 0, DESCRIPTION_MAX_LEN);
        let completed = fields.optional_bool("completed");
        fields.finish()?;

        Ok(Self {
            title,
            description,
            completed,
        })
    }
}

impl From<TodoUpdate> for TodoChanges {
    fn from(update: TodoUpdate) -> Self {
        Self {
            title: update.title,
            description: update.description,
            completed: update.completed,
        }
    }
}

/// Todo as returned over HTTP
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Todo> for TodoResponse {
    fn from(t: Todo) -> Self {
        Self {
            id: t.id,
            title: t.title,
            description: t.description,
            completed: t.completed,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

/// GET /api/todos response body
pub type TodoListResponse = Paginated<TodoResponse>;
