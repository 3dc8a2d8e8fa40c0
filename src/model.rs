//! Todo record, its public view, and request payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const TITLE_MAX_LEN: usize = 100;
pub const DESCRIPTION_MAX_LEN: usize = 255;

/// Lifecycle state of a stored row. `Deleted` is terminal: deleted rows stay in
/// storage but are invisible to every active query.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "todo_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    #[default]
    Active,
    Deleted,
}

/// A stored row, including internal-only fields.
#[derive(Clone, Debug, PartialEq, sqlx::FromRow)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub is_completed: bool,
    pub status: RecordStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Todo {
    pub fn is_active(&self) -> bool {
        self.status == RecordStatus::Active
    }
}

/// Externally visible shape of a todo.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TodoView {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Todo> for TodoView {
    fn from(t: Todo) -> Self {
        TodoView {
            id: t.id,
            title: t.title,
            description: t.description,
            is_completed: t.is_completed,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

/// POST body.
#[derive(Clone, Debug, Deserialize)]
pub struct CreateTodo {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_completed: bool,
}

/// PUT body. A full replacement: omitting `description` clears it.
#[derive(Clone, Debug, Deserialize)]
pub struct UpdateTodo {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub is_completed: bool,
}

/// Mutable fields written by create and update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TodoFields {
    pub title: String,
    pub description: Option<String>,
    pub is_completed: bool,
}

impl From<CreateTodo> for TodoFields {
    fn from(c: CreateTodo) -> Self {
        TodoFields {
            title: c.title,
            description: c.description,
            is_completed: c.is_completed,
        }
    }
}

impl From<UpdateTodo> for TodoFields {
    fn from(u: UpdateTodo) -> Self {
        TodoFields {
            title: u.title,
            description: u.description,
            is_completed: u.is_completed,
        }
    }
}

/// One page of active rows plus the size of the whole active set.
#[derive(Clone, Debug, Default)]
pub struct ActivePage {
    pub items: Vec<Todo>,
    pub total: u64,
}
