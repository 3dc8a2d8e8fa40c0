//! Storage seam for todos. Every method except `create` operates on the active view only.

mod memory;
mod postgres;

pub use memory::InMemoryTodoRepository;
pub use postgres::PgTodoRepository;

use crate::error::AppError;
use crate::model::{ActivePage, Todo, TodoFields};
use async_trait::async_trait;

#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// Active rows ordered by id descending, `offset` skipped, at most `limit` returned,
    /// together with the count of all active rows.
    async fn list_active(&self, offset: u64, limit: u32) -> Result<ActivePage, AppError>;

    async fn get_active(&self, id: i64) -> Result<Option<Todo>, AppError>;

    /// Insert a new active row; id and both timestamps are assigned by storage.
    async fn create(&self, fields: TodoFields) -> Result<Todo, AppError>;

    /// Overwrite the mutable fields of an active row and bump `updated_at`.
    /// `None` when no active row has this id.
    async fn update_active(&self, id: i64, fields: TodoFields) -> Result<Option<Todo>, AppError>;

    /// Mark an active row deleted. `false` when no active row has this id.
    async fn soft_delete(&self, id: i64) -> Result<bool, AppError>;

    /// Cheap reachability check for readiness probes.
    async fn ping(&self) -> Result<(), AppError>;
}
