use super::TodoRepository;
use crate::error::AppError;
use crate::model::{ActivePage, RecordStatus, Todo, TodoFields};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct Inner {
    rows: BTreeMap<i64, Todo>,
    last_id: i64,
}

/// Process-local repository. Rows are kept after soft deletion, as in Postgres.
#[derive(Default)]
pub struct InMemoryTodoRepository {
    inner: RwLock<Inner>,
}

impl InMemoryTodoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every stored row, deleted ones included, in id order.
    pub async fn all_rows(&self) -> Vec<Todo> {
        self.inner.read().await.rows.values().cloned().collect()
    }
}

/// Current time, nudged forward so it is strictly after `previous`.
fn next_timestamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn list_active(&self, offset: u64, limit: u32) -> Result<ActivePage, AppError> {
        let inner = self.inner.read().await;
        let active = || inner.rows.values().rev().filter(|t| t.is_active());
        let total = active().count() as u64;
        let skip = usize::try_from(offset).unwrap_or(usize::MAX);
        let items = active().skip(skip).take(limit as usize).cloned().collect();
        Ok(ActivePage { items, total })
    }

    async fn get_active(&self, id: i64) -> Result<Option<Todo>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner.rows.get(&id).filter(|t| t.is_active()).cloned())
    }

    async fn create(&self, fields: TodoFields) -> Result<Todo, AppError> {
        let mut inner = self.inner.write().await;
        inner.last_id += 1;
        let now = Utc::now();
        let todo = Todo {
            id: inner.last_id,
            title: fields.title,
            description: fields.description,
            is_completed: fields.is_completed,
            status: RecordStatus::Active,
            created_at: now,
            updated_at: now,
        };
        inner.rows.insert(todo.id, todo.clone());
        Ok(todo)
    }

    async fn update_active(&self, id: i64, fields: TodoFields) -> Result<Option<Todo>, AppError> {
        let mut inner = self.inner.write().await;
        let Some(todo) = inner.rows.get_mut(&id).filter(|t| t.is_active()) else {
            return Ok(None);
        };
        todo.title = fields.title;
        todo.description = fields.description;
        todo.is_completed = fields.is_completed;
        todo.updated_at = next_timestamp(todo.updated_at);
        Ok(Some(todo.clone()))
    }

    async fn soft_delete(&self, id: i64) -> Result<bool, AppError> {
        let mut inner = self.inner.write().await;
        let Some(todo) = inner.rows.get_mut(&id).filter(|t| t.is_active()) else {
            return Ok(false);
        };
        todo.status = RecordStatus::Deleted;
        todo.updated_at = next_timestamp(todo.updated_at);
        Ok(true)
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(title: &str) -> TodoFields {
        TodoFields {
            title: title.into(),
            description: None,
            is_completed: false,
        }
    }

    async fn seeded(n: usize) -> InMemoryTodoRepository {
        let repo = InMemoryTodoRepository::new();
        for i in 1..=n {
            repo.create(fields(&format!("todo {}", i))).await.unwrap();
        }
        repo
    }

    #[tokio::test]
    async fn ids_are_monotonic_and_timestamps_match() {
        let repo = seeded(3).await;
        let ids: Vec<i64> = repo.all_rows().await.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        let t = repo.get_active(2).await.unwrap().unwrap();
        assert_eq!(t.created_at, t.updated_at);
        assert!(!t.is_completed);
    }

    #[tokio::test]
    async fn list_orders_by_id_desc_and_slices() {
        let repo = seeded(12).await;
        let first = repo.list_active(0, 10).await.unwrap();
        assert_eq!(first.total, 12);
        assert_eq!(first.items.first().map(|t| t.id), Some(12));
        assert_eq!(first.items.len(), 10);
        let second = repo.list_active(10, 10).await.unwrap();
        let ids: Vec<i64> = second.items.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert!(repo.list_active(20, 10).await.unwrap().items.is_empty());
    }

    #[tokio::test]
    async fn deleted_rows_are_kept_but_hidden() {
        let repo = seeded(3).await;
        assert!(repo.soft_delete(2).await.unwrap());
        assert!(!repo.soft_delete(2).await.unwrap());
        assert!(repo.get_active(2).await.unwrap().is_none());
        assert!(repo.update_active(2, fields("x")).await.unwrap().is_none());

        let page = repo.list_active(0, 10).await.unwrap();
        assert_eq!(page.total, 2);
        assert!(page.items.iter().all(|t| t.id != 2));

        let rows = repo.all_rows().await;
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].status, RecordStatus::Deleted);
    }

    #[tokio::test]
    async fn update_overwrites_and_advances_updated_at() {
        let repo = InMemoryTodoRepository::new();
        let created = repo
            .create(TodoFields {
                title: "Buy milk".into(),
                description: Some("2%".into()),
                is_completed: false,
            })
            .await
            .unwrap();
        let updated = repo
            .update_active(
                created.id,
                TodoFields {
                    title: "Buy oat milk".into(),
                    description: None,
                    is_completed: true,
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "Buy oat milk");
        assert_eq!(updated.description, None);
        assert!(updated.is_completed);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at > created.updated_at);
    }

    #[test]
    fn next_timestamp_is_strictly_later() {
        let future = Utc::now() + Duration::hours(1);
        assert!(next_timestamp(future) > future);
    }
}
