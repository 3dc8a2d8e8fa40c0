//! Todo operations over an injected repository.

use crate::error::AppError;
use crate::model::{TodoFields, TodoView};
use crate::pagination::{PageRequest, Pagination};
use crate::repository::TodoRepository;
use crate::service::RequestValidator;
use serde::Serialize;
use std::sync::Arc;

/// List payload: the pagination summary plus the page slice.
#[derive(Serialize, Debug)]
pub struct TodoListResponse {
    pub pagination: Pagination,
    pub todos: Vec<TodoView>,
}

#[derive(Clone)]
pub struct TodoService {
    repo: Arc<dyn TodoRepository>,
}

impl TodoService {
    pub fn new(repo: Arc<dyn TodoRepository>) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &Arc<dyn TodoRepository> {
        &self.repo
    }

    /// One page of active todos, newest id first. `base_path` feeds the navigation URLs.
    pub async fn list(&self, request: PageRequest, base_path: &str) -> Result<TodoListResponse, AppError> {
        let page = self.repo.list_active(request.offset(), request.limit).await?;
        Ok(TodoListResponse {
            pagination: Pagination::new(request, page.total, base_path),
            todos: page.items.into_iter().map(TodoView::from).collect(),
        })
    }

    pub async fn get(&self, id: i64) -> Result<TodoView, AppError> {
        self.repo
            .get_active(id)
            .await?
            .map(TodoView::from)
            .ok_or_else(AppError::todo_not_found)
    }

    pub async fn create(&self, fields: TodoFields) -> Result<TodoView, AppError> {
        RequestValidator::validate(&fields)?;
        let todo = self.repo.create(fields).await?;
        tracing::info!(id = todo.id, "todo created");
        Ok(todo.into())
    }

    /// Full replace of title, description and completion flag.
    pub async fn update(&self, id: i64, fields: TodoFields) -> Result<TodoView, AppError> {
        RequestValidator::validate(&fields)?;
        let todo = self
            .repo
            .update_active(id, fields)
            .await?
            .ok_or_else(AppError::todo_not_found)?;
        tracing::info!(id, "todo updated");
        Ok(todo.into())
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        if !self.repo.soft_delete(id).await? {
            return Err(AppError::todo_not_found());
        }
        tracing::info!(id, "todo deleted");
        Ok(())
    }
}
