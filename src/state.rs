//! Shared application state for all routes.

use crate::repository::TodoRepository;
use crate::service::TodoService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub todos: TodoService,
    /// Pre-shared key every `/todos` request must present.
    pub api_key: Arc<str>,
}

impl AppState {
    pub fn new(repo: Arc<dyn TodoRepository>, api_key: impl Into<Arc<str>>) -> Self {
        AppState {
            todos: TodoService::new(repo),
            api_key: api_key.into(),
        }
    }
}
