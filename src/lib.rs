//! Todo service: paginated, soft-deleting CRUD over PostgreSQL behind an API key.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod migration;
pub mod model;
pub mod pagination;
pub mod repository;
pub mod response;
pub mod routes;
pub mod service;
pub mod state;
pub mod telemetry;

pub use config::{Settings, StorageBackend};
pub use error::{AppError, ConfigError};
pub use migration::{apply_migrations, ensure_database_exists, revert_last_migration};
pub use model::{Todo, TodoView};
pub use pagination::{PageRequest, Pagination};
pub use repository::{InMemoryTodoRepository, PgTodoRepository, TodoRepository};
pub use routes::{api_router, common_routes_with_ready, todo_routes, API_PREFIX};
pub use service::TodoService;
pub use state::AppState;
