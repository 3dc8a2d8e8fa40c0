//! Todo server: reads settings from the environment (and `.env`), prepares storage, serves the API.
//!
//! `todo-server migrate-down` reverts the newest migration and exits.

use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use todo_service::{
    api_router, apply_migrations, ensure_database_exists, revert_last_migration,
    telemetry::init_tracing, AppState, InMemoryTodoRepository, PgTodoRepository, Settings,
    StorageBackend, TodoRepository,
};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    init_tracing();

    let settings = Settings::from_env()?;
    let command = std::env::args().nth(1);

    let repo: Arc<dyn TodoRepository> = match settings.storage {
        StorageBackend::Memory => {
            tracing::warn!("using in-memory storage; data is lost on restart");
            Arc::new(InMemoryTodoRepository::new())
        }
        StorageBackend::Postgres => {
            let database_url = settings
                .database_url
                .as_deref()
                .ok_or("DATABASE_URL is required for postgres storage")?;
            if settings.create_database {
                ensure_database_exists(database_url).await?;
            }
            let pool = PgPoolOptions::new()
                .max_connections(settings.max_connections)
                .connect(database_url)
                .await?;

            if command.as_deref() == Some("migrate-down") {
                match revert_last_migration(&pool).await? {
                    Some(v) => tracing::info!(version = v, "reverted"),
                    None => tracing::info!("no migrations to revert"),
                }
                return Ok(());
            }
            if settings.run_migrations {
                let applied = apply_migrations(&pool).await?;
                tracing::info!(count = applied.len(), "migrations up to date");
            }
            Arc::new(PgTodoRepository::new(pool))
        }
    };

    let state = AppState::new(repo, settings.api_key.as_str());
    let app = api_router(state, settings.body_limit);

    let listener = TcpListener::bind(settings.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}
