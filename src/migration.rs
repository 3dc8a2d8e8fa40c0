//! Versioned schema migrations. Each version runs inside a transaction and is
//! recorded in `_schema_migrations`; versions already recorded are skipped.

use crate::error::AppError;
use sqlx::postgres::PgConnectOptions;
use sqlx::{ConnectOptions, PgPool};
use std::str::FromStr;

const HISTORY_TABLE: &str = "_schema_migrations";

pub struct Migration {
    pub version: i64,
    pub name: &'static str,
    pub up: &'static [&'static str],
    pub down: &'static [&'static str],
}

pub const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "create_todos",
    up: &[
        "CREATE TYPE todo_status AS ENUM ('active', 'deleted')",
        r#"
        CREATE TABLE todos (
            id BIGSERIAL PRIMARY KEY,
            title VARCHAR(100) NOT NULL,
            description VARCHAR(255),
            is_completed BOOLEAN NOT NULL DEFAULT FALSE,
            status todo_status NOT NULL DEFAULT 'active',
            created_at TIMESTAMPTZ(6) NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ(6) NOT NULL DEFAULT now()
        )
        "#,
        "CREATE INDEX ix_todos_id ON todos (id)",
        "CREATE INDEX ix_todos_active_id ON todos (id DESC) WHERE status = 'active'",
    ],
    down: &[
        "DROP INDEX IF EXISTS ix_todos_active_id",
        "DROP INDEX IF EXISTS ix_todos_id",
        "DROP TABLE IF EXISTS todos",
        "DROP TYPE IF EXISTS todo_status",
    ],
}];

async fn ensure_history_table(pool: &PgPool) -> Result<(), AppError> {
    let ddl = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            version BIGINT PRIMARY KEY,
            name TEXT NOT NULL,
            applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
        HISTORY_TABLE
    );
    sqlx::query(&ddl).execute(pool).await?;
    Ok(())
}

pub async fn applied_versions(pool: &PgPool) -> Result<Vec<i64>, AppError> {
    ensure_history_table(pool).await?;
    let rows: Vec<(i64,)> = sqlx::query_as(&format!(
        "SELECT version FROM {} ORDER BY version",
        HISTORY_TABLE
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(|(v,)| v).collect())
}

/// Apply every pending migration in version order. Returns the versions applied by this call.
pub async fn apply_migrations(pool: &PgPool) -> Result<Vec<i64>, AppError> {
    let done = applied_versions(pool).await?;
    let mut applied = Vec::new();
    for m in MIGRATIONS.iter().filter(|m| !done.contains(&m.version)) {
        let mut tx = pool.begin().await?;
        for stmt in m.up {
            tracing::debug!(sql = %stmt, version = m.version, "migrate up");
            sqlx::query(stmt).execute(&mut *tx).await?;
        }
        sqlx::query(&format!(
            "INSERT INTO {} (version, name) VALUES ($1, $2)",
            HISTORY_TABLE
        ))
        .bind(m.version)
        .bind(m.name)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        tracing::info!(version = m.version, name = m.name, "migration applied");
        applied.push(m.version);
    }
    Ok(applied)
}

/// Undo the newest applied migration. Returns its version, or `None` when nothing is applied.
pub async fn revert_last_migration(pool: &PgPool) -> Result<Option<i64>, AppError> {
    let Some(&version) = applied_versions(pool).await?.last() else {
        return Ok(None);
    };
    let m = MIGRATIONS
        .iter()
        .find(|m| m.version == version)
        .ok_or_else(|| AppError::Storage(format!("unknown migration version {}", version)))?;
    let mut tx = pool.begin().await?;
    for stmt in m.down {
        tracing::debug!(sql = %stmt, version, "migrate down");
        sqlx::query(stmt).execute(&mut *tx).await?;
    }
    sqlx::query(&format!("DELETE FROM {} WHERE version = $1", HISTORY_TABLE))
        .bind(version)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    tracing::info!(version, name = m.name, "migration reverted");
    Ok(Some(version))
}

/// Connect to the `postgres` maintenance database on the same server and create the
/// target database if it does not exist.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let Some((admin, db_name)) = admin_options(database_url)? else {
        return Ok(());
    };
    let mut conn: sqlx::PgConnection = admin.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
        tracing::info!(database = %db_name, "database created");
    }
    Ok(())
}

/// Options for the `postgres` database on the server `database_url` points at, plus the
/// target database name. `None` when the URL names no database or names `postgres` itself.
fn admin_options(database_url: &str) -> Result<Option<(PgConnectOptions, String)>, AppError> {
    let opts = PgConnectOptions::from_str(database_url)
        .map_err(|e| AppError::BadRequest(format!("invalid DATABASE_URL: {}", e)))?;
    let db_name = match opts.get_database() {
        Some(name) if !name.is_empty() && name != "postgres" => name.to_string(),
        _ => return Ok(None),
    };
    Ok(Some((opts.database("postgres"), db_name)))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
