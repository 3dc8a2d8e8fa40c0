use super::TodoRepository;
use crate::error::AppError;
use crate::model::{ActivePage, Todo, TodoFields};
use async_trait::async_trait;
use sqlx::PgPool;

const COLUMNS: &str = "id, title, description, is_completed, status, created_at, updated_at";

/// `updated_at` must move forward even when two writes land within the clock's resolution.
const BUMP_UPDATED_AT: &str =
    "updated_at = GREATEST(clock_timestamp(), updated_at + INTERVAL '1 microsecond')";

#[derive(Clone)]
pub struct PgTodoRepository {
    pool: PgPool,
}

impl PgTodoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn to_i64(n: u64, what: &str) -> Result<i64, AppError> {
    i64::try_from(n).map_err(|_| AppError::Validation(format!("{} out of range", what)))
}

fn active_total(count: i64) -> Result<u64, AppError> {
    u64::try_from(count).map_err(|_| AppError::Storage(format!("negative row count {}", count)))
}

#[async_trait]
impl TodoRepository for PgTodoRepository {
    async fn list_active(&self, offset: u64, limit: u32) -> Result<ActivePage, AppError> {
        let offset = to_i64(offset, "offset")?;
        let count_sql = "SELECT COUNT(*) FROM todos WHERE status = 'active'";
        let page_sql = format!(
            "SELECT {} FROM todos WHERE status = 'active' ORDER BY id DESC LIMIT $1 OFFSET $2",
            COLUMNS
        );

        // Count and slice from one snapshot so total and items agree.
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await?;
        tracing::debug!(sql = %count_sql, "query");
        let (total,): (i64,) = sqlx::query_as(count_sql).fetch_one(&mut *tx).await?;
        tracing::debug!(sql = %page_sql, limit, offset, "query");
        let items = sqlx::query_as::<_, Todo>(&page_sql)
            .bind(i64::from(limit))
            .bind(offset)
            .fetch_all(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(ActivePage {
            items,
            total: active_total(total)?,
        })
    }

    async fn get_active(&self, id: i64) -> Result<Option<Todo>, AppError> {
        let sql = format!("SELECT {} FROM todos WHERE id = $1 AND status = 'active'", COLUMNS);
        tracing::debug!(sql = %sql, id, "query");
        let row = sqlx::query_as::<_, Todo>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn create(&self, fields: TodoFields) -> Result<Todo, AppError> {
        // now() is fixed per transaction, so created_at and updated_at start equal.
        let sql = format!(
            "INSERT INTO todos (title, description, is_completed, status, created_at, updated_at) \
             VALUES ($1, $2, $3, 'active', now(), now()) RETURNING {}",
            COLUMNS
        );
        tracing::debug!(sql = %sql, "query");
        let todo = sqlx::query_as::<_, Todo>(&sql)
            .bind(&fields.title)
            .bind(&fields.description)
            .bind(fields.is_completed)
            .fetch_one(&self.pool)
            .await?;
        Ok(todo)
    }

    async fn update_active(&self, id: i64, fields: TodoFields) -> Result<Option<Todo>, AppError> {
        let sql = format!(
            "UPDATE todos SET title = $2, description = $3, is_completed = $4, {} \
             WHERE id = $1 AND status = 'active' RETURNING {}",
            BUMP_UPDATED_AT, COLUMNS
        );
        tracing::debug!(sql = %sql, id, "query");
        let row = sqlx::query_as::<_, Todo>(&sql)
            .bind(id)
            .bind(&fields.title)
            .bind(&fields.description)
            .bind(fields.is_completed)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn soft_delete(&self, id: i64) -> Result<bool, AppError> {
        let sql = format!(
            "UPDATE todos SET status = 'deleted', {} WHERE id = $1 AND status = 'active'",
            BUMP_UPDATED_AT
        );
        tracing::debug!(sql = %sql, id, "query");
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() == 1)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }
}
