use sqlx::{postgres::PgPoolOptions, PgPool};
use todo_service::{
    apply_migrations,
    migration::applied_versions,
    revert_last_migration,
    model::{RecordStatus, TodoFields},
    PgTodoRepository, TodoRepository,
};

async fn maybe_pool() -> Option<PgPool> {
    let database_url = std::env::var("TEST_DATABASE_URL").ok()?;
    PgPoolOptions::new()
        .max_connections(2)
        .connect(&database_url)
        .await
        .ok()
}

fn fields(title: &str, description: Option<&str>, is_completed: bool) -> TodoFields {
    TodoFields {
        title: title.into(),
        description: description.map(Into::into),
        is_completed,
    }
}

#[tokio::test]
async fn postgres_repository_soft_delete_flow() {
    let Some(pool) = maybe_pool().await else {
        eprintln!("Skipping postgres_repository_soft_delete_flow: TEST_DATABASE_URL is not set or unreachable.");
        return;
    };

    apply_migrations(&pool).await.expect("migrations should run");
    // Second run is a no-op.
    assert!(apply_migrations(&pool).await.expect("rerun").is_empty());
    sqlx::query("TRUNCATE TABLE todos RESTART IDENTITY")
        .execute(&pool)
        .await
        .expect("truncate should succeed");

    let repo = PgTodoRepository::new(pool.clone());

    let created = repo
        .create(fields("Buy milk", Some("2%"), false))
        .await
        .expect("create should succeed");
    assert_eq!(created.id, 1);
    assert_eq!(created.status, RecordStatus::Active);
    assert_eq!(created.created_at, created.updated_at);

    for i in 2..=12 {
        repo.create(fields(&format!("todo {}", i), None, false))
            .await
            .expect("create should succeed");
    }

    let first = repo.list_active(0, 10).await.expect("list");
    assert_eq!(first.total, 12);
    assert_eq!(first.items.len(), 10);
    assert_eq!(first.items[0].id, 12);
    let second = repo.list_active(10, 10).await.expect("list");
    assert_eq!(second.items.iter().map(|t| t.id).collect::<Vec<_>>(), vec![2, 1]);

    let updated = repo
        .update_active(1, fields("Buy oat milk", None, true))
        .await
        .expect("update")
        .expect("row should exist");
    assert_eq!(updated.description, None);
    assert!(updated.is_completed);
    assert!(updated.updated_at > created.updated_at);
    assert_eq!(updated.created_at, created.created_at);

    assert!(repo.soft_delete(1).await.expect("delete"));
    assert!(!repo.soft_delete(1).await.expect("second delete"));
    assert!(repo.get_active(1).await.expect("get").is_none());
    assert!(repo.update_active(1, fields("x", None, false)).await.expect("update").is_none());
    assert_eq!(repo.list_active(0, 100).await.expect("list").total, 11);

    let (kept,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM todos WHERE id = 1")
        .fetch_one(&pool)
        .await
        .expect("count");
    assert_eq!(kept, 1);

    // Down then up again leaves the schema as a fresh install.
    assert_eq!(revert_last_migration(&pool).await.expect("revert"), Some(1));
    let (table,): (Option<String>,) = sqlx::query_as("SELECT to_regclass('todos')::text")
        .fetch_one(&pool)
        .await
        .expect("regclass");
    assert!(table.is_none());
    assert!(applied_versions(&pool).await.expect("history").is_empty());
    assert_eq!(revert_last_migration(&pool).await.expect("revert empty"), None);

    assert_eq!(apply_migrations(&pool).await.expect("reapply"), vec![1]);
    assert_eq!(applied_versions(&pool).await.expect("history"), vec![1]);
    let (rows,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM todos AS fresh")
        .fetch_one(&pool)
        .await
        .expect("count after reapply");
    assert_eq!(rows, 0);
}
