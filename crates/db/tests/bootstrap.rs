use sqlx::SqlitePool;

/// Full bootstrap test: connect, migrate, verify schema.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_full_bootstrap(pool: SqlitePool) {
    ironquest_db::health_check(&pool).await.unwrap();

    let tables = [
        "users",
        "character_stats",
        "workout_sessions",
        "quests",
        "quest_completions",
    ];

    for table in tables {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert_eq!(count.0, 0, "{table} should start empty");
    }
}

/// An in-memory pool keeps its schema across queries.
#[tokio::test]
async fn test_in_memory_pool_survives_migrations() {
    let pool = ironquest_db::create_pool("sqlite::memory:").await.unwrap();
    ironquest_db::run_migrations(&pool).await.unwrap();

    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count.0, 0);
}
