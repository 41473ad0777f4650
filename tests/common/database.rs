//! Database test fixtures and utilities
//!
//! PostgreSQL tests run only when `DATABASE_URL` points at a disposable
//! database. Without it [`TestDatabase::from_env`] returns `None` and the
//! caller skips.

use sqlx::PgPool;

/// Run database migrations for testing
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Remove every itinerary row while keeping the schema
pub async fn cleanup_test_data(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("TRUNCATE TABLE day_places, day_schedules, places, plan_participants, plans CASCADE")
        .execute(pool)
        .await?;
    Ok(())
}

/// Test database fixture
pub struct TestDatabase {
    pool: PgPool,
}

impl TestDatabase {
    /// Connect, migrate and clean, or `None` when no database is configured
    pub async fn from_env() -> Option<Self> {
        let database_url = std::env::var("DATABASE_URL").ok()?;
        let pool = PgPool::connect(&database_url)
            .await
            .expect("Failed to create test database pool");
        run_migrations(&pool).await.expect("Failed to run migrations");
        cleanup_test_data(&pool).await.expect("Failed to clean test data");
        Some(Self { pool })
    }

    /// Get the database pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
