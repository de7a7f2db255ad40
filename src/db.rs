//! Database connection pool and migration management.

use sqlx::{Pool, Postgres};

/// Type alias for the PostgreSQL connection pool shared by all requests.
pub type DbPool = Pool<Postgres>;

/// Create a new PostgreSQL connection pool.
///
/// The pool is shared across every concurrent request; contention on account
/// rows is resolved by the store's transaction isolation, not by handing any
/// request an exclusive connection.
///
/// # Errors
///
/// Returns an error if the connection string is invalid or the server cannot
/// be reached.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
}

/// Run database migrations from the `migrations/` directory.
///
/// The macro embeds the migration files at compile time; applied migrations
/// are tracked in `_sqlx_migrations`, so each runs only once.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
