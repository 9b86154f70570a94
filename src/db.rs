use std::str::FromStr;

use sqlx::{
    migrate::Migrator,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    SqlitePool,
};

pub mod links;
pub mod users;

pub use links::{LinkRepository, SqliteLinkRepository};
pub use users::{SqliteUserRepository, UserRepository};

/// Open a SQLite connection pool, creating the database file if needed.
pub async fn connect(database_url: &str) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Single-connection in-memory database, used by tests and local tooling.
///
/// Every SQLite `:memory:` connection is its own database, so the pool is
/// pinned to one connection that is never recycled.
pub async fn connect_in_memory() -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Apply the `links` / `link_views` schema.
pub async fn migrate_links(pool: &SqlitePool) -> anyhow::Result<()> {
    run(sqlx::migrate!("./migrations/links"), pool).await?;
    tracing::info!("Link migrations applied");
    Ok(())
}

/// Apply the `users` schema.
pub async fn migrate_users(pool: &SqlitePool) -> anyhow::Result<()> {
    run(sqlx::migrate!("./migrations/users"), pool).await?;
    tracing::info!("User migrations applied");
    Ok(())
}

// Both services may point at the same database file, so each migrator has to
// tolerate versions it did not ship.
async fn run(mut migrator: Migrator, pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    migrator.set_ignore_missing(true);
    migrator.run(pool).await
}
