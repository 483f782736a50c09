//! Embedded database migrations for `SQLite`.
//!
//! # Example
//!
//! ```rust,no_run
//! use forum_auth::sqlite::migrations;
//! use sqlx::SqlitePool;
//!
//! async fn setup_database(pool: &SqlitePool) -> Result<(), sqlx::Error> {
//!     migrations::run(pool).await?;
//!     Ok(())
//! }
//! ```

use sqlx::{Executor, SqlitePool};

const CORE_MIGRATIONS: &[(&str, &str)] = &[
    (
        "20250301000001_create_users_table",
        include_str!("../../migrations_sqlite/core/20250301000001_create_users_table.sql"),
    ),
    (
        "20250301000002_create_sessions_table",
        include_str!("../../migrations_sqlite/core/20250301000002_create_sessions_table.sql"),
    ),
];

/// Runs every migration not yet recorded in `_forum_migrations`.
///
/// Safe to call on every startup.
pub async fn run(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    pool.execute(
        r"
        CREATE TABLE IF NOT EXISTS _forum_migrations (
            name TEXT PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        )
        ",
    )
    .await?;

    run_migrations(pool, CORE_MIGRATIONS).await
}

/// Applies each pending migration inside its own transaction.
///
/// Statements are split on `;`, so migration files must not contain
/// semicolons inside string literals.
async fn run_migrations(pool: &SqlitePool, migrations: &[(&str, &str)]) -> Result<(), sqlx::Error> {
    for (name, sql) in migrations {
        let applied: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM _forum_migrations WHERE name = ?)")
                .bind(*name)
                .fetch_one(pool)
                .await?;

        if applied {
            continue;
        }

        let mut tx = pool.begin().await?;
        for statement in sql.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            sqlx::query(statement).execute(&mut *tx).await?;
        }
        sqlx::query("INSERT INTO _forum_migrations (name) VALUES (?)")
            .bind(*name)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        log::info!(target: "forum_auth", "msg=\"migration applied\", name=\"{name}\"");
    }

    Ok(())
}
