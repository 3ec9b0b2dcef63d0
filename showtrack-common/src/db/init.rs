//! Database initialization
//!
//! Creates the database file on first run and brings the schema up to date.
//! Every statement is `CREATE ... IF NOT EXISTS`, so initialization is safe to
//! repeat against an existing database.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;

    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&pool)
        .await?;

    create_schema(&pool).await?;

    Ok(pool)
}

/// Open a private in-memory database with the full schema
///
/// A single connection is used: every new in-memory connection would
/// otherwise see its own empty database.
pub async fn init_memory_database() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;

    create_schema(&pool).await?;

    Ok(pool)
}

/// Create all tables and indexes (idempotent)
///
/// sqlx enables `foreign_keys` on every SQLite connection it opens, so the
/// REFERENCES clauses below are enforced.
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_shows_table(pool).await?;
    create_universes_table(pool).await?;
    create_episodes_table(pool).await?;

    // Linking tables
    create_show_universes_table(pool).await?;
    create_user_episode_status_table(pool).await?;
    create_user_show_tracking_table(pool).await?;

    Ok(())
}

async fn create_shows_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS shows (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT,
            poster_url TEXT,
            is_public INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_universes_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS universes (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT,
            is_public INTEGER NOT NULL DEFAULT 0,
            creator_id TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the episodes table
///
/// `air_date` is ISO `YYYY-MM-DD` text or NULL when the date is not yet announced.
async fn create_episodes_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS episodes (
            id TEXT PRIMARY KEY,
            show_id TEXT NOT NULL REFERENCES shows(id) ON DELETE CASCADE,
            title TEXT NOT NULL,
            season_number INTEGER NOT NULL DEFAULT 1,
            episode_number INTEGER NOT NULL,
            air_date TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_episodes_show ON episodes(show_id)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_show_universes_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS show_universes (
            show_id TEXT NOT NULL REFERENCES shows(id) ON DELETE CASCADE,
            universe_id TEXT NOT NULL REFERENCES universes(id) ON DELETE CASCADE,
            created_at TEXT NOT NULL,
            PRIMARY KEY (show_id, universe_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_show_universes_universe ON show_universes(universe_id)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the watched-marker table
///
/// At most one row per (user_id, episode_id); absence of a row means unwatched.
async fn create_user_episode_status_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_episode_status (
            user_id TEXT NOT NULL,
            episode_id TEXT NOT NULL REFERENCES episodes(id) ON DELETE CASCADE,
            status TEXT NOT NULL DEFAULT 'watched',
            watched_at TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            UNIQUE (user_id, episode_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_user_show_tracking_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_show_tracking (
            user_id TEXT NOT NULL,
            show_id TEXT NOT NULL REFERENCES shows(id) ON DELETE CASCADE,
            created_at TEXT NOT NULL,
            UNIQUE (user_id, show_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
