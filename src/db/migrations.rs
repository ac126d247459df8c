use chrono::{DateTime, Utc};
use rusqlite::Connection;
use tracing::info;

use crate::error::AppResult;

const USER_VERSION: i32 = 1;

#[derive(Debug)]
pub struct MigrationInfo {
    pub version: i32,
    pub description: String,
    pub applied_at: DateTime<Utc>,
}

pub fn run(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS migration_history (
            version INTEGER PRIMARY KEY,
            description TEXT NOT NULL,
            applied_at TEXT NOT NULL
        );
        "#,
    )?;

    let mut current_version: i32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

    if current_version < 1 {
        info!(target: "app::db", version = current_version, "running migration v1");
        migrate_to_v1(conn)?;
        current_version = 1;
        conn.execute(&format!("PRAGMA user_version = {}", current_version), [])?;
        record_migration(conn, 1, "Add local state key/value store")?;
    }

    if current_version != USER_VERSION {
        conn.execute(&format!("PRAGMA user_version = {}", USER_VERSION), [])?;
    }

    Ok(())
}

fn record_migration(conn: &Connection, version: i32, description: &str) -> AppResult<()> {
    let now = Utc::now().to_rfc3339();
    conn.execute(
        "INSERT OR REPLACE INTO migration_history (version, description, applied_at) VALUES (?, ?, ?)",
        (version, description, now),
    )?;
    Ok(())
}

pub fn get_migration_history(conn: &Connection) -> AppResult<Vec<MigrationInfo>> {
    let mut stmt = conn.prepare(
        "SELECT version, description, applied_at FROM migration_history ORDER BY version",
    )?;

    let migration_iter = stmt.query_map([], |row| {
        let applied_at_str: String = row.get(2)?;
        let applied_at = DateTime::parse_from_rfc3339(&applied_at_str)
            .map_err(|_| {
                rusqlite::Error::InvalidColumnType(
                    2,
                    "applied_at".to_string(),
                    rusqlite::types::Type::Text,
                )
            })?
            .with_timezone(&Utc);

        Ok(MigrationInfo {
            version: row.get(0)?,
            description: row.get(1)?,
            applied_at,
        })
    })?;

    let mut migrations = Vec::new();
    for migration in migration_iter {
        migrations.push(migration?);
    }
    Ok(migrations)
}

fn migrate_to_v1(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS local_state (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        );
        CREATE INDEX IF NOT EXISTS idx_local_state_updated_at
            ON local_state(updated_at);
        "#,
    )?;
    Ok(())
}
