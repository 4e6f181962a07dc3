use std::time::Duration;

use rusqlite::types::Type;
use rusqlite::{params, Connection, DatabaseName, OptionalExtension, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::domain::{Collection, Project, ProjectDictionary, Record};

pub const CURRENT_SCHEMA_VERSION: i64 = 2;

struct Migration {
    version: i64,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: [Migration; 2] = [
    Migration {
        version: 1,
        name: "baseline_writing_schema_v1",
        sql: r#"
CREATE TABLE IF NOT EXISTS meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS projects (
    id TEXT PRIMARY KEY,
    project_id TEXT NOT NULL CHECK (project_id = id),
    record_json TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS chapters (
    id TEXT PRIMARY KEY,
    project_id TEXT NOT NULL REFERENCES projects(id),
    record_json TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS characters (
    id TEXT PRIMARY KEY,
    project_id TEXT NOT NULL REFERENCES projects(id),
    record_json TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS character_relationships (
    id TEXT PRIMARY KEY,
    project_id TEXT NOT NULL REFERENCES projects(id),
    record_json TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS locations (
    id TEXT PRIMARY KEY,
    project_id TEXT NOT NULL REFERENCES projects(id),
    record_json TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS timeline_events (
    id TEXT PRIMARY KEY,
    project_id TEXT NOT NULL REFERENCES projects(id),
    record_json TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS style_guide_entries (
    id TEXT PRIMARY KEY,
    project_id TEXT NOT NULL REFERENCES projects(id),
    record_json TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS worldbuilding_docs (
    id TEXT PRIMARY KEY,
    project_id TEXT NOT NULL REFERENCES projects(id),
    record_json TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS writing_sprints (
    id TEXT PRIMARY KEY,
    project_id TEXT NOT NULL REFERENCES projects(id),
    record_json TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS writing_sessions (
    id TEXT PRIMARY KEY,
    project_id TEXT NOT NULL REFERENCES projects(id),
    record_json TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS comments (
    id TEXT PRIMARY KEY,
    project_id TEXT NOT NULL REFERENCES projects(id),
    record_json TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS chapter_snapshots (
    id TEXT PRIMARY KEY,
    project_id TEXT NOT NULL REFERENCES projects(id),
    record_json TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS app_singletons (
    key TEXT PRIMARY KEY,
    record_json TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_chapters_project ON chapters(project_id);
CREATE INDEX IF NOT EXISTS idx_characters_project ON characters(project_id);
CREATE INDEX IF NOT EXISTS idx_character_relationships_project
    ON character_relationships(project_id);
CREATE INDEX IF NOT EXISTS idx_locations_project ON locations(project_id);
CREATE INDEX IF NOT EXISTS idx_timeline_events_project ON timeline_events(project_id);
CREATE INDEX IF NOT EXISTS idx_style_guide_entries_project ON style_guide_entries(project_id);
CREATE INDEX IF NOT EXISTS idx_worldbuilding_docs_project ON worldbuilding_docs(project_id);
CREATE INDEX IF NOT EXISTS idx_writing_sprints_project ON writing_sprints(project_id);
CREATE INDEX IF NOT EXISTS idx_writing_sessions_project ON writing_sessions(project_id);
CREATE INDEX IF NOT EXISTS idx_comments_project ON comments(project_id);
CREATE INDEX IF NOT EXISTS idx_chapter_snapshots_project ON chapter_snapshots(project_id);
"#,
    },
    Migration {
        version: 2,
        name: "outline_grid_playlist_dictionary_v2",
        sql: r#"
CREATE TABLE IF NOT EXISTS outline_grid_columns (
    id TEXT PRIMARY KEY,
    project_id TEXT NOT NULL REFERENCES projects(id),
    record_json TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS outline_grid_rows (
    id TEXT PRIMARY KEY,
    project_id TEXT NOT NULL REFERENCES projects(id),
    record_json TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS outline_grid_cells (
    id TEXT PRIMARY KEY,
    project_id TEXT NOT NULL REFERENCES projects(id),
    record_json TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS playlist_tracks (
    id TEXT PRIMARY KEY,
    project_id TEXT NOT NULL REFERENCES projects(id),
    record_json TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS project_dictionaries (
    id TEXT PRIMARY KEY,
    project_id TEXT NOT NULL UNIQUE REFERENCES projects(id),
    record_json TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_outline_grid_columns_project ON outline_grid_columns(project_id);
CREATE INDEX IF NOT EXISTS idx_outline_grid_rows_project ON outline_grid_rows(project_id);
CREATE INDEX IF NOT EXISTS idx_outline_grid_cells_project ON outline_grid_cells(project_id);
CREATE INDEX IF NOT EXISTS idx_playlist_tracks_project ON playlist_tracks(project_id);
"#,
    },
];

pub fn open_connection(path: &str) -> Result<Connection> {
    let mut conn = Connection::open(path)?;
    configure_for_speed(&conn)?;
    apply_migrations(&mut conn)?;
    Ok(conn)
}

fn configure_for_speed(conn: &Connection) -> Result<()> {
    conn.pragma_update(None::<DatabaseName>, "journal_mode", "WAL")?;
    conn.pragma_update(None::<DatabaseName>, "synchronous", "NORMAL")?;
    conn.pragma_update(None::<DatabaseName>, "foreign_keys", "ON")?;
    conn.pragma_update(None::<DatabaseName>, "temp_store", "MEMORY")?;
    conn.pragma_update(None::<DatabaseName>, "busy_timeout", 5000i64)?;
    conn.busy_timeout(Duration::from_millis(5000))?;
    Ok(())
}

fn apply_migrations(conn: &mut Connection) -> Result<()> {
    let tx = conn.transaction()?;
    tx.execute_batch(
        r#"
CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    applied_at TEXT NOT NULL
);
"#,
    )?;

    for migration in MIGRATIONS {
        let already_applied: Option<i64> = tx
            .query_row(
                "SELECT version FROM schema_migrations WHERE version = ?1",
                params![migration.version],
                |row| row.get(0),
            )
            .optional()?;

        if already_applied.is_some() {
            continue;
        }

        tracing::debug!(
            version = migration.version,
            name = migration.name,
            "applying migration"
        );
        tx.execute_batch(migration.sql)?;
        tx.execute(
            "INSERT INTO schema_migrations (version, name, applied_at) VALUES (?1, ?2, ?3)",
            params![migration.version, migration.name, now_utc_rfc3339()?],
        )?;
    }

    tx.execute(
        r#"
INSERT INTO meta (key, value)
VALUES ('schema_version', ?1)
ON CONFLICT(key) DO UPDATE SET value = excluded.value
"#,
        params![CURRENT_SCHEMA_VERSION.to_string()],
    )?;

    tx.commit()
}

pub fn now_utc_rfc3339() -> Result<String> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|err| rusqlite::Error::ToSqlConversionFailure(Box::new(err)))
}

fn encode_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|err| rusqlite::Error::ToSqlConversionFailure(Box::new(err)))
}

fn decode_json<T: DeserializeOwned>(column: usize, raw: &str) -> Result<T> {
    serde_json::from_str(raw)
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(err)))
}

/// Plain insert: an id already present in the table is a constraint error.
pub fn insert_record<T: Record>(conn: &Connection, record: &T) -> Result<()> {
    let sql = format!(
        "INSERT INTO {} (id, project_id, record_json) VALUES (?1, ?2, ?3)",
        T::COLLECTION.table()
    );
    conn.execute(
        &sql,
        params![record.id(), record.project_id(), encode_json(record)?],
    )?;
    Ok(())
}

pub fn insert_records<T: Record>(conn: &Connection, records: &[T]) -> Result<()> {
    for record in records {
        insert_record(conn, record)?;
    }
    Ok(())
}

pub fn get_record<T: Record>(conn: &Connection, id: &str) -> Result<Option<T>> {
    let sql = format!(
        "SELECT record_json FROM {} WHERE id = ?1",
        T::COLLECTION.table()
    );
    let raw: Option<String> = conn
        .query_row(&sql, params![id], |row| row.get(0))
        .optional()?;
    raw.map(|value| decode_json(0, &value)).transpose()
}

/// Rows of one collection scoped to a project, in insertion order.
pub fn list_records<T: Record>(conn: &Connection, project_id: &str) -> Result<Vec<T>> {
    let sql = format!(
        "SELECT record_json FROM {} WHERE project_id = ?1 ORDER BY rowid ASC",
        T::COLLECTION.table()
    );
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(params![project_id])?;
    let mut result = Vec::new();
    while let Some(row) = rows.next()? {
        let raw: String = row.get(0)?;
        result.push(decode_json(0, &raw)?);
    }
    Ok(result)
}

pub fn count_project_rows(conn: &Connection, collection: Collection, project_id: &str) -> Result<u64> {
    let sql = format!(
        "SELECT COUNT(*) FROM {} WHERE project_id = ?1",
        collection.table()
    );
    let count: i64 = conn.query_row(&sql, params![project_id], |row| row.get(0))?;
    Ok(count as u64)
}

pub fn delete_project_rows(
    conn: &Connection,
    collection: Collection,
    project_id: &str,
) -> Result<usize> {
    let sql = format!("DELETE FROM {} WHERE project_id = ?1", collection.table());
    conn.execute(&sql, params![project_id])
}

pub fn get_project(conn: &Connection, id: &str) -> Result<Option<Project>> {
    get_record(conn, id)
}

pub fn list_projects(conn: &Connection) -> Result<Vec<Project>> {
    let mut stmt = conn.prepare(
        r#"
SELECT record_json
FROM projects
ORDER BY json_extract(record_json, '$.updatedAt') DESC, id ASC
"#,
    )?;
    let mut rows = stmt.query([])?;
    let mut result = Vec::new();
    while let Some(row) = rows.next()? {
        let raw: String = row.get(0)?;
        result.push(decode_json(0, &raw)?);
    }
    Ok(result)
}

pub fn get_project_dictionary(
    conn: &Connection,
    project_id: &str,
) -> Result<Option<ProjectDictionary>> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT record_json FROM project_dictionaries WHERE project_id = ?1 LIMIT 1",
            params![project_id],
            |row| row.get(0),
        )
        .optional()?;
    raw.map(|value| decode_json(0, &value)).transpose()
}

pub fn get_singleton<T: DeserializeOwned>(conn: &Connection, key: &str) -> Result<Option<T>> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT record_json FROM app_singletons WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()?;
    raw.map(|value| decode_json(0, &value)).transpose()
}

pub fn put_singleton<T: Serialize>(conn: &Connection, key: &str, value: &T) -> Result<()> {
    conn.execute(
        r#"
INSERT INTO app_singletons (key, record_json)
VALUES (?1, ?2)
ON CONFLICT(key) DO UPDATE SET record_json = excluded.record_json
"#,
        params![key, encode_json(value)?],
    )?;
    Ok(())
}

pub fn get_meta(conn: &Connection, key: &str) -> Result<Option<String>> {
    conn.query_row(
        "SELECT value FROM meta WHERE key = ?1",
        params![key],
        |row| row.get(0),
    )
    .optional()
}
