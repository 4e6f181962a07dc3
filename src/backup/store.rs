use rusqlite::{Connection, Result};

use crate::db;
use crate::domain::{Collection, ProjectGraph, APP_DICTIONARY_KEY, APP_SETTINGS_KEY};

use super::schema::FullBackup;

/// Inserts a graph verbatim, project row first.
pub fn insert_graph(conn: &Connection, graph: &ProjectGraph) -> Result<()> {
    db::insert_record(conn, &graph.project)?;
    db::insert_records(conn, &graph.chapters)?;
    db::insert_records(conn, &graph.characters)?;
    db::insert_records(conn, &graph.relationships)?;
    db::insert_records(conn, &graph.locations)?;
    db::insert_records(conn, &graph.timeline_events)?;
    db::insert_records(conn, &graph.style_guide_entries)?;
    db::insert_records(conn, &graph.worldbuilding_docs)?;
    db::insert_records(conn, &graph.outline_grid_columns)?;
    db::insert_records(conn, &graph.outline_grid_rows)?;
    db::insert_records(conn, &graph.outline_grid_cells)?;
    db::insert_records(conn, &graph.writing_sprints)?;
    db::insert_records(conn, &graph.writing_sessions)?;
    db::insert_records(conn, &graph.playlist_tracks)?;
    db::insert_records(conn, &graph.comments)?;
    db::insert_records(conn, &graph.chapter_snapshots)?;
    if let Some(dictionary) = &graph.project_dictionary {
        db::insert_record(conn, dictionary)?;
    }
    Ok(())
}

/// Deletes every row scoped to `project_id`, children first, then the
/// project row itself. Returns the number of rows removed.
pub fn purge_project(conn: &Connection, project_id: &str) -> Result<usize> {
    let mut removed = 0;
    for collection in Collection::DEPENDENT.iter().rev() {
        removed += db::delete_project_rows(conn, *collection, project_id)?;
    }
    removed += db::delete_project_rows(conn, Collection::Projects, project_id)?;
    Ok(removed)
}

/// Overwrites the singleton rows carried by a full backup. Returns whether
/// anything was written.
pub fn restore_singletons(conn: &Connection, backup: &FullBackup) -> Result<bool> {
    let mut restored = false;
    if let Some(settings) = &backup.app_settings {
        db::put_singleton(conn, APP_SETTINGS_KEY, settings)?;
        restored = true;
    }
    if let Some(dictionary) = &backup.app_dictionary {
        db::put_singleton(conn, APP_DICTIONARY_KEY, dictionary)?;
        restored = true;
    }
    Ok(restored)
}
