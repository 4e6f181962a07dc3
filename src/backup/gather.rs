use rusqlite::{Connection, Result};

use crate::db;
use crate::domain::{Collection, ProjectGraph};

/// Reads every row scoped to `project_id` into one graph. `None` when the
/// project does not exist. Callers that need a consistent snapshot wrap this
/// in a read transaction.
pub fn gather_project(conn: &Connection, project_id: &str) -> Result<Option<ProjectGraph>> {
    let Some(project) = db::get_project(conn, project_id)? else {
        return Ok(None);
    };

    let graph = ProjectGraph {
        project,
        chapters: db::list_records(conn, project_id)?,
        characters: db::list_records(conn, project_id)?,
        relationships: db::list_records(conn, project_id)?,
        locations: db::list_records(conn, project_id)?,
        timeline_events: db::list_records(conn, project_id)?,
        style_guide_entries: db::list_records(conn, project_id)?,
        worldbuilding_docs: db::list_records(conn, project_id)?,
        outline_grid_columns: db::list_records(conn, project_id)?,
        outline_grid_rows: db::list_records(conn, project_id)?,
        outline_grid_cells: db::list_records(conn, project_id)?,
        writing_sprints: db::list_records(conn, project_id)?,
        writing_sessions: db::list_records(conn, project_id)?,
        playlist_tracks: db::list_records(conn, project_id)?,
        comments: db::list_records(conn, project_id)?,
        chapter_snapshots: db::list_records(conn, project_id)?,
        project_dictionary: db::get_project_dictionary(conn, project_id)?,
    };

    tracing::debug!(
        project_id,
        collections = Collection::DEPENDENT.len(),
        records = graph.record_count(),
        "gathered project graph"
    );
    Ok(Some(graph))
}

/// Gathers every local project, most recently updated first.
pub fn gather_all(conn: &Connection) -> Result<Vec<ProjectGraph>> {
    let mut graphs = Vec::new();
    for project in db::list_projects(conn)? {
        if let Some(graph) = gather_project(conn, &project.id)? {
            graphs.push(graph);
        }
    }
    Ok(graphs)
}
