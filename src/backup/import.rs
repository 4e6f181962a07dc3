use std::fmt;
use std::str::FromStr;

use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db;
use crate::domain::ProjectGraph;

use super::errors::BackupError;
use super::remap::{new_record_id, remap_graph};
use super::schema::ParsedBackup;
use super::store::{insert_graph, purge_project, restore_singletons};

/// What to do when an imported project id already exists locally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictResolution {
    #[default]
    Skip,
    Replace,
    Duplicate,
}

impl ConflictResolution {
    pub fn as_str(self) -> &'static str {
        match self {
            ConflictResolution::Skip => "skip",
            ConflictResolution::Replace => "replace",
            ConflictResolution::Duplicate => "duplicate",
        }
    }
}

impl fmt::Display for ConflictResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown conflict resolution '{0}', expected skip, replace or duplicate")]
pub struct ParseConflictResolutionError(pub String);

impl FromStr for ConflictResolution {
    type Err = ParseConflictResolutionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(ConflictResolution::Skip),
            "replace" => Ok(ConflictResolution::Replace),
            "duplicate" => Ok(ConflictResolution::Duplicate),
            _ => Err(ParseConflictResolutionError(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportOptions {
    pub conflict_resolution: ConflictResolution,
    pub restore_settings: bool,
}

/// Outcome of one `import_backup` call. Counters reflect the work done
/// before any failure; a failed import has rolled back all of it.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    pub success: bool,
    pub projects_imported: u64,
    pub projects_skipped: u64,
    pub projects_replaced: u64,
    pub settings_restored: bool,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Imported,
    Skipped,
    Replaced,
    Duplicated,
}

/// Imports every project of `backup` in one transaction. Never fails: errors
/// are reported in the result and leave the store untouched.
pub fn import_backup(
    conn: &Connection,
    backup: &ParsedBackup,
    options: &ImportOptions,
) -> ImportResult {
    import_backup_with_ids(conn, backup, options, new_record_id)
}

/// `import_backup` with an explicit identifier source for duplicated graphs.
pub fn import_backup_with_ids<F>(
    conn: &Connection,
    backup: &ParsedBackup,
    options: &ImportOptions,
    mut new_id: F,
) -> ImportResult
where
    F: FnMut() -> String,
{
    let mut result = ImportResult::default();
    match run_import(conn, backup, options, &mut new_id, &mut result) {
        Ok(()) => {
            result.success = true;
            tracing::info!(
                kind = backup.kind().as_str(),
                resolution = %options.conflict_resolution,
                imported = result.projects_imported,
                skipped = result.projects_skipped,
                replaced = result.projects_replaced,
                settings_restored = result.settings_restored,
                "backup imported"
            );
        }
        Err(err) => {
            if result.errors.is_empty() {
                result.errors.push(format!("Import failed: {err}"));
            }
            tracing::warn!(%err, "backup import rolled back");
        }
    }
    result
}

fn run_import<F>(
    conn: &Connection,
    backup: &ParsedBackup,
    options: &ImportOptions,
    new_id: &mut F,
    result: &mut ImportResult,
) -> Result<(), BackupError>
where
    F: FnMut() -> String,
{
    let tx = conn.unchecked_transaction()?;

    for graph in backup.graphs() {
        let outcome = import_graph(&tx, graph, options.conflict_resolution, new_id)
            .inspect_err(|err| {
                result.errors.push(format!(
                    "Failed to import project \"{}\" ({}): {err}",
                    graph.project.title, graph.project.id
                ));
            })?;
        match outcome {
            Outcome::Imported | Outcome::Duplicated => result.projects_imported += 1,
            Outcome::Skipped => result.projects_skipped += 1,
            Outcome::Replaced => {
                result.projects_imported += 1;
                result.projects_replaced += 1;
            }
        }
    }

    if options.restore_settings {
        if let ParsedBackup::Full(full) = backup {
            let restored = restore_singletons(&tx, full).inspect_err(|err| {
                result.errors.push(format!("Failed to restore settings: {err}"));
            })?;
            result.settings_restored = restored;
        }
    }

    tx.commit()?;
    Ok(())
}

fn import_graph<F>(
    conn: &Connection,
    graph: &ProjectGraph,
    resolution: ConflictResolution,
    new_id: &mut F,
) -> Result<Outcome, BackupError>
where
    F: FnMut() -> String,
{
    let project_id = graph.project.id.as_str();
    if db::get_project(conn, project_id)?.is_none() {
        insert_graph(conn, graph)?;
        tracing::debug!(project_id, "imported new project");
        return Ok(Outcome::Imported);
    }

    match resolution {
        ConflictResolution::Skip => {
            tracing::debug!(project_id, "project exists, skipping");
            Ok(Outcome::Skipped)
        }
        ConflictResolution::Replace => {
            let removed = purge_project(conn, project_id)?;
            insert_graph(conn, graph)?;
            tracing::debug!(project_id, removed, "replaced existing project");
            Ok(Outcome::Replaced)
        }
        ConflictResolution::Duplicate => {
            let copy = remap_graph(graph, &mut *new_id)?;
            insert_graph(conn, &copy)?;
            tracing::debug!(project_id, copy_id = %copy.project.id, "imported project as copy");
            Ok(Outcome::Duplicated)
        }
    }
}
