use std::path::{Path, PathBuf};

use rusqlite::Connection;
use serde::Serialize;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::db;
use crate::domain::{AppDictionary, AppSettings, APP_DICTIONARY_KEY, APP_SETTINGS_KEY};

use super::errors::BackupError;
use super::gather::{gather_all, gather_project};
use super::schema::{
    BackupKind, FullBackup, FullBackupMetadata, ProjectBackup, ProjectBackupMetadata,
    CURRENT_BACKUP_VERSION,
};

const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
const UNTITLED_SLUG: &str = "untitled";

/// Wraps one project's graph in a project envelope. `None` when the project
/// does not exist.
pub fn export_project(
    conn: &Connection,
    project_id: &str,
) -> Result<Option<ProjectBackup>, BackupError> {
    let tx = conn.unchecked_transaction()?;
    let graph = gather_project(&tx, project_id)?;
    tx.commit()?;
    let exported_at = db::now_utc_rfc3339()?;

    let Some(data) = graph else {
        return Ok(None);
    };
    Ok(Some(ProjectBackup {
        metadata: ProjectBackupMetadata {
            version: CURRENT_BACKUP_VERSION,
            kind: BackupKind::Project,
            exported_at,
            project_title: data.project.title.clone(),
            app_version: Some(APP_VERSION.to_string()),
        },
        data,
    }))
}

/// Every project plus the process-wide settings and dictionary, read from
/// one snapshot.
pub fn export_full(conn: &Connection) -> Result<FullBackup, BackupError> {
    let tx = conn.unchecked_transaction()?;
    let projects = gather_all(&tx)?;
    let app_settings: Option<AppSettings> = db::get_singleton(&tx, APP_SETTINGS_KEY)?;
    let app_dictionary: Option<AppDictionary> = db::get_singleton(&tx, APP_DICTIONARY_KEY)?;
    tx.commit()?;
    let exported_at = db::now_utc_rfc3339()?;

    Ok(FullBackup {
        metadata: FullBackupMetadata {
            version: CURRENT_BACKUP_VERSION,
            kind: BackupKind::Full,
            exported_at,
            project_count: projects.len(),
            app_version: Some(APP_VERSION.to_string()),
        },
        app_settings,
        app_dictionary,
        projects,
    })
}

pub fn to_document<T: Serialize>(backup: &T) -> Result<String, BackupError> {
    Ok(serde_json::to_string_pretty(backup)?)
}

/// Writes a project backup into `dir` and stamps the export time on the
/// settings row. `None` when the project does not exist.
pub fn download_project_backup(
    conn: &Connection,
    app_name: &str,
    project_id: &str,
    dir: &Path,
) -> Result<Option<PathBuf>, BackupError> {
    let Some(backup) = export_project(conn, project_id)? else {
        return Ok(None);
    };
    let filename = project_backup_filename(
        app_name,
        &backup.metadata.project_title,
        &date_stamp(&backup.metadata.exported_at),
    );
    let path = write_document(dir, &filename, &to_document(&backup)?)?;
    stamp_last_exported(conn, &backup.metadata.exported_at)?;

    tracing::info!(
        project_id,
        path = %path.display(),
        records = backup.data.record_count(),
        "exported project backup"
    );
    Ok(Some(path))
}

pub fn download_full_backup(
    conn: &Connection,
    app_name: &str,
    dir: &Path,
) -> Result<PathBuf, BackupError> {
    let backup = export_full(conn)?;
    let filename = full_backup_filename(app_name, &date_stamp(&backup.metadata.exported_at));
    let path = write_document(dir, &filename, &to_document(&backup)?)?;
    stamp_last_exported(conn, &backup.metadata.exported_at)?;

    tracing::info!(
        projects = backup.metadata.project_count,
        path = %path.display(),
        "exported full backup"
    );
    Ok(path)
}

pub fn project_backup_filename(app_name: &str, title: &str, date: &str) -> String {
    let slug = slugify(title);
    let slug = if slug.is_empty() { UNTITLED_SLUG } else { &slug };
    format!("{app_name}-{slug}-{date}.json")
}

pub fn full_backup_filename(app_name: &str, date: &str) -> String {
    format!("{app_name}-full-backup-{date}.json")
}

/// Lowercases, collapses each run of non-alphanumerics to one hyphen and
/// trims hyphens at both ends.
pub fn slugify(raw: &str) -> String {
    let mut slug = String::with_capacity(raw.len());
    let mut pending_hyphen = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }
    slug
}

fn write_document(dir: &Path, filename: &str, document: &str) -> Result<PathBuf, BackupError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(filename);
    std::fs::write(&path, document)?;
    Ok(path)
}

fn stamp_last_exported(conn: &Connection, exported_at: &str) -> Result<(), BackupError> {
    let mut settings: AppSettings =
        db::get_singleton(conn, APP_SETTINGS_KEY)?.unwrap_or_default();
    settings.last_exported_at = Some(exported_at.to_string());
    db::put_singleton(conn, APP_SETTINGS_KEY, &settings)?;
    Ok(())
}

/// `YYYY-MM-DD` of an RFC3339 timestamp.
fn date_stamp(exported_at: &str) -> String {
    let at = OffsetDateTime::parse(exported_at, &Rfc3339).unwrap_or_else(|_| OffsetDateTime::now_utc());
    format!(
        "{:04}-{:02}-{:02}",
        at.year(),
        u8::from(at.month()),
        at.day()
    )
}
