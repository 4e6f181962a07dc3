use std::path::{Path, PathBuf};

use rusqlite::Connection;
use serde::Serialize;
use thiserror::Error;

use crate::backup::{
    self, BackupError, FullBackup, ImportOptions, ImportResult, ParseBackupError, ParsedBackup,
    ProjectBackup,
};
use crate::config::{Config, ConfigError};
use crate::db;
use crate::domain::Project;

/// Owns the store connection and configuration and exposes the backup
/// entry points to the host.
pub struct App {
    conn: Connection,
    config: Config,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectView {
    pub id: String,
    pub title: String,
    pub updated_at: String,
}

impl From<Project> for ProjectView {
    fn from(project: Project) -> Self {
        Self {
            id: project.id,
            title: project.title,
            updated_at: project.updated_at,
        }
    }
}

/// What `inspect` reports about a parsed document.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BackupSummary {
    pub kind: String,
    pub version: u32,
    pub exported_at: String,
    pub has_settings: bool,
    pub projects: Vec<BackupProjectSummary>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BackupProjectSummary {
    pub id: String,
    pub title: String,
    pub records: usize,
}

impl BackupSummary {
    pub fn of(backup: &ParsedBackup) -> Self {
        let has_settings = match backup {
            ParsedBackup::Full(full) => full.app_settings.is_some() || full.app_dictionary.is_some(),
            ParsedBackup::Project(_) => false,
        };
        Self {
            kind: backup.kind().as_str().to_string(),
            version: backup.version(),
            exported_at: backup.exported_at().to_string(),
            has_settings,
            projects: backup
                .graphs()
                .iter()
                .map(|graph| BackupProjectSummary {
                    id: graph.project.id.clone(),
                    title: graph.project.title.clone(),
                    records: graph.record_count(),
                })
                .collect(),
        }
    }
}

impl App {
    pub fn open(db_path: &str, config: Config) -> Result<Self, AppError> {
        if db_path.trim().is_empty() {
            return Err(AppError::InvalidArgument(
                "database path must not be empty".to_string(),
            ));
        }
        ensure_parent_dir(db_path)?;
        let conn = db::open_connection(db_path)?;
        Ok(Self { conn, config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn list_projects(&self) -> Result<Vec<ProjectView>, AppError> {
        let projects = db::list_projects(&self.conn)?;
        Ok(projects.into_iter().map(ProjectView::from).collect())
    }

    pub fn export_project(&self, project_id: &str) -> Result<Option<ProjectBackup>, AppError> {
        Ok(backup::export_project(&self.conn, project_id)?)
    }

    pub fn export_full_backup(&self) -> Result<FullBackup, AppError> {
        Ok(backup::export_full(&self.conn)?)
    }

    pub fn download_project_backup(
        &self,
        project_id: &str,
        out_dir: Option<&Path>,
    ) -> Result<PathBuf, AppError> {
        let dir = out_dir.unwrap_or(&self.config.backup_dir);
        backup::download_project_backup(&self.conn, &self.config.app_name, project_id, dir)?
            .ok_or_else(|| AppError::Backup(BackupError::NotFound(project_id.to_string())))
    }

    pub fn download_full_backup(&self, out_dir: Option<&Path>) -> Result<PathBuf, AppError> {
        let dir = out_dir.unwrap_or(&self.config.backup_dir);
        Ok(backup::download_full_backup(
            &self.conn,
            &self.config.app_name,
            dir,
        )?)
    }

    pub fn parse_backup_file(&self, text: &str) -> Result<ParsedBackup, AppError> {
        Ok(backup::parse_backup(text)?)
    }

    pub fn read_backup_file(&self, path: &Path) -> Result<ParsedBackup, AppError> {
        let text = std::fs::read_to_string(path)?;
        self.parse_backup_file(&text)
    }

    /// Options for `import_backup` with the configured defaults, overridden
    /// by whatever the caller supplies.
    pub fn import_options(
        &self,
        conflict_resolution: Option<backup::ConflictResolution>,
        restore_settings: bool,
    ) -> ImportOptions {
        ImportOptions {
            conflict_resolution: conflict_resolution.unwrap_or(self.config.conflict_resolution),
            restore_settings: restore_settings || self.config.restore_settings,
        }
    }

    pub fn import_backup(&self, backup: &ParsedBackup, options: &ImportOptions) -> ImportResult {
        backup::import_backup(&self.conn, backup, options)
    }
}

fn ensure_parent_dir(path: &str) -> Result<(), AppError> {
    if let Some(parent) = Path::new(path).parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("database error: {0}")]
    Db(#[from] rusqlite::Error),
    #[error(transparent)]
    Backup(#[from] BackupError),
    #[error(transparent)]
    Parse(#[from] ParseBackupError),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    InvalidArgument(String),
    #[error("import failed: {0}")]
    ImportFailed(String),
}
