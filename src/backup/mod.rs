mod errors;
mod export;
#[cfg(test)]
mod fixtures;
mod gather;
mod import;
mod legacy;
mod remap;
mod schema;
mod store;

pub use errors::{BackupError, ParseBackupError, RemapError};
pub use export::{
    download_full_backup, download_project_backup, export_full, export_project,
    full_backup_filename, project_backup_filename, slugify, to_document,
};
pub use gather::{gather_all, gather_project};
pub use import::{
    import_backup, import_backup_with_ids, ConflictResolution, ImportOptions, ImportResult,
    ParseConflictResolutionError,
};
pub use legacy::normalize_settings;
pub use remap::{new_record_id, remap_graph, COPY_SUFFIX};
pub use schema::{
    is_version_supported, parse_backup, BackupKind, FullBackup, FullBackupMetadata, ParsedBackup,
    ProjectBackup, ProjectBackupMetadata, CURRENT_BACKUP_VERSION,
};
