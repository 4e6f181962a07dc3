use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::domain::{
    AppDictionary, AppSettings, Collection, Project, ProjectDictionary, ProjectGraph,
};

use super::errors::ParseBackupError;
use super::legacy::normalize_settings;

/// Newest document version this build can read.
pub const CURRENT_BACKUP_VERSION: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackupKind {
    Project,
    Full,
}

impl BackupKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BackupKind::Project => "project",
            BackupKind::Full => "full",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectBackupMetadata {
    pub version: u32,
    #[serde(rename = "type")]
    pub kind: BackupKind,
    pub exported_at: String,
    pub project_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullBackupMetadata {
    pub version: u32,
    #[serde(rename = "type")]
    pub kind: BackupKind,
    pub exported_at: String,
    pub project_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectBackup {
    pub metadata: ProjectBackupMetadata,
    pub data: ProjectGraph,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullBackup {
    pub metadata: FullBackupMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_settings: Option<AppSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_dictionary: Option<AppDictionary>,
    pub projects: Vec<ProjectGraph>,
}

/// A document that passed structural and version validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedBackup {
    Project(ProjectBackup),
    Full(FullBackup),
}

impl ParsedBackup {
    pub fn kind(&self) -> BackupKind {
        match self {
            ParsedBackup::Project(_) => BackupKind::Project,
            ParsedBackup::Full(_) => BackupKind::Full,
        }
    }

    pub fn version(&self) -> u32 {
        match self {
            ParsedBackup::Project(backup) => backup.metadata.version,
            ParsedBackup::Full(backup) => backup.metadata.version,
        }
    }

    pub fn exported_at(&self) -> &str {
        match self {
            ParsedBackup::Project(backup) => &backup.metadata.exported_at,
            ParsedBackup::Full(backup) => &backup.metadata.exported_at,
        }
    }

    pub fn graphs(&self) -> &[ProjectGraph] {
        match self {
            ParsedBackup::Project(backup) => std::slice::from_ref(&backup.data),
            ParsedBackup::Full(backup) => &backup.projects,
        }
    }
}

pub fn is_version_supported(version: u32) -> bool {
    (1..=CURRENT_BACKUP_VERSION).contains(&version)
}

/// Validates untrusted backup text into one of the two envelope shapes.
pub fn parse_backup(text: &str) -> Result<ParsedBackup, ParseBackupError> {
    let root: Value = serde_json::from_str(text)
        .map_err(|err| ParseBackupError::InvalidFormat(err.to_string()))?;
    let Some(root) = root.as_object() else {
        return Err(ParseBackupError::InvalidFormat(
            "backup document must be a JSON object".to_string(),
        ));
    };

    let Some(metadata) = root.get("metadata").filter(|value| value.is_object()) else {
        return Err(schema_error("metadata: expected an object"));
    };
    let version = match metadata.get("version").and_then(Value::as_u64) {
        Some(raw) if raw >= 1 => u32::try_from(raw).unwrap_or(u32::MAX),
        _ => return Err(schema_error("metadata.version: expected a positive integer")),
    };
    if !is_version_supported(version) {
        return Err(ParseBackupError::UnsupportedVersion(version));
    }

    let kind = match metadata.get("type").and_then(Value::as_str) {
        Some("project") => BackupKind::Project,
        Some("full") => BackupKind::Full,
        _ => {
            return Err(schema_error(
                "metadata.type: expected \"project\" or \"full\"",
            ))
        }
    };

    let mut errors = Vec::new();
    let parsed = match kind {
        BackupKind::Project => parse_project_backup(root, metadata, &mut errors),
        BackupKind::Full => parse_full_backup(root, metadata, &mut errors),
    };

    match parsed {
        Some(backup) if errors.is_empty() => Ok(backup),
        _ => Err(ParseBackupError::InvalidSchema(errors)),
    }
}

fn schema_error(message: &str) -> ParseBackupError {
    ParseBackupError::InvalidSchema(vec![message.to_string()])
}

fn parse_project_backup(
    root: &Map<String, Value>,
    metadata: &Value,
    errors: &mut Vec<String>,
) -> Option<ParsedBackup> {
    if root.contains_key("projects") {
        errors.push(
            "projects: not allowed when metadata.type is \"project\" (expected `data`)".to_string(),
        );
    }
    let metadata: Option<ProjectBackupMetadata> = decode_value(metadata, "metadata", errors);
    if let Some(metadata) = &metadata {
        check_exported_at(&metadata.exported_at, errors);
    }

    let data = match root.get("data") {
        Some(value) => decode_graph(value, "data", errors),
        None => {
            errors.push("data: missing project graph".to_string());
            None
        }
    };

    Some(ParsedBackup::Project(ProjectBackup {
        metadata: metadata?,
        data: data?,
    }))
}

fn parse_full_backup(
    root: &Map<String, Value>,
    metadata: &Value,
    errors: &mut Vec<String>,
) -> Option<ParsedBackup> {
    if root.contains_key("data") {
        errors.push(
            "data: not allowed when metadata.type is \"full\" (expected `projects`)".to_string(),
        );
    }
    let metadata: Option<FullBackupMetadata> = decode_value(metadata, "metadata", errors);
    if let Some(metadata) = &metadata {
        check_exported_at(&metadata.exported_at, errors);
    }

    let projects = match root.get("projects") {
        Some(Value::Array(items)) => {
            let mut graphs = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                if let Some(graph) = decode_graph(item, &format!("projects[{index}]"), errors) {
                    graphs.push(graph);
                }
            }
            Some(graphs)
        }
        Some(_) => {
            errors.push("projects: expected an array".to_string());
            None
        }
        None => {
            errors.push("projects: missing project list".to_string());
            None
        }
    };

    let app_settings = decode_optional::<AppSettings>(root.get("appSettings"), "appSettings", errors)
        .map(normalize_settings);
    let app_dictionary =
        decode_optional::<AppDictionary>(root.get("appDictionary"), "appDictionary", errors);

    Some(ParsedBackup::Full(FullBackup {
        metadata: metadata?,
        app_settings,
        app_dictionary,
        projects: projects?,
    }))
}

fn check_exported_at(raw: &str, errors: &mut Vec<String>) {
    if OffsetDateTime::parse(raw, &Rfc3339).is_err() {
        errors.push(format!(
            "metadata.exportedAt: expected an RFC3339 timestamp, got '{raw}'"
        ));
    }
}

fn decode_graph(value: &Value, path: &str, errors: &mut Vec<String>) -> Option<ProjectGraph> {
    let Some(object) = value.as_object() else {
        errors.push(format!("{path}: expected a project graph object"));
        return None;
    };
    let before = errors.len();

    let project = match object.get(Collection::Projects.json_key()) {
        Some(value) => decode_value::<Project>(value, &format!("{path}.project"), errors),
        None => {
            errors.push(format!("{path}.project: missing"));
            None
        }
    };

    let chapters = decode_list(object, Collection::Chapters, path, errors);
    let characters = decode_list(object, Collection::Characters, path, errors);
    let relationships = decode_list(object, Collection::Relationships, path, errors);
    let locations = decode_list(object, Collection::Locations, path, errors);
    let timeline_events = decode_list(object, Collection::TimelineEvents, path, errors);
    let style_guide_entries = decode_list(object, Collection::StyleGuideEntries, path, errors);
    let worldbuilding_docs = decode_list(object, Collection::WorldbuildingDocs, path, errors);
    let outline_grid_columns = decode_list(object, Collection::OutlineGridColumns, path, errors);
    let outline_grid_rows = decode_list(object, Collection::OutlineGridRows, path, errors);
    let outline_grid_cells = decode_list(object, Collection::OutlineGridCells, path, errors);
    let writing_sprints = decode_list(object, Collection::WritingSprints, path, errors);
    let writing_sessions = decode_list(object, Collection::WritingSessions, path, errors);
    let playlist_tracks = decode_list(object, Collection::PlaylistTracks, path, errors);
    let comments = decode_list(object, Collection::Comments, path, errors);
    let chapter_snapshots = decode_list(object, Collection::ChapterSnapshots, path, errors);
    let dictionary_key = Collection::ProjectDictionaries.json_key();
    let project_dictionary = decode_optional::<ProjectDictionary>(
        object.get(dictionary_key),
        &format!("{path}.{dictionary_key}"),
        errors,
    );

    if errors.len() != before {
        return None;
    }
    Some(ProjectGraph {
        project: project?,
        chapters,
        characters,
        relationships,
        locations,
        timeline_events,
        style_guide_entries,
        worldbuilding_docs,
        outline_grid_columns,
        outline_grid_rows,
        outline_grid_cells,
        writing_sprints,
        writing_sessions,
        playlist_tracks,
        comments,
        chapter_snapshots,
        project_dictionary,
    })
}

/// Collections missing from older documents decode as empty.
fn decode_list<T>(
    object: &Map<String, Value>,
    collection: Collection,
    path: &str,
    errors: &mut Vec<String>,
) -> Vec<T>
where
    T: for<'de> Deserialize<'de>,
{
    let key = collection.json_key();
    match object.get(key) {
        None => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| decode_value(item, &format!("{path}.{key}[{index}]"), errors))
            .collect(),
        Some(_) => {
            errors.push(format!("{path}.{key}: expected an array"));
            Vec::new()
        }
    }
}

fn decode_optional<T>(value: Option<&Value>, path: &str, errors: &mut Vec<String>) -> Option<T>
where
    T: for<'de> Deserialize<'de>,
{
    match value {
        None | Some(Value::Null) => None,
        Some(value) => decode_value(value, path, errors),
    }
}

fn decode_value<T>(value: &Value, path: &str, errors: &mut Vec<String>) -> Option<T>
where
    T: for<'de> Deserialize<'de>,
{
    match T::deserialize(value) {
        Ok(decoded) => Some(decoded),
        Err(err) => {
            errors.push(format!("{path}: {err}"));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{
        is_version_supported, parse_backup, BackupKind, ParsedBackup, CURRENT_BACKUP_VERSION,
    };
    use crate::backup::errors::ParseBackupError;

    fn project_json(id: &str, title: &str) -> serde_json::Value {
        json!({
            "id": id,
            "title": title,
            "createdAt": "2026-03-01T09:00:00Z",
            "updatedAt": "2026-03-01T09:00:00Z"
        })
    }

    #[test]
    fn version_gate_accepts_current_and_older_only() {
        assert!(is_version_supported(CURRENT_BACKUP_VERSION));
        assert!(is_version_supported(CURRENT_BACKUP_VERSION - 1));
        assert!(!is_version_supported(CURRENT_BACKUP_VERSION + 1));
        assert!(!is_version_supported(0));
    }

    #[test]
    fn parses_minimal_project_envelope() {
        let text = json!({
            "metadata": {
                "version": CURRENT_BACKUP_VERSION,
                "type": "project",
                "exportedAt": "2026-03-02T10:00:00Z",
                "projectTitle": "Test Novel"
            },
            "data": { "project": project_json("p-1", "Test Novel") }
        })
        .to_string();

        let parsed = parse_backup(&text).expect("minimal project backup should parse");
        assert_eq!(parsed.kind(), BackupKind::Project);
        assert_eq!(parsed.graphs().len(), 1);
        assert!(parsed.graphs()[0].chapters.is_empty());
        assert!(parsed.graphs()[0].project_dictionary.is_none());
    }

    #[test]
    fn rejects_malformed_text_as_invalid_format() {
        let err = parse_backup("{not json").expect_err("broken json should fail");
        assert!(matches!(err, ParseBackupError::InvalidFormat(_)));

        let err = parse_backup("[1,2,3]").expect_err("array root should fail");
        assert!(matches!(err, ParseBackupError::InvalidFormat(_)));
    }

    #[test]
    fn rejects_newer_versions_with_actionable_message() {
        let text = json!({
            "metadata": {
                "version": CURRENT_BACKUP_VERSION + 1,
                "type": "project",
                "exportedAt": "2026-03-02T10:00:00Z",
                "projectTitle": "Future"
            },
            "data": { "future": true }
        })
        .to_string();

        let err = parse_backup(&text).expect_err("newer version should fail");
        assert!(matches!(err, ParseBackupError::UnsupportedVersion(v) if v == CURRENT_BACKUP_VERSION + 1));
        assert_eq!(
            err.to_string(),
            format!(
                "Unsupported backup version: {}. Please update the application.",
                CURRENT_BACKUP_VERSION + 1
            )
        );
    }

    #[test]
    fn rejects_non_positive_or_missing_versions() {
        for version in [json!(0), json!(-1), json!("2"), json!(1.5)] {
            let text = json!({
                "metadata": { "version": version, "type": "full", "exportedAt": "2026-03-02T10:00:00Z" },
                "projects": []
            })
            .to_string();
            let err = parse_backup(&text).expect_err("bad version should fail");
            assert!(matches!(err, ParseBackupError::InvalidSchema(_)), "{version}");
        }
    }

    #[test]
    fn type_must_match_payload_shape() {
        let project_with_list = json!({
            "metadata": {
                "version": 2,
                "type": "project",
                "exportedAt": "2026-03-02T10:00:00Z",
                "projectTitle": "Mismatch"
            },
            "projects": []
        })
        .to_string();
        let ParseBackupError::InvalidSchema(messages) =
            parse_backup(&project_with_list).expect_err("shape mismatch should fail")
        else {
            panic!("expected schema error");
        };
        assert!(messages.iter().any(|m| m.starts_with("projects:")));
        assert!(messages.iter().any(|m| m.starts_with("data:")));

        let full_with_data = json!({
            "metadata": {
                "version": 2,
                "type": "full",
                "exportedAt": "2026-03-02T10:00:00Z",
                "projectCount": 1
            },
            "data": { "project": project_json("p-1", "One") }
        })
        .to_string();
        let err = parse_backup(&full_with_data).expect_err("full without projects should fail");
        assert!(matches!(err, ParseBackupError::InvalidSchema(_)));
    }

    #[test]
    fn schema_errors_carry_field_paths() {
        let text = json!({
            "metadata": {
                "version": 2,
                "type": "full",
                "exportedAt": "yesterday",
                "projectCount": 2
            },
            "projects": [
                { "project": project_json("p-1", "One") },
                {
                    "project": project_json("p-2", "Two"),
                    "chapters": [
                        { "id": "c-1", "projectId": "p-2", "order": 1,
                          "createdAt": "2026-03-01T09:00:00Z", "updatedAt": "2026-03-01T09:00:00Z" }
                    ],
                    "comments": {}
                }
            ]
        })
        .to_string();

        let ParseBackupError::InvalidSchema(messages) =
            parse_backup(&text).expect_err("broken records should fail")
        else {
            panic!("expected schema error");
        };
        assert!(messages.iter().any(|m| m.starts_with("metadata.exportedAt")));
        assert!(messages
            .iter()
            .any(|m| m.starts_with("projects[1].chapters[0]") && m.contains("title")));
        assert!(messages.iter().any(|m| m == "projects[1].comments: expected an array"));
    }

    #[test]
    fn full_envelope_normalizes_legacy_settings() {
        let text = json!({
            "metadata": {
                "version": 1,
                "type": "full",
                "exportedAt": "2025-06-01T08:00:00Z",
                "projectCount": 0
            },
            "appSettings": { "id": "app-settings", "apiKey": "sk-old", "aiProvider": "anthropic" },
            "projects": []
        })
        .to_string();

        let ParsedBackup::Full(full) = parse_backup(&text).expect("v1 full backup should parse")
        else {
            panic!("expected full backup");
        };
        let settings = full.app_settings.expect("settings should be carried");
        assert_eq!(settings.api_keys.get("anthropic").map(String::as_str), Some("sk-old"));
        assert!(settings.legacy_api_key.is_none());
        assert!(settings.legacy_ai_provider.is_none());
    }
}
