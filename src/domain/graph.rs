use serde::{Deserialize, Serialize};

use super::records::{
    Chapter, ChapterSnapshot, Character, CharacterRelationship, Comment, Location,
    OutlineGridCell, OutlineGridColumn, OutlineGridRow, PlaylistTrack, Project, ProjectDictionary,
    StyleGuideEntry, TimelineEvent, WorldbuildingDoc, WritingSession, WritingSprint,
};

/// Snapshot of one project's complete row set across every collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectGraph {
    pub project: Project,
    #[serde(default)]
    pub chapters: Vec<Chapter>,
    #[serde(default)]
    pub characters: Vec<Character>,
    #[serde(default)]
    pub relationships: Vec<CharacterRelationship>,
    #[serde(default)]
    pub locations: Vec<Location>,
    #[serde(default)]
    pub timeline_events: Vec<TimelineEvent>,
    #[serde(default)]
    pub style_guide_entries: Vec<StyleGuideEntry>,
    #[serde(default)]
    pub worldbuilding_docs: Vec<WorldbuildingDoc>,
    #[serde(default)]
    pub outline_grid_columns: Vec<OutlineGridColumn>,
    #[serde(default)]
    pub outline_grid_rows: Vec<OutlineGridRow>,
    #[serde(default)]
    pub outline_grid_cells: Vec<OutlineGridCell>,
    #[serde(default)]
    pub writing_sprints: Vec<WritingSprint>,
    #[serde(default)]
    pub writing_sessions: Vec<WritingSession>,
    #[serde(default)]
    pub playlist_tracks: Vec<PlaylistTrack>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub chapter_snapshots: Vec<ChapterSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_dictionary: Option<ProjectDictionary>,
}

impl ProjectGraph {
    pub fn new(project: Project) -> Self {
        Self {
            project,
            chapters: Vec::new(),
            characters: Vec::new(),
            relationships: Vec::new(),
            locations: Vec::new(),
            timeline_events: Vec::new(),
            style_guide_entries: Vec::new(),
            worldbuilding_docs: Vec::new(),
            outline_grid_columns: Vec::new(),
            outline_grid_rows: Vec::new(),
            outline_grid_cells: Vec::new(),
            writing_sprints: Vec::new(),
            writing_sessions: Vec::new(),
            playlist_tracks: Vec::new(),
            comments: Vec::new(),
            chapter_snapshots: Vec::new(),
            project_dictionary: None,
        }
    }

    /// Every record id in the graph, the project first.
    pub fn record_ids(&self) -> Vec<&str> {
        let mut ids = vec![self.project.id.as_str()];
        ids.extend(self.chapters.iter().map(|r| r.id.as_str()));
        ids.extend(self.characters.iter().map(|r| r.id.as_str()));
        ids.extend(self.relationships.iter().map(|r| r.id.as_str()));
        ids.extend(self.locations.iter().map(|r| r.id.as_str()));
        ids.extend(self.timeline_events.iter().map(|r| r.id.as_str()));
        ids.extend(self.style_guide_entries.iter().map(|r| r.id.as_str()));
        ids.extend(self.worldbuilding_docs.iter().map(|r| r.id.as_str()));
        ids.extend(self.outline_grid_columns.iter().map(|r| r.id.as_str()));
        ids.extend(self.outline_grid_rows.iter().map(|r| r.id.as_str()));
        ids.extend(self.outline_grid_cells.iter().map(|r| r.id.as_str()));
        ids.extend(self.writing_sprints.iter().map(|r| r.id.as_str()));
        ids.extend(self.writing_sessions.iter().map(|r| r.id.as_str()));
        ids.extend(self.playlist_tracks.iter().map(|r| r.id.as_str()));
        ids.extend(self.comments.iter().map(|r| r.id.as_str()));
        ids.extend(self.chapter_snapshots.iter().map(|r| r.id.as_str()));
        if let Some(dictionary) = &self.project_dictionary {
            ids.push(dictionary.id.as_str());
        }
        ids
    }

    pub fn record_count(&self) -> usize {
        self.record_ids().len()
    }
}
