use serde::de::DeserializeOwned;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Projects,
    Chapters,
    Characters,
    Relationships,
    Locations,
    TimelineEvents,
    StyleGuideEntries,
    WorldbuildingDocs,
    OutlineGridColumns,
    OutlineGridRows,
    OutlineGridCells,
    WritingSprints,
    WritingSessions,
    PlaylistTracks,
    Comments,
    ChapterSnapshots,
    ProjectDictionaries,
}

impl Collection {
    /// Collections scoped by a project id, parents before children.
    pub const DEPENDENT: [Collection; 16] = [
        Collection::Chapters,
        Collection::Characters,
        Collection::Relationships,
        Collection::Locations,
        Collection::TimelineEvents,
        Collection::StyleGuideEntries,
        Collection::WorldbuildingDocs,
        Collection::OutlineGridColumns,
        Collection::OutlineGridRows,
        Collection::OutlineGridCells,
        Collection::WritingSprints,
        Collection::WritingSessions,
        Collection::PlaylistTracks,
        Collection::Comments,
        Collection::ChapterSnapshots,
        Collection::ProjectDictionaries,
    ];

    pub fn table(self) -> &'static str {
        match self {
            Collection::Projects => "projects",
            Collection::Chapters => "chapters",
            Collection::Characters => "characters",
            Collection::Relationships => "character_relationships",
            Collection::Locations => "locations",
            Collection::TimelineEvents => "timeline_events",
            Collection::StyleGuideEntries => "style_guide_entries",
            Collection::WorldbuildingDocs => "worldbuilding_docs",
            Collection::OutlineGridColumns => "outline_grid_columns",
            Collection::OutlineGridRows => "outline_grid_rows",
            Collection::OutlineGridCells => "outline_grid_cells",
            Collection::WritingSprints => "writing_sprints",
            Collection::WritingSessions => "writing_sessions",
            Collection::PlaylistTracks => "playlist_tracks",
            Collection::Comments => "comments",
            Collection::ChapterSnapshots => "chapter_snapshots",
            Collection::ProjectDictionaries => "project_dictionaries",
        }
    }

    /// Field name of this collection inside a serialized project graph.
    pub fn json_key(self) -> &'static str {
        match self {
            Collection::Projects => "project",
            Collection::Chapters => "chapters",
            Collection::Characters => "characters",
            Collection::Relationships => "relationships",
            Collection::Locations => "locations",
            Collection::TimelineEvents => "timelineEvents",
            Collection::StyleGuideEntries => "styleGuideEntries",
            Collection::WorldbuildingDocs => "worldbuildingDocs",
            Collection::OutlineGridColumns => "outlineGridColumns",
            Collection::OutlineGridRows => "outlineGridRows",
            Collection::OutlineGridCells => "outlineGridCells",
            Collection::WritingSprints => "writingSprints",
            Collection::WritingSessions => "writingSessions",
            Collection::PlaylistTracks => "playlistTracks",
            Collection::Comments => "comments",
            Collection::ChapterSnapshots => "chapterSnapshots",
            Collection::ProjectDictionaries => "projectDictionary",
        }
    }
}

/// A row stored in one collection table.
pub trait Record: Serialize + DeserializeOwned + Clone {
    const COLLECTION: Collection;

    fn id(&self) -> &str;

    fn project_id(&self) -> &str;
}
