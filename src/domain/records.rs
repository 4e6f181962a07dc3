use serde::{Deserialize, Serialize};

use super::collection::{Collection, Record};
use super::refs::{OptionalRef, RefList, StrictRef};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_word_count: Option<u64>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub id: String,
    pub project_id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub order: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default)]
    pub word_count: u64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub id: String,
    pub project_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub linked_character_ids: RefList,
    #[serde(default)]
    pub linked_location_ids: RefList,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterRelationship {
    pub id: String,
    pub project_id: String,
    pub source_character_id: StrictRef,
    pub target_character_id: StrictRef,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub description: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: String,
    pub project_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub parent_location_id: Option<OptionalRef>,
    #[serde(default)]
    pub linked_character_ids: RefList,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEvent {
    pub id: String,
    pub project_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub order: i64,
    #[serde(default)]
    pub linked_chapter_ids: RefList,
    #[serde(default)]
    pub linked_character_ids: RefList,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleGuideEntry {
    pub id: String,
    pub project_id: String,
    pub category: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldbuildingDoc {
    pub id: String,
    pub project_id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub parent_id: Option<OptionalRef>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlineGridColumn {
    pub id: String,
    pub project_id: String,
    pub title: String,
    pub order: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlineGridRow {
    pub id: String,
    pub project_id: String,
    pub title: String,
    pub order: i64,
    #[serde(default)]
    pub linked_chapter_id: Option<OptionalRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlineGridCell {
    pub id: String,
    pub project_id: String,
    pub row_id: StrictRef,
    pub column_id: StrictRef,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WritingSprint {
    pub id: String,
    pub project_id: String,
    #[serde(default)]
    pub chapter_id: Option<OptionalRef>,
    pub started_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<String>,
    pub duration_minutes: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_words: Option<u64>,
    #[serde(default)]
    pub words_written: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WritingSession {
    pub id: String,
    pub project_id: String,
    pub chapter_id: StrictRef,
    pub started_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<String>,
    #[serde(default)]
    pub word_count_start: u64,
    #[serde(default)]
    pub word_count_end: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistTrack {
    pub id: String,
    pub project_id: String,
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    pub order: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub project_id: String,
    pub chapter_id: StrictRef,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor_from: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor_to: Option<u64>,
    #[serde(default)]
    pub resolved: bool,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterSnapshot {
    pub id: String,
    pub project_id: String,
    pub chapter_id: StrictRef,
    pub content: String,
    #[serde(default)]
    pub word_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDictionary {
    pub id: String,
    pub project_id: String,
    #[serde(default)]
    pub words: Vec<String>,
    pub updated_at: String,
}

impl Record for Project {
    const COLLECTION: Collection = Collection::Projects;

    fn id(&self) -> &str {
        &self.id
    }

    fn project_id(&self) -> &str {
        &self.id
    }
}

macro_rules! scoped_record {
    ($($ty:ty => $collection:expr),+ $(,)?) => {
        $(
            impl Record for $ty {
                const COLLECTION: Collection = $collection;

                fn id(&self) -> &str {
                    &self.id
                }

                fn project_id(&self) -> &str {
                    &self.project_id
                }
            }
        )+
    };
}

scoped_record! {
    Chapter => Collection::Chapters,
    Character => Collection::Characters,
    CharacterRelationship => Collection::Relationships,
    Location => Collection::Locations,
    TimelineEvent => Collection::TimelineEvents,
    StyleGuideEntry => Collection::StyleGuideEntries,
    WorldbuildingDoc => Collection::WorldbuildingDocs,
    OutlineGridColumn => Collection::OutlineGridColumns,
    OutlineGridRow => Collection::OutlineGridRows,
    OutlineGridCell => Collection::OutlineGridCells,
    WritingSprint => Collection::WritingSprints,
    WritingSession => Collection::WritingSessions,
    PlaylistTrack => Collection::PlaylistTracks,
    Comment => Collection::Comments,
    ChapterSnapshot => Collection::ChapterSnapshots,
    ProjectDictionary => Collection::ProjectDictionaries,
}
