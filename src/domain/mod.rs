pub mod collection;
pub mod graph;
pub mod records;
pub mod refs;
pub mod settings;

pub use collection::{Collection, Record};
pub use graph::ProjectGraph;
pub use records::{
    Chapter, ChapterSnapshot, Character, CharacterRelationship, Comment, Location,
    OutlineGridCell, OutlineGridColumn, OutlineGridRow, PlaylistTrack, Project, ProjectDictionary,
    StyleGuideEntry, TimelineEvent, WorldbuildingDoc, WritingSession, WritingSprint,
};
pub use refs::{OptionalRef, RefList, StrictRef};
pub use settings::{AppDictionary, AppSettings, APP_DICTIONARY_KEY, APP_SETTINGS_KEY};
