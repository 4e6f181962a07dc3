use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::domain::{
    Chapter, ChapterSnapshot, Character, CharacterRelationship, Collection, Comment, Location,
    OptionalRef, OutlineGridCell, OutlineGridColumn, OutlineGridRow, PlaylistTrack, Project,
    ProjectDictionary, ProjectGraph, Record, RefList, StrictRef, StyleGuideEntry, TimelineEvent,
    WorldbuildingDoc, WritingSession, WritingSprint,
};

use super::errors::RemapError;

pub const COPY_SUFFIX: &str = " (Copy)";
const MAX_ID_ATTEMPTS: usize = 64;

pub fn new_record_id() -> String {
    Uuid::now_v7().to_string()
}

/// Old-to-new identifier substitution for one remap call. Identifiers are
/// unique across every collection, so one flat map covers all kinds.
#[derive(Debug, Clone, Default)]
struct IdMap {
    ids: HashMap<String, String>,
}

impl IdMap {
    fn allocate<F>(graph: &ProjectGraph, new_id: &mut F) -> Result<Self, RemapError>
    where
        F: FnMut() -> String,
    {
        let old_ids: HashSet<&str> = graph.record_ids().into_iter().collect();
        let mut issued: HashSet<String> = HashSet::with_capacity(old_ids.len());
        let mut ids = HashMap::with_capacity(old_ids.len());

        for old in graph.record_ids() {
            if ids.contains_key(old) {
                continue;
            }
            let fresh = fresh_id(new_id, |candidate| {
                old_ids.contains(candidate) || issued.contains(candidate)
            })?;
            issued.insert(fresh.clone());
            ids.insert(old.to_string(), fresh);
        }
        Ok(Self { ids })
    }

    fn get(&self, old: &str) -> Option<&str> {
        self.ids.get(old).map(String::as_str)
    }

    fn len(&self) -> usize {
        self.ids.len()
    }
}

fn fresh_id<F, E>(new_id: &mut F, mut exists: E) -> Result<String, RemapError>
where
    F: FnMut() -> String,
    E: FnMut(&str) -> bool,
{
    let mut last = String::new();
    for _ in 0..MAX_ID_ATTEMPTS {
        let candidate = new_id();
        if !exists(&candidate) {
            return Ok(candidate);
        }
        last = candidate;
    }
    Err(RemapError::IdCollision { candidate: last })
}

/// Resolution context for the fields of one record.
struct Scope<'a> {
    ids: &'a IdMap,
    collection: Collection,
    record_id: &'a str,
}

impl<'a> Scope<'a> {
    fn of<T: Record>(ids: &'a IdMap, record: &'a T) -> Self {
        Self {
            ids,
            collection: T::COLLECTION,
            record_id: record.id(),
        }
    }

    fn id(&self) -> Result<String, RemapError> {
        self.resolve("id", self.record_id)
    }

    fn strict(&self, field: &'static str, reference: &StrictRef) -> Result<StrictRef, RemapError> {
        self.resolve(field, reference.as_str()).map(StrictRef::new)
    }

    fn optional(&self, reference: &Option<OptionalRef>) -> Option<OptionalRef> {
        reference.as_ref().map(|target| {
            self.ids
                .get(target.as_str())
                .map_or_else(|| target.clone(), OptionalRef::new)
        })
    }

    fn list(&self, references: &RefList) -> RefList {
        RefList::new(
            references
                .iter()
                .map(|target| self.ids.get(target).unwrap_or(target)),
        )
    }

    fn resolve(&self, field: &'static str, target: &str) -> Result<String, RemapError> {
        self.ids
            .get(target)
            .map(str::to_string)
            .ok_or_else(|| RemapError::DanglingReference {
                collection: self.collection,
                record_id: self.record_id.to_string(),
                field,
                target: target.to_string(),
            })
    }
}

trait Remap: Record {
    fn remap(&self, ids: &IdMap, project_id: &str) -> Result<Self, RemapError>;
}

impl Remap for Chapter {
    fn remap(&self, ids: &IdMap, project_id: &str) -> Result<Self, RemapError> {
        let scope = Scope::of(ids, self);
        Ok(Self {
            id: scope.id()?,
            project_id: project_id.to_string(),
            ..self.clone()
        })
    }
}

impl Remap for Character {
    fn remap(&self, ids: &IdMap, project_id: &str) -> Result<Self, RemapError> {
        let scope = Scope::of(ids, self);
        Ok(Self {
            id: scope.id()?,
            project_id: project_id.to_string(),
            linked_character_ids: scope.list(&self.linked_character_ids),
            linked_location_ids: scope.list(&self.linked_location_ids),
            ..self.clone()
        })
    }
}

impl Remap for CharacterRelationship {
    fn remap(&self, ids: &IdMap, project_id: &str) -> Result<Self, RemapError> {
        let scope = Scope::of(ids, self);
        Ok(Self {
            id: scope.id()?,
            project_id: project_id.to_string(),
            source_character_id: scope.strict("sourceCharacterId", &self.source_character_id)?,
            target_character_id: scope.strict("targetCharacterId", &self.target_character_id)?,
            ..self.clone()
        })
    }
}

impl Remap for Location {
    fn remap(&self, ids: &IdMap, project_id: &str) -> Result<Self, RemapError> {
        let scope = Scope::of(ids, self);
        Ok(Self {
            id: scope.id()?,
            project_id: project_id.to_string(),
            parent_location_id: scope.optional(&self.parent_location_id),
            linked_character_ids: scope.list(&self.linked_character_ids),
            ..self.clone()
        })
    }
}

impl Remap for TimelineEvent {
    fn remap(&self, ids: &IdMap, project_id: &str) -> Result<Self, RemapError> {
        let scope = Scope::of(ids, self);
        Ok(Self {
            id: scope.id()?,
            project_id: project_id.to_string(),
            linked_chapter_ids: scope.list(&self.linked_chapter_ids),
            linked_character_ids: scope.list(&self.linked_character_ids),
            ..self.clone()
        })
    }
}

impl Remap for StyleGuideEntry {
    fn remap(&self, ids: &IdMap, project_id: &str) -> Result<Self, RemapError> {
        let scope = Scope::of(ids, self);
        Ok(Self {
            id: scope.id()?,
            project_id: project_id.to_string(),
            ..self.clone()
        })
    }
}

impl Remap for WorldbuildingDoc {
    fn remap(&self, ids: &IdMap, project_id: &str) -> Result<Self, RemapError> {
        let scope = Scope::of(ids, self);
        Ok(Self {
            id: scope.id()?,
            project_id: project_id.to_string(),
            parent_id: scope.optional(&self.parent_id),
            ..self.clone()
        })
    }
}

impl Remap for OutlineGridColumn {
    fn remap(&self, ids: &IdMap, project_id: &str) -> Result<Self, RemapError> {
        let scope = Scope::of(ids, self);
        Ok(Self {
            id: scope.id()?,
            project_id: project_id.to_string(),
            ..self.clone()
        })
    }
}

impl Remap for OutlineGridRow {
    fn remap(&self, ids: &IdMap, project_id: &str) -> Result<Self, RemapError> {
        let scope = Scope::of(ids, self);
        Ok(Self {
            id: scope.id()?,
            project_id: project_id.to_string(),
            linked_chapter_id: scope.optional(&self.linked_chapter_id),
            ..self.clone()
        })
    }
}

impl Remap for OutlineGridCell {
    fn remap(&self, ids: &IdMap, project_id: &str) -> Result<Self, RemapError> {
        let scope = Scope::of(ids, self);
        Ok(Self {
            id: scope.id()?,
            project_id: project_id.to_string(),
            row_id: scope.strict("rowId", &self.row_id)?,
            column_id: scope.strict("columnId", &self.column_id)?,
            ..self.clone()
        })
    }
}

impl Remap for WritingSprint {
    fn remap(&self, ids: &IdMap, project_id: &str) -> Result<Self, RemapError> {
        let scope = Scope::of(ids, self);
        Ok(Self {
            id: scope.id()?,
            project_id: project_id.to_string(),
            chapter_id: scope.optional(&self.chapter_id),
            ..self.clone()
        })
    }
}

impl Remap for WritingSession {
    fn remap(&self, ids: &IdMap, project_id: &str) -> Result<Self, RemapError> {
        let scope = Scope::of(ids, self);
        Ok(Self {
            id: scope.id()?,
            project_id: project_id.to_string(),
            chapter_id: scope.strict("chapterId", &self.chapter_id)?,
            ..self.clone()
        })
    }
}

impl Remap for PlaylistTrack {
    fn remap(&self, ids: &IdMap, project_id: &str) -> Result<Self, RemapError> {
        let scope = Scope::of(ids, self);
        Ok(Self {
            id: scope.id()?,
            project_id: project_id.to_string(),
            ..self.clone()
        })
    }
}

impl Remap for Comment {
    fn remap(&self, ids: &IdMap, project_id: &str) -> Result<Self, RemapError> {
        let scope = Scope::of(ids, self);
        Ok(Self {
            id: scope.id()?,
            project_id: project_id.to_string(),
            chapter_id: scope.strict("chapterId", &self.chapter_id)?,
            ..self.clone()
        })
    }
}

impl Remap for ChapterSnapshot {
    fn remap(&self, ids: &IdMap, project_id: &str) -> Result<Self, RemapError> {
        let scope = Scope::of(ids, self);
        Ok(Self {
            id: scope.id()?,
            project_id: project_id.to_string(),
            chapter_id: scope.strict("chapterId", &self.chapter_id)?,
            ..self.clone()
        })
    }
}

impl Remap for ProjectDictionary {
    fn remap(&self, ids: &IdMap, project_id: &str) -> Result<Self, RemapError> {
        let scope = Scope::of(ids, self);
        Ok(Self {
            id: scope.id()?,
            project_id: project_id.to_string(),
            ..self.clone()
        })
    }
}

fn remap_all<T: Remap>(records: &[T], ids: &IdMap, project_id: &str) -> Result<Vec<T>, RemapError> {
    records
        .iter()
        .map(|record| record.remap(ids, project_id))
        .collect()
}

/// Copies `graph` under a disjoint identifier space. Every id, project
/// reference, foreign key and id list is rewritten; the project title gets
/// the copy suffix; everything else is carried verbatim.
pub fn remap_graph<F>(graph: &ProjectGraph, mut new_id: F) -> Result<ProjectGraph, RemapError>
where
    F: FnMut() -> String,
{
    let ids = IdMap::allocate(graph, &mut new_id)?;
    let project_id = Scope::of(&ids, &graph.project).id()?;
    let project = Project {
        id: project_id.clone(),
        title: format!("{}{}", graph.project.title, COPY_SUFFIX),
        ..graph.project.clone()
    };

    let remapped = ProjectGraph {
        project,
        chapters: remap_all(&graph.chapters, &ids, &project_id)?,
        characters: remap_all(&graph.characters, &ids, &project_id)?,
        relationships: remap_all(&graph.relationships, &ids, &project_id)?,
        locations: remap_all(&graph.locations, &ids, &project_id)?,
        timeline_events: remap_all(&graph.timeline_events, &ids, &project_id)?,
        style_guide_entries: remap_all(&graph.style_guide_entries, &ids, &project_id)?,
        worldbuilding_docs: remap_all(&graph.worldbuilding_docs, &ids, &project_id)?,
        outline_grid_columns: remap_all(&graph.outline_grid_columns, &ids, &project_id)?,
        outline_grid_rows: remap_all(&graph.outline_grid_rows, &ids, &project_id)?,
        outline_grid_cells: remap_all(&graph.outline_grid_cells, &ids, &project_id)?,
        writing_sprints: remap_all(&graph.writing_sprints, &ids, &project_id)?,
        writing_sessions: remap_all(&graph.writing_sessions, &ids, &project_id)?,
        playlist_tracks: remap_all(&graph.playlist_tracks, &ids, &project_id)?,
        comments: remap_all(&graph.comments, &ids, &project_id)?,
        chapter_snapshots: remap_all(&graph.chapter_snapshots, &ids, &project_id)?,
        project_dictionary: graph
            .project_dictionary
            .as_ref()
            .map(|dictionary| dictionary.remap(&ids, &project_id))
            .transpose()?,
    };

    tracing::debug!(
        from = %graph.project.id,
        to = %remapped.project.id,
        records = ids.len(),
        "remapped project graph"
    );
    Ok(remapped)
}
