use crate::domain::{
    Chapter, ChapterSnapshot, Character, CharacterRelationship, Comment, Location, OptionalRef,
    OutlineGridCell, OutlineGridColumn, OutlineGridRow, PlaylistTrack, Project, ProjectDictionary,
    ProjectGraph, RefList, StrictRef, StyleGuideEntry, TimelineEvent, WorldbuildingDoc,
    WritingSession, WritingSprint,
};

const AT: &str = "2026-03-01T09:00:00Z";

pub fn project(id: &str, title: &str) -> Project {
    Project {
        id: id.to_string(),
        title: title.to_string(),
        description: Some("A story about backups".to_string()),
        genre: Some("fantasy".to_string()),
        target_word_count: Some(80_000),
        created_at: AT.to_string(),
        updated_at: AT.to_string(),
    }
}

pub fn chapter(id: &str, project_id: &str, title: &str, order: i64) -> Chapter {
    Chapter {
        id: id.to_string(),
        project_id: project_id.to_string(),
        title: title.to_string(),
        content: format!("<p>{title} text</p>"),
        order,
        status: Some("draft".to_string()),
        word_count: 2,
        created_at: AT.to_string(),
        updated_at: AT.to_string(),
    }
}

pub fn character(id: &str, project_id: &str, name: &str) -> Character {
    Character {
        id: id.to_string(),
        project_id: project_id.to_string(),
        name: name.to_string(),
        role: Some("protagonist".to_string()),
        description: String::new(),
        notes: String::new(),
        linked_character_ids: RefList::default(),
        linked_location_ids: RefList::default(),
        created_at: AT.to_string(),
        updated_at: AT.to_string(),
    }
}

pub fn relationship(id: &str, project_id: &str, source: &str, target: &str) -> CharacterRelationship {
    CharacterRelationship {
        id: id.to_string(),
        project_id: project_id.to_string(),
        source_character_id: StrictRef::new(source),
        target_character_id: StrictRef::new(target),
        kind: "sibling".to_string(),
        description: String::new(),
        created_at: AT.to_string(),
    }
}

/// "Test Novel": one chapter, two characters, one relationship.
pub fn test_novel(project_id: &str, title: &str) -> ProjectGraph {
    let mut graph = ProjectGraph::new(project(project_id, title));
    let alice = format!("{project_id}-alice");
    let bob = format!("{project_id}-bob");
    graph.chapters.push(chapter(&format!("{project_id}-ch1"), project_id, "Chapter 1", 1));
    graph.characters.push(character(&alice, project_id, "Alice"));
    graph.characters.push(character(&bob, project_id, "Bob"));
    graph.relationships.push(relationship(
        &format!("{project_id}-rel1"),
        project_id,
        &alice,
        &bob,
    ));
    graph
}

/// A graph touching every collection and every reference kind, with ids
/// prefixed by `p`.
pub fn rich_graph(p: &str) -> ProjectGraph {
    let id = |suffix: &str| format!("{p}-{suffix}");
    let mut graph = ProjectGraph::new(project(p, "Rich Saga"));

    graph.chapters.push(chapter(&id("ch1"), p, "Opening", 1));
    graph.chapters.push(chapter(&id("ch2"), p, "Middle", 2));

    let mut hero = character(&id("hero"), p, "Hero");
    hero.linked_character_ids = RefList::new([id("mentor")]);
    hero.linked_location_ids = RefList::new([id("city"), id("tower")]);
    let mut mentor = character(&id("mentor"), p, "Mentor");
    mentor.linked_character_ids = RefList::new([id("hero")]);
    graph.characters.push(hero);
    graph.characters.push(mentor);
    graph
        .relationships
        .push(relationship(&id("rel1"), p, &id("hero"), &id("mentor")));

    graph.locations.push(Location {
        id: id("city"),
        project_id: p.to_string(),
        name: "City".to_string(),
        description: String::new(),
        parent_location_id: Some(OptionalRef::new(id("tower"))),
        linked_character_ids: RefList::new([id("hero")]),
        created_at: AT.to_string(),
        updated_at: AT.to_string(),
    });
    graph.locations.push(Location {
        id: id("tower"),
        project_id: p.to_string(),
        name: "Tower".to_string(),
        description: String::new(),
        parent_location_id: Some(OptionalRef::new(id("city"))),
        linked_character_ids: RefList::default(),
        created_at: AT.to_string(),
        updated_at: AT.to_string(),
    });

    graph.timeline_events.push(TimelineEvent {
        id: id("ev1"),
        project_id: p.to_string(),
        title: "The call".to_string(),
        description: String::new(),
        date: Some("Year 1".to_string()),
        order: 1,
        linked_chapter_ids: RefList::new([id("ch1"), id("ch2")]),
        linked_character_ids: RefList::new([id("hero")]),
        created_at: AT.to_string(),
    });
    graph.style_guide_entries.push(StyleGuideEntry {
        id: id("style1"),
        project_id: p.to_string(),
        category: "voice".to_string(),
        title: "Tense".to_string(),
        content: "Past tense, close third.".to_string(),
        created_at: AT.to_string(),
        updated_at: AT.to_string(),
    });
    graph.worldbuilding_docs.push(WorldbuildingDoc {
        id: id("doc-root"),
        project_id: p.to_string(),
        title: "Magic".to_string(),
        content: String::new(),
        category: Some("systems".to_string()),
        parent_id: None,
        created_at: AT.to_string(),
        updated_at: AT.to_string(),
    });
    graph.worldbuilding_docs.push(WorldbuildingDoc {
        id: id("doc-child"),
        project_id: p.to_string(),
        title: "Runes".to_string(),
        content: String::new(),
        category: None,
        parent_id: Some(OptionalRef::new(id("doc-root"))),
        created_at: AT.to_string(),
        updated_at: AT.to_string(),
    });

    graph.outline_grid_columns.push(OutlineGridColumn {
        id: id("col1"),
        project_id: p.to_string(),
        title: "Plot A".to_string(),
        order: 1,
        color: Some("#ffcc00".to_string()),
    });
    graph.outline_grid_rows.push(OutlineGridRow {
        id: id("row1"),
        project_id: p.to_string(),
        title: "Act I".to_string(),
        order: 1,
        linked_chapter_id: Some(OptionalRef::new(id("ch1"))),
    });
    graph.outline_grid_cells.push(OutlineGridCell {
        id: id("cell1"),
        project_id: p.to_string(),
        row_id: StrictRef::new(id("row1")),
        column_id: StrictRef::new(id("col1")),
        content: "Hero leaves home".to_string(),
        color: None,
    });

    graph.writing_sprints.push(WritingSprint {
        id: id("sprint1"),
        project_id: p.to_string(),
        chapter_id: Some(OptionalRef::new(id("ch2"))),
        started_at: AT.to_string(),
        ended_at: Some("2026-03-01T09:25:00Z".to_string()),
        duration_minutes: 25,
        target_words: Some(500),
        words_written: 480,
    });
    graph.writing_sessions.push(WritingSession {
        id: id("session1"),
        project_id: p.to_string(),
        chapter_id: StrictRef::new(id("ch1")),
        started_at: AT.to_string(),
        ended_at: None,
        word_count_start: 0,
        word_count_end: 2,
    });
    graph.playlist_tracks.push(PlaylistTrack {
        id: id("track1"),
        project_id: p.to_string(),
        title: "Theme".to_string(),
        url: "https://example.com/theme".to_string(),
        artist: None,
        order: 1,
    });
    graph.comments.push(Comment {
        id: id("comment1"),
        project_id: p.to_string(),
        chapter_id: StrictRef::new(id("ch2")),
        content: "Tighten this".to_string(),
        anchor_from: Some(3),
        anchor_to: Some(9),
        resolved: false,
        created_at: AT.to_string(),
    });
    graph.chapter_snapshots.push(ChapterSnapshot {
        id: id("snap1"),
        project_id: p.to_string(),
        chapter_id: StrictRef::new(id("ch1")),
        content: "<p>Opening draft</p>".to_string(),
        word_count: 2,
        label: Some("before edit".to_string()),
        created_at: AT.to_string(),
    });
    graph.project_dictionary = Some(ProjectDictionary {
        id: id("dict"),
        project_id: p.to_string(),
        words: vec!["Eldoria".to_string()],
        updated_at: AT.to_string(),
    });

    graph
}

/// Deterministic generator for remap tests.
pub fn sequential_ids(prefix: &str) -> impl FnMut() -> String {
    let prefix = prefix.to_string();
    let mut next = 0u32;
    move || {
        next += 1;
        format!("{prefix}{next}")
    }
}
