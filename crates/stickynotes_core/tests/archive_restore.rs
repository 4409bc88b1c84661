mod common;

use common::{saved_json, set_from, ts, Event, NOW};
use serde_json::json;
use stickynotes_core::{FixedClock, NoteId, NoteSetError};

#[test]
fn archive_then_restore_round_trips_the_note() {
    let (mut set, layer, store) = set_from(json!({
        "categories": {"work": {}},
        "notes": [{
            "id": "a",
            "body": "remember the milk",
            "last_modified": "2024-06-01T10:00:00",
            "properties": {"position": [5, 6], "locked": true},
            "category": "work"
        }]
    }));
    let id = NoteId::from("a");
    set.show_note(&id, false).unwrap();

    set.archive_note(&id).unwrap();
    assert!(set.notes().is_empty());
    assert_eq!(layer.count(&Event::Destroy), 1);
    let archived = &set.archived_notes()[0];
    assert_eq!(archived.deleted_at(), Some(NOW));
    assert_eq!(archived.body(), "remember the milk");
    assert_eq!(store.write_count(), 0);

    let restored = set.restore_note(&id).unwrap().unwrap();
    assert!(!restored.is_attached());
    assert_eq!(restored.body(), "remember the milk");
    assert_eq!(restored.category(), "work");
    assert_eq!(restored.properties().position, Some((5, 6)));
    assert_eq!(restored.last_modified(), ts("2024-06-01T10:00:00"));
    assert!(set.archived_notes().is_empty());

    let saved = saved_json(&store);
    assert_eq!(saved["archived_notes"], json!([]));
    assert_eq!(saved["notes"][0]["id"], "a");
    assert!(saved["notes"][0].get("deleted_at").is_none());
}

#[test]
fn archiving_flushes_on_screen_edits_first() {
    let (mut set, layer, _) = set_from(json!({"notes": [{"id": "a", "body": "old"}]}));
    let id = NoteId::from("a");
    set.show_note(&id, false).unwrap();
    layer.screen(0).borrow_mut().body = "edited".to_string();

    set.archive_note(&id).unwrap();
    assert_eq!(set.archived_notes()[0].body(), "edited");
}

#[test]
fn delete_note_archives_and_saves() {
    let (mut set, _, store) = set_from(json!({"notes": [{"id": "a"}, {"id": "b"}]}));
    set.delete_note(&NoteId::from("a")).unwrap();

    assert_eq!(store.write_count(), 1);
    let saved = saved_json(&store);
    assert_eq!(saved["notes"].as_array().unwrap().len(), 1);
    assert_eq!(saved["archived_notes"][0]["id"], "a");
    assert_eq!(saved["archived_notes"][0]["deleted_at"], NOW);
}

#[test]
fn archiving_an_unknown_note_fails() {
    let (mut set, _, _) = set_from(json!({}));
    let err = set.archive_note(&NoteId::from("ghost")).unwrap_err();
    assert!(matches!(err, NoteSetError::NoteNotFound(_)));
}

#[test]
fn restore_of_absent_id_is_empty() {
    let (mut set, _, store) = set_from(json!({
        "archived_notes": [{"id": "x", "deleted_at": "2024-06-14T00:00:00"}]
    }));
    assert!(set.restore_note(&NoteId::from("missing")).unwrap().is_none());
    assert_eq!(set.archived_notes().len(), 1);
    assert_eq!(store.write_count(), 0);
}

#[test]
fn restore_clears_a_category_deleted_in_the_meantime() {
    let (mut set, _, _) = set_from(json!({
        "archived_notes": [{"id": "x", "category": "gone", "deleted_at": "2024-06-14T00:00:00"}]
    }));
    let restored = set.restore_note(&NoteId::from("x")).unwrap().unwrap();
    assert_eq!(restored.category(), "");
}

#[test]
fn purge_is_idempotent() {
    let (mut set, _, store) = set_from(json!({
        "archived_notes": [
            {"id": "x", "deleted_at": "2024-06-14T00:00:00"},
            {"id": "y", "deleted_at": "2024-06-14T00:00:00"}
        ]
    }));
    let id = NoteId::from("x");

    assert!(set.purge_archived(&id).unwrap());
    assert!(!set.purge_archived(&id).unwrap());
    assert_eq!(store.write_count(), 1);
    assert_eq!(set.archived_notes().len(), 1);
    assert_eq!(saved_json(&store)["archived_notes"][0]["id"], "y");
}

#[test]
fn load_drops_records_past_retention() {
    let (set, _, _) = set_from(json!({
        "properties": {"trash_retention_days": 7},
        "archived_notes": [
            {"id": "old", "deleted_at": "2024-06-07T12:00:00"},
            {"id": "recent", "deleted_at": "2024-06-09T12:00:00"},
            {"id": "boundary", "deleted_at": "2024-06-08T12:00:00"}
        ]
    }));

    let ids: Vec<_> = set
        .archived_notes()
        .iter()
        .filter_map(|record| record.id())
        .collect();
    assert_eq!(ids, vec!["recent"]);
}

#[test]
fn malformed_deleted_at_expires_like_a_legacy_record() {
    let (set, _, _) = set_from(json!({
        "archived_notes": [
            {"id": "numeric", "deleted_at": 12345},
            {"id": "listy", "deleted_at": ["2024-06-14"]},
            {"id": "fresh", "deleted_at": "2024-06-14T00:00:00"}
        ]
    }));
    let ids: Vec<_> = set.archived_notes().iter().filter_map(|r| r.id()).collect();
    assert_eq!(ids, vec!["fresh"]);
}

#[test]
fn unreadable_archived_note_stays_archived_on_restore() {
    let (mut set, _, store) = set_from(json!({
        "archived_notes": [{"id": "x", "body": 42, "deleted_at": "2024-06-14T00:00:00"}]
    }));

    assert!(set.restore_note(&NoteId::from("x")).is_err());
    assert_eq!(set.archived_notes().len(), 1);
    assert!(set.notes().is_empty());
    assert_eq!(store.write_count(), 0);
}

#[test]
fn zero_retention_keeps_everything() {
    let (set, _, _) = set_from(json!({
        "properties": {"trash_retention_days": 0},
        "archived_notes": [
            {"id": "ancient", "deleted_at": "2001-01-01T00:00:00"},
            {"id": "undated"}
        ]
    }));
    assert_eq!(set.archived_notes().len(), 2);
}

#[test]
fn undated_records_expire_under_positive_retention() {
    let (set, _, _) = set_from(json!({
        "archived_notes": [
            {"id": "undated"},
            {"id": "fresh", "deleted_at": "2024-06-15T11:00:00"}
        ]
    }));
    assert_eq!(set.archived_notes().len(), 1);
    assert_eq!(set.archived_notes()[0].body(), "");
}

#[test]
fn expiry_follows_the_clock() {
    let (mut set, _, _) = set_from(json!({
        "properties": {"trash_retention_days": 7},
        "archived_notes": [{"id": "x", "deleted_at": "2024-06-10T12:00:00"}]
    }));
    assert_eq!(set.expire_archived(), 0);

    *set.clock_mut() = FixedClock(ts("2024-06-17T12:00:00"));
    assert_eq!(set.expire_archived(), 1);
    assert!(set.archived_notes().is_empty());
}

#[test]
fn archive_listing_projections() {
    let (set, _, _) = set_from(json!({
        "archived_notes": [{
            "id": "x",
            "body": "line one\n\tline two",
            "deleted_at": "2024-06-14T09:05:59"
        }]
    }));
    let record = &set.archived_notes()[0];
    assert_eq!(record.preview(), "line one line two");
    assert_eq!(record.deleted_at_display().as_deref(), Some("2024-06-14 09:05"));
}
