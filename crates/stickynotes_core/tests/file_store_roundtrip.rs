use stickynotes_core::{DocumentStore, FileStore, HeadlessLayer, NoteId, NoteSet, NoteSetError};

#[test]
fn saved_file_reloads_into_a_new_set() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("indicator-stickynotes");

    let mut first = NoteSet::new(HeadlessLayer::new(), FileStore::new(&path));
    first.load().unwrap();
    assert_eq!(first.notes().len(), 1);
    let note = first.create_note();
    note.update(Some("persist me"));
    note.set_locked(true);
    let id = note.ensure_id().clone();
    first.set_trash_retention_days(14);
    let scratch = first.create_note().ensure_id().clone();
    first.delete_note(&scratch).unwrap();

    let mut second = NoteSet::new(HeadlessLayer::new(), FileStore::new(&path));
    second.load().unwrap();
    let reloaded = second.note(&id).unwrap();
    assert_eq!(reloaded.body(), "persist me");
    assert!(reloaded.is_locked());
    assert_eq!(second.trash_retention_days(), 14);
    assert_eq!(second.notes().len(), 2);
    assert_eq!(second.archived_notes()[0].id(), Some(scratch.as_str()));
}

#[test]
fn corrupt_file_fails_to_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.json");
    std::fs::write(&path, b"{ not json").unwrap();

    let mut set = NoteSet::new(HeadlessLayer::new(), FileStore::new(&path));
    let err = set.load().unwrap_err();
    assert!(matches!(err, NoteSetError::Codec(_)));
    assert!(set.notes().is_empty());
    assert_eq!(
        FileStore::new(&path).read().unwrap().as_deref(),
        Some(&b"{ not json"[..])
    );
}
