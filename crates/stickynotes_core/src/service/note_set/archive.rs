//! Soft-delete, restore and retention for the note set.
//!
//! # Invariants
//! - Archiving relocates a note; its data is never dropped at that point.
//! - Only `expire_archived` and `purge_archived` remove archived data.
//! - Restoring an id that is not archived is an empty result, not an error.

use super::{NoteSet, NoteSetError, NoteSetResult};
use crate::model::archive::ArchivedNote;
use crate::model::note::{Note, NoteId};
use crate::model::timestamp::{days_before, Clock, Timestamp};
use crate::store::DocumentStore;
use crate::visual::VisualLayer;
use log::info;

/// Drops archived records deleted at or before `now - retention_days`.
///
/// `retention_days <= 0` keeps everything. Returns the number of records
/// dropped.
pub fn expire_archived(
    records: &mut Vec<ArchivedNote>,
    now: Timestamp,
    retention_days: i64,
) -> usize {
    if retention_days <= 0 {
        return 0;
    }
    let Some(cutoff) = days_before(now, retention_days) else {
        return 0;
    };

    let before = records.len();
    records.retain(|record| record.deleted_at_or_epoch() > cutoff);
    before - records.len()
}

impl<L: VisualLayer, S: DocumentStore, C: Clock> NoteSet<L, S, C> {
    /// Moves a live note into the archive without saving.
    ///
    /// The note is flushed and snapshotted, stamped with the current time,
    /// and its visual representation is destroyed.
    pub fn archive_note(&mut self, id: &NoteId) -> NoteSetResult<()> {
        let index = self
            .position(id)
            .ok_or_else(|| NoteSetError::NoteNotFound(id.clone()))?;

        let record = self.notes[index].extract();
        let archived = ArchivedNote::stamp(record, self.clock.now())?;
        let mut note = self.notes.remove(index);
        note.detach();
        self.archived_notes.push(archived);

        info!(
            "event=note_archive module=noteset status=ok archived={}",
            self.archived_notes.len()
        );
        Ok(())
    }

    /// Archives a note and saves.
    pub fn delete_note(&mut self, id: &NoteId) -> NoteSetResult<()> {
        self.archive_note(id)?;
        self.save()
    }

    /// Applies the configured retention period to the archive.
    pub fn expire_archived(&mut self) -> usize {
        let retention_days = self.properties.trash_retention_days();
        let expired = expire_archived(&mut self.archived_notes, self.clock.now(), retention_days);
        if expired > 0 {
            info!(
                "event=archive_expire module=noteset status=ok expired={} retention_days={}",
                expired, retention_days
            );
        }
        expired
    }

    /// Archived records in archive order.
    pub fn archived_notes(&self) -> &[ArchivedNote] {
        &self.archived_notes
    }

    /// Moves an archived record back into the live set and saves.
    ///
    /// Returns `Ok(None)` when no archived record has this id. The restored
    /// note is detached; callers show it through `show_note`. A record whose
    /// note fields cannot be read stays in the archive and the error is
    /// returned.
    pub fn restore_note(&mut self, id: &NoteId) -> NoteSetResult<Option<&mut Note>> {
        let Some(index) = self
            .archived_notes
            .iter()
            .position(|record| record.id() == Some(id.as_str()))
        else {
            info!("event=note_restore module=noteset status=ok found=false");
            return Ok(None);
        };

        let record = self.archived_notes[index].note_record()?;
        let note = Note::from_record(record, &self.categories)?;
        self.archived_notes.remove(index);
        self.notes.push(note);
        self.save()?;

        info!("event=note_restore module=noteset status=ok found=true");
        Ok(self.notes.last_mut())
    }

    /// Permanently removes archived records with this id and saves.
    ///
    /// Returns whether anything was removed; an absent id is a no-op.
    pub fn purge_archived(&mut self, id: &NoteId) -> NoteSetResult<bool> {
        let before = self.archived_notes.len();
        self.archived_notes
            .retain(|record| record.id() != Some(id.as_str()));
        let purged = before - self.archived_notes.len();
        if purged == 0 {
            return Ok(false);
        }

        self.save()?;
        info!(
            "event=archive_purge module=noteset status=ok purged={}",
            purged
        );
        Ok(true)
    }
}
