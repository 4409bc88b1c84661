//! One-directional merge of an external document into the live set.
//!
//! # Invariants
//! - Fields present in the incoming payload win; absent fields never clear
//!   local data.
//! - Local notes and categories missing from the payload are kept.
//! - Local visual edits are flushed and saved before anything is
//!   overwritten.
//! - A payload that fails to decode, or carries a note that cannot be
//!   read, leaves the set untouched.

use super::{NoteSet, NoteSetResult};
use crate::codec::decode_document;
use crate::model::note::{Note, NoteId};
use crate::model::timestamp::Clock;
use crate::store::DocumentStore;
use crate::visual::VisualLayer;
use log::{error, info};
use std::collections::HashMap;
use std::time::Instant;

/// Counts reported by `NoteSet::merge`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSummary {
    /// Incoming records applied to an existing note.
    pub updated: usize,
    /// Incoming records that became new notes.
    pub created: usize,
    pub categories: usize,
}

#[derive(Debug, Clone, Copy)]
enum Target {
    Local(usize),
    Staged(usize),
}

impl<L: VisualLayer, S: DocumentStore, C: Clock> NoteSet<L, S, C> {
    /// Applies an externally supplied document onto this set.
    ///
    /// Categories are shallow-merged by key. Each incoming note updates the
    /// local note with the same id field by field, or becomes a new note.
    /// The whole payload is checked before local notes are hidden and saved,
    /// so a rejected payload leaves the set as it was. All notes are then
    /// re-shown with `reload = true` and the set is saved.
    pub fn merge(&mut self, incoming: &[u8]) -> NoteSetResult<MergeSummary> {
        let started_at = Instant::now();
        let document = match decode_document(incoming) {
            Ok(document) => document,
            Err(err) => {
                error!(
                    "event=noteset_merge module=noteset status=error error_code=decode_failed error={}",
                    err
                );
                return Err(err.into());
            }
        };

        let mut summary = MergeSummary {
            categories: document.categories.len(),
            ..MergeSummary::default()
        };
        let mut categories = self.categories.clone();
        categories.extend(document.categories);

        // Notes without an id cannot match an incoming record.
        let mut index: HashMap<NoteId, Target> = self
            .notes
            .iter()
            .enumerate()
            .filter_map(|(position, note)| Some((note.id()?.clone(), Target::Local(position))))
            .collect();
        let mut updates = Vec::new();
        let mut staged: Vec<Note> = Vec::new();

        for mut record in document.notes {
            let id = record.id.get_or_insert_with(NoteId::generate).clone();
            match index.get(&id).copied() {
                Some(Target::Local(position)) => {
                    updates.push((position, record));
                    summary.updated += 1;
                }
                Some(Target::Staged(position)) => {
                    staged[position].merge_fields(record, &categories);
                }
                None => {
                    let note = match Note::from_record(record, &categories) {
                        Ok(note) => note,
                        Err(err) => {
                            error!(
                                "event=noteset_merge module=noteset status=error error_code=invalid_note error={}",
                                err
                            );
                            return Err(err.into());
                        }
                    };
                    staged.push(note);
                    index.insert(id, Target::Staged(staged.len() - 1));
                    summary.created += 1;
                }
            }
        }

        self.hide_all()?;

        self.categories = categories;
        for (position, record) in updates {
            self.notes[position].merge_fields(record, &self.categories);
        }
        self.notes.extend(staged);

        self.show_all(true);
        self.save()?;

        info!(
            "event=noteset_merge module=noteset status=ok updated={} created={} categories={} duration_ms={}",
            summary.updated,
            summary.created,
            summary.categories,
            started_at.elapsed().as_millis()
        );
        Ok(summary)
    }
}
