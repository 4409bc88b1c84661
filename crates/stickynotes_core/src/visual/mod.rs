//! Capability interface towards the visual layer.
//!
//! # Responsibility
//! - Describe what the core needs from whatever draws notes on screen.
//! - Keep windowing toolkits out of the core crate.
//!
//! # Invariants
//! - A handle belongs to exactly one note and is dropped after `destroy`.
//! - All calls happen on the thread that owns the note set.

mod headless;

pub use headless::{HeadlessHandle, HeadlessLayer};

use crate::model::note::{Note, NoteContent, NoteProperties};

/// Factory for visual representations.
pub trait VisualLayer {
    /// Creates and shows a representation of `note`.
    fn materialize(&mut self, note: &Note) -> Box<dyn NoteHandle>;
}

/// One materialized note.
pub trait NoteHandle {
    /// Shows the representation again.
    ///
    /// With `reload = true` the handle must discard its cached state and
    /// re-read `content`, which is authoritative after a merge.
    fn show(&mut self, content: &NoteContent, reload: bool);
    fn hide(&mut self);
    fn destroy(&mut self);
    /// Writes on-screen body/properties back into the note.
    fn flush_into(&mut self, content: &mut NoteContent);
    /// Current position/size/locked state as seen by the visual layer.
    fn properties(&self) -> NoteProperties;
    fn set_locked(&mut self, locked: bool);
}
