//! Window-less visual layer for CLI use and tests.

use super::{NoteHandle, VisualLayer};
use crate::model::note::{Note, NoteContent, NoteProperties};

/// Visual layer that keeps note state without drawing anything.
#[derive(Debug, Default)]
pub struct HeadlessLayer {
    materialized: usize,
}

impl HeadlessLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of handles created so far.
    pub fn materialized(&self) -> usize {
        self.materialized
    }
}

impl VisualLayer for HeadlessLayer {
    fn materialize(&mut self, note: &Note) -> Box<dyn NoteHandle> {
        self.materialized += 1;
        Box::new(HeadlessHandle::new(note.properties().clone()))
    }
}

/// Handle of `HeadlessLayer`. Owns the lock flag like a real window would.
#[derive(Debug, Clone)]
pub struct HeadlessHandle {
    properties: NoteProperties,
    visible: bool,
}

impl HeadlessHandle {
    pub fn new(properties: NoteProperties) -> Self {
        Self {
            properties,
            visible: true,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

impl NoteHandle for HeadlessHandle {
    fn show(&mut self, content: &NoteContent, reload: bool) {
        if reload {
            self.properties = content.properties.clone();
        }
        self.visible = true;
    }

    fn hide(&mut self) {
        self.visible = false;
    }

    fn destroy(&mut self) {
        self.visible = false;
    }

    fn flush_into(&mut self, content: &mut NoteContent) {
        content.properties = self.properties.clone();
    }

    fn properties(&self) -> NoteProperties {
        self.properties.clone()
    }

    fn set_locked(&mut self, locked: bool) {
        self.properties.locked = Some(locked);
    }
}
