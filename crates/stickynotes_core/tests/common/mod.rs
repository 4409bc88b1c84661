#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use stickynotes_core::model::timestamp::parse_timestamp;
use stickynotes_core::{
    FixedClock, MemoryStore, Note, NoteContent, NoteHandle, NoteProperties, NoteSet, Timestamp,
    VisualLayer,
};

/// Visual-layer call observed by `RecordingLayer`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Materialize,
    Show { reload: bool },
    Hide,
    Destroy,
    Flush,
}

/// On-screen state of one fake window.
#[derive(Debug, Clone, Default)]
pub struct Screen {
    pub body: String,
    pub properties: NoteProperties,
    pub visible: bool,
}

/// Visual layer that records calls and exposes its fake windows.
#[derive(Debug, Clone, Default)]
pub struct RecordingLayer {
    pub events: Rc<RefCell<Vec<Event>>>,
    pub screens: Rc<RefCell<Vec<Rc<RefCell<Screen>>>>>,
}

impl RecordingLayer {
    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    pub fn count(&self, event: &Event) -> usize {
        self.events.borrow().iter().filter(|e| *e == event).count()
    }

    pub fn screen(&self, index: usize) -> Rc<RefCell<Screen>> {
        Rc::clone(&self.screens.borrow()[index])
    }
}

impl VisualLayer for RecordingLayer {
    fn materialize(&mut self, note: &Note) -> Box<dyn NoteHandle> {
        self.events.borrow_mut().push(Event::Materialize);
        let screen = Rc::new(RefCell::new(Screen {
            body: note.body().to_string(),
            properties: note.properties().clone(),
            visible: true,
        }));
        self.screens.borrow_mut().push(Rc::clone(&screen));
        Box::new(RecordingHandle {
            events: Rc::clone(&self.events),
            screen,
        })
    }
}

struct RecordingHandle {
    events: Rc<RefCell<Vec<Event>>>,
    screen: Rc<RefCell<Screen>>,
}

impl NoteHandle for RecordingHandle {
    fn show(&mut self, content: &NoteContent, reload: bool) {
        self.events.borrow_mut().push(Event::Show { reload });
        let mut screen = self.screen.borrow_mut();
        if reload {
            screen.body = content.body.clone();
            screen.properties = content.properties.clone();
        }
        screen.visible = true;
    }

    fn hide(&mut self) {
        self.events.borrow_mut().push(Event::Hide);
        self.screen.borrow_mut().visible = false;
    }

    fn destroy(&mut self) {
        self.events.borrow_mut().push(Event::Destroy);
        self.screen.borrow_mut().visible = false;
    }

    fn flush_into(&mut self, content: &mut NoteContent) {
        self.events.borrow_mut().push(Event::Flush);
        let screen = self.screen.borrow();
        if screen.body != content.body {
            content.update(Some(screen.body.as_str()));
        }
        content.properties = screen.properties.clone();
    }

    fn properties(&self) -> NoteProperties {
        self.screen.borrow().properties.clone()
    }

    fn set_locked(&mut self, locked: bool) {
        self.screen.borrow_mut().properties.locked = Some(locked);
    }
}

pub type TestSet = NoteSet<RecordingLayer, MemoryStore, FixedClock>;

pub fn ts(value: &str) -> Timestamp {
    parse_timestamp(value).expect("fixture timestamp should parse")
}

pub const NOW: &str = "2024-06-15T12:00:00";

/// Empty, unloaded set pinned at `NOW`.
pub fn empty_set() -> (TestSet, RecordingLayer, MemoryStore) {
    let layer = RecordingLayer::default();
    let store = MemoryStore::new();
    let set = NoteSet::with_clock(layer.clone(), store.clone(), FixedClock(ts(NOW)));
    (set, layer, store)
}

/// Set decoded from `document`, pinned at `NOW`.
pub fn set_from(document: serde_json::Value) -> (TestSet, RecordingLayer, MemoryStore) {
    let (mut set, layer, store) = empty_set();
    set.decode(document.to_string().as_bytes())
        .expect("fixture document should decode");
    (set, layer, store)
}

/// Parses the last document written to `store`.
pub fn saved_json(store: &MemoryStore) -> serde_json::Value {
    let bytes = store.contents().expect("store should have been written");
    serde_json::from_slice(&bytes).expect("saved document should be JSON")
}
