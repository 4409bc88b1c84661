//! In-memory document store.

use super::{DocumentStore, StoreResult};
use std::cell::RefCell;
use std::rc::Rc;

/// Keeps the document in a shared buffer.
///
/// Clones share the buffer, so a test can keep one clone and inspect what
/// the note set wrote through another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    bytes: Rc<RefCell<Option<Vec<u8>>>>,
    writes: Rc<RefCell<usize>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(bytes: impl Into<Vec<u8>>) -> Self {
        let store = Self::default();
        *store.bytes.borrow_mut() = Some(bytes.into());
        store
    }

    /// Last written (or seeded) document.
    pub fn contents(&self) -> Option<Vec<u8>> {
        self.bytes.borrow().clone()
    }

    pub fn write_count(&self) -> usize {
        *self.writes.borrow()
    }
}

impl DocumentStore for MemoryStore {
    fn read(&self) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.contents())
    }

    fn write(&mut self, bytes: &[u8]) -> StoreResult<()> {
        *self.bytes.borrow_mut() = Some(bytes.to_vec());
        *self.writes.borrow_mut() += 1;
        Ok(())
    }
}
