//! Document storage contracts and implementations.
//!
//! # Responsibility
//! - Move encoded document bytes to and from a persistent location.
//! - Keep file-system details out of the note set.
//!
//! # Invariants
//! - `write` is all-or-nothing: readers see the previous document or the
//!   new one, never a truncated mix.
//! - A location that has never been written reads as `None`.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug)]
pub enum StoreError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "note store I/O failed at `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
        }
    }
}

/// Persistent location for one encoded note set document.
pub trait DocumentStore {
    /// Reads the stored document, `None` when nothing was stored yet.
    fn read(&self) -> StoreResult<Option<Vec<u8>>>;
    /// Atomically replaces the stored document.
    fn write(&mut self, bytes: &[u8]) -> StoreResult<()>;
}
