//! Core state management for sticky notes.
//! This crate is the single source of truth for note set invariants.

pub mod codec;
pub mod config;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;
pub mod visual;

pub use codec::{decode_document, encode_document, CodecError, NoteDocument};
pub use config::{AppConfig, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingConfig, LoggingError};
pub use model::archive::ArchivedNote;
pub use model::category::{
    Category, CategoryError, CategoryMap, CategoryProperty, CategoryResolver,
};
pub use model::note::{Attachment, Note, NoteContent, NoteId, NoteProperties, NoteRecord};
pub use model::settings::GlobalProperties;
pub use model::timestamp::{Clock, FixedClock, SystemClock, Timestamp};
pub use service::note_set::{MergeSummary, NoteSet, NoteSetError, NoteSetResult};
pub use store::{DocumentStore, FileStore, MemoryStore, StoreError};
pub use visual::{HeadlessLayer, NoteHandle, VisualLayer};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
