//! Domain model for sticky notes.
//!
//! # Responsibility
//! - Define the note, category, settings and archive record shapes.
//! - Keep the persisted JSON shape and the in-memory shape in one place.
//!
//! # Invariants
//! - A note's category is empty or names a category of its owning set.
//! - Deletion relocates a note into the archive; it never erases it.

pub mod archive;
pub mod category;
pub mod note;
pub mod settings;
pub mod timestamp;
