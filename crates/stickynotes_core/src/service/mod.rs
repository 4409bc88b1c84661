//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate model, codec, store and visual layer into note set
//!   operations.
//! - Keep UI and storage details out of callers.

pub mod note_set;
