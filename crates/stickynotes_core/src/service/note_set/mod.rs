//! Note set aggregate root.
//!
//! # Responsibility
//! - Own all live notes, archived records, categories and global settings.
//! - Orchestrate load/save through the codec and the document store.
//! - Drive the visual layer for bulk show/hide.
//!
//! # Invariants
//! - Every live note's category is empty or a key of `categories`.
//! - `trash_retention_days` and `confirm_delete` are set after any load.
//! - The set is single-owner state: every mutator takes `&mut self`, so
//!   concurrent drivers must funnel calls through one owner.
//!
//! # See also
//! - `archive` for soft-delete, restore and retention.
//! - `merge` for applying an externally supplied document.

mod archive;
mod merge;

pub use archive::expire_archived;
pub use merge::MergeSummary;

use crate::codec::{decode_document, encode_document, latest_version, CodecError, NoteDocument};
use crate::model::archive::ArchivedNote;
use crate::model::category::{coerce_category, Category, CategoryError, CategoryMap, CategoryResolver};
use crate::model::note::{Note, NoteId};
use crate::model::settings::GlobalProperties;
use crate::model::timestamp::{Clock, SystemClock};
use crate::store::{DocumentStore, StoreError};
use crate::visual::VisualLayer;
use log::{error, info};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;
use uuid::Uuid;

pub type NoteSetResult<T> = Result<T, NoteSetError>;

/// Error for note set operations.
#[derive(Debug)]
pub enum NoteSetError {
    /// Document could not be decoded or encoded.
    Codec(CodecError),
    /// Document could not be read or written.
    Store(StoreError),
    /// Category property lookup failed.
    Category(CategoryError),
    /// No live note has this id.
    NoteNotFound(NoteId),
    CategoryNotFound(String),
}

impl Display for NoteSetError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Codec(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::Category(err) => write!(f, "{err}"),
            Self::NoteNotFound(id) => write!(f, "note not found: {id}"),
            Self::CategoryNotFound(id) => write!(f, "category not found: {id}"),
        }
    }
}

impl Error for NoteSetError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Codec(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::Category(err) => Some(err),
            Self::NoteNotFound(_) | Self::CategoryNotFound(_) => None,
        }
    }
}

impl From<CodecError> for NoteSetError {
    fn from(value: CodecError) -> Self {
        Self::Codec(value)
    }
}

impl From<StoreError> for NoteSetError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<CategoryError> for NoteSetError {
    fn from(value: CategoryError) -> Self {
        Self::Category(value)
    }
}

/// The note set: single owning context for notes and their settings.
pub struct NoteSet<L: VisualLayer, S: DocumentStore, C: Clock = SystemClock> {
    notes: Vec<Note>,
    archived_notes: Vec<ArchivedNote>,
    categories: CategoryMap,
    properties: GlobalProperties,
    layer: L,
    store: S,
    clock: C,
}

impl<L: VisualLayer, S: DocumentStore> NoteSet<L, S, SystemClock> {
    /// Creates an empty, unloaded set using the system clock.
    pub fn new(layer: L, store: S) -> Self {
        Self::with_clock(layer, store, SystemClock)
    }
}

impl<L: VisualLayer, S: DocumentStore, C: Clock> NoteSet<L, S, C> {
    pub fn with_clock(layer: L, store: S, clock: C) -> Self {
        Self {
            notes: Vec::new(),
            archived_notes: Vec::new(),
            categories: CategoryMap::new(),
            properties: GlobalProperties::default(),
            layer,
            store,
            clock,
        }
    }

    pub fn layer(&self) -> &L {
        &self.layer
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    // ---- load / save ----------------------------------------------------

    /// Replaces the set's state with the decoded document.
    ///
    /// Fills default settings, clears dangling note categories, then drops
    /// archived records past their retention period. On error the current
    /// state is left untouched.
    pub fn decode(&mut self, bytes: &[u8]) -> NoteSetResult<()> {
        let document = decode_document(bytes)?;

        let mut properties = document.properties;
        properties.apply_defaults();
        let categories = document.categories;
        let notes = document
            .notes
            .into_iter()
            .map(|record| Note::from_record(record, &categories))
            .collect::<Result<Vec<_>, _>>()?;

        for note in &mut self.notes {
            note.detach();
        }
        self.properties = properties;
        self.categories = categories;
        self.notes = notes;
        self.archived_notes = document.archived_notes;

        let expired = self.expire_archived();
        info!(
            "event=noteset_decode module=noteset status=ok notes={} archived={} categories={} expired={}",
            self.notes.len(),
            self.archived_notes.len(),
            self.categories.len(),
            expired
        );
        Ok(())
    }

    /// Encodes the whole set.
    ///
    /// Flushes attached notes and assigns ids to notes that lack one.
    pub fn encode(&mut self) -> NoteSetResult<Vec<u8>> {
        let document = NoteDocument {
            schema_version: latest_version(),
            notes: self.notes.iter_mut().map(Note::extract).collect(),
            archived_notes: self.archived_notes.clone(),
            properties: self.properties.clone(),
            categories: self.categories.clone(),
        };
        Ok(encode_document(&document)?)
    }

    /// Loads from the store; starts fresh when nothing was stored yet.
    pub fn load(&mut self) -> NoteSetResult<()> {
        let started_at = Instant::now();
        let stored = match self.store.read() {
            Ok(stored) => stored,
            Err(err) => {
                error!(
                    "event=noteset_load module=noteset status=error error_code=store_read_failed error={}",
                    err
                );
                return Err(err.into());
            }
        };

        match stored {
            Some(bytes) => {
                if let Err(err) = self.decode(&bytes) {
                    error!(
                        "event=noteset_load module=noteset status=error error_code=decode_failed error={}",
                        err
                    );
                    return Err(err);
                }
            }
            None => self.load_fresh()?,
        }

        info!(
            "event=noteset_load module=noteset status=ok duration_ms={}",
            started_at.elapsed().as_millis()
        );
        Ok(())
    }

    /// Resets to an empty document holding one new default note.
    pub fn load_fresh(&mut self) -> NoteSetResult<()> {
        self.decode(b"{}")?;
        self.create_note();
        info!("event=noteset_fresh module=noteset status=ok");
        Ok(())
    }

    /// Encodes and atomically writes the set to the store.
    pub fn save(&mut self) -> NoteSetResult<()> {
        let bytes = self.encode()?;
        self.store.write(&bytes)?;
        Ok(())
    }

    // ---- live notes -----------------------------------------------------

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn note(&self, id: &NoteId) -> Option<&Note> {
        self.notes.iter().find(|note| note.id() == Some(id))
    }

    pub fn note_mut(&mut self, id: &NoteId) -> Option<&mut Note> {
        self.notes.iter_mut().find(|note| note.id() == Some(id))
    }

    fn position(&self, id: &NoteId) -> Option<usize> {
        self.notes.iter().position(|note| note.id() == Some(id))
    }

    /// Creates an empty note in the default category and shows it.
    pub fn create_note(&mut self) -> &mut Note {
        let category = coerce_category(
            &self.categories,
            self.properties.default_category().unwrap_or(""),
        );
        let index = self.notes.len();
        self.notes.push(Note::new(category));

        let note = &mut self.notes[index];
        note.show(&mut self.layer, false);
        note
    }

    /// Shows one note, materializing it if needed.
    pub fn show_note(&mut self, id: &NoteId, reload: bool) -> NoteSetResult<()> {
        let index = self
            .position(id)
            .ok_or_else(|| NoteSetError::NoteNotFound(id.clone()))?;
        self.notes[index].show(&mut self.layer, reload);
        Ok(())
    }

    pub fn hide_note(&mut self, id: &NoteId) -> NoteSetResult<()> {
        let note = self
            .note_mut(id)
            .ok_or_else(|| NoteSetError::NoteNotFound(id.clone()))?;
        note.hide();
        Ok(())
    }

    /// Moves a note to another category (`""` un-categorizes it).
    pub fn set_note_category(&mut self, id: &NoteId, category: &str) -> NoteSetResult<()> {
        if !category.is_empty() && !self.categories.contains_key(category) {
            return Err(NoteSetError::CategoryNotFound(category.to_string()));
        }
        let index = self
            .position(id)
            .ok_or_else(|| NoteSetError::NoteNotFound(id.clone()))?;
        self.notes[index].set_category(&self.categories, category);
        Ok(())
    }

    /// Materializes or re-shows every live note.
    pub fn show_all(&mut self, reload: bool) {
        for note in &mut self.notes {
            note.show(&mut self.layer, reload);
        }
        self.properties.all_visible = Some(true);
    }

    /// Hides every live note and saves.
    ///
    /// Pending visual edits are flushed into the notes by the save.
    pub fn hide_all(&mut self) -> NoteSetResult<()> {
        self.properties.all_visible = Some(false);
        self.save()?;
        for note in &mut self.notes {
            note.hide();
        }
        Ok(())
    }

    // ---- settings -------------------------------------------------------

    pub fn properties(&self) -> &GlobalProperties {
        &self.properties
    }

    pub fn trash_retention_days(&self) -> i64 {
        self.properties.trash_retention_days()
    }

    pub fn set_trash_retention_days(&mut self, days: i64) {
        self.properties.trash_retention_days = Some(days);
        info!(
            "event=settings_update module=noteset status=ok key=trash_retention_days value={}",
            days
        );
    }

    pub fn confirm_delete(&self) -> bool {
        self.properties.confirm_delete()
    }

    pub fn set_confirm_delete(&mut self, confirm: bool) {
        self.properties.confirm_delete = Some(confirm);
    }

    pub fn all_visible(&self) -> bool {
        self.properties.all_visible.unwrap_or(false)
    }

    // ---- categories -----------------------------------------------------

    pub fn categories(&self) -> &CategoryMap {
        &self.categories
    }

    /// Property resolver bound to this set's categories and default.
    pub fn resolver(&self) -> CategoryResolver<'_> {
        CategoryResolver::new(&self.categories, self.properties.default_category())
    }

    pub fn category_property(&self, category_id: &str, property: &str) -> NoteSetResult<Value> {
        self.resolver()
            .resolve(category_id, property)
            .map_err(|err| {
                error!(
                    "event=category_resolve module=noteset status=error property={}",
                    property
                );
                err.into()
            })
    }

    /// Adds an empty category under a fresh id and returns the id.
    pub fn create_category(&mut self) -> String {
        let id = Uuid::new_v4().to_string();
        self.categories.insert(id.clone(), Category::default());
        info!("event=category_create module=noteset status=ok category={}", id);
        id
    }

    /// Adds or replaces a category under `id`.
    pub fn insert_category(&mut self, id: impl Into<String>, category: Category) {
        self.categories.insert(id.into(), category);
    }

    fn category_entry(&mut self, id: &str) -> NoteSetResult<&mut Category> {
        self.categories
            .get_mut(id)
            .ok_or_else(|| NoteSetError::CategoryNotFound(id.to_string()))
    }

    pub fn rename_category(&mut self, id: &str, name: impl Into<String>) -> NoteSetResult<()> {
        self.category_entry(id)?.name = Some(name.into());
        Ok(())
    }

    pub fn set_category_background(&mut self, id: &str, hsv: [f64; 3]) -> NoteSetResult<()> {
        self.category_entry(id)?.bgcolor_hsv = Some(hsv);
        Ok(())
    }

    pub fn set_category_text_color(&mut self, id: &str, rgb: [f64; 3]) -> NoteSetResult<()> {
        self.category_entry(id)?.textcolor = Some(rgb);
        Ok(())
    }

    pub fn set_category_font(&mut self, id: &str, font: impl Into<String>) -> NoteSetResult<()> {
        self.category_entry(id)?.font = Some(font.into());
        Ok(())
    }

    /// Makes `id` the category for newly created notes.
    pub fn set_default_category(&mut self, id: &str) -> NoteSetResult<()> {
        if !self.categories.contains_key(id) {
            return Err(NoteSetError::CategoryNotFound(id.to_string()));
        }
        self.properties.default_cat = Some(id.to_string());
        Ok(())
    }

    /// Removes a category. Notes in it become uncategorized and a matching
    /// default is cleared. Returns whether the category existed.
    pub fn delete_category(&mut self, id: &str) -> bool {
        if self.categories.remove(id).is_none() {
            return false;
        }
        for note in &mut self.notes {
            note.revalidate_category(&self.categories);
        }
        if self.properties.default_cat.as_deref() == Some(id) {
            self.properties.default_cat = None;
        }
        info!("event=category_delete module=noteset status=ok category={}", id);
        true
    }
}
