//! Note domain model.
//!
//! # Responsibility
//! - Hold one note's body, display properties and category reference.
//! - Own the optional visual attachment and route edits through it once
//!   the note has been materialized.
//! - Produce the serializable `NoteRecord` snapshot.
//!
//! # Invariants
//! - `id` is allocated lazily on first `extract()`/`ensure_id()` and never
//!   changes afterwards.
//! - `last_modified` moves only when the body is replaced via `update`.
//! - `category` is either empty or a key of the category map it was
//!   validated against.

use crate::codec::CodecError;
use crate::model::category::{coerce_category, CategoryError, CategoryMap, CategoryResolver};
use crate::model::timestamp::{self, format_timestamp, parse_timestamp, Timestamp};
use crate::visual::{NoteHandle, VisualLayer};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt::{Debug, Display, Formatter};
use uuid::Uuid;

/// Opaque, stable note identifier.
///
/// Generated ids are UUID v4 strings; ids read from documents are kept
/// verbatim whatever their shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NoteId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for NoteId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Display for NoteId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Display state owned by the visual layer, persisted with the note.
///
/// `position`, `size` and `locked` are read when they have the expected
/// shape; otherwise the raw value stays in `extra` and is written back as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NoteProperties {
    /// Window position `[x, y]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<(i32, i32)>,
    /// Window size `[width, height]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<(i32, i32)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    /// Keys this version does not understand.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl<'de> Deserialize<'de> for NoteProperties {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut extra = Map::<String, Value>::deserialize(deserializer)?;
        Ok(Self {
            position: take_typed(&mut extra, "position"),
            size: take_typed(&mut extra, "size"),
            locked: take_typed(&mut extra, "locked"),
            extra,
        })
    }
}

/// Removes and returns `key` when it parses as `T`; leaves it otherwise.
fn take_typed<T: DeserializeOwned>(fields: &mut Map<String, Value>, key: &str) -> Option<T> {
    let parsed = serde_json::from_value(fields.get(key)?.clone()).ok()?;
    fields.remove(key);
    Some(parsed)
}

impl NoteProperties {
    pub fn is_locked(&self) -> bool {
        self.locked.unwrap_or(false)
    }
}

/// Serialized note shape.
///
/// Every field is optional on the way in: merge payloads carry only the
/// fields they want to change. `Note::extract` always fills all of them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoteRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<NoteId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<NoteProperties>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Editable payload of a note. Visual handles write into this on flush.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteContent {
    pub body: String,
    pub properties: NoteProperties,
    pub last_modified: Timestamp,
}

impl NoteContent {
    /// Replaces the body and stamps `last_modified`.
    ///
    /// `None` means "no change requested"; `Some("")` clears the body.
    pub fn update(&mut self, body: Option<&str>) {
        self.update_at(body, timestamp::now());
    }

    pub fn update_at(&mut self, body: Option<&str>, now: Timestamp) {
        if let Some(body) = body {
            self.body = body.to_string();
            self.last_modified = now;
        }
    }
}

/// Whether a note currently has a live visual representation.
pub enum Attachment {
    Detached,
    Attached(Box<dyn NoteHandle>),
}

impl Debug for Attachment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Detached => f.write_str("Detached"),
            Self::Attached(_) => f.write_str("Attached(..)"),
        }
    }
}

/// One live note.
#[derive(Debug)]
pub struct Note {
    id: Option<NoteId>,
    content: NoteContent,
    category: String,
    attachment: Attachment,
}

impl Note {
    /// Creates an empty note in `category`.
    ///
    /// The caller is responsible for passing a validated category id.
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            id: None,
            content: NoteContent {
                body: String::new(),
                properties: NoteProperties::default(),
                last_modified: timestamp::now(),
            },
            category: category.into(),
            attachment: Attachment::Detached,
        }
    }

    /// Builds a live note from its serialized form.
    ///
    /// Missing fields take defaults; a category absent from `categories`
    /// is cleared.
    ///
    /// # Errors
    /// - `InvalidTimestamp` when `last_modified` is present but unreadable.
    pub fn from_record(record: NoteRecord, categories: &CategoryMap) -> Result<Self, CodecError> {
        let last_modified = match record.last_modified.as_deref().map(str::trim) {
            Some(value) if !value.is_empty() => {
                parse_timestamp(value).ok_or_else(|| CodecError::InvalidTimestamp {
                    field: "last_modified",
                    value: value.to_string(),
                })?
            }
            _ => timestamp::now(),
        };

        Ok(Self {
            id: record.id,
            content: NoteContent {
                body: record.body.unwrap_or_default(),
                properties: record.properties.unwrap_or_default(),
                last_modified,
            },
            category: coerce_category(categories, record.category.as_deref().unwrap_or("")),
            attachment: Attachment::Detached,
        })
    }

    pub fn id(&self) -> Option<&NoteId> {
        self.id.as_ref()
    }

    /// Returns the id, allocating one if this note has never had one.
    pub fn ensure_id(&mut self) -> &NoteId {
        self.id.get_or_insert_with(NoteId::generate)
    }

    pub fn body(&self) -> &str {
        &self.content.body
    }

    pub fn properties(&self) -> &NoteProperties {
        &self.content.properties
    }

    pub fn last_modified(&self) -> Timestamp {
        self.content.last_modified
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn content(&self) -> &NoteContent {
        &self.content
    }

    pub fn is_attached(&self) -> bool {
        matches!(self.attachment, Attachment::Attached(_))
    }

    /// See `NoteContent::update`.
    pub fn update(&mut self, body: Option<&str>) {
        self.content.update(body);
    }

    /// Moves the note to `category`, clearing it when unknown.
    pub fn set_category(&mut self, categories: &CategoryMap, category: &str) {
        self.category = coerce_category(categories, category);
    }

    /// Clears the category if it no longer exists in `categories`.
    pub(crate) fn revalidate_category(&mut self, categories: &CategoryMap) {
        if !self.category.is_empty() && !categories.contains_key(&self.category) {
            self.category.clear();
        }
    }

    /// Sets the locked flag.
    ///
    /// Once materialized the visual layer owns `locked`, so the call goes to
    /// the handle and reaches `properties` on the next flush.
    pub fn set_locked(&mut self, locked: bool) {
        match &mut self.attachment {
            Attachment::Attached(handle) => handle.set_locked(locked),
            Attachment::Detached => self.content.properties.locked = Some(locked),
        }
    }

    pub fn is_locked(&self) -> bool {
        match &self.attachment {
            Attachment::Attached(handle) => handle.properties().is_locked(),
            Attachment::Detached => self.content.properties.is_locked(),
        }
    }

    /// Materializes the note, or re-shows an existing representation.
    ///
    /// `reload = true` asks the handle to re-read `content` instead of
    /// keeping its own cached state.
    pub fn show(&mut self, layer: &mut dyn VisualLayer, reload: bool) {
        match &mut self.attachment {
            Attachment::Attached(handle) => handle.show(&self.content, reload),
            Attachment::Detached => {
                let handle = layer.materialize(self);
                self.attachment = Attachment::Attached(handle);
            }
        }
    }

    pub fn hide(&mut self) {
        if let Attachment::Attached(handle) = &mut self.attachment {
            handle.hide();
        }
    }

    /// Tears down the visual representation, if any.
    pub fn detach(&mut self) {
        if let Attachment::Attached(mut handle) =
            std::mem::replace(&mut self.attachment, Attachment::Detached)
        {
            handle.destroy();
        }
    }

    /// Snapshots the note into its serialized form.
    ///
    /// Allocates the id on first call and flushes pending visual-layer state
    /// into the note before reading it.
    pub fn extract(&mut self) -> NoteRecord {
        let id = self.ensure_id().clone();
        if let Attachment::Attached(handle) = &mut self.attachment {
            handle.flush_into(&mut self.content);
        }

        NoteRecord {
            id: Some(id),
            body: Some(self.content.body.clone()),
            last_modified: Some(format_timestamp(&self.content.last_modified)),
            properties: Some(self.content.properties.clone()),
            category: Some(self.category.clone()),
        }
    }

    /// Overwrites the fields present in `incoming`; absent fields keep their
    /// local value.
    pub(crate) fn merge_fields(&mut self, incoming: NoteRecord, categories: &CategoryMap) {
        if let Some(body) = incoming.body {
            self.content.body = body;
        }
        if let Some(properties) = incoming.properties {
            self.content.properties = properties;
        }
        if let Some(category) = incoming.category {
            self.category = coerce_category(categories, &category);
        }
    }

    /// Looks up a display property of this note's category.
    pub fn category_property(
        &self,
        resolver: &CategoryResolver<'_>,
        property: &str,
    ) -> Result<Value, CategoryError> {
        resolver.resolve(&self.category, property)
    }
}
