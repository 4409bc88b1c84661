//! Archived (soft-deleted) note records.
//!
//! # Responsibility
//! - Hold the denormalized snapshot of a deleted note plus its deletion time.
//! - Derive listing projections (body preview, display date).
//!
//! # Invariants
//! - Records are kept as raw JSON objects: every key, known or not, and
//!   every value, well-typed or not, is written back unchanged.
//! - A record created by archiving always carries `deleted_at`; the stamp is
//!   dropped when the record is restored.
//! - A missing, non-string or unreadable `deleted_at` is interpreted as
//!   `timestamp::legacy_epoch()`.

use crate::codec::CodecError;
use crate::model::note::NoteRecord;
use crate::model::timestamp::{
    format_timestamp, legacy_epoch, parse_timestamp, Timestamp, DISPLAY_FORMAT,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Number of body characters shown in archive listings.
pub const PREVIEW_CHARS: usize = 50;
pub const DELETED_AT_KEY: &str = "deleted_at";

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// One archived note.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArchivedNote {
    fields: Map<String, Value>,
}

impl From<Map<String, Value>> for ArchivedNote {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

impl ArchivedNote {
    /// Wraps a freshly extracted note, stamped with `deleted_at`.
    pub fn stamp(note: NoteRecord, deleted_at: Timestamp) -> Result<Self, CodecError> {
        let mut fields = match serde_json::to_value(note)? {
            Value::Object(fields) => fields,
            _ => Map::new(),
        };
        fields.insert(
            DELETED_AT_KEY.to_string(),
            Value::from(format_timestamp(&deleted_at)),
        );
        Ok(Self { fields })
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn id(&self) -> Option<&str> {
        self.fields.get("id").and_then(Value::as_str)
    }

    pub fn body(&self) -> &str {
        self.fields.get("body").and_then(Value::as_str).unwrap_or("")
    }

    /// Raw `deleted_at` when it is a string.
    pub fn deleted_at(&self) -> Option<&str> {
        self.fields.get(DELETED_AT_KEY).and_then(Value::as_str)
    }

    /// Deletion time used for retention checks.
    pub fn deleted_at_or_epoch(&self) -> Timestamp {
        self.deleted_at()
            .and_then(parse_timestamp)
            .unwrap_or_else(legacy_epoch)
    }

    /// Single-line body preview for listings.
    pub fn preview(&self) -> String {
        preview_text(self.body(), PREVIEW_CHARS)
    }

    /// `YYYY-MM-DD HH:MM`, the raw value when unreadable, `None` when absent.
    pub fn deleted_at_display(&self) -> Option<String> {
        let raw = match self.fields.get(DELETED_AT_KEY)? {
            Value::Null => return None,
            Value::String(raw) if raw.is_empty() => return None,
            Value::String(raw) => raw.clone(),
            other => other.to_string(),
        };
        Some(match parse_timestamp(&raw) {
            Some(parsed) => parsed.format(DISPLAY_FORMAT).to_string(),
            None => raw,
        })
    }

    /// The note's serialized form without the archive stamp.
    ///
    /// # Errors
    /// - `Json` when a known note field has the wrong type.
    pub fn note_record(&self) -> Result<NoteRecord, CodecError> {
        let mut fields = self.fields.clone();
        fields.remove(DELETED_AT_KEY);
        Ok(serde_json::from_value(Value::Object(fields))?)
    }
}

fn preview_text(body: &str, max_chars: usize) -> String {
    let collapsed = WHITESPACE_RE.replace_all(body, " ");
    let mut preview = collapsed.chars().take(max_chars).collect::<String>();
    if collapsed.chars().count() > max_chars {
        preview.push_str("...");
    }
    preview
}

#[cfg(test)]
mod tests {
    use super::{preview_text, ArchivedNote};
    use crate::model::note::NoteRecord;
    use crate::model::timestamp::parse_timestamp;
    use serde_json::{json, Value};

    fn archived(value: Value) -> ArchivedNote {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn preview_collapses_whitespace_and_truncates() {
        assert_eq!(preview_text("a\nb\n\nc", 50), "a b c");
        let long = "x".repeat(60);
        let preview = preview_text(&long, 50);
        assert_eq!(preview.len(), 53);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn display_date_falls_back_to_raw_value() {
        assert_eq!(
            archived(json!({"deleted_at": "2023-06-01T14:30:59"})).deleted_at_display(),
            Some("2023-06-01 14:30".to_string())
        );
        assert_eq!(
            archived(json!({"deleted_at": "last tuesday"})).deleted_at_display(),
            Some("last tuesday".to_string())
        );
        assert_eq!(
            archived(json!({"deleted_at": 12345})).deleted_at_display(),
            Some("12345".to_string())
        );
        assert_eq!(archived(json!({})).deleted_at_display(), None);
    }

    #[test]
    fn unreadable_deleted_at_counts_as_legacy_epoch() {
        for value in [json!("not a date"), json!(12345), json!(null), json!([2024])] {
            let record = archived(json!({"deleted_at": value}));
            assert_eq!(record.deleted_at_or_epoch().format("%Y").to_string(), "2000");
        }
    }

    #[test]
    fn unknown_and_mistyped_keys_survive_serialization() {
        let raw = json!({
            "id": "x",
            "body": "b",
            "deleted_at": 12345,
            "pinned": true,
            "properties": {"position": [1.5, 2]}
        });
        let record = archived(raw.clone());
        assert_eq!(serde_json::to_value(&record).unwrap(), raw);
    }

    #[test]
    fn stamp_then_note_record_drops_only_the_stamp() {
        let note = NoteRecord {
            body: Some("hello".to_string()),
            category: Some(String::new()),
            ..NoteRecord::default()
        };
        let stamped =
            ArchivedNote::stamp(note.clone(), parse_timestamp("2024-01-02T03:04:05").unwrap())
                .unwrap();
        assert_eq!(stamped.deleted_at(), Some("2024-01-02T03:04:05"));
        assert_eq!(stamped.note_record().unwrap(), note);
    }

    #[test]
    fn note_record_rejects_mistyped_body() {
        let record = archived(json!({"id": "x", "body": 7}));
        assert!(record.note_record().is_err());
    }
}
