//! JSON persistence codec for note set documents.
//!
//! # Responsibility
//! - Convert raw document bytes to the typed `NoteDocument` and back.
//! - Run the schema migration chain before typed decoding.
//!
//! # Invariants
//! - Codec functions are pure: no defaulting, expiry or category checks
//!   happen here; the note set applies those on load.
//! - Malformed input is reported, never partially recovered.
//!
//! # See also
//! - `migrations` for the document version history.

pub mod migrations;

use crate::model::archive::ArchivedNote;
use crate::model::category::CategoryMap;
use crate::model::note::NoteRecord;
use crate::model::settings::GlobalProperties;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub use migrations::{latest_version, SCHEMA_VERSION_KEY};

pub type CodecResult<T> = Result<T, CodecError>;

/// Document decode/encode failures.
#[derive(Debug)]
pub enum CodecError {
    /// Invalid JSON or a field of the wrong type.
    Json(serde_json::Error),
    /// Top-level value is not a JSON object.
    NotAnObject,
    InvalidSchemaVersion(String),
    UnsupportedSchemaVersion {
        document_version: u32,
        latest_supported: u32,
    },
    InvalidTimestamp {
        field: &'static str,
        value: String,
    },
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "invalid note document: {err}"),
            Self::NotAnObject => write!(f, "invalid note document: top level must be an object"),
            Self::InvalidSchemaVersion(value) => {
                write!(f, "invalid note document schema version `{value}`")
            }
            Self::UnsupportedSchemaVersion {
                document_version,
                latest_supported,
            } => write!(
                f,
                "note document schema version {document_version} is newer than supported {latest_supported}"
            ),
            Self::InvalidTimestamp { field, value } => {
                write!(f, "invalid timestamp `{value}` in `{field}`")
            }
        }
    }
}

impl Error for CodecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Typed view of a persisted note set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoteDocument {
    #[serde(default)]
    pub schema_version: u32,
    #[serde(default)]
    pub notes: Vec<NoteRecord>,
    #[serde(default)]
    pub archived_notes: Vec<ArchivedNote>,
    #[serde(default)]
    pub properties: GlobalProperties,
    #[serde(default)]
    pub categories: CategoryMap,
}

/// Parses and upgrades a document.
///
/// # Errors
/// - `Json` for invalid JSON or mistyped fields.
/// - `NotAnObject` when the top level is not an object.
/// - Schema version errors from the migration chain.
pub fn decode_document(bytes: &[u8]) -> CodecResult<NoteDocument> {
    let mut document = match serde_json::from_slice::<Value>(bytes)? {
        Value::Object(map) => map,
        _ => return Err(CodecError::NotAnObject),
    };
    migrations::upgrade_document(&mut document)?;
    Ok(serde_json::from_value(Value::Object(document))?)
}

/// Serializes a document, stamping the current schema version.
pub fn encode_document(document: &NoteDocument) -> CodecResult<Vec<u8>> {
    if document.schema_version == latest_version() {
        return Ok(serde_json::to_vec(document)?);
    }
    let stamped = NoteDocument {
        schema_version: latest_version(),
        ..document.clone()
    };
    Ok(serde_json::to_vec(&stamped)?)
}
