//! Document schema migration registry and executor.
//!
//! # Responsibility
//! - Register document upgrades in strictly increasing version order.
//! - Bring any older document to the current shape before typed decoding.
//!
//! # Invariants
//! - `version` values must remain monotonic.
//! - After a successful upgrade the document carries
//!   `SCHEMA_VERSION_KEY = latest_version()`.

use super::{CodecError, CodecResult};
use serde_json::{Map, Value};

/// Top-level key holding the document schema version.
pub const SCHEMA_VERSION_KEY: &str = "schema_version";

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    apply: fn(&mut Map<String, Value>),
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    apply: rename_legacy_note_keys,
}];

/// Returns the latest document version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Reads the version tag; untagged documents are version 0.
pub fn document_version(document: &Map<String, Value>) -> CodecResult<u32> {
    match document.get(SCHEMA_VERSION_KEY) {
        None | Some(Value::Null) => Ok(0),
        Some(value) => value
            .as_u64()
            .and_then(|version| u32::try_from(version).ok())
            .ok_or_else(|| CodecError::InvalidSchemaVersion(value.to_string())),
    }
}

/// Applies all pending migrations in place.
pub fn upgrade_document(document: &mut Map<String, Value>) -> CodecResult<()> {
    let current_version = document_version(document)?;
    let latest = latest_version();

    if current_version > latest {
        return Err(CodecError::UnsupportedSchemaVersion {
            document_version: current_version,
            latest_supported: latest,
        });
    }

    for migration in MIGRATIONS {
        if migration.version <= current_version {
            continue;
        }
        (migration.apply)(document);
    }
    document.insert(SCHEMA_VERSION_KEY.to_string(), Value::from(latest));

    Ok(())
}

/// v0 -> v1: note entries used `uuid` and `cat`.
fn rename_legacy_note_keys(document: &mut Map<String, Value>) {
    for list_key in ["notes", "archived_notes"] {
        let Some(Value::Array(entries)) = document.get_mut(list_key) else {
            continue;
        };
        for entry in entries.iter_mut() {
            if let Value::Object(fields) = entry {
                rename_key(fields, "uuid", "id");
                rename_key(fields, "cat", "category");
            }
        }
    }
}

fn rename_key(fields: &mut Map<String, Value>, from: &str, to: &str) {
    if let Some(value) = fields.remove(from) {
        if !fields.contains_key(to) {
            fields.insert(to.to_string(), value);
        }
    }
}
