//! Set-wide settings stored under the document's `properties` key.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Default number of days an archived note is kept.
pub const DEFAULT_TRASH_RETENTION_DAYS: i64 = 30;
pub const DEFAULT_CONFIRM_DELETE: bool = false;

/// Global key/value settings of a note set.
///
/// `trash_retention_days` and `confirm_delete` are filled in on load, so
/// every loaded set carries explicit values for both.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_cat: Option<String>,
    /// Days; `<= 0` keeps archived notes forever.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trash_retention_days: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirm_delete: Option<bool>,
    /// Last known "all notes visible" state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_visible: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GlobalProperties {
    /// Fills the keys every loaded set must carry.
    pub fn apply_defaults(&mut self) {
        self.trash_retention_days
            .get_or_insert(DEFAULT_TRASH_RETENTION_DAYS);
        self.confirm_delete.get_or_insert(DEFAULT_CONFIRM_DELETE);
    }

    pub fn trash_retention_days(&self) -> i64 {
        self.trash_retention_days
            .unwrap_or(DEFAULT_TRASH_RETENTION_DAYS)
    }

    pub fn confirm_delete(&self) -> bool {
        self.confirm_delete.unwrap_or(DEFAULT_CONFIRM_DELETE)
    }

    /// Configured default category, ignoring an empty value.
    pub fn default_category(&self) -> Option<&str> {
        self.default_cat.as_deref().filter(|value| !value.is_empty())
    }
}
