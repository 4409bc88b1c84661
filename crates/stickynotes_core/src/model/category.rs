//! Category display data and property resolution.
//!
//! # Responsibility
//! - Model per-category display properties with round-trip fidelity.
//! - Resolve a property for a category, falling back to the default
//!   category and then to fixed fallback values.
//!
//! # Invariants
//! - An absent property on a category is not an error when a fallback
//!   exists; a property with neither a value nor a fallback is.
//! - Unknown keys stored on a category survive decode/encode unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Category id -> category data.
pub type CategoryMap = BTreeMap<String, Category>;

/// Fallback background colour as hue/saturation/value.
pub const FALLBACK_BGCOLOR_HSV: [f64; 3] = [48.0 / 360.0, 1.0, 1.0];
/// Fallback text colour as red/green/blue.
pub const FALLBACK_TEXTCOLOR: [f64; 3] = [32.0 / 255.0, 32.0 / 255.0, 32.0 / 255.0];
/// Empty font means "use the system default".
pub const FALLBACK_FONT: &str = "";
pub const FALLBACK_SHADOW: i64 = 60;

/// Display properties of one category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Hue/saturation/value, each in `[0, 1]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bgcolor_hsv: Option<[f64; 3]>,
    /// Red/green/blue, each in `[0, 1]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub textcolor: Option<[f64; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow: Option<i64>,
    /// Keys this version does not understand.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Category {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Explicit value stored on this category for `key`, if any.
    pub fn get(&self, key: &str) -> Option<Value> {
        match CategoryProperty::parse(key) {
            Some(CategoryProperty::Name) => self.name.clone().map(Value::from),
            Some(CategoryProperty::BackgroundHsv) => self.bgcolor_hsv.map(triple_value),
            Some(CategoryProperty::TextColor) => self.textcolor.map(triple_value),
            Some(CategoryProperty::Font) => self.font.clone().map(Value::from),
            Some(CategoryProperty::Shadow) => self.shadow.map(Value::from),
            None => self.extra.get(key).cloned(),
        }
    }
}

/// Property keys with first-class meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryProperty {
    Name,
    BackgroundHsv,
    TextColor,
    Font,
    Shadow,
}

impl CategoryProperty {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::BackgroundHsv => "bgcolor_hsv",
            Self::TextColor => "textcolor",
            Self::Font => "font",
            Self::Shadow => "shadow",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "name" => Some(Self::Name),
            "bgcolor_hsv" => Some(Self::BackgroundHsv),
            "textcolor" => Some(Self::TextColor),
            "font" => Some(Self::Font),
            "shadow" => Some(Self::Shadow),
            _ => None,
        }
    }

    /// Fixed fallback value. `Name` has none.
    pub fn fallback(self) -> Option<Value> {
        match self {
            Self::Name => None,
            Self::BackgroundHsv => Some(triple_value(FALLBACK_BGCOLOR_HSV)),
            Self::TextColor => Some(triple_value(FALLBACK_TEXTCOLOR)),
            Self::Font => Some(Value::from(FALLBACK_FONT)),
            Self::Shadow => Some(Value::from(FALLBACK_SHADOW)),
        }
    }
}

/// Resolution failure for a category property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryError {
    /// Neither the category nor the fallback table defines this key.
    UnknownProperty(String),
}

impl Display for CategoryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownProperty(key) => write!(f, "unknown category property: `{key}`"),
        }
    }
}

impl Error for CategoryError {}

/// Returns `category` when it names a known category, otherwise `""`.
pub fn coerce_category(categories: &CategoryMap, category: &str) -> String {
    if categories.contains_key(category) {
        category.to_string()
    } else {
        String::new()
    }
}

/// Read-only property lookup over a category map and the configured
/// default category.
#[derive(Debug, Clone, Copy)]
pub struct CategoryResolver<'a> {
    categories: &'a CategoryMap,
    default_cat: Option<&'a str>,
}

impl<'a> CategoryResolver<'a> {
    pub fn new(categories: &'a CategoryMap, default_cat: Option<&'a str>) -> Self {
        Self {
            categories,
            default_cat: default_cat.filter(|value| !value.is_empty()),
        }
    }

    /// Category data used for `category_id` after default substitution.
    ///
    /// Empty or unknown ids are replaced by the default category when one
    /// is configured.
    pub fn effective(&self, category_id: &str) -> Option<&'a Category> {
        let known = !category_id.is_empty() && self.categories.contains_key(category_id);
        let lookup_id = match self.default_cat {
            Some(default_id) if !known => default_id,
            _ => category_id,
        };
        self.categories.get(lookup_id)
    }

    /// Resolves `property` for `category_id`.
    ///
    /// # Errors
    /// - `UnknownProperty` when the effective category has no value and the
    ///   key has no fallback.
    pub fn resolve(&self, category_id: &str, property: &str) -> Result<Value, CategoryError> {
        if let Some(value) = self
            .effective(category_id)
            .and_then(|category| category.get(property))
        {
            return Ok(value);
        }

        CategoryProperty::parse(property)
            .and_then(CategoryProperty::fallback)
            .ok_or_else(|| CategoryError::UnknownProperty(property.to_string()))
    }

    pub fn background_hsv(&self, category_id: &str) -> [f64; 3] {
        self.effective(category_id)
            .and_then(|category| category.bgcolor_hsv)
            .unwrap_or(FALLBACK_BGCOLOR_HSV)
    }

    pub fn text_rgb(&self, category_id: &str) -> [f64; 3] {
        self.effective(category_id)
            .and_then(|category| category.textcolor)
            .unwrap_or(FALLBACK_TEXTCOLOR)
    }

    pub fn font(&self, category_id: &str) -> String {
        self.effective(category_id)
            .and_then(|category| category.font.clone())
            .unwrap_or_else(|| FALLBACK_FONT.to_string())
    }

    pub fn shadow(&self, category_id: &str) -> i64 {
        self.effective(category_id)
            .and_then(|category| category.shadow)
            .unwrap_or(FALLBACK_SHADOW)
    }

    /// Display name; `None` when the category has not been named.
    pub fn display_name(&self, category_id: &str) -> Option<String> {
        self.effective(category_id)
            .and_then(|category| category.name.clone())
    }
}

fn triple_value(values: [f64; 3]) -> Value {
    Value::from(values.to_vec())
}
