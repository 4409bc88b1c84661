mod common;

use common::set_from;
use serde_json::json;
use stickynotes_core::{CategoryError, NoteId, NoteSetError};

fn fixture() -> common::TestSet {
    let (set, _, _) = set_from(json!({
        "properties": {"default_cat": "base"},
        "categories": {
            "base": {"name": "Base", "bgcolor_hsv": [0.1, 0.2, 0.3], "font": "Sans 11"},
            "bare": {"name": "Bare"},
            "styled": {"name": "Styled", "textcolor": [1.0, 0.0, 0.0], "shadow": 20}
        },
        "notes": [{"id": "n", "category": "styled"}]
    }));
    set
}

#[test]
fn explicit_value_wins() {
    let set = fixture();
    assert_eq!(
        set.category_property("styled", "textcolor").unwrap(),
        json!([1.0, 0.0, 0.0])
    );
    assert_eq!(set.category_property("styled", "shadow").unwrap(), json!(20));
}

#[test]
fn known_category_without_value_uses_fallback_not_default() {
    let set = fixture();
    assert_eq!(set.category_property("bare", "font").unwrap(), json!(""));
    assert_eq!(set.category_property("bare", "shadow").unwrap(), json!(60));
    assert_eq!(
        set.category_property("bare", "bgcolor_hsv").unwrap(),
        json!([48.0 / 360.0, 1.0, 1.0])
    );
}

#[test]
fn empty_or_unknown_category_reads_the_default() {
    let set = fixture();
    assert_eq!(set.category_property("", "font").unwrap(), json!("Sans 11"));
    assert_eq!(set.category_property("missing", "name").unwrap(), json!("Base"));

    let resolver = set.resolver();
    assert_eq!(resolver.background_hsv(""), [0.1, 0.2, 0.3]);
    assert_eq!(resolver.text_rgb(""), [32.0 / 255.0; 3]);
}

#[test]
fn without_default_falls_straight_to_fallbacks() {
    let (set, _, _) = set_from(json!({"categories": {"x": {}}}));
    let resolver = set.resolver();
    assert_eq!(resolver.font(""), "");
    assert_eq!(resolver.shadow("nope"), 60);
    assert_eq!(resolver.display_name(""), None);
}

#[test]
fn unknown_property_without_fallback_fails() {
    let set = fixture();

    let err = set.category_property("styled", "sparkle").unwrap_err();
    assert!(matches!(
        err,
        NoteSetError::Category(CategoryError::UnknownProperty(ref key)) if key == "sparkle"
    ));
    assert!(set.category_property("", "sparkle").is_err());
}

#[test]
fn unnamed_category_has_no_name_fallback() {
    let (set, _, _) = set_from(json!({"categories": {"anon": {}}}));
    assert!(set.category_property("anon", "name").is_err());
}

#[test]
fn note_reads_its_category_through_the_resolver() {
    let mut set = fixture();
    let id = NoteId::from("n");
    {
        let note = set.note(&id).unwrap();
        assert_eq!(
            note.category_property(&set.resolver(), "shadow").unwrap(),
            json!(20)
        );
    }

    assert!(set.delete_category("styled"));
    let note = set.note(&id).unwrap();
    assert_eq!(note.category(), "");
    assert_eq!(
        note.category_property(&set.resolver(), "font").unwrap(),
        json!("Sans 11")
    );
}
