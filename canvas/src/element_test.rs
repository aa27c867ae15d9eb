#![allow(clippy::clone_on_copy, clippy::float_cmp)]

use serde_json::json;

use super::*;

// =============================================================
// Kind catalog
// =============================================================

#[test]
fn kind_names_round_trip_through_from_str() {
    for kind in ElementKind::ALL {
        assert_eq!(kind.as_str().parse::<ElementKind>(), Ok(kind));
        assert_eq!(kind.to_string(), kind.as_str());
    }
}

#[test]
fn unknown_kind_is_rejected() {
    let err = "table".parse::<ElementKind>().unwrap_err();
    assert_eq!(err, ElementError::InvalidKind("table".into()));
    assert_eq!(err.to_string(), "unrecognized element kind: table");
}

#[test]
fn kind_names_are_case_sensitive() {
    assert!("Heading".parse::<ElementKind>().is_err());
}

#[test]
fn create_element_rejects_invalid_kind() {
    assert!(create_element("widget", Point::new(0.0, 0.0)).is_err());
}

// =============================================================
// Creation defaults
// =============================================================

#[test]
fn created_heading_has_catalog_defaults() {
    let el = create_element("heading", Point::new(12.0, 34.0)).unwrap();
    assert_eq!(el.kind(), ElementKind::Heading);
    assert_eq!(el.position, Point::new(12.0, 34.0));
    assert_eq!(el.size, Size::new(300.0, 40.0));
    assert_eq!(el.content, Content::Heading { text: "Heading Text".into() });
    assert_eq!(el.style.font_size, 24.0);
    assert_eq!(el.style.font_weight, FontWeight::Bold);
    assert_eq!(el.rotation, 0.0);
    assert!(!el.locked);
}

#[test]
fn every_kind_has_matching_default_content() {
    for kind in ElementKind::ALL {
        assert_eq!(default_content(kind).kind(), kind);
        assert_eq!(Element::create(kind, Point::default()).kind(), kind);
    }
}

#[test]
fn every_kind_has_positive_default_size() {
    for kind in ElementKind::ALL {
        let size = default_size(kind);
        assert!(size.width > 0.0 && size.height > 0.0, "{kind}");
    }
}

#[test]
fn default_sizes_match_catalog() {
    assert_eq!(default_size(ElementKind::Text), Size::new(250.0, 60.0));
    assert_eq!(default_size(ElementKind::Experience), Size::new(350.0, 120.0));
    assert_eq!(default_size(ElementKind::Image), Size::new(150.0, 150.0));
    assert_eq!(default_size(ElementKind::Divider), Size::new(300.0, 2.0));
    assert_eq!(default_size(ElementKind::Shape), Size::new(100.0, 100.0));
}

#[test]
fn default_styles_override_base_per_kind() {
    let text = default_style(ElementKind::Text);
    assert_eq!(text.font_size, 14.0);
    assert_eq!(text.background_color, "transparent");
    assert_eq!(text.z_index, 1);

    assert_eq!(default_style(ElementKind::Contact).color, "#6b7280");
    assert_eq!(default_style(ElementKind::Divider).padding, 0.0);
    assert_eq!(default_style(ElementKind::Shape).background_color, "#3b82f6");
}

#[test]
fn created_elements_get_distinct_ids() {
    let a = Element::create(ElementKind::Text, Point::default());
    let b = Element::create(ElementKind::Text, Point::default());
    assert_ne!(a.id, b.id);
}

#[test]
fn copy_with_offset_is_a_new_identity_elsewhere() {
    let el = Element::create(ElementKind::Skills, Point::new(10.0, 10.0));
    let copy = el.copy_with_offset(Point::new(20.0, 20.0));
    assert_ne!(copy.id, el.id);
    assert_eq!(copy.position, Point::new(30.0, 30.0));
    assert_eq!(copy.content, el.content);
    assert_eq!(copy.style, el.style);
    assert_eq!(copy.size, el.size);
}

#[test]
fn set_rect_updates_position_and_size() {
    let mut el = Element::create(ElementKind::Shape, Point::default());
    el.set_rect(Rect::new(5.0, 6.0, 70.0, 80.0));
    assert_eq!(el.rect(), Rect::new(5.0, 6.0, 70.0, 80.0));
}

// =============================================================
// StylePatch
// =============================================================

#[test]
fn empty_patch_changes_nothing() {
    let mut style = default_style(ElementKind::Text);
    assert!(!StylePatch::default().apply(&mut style));
    assert_eq!(style, default_style(ElementKind::Text));
}

#[test]
fn patch_applies_only_present_fields() {
    let mut style = default_style(ElementKind::Text);
    let patch = StylePatch { color: Some("#000000".into()), font_size: Some(18.0), ..StylePatch::default() };
    assert!(patch.apply(&mut style));
    assert_eq!(style.color, "#000000");
    assert_eq!(style.font_size, 18.0);
    assert_eq!(style.font_family, "Inter, sans-serif");
}

#[test]
fn patch_with_same_values_reports_no_change() {
    let mut style = default_style(ElementKind::Text);
    let patch = StylePatch { font_size: Some(14.0), ..StylePatch::default() };
    assert!(!patch.apply(&mut style));
}

#[test]
fn patch_clamps_opacity() {
    let mut style = default_style(ElementKind::Text);
    StylePatch { opacity: Some(3.0), ..StylePatch::default() }.apply(&mut style);
    assert_eq!(style.opacity, 1.0);
    StylePatch { opacity: Some(-1.0), ..StylePatch::default() }.apply(&mut style);
    assert_eq!(style.opacity, 0.0);
}

// =============================================================
// Serialization
// =============================================================

#[test]
fn content_serializes_with_kind_tag() {
    let value = serde_json::to_value(Content::Heading { text: "Ada".into() }).unwrap();
    assert_eq!(value, json!({ "kind": "heading", "text": "Ada" }));
    assert_eq!(serde_json::to_value(Content::Divider).unwrap(), json!({ "kind": "divider" }));
}

#[test]
fn element_deserializes_without_optional_fields() {
    let value = json!({
        "id": "5f0c9d1e-8b3a-4c2d-9e6f-7a8b9c0d1e2f",
        "content": { "kind": "shape" },
        "position": { "x": 1.0, "y": 2.0 },
        "size": { "width": 3.0, "height": 4.0 },
        "style": serde_json::to_value(default_style(ElementKind::Shape)).unwrap(),
    });
    let el: Element = serde_json::from_value(value).unwrap();
    assert_eq!(el.kind(), ElementKind::Shape);
    assert_eq!(el.content, Content::Shape { shape: ShapeKind::Rectangle });
    assert_eq!(el.rotation, 0.0);
    assert!(!el.locked);
}

#[test]
fn unknown_content_kind_fails_to_deserialize() {
    let result = serde_json::from_value::<Content>(json!({ "kind": "table" }));
    assert!(result.is_err());
}
