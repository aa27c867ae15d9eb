#![allow(clippy::clone_on_copy, clippy::float_cmp)]

use uuid::Uuid;

use super::*;
use crate::element::ElementKind;
use crate::geometry::Point;

fn make_element(z: i64) -> Element {
    let mut el = Element::create(ElementKind::Text, Point::default());
    el.style.z_index = z;
    el
}

fn make_element_with_id(id: Uuid, z: i64) -> Element {
    Element { id, ..make_element(z) }
}

// =============================================================
// Construction
// =============================================================

#[test]
fn new_is_empty() {
    let doc = Document::new();
    assert!(doc.is_empty());
    assert_eq!(doc.len(), 0);
    assert_eq!(doc, Document::default());
}

#[test]
fn from_elements_keeps_list_order() {
    let a = make_element(1);
    let b = make_element(1);
    let doc = Document::from_elements(vec![a.clone(), b.clone()]);
    assert_eq!(doc.ids(), vec![a.id, b.id]);
}

#[test]
fn from_elements_reassigns_duplicate_ids() {
    let id = Uuid::new_v4();
    let doc = Document::from_elements(vec![make_element_with_id(id, 1), make_element_with_id(id, 2)]);
    assert_eq!(doc.len(), 2);
    let ids = doc.ids();
    assert_eq!(ids[0], id);
    assert_ne!(ids[1], id);
}

// =============================================================
// Lookup / push / remove
// =============================================================

#[test]
fn get_and_get_mut() {
    let el = make_element(1);
    let id = el.id;
    let mut doc = Document::from_elements(vec![el]);
    assert!(doc.get(&id).is_some());
    doc.get_mut(&id).unwrap().locked = true;
    assert!(doc.get(&id).unwrap().locked);
    assert!(doc.get(&Uuid::new_v4()).is_none());
}

#[test]
fn push_appends_and_returns_id() {
    let mut doc = Document::new();
    let el = make_element(1);
    let id = doc.push(el.clone());
    assert_eq!(id, el.id);
    assert!(doc.contains(&id));
}

#[test]
fn push_with_existing_id_gets_fresh_one() {
    let el = make_element(1);
    let mut doc = Document::from_elements(vec![el.clone()]);
    let id = doc.push(el.clone());
    assert_ne!(id, el.id);
    assert_eq!(doc.len(), 2);
}

#[test]
fn remove_returns_element() {
    let el = make_element(1);
    let mut doc = Document::from_elements(vec![el.clone()]);
    assert_eq!(doc.remove(&el.id), Some(el.clone()));
    assert!(doc.remove(&el.id).is_none());
}

#[test]
fn remove_all_counts_only_present_ids() {
    let a = make_element(1);
    let b = make_element(1);
    let c = make_element(1);
    let mut doc = Document::from_elements(vec![a.clone(), b.clone(), c.clone()]);
    let removed = doc.remove_all(&[a.id, c.id, Uuid::new_v4()]);
    assert_eq!(removed, 2);
    assert_eq!(doc.ids(), vec![b.id]);
}

// =============================================================
// Z order
// =============================================================

#[test]
fn paint_order_sorts_by_z_then_list_order() {
    let top = make_element(5);
    let low_first = make_element(0);
    let low_second = make_element(0);
    let doc = Document::from_elements(vec![top.clone(), low_first.clone(), low_second.clone()]);
    let order: Vec<ElementId> = doc.paint_order().iter().map(|el| el.id).collect();
    assert_eq!(order, vec![low_first.id, low_second.id, top.id]);
}

#[test]
fn z_range_of_empty_is_none() {
    assert!(Document::new().z_range().is_none());
}

#[test]
fn z_range_reports_min_and_max() {
    let doc = Document::from_elements(vec![make_element(-3), make_element(7), make_element(2)]);
    assert_eq!(doc.z_range(), Some((-3, 7)));
}

#[test]
fn normalize_z_is_dense_and_preserves_order() {
    let a = make_element(900);
    let b = make_element(-40);
    let c = make_element(12);
    let mut doc = Document::from_elements(vec![a.clone(), b.clone(), c.clone()]);
    doc.normalize_z();
    assert_eq!(doc.get(&b.id).unwrap().style.z_index, 0);
    assert_eq!(doc.get(&c.id).unwrap().style.z_index, 1);
    assert_eq!(doc.get(&a.id).unwrap().style.z_index, 2);
    assert_eq!(doc.ids(), vec![a.id, b.id, c.id]);
}

// =============================================================
// Serde
// =============================================================

#[test]
fn document_serializes_as_plain_list() {
    let doc = Document::from_elements(vec![make_element(1)]);
    let value = serde_json::to_value(&doc).unwrap();
    assert!(value.is_array());
    let back: Document = serde_json::from_value(value).unwrap();
    assert_eq!(back, doc);
}
