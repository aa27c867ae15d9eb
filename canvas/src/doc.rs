//! Document model: the ordered list of elements that makes up one CV page.
//!
//! List order is the default paint and tab order. `style.z_index` can
//! override visual stacking, but never reorders the list itself. The
//! renderer and hit tester read from `Document` via `paint_order` to decide
//! what is on top.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::element::{Element, ElementId};

/// Ordered collection of elements with unique ids.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    elements: Vec<Element>,
}

impl Document {
    /// Create an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self { elements: Vec::new() }
    }

    /// Build a document from an element list. Repeated ids are replaced with
    /// fresh ones so the uniqueness invariant holds from the start.
    #[must_use]
    pub fn from_elements(elements: Vec<Element>) -> Self {
        let mut seen = HashSet::with_capacity(elements.len());
        let mut out = Vec::with_capacity(elements.len());
        for mut el in elements {
            if !seen.insert(el.id) {
                let old = el.id;
                el.id = Uuid::new_v4();
                warn!(%old, new = %el.id, "duplicate element id in document; reassigned");
                seen.insert(el.id);
            }
            out.push(el);
        }
        Self { elements: out }
    }

    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    #[must_use]
    pub fn into_elements(self) -> Vec<Element> {
        self.elements
    }

    /// Number of elements in the document.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if the document contains no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: &ElementId) -> Option<&Element> {
        self.elements.iter().find(|el| el.id == *id)
    }

    pub fn get_mut(&mut self, id: &ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|el| el.id == *id)
    }

    #[must_use]
    pub fn contains(&self, id: &ElementId) -> bool {
        self.get(id).is_some()
    }

    /// Ids in list order.
    #[must_use]
    pub fn ids(&self) -> Vec<ElementId> {
        self.elements.iter().map(|el| el.id).collect()
    }

    /// Append an element. An element whose id is already present is given a
    /// fresh id first. Returns the id it was stored under.
    pub fn push(&mut self, mut element: Element) -> ElementId {
        if self.contains(&element.id) {
            element.id = Uuid::new_v4();
        }
        let id = element.id;
        self.elements.push(element);
        id
    }

    /// Remove an element by id, returning it if it was present.
    pub fn remove(&mut self, id: &ElementId) -> Option<Element> {
        let idx = self.elements.iter().position(|el| el.id == *id)?;
        Some(self.elements.remove(idx))
    }

    /// Remove every element whose id is in `ids`. Returns how many were removed.
    pub fn remove_all(&mut self, ids: &[ElementId]) -> usize {
        let before = self.elements.len();
        self.elements.retain(|el| !ids.contains(&el.id));
        before - self.elements.len()
    }

    /// Elements sorted by `(z_index, list index)` for draw order, bottom first.
    #[must_use]
    pub fn paint_order(&self) -> Vec<&Element> {
        let mut objs: Vec<&Element> = self.elements.iter().collect();
        // Stable sort keeps list order for equal z.
        objs.sort_by_key(|el| el.style.z_index);
        objs
    }

    /// Lowest and highest z-index, or `None` for an empty document.
    #[must_use]
    pub fn z_range(&self) -> Option<(i64, i64)> {
        let min = self.elements.iter().map(|el| el.style.z_index).min()?;
        let max = self.elements.iter().map(|el| el.style.z_index).max()?;
        Some((min, max))
    }

    /// Reassign dense z-indices `0..N-1` following the current paint order.
    pub fn normalize_z(&mut self) {
        let order: Vec<ElementId> = self.paint_order().iter().map(|el| el.id).collect();
        for (z, id) in (0_i64..).zip(order) {
            if let Some(el) = self.get_mut(&id) {
                el.style.z_index = z;
            }
        }
    }
}
