//! Element model: the kind catalog, typed per-kind content, styling, and the
//! defaults used when a new element is dropped onto the page.
//!
//! `Content` is a tagged union keyed by kind, so an element's kind is simply
//! the tag of its content and can never drift from it. The catalog of kinds is
//! closed; adding one is a code change here, not configuration.

#[cfg(test)]
#[path = "element_test.rs"]
mod element_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::{Point, Rect, Size};

/// Unique identifier for an element.
pub type ElementId = Uuid;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ElementError {
    #[error("unrecognized element kind: {0}")]
    InvalidKind(String),
}

/// The closed set of element kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Heading,
    Text,
    Image,
    Contact,
    Experience,
    Education,
    Skills,
    Awards,
    Languages,
    Divider,
    Shape,
}

impl ElementKind {
    /// Every kind, in toolbar order.
    pub const ALL: [ElementKind; 11] = [
        Self::Heading,
        Self::Text,
        Self::Image,
        Self::Contact,
        Self::Experience,
        Self::Education,
        Self::Skills,
        Self::Awards,
        Self::Languages,
        Self::Divider,
        Self::Shape,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Heading => "heading",
            Self::Text => "text",
            Self::Image => "image",
            Self::Contact => "contact",
            Self::Experience => "experience",
            Self::Education => "education",
            Self::Skills => "skills",
            Self::Awards => "awards",
            Self::Languages => "languages",
            Self::Divider => "divider",
            Self::Shape => "shape",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElementKind {
    type Err = ElementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ElementError::InvalidKind(s.to_owned()))
    }
}

/// Primitive drawn by a `shape` element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    #[default]
    Rectangle,
    Circle,
    Triangle,
    Line,
}

/// One entry of a `languages` element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub name: String,
    pub level: String,
}

/// Kind-specific payload. The variant tag is the element's kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Content {
    Heading {
        text: String,
    },
    Text {
        text: String,
    },
    Image {
        url: String,
        alt: String,
        #[serde(default)]
        caption: String,
    },
    Contact {
        email: String,
        phone: String,
        location: String,
    },
    Experience {
        title: String,
        company: String,
        duration: String,
        description: String,
    },
    Education {
        degree: String,
        institution: String,
        year: String,
        #[serde(default)]
        gpa: String,
    },
    Skills {
        skills: Vec<String>,
    },
    Awards {
        title: String,
        organization: String,
        year: String,
        #[serde(default)]
        description: String,
    },
    Languages {
        languages: Vec<Language>,
    },
    Divider,
    Shape {
        #[serde(default)]
        shape: ShapeKind,
    },
}

impl Content {
    #[must_use]
    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Heading { .. } => ElementKind::Heading,
            Self::Text { .. } => ElementKind::Text,
            Self::Image { .. } => ElementKind::Image,
            Self::Contact { .. } => ElementKind::Contact,
            Self::Experience { .. } => ElementKind::Experience,
            Self::Education { .. } => ElementKind::Education,
            Self::Skills { .. } => ElementKind::Skills,
            Self::Awards { .. } => ElementKind::Awards,
            Self::Languages { .. } => ElementKind::Languages,
            Self::Divider => ElementKind::Divider,
            Self::Shape { .. } => ElementKind::Shape,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

/// Visual attributes. The engine only interprets `z_index`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Style {
    pub background_color: String,
    pub border_color: String,
    pub border_width: f64,
    pub border_radius: f64,
    pub padding: f64,
    pub margin: f64,
    pub font_size: f64,
    pub font_weight: FontWeight,
    pub font_family: String,
    pub color: String,
    pub text_align: TextAlign,
    pub opacity: f64,
    /// Stacking order; higher values paint above lower ones.
    pub z_index: i64,
}

/// Sparse update for an element's style. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StylePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<FontWeight>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i64>,
}

impl StylePatch {
    /// Apply present fields to `style`. Returns whether anything changed.
    pub fn apply(&self, style: &mut Style) -> bool {
        let before = style.clone();
        if let Some(v) = &self.background_color {
            style.background_color.clone_from(v);
        }
        if let Some(v) = &self.border_color {
            style.border_color.clone_from(v);
        }
        if let Some(v) = self.border_width {
            style.border_width = v;
        }
        if let Some(v) = self.border_radius {
            style.border_radius = v;
        }
        if let Some(v) = self.padding {
            style.padding = v;
        }
        if let Some(v) = self.margin {
            style.margin = v;
        }
        if let Some(v) = self.font_size {
            style.font_size = v;
        }
        if let Some(v) = self.font_weight {
            style.font_weight = v;
        }
        if let Some(v) = &self.font_family {
            style.font_family.clone_from(v);
        }
        if let Some(v) = &self.color {
            style.color.clone_from(v);
        }
        if let Some(v) = self.text_align {
            style.text_align = v;
        }
        if let Some(v) = self.opacity {
            style.opacity = v.clamp(0.0, 1.0);
        }
        if let Some(v) = self.z_index {
            style.z_index = v;
        }
        *style != before
    }
}

/// One placed object on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    pub content: Content,
    pub position: Point,
    pub size: Size,
    pub style: Style,
    /// Clockwise rotation in degrees; a rendering hint only.
    #[serde(default)]
    pub rotation: f64,
    /// Locked elements cannot be moved, resized, or aligned.
    #[serde(default)]
    pub locked: bool,
}

impl Element {
    /// Build a new element of `kind` at `position` with catalog defaults.
    #[must_use]
    pub fn create(kind: ElementKind, position: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: default_content(kind),
            position,
            size: default_size(kind),
            style: default_style(kind),
            rotation: 0.0,
            locked: false,
        }
    }

    #[must_use]
    pub fn kind(&self) -> ElementKind {
        self.content.kind()
    }

    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::from_parts(self.position, self.size)
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.position = rect.position();
        self.size = rect.size();
    }

    /// Deep copy with a new identity, shifted by `offset`.
    #[must_use]
    pub fn copy_with_offset(&self, offset: Point) -> Self {
        Self { id: Uuid::new_v4(), position: self.position.offset(offset), ..self.clone() }
    }
}

/// Parse `kind_name` and create an element of that kind.
///
/// # Errors
///
/// Returns [`ElementError::InvalidKind`] when the name is not in the catalog.
pub fn create_element(kind_name: &str, position: Point) -> Result<Element, ElementError> {
    let kind = kind_name.parse::<ElementKind>()?;
    Ok(Element::create(kind, position))
}

/// Placeholder content for a freshly created element.
#[must_use]
pub fn default_content(kind: ElementKind) -> Content {
    match kind {
        ElementKind::Heading => Content::Heading { text: "Heading Text".into() },
        ElementKind::Text => Content::Text { text: "Your text here".into() },
        ElementKind::Image => Content::Image { url: String::new(), alt: "Image".into(), caption: String::new() },
        ElementKind::Contact => Content::Contact {
            email: "email@example.com".into(),
            phone: "+1234567890".into(),
            location: "City, Country".into(),
        },
        ElementKind::Experience => Content::Experience {
            title: "Job Title".into(),
            company: "Company Name".into(),
            duration: "2020 - Present".into(),
            description: "Job description here".into(),
        },
        ElementKind::Education => Content::Education {
            degree: "Degree".into(),
            institution: "Institution".into(),
            year: "2020".into(),
            gpa: String::new(),
        },
        ElementKind::Skills => Content::Skills { skills: vec!["Skill 1".into(), "Skill 2".into(), "Skill 3".into()] },
        ElementKind::Awards => Content::Awards {
            title: "Award Title".into(),
            organization: "Organization".into(),
            year: "Year".into(),
            description: String::new(),
        },
        ElementKind::Languages => Content::Languages {
            languages: vec![
                Language { name: "English".into(), level: "Native".into() },
                Language { name: "Spanish".into(), level: "Intermediate".into() },
            ],
        },
        ElementKind::Divider => Content::Divider,
        ElementKind::Shape => Content::Shape { shape: ShapeKind::Rectangle },
    }
}

/// Starting size for a freshly created element.
#[must_use]
pub fn default_size(kind: ElementKind) -> Size {
    let (width, height) = match kind {
        ElementKind::Heading => (300.0, 40.0),
        ElementKind::Text => (250.0, 60.0),
        ElementKind::Contact => (200.0, 80.0),
        ElementKind::Experience => (350.0, 120.0),
        ElementKind::Education | ElementKind::Awards => (300.0, 80.0),
        ElementKind::Skills => (300.0, 100.0),
        ElementKind::Languages => (200.0, 80.0),
        ElementKind::Image => (150.0, 150.0),
        ElementKind::Divider => (300.0, 2.0),
        ElementKind::Shape => (100.0, 100.0),
    };
    Size::new(width, height)
}

/// Starting style for a freshly created element.
#[must_use]
pub fn default_style(kind: ElementKind) -> Style {
    let base = Style {
        background_color: "transparent".into(),
        border_color: "#e5e7eb".into(),
        border_width: 0.0,
        border_radius: 0.0,
        padding: 8.0,
        margin: 0.0,
        font_size: 14.0,
        font_weight: FontWeight::Normal,
        font_family: "Inter, sans-serif".into(),
        color: "#374151".into(),
        text_align: TextAlign::Left,
        opacity: 1.0,
        z_index: 1,
    };

    match kind {
        ElementKind::Heading => Style { font_size: 24.0, font_weight: FontWeight::Bold, ..base },
        ElementKind::Contact => Style { font_size: 12.0, color: "#6b7280".into(), ..base },
        ElementKind::Divider => Style { background_color: "#e5e7eb".into(), padding: 0.0, ..base },
        ElementKind::Shape => Style { background_color: "#3b82f6".into(), border_radius: 4.0, ..base },
        _ => base,
    }
}
