//! Page-canvas editing core for the CV builder.
//!
//! This crate owns everything that happens between a pointer or keyboard
//! event and a changed résumé page: the element catalog, page geometry,
//! selection and gestures, snapping, undo/redo, and the clipboard. The host
//! (a UI shell or the `cv-builder` CLI) feeds it [`intent::Intent`]s or raw
//! input events and reacts to the returned [`session::Action`]s. Persistence
//! sits behind the [`store::DocumentStore`] trait.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`session`] | Top-level [`session::EditorSession`] orchestrator |
//! | [`controller`] | Selection, drag/resize/marquee gestures, and commands |
//! | [`element`] | Element catalog, content payloads, and styles |
//! | [`doc`] | The ordered element list of one page |
//! | [`geometry`] | Rectangles, clamping, intersection, and snapping |
//! | [`history`] | Bounded undo/redo snapshot stack |
//! | [`clipboard`] | Copy/paste buffer |
//! | [`input`] | Modifiers, keys, resize handles, and the gesture state machine |
//! | [`hit`] | Hit-testing against element bodies and resize handles |
//! | [`intent`] | Serializable user intents |
//! | [`store`] | Load/save boundary and the in-memory store |
//! | [`config`] | Environment-driven editor configuration |
//! | [`consts`] | Shared numeric constants (page size, thresholds, limits) |

pub mod clipboard;
pub mod config;
pub mod consts;
pub mod controller;
pub mod doc;
pub mod element;
pub mod geometry;
pub mod hit;
pub mod history;
pub mod input;
pub mod intent;
pub mod session;
pub mod store;

pub use config::EditorConfig;
pub use element::{Element, ElementId, ElementKind};
pub use session::{Access, Action, EditorSession, SessionError};
