//! Navigation state and view composition for docdesk.
//!
//! [`NavState`] holds the selected `(version, document)` pair and an
//! explicit observer list: the UI layer registers callbacks and mutates the
//! state through the two select operations, both of which normalize raw
//! input by keeping only the token after the last path separator.
//!
//! [`Viewer`] composes the state with the renderer: every selection change
//! re-renders the document and navigation HTML for the new pair.

mod nav;
mod viewer;

pub use nav::{NavState, normalize};
pub use viewer::{RenderedView, Viewer};
