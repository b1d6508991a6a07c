//! Markdown rendering for docdesk.
//!
//! Converts versioned markdown documents into HTML strings for the
//! presentation layer, with two entry points that differ in how they treat
//! the upstream version placeholder:
//!
//! - [`DocRenderer::render_document`] substitutes `{{version}}` with the
//!   selected version string.
//! - [`DocRenderer::render_nav`] renders the navigation index and removes
//!   the `/docs/{{version}}/` link prefix wholesale.
//!
//! Every internal markdown link is annotated with a `data-nav-doc`
//! attribute naming the target document, so the UI layer can intercept
//! clicks and drive navigation state instead of performing a page load.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use docdesk_renderer::DocRenderer;
//! use docdesk_storage::FsStore;
//!
//! let store = Arc::new(FsStore::new("docs".into()));
//! let renderer = DocRenderer::new(store);
//! let html = renderer.render_document("10.x", "installation")?;
//! ```

mod html;
mod renderer;

pub use html::escape_html;
pub use renderer::{DocRenderer, RenderError};
