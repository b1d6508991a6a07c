//! View composition: navigation state driving the renderer.

use std::sync::Arc;

use docdesk_renderer::{DocRenderer, RenderError};
use docdesk_storage::DocStore;

use crate::nav::NavState;

/// Rendered HTML for the current selection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedView {
    /// Version the view was rendered for.
    pub version: String,
    /// Document the view was rendered for.
    pub doc: String,
    /// Document HTML.
    pub content: String,
    /// Navigation index HTML.
    pub nav: String,
}

/// Composes [`NavState`] with the renderer.
///
/// Selection changes re-render the `(content, nav)` pair for the new
/// selection; rendering is synchronous and happens only on state changes.
/// A missing document surfaces as [`RenderError::NotFound`], never a panic.
pub struct Viewer {
    state: NavState,
    renderer: DocRenderer,
}

impl Viewer {
    /// Create a viewer over the given store with an initial selection.
    #[must_use]
    pub fn new(store: Arc<dyn DocStore>, initial_version: &str, initial_doc: &str) -> Self {
        Self {
            state: NavState::new(initial_version, initial_doc),
            renderer: DocRenderer::new(store),
        }
    }

    /// Navigation state, for registering UI-layer observers.
    pub fn state_mut(&mut self) -> &mut NavState {
        &mut self.state
    }

    /// Currently selected `(version, doc)` pair.
    #[must_use]
    pub fn selection(&self) -> (&str, &str) {
        (self.state.version(), self.state.doc())
    }

    /// Select a version and re-render.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::NotFound`] if the new selection does not
    /// resolve to an existing document tree entry.
    pub fn select_version(&mut self, raw: &str) -> Result<RenderedView, RenderError> {
        self.state.select_version(raw);
        self.render()
    }

    /// Select a document and re-render.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::NotFound`] if the new selection does not
    /// resolve to an existing document tree entry.
    pub fn select_doc(&mut self, raw: &str) -> Result<RenderedView, RenderError> {
        self.state.select_doc(raw);
        self.render()
    }

    /// Render the current selection.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::NotFound`] if the document or the navigation
    /// index is missing for the selected version.
    pub fn render(&self) -> Result<RenderedView, RenderError> {
        let (version, doc) = (self.state.version(), self.state.doc());
        let content = self.renderer.render_document(version, doc)?;
        let nav = self.renderer.render_nav(version)?;
        Ok(RenderedView {
            version: version.to_owned(),
            doc: doc.to_owned(),
            content,
            nav,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docdesk_storage::MockStore;

    fn store() -> Arc<dyn DocStore> {
        Arc::new(
            MockStore::new()
                .with_content("10.x", "installation", "# Installation\n\n[Next](configuration)")
                .with_content("10.x", "configuration", "# Configuration")
                .with_content(
                    "10.x",
                    "documentation",
                    "- [Installation](/docs/{{version}}/installation)",
                )
                .with_content("9.x", "installation", "# Old Installation")
                .with_content("9.x", "documentation", "- [Installation](installation)"),
        )
    }

    #[test]
    fn test_initial_render() {
        let viewer = Viewer::new(store(), "10.x", "installation");
        let view = viewer.render().unwrap();

        assert_eq!(view.version, "10.x");
        assert_eq!(view.doc, "installation");
        assert!(view.content.contains("<h1>Installation</h1>"));
        assert!(view.nav.contains("data-nav-doc=\"installation\""));
    }

    #[test]
    fn test_select_doc_rerenders() {
        let mut viewer = Viewer::new(store(), "10.x", "installation");
        let view = viewer.select_doc("configuration").unwrap();

        assert_eq!(view.doc, "configuration");
        assert!(view.content.contains("<h1>Configuration</h1>"));
    }

    #[test]
    fn test_select_version_rerenders() {
        let mut viewer = Viewer::new(store(), "10.x", "installation");
        let view = viewer.select_version("9.x").unwrap();

        assert_eq!(view.version, "9.x");
        assert!(view.content.contains("<h1>Old Installation</h1>"));
    }

    #[test]
    fn test_route_shaped_input_normalized() {
        let mut viewer = Viewer::new(store(), "10.x", "installation");
        let view = viewer.select_doc("docs/10.x/configuration").unwrap();
        assert_eq!(view.doc, "configuration");
    }

    #[test]
    fn test_unknown_doc_is_not_found() {
        let mut viewer = Viewer::new(store(), "10.x", "installation");
        let err = viewer.select_doc("nonexistent").unwrap_err();
        assert!(matches!(err, RenderError::NotFound { ref doc, .. } if doc == "nonexistent"));
    }

    #[test]
    fn test_missing_nav_index_is_not_found() {
        let sparse: Arc<dyn DocStore> =
            Arc::new(MockStore::new().with_content("8.x", "installation", "# I"));
        let viewer = Viewer::new(sparse, "8.x", "installation");
        let err = viewer.render().unwrap_err();
        assert!(matches!(err, RenderError::NotFound { ref doc, .. } if doc == "documentation"));
    }
}
