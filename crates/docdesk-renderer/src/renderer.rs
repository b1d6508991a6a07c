//! Document and navigation-index rendering.

use std::sync::Arc;

use docdesk_storage::{DocStore, NAV_INDEX, StoreError};

use crate::html::markdown_to_html;

/// Placeholder the upstream documentation uses for version-relative text.
const VERSION_PLACEHOLDER: &str = "{{version}}";

/// Link prefix the upstream navigation index uses for version-relative links.
const NAV_LINK_PREFIX: &str = "/docs/{{version}}/";

/// Error returned when rendering fails.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Source document not found.
    #[error("Document not found: {version}/{doc}")]
    NotFound {
        /// Version identifier.
        version: String,
        /// Document identifier.
        doc: String,
    },
    /// Storage backend failure.
    #[error(transparent)]
    Store(StoreError),
}

/// Markdown renderer reading through a [`DocStore`].
///
/// Produces HTML strings the caller is trusted to inject unescaped; text
/// content and attribute values inside the output are escaped.
pub struct DocRenderer {
    store: Arc<dyn DocStore>,
}

impl DocRenderer {
    /// Create a renderer over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn DocStore>) -> Self {
        Self { store }
    }

    /// Render one document for the selected version.
    ///
    /// Every literal `{{version}}` in the source is substituted with the
    /// selected version string before conversion.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::NotFound`] if the document does not exist.
    pub fn render_document(&self, version: &str, doc: &str) -> Result<String, RenderError> {
        let raw = self.read(version, doc)?;
        let substituted = raw.replace(VERSION_PLACEHOLDER, version);
        tracing::debug!(version, doc, "rendering document");
        Ok(markdown_to_html(&substituted))
    }

    /// Render the navigation index for the selected version.
    ///
    /// The version-relative link prefix `/docs/{{version}}/` is removed
    /// wholesale so index links name bare document identifiers.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::NotFound`] if the version has no navigation
    /// index.
    pub fn render_nav(&self, version: &str) -> Result<String, RenderError> {
        let raw = self.read(version, NAV_INDEX)?;
        let stripped = raw.replace(NAV_LINK_PREFIX, "");
        tracing::debug!(version, "rendering navigation index");
        Ok(markdown_to_html(&stripped))
    }

    fn read(&self, version: &str, doc: &str) -> Result<String, RenderError> {
        self.store.read(version, doc).map_err(|e| match e {
            StoreError::NotFound { version, doc } => RenderError::NotFound { version, doc },
            other => RenderError::Store(other),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docdesk_storage::MockStore;
    use pretty_assertions::assert_eq;

    fn renderer(store: MockStore) -> DocRenderer {
        DocRenderer::new(Arc::new(store))
    }

    #[test]
    fn test_render_document_substitutes_version() {
        let store = MockStore::new().with_content(
            "10.x",
            "installation",
            "# Installation\n\nRun `laravel new` for {{version}}.",
        );
        let html = renderer(store).render_document("10.x", "installation").unwrap();

        assert!(html.contains("<h1>Installation</h1>"));
        assert!(html.contains("for 10.x."));
        assert!(!html.contains("{{version}}"));
    }

    #[test]
    fn test_render_document_annotates_links() {
        let store = MockStore::new().with_content("10.x", "installation", "[Next](configuration)");
        let html = renderer(store).render_document("10.x", "installation").unwrap();

        assert_eq!(
            html,
            r#"<p><a href="configuration" data-nav-doc="configuration">Next</a></p>"#
        );
    }

    #[test]
    fn test_render_document_not_found() {
        let store = MockStore::new();
        let err = renderer(store)
            .render_document("10.x", "nonexistent")
            .unwrap_err();
        assert!(matches!(
            err,
            RenderError::NotFound { ref version, ref doc }
                if version == "10.x" && doc == "nonexistent"
        ));
    }

    #[test]
    fn test_render_nav_strips_link_prefix() {
        let store = MockStore::new().with_content(
            "10.x",
            "documentation",
            "- [Installation](/docs/{{version}}/installation)\n- [Upgrade](/docs/{{version}}/upgrade)",
        );
        let html = renderer(store).render_nav("10.x").unwrap();

        assert!(html.contains(r#"<a href="installation" data-nav-doc="installation">Installation</a>"#));
        assert!(html.contains(r#"<a href="upgrade" data-nav-doc="upgrade">Upgrade</a>"#));
        assert!(!html.contains("/docs/"));
        assert!(!html.contains("{{version}}"));
    }

    #[test]
    fn test_render_nav_missing_index_fails_fast() {
        let store = MockStore::new().with_content("10.x", "installation", "# Installation");
        let err = renderer(store).render_nav("10.x").unwrap_err();
        assert!(matches!(err, RenderError::NotFound { ref doc, .. } if doc == "documentation"));
    }

    #[test]
    fn test_rendered_output_non_empty_without_placeholders() {
        let store = MockStore::new().with_content(
            "9.x",
            "routing",
            "# Routing\n\nSee [the docs](/docs/{{version}}/urls) for {{version}}.",
        );
        let html = renderer(store).render_document("9.x", "routing").unwrap();

        assert!(!html.is_empty());
        assert!(!html.contains("{{version}}"));
        assert!(!html.contains("/docs/{{version}}/"));
    }

    #[test]
    fn test_external_links_keep_href_only() {
        let store = MockStore::new().with_content(
            "10.x",
            "documentation",
            "[GitHub](https://github.com/laravel/docs)",
        );
        let html = renderer(store).render_nav("10.x").unwrap();
        assert!(html.contains(r#"<a href="https://github.com/laravel/docs">GitHub</a>"#));
        assert!(!html.contains("data-nav-doc"));
    }
}
