//! Navigation state with explicit change notification.

/// Keep only the token after the last path separator.
///
/// Raw selection input may arrive as a full route path (e.g.
/// `docs/10.x/installation`); discarding everything up to the final
/// separator keeps traversal-shaped input away from filesystem reads
/// downstream. This is sanitation, not validation: an unknown but
/// separator-free token passes through and surfaces as not-found later.
#[must_use]
pub fn normalize(raw: &str) -> &str {
    raw.rsplit(['/', '\\']).next().unwrap_or(raw)
}

/// Observer invoked with the new `(version, doc)` pair after each change.
type ChangeCallback = Box<dyn Fn(&str, &str) + Send + Sync>;

/// Currently selected version and document.
///
/// Owned by the UI layer; mutated only through the two select operations.
/// Observers registered via [`on_change`](Self::on_change) are notified
/// after every mutation, replacing the reactive-property coupling of the
/// original design with an explicit subscription contract.
pub struct NavState {
    version: String,
    doc: String,
    observers: Vec<ChangeCallback>,
}

impl NavState {
    /// Create state from initial values.
    ///
    /// Initial mount routes through the same select operations as later
    /// changes, so initial values are normalized identically.
    #[must_use]
    pub fn new(version: &str, doc: &str) -> Self {
        let mut state = Self {
            version: String::new(),
            doc: String::new(),
            observers: Vec::new(),
        };
        state.select_version(version);
        state.select_doc(doc);
        state
    }

    /// Currently selected version.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Currently selected document.
    #[must_use]
    pub fn doc(&self) -> &str {
        &self.doc
    }

    /// Select a version from raw input.
    pub fn select_version(&mut self, raw: &str) {
        self.version = normalize(raw).to_owned();
        tracing::debug!(version = %self.version, "version selected");
        self.notify();
    }

    /// Select a document from raw input.
    pub fn select_doc(&mut self, raw: &str) {
        self.doc = normalize(raw).to_owned();
        tracing::debug!(doc = %self.doc, "document selected");
        self.notify();
    }

    /// Register a change observer.
    pub fn on_change(&mut self, callback: impl Fn(&str, &str) + Send + Sync + 'static) {
        self.observers.push(Box::new(callback));
    }

    fn notify(&self) {
        for observer in &self.observers {
            observer(&self.version, &self.doc);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_normalize_plain_token() {
        assert_eq!(normalize("installation"), "installation");
        assert_eq!(normalize("10.x"), "10.x");
    }

    #[test]
    fn test_normalize_route_path() {
        assert_eq!(normalize("docs/10.x/installation"), "installation");
        assert_eq!(normalize("/docs/10.x"), "10.x");
    }

    #[test]
    fn test_normalize_backslash_separator() {
        assert_eq!(normalize("docs\\10.x\\installation"), "installation");
    }

    #[test]
    fn test_normalize_traversal_input() {
        assert_eq!(normalize("../../etc/passwd"), "passwd");
        assert_eq!(normalize("a/b/"), "");
    }

    #[test]
    fn test_initial_values_normalized() {
        let state = NavState::new("heads/10.x", "docs/installation");
        assert_eq!(state.version(), "10.x");
        assert_eq!(state.doc(), "installation");
    }

    #[test]
    fn test_select_updates_state() {
        let mut state = NavState::new("10.x", "installation");
        state.select_doc("configuration");
        assert_eq!(state.doc(), "configuration");
        state.select_version("9.x");
        assert_eq!(state.version(), "9.x");
        assert_eq!(state.doc(), "configuration");
    }

    #[test]
    fn test_observers_notified_on_each_change() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let mut state = NavState::new("10.x", "installation");
        state.on_change(move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        state.select_doc("configuration");
        state.select_version("9.x");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_observer_sees_normalized_pair() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let mut state = NavState::new("10.x", "installation");
        state.on_change(move |version, doc| {
            sink.lock()
                .unwrap()
                .push((version.to_owned(), doc.to_owned()));
        });

        state.select_doc("docs/10.x/routing");
        let changes = seen.lock().unwrap();
        assert_eq!(
            changes.as_slice(),
            &[("10.x".to_owned(), "routing".to_owned())]
        );
    }
}
