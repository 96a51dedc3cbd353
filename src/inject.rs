use std::collections::BTreeMap;

/// Default base id for owned style nodes.
pub const DEFAULT_STYLE_ID: &str = "viewshift-styles";

/// Scope id used by the reduced-motion wrapper.
pub const REDUCED_MOTION_SCOPE: &str = "reduced-motion";

/// Boundary to the document's style-sheet API.
///
/// Implementations write a style node's full text content (`upsert`) or remove
/// the node (`remove`). Calls are infallible by contract: the injector has
/// already suppressed redundant writes, and a missing node on `remove` is not
/// an error.
pub trait StyleSink {
    fn upsert(&mut self, id: &str, css: &str);
    fn remove(&mut self, id: &str);
}

/// In-memory sink for tests and headless use. Records every write so
/// idempotence is observable.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    styles: BTreeMap<String, String>,
    writes: u64,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.styles.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Number of `upsert` calls that reached the sink.
    pub fn write_count(&self) -> u64 {
        self.writes
    }
}

impl StyleSink for MemorySink {
    fn upsert(&mut self, id: &str, css: &str) {
        self.styles.insert(id.to_string(), css.to_string());
        self.writes += 1;
    }

    fn remove(&mut self, id: &str) {
        self.styles.remove(id);
    }
}

/// Idempotent style upsert/removal keyed by scope id.
///
/// At most one style node exists per scope. Re-injecting identical content is
/// suppressed by a content-equality check before the sink is touched.
#[derive(Clone, Debug)]
pub struct Injector<S: StyleSink> {
    base_id: String,
    injected: BTreeMap<String, String>,
    sink: S,
}

impl<S: StyleSink> Injector<S> {
    pub fn new(sink: S) -> Self {
        Self::with_base_id(sink, DEFAULT_STYLE_ID)
    }

    pub fn with_base_id(sink: S, base_id: impl Into<String>) -> Self {
        Self {
            base_id: base_id.into(),
            injected: BTreeMap::new(),
            sink,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    fn style_id(&self, scope: Option<&str>) -> String {
        match scope {
            Some(s) => format!("{}-{s}", self.base_id),
            None => self.base_id.clone(),
        }
    }

    /// Upsert `css` under `scope`. Returns `true` when the sink was written,
    /// `false` when the write was suppressed (empty css or identical content).
    pub fn inject(&mut self, css: &str, scope: Option<&str>) -> bool {
        if css.is_empty() {
            return false;
        }
        let id = self.style_id(scope);
        if self.injected.get(&id).is_some_and(|existing| existing == css) {
            return false;
        }
        self.sink.upsert(&id, css);
        self.injected.insert(id, css.to_string());
        true
    }

    /// Append `css` to the scope's existing content (joined with a newline),
    /// creating the node when absent.
    pub fn append(&mut self, css: &str, scope: Option<&str>) {
        let id = self.style_id(scope);
        match self.injected.get(&id) {
            None => {
                let _ = self.inject(css, scope);
            }
            Some(existing) => {
                let combined = format!("{existing}\n{css}");
                self.sink.upsert(&id, &combined);
                self.injected.insert(id, combined);
            }
        }
    }

    pub fn remove(&mut self, scope: Option<&str>) {
        let id = self.style_id(scope);
        if self.injected.remove(&id).is_some() {
            self.sink.remove(&id);
        }
    }

    /// Remove every owned style node.
    pub fn clear(&mut self) {
        let ids: Vec<String> = self.injected.keys().cloned().collect();
        for id in ids {
            self.sink.remove(&id);
        }
        self.injected.clear();
    }

    pub fn injected_css(&self, scope: Option<&str>) -> Option<&str> {
        self.injected.get(&self.style_id(scope)).map(String::as_str)
    }

    pub fn has_injected(&self, scope: Option<&str>) -> bool {
        self.injected.contains_key(&self.style_id(scope))
    }

    pub fn wrap_media_query(css: &str, query: &str) -> String {
        format!("@media {query} {{\n{css}\n}}")
    }

    /// Inject `css` wrapped for reduced-motion users, under its own scope.
    pub fn inject_for_reduced_motion(&mut self, css: &str) -> bool {
        let wrapped = Self::wrap_media_query(css, "(prefers-reduced-motion: reduce)");
        self.inject(&wrapped, Some(REDUCED_MOTION_SCOPE))
    }
}
