use std::collections::VecDeque;

use crate::descriptor::Direction;

/// Bound on the per-URL animation history.
pub const HISTORY_CAPACITY: usize = 50;

/// Host-framework visit action, as delivered with the `visit` lifecycle event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisitAction {
    Advance,
    Replace,
    Restore,
}

/// Stream-render action delivered with the `before-stream-render` event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamAction {
    Append,
    Prepend,
    Replace,
    Update,
    Remove,
    Before,
    After,
}

impl StreamAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Append => "append",
            Self::Prepend => "prepend",
            Self::Replace => "replace",
            Self::Update => "update",
            Self::Remove => "remove",
            Self::Before => "before",
            Self::After => "after",
        }
    }
}

/// Navigation lifecycle events, dispatched into the session by the host.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum NavigationEvent {
    BeforeVisit {
        url: String,
        /// Explicit per-link animation name captured at click time, if any.
        clicked_animation: Option<String>,
    },
    Visit {
        url: String,
        action: VisitAction,
    },
    BeforeRender {
        /// Visit direction read off the root element; absent means `none`.
        direction: Option<Direction>,
    },
    BeforeFrameRender {
        frame_id: String,
    },
    BeforeStreamRender {
        action: StreamAction,
    },
}

/// Animation chosen for the navigation in flight. Created at before-visit,
/// consumed and cleared at before-render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingTransition {
    pub animation_name: String,
    pub destination_url: String,
    /// URL being left. Absent for restore visits adopted mid-flight; nothing
    /// is recorded into history without it.
    pub origin_url: Option<String>,
}

/// Output of the machine for one resolved navigation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedTransition {
    pub name: String,
    pub direction: Direction,
}

/// URL -> animation last used when leaving that URL.
///
/// Bounded at [`HISTORY_CAPACITY`] entries with FIFO insertion-order eviction:
/// re-recording an existing URL updates the value but keeps the original
/// insertion position, so a refreshed entry can still be evicted before
/// less-recently-used ones. Deliberately not an LRU.
#[derive(Clone, Debug, Default)]
pub struct NavigationHistory {
    entries: VecDeque<(String, String)>,
}

impl NavigationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, url: &str, animation: &str) {
        if let Some(entry) = self.entries.iter_mut().find(|(u, _)| u == url) {
            entry.1 = animation.to_string();
            return;
        }
        self.entries.push_back((url.to_string(), animation.to_string()));
        while self.entries.len() > HISTORY_CAPACITY {
            self.entries.pop_front();
        }
    }

    pub fn lookup(&self, url: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(u, _)| u == url)
            .map(|(_, a)| a.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Tracks the navigation in flight and the bounded history used to mirror
/// animations on back-navigation.
///
/// The machine cycles Idle -> pending -> resolved -> Idle for the page's
/// lifetime. Every lookup miss degrades to the supplied default; no transition
/// ever errors.
#[derive(Clone, Debug, Default)]
pub struct NavigationState {
    pending: Option<PendingTransition>,
    location: Option<String>,
    history: NavigationHistory,
}

impl NavigationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the machine with the page's current URL.
    pub fn with_location(url: impl Into<String>) -> Self {
        Self {
            location: Some(url.into()),
            ..Default::default()
        }
    }

    /// Sync the tracked location with the browser. The machine advances it on
    /// every resolved visit; hosts must call this when the URL changes outside
    /// a tracked navigation (initial load, history restore via popstate).
    pub fn set_location(&mut self, url: impl Into<String>) {
        self.location = Some(url.into());
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<&PendingTransition> {
        self.pending.as_ref()
    }

    pub fn history(&self) -> &NavigationHistory {
        &self.history
    }

    /// A visit is about to start: select the clicked link's animation if one
    /// was captured, else the default.
    pub fn before_visit(&mut self, url: &str, clicked_animation: Option<&str>, default: &str) {
        let name = clicked_animation
            .filter(|n| !n.is_empty())
            .unwrap_or(default);
        tracing::debug!(animation = %name, url = %url, "pending transition");
        self.pending = Some(PendingTransition {
            animation_name: name.to_string(),
            destination_url: url.to_string(),
            origin_url: self.location.clone(),
        });
    }

    /// Refinement only: a restore visit with nothing pending adopts the
    /// animation recorded for the current URL, else the default. Restore
    /// visits carry no origin, so resolving them records nothing.
    pub fn visit(&mut self, url: &str, action: VisitAction, default: &str) {
        if self.pending.is_some() || action != VisitAction::Restore {
            return;
        }
        let name = self
            .location
            .as_deref()
            .and_then(|loc| self.history.lookup(loc))
            .unwrap_or(default);
        tracing::debug!(animation = %name, url = %url, "restore visit adopted transition");
        self.pending = Some(PendingTransition {
            animation_name: name.to_string(),
            destination_url: url.to_string(),
            origin_url: None,
        });
    }

    /// Resolve the pending navigation against the rendered direction.
    ///
    /// `back` mirrors the animation recorded when the destination was
    /// originally left; any other direction records origin -> animation
    /// (write-on-leave) under the FIFO bound. Clears the pending state and
    /// advances the tracked location.
    pub fn before_render(&mut self, direction: Option<Direction>) -> Option<ResolvedTransition> {
        let pending = self.pending.take()?;
        let mut name = pending.animation_name;

        if direction == Some(Direction::Back) {
            if let Some(stored) = self.history.lookup(&pending.destination_url) {
                tracing::debug!(animation = %stored, url = %pending.destination_url, "back navigation mirrors stored transition");
                name = stored.to_string();
            }
        } else if let Some(origin) = &pending.origin_url {
            self.history.record(origin, &name);
            tracing::debug!(animation = %name, origin = %origin, entries = self.history.len(), "recorded leave transition");
        }

        self.location = Some(pending.destination_url);
        Some(ResolvedTransition {
            name,
            direction: direction.unwrap_or(Direction::None),
        })
    }

    /// Drop any in-flight navigation and all history.
    pub fn reset(&mut self) {
        self.pending = None;
        self.location = None;
        self.history.clear();
    }
}
