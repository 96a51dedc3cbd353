use std::collections::BTreeMap;

use crate::error::{ViewshiftError, ViewshiftResult};
use crate::navigation::StreamAction;

/// Reduced-motion policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReducedMotion {
    /// Honor the user's `prefers-reduced-motion` setting.
    Respect,
    /// Never animate.
    Disable,
    /// Animate regardless of the user's setting.
    Force,
}

/// Per-stream-action animation names.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StreamTransitions {
    pub append: String,
    pub prepend: String,
    pub replace: String,
    pub update: String,
    pub remove: String,
    pub before: String,
    pub after: String,
}

impl Default for StreamTransitions {
    fn default() -> Self {
        Self {
            append: "fade-up".to_string(),
            prepend: "fade-down".to_string(),
            replace: "morph".to_string(),
            update: "morph".to_string(),
            remove: "fade-out".to_string(),
            before: "slide-right".to_string(),
            after: "slide-left".to_string(),
        }
    }
}

impl StreamTransitions {
    pub fn for_action(&self, action: StreamAction) -> &str {
        match action {
            StreamAction::Append => &self.append,
            StreamAction::Prepend => &self.prepend,
            StreamAction::Replace => &self.replace,
            StreamAction::Update => &self.update,
            StreamAction::Remove => &self.remove,
            StreamAction::Before => &self.before,
            StreamAction::After => &self.after,
        }
    }
}

/// The full configuration value set.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigValues {
    pub default_transition: String,
    /// Milliseconds.
    pub duration: u32,
    pub easing: String,
    pub debug: bool,
    pub auto_inject: bool,
    pub reduced_motion: ReducedMotion,
    pub prefers_reduced_motion_fallback: String,
    /// Milliseconds.
    pub cleanup_interval: u32,
    /// Frame id -> animation name.
    pub frames: BTreeMap<String, String>,
    pub streams: StreamTransitions,
    /// Element id -> animation name.
    pub targets: BTreeMap<String, String>,
}

impl Default for ConfigValues {
    fn default() -> Self {
        Self {
            default_transition: "fade".to_string(),
            duration: 300,
            easing: "ease-out".to_string(),
            debug: false,
            auto_inject: true,
            reduced_motion: ReducedMotion::Respect,
            prefers_reduced_motion_fallback: "none".to_string(),
            cleanup_interval: 5000,
            frames: BTreeMap::new(),
            streams: StreamTransitions::default(),
            targets: BTreeMap::new(),
        }
    }
}

impl ConfigValues {
    pub fn validate(&self) -> ViewshiftResult<()> {
        if self.default_transition.trim().is_empty() {
            return Err(ViewshiftError::validation(
                "defaultTransition must be non-empty",
            ));
        }
        if self.easing.trim().is_empty() {
            return Err(ViewshiftError::validation("easing must be non-empty"));
        }
        Ok(())
    }

    fn apply(&mut self, patch: ConfigPatch) {
        if let Some(v) = patch.default_transition {
            self.default_transition = v;
        }
        if let Some(v) = patch.duration {
            self.duration = v;
        }
        if let Some(v) = patch.easing {
            self.easing = v;
        }
        if let Some(v) = patch.debug {
            self.debug = v;
        }
        if let Some(v) = patch.auto_inject {
            self.auto_inject = v;
        }
        if let Some(v) = patch.reduced_motion {
            self.reduced_motion = v;
        }
        if let Some(v) = patch.prefers_reduced_motion_fallback {
            self.prefers_reduced_motion_fallback = v;
        }
        if let Some(v) = patch.cleanup_interval {
            self.cleanup_interval = v;
        }
        // map patches merge key-wise instead of replacing the whole map
        self.frames.extend(patch.frames);
        self.targets.extend(patch.targets);
        if let Some(v) = patch.streams {
            self.streams = v;
        }
    }
}

/// Partial configuration update. Unset fields keep their current value; map
/// fields merge key-wise.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigPatch {
    pub default_transition: Option<String>,
    pub duration: Option<u32>,
    pub easing: Option<String>,
    pub debug: Option<bool>,
    pub auto_inject: Option<bool>,
    pub reduced_motion: Option<ReducedMotion>,
    pub prefers_reduced_motion_fallback: Option<String>,
    pub cleanup_interval: Option<u32>,
    pub frames: BTreeMap<String, String>,
    pub streams: Option<StreamTransitions>,
    pub targets: BTreeMap<String, String>,
}

/// Handle for removing a registered change listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ListenerId(u64);

/// Change notification passed to listeners.
#[derive(Debug)]
pub struct ConfigChange<'a> {
    /// `"*"` for updates, `"reset"` for resets.
    pub scope: &'a str,
    pub config: &'a ConfigValues,
}

type Listener = Box<dyn FnMut(&ConfigChange<'_>) -> anyhow::Result<()>>;

/// Configuration store with change listeners.
///
/// Listeners run in registration order; a failing listener is logged and never
/// aborts notification of the remaining ones.
#[derive(Default)]
pub struct Config {
    values: ConfigValues,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u64,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("values", &self.values)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Config {
    pub fn new(patch: ConfigPatch) -> Self {
        let mut values = ConfigValues::default();
        values.apply(patch);
        Self {
            values,
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    pub fn get(&self) -> &ConfigValues {
        &self.values
    }

    /// Merge `patch` into the current values and notify listeners.
    pub fn update(&mut self, patch: ConfigPatch) {
        self.values.apply(patch);
        self.notify("*");
    }

    /// Restore defaults, apply `patch`, and notify listeners.
    pub fn reset(&mut self, patch: ConfigPatch) {
        self.values = ConfigValues::default();
        self.values.apply(patch);
        self.notify("reset");
    }

    pub fn add_listener(
        &mut self,
        listener: impl FnMut(&ConfigChange<'_>) -> anyhow::Result<()> + 'static,
    ) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    fn notify(&mut self, scope: &str) {
        let change = ConfigChange {
            scope,
            config: &self.values,
        };
        for (id, listener) in &mut self.listeners {
            if let Err(err) = listener(&change) {
                tracing::warn!(listener = id.0, error = %err, "config listener failed");
            }
        }
    }

    /// Current values as a JSON value.
    pub fn export(&self) -> ViewshiftResult<serde_json::Value> {
        serde_json::to_value(&self.values).map_err(|e| ViewshiftError::validation(e.to_string()))
    }

    /// Apply a JSON patch after validating the result it would produce.
    pub fn import(&mut self, value: serde_json::Value) -> ViewshiftResult<()> {
        let patch: ConfigPatch = serde_json::from_value(value)
            .map_err(|e| ViewshiftError::validation(format!("invalid configuration: {e}")))?;
        let mut candidate = self.values.clone();
        candidate.apply(patch.clone());
        candidate.validate()?;
        self.update(patch);
        Ok(())
    }

    // --- resolution helpers ---

    pub fn stream_transition(&self, action: StreamAction) -> &str {
        let name = self.values.streams.for_action(action);
        if name.is_empty() {
            &self.values.default_transition
        } else {
            name
        }
    }

    pub fn frame_transition(&self, frame_id: &str) -> &str {
        self.values
            .frames
            .get(frame_id)
            .map(String::as_str)
            .unwrap_or(&self.values.default_transition)
    }

    /// Whether navigation events should produce CSS at all, given the user's
    /// `prefers-reduced-motion` state as supplied by the host.
    pub fn should_animate(&self, prefers_reduced_motion: bool) -> bool {
        if !self.values.auto_inject {
            return false;
        }
        match self.values.reduced_motion {
            ReducedMotion::Respect => !prefers_reduced_motion,
            ReducedMotion::Disable => false,
            ReducedMotion::Force => true,
        }
    }

    /// Fallback animation for reduced-motion users, when the policy respects
    /// their preference.
    pub fn reduced_motion_fallback(&self, prefers_reduced_motion: bool) -> Option<&str> {
        if prefers_reduced_motion && self.values.reduced_motion == ReducedMotion::Respect {
            Some(&self.values.prefers_reduced_motion_fallback)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn defaults_match_shipped_configuration() {
        let config = Config::new(ConfigPatch::default());
        let values = config.get();
        assert_eq!(values.default_transition, "fade");
        assert_eq!(values.duration, 300);
        assert_eq!(values.easing, "ease-out");
        assert!(values.auto_inject);
        assert_eq!(values.reduced_motion, ReducedMotion::Respect);
        assert_eq!(values.streams.replace, "morph");
        assert_eq!(values.cleanup_interval, 5000);
    }

    #[test]
    fn update_merges_and_preserves_unset_fields() {
        let mut config = Config::new(ConfigPatch::default());
        config.update(ConfigPatch {
            default_transition: Some("slide".to_string()),
            frames: BTreeMap::from([("modal".to_string(), "zoom".to_string())]),
            ..Default::default()
        });
        assert_eq!(config.get().default_transition, "slide");
        assert_eq!(config.get().duration, 300);
        assert_eq!(config.frame_transition("modal"), "zoom");
        assert_eq!(config.frame_transition("other"), "slide");
    }

    #[test]
    fn should_animate_honors_policy() {
        let mut config = Config::new(ConfigPatch::default());
        assert!(config.should_animate(false));
        assert!(!config.should_animate(true));

        config.update(ConfigPatch {
            reduced_motion: Some(ReducedMotion::Force),
            ..Default::default()
        });
        assert!(config.should_animate(true));

        config.update(ConfigPatch {
            auto_inject: Some(false),
            ..Default::default()
        });
        assert!(!config.should_animate(false));
    }

    #[test]
    fn reduced_motion_fallback_only_when_respected() {
        let mut config = Config::new(ConfigPatch::default());
        assert_eq!(config.reduced_motion_fallback(true), Some("none"));
        assert_eq!(config.reduced_motion_fallback(false), None);

        config.update(ConfigPatch {
            reduced_motion: Some(ReducedMotion::Force),
            ..Default::default()
        });
        assert_eq!(config.reduced_motion_fallback(true), None);
    }

    #[test]
    fn failing_listener_does_not_block_later_listeners() {
        let mut config = Config::new(ConfigPatch::default());
        let seen = Rc::new(RefCell::new(Vec::new()));

        let s = seen.clone();
        config.add_listener(move |_| {
            s.borrow_mut().push("first");
            anyhow::bail!("listener exploded")
        });
        let s = seen.clone();
        config.add_listener(move |change| {
            s.borrow_mut().push("second");
            assert_eq!(change.scope, "*");
            Ok(())
        });

        config.update(ConfigPatch::default());
        assert_eq!(*seen.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn removed_listener_is_not_notified() {
        let mut config = Config::new(ConfigPatch::default());
        let count = Rc::new(RefCell::new(0u32));
        let c = count.clone();
        let id = config.add_listener(move |_| {
            *c.borrow_mut() += 1;
            Ok(())
        });
        config.update(ConfigPatch::default());
        assert!(config.remove_listener(id));
        config.update(ConfigPatch::default());
        assert_eq!(*count.borrow(), 1);
        assert!(!config.remove_listener(id));
    }

    #[test]
    fn import_rejects_invalid_and_preserves_state() {
        let mut config = Config::new(ConfigPatch::default());
        let err = config.import(serde_json::json!({ "defaultTransition": "" }));
        assert!(matches!(err, Err(ViewshiftError::Validation(_))));
        assert_eq!(config.get().default_transition, "fade");

        config
            .import(serde_json::json!({ "defaultTransition": "zoom", "duration": 450 }))
            .unwrap();
        assert_eq!(config.get().default_transition, "zoom");
        assert_eq!(config.get().duration, 450);
    }

    #[test]
    fn export_roundtrips_through_import() {
        let mut config = Config::new(ConfigPatch {
            default_transition: Some("flip".to_string()),
            ..Default::default()
        });
        let exported = config.export().unwrap();
        let mut other = Config::new(ConfigPatch::default());
        other.import(exported).unwrap();
        assert_eq!(other.get(), config.get());
    }

    #[test]
    fn reset_restores_defaults_then_applies_patch() {
        let mut config = Config::new(ConfigPatch {
            duration: Some(900),
            ..Default::default()
        });
        config.reset(ConfigPatch {
            easing: Some("linear".to_string()),
            ..Default::default()
        });
        assert_eq!(config.get().duration, 300);
        assert_eq!(config.get().easing, "linear");
    }
}
