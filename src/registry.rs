use std::collections::BTreeMap;

use crate::css;
use crate::descriptor::{AnimationDescriptor, KeyframeSet};
use crate::error::{ViewshiftError, ViewshiftResult};

const DEFAULT_DURATION_MS: u32 = 300;
const DEFAULT_EASING: &str = "ease-out";

/// Owning catalog of named animation descriptors.
///
/// Names are unique; the last registration for a name wins but keeps the
/// original position in [`AnimationRegistry::list`]. Stored descriptors are
/// normalized copies and never patched in place.
#[derive(Clone, Debug, Default)]
pub struct AnimationRegistry {
    animations: BTreeMap<String, AnimationDescriptor>,
    order: Vec<String>,
}

impl AnimationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `descriptor` under `name`, replacing any previous registration
    /// wholesale.
    ///
    /// Fails with `InvalidArgument` when the name is empty or the descriptor
    /// carries no keyframes at all. The stored copy is normalized: the name is
    /// stamped from the key, an unset duration becomes 300 ms, an unset easing
    /// becomes `ease-out`.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        descriptor: AnimationDescriptor,
    ) -> ViewshiftResult<()> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ViewshiftError::invalid_argument(
                "animation name must be non-empty",
            ));
        }
        descriptor.validate()?;

        let mut stored = descriptor;
        stored.name = name.clone();
        if stored.duration_ms == 0 {
            stored.duration_ms = DEFAULT_DURATION_MS;
        }
        if stored.easing.trim().is_empty() {
            stored.easing = DEFAULT_EASING.to_string();
        }

        if self.animations.insert(name.clone(), stored).is_none() {
            self.order.push(name.clone());
        }
        tracing::debug!(animation = %name, "registered animation");
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&AnimationDescriptor> {
        self.animations.get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.animations.contains_key(name)
    }

    /// Like [`AnimationRegistry::get`] but with an error for callers that treat
    /// an unknown name as fatal. The generation path never does.
    pub fn require(&self, name: &str) -> ViewshiftResult<&AnimationDescriptor> {
        self.get(name)
            .ok_or_else(|| ViewshiftError::not_found(name))
    }

    /// Registered names in registration order.
    pub fn list(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn clear(&mut self) {
        self.animations.clear();
        self.order.clear();
    }

    /// Emit a raw `@keyframes` block under `name` for the given steps.
    pub fn generate_keyframe_css(&self, name: &str, steps: &KeyframeSet) -> String {
        css::keyframes_block(name, steps)
    }
}
