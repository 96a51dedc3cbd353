use std::collections::BTreeMap;

use crate::error::{ViewshiftError, ViewshiftResult};

/// CSS property name (camelCase or kebab-case) -> value string.
pub type PropertyMap = BTreeMap<String, String>;

/// Navigation direction semantics for a resolved transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Forward,
    Back,
    None,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Forward => "forward",
            Self::Back => "back",
            Self::None => "none",
        }
    }
}

/// Keyframe steps for one snapshot: step key (`from`, `to`, `"30%"`, ...) -> properties.
/// Step keys are emitted verbatim.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct KeyframeSet(pub BTreeMap<String, PropertyMap>);

impl KeyframeSet {
    pub fn from_to(from: PropertyMap, to: PropertyMap) -> Self {
        let mut steps = BTreeMap::new();
        steps.insert("from".to_string(), from);
        steps.insert("to".to_string(), to);
        Self(steps)
    }

    pub fn steps(&self) -> impl Iterator<Item = (&str, &PropertyMap)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Keyframes for the outgoing (`old`) and incoming (`new`) page snapshots.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SnapshotPair {
    pub old: KeyframeSet,
    pub new: KeyframeSet,
}

impl SnapshotPair {
    /// A pair is renderable only when both snapshots carry keyframes.
    pub fn is_complete(&self) -> bool {
        !self.old.is_empty() && !self.new.is_empty()
    }
}

/// Optional per-direction overrides of the base snapshot pair.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DirectionOverrides {
    pub forward: Option<SnapshotPair>,
    pub back: Option<SnapshotPair>,
    pub none: Option<SnapshotPair>,
}

impl DirectionOverrides {
    pub fn is_empty(&self) -> bool {
        self.forward.is_none() && self.back.is_none() && self.none.is_none()
    }

    pub fn get(&self, direction: Direction) -> Option<&SnapshotPair> {
        match direction {
            Direction::Forward => self.forward.as_ref(),
            Direction::Back => self.back.as_ref(),
            Direction::None => self.none.as_ref(),
        }
    }
}

/// Declarative record of timing, easing, and keyframe data for a named
/// transition effect. Immutable once registered; re-registration replaces the
/// stored descriptor wholesale.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnimationDescriptor {
    pub name: String,
    /// Milliseconds. Zero means "unset"; registration normalizes it to 300.
    #[serde(rename = "duration")]
    pub duration_ms: u32,
    /// CSS easing string. Empty means "unset"; registration normalizes it to `ease-out`.
    pub easing: String,
    /// Base keyframes used for directions with no override.
    pub view_transitions: Option<SnapshotPair>,
    pub directions: DirectionOverrides,
    /// Metadata carried by identity/morph-style animations.
    pub requires_element: bool,
    pub uses_view_transition_name: bool,
}

impl AnimationDescriptor {
    pub fn has_direction_overrides(&self) -> bool {
        !self.directions.is_empty()
    }

    /// Keyframes for `direction`, falling back to the base pair when the
    /// direction has no override.
    pub fn snapshot_for(&self, direction: Direction) -> Option<&SnapshotPair> {
        self.directions
            .get(direction)
            .or(self.view_transitions.as_ref())
    }

    /// The base pair, or `MalformedDescriptor` when absent or incomplete.
    pub fn base_pair(&self) -> ViewshiftResult<&SnapshotPair> {
        match &self.view_transitions {
            Some(pair) if pair.is_complete() => Ok(pair),
            Some(_) => Err(ViewshiftError::malformed(format!(
                "animation '{}' is missing an old or new keyframe set",
                self.name
            ))),
            None => Err(ViewshiftError::malformed(format!(
                "animation '{}' has no view transitions",
                self.name
            ))),
        }
    }

    /// A descriptor is registrable when it carries keyframes for at least one
    /// direction (the base pair or any override).
    pub fn validate(&self) -> ViewshiftResult<()> {
        if self.view_transitions.is_none() && self.directions.is_empty() {
            return Err(ViewshiftError::invalid_argument(
                "descriptor must define viewTransitions or at least one direction override",
            ));
        }
        Ok(())
    }
}

/// Build a [`PropertyMap`] from literal pairs.
pub fn props(entries: &[(&str, &str)]) -> PropertyMap {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
