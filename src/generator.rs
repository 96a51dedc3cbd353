use std::collections::BTreeSet;

use crate::css::{self, CssScheme};
use crate::descriptor::{AnimationDescriptor, Direction, SnapshotPair};
use crate::registry::AnimationRegistry;

/// One batch of navigation intents collected from the page, handed to
/// [`Generator::generate`] as plain data.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransitionBatch {
    pub links: Vec<LinkRef>,
    pub forms: Vec<FormRef>,
    pub frames: Vec<FrameRef>,
    pub targets: Vec<TargetRef>,
}

impl TransitionBatch {
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
            && self.forms.is_empty()
            && self.frames.is_empty()
            && self.targets.is_empty()
    }

    /// Batch holding a single root-scoped animation reference.
    pub fn single(transition: impl Into<String>) -> Self {
        Self {
            links: vec![LinkRef {
                transition: transition.into(),
                href: None,
            }],
            ..Default::default()
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LinkRef {
    pub transition: String,
    pub href: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormRef {
    pub transition: String,
    pub success_transition: Option<String>,
    /// Scanner data; contributes no CSS.
    pub error_transition: Option<String>,
    pub action: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FrameRef {
    pub id: String,
    pub transition: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TargetRef {
    pub id: String,
    pub transition: String,
}

/// Assembles one deduplicated CSS string for a batch of navigation intents.
///
/// Root-scoped references (links, forms, frames) are emitted at most once per
/// animation name per call; element targets always get their own scoped CSS.
/// Unknown or malformed animation references contribute nothing.
#[derive(Clone, Debug, Default)]
pub struct Generator {
    scheme: CssScheme,
    // Element scope names bound so far. Bookkeeping only; the per-call
    // processed set is what guarantees deduplication.
    scope_names: BTreeSet<String>,
}

impl Generator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scheme(scheme: CssScheme) -> Self {
        Self {
            scheme,
            scope_names: BTreeSet::new(),
        }
    }

    pub fn scheme(&self) -> &CssScheme {
        &self.scheme
    }

    /// Element scope names bound by previous calls, until [`Generator::clear`].
    pub fn scope_names(&self) -> impl Iterator<Item = &str> {
        self.scope_names.iter().map(String::as_str)
    }

    #[tracing::instrument(skip(self, registry, batch))]
    pub fn generate(&mut self, registry: &AnimationRegistry, batch: &TransitionBatch) -> String {
        let mut blocks: Vec<String> = Vec::new();
        // Re-created every call: dedup must never bleed across generation passes.
        let mut processed: BTreeSet<String> = BTreeSet::new();

        for link in &batch.links {
            self.push_root_css(&mut blocks, &mut processed, registry, &link.transition);
        }
        for form in &batch.forms {
            self.push_root_css(&mut blocks, &mut processed, registry, &form.transition);
            if let Some(success) = &form.success_transition {
                self.push_root_css(&mut blocks, &mut processed, registry, success);
            }
        }
        for frame in &batch.frames {
            self.push_root_css(&mut blocks, &mut processed, registry, &frame.transition);
        }
        for target in &batch.targets {
            self.push_element_css(&mut blocks, registry, target);
        }

        blocks.join("\n")
    }

    /// Reset persistent bookkeeping between independent generation passes.
    pub fn clear(&mut self) {
        self.scope_names.clear();
    }

    fn push_root_css(
        &self,
        blocks: &mut Vec<String>,
        processed: &mut BTreeSet<String>,
        registry: &AnimationRegistry,
        name: &str,
    ) {
        if name.is_empty() || processed.contains(name) {
            return;
        }
        let Some(animation) = registry.get(name) else {
            tracing::debug!(animation = %name, "skipping unknown animation");
            return;
        };
        processed.insert(name.to_string());

        // Either the defined override blocks, or exactly one base block tagged
        // as the no-direction fallback. Never both.
        if animation.has_direction_overrides() {
            for direction in [Direction::Forward, Direction::Back, Direction::None] {
                if let Some(pair) = animation.directions.get(direction) {
                    blocks.extend(self.directional_block(name, direction, pair, animation));
                }
            }
        } else if let Some(pair) = &animation.view_transitions {
            blocks.extend(self.directional_block(name, Direction::None, pair, animation));
        }
    }

    fn directional_block(
        &self,
        name: &str,
        direction: Direction,
        pair: &SnapshotPair,
        animation: &AnimationDescriptor,
    ) -> Option<String> {
        if !pair.is_complete() {
            tracing::debug!(animation = %name, direction = direction.as_str(), "skipping incomplete snapshot pair");
            return None;
        }

        let old_name = self.scheme.keyframe_name(name, "old", direction);
        let new_name = self.scheme.keyframe_name(name, "new", direction);
        let selector = self.scheme.root_selector(name, direction);
        let duration = animation.duration_ms;
        let easing = &animation.easing;

        Some(format!(
            "{old_keyframes}\n{new_keyframes}\n\
             {selector}::view-transition-old(root) {{\n  animation: {old_name} {duration}ms {easing};\n}}\n\
             {selector}::view-transition-new(root) {{\n  animation: {new_name} {duration}ms {easing};\n}}",
            old_keyframes = css::keyframes_block(&old_name, &pair.old),
            new_keyframes = css::keyframes_block(&new_name, &pair.new),
        ))
    }

    fn push_element_css(
        &mut self,
        blocks: &mut Vec<String>,
        registry: &AnimationRegistry,
        target: &TargetRef,
    ) {
        if target.id.is_empty() || target.transition.is_empty() {
            return;
        }

        // The morph animation binds a scope name and nothing else, and does so
        // whether or not it is registered.
        if target.transition == self.scheme.morph_animation {
            let scope = self.scheme.morph_scope(&target.id);
            blocks.push(format!(
                "#{id} {{\n  view-transition-name: {scope};\n}}",
                id = target.id
            ));
            self.scope_names.insert(scope);
            return;
        }

        let Some(animation) = registry.get(&target.transition) else {
            tracing::debug!(animation = %target.transition, target = %target.id, "skipping unknown target animation");
            return;
        };

        let scope = self.scheme.element_scope(&target.id);
        blocks.push(format!(
            "#{id} {{\n  view-transition-name: {scope};\n}}",
            id = target.id
        ));
        self.scope_names.insert(scope.clone());

        let Some(pair) = &animation.view_transitions else {
            return;
        };
        if !pair.is_complete() {
            return;
        }

        let old_name = format!("{scope}-old");
        let new_name = format!("{scope}-new");
        let duration = animation.duration_ms;
        let easing = &animation.easing;
        blocks.push(format!(
            "{old_keyframes}\n{new_keyframes}\n\
             ::view-transition-old({scope}) {{\n  animation: {old_name} {duration}ms {easing};\n}}\n\
             ::view-transition-new({scope}) {{\n  animation: {new_name} {duration}ms {easing};\n}}",
            old_keyframes = css::keyframes_block(&old_name, &pair.old),
            new_keyframes = css::keyframes_block(&new_name, &pair.new),
        ));
    }
}
