//! Pure CSS text synthesis: property-name casing, `@keyframes` emission, and
//! the selector/name templates shared by the registry and the generator.
//!
//! Everything here is a total string transform with no error conditions. The
//! emitted templates are a stable contract for stylesheets written against
//! generated names.

use std::fmt::Write;

use crate::descriptor::{Direction, KeyframeSet};

/// Convert a camelCase property name to kebab-case.
///
/// A hyphen is inserted at every lowercase-letter/uppercase-letter boundary,
/// then the whole string is lowercased. Already-kebab or lowercase input passes
/// through unchanged.
pub fn kebab_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    let mut prev_lower = false;
    for c in s.chars() {
        if prev_lower && c.is_ascii_uppercase() {
            out.push('-');
        }
        prev_lower = c.is_ascii_lowercase();
        out.push(c.to_ascii_lowercase());
    }
    out
}

/// Emit one `@keyframes` block. Step keys are used verbatim; property keys are
/// kebab-cased.
pub fn keyframes_block(name: &str, steps: &KeyframeSet) -> String {
    let mut frames = String::new();
    for (step, properties) in steps.steps() {
        if !frames.is_empty() {
            frames.push(' ');
        }
        let _ = write!(frames, "{step} {{");
        for (prop, value) in properties {
            let _ = write!(frames, " {}: {};", kebab_case(prop), value);
        }
        frames.push_str(" }");
    }
    format!("@keyframes {name} {{ {frames} }}")
}

/// Naming scheme for every generated class, keyframe, selector, and
/// view-transition scope. One namespace covers them all.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CssScheme {
    /// Prefix for marker classes, keyframe names, and scope names.
    pub namespace: String,
    /// Root-element attribute carrying the visit direction.
    pub direction_attribute: String,
    /// Name of the identity/morph animation, which binds element scopes
    /// without contributing keyframes.
    pub morph_animation: String,
}

impl Default for CssScheme {
    fn default() -> Self {
        Self {
            namespace: "viewshift".to_string(),
            direction_attribute: "data-visit-direction".to_string(),
            morph_animation: "morph".to_string(),
        }
    }
}

impl CssScheme {
    /// Marker class toggled on the root element to select an animation's rules.
    pub fn marker_class(&self, animation: &str) -> String {
        format!("{}-{animation}", self.namespace)
    }

    /// `@keyframes` name for one snapshot half of one direction.
    pub fn keyframe_name(&self, animation: &str, half: &str, direction: Direction) -> String {
        format!(
            "{}-{animation}-{half}-{}",
            self.namespace,
            direction.as_str()
        )
    }

    /// Root selector combining the marker class with the direction condition.
    ///
    /// Directional rules use attribute equality; the `none` fallback negates
    /// attribute presence so it can never shadow a directional rule.
    pub fn root_selector(&self, animation: &str, direction: Direction) -> String {
        let class = self.marker_class(animation);
        match direction {
            Direction::Forward | Direction::Back => format!(
                "html.{class}[{}=\"{}\"]",
                self.direction_attribute,
                direction.as_str()
            ),
            Direction::None => format!("html.{class}:not([{}])", self.direction_attribute),
        }
    }

    /// View-transition scope name binding one element id.
    pub fn element_scope(&self, id: &str) -> String {
        format!("{}-element-{id}", self.namespace)
    }

    /// Scope name used by morph targets.
    pub fn morph_scope(&self, id: &str) -> String {
        format!("{}-{}-{id}", self.namespace, self.morph_animation)
    }
}
