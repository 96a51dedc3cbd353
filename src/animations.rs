//! Built-in animation catalog.
//!
//! The same seven effects the declarative surface documents: `fade`, `flip`,
//! `morph`, `slide`, `slide-down`, `slide-up`, `zoom`. Each descriptor carries
//! its own direction table; `fade` and `morph` rely on the base pair for every
//! direction.

use crate::descriptor::{
    AnimationDescriptor, DirectionOverrides, KeyframeSet, SnapshotPair, props,
};
use crate::error::ViewshiftResult;
use crate::registry::AnimationRegistry;

fn fade_pair() -> SnapshotPair {
    SnapshotPair {
        old: KeyframeSet::from_to(props(&[("opacity", "1")]), props(&[("opacity", "0")])),
        new: KeyframeSet::from_to(props(&[("opacity", "0")]), props(&[("opacity", "1")])),
    }
}

/// Transform-driven pair: the outgoing snapshot animates from `identity` to
/// `out_to` while fading out, the incoming one from `in_from` to `identity`
/// while fading in.
fn motion_pair(identity: &str, out_to: &str, in_from: &str) -> SnapshotPair {
    SnapshotPair {
        old: KeyframeSet::from_to(
            props(&[("transform", identity), ("opacity", "1")]),
            props(&[("transform", out_to), ("opacity", "0")]),
        ),
        new: KeyframeSet::from_to(
            props(&[("transform", in_from), ("opacity", "0")]),
            props(&[("transform", identity), ("opacity", "1")]),
        ),
    }
}

pub fn fade() -> AnimationDescriptor {
    AnimationDescriptor {
        name: "fade".to_string(),
        duration_ms: 300,
        easing: "ease-out".to_string(),
        view_transitions: Some(fade_pair()),
        ..Default::default()
    }
}

pub fn flip() -> AnimationDescriptor {
    let identity = "perspective(600px) rotateY(0deg)";
    AnimationDescriptor {
        name: "flip".to_string(),
        duration_ms: 400,
        easing: "ease-in-out".to_string(),
        view_transitions: Some(motion_pair(
            identity,
            "perspective(600px) rotateY(-90deg)",
            "perspective(600px) rotateY(90deg)",
        )),
        directions: DirectionOverrides {
            forward: Some(motion_pair(
                identity,
                "perspective(600px) rotateY(-90deg)",
                "perspective(600px) rotateY(90deg)",
            )),
            back: Some(motion_pair(
                identity,
                "perspective(600px) rotateY(90deg)",
                "perspective(600px) rotateY(-90deg)",
            )),
            none: Some(motion_pair(
                identity,
                "perspective(600px) rotateY(-45deg)",
                "perspective(600px) rotateY(45deg)",
            )),
        },
        ..Default::default()
    }
}

pub fn morph() -> AnimationDescriptor {
    AnimationDescriptor {
        name: "morph".to_string(),
        duration_ms: 400,
        easing: "cubic-bezier(0.4, 0, 0.2, 1)".to_string(),
        view_transitions: Some(fade_pair()),
        requires_element: true,
        uses_view_transition_name: true,
        ..Default::default()
    }
}

pub fn slide() -> AnimationDescriptor {
    AnimationDescriptor {
        name: "slide".to_string(),
        duration_ms: 300,
        easing: "ease-out".to_string(),
        view_transitions: Some(motion_pair(
            "translateX(0)",
            "translateX(-100%)",
            "translateX(100%)",
        )),
        directions: DirectionOverrides {
            forward: Some(motion_pair(
                "translateX(0)",
                "translateX(-100%)",
                "translateX(100%)",
            )),
            back: Some(motion_pair(
                "translateX(0)",
                "translateX(100%)",
                "translateX(-100%)",
            )),
            none: Some(motion_pair(
                "translateX(0)",
                "translateX(-50%)",
                "translateX(50%)",
            )),
        },
        ..Default::default()
    }
}

pub fn slide_down() -> AnimationDescriptor {
    AnimationDescriptor {
        name: "slide-down".to_string(),
        duration_ms: 300,
        easing: "ease-out".to_string(),
        view_transitions: Some(motion_pair(
            "translateY(0)",
            "translateY(100%)",
            "translateY(-100%)",
        )),
        directions: DirectionOverrides {
            forward: Some(motion_pair(
                "translateY(0)",
                "translateY(100%)",
                "translateY(-100%)",
            )),
            back: Some(motion_pair(
                "translateY(0)",
                "translateY(-100%)",
                "translateY(100%)",
            )),
            none: Some(motion_pair(
                "translateY(0)",
                "translateY(50%)",
                "translateY(-50%)",
            )),
        },
        ..Default::default()
    }
}

pub fn slide_up() -> AnimationDescriptor {
    AnimationDescriptor {
        name: "slide-up".to_string(),
        duration_ms: 300,
        easing: "ease-out".to_string(),
        view_transitions: Some(motion_pair(
            "translateY(0)",
            "translateY(-100%)",
            "translateY(100%)",
        )),
        directions: DirectionOverrides {
            forward: Some(motion_pair(
                "translateY(0)",
                "translateY(-100%)",
                "translateY(100%)",
            )),
            back: Some(motion_pair(
                "translateY(0)",
                "translateY(100%)",
                "translateY(-100%)",
            )),
            none: Some(motion_pair(
                "translateY(0)",
                "translateY(-50%)",
                "translateY(50%)",
            )),
        },
        ..Default::default()
    }
}

pub fn zoom() -> AnimationDescriptor {
    AnimationDescriptor {
        name: "zoom".to_string(),
        duration_ms: 300,
        easing: "ease-out".to_string(),
        view_transitions: Some(motion_pair("scale(1)", "scale(1.1)", "scale(0.9)")),
        directions: DirectionOverrides {
            forward: Some(motion_pair("scale(1)", "scale(0.8)", "scale(1.2)")),
            back: Some(motion_pair("scale(1)", "scale(1.2)", "scale(0.8)")),
            none: Some(motion_pair("scale(1)", "scale(0.95)", "scale(1.05)")),
        },
        ..Default::default()
    }
}

/// Register the whole built-in catalog.
pub fn register_builtins(registry: &mut AnimationRegistry) -> ViewshiftResult<()> {
    for descriptor in [
        fade(),
        flip(),
        morph(),
        slide(),
        slide_down(),
        slide_up(),
        zoom(),
    ] {
        let name = descriptor.name.clone();
        registry.register(name, descriptor)?;
    }
    Ok(())
}
