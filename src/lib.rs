//! Viewshift synthesizes CSS view-transition animations for client-side page
//! navigation.
//!
//! The pipeline: a navigation lifecycle event goes into [`Viewshift::dispatch`],
//! the [`navigation::NavigationState`] machine resolves which animation applies
//! (mirroring the recorded animation on back-navigation), the
//! [`generator::Generator`] assembles one deduplicated, direction-aware CSS
//! string from [`registry::AnimationRegistry`] descriptors, and the
//! [`inject::Injector`] upserts it idempotently behind a [`inject::StyleSink`].
//! The host applies the returned [`session::Directives`] (marker classes, a
//! delayed cleanup task) to the document; actual interpolation is the rendering
//! engine's job.
#![forbid(unsafe_code)]

pub mod animations;
pub mod config;
pub mod css;
pub mod descriptor;
pub mod error;
pub mod generator;
pub mod inject;
pub mod navigation;
pub mod registry;
pub mod session;

pub use config::{Config, ConfigPatch, ConfigValues, ReducedMotion};
pub use css::CssScheme;
pub use descriptor::{
    AnimationDescriptor, Direction, DirectionOverrides, KeyframeSet, PropertyMap, SnapshotPair,
};
pub use error::{ViewshiftError, ViewshiftResult};
pub use generator::{FormRef, FrameRef, Generator, LinkRef, TargetRef, TransitionBatch};
pub use inject::{Injector, MemorySink, StyleSink};
pub use navigation::{
    NavigationEvent, NavigationHistory, NavigationState, ResolvedTransition, StreamAction,
    VisitAction,
};
pub use registry::AnimationRegistry;
pub use session::{CleanupTask, Directives, Viewshift, ViewshiftOpts};
