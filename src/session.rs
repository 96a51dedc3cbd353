use std::time::Duration;

use crate::animations;
use crate::config::{Config, ConfigPatch, ConfigValues};
use crate::css::CssScheme;
use crate::descriptor::AnimationDescriptor;
use crate::error::ViewshiftResult;
use crate::generator::{FrameRef, Generator, TransitionBatch};
use crate::inject::{Injector, MemorySink, StyleSink};
use crate::navigation::{NavigationEvent, NavigationState, ResolvedTransition};
use crate::registry::AnimationRegistry;

/// Style-node scope for the navigation in flight.
pub const ACTIVE_TRANSITION_SCOPE: &str = "active-transition";

/// Fixed delay before marker classes are swept after a render.
pub const CLEANUP_DELAY: Duration = Duration::from_millis(1000);

/// Construction options for [`Viewshift`].
#[derive(Clone, Debug, Default)]
pub struct ViewshiftOpts {
    pub config: ConfigPatch,
    pub scheme: CssScheme,
    /// Initial `prefers-reduced-motion` state, as read by the host.
    pub prefers_reduced_motion: bool,
    /// The page URL at construction time, if known.
    pub location: Option<String>,
}

/// Best-effort marker-class sweep the host schedules after a render.
///
/// Fire-and-forget: the task only ever removes the listed classes and never
/// touches pending navigation state, so running after a newer navigation has
/// started is harmless. `generation` identifies the navigation that issued the
/// task; hosts wanting stricter behavior can drop tasks that
/// [`CleanupTask::is_stale`] by the time they fire.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CleanupTask {
    pub classes: Vec<String>,
    pub delay: Duration,
    pub generation: u64,
}

impl CleanupTask {
    pub fn is_stale(&self, current_generation: u64) -> bool {
        self.generation != current_generation
    }
}

/// What the host must apply to the document after a dispatch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Directives {
    /// Scope whose style node was written this dispatch, if any.
    pub css_scope: Option<String>,
    /// Marker class to add to the root element.
    pub add_class: Option<String>,
    /// Marker classes to remove first.
    pub remove_classes: Vec<String>,
    /// Class sweep to schedule after [`CleanupTask::delay`].
    pub cleanup: Option<CleanupTask>,
    /// The animation and direction the machine settled on.
    pub resolved: Option<ResolvedTransition>,
}

impl Directives {
    pub fn is_noop(&self) -> bool {
        self.css_scope.is_none()
            && self.add_class.is_none()
            && self.remove_classes.is_empty()
            && self.cleanup.is_none()
            && self.resolved.is_none()
    }
}

/// Explicitly constructed owner of the transition pipeline: registry,
/// generator, navigation machine, config, and injector. The host application
/// owns the instance and feeds it lifecycle events through
/// [`Viewshift::dispatch`].
pub struct Viewshift<S: StyleSink = MemorySink> {
    config: Config,
    registry: AnimationRegistry,
    generator: Generator,
    navigation: NavigationState,
    injector: Injector<S>,
    prefers_reduced_motion: bool,
    generation: u64,
}

impl Viewshift<MemorySink> {
    /// Construct with an in-memory sink (tests, headless generation).
    pub fn new(opts: ViewshiftOpts) -> ViewshiftResult<Self> {
        Self::with_sink(opts, MemorySink::new())
    }
}

impl<S: StyleSink> Viewshift<S> {
    /// Construct against a host-provided style sink and register the built-in
    /// animation catalog.
    pub fn with_sink(opts: ViewshiftOpts, sink: S) -> ViewshiftResult<Self> {
        let mut registry = AnimationRegistry::new();
        animations::register_builtins(&mut registry)?;

        let navigation = match opts.location {
            Some(url) => NavigationState::with_location(url),
            None => NavigationState::new(),
        };

        Ok(Self {
            config: Config::new(opts.config),
            registry,
            generator: Generator::with_scheme(opts.scheme),
            navigation,
            injector: Injector::new(sink),
            prefers_reduced_motion: opts.prefers_reduced_motion,
            generation: 0,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn registry(&self) -> &AnimationRegistry {
        &self.registry
    }

    pub fn navigation(&self) -> &NavigationState {
        &self.navigation
    }

    pub fn injector(&self) -> &Injector<S> {
        &self.injector
    }

    pub fn configure(&mut self, patch: ConfigPatch) {
        self.config.update(patch);
    }

    pub fn register_animation(
        &mut self,
        name: impl Into<String>,
        descriptor: AnimationDescriptor,
    ) -> ViewshiftResult<()> {
        self.registry.register(name, descriptor)
    }

    /// Registered animation names, registration order.
    pub fn list(&self) -> Vec<&str> {
        self.registry.list().collect()
    }

    pub fn set_location(&mut self, url: impl Into<String>) {
        self.navigation.set_location(url);
    }

    pub fn set_prefers_reduced_motion(&mut self, prefers: bool) {
        self.prefers_reduced_motion = prefers;
    }

    /// Generate CSS for a batch without dispatching a navigation event (used
    /// for page-load element targets scanned by the host).
    pub fn generate(&mut self, batch: &TransitionBatch) -> String {
        self.generator.generate(&self.registry, batch)
    }

    fn should_animate(&self) -> bool {
        self.config.should_animate(self.prefers_reduced_motion)
    }

    fn marker_classes(&self) -> Vec<String> {
        let scheme = self.generator.scheme();
        self.registry
            .list()
            .map(|name| scheme.marker_class(name))
            .collect()
    }

    /// Feed one lifecycle event through the pipeline.
    ///
    /// Never fails: unknown animations, lookup misses, and malformed
    /// descriptors all degrade to "no CSS" so a misconfigured page still
    /// renders.
    pub fn dispatch(&mut self, event: NavigationEvent) -> Directives {
        match event {
            NavigationEvent::BeforeVisit {
                url,
                clicked_animation,
            } => {
                if self.should_animate() {
                    let default = self.config.get().default_transition.clone();
                    self.navigation
                        .before_visit(&url, clicked_animation.as_deref(), &default);
                }
                Directives::default()
            }

            NavigationEvent::Visit { url, action } => {
                if self.should_animate() {
                    let default = self.config.get().default_transition.clone();
                    self.navigation.visit(&url, action, &default);
                }
                Directives::default()
            }

            NavigationEvent::BeforeRender { direction } => {
                self.generation += 1;
                let mut directives = Directives::default();

                if let Some(resolved) = self.navigation.before_render(direction) {
                    let css = self
                        .generator
                        .generate(&self.registry, &TransitionBatch::single(&resolved.name));
                    if self.injector.inject(&css, Some(ACTIVE_TRANSITION_SCOPE)) {
                        directives.css_scope = Some(ACTIVE_TRANSITION_SCOPE.to_string());
                    }

                    directives.remove_classes = self.marker_classes();
                    directives.add_class =
                        Some(self.generator.scheme().marker_class(&resolved.name));
                    tracing::debug!(
                        animation = %resolved.name,
                        direction = resolved.direction.as_str(),
                        "render directives issued"
                    );
                    directives.resolved = Some(resolved);
                }

                // Scheduled regardless of outcome; only removes marker classes.
                directives.cleanup = Some(CleanupTask {
                    classes: self.marker_classes(),
                    delay: CLEANUP_DELAY,
                    generation: self.generation,
                });
                directives
            }

            NavigationEvent::BeforeFrameRender { frame_id } => {
                if !self.should_animate() {
                    return Directives::default();
                }
                let transition = self.config.frame_transition(&frame_id).to_string();
                let batch = TransitionBatch {
                    frames: vec![FrameRef {
                        id: frame_id.clone(),
                        transition,
                    }],
                    ..Default::default()
                };
                let css = self.generator.generate(&self.registry, &batch);
                let scope = format!("frame-{frame_id}");
                let mut directives = Directives::default();
                if self.injector.inject(&css, Some(&scope)) {
                    directives.css_scope = Some(scope);
                }
                directives
            }

            NavigationEvent::BeforeStreamRender { action } => {
                if !self.should_animate() {
                    return Directives::default();
                }
                let transition = self.config.stream_transition(action).to_string();
                let css = self
                    .generator
                    .generate(&self.registry, &TransitionBatch::single(transition));
                let scope = format!("stream-{}", action.as_str());
                let mut directives = Directives::default();
                if self.injector.inject(&css, Some(&scope)) {
                    directives.css_scope = Some(scope);
                }
                directives
            }
        }
    }

    /// Tear down: remove every owned style node, drop generator bookkeeping,
    /// and reset the navigation machine.
    pub fn destroy(&mut self) {
        self.injector.clear();
        self.generator.clear();
        self.navigation.reset();
        self.registry.clear();
    }

    /// Snapshot of the current configuration values.
    pub fn config_values(&self) -> &ConfigValues {
        self.config.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::Direction;
    use crate::navigation::VisitAction;

    fn session() -> Viewshift<MemorySink> {
        Viewshift::new(ViewshiftOpts {
            location: Some("/home".to_string()),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn construction_registers_builtin_catalog() {
        let session = session();
        assert_eq!(session.list().len(), 7);
        assert!(session.registry().has("slide-up"));
    }

    #[test]
    fn before_render_injects_and_issues_marker_directives() {
        let mut session = session();
        let quiet = session.dispatch(NavigationEvent::BeforeVisit {
            url: "/about".to_string(),
            clicked_animation: Some("slide".to_string()),
        });
        assert!(quiet.is_noop());
        let directives = session.dispatch(NavigationEvent::BeforeRender {
            direction: Some(Direction::Forward),
        });

        assert_eq!(directives.css_scope.as_deref(), Some(ACTIVE_TRANSITION_SCOPE));
        assert_eq!(directives.add_class.as_deref(), Some("viewshift-slide"));
        assert!(directives
            .remove_classes
            .contains(&"viewshift-fade".to_string()));
        assert_eq!(directives.resolved.as_ref().unwrap().name, "slide");

        let cleanup = directives.cleanup.unwrap();
        assert_eq!(cleanup.delay, CLEANUP_DELAY);
        assert!(cleanup.classes.contains(&"viewshift-slide".to_string()));

        let css = session
            .injector()
            .injected_css(Some(ACTIVE_TRANSITION_SCOPE))
            .unwrap();
        assert!(css.contains("@keyframes viewshift-slide-old-forward"));
    }

    #[test]
    fn marker_class_is_added_even_when_css_is_unknown() {
        let mut session = session();
        session.dispatch(NavigationEvent::BeforeVisit {
            url: "/x".to_string(),
            clicked_animation: Some("ghost".to_string()),
        });
        let directives = session.dispatch(NavigationEvent::BeforeRender { direction: None });
        assert!(directives.css_scope.is_none());
        assert_eq!(directives.add_class.as_deref(), Some("viewshift-ghost"));
    }

    #[test]
    fn cleanup_is_scheduled_even_without_pending_navigation() {
        let mut session = session();
        let directives = session.dispatch(NavigationEvent::BeforeRender { direction: None });
        assert!(directives.resolved.is_none());
        let cleanup = directives.cleanup.unwrap();
        assert_eq!(cleanup.classes.len(), 7);
        assert_eq!(cleanup.generation, 1);
    }

    #[test]
    fn stale_cleanup_detection_uses_generation() {
        let mut session = session();
        let first = session
            .dispatch(NavigationEvent::BeforeRender { direction: None })
            .cleanup
            .unwrap();
        let second = session
            .dispatch(NavigationEvent::BeforeRender { direction: None })
            .cleanup
            .unwrap();
        assert!(first.is_stale(second.generation));
        assert!(!second.is_stale(second.generation));
    }

    #[test]
    fn reduced_motion_suppresses_the_pipeline() {
        let mut session = session();
        session.set_prefers_reduced_motion(true);
        session.dispatch(NavigationEvent::BeforeVisit {
            url: "/about".to_string(),
            clicked_animation: Some("slide".to_string()),
        });
        assert!(!session.navigation().is_pending());
    }

    #[test]
    fn frame_render_injects_under_frame_scope() {
        let mut session = session();
        session.configure(ConfigPatch {
            frames: [("modal".to_string(), "zoom".to_string())].into(),
            ..Default::default()
        });
        let directives = session.dispatch(NavigationEvent::BeforeFrameRender {
            frame_id: "modal".to_string(),
        });
        assert_eq!(directives.css_scope.as_deref(), Some("frame-modal"));
        let css = session.injector().injected_css(Some("frame-modal")).unwrap();
        assert!(css.contains("viewshift-zoom"));
    }

    #[test]
    fn stream_render_uses_configured_action_animation() {
        let mut session = session();
        // default replace-action animation is morph, which is registered
        let directives = session.dispatch(NavigationEvent::BeforeStreamRender {
            action: crate::navigation::StreamAction::Replace,
        });
        assert_eq!(directives.css_scope.as_deref(), Some("stream-replace"));
        let css = session
            .injector()
            .injected_css(Some("stream-replace"))
            .unwrap();
        assert!(css.contains("viewshift-morph"));
    }

    #[test]
    fn unknown_stream_animation_injects_nothing() {
        let mut session = session();
        // default append-action animation "fade-up" is not in the catalog
        let directives = session.dispatch(NavigationEvent::BeforeStreamRender {
            action: crate::navigation::StreamAction::Append,
        });
        assert!(directives.css_scope.is_none());
        assert!(!session.injector().has_injected(Some("stream-append")));
    }

    #[test]
    fn repeated_renders_reuse_the_style_node() {
        let mut session = session();
        for _ in 0..3 {
            session.dispatch(NavigationEvent::BeforeVisit {
                url: "/about".to_string(),
                clicked_animation: Some("fade".to_string()),
            });
            session.dispatch(NavigationEvent::BeforeRender { direction: None });
        }
        assert_eq!(session.injector().sink().len(), 1);
        // identical CSS suppressed after the first write
        assert_eq!(session.injector().sink().write_count(), 1);
    }

    #[test]
    fn restore_flow_goes_through_visit_refinement() {
        let mut session = session();
        session.dispatch(NavigationEvent::BeforeVisit {
            url: "/b".to_string(),
            clicked_animation: Some("zoom".to_string()),
        });
        session.dispatch(NavigationEvent::BeforeRender {
            direction: Some(Direction::Forward),
        });

        // popstate back to /home; host syncs location, then restore visit fires
        session.set_location("/home");
        session.dispatch(NavigationEvent::Visit {
            url: "/home".to_string(),
            action: VisitAction::Restore,
        });
        let directives = session.dispatch(NavigationEvent::BeforeRender { direction: None });
        assert_eq!(directives.resolved.unwrap().name, "zoom");
    }

    #[test]
    fn destroy_clears_styles_and_state() {
        let mut session = session();
        session.dispatch(NavigationEvent::BeforeVisit {
            url: "/b".to_string(),
            clicked_animation: None,
        });
        session.dispatch(NavigationEvent::BeforeRender { direction: None });
        session.destroy();
        assert!(session.injector().sink().is_empty());
        assert!(session.list().is_empty());
        assert!(session.navigation().history().is_empty());
    }
}
