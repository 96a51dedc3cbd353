use viewshift::{
    ConfigPatch, Direction, NavigationEvent, NavigationState, Viewshift, ViewshiftOpts,
    VisitAction, navigation::HISTORY_CAPACITY,
};

fn session_at(url: &str) -> Viewshift {
    Viewshift::new(ViewshiftOpts {
        location: Some(url.to_string()),
        ..Default::default()
    })
    .unwrap()
}

#[test]
fn history_holds_fifty_entries_and_drops_the_first() {
    let mut state = NavigationState::with_location("/origin/0");
    for i in 0..=HISTORY_CAPACITY {
        let destination = format!("/origin/{}", i + 1);
        state.before_visit(&destination, Some("fade"), "fade");
        state.before_render(Some(Direction::Forward)).unwrap();
    }

    assert_eq!(state.history().len(), 50);
    assert!(state.history().lookup("/origin/0").is_none());
    assert_eq!(state.history().lookup("/origin/1"), Some("fade"));
}

#[test]
fn back_navigation_mirrors_leave_animation_over_the_default() {
    let mut session = session_at("/a");
    session.configure(ConfigPatch {
        default_transition: Some("zoom".to_string()),
        ..Default::default()
    });

    // leave /a toward /b with an explicit slide
    session.dispatch(NavigationEvent::BeforeVisit {
        url: "/b".to_string(),
        clicked_animation: Some("slide".to_string()),
    });
    session.dispatch(NavigationEvent::BeforeRender {
        direction: Some(Direction::Forward),
    });

    // back to /a: the stored "slide" wins over the configured default "zoom"
    session.dispatch(NavigationEvent::BeforeVisit {
        url: "/a".to_string(),
        clicked_animation: None,
    });
    let directives = session.dispatch(NavigationEvent::BeforeRender {
        direction: Some(Direction::Back),
    });

    let resolved = directives.resolved.unwrap();
    assert_eq!(resolved.name, "slide");
    assert_eq!(resolved.direction, Direction::Back);
    assert_eq!(directives.add_class.as_deref(), Some("viewshift-slide"));
}

#[test]
fn back_resolution_does_not_overwrite_the_destination_record() {
    let mut session = session_at("/a");
    session.dispatch(NavigationEvent::BeforeVisit {
        url: "/b".to_string(),
        clicked_animation: Some("slide".to_string()),
    });
    session.dispatch(NavigationEvent::BeforeRender {
        direction: Some(Direction::Forward),
    });

    session.dispatch(NavigationEvent::BeforeVisit {
        url: "/a".to_string(),
        clicked_animation: Some("flip".to_string()),
    });
    session.dispatch(NavigationEvent::BeforeRender {
        direction: Some(Direction::Back),
    });

    // a back navigation reads history; write-on-leave only happens otherwise
    assert_eq!(session.navigation().history().lookup("/a"), Some("slide"));
    assert!(session.navigation().history().lookup("/b").is_none());
}

#[test]
fn restore_visit_resolves_the_stored_animation() {
    let mut session = session_at("/list");
    session.dispatch(NavigationEvent::BeforeVisit {
        url: "/detail".to_string(),
        clicked_animation: Some("flip".to_string()),
    });
    session.dispatch(NavigationEvent::BeforeRender {
        direction: Some(Direction::Forward),
    });

    // browser restores /list; no before-visit fires for restore visits
    session.set_location("/list");
    session.dispatch(NavigationEvent::Visit {
        url: "/list".to_string(),
        action: VisitAction::Restore,
    });
    let directives = session.dispatch(NavigationEvent::BeforeRender { direction: None });
    assert_eq!(directives.resolved.unwrap().name, "flip");
}

#[test]
fn restore_without_history_falls_back_to_default() {
    let mut session = session_at("/fresh");
    session.dispatch(NavigationEvent::Visit {
        url: "/fresh".to_string(),
        action: VisitAction::Restore,
    });
    let directives = session.dispatch(NavigationEvent::BeforeRender { direction: None });
    assert_eq!(directives.resolved.unwrap().name, "fade");
}

#[test]
fn machine_cycles_without_terminal_state() {
    let mut session = session_at("/0");
    for i in 1..=5 {
        session.dispatch(NavigationEvent::BeforeVisit {
            url: format!("/{i}"),
            clicked_animation: None,
        });
        let directives = session.dispatch(NavigationEvent::BeforeRender {
            direction: Some(Direction::Forward),
        });
        assert!(directives.resolved.is_some());
        assert!(!session.navigation().is_pending());
    }
    assert_eq!(session.navigation().location(), Some("/5"));
    assert_eq!(session.navigation().history().len(), 5);
}

#[test]
fn cleanup_tasks_only_name_marker_classes() {
    let mut session = session_at("/a");
    session.dispatch(NavigationEvent::BeforeVisit {
        url: "/b".to_string(),
        clicked_animation: None,
    });
    let directives = session.dispatch(NavigationEvent::BeforeRender { direction: None });
    let cleanup = directives.cleanup.unwrap();
    for class in &cleanup.classes {
        assert!(class.starts_with("viewshift-"));
    }
    // a later navigation marks the earlier task stale, nothing more
    let next = session
        .dispatch(NavigationEvent::BeforeRender { direction: None })
        .cleanup
        .unwrap();
    assert!(cleanup.is_stale(next.generation));
}
