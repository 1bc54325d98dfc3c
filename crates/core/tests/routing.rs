mod common;

use std::sync::Arc;

use common::{mapping, router, RecordingActivator, RecordingInvoker};
use notefocus_core::{
    Dispatcher, MidiMessage, NoteMapping, NoteTarget, RouteOutcome, Router,
};

#[test]
fn test_mapped_press_activates_exactly_once() {
    let activator = Arc::new(RecordingActivator::with_titles(&["Untitled - Notepad", "Spotify"]));
    let router = router(mapping(&[(60, "Notepad"), (100, "Spotify")]), activator.clone());

    for velocity in [1, 64, 127] {
        let outcome = router.route(&MidiMessage::NoteOn(100, velocity));
        assert_eq!(
            outcome,
            RouteOutcome::Activated {
                note: 100,
                title: "Spotify".to_string()
            }
        );
    }

    assert_eq!(activator.raised(), vec!["Spotify"; 3]);
}

#[test]
fn test_releases_never_activate() {
    let activator = Arc::new(RecordingActivator::with_titles(&["Notepad"]));
    let router = router(mapping(&[(60, "Notepad")]), activator.clone());

    for note in [0u8, 60, 127] {
        assert_eq!(
            router.route(&MidiMessage::NoteOn(note, 0)),
            RouteOutcome::Ignored
        );
        assert_eq!(router.route(&MidiMessage::NoteOff(note)), RouteOutcome::Ignored);
    }
    assert_eq!(router.route(&MidiMessage::Clock), RouteOutcome::Ignored);
    assert!(activator.raised().is_empty());
}

#[test]
fn test_unmapped_note_makes_no_call() {
    let activator = Arc::new(RecordingActivator::with_titles(&["Notepad"]));
    let router = router(mapping(&[(60, "Notepad")]), activator.clone());

    assert_eq!(
        router.route(&MidiMessage::NoteOn(61, 100)),
        RouteOutcome::Unmapped(61)
    );
    assert!(activator.raised().is_empty());
}

#[test]
fn test_missing_window_is_not_fatal() {
    let activator = Arc::new(RecordingActivator::with_titles(&["Terminal"]));
    let router = router(mapping(&[(60, "Notepad"), (61, "Terminal")]), activator.clone());

    assert_eq!(
        router.route(&MidiMessage::NoteOn(60, 100)),
        RouteOutcome::WindowNotFound {
            note: 60,
            title: "Notepad".to_string()
        }
    );
    // The router keeps working after a miss
    assert_eq!(
        router.route(&MidiMessage::NoteOn(61, 100)),
        RouteOutcome::Activated {
            note: 61,
            title: "Terminal".to_string()
        }
    );
    assert_eq!(activator.raised(), vec!["Terminal"]);
}

#[test]
fn test_action_targets_use_invoker() {
    let activator = Arc::new(RecordingActivator::default());
    let invoker = Arc::new(RecordingInvoker::default());
    let mapping = Arc::new(NoteMapping::from_entries([
        (60, NoteTarget::Action("export".to_string())),
        (61, NoteTarget::Action("explode".to_string())),
    ]));
    let router = Router::new(Dispatcher::new(mapping), activator.clone())
        .with_invoker(invoker.clone());

    assert_eq!(
        router.route(&MidiMessage::NoteOn(60, 90)),
        RouteOutcome::ActionInvoked {
            note: 60,
            action: "export".to_string()
        }
    );
    assert!(matches!(
        router.route(&MidiMessage::NoteOn(61, 90)),
        RouteOutcome::Failed { note: 61, .. }
    ));
    assert_eq!(*invoker.invoked.lock(), vec!["export".to_string()]);
    assert!(activator.raised().is_empty());
}

#[test]
fn test_action_without_invoker_fails_softly() {
    let activator = Arc::new(RecordingActivator::default());
    let mapping = Arc::new(NoteMapping::from_entries([(
        60,
        NoteTarget::Action("export".to_string()),
    )]));
    let router = Router::new(Dispatcher::new(mapping), activator);

    assert!(matches!(
        router.route(&MidiMessage::NoteOn(60, 90)),
        RouteOutcome::Failed { note: 60, .. }
    ));
}
