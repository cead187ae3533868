//! Block lifecycle through a list: extension, lazy bodies, click policy.

use blockboard_engine::ui::{ClickModifiers, EXTENDED_CLASS};
use blockboard_engine::{BlockError, BlockList, BoardEvent, EventLog, ListId, ObjectKey, Scope};

use crate::common::{BodyBehavior, Counter, NOTES, Note, NoteView, note_list};

fn expanded(key: &str) -> BoardEvent {
    BoardEvent::BlockExpanded(ObjectKey::new(key))
}

fn collapsed(key: &str) -> BoardEvent {
    BoardEvent::BlockCollapsed(ObjectKey::new(key))
}

#[test]
fn setting_the_current_state_again_fires_nothing() {
    let mut scope = Scope::new();
    let mut list = note_list(&mut scope, &Counter::default());
    let log = EventLog::attach(&mut scope.events);
    let block = list.block_mut(&Note("a")).unwrap();

    assert!(block.set_extended(true, &mut scope.events).unwrap());
    assert!(!block.set_extended(true, &mut scope.events).unwrap());
    assert!(block.panel_classes().contains(EXTENDED_CLASS));
    assert_eq!(log.events(), vec![expanded("a")]);

    assert!(!list.block_mut(&Note("b")).unwrap().set_extended(false, &mut scope.events).unwrap());
    assert_eq!(log.events().len(), 1);
}

#[test]
fn body_is_built_once_across_collapse_cycles() {
    let mut scope = Scope::new();
    let builds = Counter::default();
    let mut list = note_list(&mut scope, &builds);
    assert_eq!(builds.get(), 0);

    for _ in 0..3 {
        list.extend_object(&Note("a"), true, &mut scope).unwrap();
        assert!(list.block(&Note("a")).unwrap().is_body_attached());
        list.collapse_object(&Note("a"), &mut scope).unwrap();
        let block = list.block(&Note("a")).unwrap();
        assert!(!block.is_body_attached());
        assert_eq!(block.body().map(String::as_str), Some("body of a"));
    }

    assert_eq!(builds.get(), 1);
}

#[test]
fn reentrant_update_is_refused_and_retried_later() {
    let mut scope = Scope::new();
    let builds = Counter::default();
    let counter = builds.clone();
    let mut list = BlockList::new(ListId::new(7), move |_: &Note| NoteView {
        builds: counter.clone(),
        behavior: BodyBehavior::Reenter,
    });
    list.add(Note("loop"), &mut scope).unwrap();

    let err = list.extend_object(&Note("loop"), true, &mut scope).unwrap_err();
    assert!(matches!(err, BlockError::ReentrantUpdate { .. }));
    let block = list.block(&Note("loop")).unwrap();
    assert!(!block.is_body_initialized());
    assert!(!block.is_body_failed());

    assert!(matches!(list.update_all(), Err(BlockError::ReentrantUpdate { .. })));
    assert_eq!(builds.get(), 2);
}

#[test]
fn failed_body_is_not_rebuilt() {
    let mut scope = Scope::new();
    let builds = Counter::default();
    let counter = builds.clone();
    let mut list = BlockList::new(ListId::new(7), move |_: &Note| NoteView {
        builds: counter.clone(),
        behavior: BodyBehavior::Fail,
    });
    list.add(Note("broken"), &mut scope).unwrap();

    let err = list.extend_object(&Note("broken"), true, &mut scope).unwrap_err();
    assert_eq!(err, BlockError::body_build("storage offline"));
    assert!(matches!(list.update_all(), Err(BlockError::BodyFailed { .. })));
    assert!(list.block(&Note("broken")).unwrap().is_body_failed());
    assert_eq!(builds.get(), 1);
}

#[test]
fn plain_clicks_behave_like_an_accordion() {
    let mut scope = Scope::new();
    let mut list = note_list(&mut scope, &Counter::default());
    let log = EventLog::attach(&mut scope.events);

    list.on_header_click(&Note("a"), ClickModifiers::NONE, &mut scope).unwrap();
    list.on_header_click(&Note("b"), ClickModifiers::NONE, &mut scope).unwrap();

    assert_eq!(list.extended_objects(), vec![&Note("b")]);
    assert_eq!(
        log.take(),
        vec![expanded("a"), collapsed("a"), expanded("b")]
    );

    list.on_header_click(&Note("b"), ClickModifiers::NONE, &mut scope).unwrap();
    assert!(list.extended_objects().is_empty());
    assert_eq!(log.take(), vec![collapsed("b")]);
}

#[test]
fn modified_clicks_leave_other_blocks_alone() {
    let mut scope = Scope::new();
    let mut list = note_list(&mut scope, &Counter::default());

    for note in NOTES {
        list.on_header_click(&note, ClickModifiers::CTRL, &mut scope).unwrap();
    }
    assert_eq!(list.extended_objects().len(), 3);

    list.on_header_click(&Note("b"), ClickModifiers::CTRL, &mut scope).unwrap();
    assert_eq!(list.extended_objects(), vec![&Note("a"), &Note("c")]);
}

#[test]
fn non_exclusive_list_inverts_the_modifier() {
    let mut scope = Scope::new();
    let mut list = note_list(&mut scope, &Counter::default()).exclusive_by_default(false);

    list.on_header_click(&Note("a"), ClickModifiers::NONE, &mut scope).unwrap();
    list.on_header_click(&Note("b"), ClickModifiers::NONE, &mut scope).unwrap();
    assert_eq!(list.extended_objects().len(), 2);

    list.on_header_click(&Note("c"), ClickModifiers::CTRL, &mut scope).unwrap();
    assert_eq!(list.extended_objects(), vec![&Note("c")]);
}

#[test]
fn activation_extends_exclusively_and_requests_scroll() {
    let mut scope = Scope::new();
    let mut list = note_list(&mut scope, &Counter::default());
    list.extend_object(&Note("a"), false, &mut scope).unwrap();

    list.activate(&Note("c"), &mut scope).unwrap();

    assert_eq!(list.extended_objects(), vec![&Note("c")]);
    let block = list.block_mut(&Note("c")).unwrap();
    assert!(block.take_scroll_request());
    assert!(!block.take_scroll_request());
}

#[test]
fn mounting_replays_expansion_and_unmounting_compensates() {
    let mut scope = Scope::new();
    let mut list = note_list(&mut scope, &Counter::default());
    list.extend_object(&Note("b"), true, &mut scope).unwrap();
    let log = EventLog::attach(&mut scope.events);

    list.mount(&mut scope);
    list.unmount(&mut scope);

    assert_eq!(log.events(), vec![expanded("b"), collapsed("b")]);
}

#[test]
fn unknown_objects_are_reported() {
    let mut scope = Scope::new();
    let mut list = note_list(&mut scope, &Counter::default());

    let err = list.extend_object(&Note("zz"), true, &mut scope).unwrap_err();
    assert_eq!(err, BlockError::UnknownObject { key: ObjectKey::new("zz") });
    assert!(matches!(
        list.add(Note("a"), &mut scope),
        Err(BlockError::DuplicateObject { .. })
    ));
}
