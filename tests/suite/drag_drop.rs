//! Drop target bookkeeping and gesture outcomes.

use blockboard_engine::{
    BlockList, BoardEvent, DndError, DropOutcome, DropRelease, EventLog, ListId, ObjectKey, Scope,
};
use blockboard_scrum::Auth;

use crate::common::{Counter, Note, NoteView, SprintFixture, note_list};

#[test]
fn registrations_balance_across_mount_cycles() {
    let mut scope = Scope::new();
    let builds = Counter::default();
    let mut list = BlockList::new(ListId::new(3), move |_: &Note| NoteView {
        builds: builds.clone(),
        ..NoteView::default()
    })
    .with_dnd(true, true);
    let names = ["n0", "n1", "n2", "n3", "n4", "n5"];
    for name in names {
        list.add(Note(name), &mut scope).unwrap();
    }

    for _ in 0..3 {
        list.mount(&mut scope);
        assert_eq!(scope.dnd.drop_target_count(), names.len());
        list.unmount(&mut scope);
        assert_eq!(scope.dnd.drop_target_count(), 0);
    }
}

#[test]
fn removing_a_mounted_block_releases_its_registration() {
    let mut scope = Scope::new();
    let mut list = note_list(&mut scope, &Counter::default());
    list.mount(&mut scope);
    let target = list.block_ref(&Note("b"));

    assert!(list.remove(&Note("b"), &mut scope));

    assert!(!scope.dnd.is_registered(&target));
    assert_eq!(scope.dnd.drop_target_count(), 2);
    assert!(scope.dnd.handle_for(&target).is_none());
}

#[test]
fn lists_without_sorting_register_nothing() {
    let mut scope = Scope::new();
    let mut list = note_list(&mut scope, &Counter::default()).with_dnd(true, false);
    list.mount(&mut scope);

    assert_eq!(scope.dnd.drop_target_count(), 0);
    assert!(list.handle_of(&Note("a")).is_some());
}

#[test]
fn same_list_drop_reorders_without_undo() {
    let mut scope = Scope::new();
    let mut list = note_list(&mut scope, &Counter::default());
    list.mount(&mut scope);

    let handle = list.handle_of(&Note("c")).unwrap();
    scope.dnd.pick_up(handle).unwrap();
    assert!(scope.dnd.hover(&list.block_ref(&Note("a"))));
    let DropRelease::Dropped(pending) = scope.dnd.release() else {
        panic!("expected a drop");
    };

    assert_eq!(list.accept_drop(pending, &mut scope), DropOutcome::Reordered);
    assert_eq!(
        list.keys(),
        vec![ObjectKey::new("c"), ObjectKey::new("a"), ObjectKey::new("b")]
    );
    assert!(scope.undo.is_empty());
    assert_eq!(scope.dnd.active_marker_count(), 0);
}

#[test]
fn hovering_the_dragged_block_shows_no_marker() {
    let mut fx = SprintFixture::signed_in();
    let task = fx.task("tsk1");
    let own = fx.login_tasks.block_ref(&task);
    let handle = fx.login_tasks.handle_of(&task).unwrap();
    fx.scope.dnd.pick_up(handle).unwrap();

    assert!(!fx.scope.dnd.hover(&own));
    assert_eq!(fx.scope.dnd.active_marker_count(), 0);
    assert!(matches!(fx.scope.dnd.release(), DropRelease::Cancelled));
}

#[test]
fn only_one_gesture_at_a_time() {
    let mut fx = SprintFixture::signed_in();
    let first = fx.login_tasks.handle_of(&fx.task("tsk1")).unwrap();
    let second = fx.signup_tasks.handle_of(&fx.task("tsk3")).unwrap();

    fx.scope.dnd.pick_up(first).unwrap();
    assert_eq!(fx.scope.dnd.pick_up(second), Err(DndError::GestureInProgress));
}

#[test]
fn cancelled_gesture_leaves_everything_as_it_was() {
    let mut fx = SprintFixture::signed_in();
    let log = EventLog::attach(&mut fx.scope.events);
    let task = fx.task("tsk1");
    let before = task.snapshot();
    let handle = fx.login_tasks.handle_of(&task).unwrap();

    fx.scope.dnd.pick_up(handle).unwrap();
    let target = fx.signup_tasks.block_ref(&fx.task("tsk3"));
    assert!(fx.scope.dnd.hover(&target));
    assert!(fx.scope.dnd.is_marker_active(&target));
    assert!(fx.scope.dnd.cancel());

    assert!(!fx.scope.dnd.is_dragging());
    assert_eq!(fx.scope.dnd.active_marker_count(), 0);
    assert_eq!(task.snapshot(), before);
    assert!(fx.scope.undo.is_empty());
    assert!(log.events().is_empty());
}

#[test]
fn rejected_drop_leaves_no_trace() {
    let mut fx = SprintFixture::new(&Auth::anonymous());
    let log = EventLog::attach(&mut fx.scope.events);
    let task = fx.task("tsk1");
    let before = task.snapshot();

    let handle = fx.login_tasks.handle_of(&task).unwrap();
    let target = fx.signup_tasks.block_ref(&fx.task("tsk4"));
    fx.scope.dnd.pick_up(handle).unwrap();
    assert!(fx.scope.dnd.hover(&target));
    let DropRelease::Dropped(pending) = fx.scope.dnd.release() else {
        panic!("expected a drop");
    };

    assert_eq!(
        fx.signup_tasks.accept_drop(pending, &mut fx.scope),
        DropOutcome::Rejected
    );
    assert_eq!(task.snapshot(), before);
    assert!(fx.scope.undo.is_empty());
    assert_eq!(log.count(&BoardEvent::VisibleDataChanged), 0);
    assert_eq!(fx.scope.dnd.active_marker_count(), 0);
}
