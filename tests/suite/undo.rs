//! Undo of committed drops and history bounds.

use blockboard_engine::{
    BoardEvent, DropOutcome, DropRelease, EventLog, UndoContext, UndoManager, UndoOperation,
};
use blockboard_scrum::TaskRef;

use crate::common::SprintFixture;

fn drop_on(fx: &mut SprintFixture, task: &TaskRef, onto: &str) -> DropOutcome {
    let handle = fx
        .login_tasks
        .handle_of(task)
        .or_else(|| fx.signup_tasks.handle_of(task))
        .unwrap();
    let onto = fx.task(onto);
    let target = if fx.login_tasks.contains(&onto) {
        fx.login_tasks.block_ref(&onto)
    } else {
        fx.signup_tasks.block_ref(&onto)
    };

    fx.scope.dnd.pick_up(handle).unwrap();
    assert!(fx.scope.dnd.hover(&target));
    let DropRelease::Dropped(pending) = fx.scope.dnd.release() else {
        panic!("expected a drop");
    };
    let list = if fx.login_tasks.id() == pending.target.list {
        &mut fx.login_tasks
    } else {
        &mut fx.signup_tasks
    };
    list.accept_drop(pending, &mut fx.scope)
}

#[test]
fn undo_restores_the_task_and_fires_once() {
    let mut fx = SprintFixture::signed_in();
    let log = EventLog::attach(&mut fx.scope.events);
    let task = fx.task("tsk1");
    let before = task.snapshot();

    assert_eq!(drop_on(&mut fx, &task, "tsk3"), DropOutcome::Committed);
    assert!(task.is_closed());
    assert_eq!(task.requirement(), fx.signup);
    assert_eq!(log.count(&BoardEvent::VisibleDataChanged), 1);
    assert_eq!(
        fx.scope.undo.last_label().as_deref(),
        Some("Undo Close/Change Story for tsk1 Login form")
    );
    log.take();

    assert!(fx.scope.undo_last().is_some());

    assert_eq!(task.snapshot(), before);
    assert_eq!(log.take(), vec![BoardEvent::VisibleDataChanged]);
    assert!(fx.scope.undo.is_empty());
    assert!(fx.scope.undo_last().is_none());
}

#[test]
fn lists_follow_the_backlog_through_drop_and_undo() {
    let mut fx = SprintFixture::signed_in();
    let task = fx.task("tsk2");

    drop_on(&mut fx, &task, "tsk4");
    fx.refresh();
    assert!(fx.signup_tasks.contains(&task));
    assert!(!fx.login_tasks.contains(&task));
    assert_eq!(fx.scope.dnd.drop_target_count(), 4);

    fx.scope.undo_last();
    fx.refresh();
    assert!(fx.login_tasks.contains(&task));
    assert_eq!(fx.signup_tasks.len(), 2);
    assert_eq!(fx.scope.dnd.drop_target_count(), 4);
}

#[test]
fn undo_runs_most_recent_first() {
    let mut fx = SprintFixture::signed_in();
    let first = fx.task("tsk1");
    let second = fx.task("tsk3");

    drop_on(&mut fx, &first, "tsk4");
    drop_on(&mut fx, &second, "tsk2");
    assert_eq!(
        fx.scope.undo.labels(),
        vec![
            "Undo Close/Change Story for tsk3 Signup form".to_string(),
            "Undo Close/Change Story for tsk1 Login form".to_string(),
        ]
    );

    fx.scope.undo_last();
    assert_eq!(second.requirement(), fx.signup);
    assert_eq!(first.requirement(), fx.signup);
    fx.scope.undo_last();
    assert_eq!(first.requirement(), fx.login);
}

#[test]
fn dropping_a_closed_task_on_its_own_story_is_refused() {
    let mut fx = SprintFixture::signed_in();
    let task = fx.task("tsk1");
    drop_on(&mut fx, &task, "tsk3");

    // The block is still shown under Login, so this is a cross-list drop.
    assert_eq!(drop_on(&mut fx, &task, "tsk4"), DropOutcome::Rejected);
    assert_eq!(fx.scope.undo.len(), 1);
}

struct Marker(u32);

impl UndoOperation for Marker {
    fn label(&self) -> String {
        format!("op {}", self.0)
    }

    fn undo(self: Box<Self>, _ctx: &mut UndoContext<'_>) {}
}

#[test]
fn bounded_history_drops_the_oldest() {
    let mut undo = UndoManager::with_capacity(Some(2));
    for n in 1..=3 {
        undo.add(Box::new(Marker(n)));
    }

    assert_eq!(undo.labels(), vec!["op 3".to_string(), "op 2".to_string()]);
}
