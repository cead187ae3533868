//! Requirement blocks summarizing their tasks as the backlog changes.

use blockboard_engine::{BlockList, DropRelease, ListId};
use blockboard_scrum::{RequirementRef, RequirementView};

use crate::common::SprintFixture;

fn requirement_list(fx: &mut SprintFixture) -> BlockList<RequirementRef, RequirementView> {
    let backlog = fx.backlog.clone();
    let mut list = BlockList::new(ListId::new(0), move |_: &RequirementRef| {
        RequirementView::new(backlog.clone())
    });
    list.set_objects(fx.backlog.requirements(), &mut fx.scope).unwrap();
    list.mount(&mut fx.scope);
    list
}

fn summary(list: &BlockList<RequirementRef, RequirementView>, requirement: &RequirementRef) -> String {
    list.block(requirement).unwrap().header().cells()[0].text.clone()
}

#[test]
fn headers_follow_drops_and_undo() {
    let mut fx = SprintFixture::signed_in();
    let mut stories = requirement_list(&mut fx);
    let (login, signup) = (fx.login.clone(), fx.signup.clone());
    assert_eq!(summary(&stories, &login), "2 of 2 Tasks open. About 8 hours to do.");

    let task = fx.task("tsk1");
    let handle = fx.login_tasks.handle_of(&task).unwrap();
    let target = fx.signup_tasks.block_ref(&fx.task("tsk3"));
    fx.scope.dnd.pick_up(handle).unwrap();
    assert!(fx.scope.dnd.hover(&target));
    let DropRelease::Dropped(pending) = fx.scope.dnd.release() else {
        panic!("expected a drop");
    };
    fx.signup_tasks.accept_drop(pending, &mut fx.scope);
    stories.update_all().unwrap();

    assert_eq!(summary(&stories, &login), "1 of 1 Tasks open. About 5 hours to do.");
    assert_eq!(summary(&stories, &signup), "2 of 3 Tasks open. About 3 hours to do.");

    fx.scope.undo_last();
    stories.update_all().unwrap();
    assert_eq!(summary(&stories, &login), "2 of 2 Tasks open. About 8 hours to do.");
}

#[test]
fn refresh_keeps_extension_of_surviving_blocks() {
    let mut fx = SprintFixture::signed_in();
    let kept = fx.task("tsk3");
    fx.signup_tasks.extend_object(&kept, true, &mut fx.scope).unwrap();

    fx.backlog.delete_task(&fx.task("tsk4"));
    fx.refresh();

    assert_eq!(fx.signup_tasks.len(), 1);
    assert!(fx.signup_tasks.is_extended(&kept));
    assert_eq!(fx.scope.dnd.drop_target_count(), 3);
}

#[test]
fn finished_story_asks_for_testing() {
    let mut fx = SprintFixture::signed_in();
    let mut stories = requirement_list(&mut fx);
    for reference in ["tsk3", "tsk4"] {
        fx.task(reference).get_mut().remaining_work = 0;
    }
    stories.update_all().unwrap();

    assert_eq!(summary(&stories, &fx.signup), "Done. Test required.");
}
