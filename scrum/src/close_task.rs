use blockboard_engine::{ActionContext, BoardEvent, DropAction, UndoContext, UndoOperation};

use crate::model::{Auth, RequirementRef, TaskRef, TaskSnapshot};

/// Dropping a task on a requirement's task list moves the task to that
/// requirement and closes it in the name of the signed-in user.
///
/// Rejected when nobody is signed in, or when the task already belongs to
/// the requirement and is closed. A rejected drop mutates nothing and pushes
/// no undo operation.
#[derive(Debug, Clone)]
pub struct CloseTaskDropAction {
    requirement: RequirementRef,
    auth: Auth,
}

impl CloseTaskDropAction {
    #[must_use]
    pub fn new(requirement: RequirementRef, auth: Auth) -> Self {
        Self { requirement, auth }
    }
}

impl DropAction<TaskRef> for CloseTaskDropAction {
    fn attempt_drop(&mut self, task: &TaskRef, ctx: &mut ActionContext<'_>) -> bool {
        let Some(user) = self.auth.user() else {
            return false;
        };
        if task.requirement() == self.requirement && task.is_closed() {
            return false;
        }

        let previous = task.snapshot();
        {
            let mut data = task.get_mut();
            data.requirement = self.requirement.clone();
            if !data.is_closed() {
                data.set_done(user.clone());
            }
        }
        tracing::debug!(task = %task, requirement = %self.requirement, "Task closed by drop");
        ctx.undo.add(Box::new(CloseTaskUndo {
            task: task.clone(),
            previous,
        }));
        ctx.events.fire(BoardEvent::VisibleDataChanged);
        true
    }
}

/// Restores a task's requirement, owner and remaining work.
#[derive(Debug)]
pub struct CloseTaskUndo {
    task: TaskRef,
    previous: TaskSnapshot,
}

impl UndoOperation for CloseTaskUndo {
    fn label(&self) -> String {
        format!("Undo Close/Change Story for {}", self.task)
    }

    fn undo(self: Box<Self>, ctx: &mut UndoContext<'_>) {
        let Self { task, previous } = *self;
        task.restore(previous);
        ctx.events.fire(BoardEvent::VisibleDataChanged);
    }
}
