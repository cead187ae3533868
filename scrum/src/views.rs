//! Block views for requirements and tasks.

use blockboard_engine::ui::BlockHeader;
use blockboard_engine::{BlockError, BlockView, BodyContext};

use crate::model::{RequirementRef, SprintBacklog, TaskRef};

/// Plain text lines shown in an extended block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBody {
    pub lines: Vec<String>,
}

/// Requirement block: title plus the sprint backlog summary.
#[derive(Debug, Clone)]
pub struct RequirementView {
    backlog: SprintBacklog,
}

impl RequirementView {
    #[must_use]
    pub fn new(backlog: SprintBacklog) -> Self {
        Self { backlog }
    }
}

impl BlockView<RequirementRef> for RequirementView {
    type Body = TextBody;

    fn build_header(&mut self, object: &RequirementRef, header: &mut BlockHeader) {
        header.set_title(object.to_string());
        header.append_cell(self.backlog.sprint_backlog_summary(object), false);
    }

    fn refresh_header(&mut self, object: &RequirementRef, header: &mut BlockHeader) {
        header.set_title(object.to_string());
        header.set_cell(0, self.backlog.sprint_backlog_summary(object));
    }

    fn build_body(&mut self, object: &RequirementRef, _ctx: &BodyContext<'_>) -> Result<TextBody, BlockError> {
        let mut body = TextBody::default();
        self.refresh_body(object, &mut body);
        Ok(body)
    }

    fn refresh_body(&mut self, object: &RequirementRef, body: &mut TextBody) {
        body.lines = vec![
            format!("claimed: {}", self.backlog.claimed_tasks_of(object).len()),
            format!("unclaimed: {}", self.backlog.unclaimed_tasks_of(object).len()),
            format!("closed: {}", self.backlog.closed_tasks_of(object).len()),
        ];
    }
}

/// Task block: title plus owner/work status.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskView;

fn task_status(task: &TaskRef) -> String {
    let task = task.get();
    match (&task.owner, task.is_closed()) {
        (Some(owner), true) => format!("done by {owner}"),
        (None, true) => "done".to_string(),
        (Some(owner), false) => format!("{owner}, {} h to do", task.remaining_work),
        (None, false) => format!("unclaimed, {} h to do", task.remaining_work),
    }
}

impl BlockView<TaskRef> for TaskView {
    type Body = TextBody;

    fn build_header(&mut self, object: &TaskRef, header: &mut BlockHeader) {
        header.set_title(object.to_string());
        header.append_cell(task_status(object), false);
    }

    fn refresh_header(&mut self, object: &TaskRef, header: &mut BlockHeader) {
        header.set_title(object.to_string());
        header.set_cell(0, task_status(object));
    }

    fn build_body(&mut self, object: &TaskRef, _ctx: &BodyContext<'_>) -> Result<TextBody, BlockError> {
        let mut body = TextBody::default();
        self.refresh_body(object, &mut body);
        Ok(body)
    }

    fn refresh_body(&mut self, object: &TaskRef, body: &mut TextBody) {
        body.lines = vec![
            format!("story: {}", object.requirement()),
            format!("status: {}", task_status(object)),
        ];
    }
}
