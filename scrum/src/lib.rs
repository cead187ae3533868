//! Sprint backlog collaborator for the block engine.
//!
//! Requirements and tasks as block objects, their block views, and the
//! drop action that moves a task to another requirement and closes it.

mod close_task;
mod model;
mod views;

pub use close_task::{CloseTaskDropAction, CloseTaskUndo};
pub use model::{
    Auth, REQUIREMENT_PREFIX, Requirement, RequirementRef, SprintBacklog, TASK_PREFIX, Task,
    TaskRef, TaskSnapshot, User,
};
pub use views::{RequirementView, TaskView, TextBody};
