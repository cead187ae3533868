//! Sprint backlog domain objects.
//!
//! Requirements and tasks are shared handles: blocks, drop actions and undo
//! operations all hold clones pointing at the same data.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use blockboard_engine::{BlockObject, ObjectKey};

pub const REQUIREMENT_PREFIX: &str = "req";
pub const TASK_PREFIX: &str = "tsk";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User(String);

impl User {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The signed-in user, passed to actions that stamp who did something.
#[derive(Debug, Clone, Default)]
pub struct Auth {
    user: Option<User>,
}

impl Auth {
    #[must_use]
    pub fn signed_in(user: User) -> Self {
        Self { user: Some(user) }
    }

    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }
}

#[derive(Debug)]
pub struct Requirement {
    number: u32,
    pub label: String,
}

#[derive(Debug, Clone)]
pub struct RequirementRef(Rc<RefCell<Requirement>>);

impl RequirementRef {
    #[must_use]
    pub fn number(&self) -> u32 {
        self.0.borrow().number
    }

    #[must_use]
    pub fn reference(&self) -> String {
        format!("{REQUIREMENT_PREFIX}{}", self.number())
    }

    #[must_use]
    pub fn label(&self) -> String {
        self.0.borrow().label.clone()
    }
}

impl PartialEq for RequirementRef {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for RequirementRef {}

impl fmt::Display for RequirementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let requirement = self.0.borrow();
        write!(f, "{REQUIREMENT_PREFIX}{} {}", requirement.number, requirement.label)
    }
}

impl BlockObject for RequirementRef {
    fn key(&self) -> ObjectKey {
        ObjectKey::new(self.reference())
    }
}

#[derive(Debug)]
pub struct Task {
    number: u32,
    pub label: String,
    pub requirement: RequirementRef,
    pub owner: Option<User>,
    pub remaining_work: u32,
}

impl Task {
    /// A task with no remaining work is closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.remaining_work == 0
    }

    #[must_use]
    pub fn is_owner_set(&self) -> bool {
        self.owner.is_some()
    }

    pub fn set_done(&mut self, user: User) {
        self.owner = Some(user);
        self.remaining_work = 0;
    }
}

/// Everything needed to put a task back the way it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSnapshot {
    pub requirement: RequirementRef,
    pub owner: Option<User>,
    pub remaining_work: u32,
}

#[derive(Debug, Clone)]
pub struct TaskRef(Rc<RefCell<Task>>);

impl TaskRef {
    #[must_use]
    pub fn get(&self) -> Ref<'_, Task> {
        self.0.borrow()
    }

    #[must_use]
    pub fn get_mut(&self) -> RefMut<'_, Task> {
        self.0.borrow_mut()
    }

    #[must_use]
    pub fn reference(&self) -> String {
        format!("{TASK_PREFIX}{}", self.get().number)
    }

    #[must_use]
    pub fn requirement(&self) -> RequirementRef {
        self.get().requirement.clone()
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.get().is_closed()
    }

    #[must_use]
    pub fn snapshot(&self) -> TaskSnapshot {
        let task = self.get();
        TaskSnapshot {
            requirement: task.requirement.clone(),
            owner: task.owner.clone(),
            remaining_work: task.remaining_work,
        }
    }

    pub fn restore(&self, snapshot: TaskSnapshot) {
        let mut task = self.get_mut();
        task.requirement = snapshot.requirement;
        task.owner = snapshot.owner;
        task.remaining_work = snapshot.remaining_work;
    }
}

impl PartialEq for TaskRef {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for TaskRef {}

impl fmt::Display for TaskRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let task = self.get();
        write!(f, "{TASK_PREFIX}{} {}", task.number, task.label)
    }
}

impl BlockObject for TaskRef {
    fn key(&self) -> ObjectKey {
        ObjectKey::new(self.reference())
    }
}

#[derive(Debug, Default)]
struct BacklogData {
    requirements: Vec<RequirementRef>,
    tasks: Vec<TaskRef>,
    next_requirement: u32,
    next_task: u32,
}

/// Requirements and their tasks for one sprint.
///
/// Cloning shares the backlog.
#[derive(Debug, Clone, Default)]
pub struct SprintBacklog {
    data: Rc<RefCell<BacklogData>>,
}

impl SprintBacklog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_requirement(&self, label: impl Into<String>) -> RequirementRef {
        let mut data = self.data.borrow_mut();
        data.next_requirement += 1;
        let requirement = RequirementRef(Rc::new(RefCell::new(Requirement {
            number: data.next_requirement,
            label: label.into(),
        })));
        data.requirements.push(requirement.clone());
        requirement
    }

    pub fn create_task(&self, requirement: &RequirementRef, label: impl Into<String>, remaining_work: u32) -> TaskRef {
        let mut data = self.data.borrow_mut();
        data.next_task += 1;
        let task = TaskRef(Rc::new(RefCell::new(Task {
            number: data.next_task,
            label: label.into(),
            requirement: requirement.clone(),
            owner: None,
            remaining_work,
        })));
        data.tasks.push(task.clone());
        task
    }

    pub fn delete_task(&self, task: &TaskRef) -> bool {
        let mut data = self.data.borrow_mut();
        let before = data.tasks.len();
        data.tasks.retain(|t| t != task);
        data.tasks.len() != before
    }

    #[must_use]
    pub fn requirements(&self) -> Vec<RequirementRef> {
        self.data.borrow().requirements.clone()
    }

    #[must_use]
    pub fn find_requirement(&self, reference: &str) -> Option<RequirementRef> {
        self.data
            .borrow()
            .requirements
            .iter()
            .find(|r| r.reference() == reference)
            .cloned()
    }

    #[must_use]
    pub fn find_task(&self, reference: &str) -> Option<TaskRef> {
        self.data
            .borrow()
            .tasks
            .iter()
            .find(|t| t.reference() == reference)
            .cloned()
    }

    /// Tasks of `requirement`, in creation order.
    #[must_use]
    pub fn tasks_of(&self, requirement: &RequirementRef) -> Vec<TaskRef> {
        self.tasks_where(requirement, |_| true)
    }

    #[must_use]
    pub fn claimed_tasks_of(&self, requirement: &RequirementRef) -> Vec<TaskRef> {
        self.tasks_where(requirement, |task| task.is_owner_set() && !task.is_closed())
    }

    #[must_use]
    pub fn closed_tasks_of(&self, requirement: &RequirementRef) -> Vec<TaskRef> {
        self.tasks_where(requirement, Task::is_closed)
    }

    #[must_use]
    pub fn unclaimed_tasks_of(&self, requirement: &RequirementRef) -> Vec<TaskRef> {
        self.tasks_where(requirement, |task| !task.is_owner_set())
    }

    fn tasks_where(&self, requirement: &RequirementRef, keep: impl Fn(&Task) -> bool) -> Vec<TaskRef> {
        self.data
            .borrow()
            .tasks
            .iter()
            .filter(|t| {
                let task = t.get();
                &task.requirement == requirement && keep(&*task)
            })
            .cloned()
            .collect()
    }

    /// Tasks exist for `requirement`.
    #[must_use]
    pub fn is_planned(&self, requirement: &RequirementRef) -> bool {
        !self.tasks_of(requirement).is_empty()
    }

    /// Every task of `requirement` is closed (and there is at least one).
    #[must_use]
    pub fn is_tasks_closed(&self, requirement: &RequirementRef) -> bool {
        let tasks = self.tasks_of(requirement);
        !tasks.is_empty() && tasks.iter().all(TaskRef::is_closed)
    }

    /// One-line status shown in sprint backlog headers.
    #[must_use]
    pub fn sprint_backlog_summary(&self, requirement: &RequirementRef) -> String {
        let tasks = self.tasks_of(requirement);
        if tasks.is_empty() {
            return "Not planned yet.".to_string();
        }
        if tasks.iter().all(TaskRef::is_closed) {
            return "Done. Test required.".to_string();
        }
        let open: Vec<_> = tasks.iter().filter(|t| !t.is_closed()).collect();
        let effort: u32 = open.iter().map(|t| t.get().remaining_work).sum();
        format!(
            "{} of {} Tasks open. About {} hours to do.",
            open.len(),
            tasks.len(),
            effort
        )
    }
}
