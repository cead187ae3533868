//! The demo sprint board: one requirement list plus one task list per
//! requirement, all sharing a scope.

use std::cell::Cell;
use std::fmt::Write;
use std::rc::Rc;

use anyhow::{Context, Result, anyhow, bail};

use blockboard_engine::ui::{BlockHeader, ClickModifiers};
use blockboard_engine::{
    BlockList, BoardConfig, BoardEvent, DropOutcome, DropRelease, EventLog, ListId, Scope,
};
use blockboard_scrum::{
    Auth, CloseTaskDropAction, REQUIREMENT_PREFIX, RequirementRef, RequirementView, SprintBacklog,
    TASK_PREFIX, TaskRef, TaskView, User,
};

const REQUIREMENT_LIST: ListId = ListId::new(0);

type TaskList = BlockList<TaskRef, TaskView>;

pub struct Board {
    backlog: SprintBacklog,
    scope: Scope,
    requirements: BlockList<RequirementRef, RequirementView>,
    task_lists: Vec<(RequirementRef, TaskList)>,
    /// Set by the event bus when visible data changed; cleared on refresh.
    stale: Rc<Cell<bool>>,
    log: EventLog,
}

impl Board {
    pub fn new(backlog: SprintBacklog, auth: &Auth, config: &BoardConfig) -> Result<Self> {
        let mut scope = Scope::from_config(config);
        let stale = Rc::new(Cell::new(false));
        let flag = Rc::clone(&stale);
        scope.events.subscribe(move |event| {
            if *event == BoardEvent::VisibleDataChanged {
                flag.set(true);
            }
        });
        let log = EventLog::attach(&mut scope.events);

        let view_backlog = backlog.clone();
        let mut requirements = BlockList::new(REQUIREMENT_LIST, move |_: &RequirementRef| {
            RequirementView::new(view_backlog.clone())
        })
        .exclusive_by_default(config.exclusive_by_default());

        let mut task_lists = Vec::new();
        for requirement in backlog.requirements() {
            requirements.add(requirement.clone(), &mut scope)?;
            let id = ListId::new(u64::from(requirement.number()));
            let mut tasks = BlockList::from_config(id, |_: &TaskRef| TaskView, config)
                .with_drop_action(CloseTaskDropAction::new(requirement.clone(), auth.clone()));
            tasks.set_objects(backlog.tasks_of(&requirement), &mut scope)?;
            task_lists.push((requirement, tasks));
        }

        requirements.mount(&mut scope);
        for (_, tasks) in &mut task_lists {
            tasks.mount(&mut scope);
        }
        log.take();

        Ok(Self {
            backlog,
            scope,
            requirements,
            task_lists,
            stale,
            log,
        })
    }

    /// A small backlog to play with.
    pub fn demo(config: &BoardConfig) -> Result<Self> {
        let backlog = SprintBacklog::new();
        let login = backlog.create_requirement("Login");
        let signup = backlog.create_requirement("Signup");
        backlog.create_task(&login, "Login form", 3);
        backlog.create_task(&login, "Password reset", 5);
        backlog.create_task(&signup, "Signup form", 2);
        backlog.create_task(&signup, "Confirmation mail", 1);
        Self::new(backlog, &Auth::signed_in(User::new("demo")), config)
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Run one command line. Returns `false` when the session should end.
    pub fn execute(&mut self, line: &str) -> Result<bool> {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            return Ok(true);
        };
        let args: Vec<&str> = words.collect();
        match (command, args.as_slice()) {
            ("quit" | "exit", []) => return Ok(false),
            ("show", []) => print!("{}", self.render()),
            ("click", [reference]) => self.click(reference, ClickModifiers::NONE)?,
            ("click", [reference, "mod"]) => self.click(reference, ClickModifiers::CTRL)?,
            ("drag", [reference]) => self.drag(reference)?,
            ("hover", [reference]) => self.hover(reference)?,
            ("drop", []) => self.drop_dragged()?,
            ("cancel", []) => {
                if !self.scope.dnd.cancel() {
                    println!("nothing to cancel");
                }
            }
            ("undo", []) => match self.scope.undo_last() {
                Some(label) => println!("{label}"),
                None => println!("nothing to undo"),
            },
            ("history", []) => {
                for label in self.scope.undo.labels() {
                    println!("{label}");
                }
            }
            _ => bail!("unknown command: {line}"),
        }
        self.refresh_if_stale()?;
        for event in self.log.take() {
            tracing::debug!(event = event.name(), object = ?event.object(), "Board event");
        }
        Ok(true)
    }

    fn click(&mut self, reference: &str, modifiers: ClickModifiers) -> Result<()> {
        if reference.starts_with(REQUIREMENT_PREFIX) {
            let requirement = self.requirement(reference)?;
            self.requirements
                .on_header_click(&requirement, modifiers, &mut self.scope)?;
        } else {
            let task = self.task(reference)?;
            let list = self
                .task_lists
                .iter_mut()
                .map(|(_, list)| list)
                .find(|list| list.contains(&task))
                .with_context(|| format!("{task} is not on the board"))?;
            list.on_header_click(&task, modifiers, &mut self.scope)?;
        }
        Ok(())
    }

    fn drag(&mut self, reference: &str) -> Result<()> {
        let task = self.task(reference)?;
        let list = self.list_of_task(&task)?;
        let handle = list
            .handle_of(&task)
            .with_context(|| format!("{reference} has no drag handle"))?;
        self.scope.dnd.pick_up(handle)?;
        Ok(())
    }

    fn hover(&mut self, reference: &str) -> Result<()> {
        let task = self.task(reference)?;
        let target = self.list_of_task(&task)?.block_ref(&task);
        if !self.scope.dnd.hover(&target) {
            println!("{reference} is not a drop position");
        }
        Ok(())
    }

    fn drop_dragged(&mut self) -> Result<()> {
        let pending = match self.scope.dnd.release() {
            DropRelease::Cancelled => {
                println!("drop cancelled");
                return Ok(());
            }
            DropRelease::Dropped(pending) => pending,
        };
        let list = self
            .task_lists
            .iter_mut()
            .map(|(_, list)| list)
            .find(|list| list.id() == pending.target.list)
            .ok_or_else(|| anyhow!("no list {}", pending.target.list))?;
        match list.accept_drop(pending, &mut self.scope) {
            DropOutcome::Reordered => println!("moved"),
            DropOutcome::Committed => println!("dropped"),
            DropOutcome::Rejected => println!("drop rejected"),
        }
        Ok(())
    }

    fn requirement(&self, reference: &str) -> Result<RequirementRef> {
        self.backlog
            .find_requirement(reference)
            .with_context(|| format!("no requirement {reference}"))
    }

    fn task(&self, reference: &str) -> Result<TaskRef> {
        if !reference.starts_with(TASK_PREFIX) {
            bail!("not a task reference: {reference}");
        }
        self.backlog
            .find_task(reference)
            .with_context(|| format!("no task {reference}"))
    }

    fn list_of_task(&self, task: &TaskRef) -> Result<&TaskList> {
        self.task_lists
            .iter()
            .map(|(_, list)| list)
            .find(|list| list.contains(task))
            .with_context(|| format!("{task} is not on the board"))
    }

    fn list_of_task_mut(&mut self, task: &TaskRef) -> Result<&mut TaskList> {
        self.task_lists
            .iter_mut()
            .map(|(_, list)| list)
            .find(|list| list.contains(task))
            .with_context(|| format!("{task} is not on the board"))
    }

    /// Re-sync every task list with the backlog after a domain change.
    fn refresh_if_stale(&mut self) -> Result<()> {
        if !self.stale.replace(false) {
            return Ok(());
        }
        tracing::debug!("Refreshing board");
        for (requirement, tasks) in &mut self.task_lists {
            tasks.set_objects(self.backlog.tasks_of(requirement), &mut self.scope)?;
        }
        self.requirements.update_all()?;
        Ok(())
    }

    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        for block in self.requirements.blocks() {
            let requirement = block.object();
            let _ = writeln!(out, "{} {}", arrow(block.is_extended()), header_line(block.header()));
            if block.is_body_attached()
                && let Some(body) = block.body()
            {
                for line in &body.lines {
                    let _ = writeln!(out, "    {line}");
                }
            }
            let Some((_, tasks)) = self.task_lists.iter().find(|(r, _)| r == requirement) else {
                continue;
            };
            for task_block in tasks.blocks() {
                let marker = if task_block.drop_marker_active(&self.scope.dnd) {
                    ">>"
                } else {
                    "  "
                };
                let _ = writeln!(
                    out,
                    "{marker}  {} {}",
                    arrow(task_block.is_extended()),
                    header_line(task_block.header())
                );
                if task_block.is_body_attached()
                    && let Some(body) = task_block.body()
                {
                    for line in &body.lines {
                        let _ = writeln!(out, "        {line}");
                    }
                }
            }
        }
        if let Some(source) = self.scope.dnd.dragged() {
            let _ = writeln!(out, "dragging {source}");
        }
        out
    }
}

fn arrow(extended: bool) -> &'static str {
    if extended { "v" } else { ">" }
}

fn header_line(header: &BlockHeader) -> String {
    let mut line = header.title().to_string();
    for cell in header.cells() {
        line.push_str(" | ");
        line.push_str(&cell.text);
    }
    line
}
