//! Scope-local event bus.
//!
//! Components publish [`BoardEvent`]s without knowing who listens.
//! Delivery is synchronous: `fire` returns after every listener ran,
//! in subscription order.

use std::cell::RefCell;
use std::fmt;
use std::mem;
use std::rc::Rc;

use blockboard_types::{BoardEvent, SubscriptionId};

type Listener = Box<dyn FnMut(&BoardEvent)>;

#[derive(Default)]
pub struct EventBus {
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
    fired: u64,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .field("fired", &self.fired)
            .finish()
    }
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&BoardEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId::new(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    pub fn fire(&mut self, event: BoardEvent) {
        self.fired += 1;
        tracing::trace!(event = event.name(), listeners = self.listeners.len(), "fire");
        for (_, listener) in &mut self.listeners {
            listener(&event);
        }
    }

    /// Total number of events fired on this bus.
    #[must_use]
    pub fn fired(&self) -> u64 {
        self.fired
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

/// Records every event fired on a bus.
///
/// Cloning shares the same buffer, so one copy can live inside the bus
/// while the owner reads from another.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<BoardEvent>>>,
}

impl EventLog {
    /// Subscribe a new log to `bus`.
    pub fn attach(bus: &mut EventBus) -> Self {
        let log = Self::default();
        let sink = log.clone();
        bus.subscribe(move |event| sink.events.borrow_mut().push(event.clone()));
        log
    }

    #[must_use]
    pub fn events(&self) -> Vec<BoardEvent> {
        self.events.borrow().clone()
    }

    /// Drain the recorded events, oldest first.
    pub fn take(&self) -> Vec<BoardEvent> {
        mem::take(&mut *self.events.borrow_mut())
    }

    #[must_use]
    pub fn count(&self, event: &BoardEvent) -> usize {
        self.events.borrow().iter().filter(|e| *e == event).count()
    }
}
