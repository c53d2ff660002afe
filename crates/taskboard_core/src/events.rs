//! Change broadcast for board observers.
//!
//! # Responsibility
//! - Let independent observers learn that the board collection changed.
//!
//! # Invariants
//! - Signals carry no delta; observers must re-read through a repository.
//! - Emission is fire-and-forget and synchronous, in subscription order.
//! - Listeners may subscribe or unsubscribe while a signal is being emitted;
//!   the change applies from the next emission.

use log::trace;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// "Re-read now" signal. `operation` names the mutation, for diagnostics only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeSignal {
    pub operation: &'static str,
}

pub type SubscriptionId = u64;

type Listener = Rc<dyn Fn(&ChangeSignal)>;

/// Single-threaded subscriber list.
#[derive(Default)]
pub struct EventEmitter {
    next_id: Cell<SubscriptionId>,
    listeners: RefCell<Vec<(SubscriptionId, Listener)>>,
}

impl EventEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, listener: impl Fn(&ChangeSignal) + 'static) -> SubscriptionId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.listeners.borrow_mut().push((id, Rc::new(listener)));
        id
    }

    /// Returns whether a listener was removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(current, _)| *current != id);
        listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn emit(&self, signal: ChangeSignal) {
        let snapshot: Vec<Listener> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        trace!(
            "event=change_emit module=events status=ok operation={} listeners={}",
            signal.operation,
            snapshot.len()
        );
        for listener in snapshot {
            listener(&signal);
        }
    }
}
