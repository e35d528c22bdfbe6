//! Host event subscriptions.
//!
//! The host owns the real event sources (frame timer, window resize,
//! pointer, device orientation). The engine only registers interest and
//! gets called back through the orchestrator's `on_*` methods.

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ListenerKind {
    Frame,
    Resize,
    Pointer,
    DeviceOrientation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ListenerId(pub u64);

pub trait Host {
    fn subscribe(&mut self, kind: ListenerKind) -> ListenerId;

    /// Returns false when `id` was not (or no longer) subscribed.
    fn unsubscribe(&mut self, id: ListenerId) -> bool;
}

/// Listener bookkeeping shared by a [`RecordingHost`] and its observers.
#[derive(Debug, Default)]
pub struct HostLog {
    next_id: u64,
    active: Vec<(ListenerId, ListenerKind)>,
    pub subscribed_total: usize,
    pub unsubscribed_total: usize,
}

impl HostLog {
    pub fn active(&self, kind: ListenerKind) -> usize {
        self.active.iter().filter(|(_, k)| *k == kind).count()
    }

    pub fn active_total(&self) -> usize {
        self.active.len()
    }
}

/// Host that only records subscriptions; events are delivered by hand.
#[derive(Debug, Default, Clone)]
pub struct RecordingHost {
    log: Rc<RefCell<HostLog>>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> Rc<RefCell<HostLog>> {
        Rc::clone(&self.log)
    }
}

impl Host for RecordingHost {
    fn subscribe(&mut self, kind: ListenerKind) -> ListenerId {
        let mut log = self.log.borrow_mut();
        log.next_id += 1;
        let id = ListenerId(log.next_id);
        log.active.push((id, kind));
        log.subscribed_total += 1;
        id
    }

    fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let mut log = self.log.borrow_mut();
        let before = log.active.len();
        log.active.retain(|(active, _)| *active != id);
        let removed = log.active.len() != before;
        if removed {
            log.unsubscribed_total += 1;
        }
        removed
    }
}
