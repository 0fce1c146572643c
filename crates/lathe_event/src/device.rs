//! Input device trait and subscriber list.

use crate::platform::RawInput;
use crate::Event;

/// Subscriber ID
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriberId(pub u64);

/// Event handler callback
pub type EventHandler = Box<dyn FnMut(&Event)>;

/// Ordered list of event handlers. Handlers run in subscription order.
pub struct Subscribers {
    handlers: Vec<(SubscriberId, EventHandler)>,
    next_id: u64,
}

impl Default for Subscribers {
    fn default() -> Self {
        Self::new()
    }
}

impl Subscribers {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
            next_id: 1,
        }
    }

    pub fn subscribe(&mut self, handler: EventHandler) -> SubscriberId {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, handler));
        id
    }

    /// Returns whether a handler was removed
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(sub_id, _)| *sub_id != id);
        self.handlers.len() != before
    }

    /// Deliver `event` to every handler.
    pub fn emit(&mut self, event: &Event) {
        for (_, handler) in &mut self.handlers {
            handler(event);
        }
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

/// A producer of canonical events.
///
/// Devices ignore raw input they do not understand.
pub trait InputDevice {
    /// Translate one platform event and notify subscribers.
    fn handle_event(&mut self, raw: &RawInput);

    /// Register a handler for every event this device emits.
    fn subscribe(&mut self, handler: EventHandler) -> SubscriberId;

    /// Remove a handler. Returns whether it was registered.
    fn unsubscribe(&mut self, id: SubscriberId) -> bool;
}
