//! Event handler registry.
//!
//! Front ends observe a game by registering handlers for event types. The
//! bus stores them by type and runs them synchronously when an event is
//! emitted: first the handlers of the event's own type, then the `All`
//! handlers, each in registration order.

use rustc_hash::FxHashMap;

use super::event::{EventType, GameEvent};

/// Callback invoked for every matching event.
pub type EventHandler = Box<dyn FnMut(&GameEvent)>;

/// Identifier returned by [`EventBus::on`], usable to remove a handler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HandlerId(u32);

/// Handlers by event type.
#[derive(Default)]
pub struct EventBus {
    handlers: FxHashMap<EventType, Vec<(HandlerId, EventHandler)>>,
    next_id: u32,
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `event_type`. `EventType::All` receives every event.
    pub fn on(&mut self, event_type: EventType, handler: impl FnMut(&GameEvent) + 'static) -> HandlerId {
        let id = HandlerId(self.next_id);
        self.next_id += 1;
        self.handlers
            .entry(event_type)
            .or_default()
            .push((id, Box::new(handler)));
        id
    }

    /// Remove a handler. Returns whether it was registered.
    pub fn off(&mut self, id: HandlerId) -> bool {
        for handlers in self.handlers.values_mut() {
            if let Some(pos) = handlers.iter().position(|(h, _)| *h == id) {
                handlers.remove(pos);
                return true;
            }
        }
        false
    }

    /// Run the handlers for `event`.
    pub fn dispatch(&mut self, event: &GameEvent) {
        if let Some(handlers) = self.handlers.get_mut(&event.event_type) {
            for (_, handler) in handlers.iter_mut() {
                handler(event);
            }
        }
        if event.event_type != EventType::All {
            if let Some(handlers) = self.handlers.get_mut(&EventType::All) {
                for (_, handler) in handlers.iter_mut() {
                    handler(event);
                }
            }
        }
    }

    #[must_use]
    pub fn handler_count(&self) -> usize {
        self.handlers.values().map(Vec::len).sum()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("handlers", &self.handler_count())
            .finish()
    }
}
