//! Lifecycle events published by the orchestrator.
//!
//! The core publishes typed events only; it never holds a reference back
//! into subscriber state. Events are an informational side channel and feed
//! nothing back into the simulation.

use crate::cell::CellKind;
use primordia_core::Position;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    CellInserted { position: Position, kind: CellKind },
    CellDeleted { position: Position, kind: CellKind },
    StepCompleted { step: u64 },
}

/// Outbound channel owned by the game: a list of boxed subscriber
/// callbacks invoked synchronously, in subscription order, for every event.
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<Box<dyn FnMut(&GameEvent)>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(&GameEvent) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    pub fn publish(&mut self, event: &GameEvent) {
        for subscriber in &mut self.subscribers {
            subscriber(event);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_every_subscriber_sees_every_event() {
        let seen_a = Rc::new(RefCell::new(Vec::new()));
        let seen_b = Rc::new(RefCell::new(Vec::new()));

        let mut bus = EventBus::new();
        let sink = seen_a.clone();
        bus.subscribe(move |event| sink.borrow_mut().push(*event));
        let sink = seen_b.clone();
        bus.subscribe(move |event| sink.borrow_mut().push(*event));

        bus.publish(&GameEvent::StepCompleted { step: 1 });
        bus.publish(&GameEvent::StepCompleted { step: 2 });

        assert_eq!(seen_a.borrow().len(), 2);
        assert_eq!(*seen_a.borrow(), *seen_b.borrow());
    }

    #[test]
    fn test_event_serialization() {
        let event = GameEvent::CellInserted {
            position: Position::new(3, 4),
            kind: CellKind::Plant,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""event":"cell_inserted""#));
        assert!(json.contains(r#""kind":"plant""#));
    }
}
