//! Topic-based event bus implementation.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::types::{CombatEvent, LifecycleEvent, TurnEvent};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Decision windows, warnings, rounds
    Turn,
    /// Resolved and rejected actions
    Combat,
    /// Joins, departures, and the end of the encounter
    Lifecycle,
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    Turn(TurnEvent),
    Combat(CombatEvent),
    Lifecycle(LifecycleEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Turn(_) => Topic::Turn,
            Event::Combat(_) => Topic::Combat,
            Event::Lifecycle(_) => Topic::Lifecycle,
        }
    }

    /// Single-line JSON encoding, as streamed by the CLI.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

struct Channels {
    turn: broadcast::Sender<Event>,
    combat: broadcast::Sender<Event>,
    lifecycle: broadcast::Sender<Event>,
    /// Every event in publication order.
    all: broadcast::Sender<Event>,
}

impl Channels {
    fn topic(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Turn => &self.turn,
            Topic::Combat => &self.combat,
            Topic::Lifecycle => &self.lifecycle,
        }
    }
}

/// Topic-based event bus
///
/// Consumers subscribe to the topics they care about, or to every event in
/// order with [`EventBus::subscribe_all`]. Events are best-effort: with no
/// subscribers they are dropped, and lagging receivers skip ahead.
#[derive(Clone)]
pub struct EventBus {
    channels: Arc<Channels>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            channels: Arc::new(Channels {
                turn: broadcast::channel(capacity).0,
                combat: broadcast::channel(capacity).0,
                lifecycle: broadcast::channel(capacity).0,
                all: broadcast::channel(capacity).0,
            }),
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        // No subscribers is normal, not an error
        if self.channels.topic(topic).send(event.clone()).is_err() {
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
        let _ = self.channels.all.send(event);
    }

    /// Subscribe to a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.channels.topic(topic).subscribe()
    }

    /// Subscribe to multiple topics
    ///
    /// Returns receivers for each requested topic.
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }

    /// Subscribe to every topic, preserving publication order across topics.
    pub fn subscribe_all(&self) -> broadcast::Receiver<Event> {
        self.channels.all.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use skirmish_core::ParticipantId;

    use super::*;

    #[tokio::test]
    async fn routes_by_topic() {
        let bus = EventBus::new();
        let mut turns = bus.subscribe(Topic::Turn);
        let mut lifecycle = bus.subscribe(Topic::Lifecycle);
        let mut all = bus.subscribe_all();

        bus.publish(Event::Turn(TurnEvent::RoundAdvanced { round: 2 }));
        bus.publish(Event::Lifecycle(LifecycleEvent::ParticipantJoined {
            participant: ParticipantId(3),
            initiative: None,
        }));

        assert_eq!(
            turns.recv().await.unwrap(),
            Event::Turn(TurnEvent::RoundAdvanced { round: 2 })
        );
        assert!(turns.try_recv().is_err());
        assert_eq!(lifecycle.recv().await.unwrap().topic(), Topic::Lifecycle);
        assert_eq!(all.recv().await.unwrap().topic(), Topic::Turn);
        assert_eq!(all.recv().await.unwrap().topic(), Topic::Lifecycle);
    }

    #[test]
    fn publishing_without_subscribers_is_harmless() {
        let bus = EventBus::with_capacity(4);
        bus.publish(Event::Turn(TurnEvent::RoundAdvanced { round: 1 }));
    }

    #[test]
    fn json_line_has_no_newlines() {
        let event = Event::Turn(TurnEvent::RoundAdvanced { round: 7 });
        let line = event.to_json().unwrap();
        assert!(!line.contains('\n'));
        assert!(line.contains("RoundAdvanced"));
    }
}
