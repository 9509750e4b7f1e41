//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::types::{BonusEvent, PlacementEvent};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Grid mutations (placed, removed, rejected)
    Placement,
    /// Active bonus list changes
    Bonus,
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    Placement(PlacementEvent),
    Bonus(BonusEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Placement(_) => Topic::Placement,
            Event::Bonus(_) => Topic::Bonus,
        }
    }
}

/// Topic-based event bus
///
/// Every topic has its own broadcast channel, created up front, so
/// publishing never blocks and subscribers only see their topic.
#[derive(Clone)]
pub struct EventBus {
    placement: broadcast::Sender<Event>,
    bonus: broadcast::Sender<Event>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            placement: broadcast::channel(capacity).0,
            bonus: broadcast::channel(capacity).0,
        }
    }

    fn channel(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Placement => &self.placement,
            Topic::Bonus => &self.bonus,
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.channel(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.channel(topic).subscribe()
    }

    /// Number of live receivers on `topic`.
    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.channel(topic).receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("placement", &self.placement.receiver_count())
            .field("bonus", &self.bonus.receiver_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use inventory_core::{BonusStats, ItemHandle};

    use super::*;

    #[tokio::test]
    async fn test_subscribers_only_see_their_topic() {
        let bus = EventBus::new();
        let mut bonus_rx = bus.subscribe(Topic::Bonus);

        bus.publish(Event::Placement(PlacementEvent::Removed {
            handle: ItemHandle(1),
            item_id: "002".into(),
        }));
        let changed = Event::Bonus(BonusEvent::Changed {
            bonuses: vec!["B1".into()],
            stats: BonusStats::new(0, 0, 10),
        });
        bus.publish(changed.clone());

        assert_eq!(bonus_rx.recv().await.unwrap(), changed);
        assert!(bonus_rx.try_recv().is_err());
    }

    #[test]
    fn test_publish_without_subscribers_is_silent() {
        let bus = EventBus::with_capacity(4);
        assert_eq!(bus.subscriber_count(Topic::Placement), 0);
        bus.publish(Event::Bonus(BonusEvent::Changed {
            bonuses: Vec::new(),
            stats: BonusStats::ZERO,
        }));
    }
}
