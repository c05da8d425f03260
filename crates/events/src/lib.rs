//! In-process publish/subscribe for progression and badge notifications.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Subscription topics carried by [`Event`]s.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Topic {
    /// Points, level or experience changed.
    PointsUpdated,
    /// A badge was newly awarded.
    BadgeUpdated,
}

/// Notification payloads published on the bus.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// The progression keys were rewritten.
    PointsUpdated {
        points: i64,
        level: i32,
        current_exp: i32,
        leveled_up: bool,
    },
    /// A badge unlocked, together with its bonus amounts.
    BadgeUpdated {
        badge_id: String,
        badge_name: String,
        reward_stars: i64,
        reward_exp: i32,
        leveled_up: bool,
    },
}

impl Event {
    /// Returns the topic this event is delivered on.
    pub fn topic(&self) -> Topic {
        match self {
            Event::PointsUpdated { .. } => Topic::PointsUpdated,
            Event::BadgeUpdated { .. } => Topic::BadgeUpdated,
        }
    }
}

/// Handle returned by [`EventBus::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubscriberId(u64);

struct Subscriber {
    id: SubscriberId,
    topic: Topic,
    handler: Rc<dyn Fn(&Event)>,
}

/// Synchronous single-process event dispatcher.
///
/// Handlers run inline during [`EventBus::publish`] in subscription order.
/// Nothing is retained for late subscribers and nothing crosses process
/// boundaries.
#[derive(Default)]
pub struct EventBus {
    next_id: Cell<u64>,
    subscribers: RefCell<Vec<Subscriber>>,
}

impl EventBus {
    /// Creates a bus with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for every future event on `topic`.
    pub fn subscribe(&self, topic: Topic, handler: impl Fn(&Event) + 'static) -> SubscriberId {
        let id = SubscriberId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.subscribers.borrow_mut().push(Subscriber {
            id,
            topic,
            handler: Rc::new(handler),
        });
        id
    }

    /// Removes the subscription for `id`; returns whether it existed.
    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        let mut subscribers = self.subscribers.borrow_mut();
        let before = subscribers.len();
        subscribers.retain(|s| s.id != id);
        subscribers.len() != before
    }

    /// Number of live subscriptions on `topic`.
    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.subscribers
            .borrow()
            .iter()
            .filter(|s| s.topic == topic)
            .count()
    }

    /// Delivers `event` to all current subscribers of its topic.
    ///
    /// The subscriber list is snapshotted before dispatch so a handler may
    /// subscribe or unsubscribe while it runs.
    pub fn publish(&self, event: &Event) {
        let handlers: Vec<Rc<dyn Fn(&Event)>> = self
            .subscribers
            .borrow()
            .iter()
            .filter(|s| s.topic == event.topic())
            .map(|s| Rc::clone(&s.handler))
            .collect();
        for handler in handlers {
            handler(event);
        }
    }
}
