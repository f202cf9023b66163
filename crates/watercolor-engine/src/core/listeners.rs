use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

/// Event families an app can subscribe to.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Topic {
    Resize,
    PointerMove,
}

type Counts = RefCell<HashMap<Topic, usize>>;

/// Registry of live subscriptions, owned by the runtime.
///
/// Cloning shares the registry. The runtime delivers a topic's events only while
/// at least one [`Subscription`] for it is alive.
#[derive(Debug, Clone, Default)]
pub struct Listeners {
    counts: Rc<Counts>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers interest in `topic`. The returned guard releases it on drop.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, topic: Topic) -> Subscription {
        *self.counts.borrow_mut().entry(topic).or_insert(0) += 1;
        log::debug!("subscribed to {topic:?}");
        Subscription {
            topic,
            counts: Rc::downgrade(&self.counts),
        }
    }

    pub fn is_active(&self, topic: Topic) -> bool {
        self.counts.borrow().get(&topic).is_some_and(|n| *n > 0)
    }
}

/// Scoped subscription guard.
#[derive(Debug)]
pub struct Subscription {
    topic: Topic,
    counts: Weak<Counts>,
}

impl Subscription {
    pub fn topic(&self) -> Topic {
        self.topic
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        // Registry may already be gone at process teardown.
        let Some(counts) = self.counts.upgrade() else { return };
        let mut counts = counts.borrow_mut();
        if let Some(n) = counts.get_mut(&self.topic) {
            *n = n.saturating_sub(1);
            if *n == 0 {
                counts.remove(&self.topic);
            }
        }
        log::debug!("unsubscribed from {:?}", self.topic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_active_initially() {
        let l = Listeners::new();
        assert!(!l.is_active(Topic::Resize));
        assert!(!l.is_active(Topic::PointerMove));
    }

    #[test]
    fn drop_releases_subscription() {
        let l = Listeners::new();
        let sub = l.subscribe(Topic::PointerMove);
        assert!(l.is_active(Topic::PointerMove));
        assert!(!l.is_active(Topic::Resize));
        drop(sub);
        assert!(!l.is_active(Topic::PointerMove));
    }

    #[test]
    fn topics_are_reference_counted() {
        let l = Listeners::new();
        let a = l.subscribe(Topic::Resize);
        let b = l.clone().subscribe(Topic::Resize);
        drop(a);
        assert!(l.is_active(Topic::Resize));
        drop(b);
        assert!(!l.is_active(Topic::Resize));
    }

    #[test]
    fn subscription_outliving_registry_is_harmless() {
        let sub = Listeners::new().subscribe(Topic::Resize);
        assert_eq!(sub.topic(), Topic::Resize);
        drop(sub);
    }
}
