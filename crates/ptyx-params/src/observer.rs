//! Publish/subscribe primitive used for all change propagation.
//!
//! A [`Publisher`] keeps an ordered list of weakly held [`Subscriber`]s and
//! notifies them synchronously, in registration order, whenever
//! [`Publisher::publish`] is called.
//!
//! # Invariants
//!
//! 1. Subscribers are notified in registration order.
//! 2. Registering the same subscriber twice keeps a single registration.
//! 3. While suspended, `publish()` only records that a change is pending;
//!    `resume()` then publishes exactly once.
//! 4. A `publish()` issued from inside one of this publisher's own
//!    notifications is logged and dropped instead of recursing.
//! 5. Subscribers that have been dropped are pruned on the next publish.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

/// Receiver of change notifications.
pub trait Subscriber {
    /// Called synchronously each time an observed publisher changes.
    fn on_changed(&self);
}

/// Adapts a closure into a [`Subscriber`].
///
/// Mostly useful for collaborators (and tests) that only need a callback.
pub struct CallbackSubscriber<F: Fn()> {
    callback: F,
}

impl<F: Fn()> CallbackSubscriber<F> {
    pub fn new(callback: F) -> Rc<Self> {
        Rc::new(Self { callback })
    }
}

impl<F: Fn()> Subscriber for CallbackSubscriber<F> {
    fn on_changed(&self) {
        (self.callback)();
    }
}

/// Notification state of a [`Publisher`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PublisherState {
    /// `publish()` notifies subscribers immediately.
    #[default]
    Active,
    /// `publish()` is deferred until `resume()`.
    Suspended,
}

/// Emits "changed" events to an ordered list of subscribers.
#[derive(Default)]
pub struct Publisher {
    subscribers: RefCell<Vec<Weak<dyn Subscriber>>>,
    state: Cell<PublisherState>,
    pending: Cell<bool>,
    publishing: Cell<bool>,
}

impl Publisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber. Registering an existing subscriber is a no-op.
    ///
    /// The publisher only holds a weak reference; the caller keeps the
    /// subscriber alive.
    pub fn add_subscriber<S: Subscriber + 'static>(&self, subscriber: &Rc<S>) {
        let weak: Weak<dyn Subscriber> = Rc::downgrade(subscriber) as Weak<dyn Subscriber>;
        self.add_subscriber_weak(weak);
    }

    /// Register a subscriber from a weak reference.
    ///
    /// Used by owners that subscribe themselves during construction, before a
    /// strong reference exists.
    pub fn add_subscriber_weak(&self, subscriber: Weak<dyn Subscriber>) {
        let mut subscribers = self.subscribers.borrow_mut();
        if !subscribers.iter().any(|s| Weak::ptr_eq(s, &subscriber)) {
            subscribers.push(subscriber);
        }
    }

    /// Unregister a subscriber. Unknown subscribers are ignored.
    pub fn remove_subscriber<S: Subscriber + 'static>(&self, subscriber: &Rc<S>) {
        let weak: Weak<dyn Subscriber> = Rc::downgrade(subscriber) as Weak<dyn Subscriber>;
        self.remove_subscriber_weak(&weak);
    }

    /// Unregister a subscriber by weak reference.
    pub fn remove_subscriber_weak(&self, subscriber: &Weak<dyn Subscriber>) {
        self.subscribers
            .borrow_mut()
            .retain(|s| !Weak::ptr_eq(s, subscriber));
    }

    /// Check whether a subscriber is currently registered.
    pub fn is_subscribed<S: Subscriber + 'static>(&self, subscriber: &Rc<S>) -> bool {
        let weak: Weak<dyn Subscriber> = Rc::downgrade(subscriber) as Weak<dyn Subscriber>;
        self.subscribers
            .borrow()
            .iter()
            .any(|s| Weak::ptr_eq(s, &weak))
    }

    /// Number of registered subscribers that are still alive.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .borrow()
            .iter()
            .filter(|s| s.strong_count() > 0)
            .count()
    }

    /// Drop every registration.
    pub fn clear_subscribers(&self) {
        self.subscribers.borrow_mut().clear();
    }

    /// Notify every subscriber, in registration order.
    pub fn publish(&self) {
        if self.state.get() == PublisherState::Suspended {
            self.pending.set(true);
            return;
        }

        if self.publishing.replace(true) {
            tracing::warn!("dropping re-entrant publish issued from a change notification");
            return;
        }
        let _publishing = ResetOnDrop(&self.publishing);

        // Snapshot first so subscribers may (un)register while being notified.
        let live: Vec<Rc<dyn Subscriber>> = {
            let mut subscribers = self.subscribers.borrow_mut();
            subscribers.retain(|s| s.strong_count() > 0);
            subscribers.iter().filter_map(Weak::upgrade).collect()
        };

        for subscriber in live {
            subscriber.on_changed();
        }
    }

    /// Defer notifications until [`Publisher::resume`].
    pub fn suspend(&self) {
        self.state.set(PublisherState::Suspended);
    }

    /// Leave the suspended state, publishing once if anything was deferred.
    pub fn resume(&self) {
        self.state.set(PublisherState::Active);
        if self.pending.replace(false) {
            self.publish();
        }
    }

    /// Suspend until the returned guard is dropped.
    pub fn batch(&self) -> PublishBatch<'_> {
        self.suspend();
        PublishBatch { publisher: self }
    }

    /// Current notification state.
    pub fn state(&self) -> PublisherState {
        self.state.get()
    }

    /// Whether a publish was deferred while suspended.
    pub fn is_pending(&self) -> bool {
        self.pending.get()
    }
}

impl fmt::Debug for Publisher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Publisher")
            .field("subscribers", &self.subscriber_count())
            .field("state", &self.state.get())
            .field("pending", &self.pending.get())
            .finish()
    }
}

/// RAII guard returned by [`Publisher::batch`]; resumes on drop.
#[must_use = "dropping the batch immediately resumes the publisher"]
pub struct PublishBatch<'a> {
    publisher: &'a Publisher,
}

impl Drop for PublishBatch<'_> {
    fn drop(&mut self) {
        self.publisher.resume();
    }
}

struct ResetOnDrop<'a>(&'a Cell<bool>);

impl Drop for ResetOnDrop<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter() -> (Rc<Cell<usize>>, Rc<impl Subscriber>) {
        let count = Rc::new(Cell::new(0));
        let seen = Rc::clone(&count);
        let subscriber = CallbackSubscriber::new(move || seen.set(seen.get() + 1));
        (count, subscriber)
    }

    #[test]
    fn test_publish_reaches_subscribers_in_order() {
        let publisher = Publisher::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let first_log = Rc::clone(&log);
        let first = CallbackSubscriber::new(move || first_log.borrow_mut().push("first"));
        let second_log = Rc::clone(&log);
        let second = CallbackSubscriber::new(move || second_log.borrow_mut().push("second"));

        publisher.add_subscriber(&first);
        publisher.add_subscriber(&second);
        publisher.publish();

        assert_eq!(*log.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn test_add_subscriber_is_idempotent() {
        let publisher = Publisher::new();
        let (count, subscriber) = counter();

        publisher.add_subscriber(&subscriber);
        publisher.add_subscriber(&subscriber);
        publisher.publish();

        assert_eq!(count.get(), 1);
        assert_eq!(publisher.subscriber_count(), 1);
    }

    #[test]
    fn test_remove_unknown_subscriber_is_noop() {
        let publisher = Publisher::new();
        let (_, registered) = counter();
        let (_, stranger) = counter();

        publisher.add_subscriber(&registered);
        publisher.remove_subscriber(&stranger);

        assert!(publisher.is_subscribed(&registered));
        assert_eq!(publisher.subscriber_count(), 1);
    }

    #[test]
    fn test_dropped_subscriber_is_pruned() {
        let publisher = Publisher::new();
        let (_, subscriber) = counter();
        publisher.add_subscriber(&subscriber);
        drop(subscriber);

        publisher.publish();
        assert_eq!(publisher.subscriber_count(), 0);
    }

    #[test]
    fn test_suspend_defers_single_publish() {
        let publisher = Publisher::new();
        let (count, subscriber) = counter();
        publisher.add_subscriber(&subscriber);

        publisher.suspend();
        publisher.publish();
        publisher.publish();
        assert_eq!(count.get(), 0);
        assert!(publisher.is_pending());

        publisher.resume();
        assert_eq!(count.get(), 1);
        assert!(!publisher.is_pending());
        assert_eq!(publisher.state(), PublisherState::Active);
    }

    #[test]
    fn test_resume_without_pending_is_silent() {
        let publisher = Publisher::new();
        let (count, subscriber) = counter();
        publisher.add_subscriber(&subscriber);

        publisher.suspend();
        publisher.resume();
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_batch_guard_resumes_on_drop() {
        let publisher = Publisher::new();
        let (count, subscriber) = counter();
        publisher.add_subscriber(&subscriber);

        {
            let _batch = publisher.batch();
            publisher.publish();
            assert_eq!(publisher.state(), PublisherState::Suspended);
        }
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_reentrant_publish_is_dropped() {
        let publisher = Rc::new(Publisher::new());
        let count = Rc::new(Cell::new(0));

        let inner = Rc::clone(&publisher);
        let seen = Rc::clone(&count);
        let subscriber = CallbackSubscriber::new(move || {
            seen.set(seen.get() + 1);
            inner.publish();
        });
        publisher.add_subscriber(&subscriber);

        publisher.publish();
        assert_eq!(count.get(), 1);

        // The guard is released once the outer publish returns.
        publisher.publish();
        assert_eq!(count.get(), 2);
    }
}
