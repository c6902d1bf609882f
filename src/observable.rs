//! Synchronous observable values
//!
//! A [`Signal`] holds one value and a list of subscribers. Mutations notify every
//! subscriber on the calling thread, after the new value is committed, and only
//! when the value actually changed.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Identifies one subscription on a [`Signal`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber<T> = Rc<dyn Fn(&T)>;

pub struct Signal<T> {
    value: RefCell<T>,
    subscribers: RefCell<Vec<(SubscriptionId, Subscriber<T>)>>,
    next_id: Cell<u64>,
}

impl<T: Clone + PartialEq + 'static> Signal<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: RefCell::new(value),
            subscribers: RefCell::new(Vec::new()),
            next_id: Cell::new(1),
        }
    }

    /// Current value
    pub fn get(&self) -> T {
        self.value.borrow().clone()
    }

    /// Read the current value without cloning it
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&*self.value.borrow())
    }

    /// Replace the value, notifying subscribers if it changed
    pub fn set(&self, value: T) -> bool {
        self.update(|current| *current = value)
    }

    /// Mutate the value in place, notifying subscribers if it changed
    pub fn update(&self, f: impl FnOnce(&mut T)) -> bool {
        let snapshot = {
            let mut value = self.value.borrow_mut();
            let before = (*value).clone();
            f(&mut *value);
            if *value == before {
                return false;
            }
            (*value).clone()
        };
        self.notify(&snapshot);
        true
    }

    /// Register a subscriber. It is not called with the current value.
    pub fn subscribe(&self, f: impl Fn(&T) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        let subscriber: Subscriber<T> = Rc::new(f);
        self.subscribers.borrow_mut().push((id, subscriber));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.borrow_mut();
        let before = subscribers.len();
        subscribers.retain(|(sub_id, _)| *sub_id != id);
        subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }

    fn notify(&self, value: &T) {
        // Snapshot the list so subscribers may (un)subscribe while being notified
        let subscribers: Vec<Subscriber<T>> = self
            .subscribers
            .borrow()
            .iter()
            .map(|(_, f)| f.clone())
            .collect();
        for subscriber in subscribers {
            subscriber(value);
        }
    }
}

impl<T: Clone + PartialEq + Default + 'static> Default for Signal<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("value", &self.value.borrow())
            .field("subscribers", &self.subscribers.borrow().len())
            .finish()
    }
}
