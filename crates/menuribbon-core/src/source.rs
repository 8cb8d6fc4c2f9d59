//! Broadcast event sources.
//!
//! An [`EventSource`] is the push side of an input stream: the rendering layer
//! emits values, subscribers receive them. Subscribing returns a
//! [`Subscription`] that detaches the handler when disposed.

use crate::disposable::Subscription;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

type Handler<T> = Rc<dyn Fn(&T)>;

struct Registry<T> {
    next_id: u64,
    handlers: Vec<(u64, Handler<T>)>,
}

/// Single-threaded broadcast source.
///
/// Cloning an `EventSource` yields another handle to the same subscriber list.
pub struct EventSource<T> {
    registry: Rc<RefCell<Registry<T>>>,
}

impl<T: 'static> EventSource<T> {
    /// Create a source with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry {
                next_id: 0,
                handlers: Vec::new(),
            })),
        }
    }

    /// Register `handler`; it stays registered until the returned
    /// subscription is disposed or dropped.
    pub fn subscribe(&self, handler: impl Fn(&T) + 'static) -> Subscription {
        let id = {
            let mut registry = self.registry.borrow_mut();
            let id = registry.next_id;
            registry.next_id += 1;
            registry.handlers.push((id, Rc::new(handler)));
            id
        };
        let registry: Weak<RefCell<Registry<T>>> = Rc::downgrade(&self.registry);
        Subscription::new(move || {
            if let Some(registry) = registry.upgrade() {
                registry.borrow_mut().handlers.retain(|(h, _)| *h != id);
            }
        })
    }

    /// Deliver `value` to every current subscriber.
    ///
    /// Handlers may subscribe or unsubscribe while being called; changes take
    /// effect from the next emission.
    pub fn emit(&self, value: &T) {
        let handlers: Vec<Handler<T>> = self
            .registry
            .borrow()
            .handlers
            .iter()
            .map(|(_, h)| Rc::clone(h))
            .collect();
        for handler in handlers {
            handler(value);
        }
    }

    /// Number of registered handlers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.registry.borrow().handlers.len()
    }
}

impl<T: 'static> Default for EventSource<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for EventSource<T> {
    fn clone(&self) -> Self {
        Self {
            registry: Rc::clone(&self.registry),
        }
    }
}

impl<T> fmt::Debug for EventSource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventSource")
            .field("subscribers", &self.registry.borrow().handlers.len())
            .finish()
    }
}
