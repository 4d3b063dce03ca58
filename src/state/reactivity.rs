// ============================================================================
// CONTEXT SLOT - Contextual value with defined availability and subscribers
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

type Subscriber<T> = Box<dyn Fn(Option<&T>)>;

/// Holds a value handed from a parent to its descendants.
///
/// Empty until the owner publishes, and empty again once it retracts.
/// Clones share the value and the subscribers, so a descendant holding a
/// clone sees exactly what the owner published.
pub struct ContextSlot<T> {
    value: Rc<RefCell<Option<T>>>,
    subscribers: Rc<RefCell<Vec<Subscriber<T>>>>,
}

impl<T: Clone> ContextSlot<T> {
    pub fn new() -> Self {
        Self {
            value: Rc::new(RefCell::new(None)),
            subscribers: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Current value, if published.
    pub fn get(&self) -> Option<T> {
        self.value.borrow().clone()
    }

    pub fn is_published(&self) -> bool {
        self.value.borrow().is_some()
    }

    /// Make `value` available and notify subscribers.
    pub fn publish(&self, value: T) {
        *self.value.borrow_mut() = Some(value);
        self.notify();
    }

    /// Withdraw the value. Subscribers are only notified if one was published.
    pub fn retract(&self) {
        let previous = self.value.borrow_mut().take();
        if previous.is_some() {
            self.notify();
        }
    }

    /// Called on every publish and retract.
    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn(Option<&T>) + 'static,
    {
        self.subscribers.borrow_mut().push(Box::new(callback));
    }

    fn notify(&self) {
        let current = self.get();
        for callback in self.subscribers.borrow().iter() {
            callback(current.as_ref());
        }
    }
}

impl<T: Clone> Default for ContextSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for ContextSlot<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            subscribers: self.subscribers.clone(),
        }
    }
}
